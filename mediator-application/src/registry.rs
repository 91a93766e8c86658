use crate::{
    behaviour::{BoxAnySend, DispatchFuture},
    context::AppContext,
    error::AppError,
    handler::RequestHandler,
    request::{DynRequest, Request},
};
use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

/// 类型擦除后的处理器调用入口
pub(crate) trait Endpoint: Send + Sync {
    fn call<'a>(&'a self, ctx: &'a AppContext, request: &'a dyn DynRequest) -> DispatchFuture<'a>;
}

struct HandlerEndpoint<H> {
    handler: H,
}

impl<H: RequestHandler> Endpoint for HandlerEndpoint<H> {
    fn call<'a>(&'a self, ctx: &'a AppContext, request: &'a dyn DynRequest) -> DispatchFuture<'a> {
        Box::pin(async move {
            let Some(request) = request.as_any().downcast_ref::<H::Request>() else {
                return Err(AppError::TypeMismatch {
                    expected: type_name::<H::Request>(),
                    found: request.name(),
                });
            };
            let response = self.handler.handle(ctx, request).await?;
            Ok(Box::new(response) as BoxAnySend)
        })
    }
}

/// 待注册的处理器（请求类型 + 擦除后的入口）
pub struct HandlerEntry {
    pub(crate) type_id: TypeId,
    pub(crate) name: &'static str,
    pub(crate) endpoint: Arc<dyn Endpoint>,
}

impl HandlerEntry {
    pub fn new<H: RequestHandler>(handler: H) -> Self {
        Self {
            type_id: TypeId::of::<H::Request>(),
            name: <H::Request as Request>::NAME,
            endpoint: Arc::new(HandlerEndpoint { handler }),
        }
    }

    pub fn request_name(&self) -> &'static str {
        self.name
    }
}

/// 请求类型到处理器的映射，构建完成后只读
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<TypeId, HandlerEntry>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<H: RequestHandler>(&mut self, handler: H) -> Result<(), AppError> {
        self.insert(HandlerEntry::new(handler))
    }

    /// 同一请求类型重复注册时返回 `DuplicateHandler`，已有注册保持不变
    pub fn insert(&mut self, entry: HandlerEntry) -> Result<(), AppError> {
        match self.handlers.entry(entry.type_id) {
            Entry::Occupied(_) => Err(AppError::DuplicateHandler {
                request: entry.name,
            }),
            Entry::Vacant(slot) => {
                slot.insert(entry);
                Ok(())
            }
        }
    }

    pub(crate) fn resolve<R: Request>(&self) -> Option<&Arc<dyn Endpoint>> {
        self.handlers
            .get(&TypeId::of::<R>())
            .map(|entry| &entry.endpoint)
    }

    pub fn contains<R: Request>(&self) -> bool {
        self.handlers.contains_key(&TypeId::of::<R>())
    }

    /// 已注册的请求名列表（只读视图）
    pub fn registered_requests(&self) -> Vec<&'static str> {
        self.handlers.values().map(|entry| entry.name).collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
