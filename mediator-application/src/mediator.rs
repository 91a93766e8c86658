use crate::{
    behaviour::{Behaviour, Next},
    context::AppContext,
    error::AppError,
    handler::RequestHandler,
    registry::{HandlerEntry, HandlerRegistry},
    request::Request,
};
use std::any::type_name;
use std::sync::Arc;

/// 中介者：按请求类型把请求路由到唯一的处理器，并依次经过已注册的行为
///
/// 构建完成后行为链与处理器表均不可变，可在多个任务间共享（`Arc<Mediator>`）并发调用。
pub struct Mediator {
    registry: HandlerRegistry,
    behaviours: Arc<[Arc<dyn Behaviour>]>,
}

impl Mediator {
    pub fn builder() -> MediatorBuilder {
        MediatorBuilder::default()
    }

    /// 分发请求
    ///
    /// 未注册处理器时直接返回 `HandlerNotFound`，不会执行任何行为。
    pub async fn send<R: Request>(&self, ctx: &AppContext, request: R) -> Result<R::Response, AppError> {
        let Some(endpoint) = self.registry.resolve::<R>() else {
            tracing::warn!(request = R::NAME, "no handler registered");
            return Err(AppError::HandlerNotFound(R::NAME));
        };

        let next = Next::new(&self.behaviours, endpoint.as_ref(), &request);
        let out = next.run(ctx).await?;

        match out.downcast::<R::Response>() {
            Ok(response) => Ok(*response),
            // 擦除后的值无法还原其类型名，这里报告产生该响应的请求
            Err(_) => Err(AppError::TypeMismatch {
                expected: type_name::<R::Response>(),
                found: R::NAME,
            }),
        }
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn behaviour_count(&self) -> usize {
        self.behaviours.len()
    }
}

/// 中介者构建器：收集行为与处理器，`build` 时校验并冻结
#[derive(Default)]
pub struct MediatorBuilder {
    behaviours: Vec<Arc<dyn Behaviour>>,
    handlers: Vec<HandlerEntry>,
}

impl MediatorBuilder {
    /// 追加行为，先追加者位于更外层
    pub fn use_behaviour<B>(mut self, behaviour: B) -> Self
    where
        B: Behaviour + 'static,
    {
        self.behaviours.push(Arc::new(behaviour));
        self
    }

    pub fn register_handler<H: RequestHandler>(mut self, handler: H) -> Self {
        self.handlers.push(HandlerEntry::new(handler));
        self
    }

    pub fn register_handlers<I>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = HandlerEntry>,
    {
        self.handlers.extend(entries);
        self
    }

    /// 同一请求类型注册了多个处理器时返回 `DuplicateHandler`
    pub fn build(self) -> Result<Mediator, AppError> {
        let mut registry = HandlerRegistry::new();
        for entry in self.handlers {
            registry.insert(entry)?;
        }

        tracing::debug!(
            handlers = registry.len(),
            behaviours = self.behaviours.len(),
            "mediator built"
        );

        Ok(Mediator {
            registry,
            behaviours: self.behaviours.into(),
        })
    }
}
