use crate::{context::AppContext, error::AppError, registry::Endpoint, request::DynRequest};
use async_trait::async_trait;
use std::any::Any;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub type BoxAnySend = Box<dyn Any + Send>;

pub type DispatchResult = Result<BoxAnySend, AppError>;

pub type DispatchFuture<'a> = Pin<Box<dyn Future<Output = DispatchResult> + Send + 'a>>;

/// 管道行为：包裹在处理器外层的横切逻辑
///
/// 实现可以在调用 `next` 前后执行逻辑，可以不调用 `next` 直接短路返回，
/// 也可以多次调用 `next`（例如重试）。注册顺序即嵌套顺序：先注册者在最外层。
#[async_trait]
pub trait Behaviour: Send + Sync {
    async fn process(
        &self,
        ctx: &AppContext,
        request: &dyn DynRequest,
        next: Next<'_>,
    ) -> DispatchResult;
}

#[async_trait]
impl<B> Behaviour for Arc<B>
where
    B: Behaviour + ?Sized,
{
    async fn process(
        &self,
        ctx: &AppContext,
        request: &dyn DynRequest,
        next: Next<'_>,
    ) -> DispatchResult {
        (**self).process(ctx, request, next).await
    }
}

/// 管道中余下的部分（后续行为 + 最终处理器）
///
/// `Next` 可复制，行为可以多次 `run`，每次都会重新执行后续行为与处理器。
#[derive(Clone, Copy)]
pub struct Next<'a> {
    behaviours: &'a [Arc<dyn Behaviour>],
    endpoint: &'a dyn Endpoint,
    request: &'a dyn DynRequest,
}

impl<'a> Next<'a> {
    pub(crate) fn new(
        behaviours: &'a [Arc<dyn Behaviour>],
        endpoint: &'a dyn Endpoint,
        request: &'a dyn DynRequest,
    ) -> Self {
        Self {
            behaviours,
            endpoint,
            request,
        }
    }

    /// 以给定上下文继续执行管道
    ///
    /// 行为可以传入派生出的上下文（例如带截止时间），后续环节都将看到该上下文。
    pub fn run<'c>(self, ctx: &'c AppContext) -> DispatchFuture<'c>
    where
        'a: 'c,
    {
        match self.behaviours.split_first() {
            Some((head, rest)) => {
                let next = Next {
                    behaviours: rest,
                    ..self
                };
                head.process(ctx, self.request, next)
            }
            None => self.endpoint.call(ctx, self.request),
        }
    }

    /// 剩余未执行的行为数量
    pub fn remaining(&self) -> usize {
        self.behaviours.len()
    }
}
