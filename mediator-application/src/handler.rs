use crate::{context::AppContext, error::AppError, request::Request};
use async_trait::async_trait;
use std::sync::Arc;

/// 请求处理器：每个请求类型恰好对应一个
#[async_trait]
pub trait RequestHandler: Send + Sync + 'static {
    type Request: Request;

    async fn handle(
        &self,
        ctx: &AppContext,
        request: &Self::Request,
    ) -> Result<<Self::Request as Request>::Response, AppError>;
}

#[async_trait]
impl<H> RequestHandler for Arc<H>
where
    H: RequestHandler,
{
    type Request = H::Request;

    async fn handle(
        &self,
        ctx: &AppContext,
        request: &Self::Request,
    ) -> Result<<Self::Request as Request>::Response, AppError> {
        (**self).handle(ctx, request).await
    }
}
