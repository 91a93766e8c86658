use crate::{
    behaviour::{Behaviour, DispatchResult, Next},
    context::AppContext,
    error::AppError,
    request::DynRequest,
};
use async_trait::async_trait;

/// 对自校验请求执行校验，失败时短路，不再调用后续环节
#[derive(Clone, Copy, Debug, Default)]
pub struct Validator;

#[async_trait]
impl Behaviour for Validator {
    async fn process(
        &self,
        ctx: &AppContext,
        request: &dyn DynRequest,
        next: Next<'_>,
    ) -> DispatchResult {
        if let Some(validate) = request.validation() {
            if let Err(errors) = validate.validate() {
                tracing::debug!(request = request.name(), %errors, "validation failed");
                return Err(AppError::Validation(errors));
            }
        }
        next.run(ctx).await
    }
}
