use crate::{
    behaviour::{Behaviour, DispatchResult, Next},
    context::AppContext,
    request::DynRequest,
};
use async_trait::async_trait;
use std::time::Instant;

/// 仅记录执行耗时
#[derive(Clone, Copy, Debug, Default)]
pub struct Measure;

#[async_trait]
impl Behaviour for Measure {
    async fn process(
        &self,
        ctx: &AppContext,
        request: &dyn DynRequest,
        next: Next<'_>,
    ) -> DispatchResult {
        let started = Instant::now();
        let result = next.run(ctx).await;
        tracing::debug!(
            request = request.name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "execution took"
        );
        result
    }
}
