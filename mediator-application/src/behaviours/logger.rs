use crate::{
    behaviour::{Behaviour, DispatchResult, Next},
    context::AppContext,
    request::DynRequest,
};
use async_trait::async_trait;
use std::time::Instant;
use tracing::Instrument;

/// 记录请求的进入、退出与耗时，并为后续环节开启 `dispatch` span
#[derive(Clone, Copy, Debug, Default)]
pub struct Logger;

#[async_trait]
impl Behaviour for Logger {
    async fn process(
        &self,
        ctx: &AppContext,
        request: &dyn DynRequest,
        next: Next<'_>,
    ) -> DispatchResult {
        let name = request.name();
        let correlation_id = ctx.biz.correlation_id().unwrap_or("-");
        let span = tracing::info_span!("dispatch", request = name, correlation_id);

        let started = Instant::now();
        tracing::info!(parent: &span, "pre process");

        let result = next.run(ctx).instrument(span.clone()).await;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => tracing::info!(parent: &span, elapsed_ms, "post process"),
            Err(err) => tracing::warn!(parent: &span, elapsed_ms, error = %err, "post process failed"),
        }
        result
    }
}
