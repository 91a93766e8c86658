use crate::{
    behaviour::{Behaviour, DispatchResult, Next},
    context::AppContext,
    request::DynRequest,
};
use async_trait::async_trait;
use std::time::Duration;

/// 为后续环节施加超时
///
/// 派生带截止时间的上下文传给后续环节，并与之竞争：
/// 截止时间到达返回 `DeadlineExceeded`，父上下文被取消返回 `Cancelled`，
/// 未完成的后续 future 随之被丢弃。无论结果如何，派生上下文在返回时都会被取消。
#[derive(Clone, Copy, Debug)]
pub struct Cancellator {
    timeout: Duration,
}

impl Cancellator {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl Behaviour for Cancellator {
    async fn process(
        &self,
        ctx: &AppContext,
        request: &dyn DynRequest,
        next: Next<'_>,
    ) -> DispatchResult {
        let scoped = ctx.with_timeout(self.timeout);
        let _guard = scoped.cancellation_token().clone().drop_guard();

        tokio::select! {
            biased;
            result = next.run(&scoped) => result,
            reason = scoped.done() => {
                tracing::warn!(
                    request = request.name(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    %reason,
                    "dispatch aborted"
                );
                Err(reason)
            }
        }
    }
}
