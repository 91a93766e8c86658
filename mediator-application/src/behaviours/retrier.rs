use crate::{
    behaviour::{Behaviour, DispatchResult, Next},
    context::AppContext,
    error::AppError,
    request::DynRequest,
};
use async_trait::async_trait;
use bon::Builder;
use mediator_domain::error::IsTransient;
use std::time::Duration;

/// 重试策略：指数退避，延迟不超过 `max_delay`
#[derive(Builder, Clone, Debug, PartialEq)]
pub struct RetryPolicy {
    /// 总尝试次数（含首次），小于 1 时按 1 处理
    #[builder(default = 3)]
    pub max_attempts: u32,
    #[builder(default = Duration::from_millis(100))]
    pub initial_delay: Duration,
    #[builder(default = Duration::from_secs(10))]
    pub max_delay: Duration,
    #[builder(default = 2.0)]
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl RetryPolicy {
    /// 第 `attempt` 次失败后的等待时长（attempt 从 1 开始）
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let nanos = self.initial_delay.as_nanos() as f64 * self.multiplier.max(1.0).powi(exp);
        if !nanos.is_finite() || nanos >= self.max_delay.as_nanos() as f64 {
            self.max_delay
        } else {
            Duration::from_nanos(nanos as u64)
        }
    }
}

/// 对瞬时错误按策略重试后续环节；非瞬时错误立即返回
///
/// 用尽次数后返回 `RetriesExhausted`，其中包含最后一次的错误。
/// 退避等待期间上下文被取消或到期时，立即返回对应原因。
#[derive(Clone, Debug, Default)]
pub struct Retrier {
    policy: RetryPolicy,
}

impl Retrier {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// 仅指定次数，其余沿用默认策略
    pub fn with_attempts(max_attempts: u32) -> Self {
        Self::new(RetryPolicy::builder().max_attempts(max_attempts).build())
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

#[async_trait]
impl Behaviour for Retrier {
    async fn process(
        &self,
        ctx: &AppContext,
        request: &dyn DynRequest,
        next: Next<'_>,
    ) -> DispatchResult {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let err = match next.run(ctx).await {
                Ok(out) => {
                    if attempt > 1 {
                        tracing::info!(request = request.name(), attempt, "succeeded after retry");
                    }
                    return Ok(out);
                }
                Err(err) => err,
            };

            if !err.is_transient() {
                return Err(err);
            }

            if attempt >= max_attempts {
                tracing::error!(
                    request = request.name(),
                    attempts = attempt,
                    error = %err,
                    "retries exhausted"
                );
                return Err(AppError::RetriesExhausted {
                    request: request.name(),
                    attempts: attempt,
                    source: Box::new(err),
                });
            }

            let delay = self.policy.delay_for(attempt);
            tracing::warn!(
                request = request.name(),
                attempt,
                max_attempts,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "transient failure, retrying"
            );

            tokio::select! {
                biased;
                reason = ctx.done() => return Err(reason),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }
}
