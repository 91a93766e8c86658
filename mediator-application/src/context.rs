use crate::error::AppError;
use bon::Builder;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// 业务语境：链路追踪、审计主体、操作因果
#[derive(Builder, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessContext {
    correlation_id: Option<String>,
    causation_id: Option<String>,
    actor_type: Option<String>,
    actor_id: Option<String>,
}

impl BusinessContext {
    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    pub fn causation_id(&self) -> Option<&str> {
        self.causation_id.as_deref()
    }

    pub fn actor_type(&self) -> Option<&str> {
        self.actor_type.as_deref()
    }

    pub fn actor_id(&self) -> Option<&str> {
        self.actor_id.as_deref()
    }
}

/// 应用层上下文（Application Context）
///
/// 承载一次请求分发所需的横切信息：
/// - 业务语境（`BusinessContext`）：关联追踪 `correlation_id`、因果链 `causation_id`、
///   执行者类型/ID 等；
/// - 幂等键（`idempotency_key`）：用于在基础设施层实现请求幂等；
/// - 取消信号与截止时间：沿调用链向下传播，派生上下文只会收紧、不会放宽。
///
/// 典型用法：
/// ```rust
/// use mediator_application::context::{AppContext, BusinessContext};
/// use std::time::Duration;
///
/// let ctx = AppContext::new()
///     .with_biz(
///         BusinessContext::builder()
///             .correlation_id("cor-123".into())
///             .actor_type("user".into())
///             .actor_id("u-1".into())
///             .build(),
///     )
///     .with_idempotency_key("idem-xyz");
///
/// let scoped = ctx.with_timeout(Duration::from_secs(5));
/// assert!(scoped.deadline().is_some());
/// assert!(ctx.deadline().is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct AppContext {
    /// 业务语境（链路追踪、审计主体、操作因果）
    pub biz: BusinessContext,
    /// 幂等键（可选）：为空则由上层或基础设施决定是否参与幂等
    pub idempotency_key: Option<String>,
    cancellation: CancellationToken,
    deadline: Option<Instant>,
}

impl AppContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_biz(mut self, biz: BusinessContext) -> Self {
        self.biz = biz;
        self
    }

    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }

    /// 使用调用方提供的取消令牌，调用方持有同一令牌即可从外部取消
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// 派生带截止时间的子上下文
    ///
    /// 子上下文的取消令牌是父令牌的子令牌：父取消会传递给子，子取消不影响父。
    /// 若父上下文已有更早的截止时间，则保留更早者。
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let effective = match self.deadline {
            Some(current) if current <= deadline => current,
            _ => deadline,
        };
        self.derive(Some(effective))
    }

    /// 超时过大、截止时间无法表示时视为不设上限，沿用父上下文的截止时间
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self.derive(self.deadline),
        }
    }

    fn derive(&self, deadline: Option<Instant>) -> Self {
        Self {
            biz: self.biz.clone(),
            idempotency_key: self.idempotency_key.clone(),
            cancellation: self.cancellation.child_token(),
            deadline,
        }
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// 距截止时间的剩余时长；无截止时间返回 None，已过期返回零
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// 上下文当前的终止原因：已取消优先于已超时；仍然有效时返回 None
    pub fn err(&self) -> Option<AppError> {
        if self.is_cancelled() {
            return Some(AppError::Cancelled);
        }
        match self.deadline {
            Some(d) if Instant::now() >= d => Some(AppError::DeadlineExceeded),
            _ => None,
        }
    }

    /// 等待上下文终止（被取消或到达截止时间），返回终止原因
    ///
    /// 既无截止时间又未被取消的上下文会一直挂起，适合放进 `tokio::select!` 与业务 future 竞争。
    pub async fn done(&self) -> AppError {
        match self.deadline {
            Some(deadline) => tokio::select! {
                biased;
                _ = self.cancellation.cancelled() => AppError::Cancelled,
                _ = tokio::time::sleep_until(deadline) => AppError::DeadlineExceeded,
            },
            None => {
                self.cancellation.cancelled().await;
                AppError::Cancelled
            }
        }
    }
}
