use crate::validation::ValidationErrors;
use mediator_domain::error::{DomainError, IsTransient};

#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("domain: {0}")]
    Domain(#[from] DomainError),

    #[error("validation: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("unavailable: {0}")]
    Unavailable(String),

    #[error("infra: {0}")]
    Infra(String),

    #[error("aggregate not found: {0}")]
    AggregateNotFound(String),

    #[error("handler not found: {0}")]
    HandlerNotFound(&'static str),

    #[error("handler already registered: request={request}")]
    DuplicateHandler { request: &'static str },

    #[error("deadline exceeded")]
    DeadlineExceeded,

    #[error("context cancelled")]
    Cancelled,

    #[error("retries exhausted: request={request}, attempts={attempts}: {source}")]
    RetriesExhausted {
        request: &'static str,
        attempts: u32,
        #[source]
        source: Box<AppError>,
    },

    #[error("type mismatch: expected={expected}, found={found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

impl AppError {
    /// 穿透重试包装，返回最初导致失败的错误
    pub fn root_cause(&self) -> &AppError {
        match self {
            AppError::RetriesExhausted { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// 瞬时错误：超时、依赖暂不可用，以及领域层判定为瞬时的错误。
/// `RetriesExhausted` 不再视为瞬时，嵌套的重试不会成倍放大。
impl IsTransient for AppError {
    fn is_transient(&self) -> bool {
        match self {
            AppError::Domain(err) => err.is_transient(),
            AppError::DeadlineExceeded | AppError::Unavailable(_) => true,
            _ => false,
        }
    }
}
