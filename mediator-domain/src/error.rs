//! 领域层统一错误定义
//!
//! 聚焦仓储、乐观锁、事件发布与状态校验等最小必要集合，
//! 便于在各实现层统一转换为 `DomainError`。
//!
use crate::value_object::Version;
use thiserror::Error;

/// 统一错误类型（基础库最小必要集）
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DomainError {
    // --- 事件发布 ---
    #[error("event publisher error: {reason}")]
    EventPublisher { reason: String },

    // --- 仓储/持久化 ---
    #[error("repository error: {reason}")]
    Repository { reason: String },
    #[error("repository unavailable: {reason}")]
    Unavailable { reason: String },
    #[error("concurrency conflict: id={id}, expected={expected}, actual={actual}")]
    ConcurrencyConflict {
        id: String,
        expected: Version,
        actual: Version,
    },
    #[error("already exists: {id}")]
    AlreadyExists { id: String },
    #[error("not found: {reason}")]
    NotFound { reason: String },

    // --- 领域规则/状态 ---
    #[error("invalid state: {reason}")]
    InvalidState { reason: String },
    #[error("invalid value: {reason}")]
    InvalidValue { reason: String },
}

/// 统一 Result 类型别名
pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    pub fn event_publisher(reason: impl Into<String>) -> Self {
        Self::EventPublisher {
            reason: reason.into(),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn not_found(reason: impl Into<String>) -> Self {
        Self::NotFound {
            reason: reason.into(),
        }
    }

    pub fn invalid_state(reason: impl Into<String>) -> Self {
        Self::InvalidState {
            reason: reason.into(),
        }
    }

    pub fn invalid_value(reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            reason: reason.into(),
        }
    }
}

/// 错误的重试分类：瞬时错误（网络抖动、超时等）可安全重试，领域规则违例不可
pub trait IsTransient {
    fn is_transient(&self) -> bool;
}

impl IsTransient for DomainError {
    fn is_transient(&self) -> bool {
        matches!(self, DomainError::Unavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_unavailable_is_transient() {
        assert!(DomainError::unavailable("timeout").is_transient());
        assert!(!DomainError::invalid_state("paid").is_transient());
        assert!(
            !DomainError::ConcurrencyConflict {
                id: "o-1".into(),
                expected: Version::from_value(1),
                actual: Version::from_value(2),
            }
            .is_transient()
        );
    }

    #[test]
    fn conflict_message_names_versions() {
        let err = DomainError::ConcurrencyConflict {
            id: "o-1".into(),
            expected: Version::from_value(1),
            actual: Version::from_value(2),
        };
        assert_eq!(
            err.to_string(),
            "concurrency conflict: id=o-1, expected=v1, actual=v2"
        );
    }
}
