//! 领域事件（Domain Event）
//!
//! 聚合根对事件保持不透明；发布器与日志仅依赖事件类型名与版本。
//!
use std::fmt;

/// 领域事件载荷需要满足的通用能力边界
pub trait DomainEvent: Clone + fmt::Debug + Send + Sync + 'static {
    /// 事件类型（稳定名称，用于路由与日志）
    fn event_type(&self) -> &'static str;

    /// 事件载荷版本
    fn event_version(&self) -> usize {
        1
    }
}
