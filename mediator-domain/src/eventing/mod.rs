//! 事件子系统（eventing）
//!
//! 提供已提交领域事件的发布抽象：
//! - `EventPublisher`：接收聚合提交后的事件批次；
//! - `InMemoryEventPublisher`：基于广播通道的进程内实现（需 `eventing` 特性）。
//!
//! 该模块仅定义协议，不绑定具体传输实现；跨进程消息投递不在本库范围内。
//!
pub mod publisher;
#[cfg(feature = "eventing")]
pub mod publisher_inmemory;

pub use publisher::EventPublisher;
#[cfg(feature = "eventing")]
pub use publisher_inmemory::InMemoryEventPublisher;
