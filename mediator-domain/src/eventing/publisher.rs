//! 事件发布器（EventPublisher）协议
//!
use crate::domain_event::DomainEvent;
use crate::error::DomainResult;
use async_trait::async_trait;
use std::sync::Arc;

/// 事件发布器：接收一批已提交的领域事件
///
/// 与 `Repository` 一致，不接收应用层上下文：超时或取消时调用方丢弃 `publish` 的 future，
/// 实现应保证在任意 `.await` 处被丢弃都不会留下半完成的状态。
#[async_trait]
pub trait EventPublisher<E>: Send + Sync
where
    E: DomainEvent,
{
    async fn publish(&self, events: &[E]) -> DomainResult<()>;
}

#[async_trait]
impl<E, T> EventPublisher<E> for Arc<T>
where
    E: DomainEvent,
    T: EventPublisher<E> + ?Sized,
{
    async fn publish(&self, events: &[E]) -> DomainResult<()> {
        (**self).publish(events).await
    }
}
