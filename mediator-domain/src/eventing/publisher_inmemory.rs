//! 内存版事件发布器（InMemoryEventPublisher）
//!
//! 基于 `tokio::sync::broadcast` 实现的轻量发布器，满足 `EventPublisher` 协议：
//! - `publish`：按顺序克隆并广播每个事件；
//! - `subscribe`：返回 `'static` 生命周期事件流，便于在 `tokio::spawn` 中消费；
//! - 典型用途：测试环境、示例与本地开发。
//!
//! 注意：若当前无订阅者，发送将被忽略。

use crate::domain_event::DomainEvent;
use crate::error::{DomainError, DomainResult as Result};
use crate::eventing::EventPublisher;
use async_trait::async_trait;
use futures_core::stream::BoxStream;
use futures_util::StreamExt;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

#[derive(Clone)]
pub struct InMemoryEventPublisher<E> {
    tx: broadcast::Sender<E>,
}

impl<E> InMemoryEventPublisher<E>
where
    E: DomainEvent,
{
    /// 创建内存发布器，`capacity` 为广播缓冲区容量
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// 订阅之后发布的事件
    pub fn subscribe(&self) -> BoxStream<'static, Result<E>> {
        let rx = self.tx.subscribe();
        let stream = BroadcastStream::new(rx)
            .map(|r| r.map_err(|e| DomainError::event_publisher(e.to_string())));
        Box::pin(stream)
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[async_trait]
impl<E> EventPublisher<E> for InMemoryEventPublisher<E>
where
    E: DomainEvent,
{
    async fn publish(&self, events: &[E]) -> Result<()> {
        for event in events {
            tracing::debug!(
                event_type = event.event_type(),
                event_version = event.event_version(),
                "publishing domain event"
            );
            // 无订阅者时 send 返回错误，这里视为非致命并忽略
            let _ = self.tx.send(event.clone());
        }
        Ok(())
    }
}
