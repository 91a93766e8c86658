use crate::aggregate::Aggregate;
use crate::error::DomainResult;
use async_trait::async_trait;
use std::sync::Arc;

/// 聚合仓储
///
/// - `get`：按标识加载聚合，返回的聚合不携带未提交事件；不存在时返回 `NotFound`；
/// - `create`：保存新聚合，标识已存在时返回 `AlreadyExists`；
/// - `update`：保存已有聚合，调用方持有的版本必须与存储版本一致，
///   否则返回 `ConcurrencyConflict`。
///
/// 取消通过丢弃调用方的 future 传播，因此接口不接收应用层上下文。
#[async_trait]
pub trait Repository<A>: Send + Sync
where
    A: Aggregate,
{
    async fn get(&self, id: &str) -> DomainResult<A>;

    async fn create(&self, aggregate: &A) -> DomainResult<()>;

    async fn update(&self, aggregate: &A) -> DomainResult<()>;
}

#[async_trait]
impl<A, T> Repository<A> for Arc<T>
where
    A: Aggregate,
    T: Repository<A> + ?Sized,
{
    async fn get(&self, id: &str) -> DomainResult<A> {
        (**self).get(id).await
    }

    async fn create(&self, aggregate: &A) -> DomainResult<()> {
        (**self).create(aggregate).await
    }

    async fn update(&self, aggregate: &A) -> DomainResult<()> {
        (**self).update(aggregate).await
    }
}
