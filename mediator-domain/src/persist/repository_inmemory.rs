use super::Repository;
use crate::aggregate::Aggregate;
use crate::error::{DomainError, DomainResult};
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

/// 基于内存的聚合仓储
/// - 以聚合标识为键保存聚合快照（存储副本不携带未提交事件）
/// - 每次成功写入后版本号 +1；`update` 要求调用方版本与存储版本一致
pub struct InMemoryRepository<A> {
    store: DashMap<String, A>,
}

impl<A> Default for InMemoryRepository<A> {
    fn default() -> Self {
        Self {
            store: DashMap::new(),
        }
    }
}

impl<A> InMemoryRepository<A>
where
    A: Aggregate + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// 全部聚合（顺序不保证）
    pub fn all(&self) -> Vec<A> {
        self.store.iter().map(|e| e.value().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    // 存储副本：版本前进一位，清空事件缓冲
    fn committed_copy(aggregate: &A) -> A {
        let mut stored = aggregate.clone();
        let next = aggregate.version().next();
        stored.root_mut().set_version(next);
        stored.clear_events();
        stored
    }
}

#[async_trait]
impl<A> Repository<A> for InMemoryRepository<A>
where
    A: Aggregate + Clone,
{
    async fn get(&self, id: &str) -> DomainResult<A> {
        self.store
            .get(id)
            .map(|e| e.value().clone())
            .ok_or_else(|| DomainError::not_found(format!("{} {}", A::TYPE, id)))
    }

    async fn create(&self, aggregate: &A) -> DomainResult<()> {
        match self.store.entry(aggregate.id().to_string()) {
            Entry::Occupied(_) => Err(DomainError::AlreadyExists {
                id: aggregate.id().to_string(),
            }),
            Entry::Vacant(slot) => {
                let stored = Self::committed_copy(aggregate);
                tracing::debug!(
                    aggregate_type = A::TYPE,
                    aggregate_id = aggregate.id(),
                    version = %stored.version(),
                    "aggregate created"
                );
                slot.insert(stored);
                Ok(())
            }
        }
    }

    async fn update(&self, aggregate: &A) -> DomainResult<()> {
        let Some(mut current) = self.store.get_mut(aggregate.id()) else {
            return Err(DomainError::not_found(format!(
                "{} {}",
                A::TYPE,
                aggregate.id()
            )));
        };

        if current.version() != aggregate.version() {
            return Err(DomainError::ConcurrencyConflict {
                id: aggregate.id().to_string(),
                expected: aggregate.version(),
                actual: current.version(),
            });
        }

        let stored = Self::committed_copy(aggregate);
        tracing::debug!(
            aggregate_type = A::TYPE,
            aggregate_id = aggregate.id(),
            version = %stored.version(),
            "aggregate updated"
        );
        *current = stored;
        Ok(())
    }
}
