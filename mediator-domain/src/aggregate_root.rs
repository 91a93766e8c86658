//! 聚合根（AggregateRoot）与事件记录器（EventRecorder）
//!
//! 领域实体通过组合而非继承嵌入一个 `AggregateRoot<E>`：
//! - 状态变更时调用 `add_event` 记录领域事件；
//! - `events` 返回尚未提交的事件快照（不清空）；
//! - 持久化/发布完成后调用 `clear`，划定“未提交事件”的边界。
//!
//! 本层不加锁：同一聚合实例不应被并发修改，调用方负责串行化访问
//! （通常由持久化边界的乐观锁保证）。
//!
use crate::value_object::Version;

/// 仅追加的内存事件缓冲，归属于唯一的聚合根实例
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecorder<E> {
    events: Vec<E>,
}

impl<E> Default for EventRecorder<E> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<E> EventRecorder<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加事件（不校验事件形态）
    pub fn record(&mut self, event: E) {
        self.events.push(event);
    }

    /// 按追加顺序返回当前缓冲的事件
    pub fn events(&self) -> &[E] {
        &self.events
    }

    /// 清空缓冲；对空缓冲调用为无操作
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// 取出全部事件并清空缓冲
    pub fn take(&mut self) -> Vec<E> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// 聚合根：字符串标识 + 乐观锁版本 + 唯一的事件记录器
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRoot<E> {
    id: String,
    version: Version,
    recorder: EventRecorder<E>,
}

impl<E> AggregateRoot<E> {
    /// 创建尚未持久化的聚合根（版本为 0）
    pub fn new(id: impl Into<String>) -> Self {
        Self::restore(id, Version::new())
    }

    /// 以已知版本重建聚合根（仓储加载时使用），事件缓冲为空
    pub fn restore(id: impl Into<String>, version: Version) -> Self {
        Self {
            id: id.into(),
            version,
            recorder: EventRecorder::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// 由仓储在写入成功后设置存储侧的版本
    pub fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    pub fn add_event(&mut self, event: E) {
        self.recorder.record(event);
    }

    pub fn events(&self) -> &[E] {
        self.recorder.events()
    }

    pub fn clear(&mut self) {
        self.recorder.clear();
    }

    /// 取出未提交事件并清空（发布前常用）
    pub fn take_events(&mut self) -> Vec<E> {
        self.recorder.take()
    }

    pub fn has_uncommitted_events(&self) -> bool {
        !self.recorder.is_empty()
    }
}
