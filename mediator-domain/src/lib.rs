//! 领域层基础库（mediator-domain）
//!
//! 提供以 DDD 为中心的最小领域抽象，供应用层的中介者（mediator）调度的处理器使用：
//! - 实体（`entity`）与聚合（`aggregate`）建模
//! - 聚合根与事件记录器（`aggregate_root`）：缓冲未提交的领域事件，直到显式 `clear`
//! - 领域事件（`domain_event`）与版本号值对象（`value_object`）
//! - 仓储协议与内存实现（`persist`），更新时执行乐观锁校验
//! - 事件发布协议与内存实现（`eventing`）
//!
//! 本 crate 与存储/传输实现解耦，仅定义领域层接口与最小必要的错误类型。
//!
//! 典型用法：
//! 1. 在领域实体中嵌入 `AggregateRoot<E>`（或使用 `#[aggregate(event = E)]` 宏）；
//! 2. 状态变更时通过 `add_event` 记录事件；
//! 3. 通过 `Repository` 持久化后，使用 `EventPublisher` 发布事件并 `clear`。
//!
pub mod aggregate;
pub mod aggregate_root;
pub mod domain_event;
pub mod entity;
pub mod error;
pub mod eventing;
pub mod persist;
pub mod value_object;
