//! 持久化（persist）
//!
//! 定义聚合仓储协议及其内存实现：
//! - `Repository`：按标识加载、创建与更新聚合，更新时执行乐观锁校验；
//! - `InMemoryRepository`：基于 `DashMap` 的进程内实现，适用于测试、示例与本地开发。
//!
//! 具体存储后端（如文档数据库）由上层提供实现并注入。
//!
mod repository;
mod repository_inmemory;

pub use repository::Repository;
pub use repository_inmemory::InMemoryRepository;
