//! 应用层中介者（mediator-application）
//!
//! - `Mediator`：按请求类型路由到唯一处理器，构建后只读、可并发共享
//! - `Behaviour`：环绕处理器的管道行为，按注册顺序由外到内嵌套
//! - `AppContext`：业务语境、幂等键、取消信号与截止时间
//! - 内置行为：日志、耗时、校验、超时、重试
//!
pub mod behaviour;
pub mod behaviours;
pub mod context;
pub mod error;
pub mod handler;
pub mod mediator;
pub mod registry;
pub mod request;
pub mod validation;

pub use mediator::{Mediator, MediatorBuilder};
