//! 内置管道行为
//!
//! 推荐顺序：`Logger → Validator → Cancellator → Retrier`。
//! 校验在重试之外，校验失败不会被重试；超时在重试之外，截止时间覆盖全部重试。

mod cancellator;
mod logger;
mod measure;
mod retrier;
mod validator;

pub use cancellator::Cancellator;
pub use logger::Logger;
pub use measure::Measure;
pub use retrier::{RetryPolicy, Retrier};
pub use validator::Validator;
