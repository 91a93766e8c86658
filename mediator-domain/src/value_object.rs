//! 值对象（Value Object）
//!
//! 无标识、以值相等为准的对象，用于封装不可变的概念性值。
//!
use serde::{Deserialize, Serialize};
use std::fmt;

/// 版本号（用于乐观锁和并发控制）
///
/// 仓储在每次成功写入后递增版本号；更新时要求调用方持有的版本与存储中的版本一致。
///
/// # 示例
///
/// ```
/// use mediator_domain::value_object::Version;
///
/// let v1 = Version::new();
/// assert_eq!(v1.value(), 0);
/// assert!(v1.is_new());
///
/// let v2 = v1.next();
/// assert_eq!(v2.value(), 1);
/// assert!(v2 > v1);
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Version(usize);

impl Version {
    /// 创建初始版本（版本号为 0，表示尚未持久化）
    pub const fn new() -> Self {
        Self(0)
    }

    /// 从值创建版本号
    pub const fn from_value(value: usize) -> Self {
        Self(value)
    }

    /// 获取下一个版本号
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    pub const fn value(&self) -> usize {
        self.0
    }

    /// 检查是否为初始版本
    pub fn is_new(&self) -> bool {
        self.0 == 0
    }

    /// 检查聚合是否已持久化（版本大于零）
    pub fn is_created(&self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl From<usize> for Version {
    fn from(value: usize) -> Self {
        Self(value)
    }
}
