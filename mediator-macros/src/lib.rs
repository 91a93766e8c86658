//! 领域建模过程宏（mediator-macros）
//!
//! - `#[aggregate(event = E)]`：为结构体嵌入 `AggregateRoot<E>` 并实现 `Entity`/`Aggregate`
//! - `#[entity_id]`：为单字段 tuple struct 生成标识类型的常用实现
//!
use proc_macro::TokenStream;

mod aggregate;
mod derive_utils;
mod entity_id;
mod field_utils;

/// 聚合宏
/// - 若缺失则追加字段 `root: AggregateRoot<E>` 并置于字段最前
/// - 自动实现 `::mediator_domain::entity::Entity`（id/version 委托给 root）
/// - 自动实现 `::mediator_domain::aggregate::Aggregate`（`TYPE`、`Event`、root 访问器）
/// - 参数：`#[aggregate(event = E, name = "order")]`，`event` 必填，`name` 默认为结构体名
#[proc_macro_attribute]
pub fn aggregate(attr: TokenStream, item: TokenStream) -> TokenStream {
    aggregate::expand(attr, item)
}

/// 实体 ID 宏
/// 用于 `struct OrderId(String);` 这类单字段 tuple struct，自动生成：
/// - 派生：Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize
/// - `new(value)`、`Display`、`FromStr`、`AsRef`、双向 `From`
/// - 参数：`#[entity_id(debug = false)]` 关闭 Debug 派生以便自定义实现
#[proc_macro_attribute]
pub fn entity_id(attr: TokenStream, item: TokenStream) -> TokenStream {
    entity_id::expand(attr, item)
}
