//! 订单限界上下文的领域模型
//!
pub mod events;
pub mod model;
pub mod repository;

pub use events::OrderEvent;
pub use model::{CustomerId, Order, OrderId, OrderStatus, ProductId};
pub use repository::OrderRepository;
