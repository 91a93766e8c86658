//! 订单用例：命令、查询及其处理器，以及对外的 `OrderService`
//!
pub mod commands;
pub mod queries;
pub mod service;

use crate::order::{Order, OrderRepository};
use mediator_application::error::AppError;
use mediator_application::validation::ValidationErrors;
use mediator_domain::error::DomainError;
use mediator_domain::persist::Repository;

// 仓储的 NotFound 映射为应用层的 AggregateNotFound
async fn load_order(orders: &dyn OrderRepository, id: &str) -> Result<Order, AppError> {
    orders.get(id).await.map_err(|err| match err {
        DomainError::NotFound { .. } => AppError::AggregateNotFound(id.to_string()),
        other => other.into(),
    })
}

fn require_id(field: &str, value: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if value.trim().is_empty() {
        errors.add(field, "must not be empty");
    }
    errors.into_result()
}
