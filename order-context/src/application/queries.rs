use super::{load_order, require_id};
use crate::order::{Order, OrderRepository, OrderStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mediator_application::{
    context::AppContext,
    error::AppError,
    handler::RequestHandler,
    registry::HandlerEntry,
    request::Request,
    validation::{Validate, ValidationErrors},
};
use mediator_domain::entity::Entity;
use serde::Serialize;
use std::sync::Arc;

/// 订单只读视图
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OrderView {
    pub id: String,
    pub customer_id: String,
    pub product_id: String,
    pub status: OrderStatus,
    pub created_time: DateTime<Utc>,
    pub version: usize,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id().to_string(),
            customer_id: order.customer_id().to_string(),
            product_id: order.product_id().to_string(),
            status: order.status(),
            created_time: order.created_time(),
            version: order.version().value(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct GetOrder {
    pub order_id: String,
}

impl Validate for GetOrder {
    fn validate(&self) -> Result<(), ValidationErrors> {
        require_id("order_id", &self.order_id)
    }
}

impl Request for GetOrder {
    const NAME: &'static str = "GetOrder";
    type Response = OrderView;

    fn as_validate(&self) -> Option<&dyn Validate> {
        Some(self)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct GetOrders;

impl Request for GetOrders {
    const NAME: &'static str = "GetOrders";
    type Response = Vec<OrderView>;
}

pub struct GetOrderHandler {
    orders: Arc<dyn OrderRepository>,
}

#[async_trait]
impl RequestHandler for GetOrderHandler {
    type Request = GetOrder;

    async fn handle(&self, _ctx: &AppContext, query: &GetOrder) -> Result<OrderView, AppError> {
        let order = load_order(self.orders.as_ref(), &query.order_id).await?;
        Ok(OrderView::from(&order))
    }
}

pub struct GetOrdersHandler {
    orders: Arc<dyn OrderRepository>,
}

#[async_trait]
impl RequestHandler for GetOrdersHandler {
    type Request = GetOrders;

    async fn handle(&self, _ctx: &AppContext, _query: &GetOrders) -> Result<Vec<OrderView>, AppError> {
        let orders = self.orders.get_all().await?;
        Ok(orders.iter().map(OrderView::from).collect())
    }
}

/// 订单查询处理器集合
pub fn handlers(orders: Arc<dyn OrderRepository>) -> Vec<HandlerEntry> {
    vec![
        HandlerEntry::new(GetOrderHandler {
            orders: orders.clone(),
        }),
        HandlerEntry::new(GetOrdersHandler { orders }),
    ]
}
