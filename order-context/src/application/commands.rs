use super::{load_order, require_id};
use crate::order::{CustomerId, Order, OrderEvent, OrderId, OrderRepository, ProductId};
use async_trait::async_trait;
use chrono::Utc;
use mediator_application::{
    context::AppContext,
    error::AppError,
    handler::RequestHandler,
    registry::HandlerEntry,
    request::Request,
    validation::{Validate, ValidationErrors},
};
use mediator_domain::aggregate::Aggregate;
use mediator_domain::eventing::EventPublisher;
use mediator_domain::persist::Repository;
use std::sync::Arc;

macro_rules! self_validating {
    ($name:ident, $field:ident) => {
        impl Validate for $name {
            fn validate(&self) -> Result<(), ValidationErrors> {
                require_id(stringify!($field), &self.$field)
            }
        }

        impl Request for $name {
            const NAME: &'static str = stringify!($name);
            type Response = ();

            fn as_validate(&self) -> Option<&dyn Validate> {
                Some(self)
            }
        }
    };
}

#[derive(Clone, Debug)]
pub struct CreateOrder {
    pub id: String,
}

#[derive(Clone, Debug)]
pub struct PayOrder {
    pub order_id: String,
}

#[derive(Clone, Debug)]
pub struct CancelOrder {
    pub order_id: String,
}

#[derive(Clone, Debug)]
pub struct ShipOrder {
    pub order_id: String,
}

self_validating!(CreateOrder, id);
self_validating!(PayOrder, order_id);
self_validating!(CancelOrder, order_id);
self_validating!(ShipOrder, order_id);

pub struct CreateOrderHandler {
    orders: Arc<dyn OrderRepository>,
}

#[async_trait]
impl RequestHandler for CreateOrderHandler {
    type Request = CreateOrder;

    async fn handle(&self, _ctx: &AppContext, command: &CreateOrder) -> Result<(), AppError> {
        let order = Order::create(
            OrderId::new(command.id.clone()),
            CustomerId::generate(),
            ProductId::generate(),
            Utc::now(),
        )?;
        self.orders.create(&order).await?;
        tracing::debug!(order_id = %command.id, "order created");
        Ok(())
    }
}

pub struct PayOrderHandler {
    orders: Arc<dyn OrderRepository>,
}

#[async_trait]
impl RequestHandler for PayOrderHandler {
    type Request = PayOrder;

    async fn handle(&self, _ctx: &AppContext, command: &PayOrder) -> Result<(), AppError> {
        let mut order = load_order(self.orders.as_ref(), &command.order_id).await?;
        order.pay()?;
        self.orders.update(&order).await?;
        Ok(())
    }
}

pub struct CancelOrderHandler {
    orders: Arc<dyn OrderRepository>,
}

#[async_trait]
impl RequestHandler for CancelOrderHandler {
    type Request = CancelOrder;

    async fn handle(&self, _ctx: &AppContext, command: &CancelOrder) -> Result<(), AppError> {
        let mut order = load_order(self.orders.as_ref(), &command.order_id).await?;
        order.cancel()?;
        self.orders.update(&order).await?;
        Ok(())
    }
}

/// 发货后发布订单上未提交的事件，发布成功才清空
pub struct ShipOrderHandler {
    orders: Arc<dyn OrderRepository>,
    publisher: Arc<dyn EventPublisher<OrderEvent>>,
}

#[async_trait]
impl RequestHandler for ShipOrderHandler {
    type Request = ShipOrder;

    async fn handle(&self, _ctx: &AppContext, command: &ShipOrder) -> Result<(), AppError> {
        let mut order = load_order(self.orders.as_ref(), &command.order_id).await?;
        order.ship()?;
        self.orders.update(&order).await?;
        self.publisher.publish(order.events()).await?;
        order.clear_events();
        Ok(())
    }
}

/// 订单命令处理器集合
pub fn handlers(
    orders: Arc<dyn OrderRepository>,
    publisher: Arc<dyn EventPublisher<OrderEvent>>,
) -> Vec<HandlerEntry> {
    vec![
        HandlerEntry::new(CreateOrderHandler {
            orders: orders.clone(),
        }),
        HandlerEntry::new(PayOrderHandler {
            orders: orders.clone(),
        }),
        HandlerEntry::new(CancelOrderHandler {
            orders: orders.clone(),
        }),
        HandlerEntry::new(ShipOrderHandler { orders, publisher }),
    ]
}
