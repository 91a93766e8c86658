use super::events::OrderEvent;
use chrono::{DateTime, Utc};
use mediator_domain::aggregate::Aggregate;
use mediator_domain::aggregate_root::AggregateRoot;
use mediator_domain::entity::Entity;
use mediator_domain::error::{DomainError, DomainResult};
use mediator_macros::{aggregate, entity_id};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[entity_id]
pub struct OrderId(String);

impl OrderId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

#[entity_id]
pub struct CustomerId(Uuid);

impl CustomerId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

#[entity_id]
pub struct ProductId(Uuid);

impl ProductId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Submitted,
    Paid,
    Shipped,
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Submitted => "submitted",
            OrderStatus::Paid => "paid",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// 订单聚合
///
/// 状态流转：`Submitted → Paid → Shipped`，`Submitted | Paid → Cancelled`。
/// 每次合法流转记录一条事件，非法流转返回 `InvalidState` 且不改变状态。
#[aggregate(event = OrderEvent, name = "order")]
#[derive(Clone, Debug)]
pub struct Order {
    customer_id: CustomerId,
    product_id: ProductId,
    status: OrderStatus,
    created_time: DateTime<Utc>,
}

impl Order {
    pub fn create(
        id: OrderId,
        customer_id: CustomerId,
        product_id: ProductId,
        created_time: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let raw = id.to_string();
        if raw.trim().is_empty() {
            return Err(DomainError::invalid_value("order id must not be empty"));
        }

        let mut order = Self {
            root: AggregateRoot::new(raw),
            customer_id: customer_id.clone(),
            product_id: product_id.clone(),
            status: OrderStatus::Submitted,
            created_time,
        };
        order.add_event(OrderEvent::Created {
            order_id: id,
            customer_id,
            product_id,
            created_time,
        });
        Ok(order)
    }

    pub fn pay(&mut self) -> DomainResult<()> {
        self.transition(&[OrderStatus::Submitted], OrderStatus::Paid)?;
        let order_id = self.order_id();
        self.add_event(OrderEvent::Paid { order_id });
        Ok(())
    }

    pub fn ship(&mut self) -> DomainResult<()> {
        self.transition(&[OrderStatus::Paid], OrderStatus::Shipped)?;
        let order_id = self.order_id();
        self.add_event(OrderEvent::Shipped { order_id });
        Ok(())
    }

    pub fn cancel(&mut self) -> DomainResult<()> {
        self.transition(
            &[OrderStatus::Submitted, OrderStatus::Paid],
            OrderStatus::Cancelled,
        )?;
        let order_id = self.order_id();
        self.add_event(OrderEvent::Cancelled { order_id });
        Ok(())
    }

    pub fn order_id(&self) -> OrderId {
        OrderId::new(self.id().to_string())
    }

    pub fn customer_id(&self) -> &CustomerId {
        &self.customer_id
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn created_time(&self) -> DateTime<Utc> {
        self.created_time
    }

    fn transition(&mut self, allowed: &[OrderStatus], to: OrderStatus) -> DomainResult<()> {
        if !allowed.contains(&self.status) {
            return Err(DomainError::invalid_state(format!(
                "order {} cannot move from {} to {}",
                self.id(),
                self.status,
                to
            )));
        }
        self.status = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediator_domain::domain_event::DomainEvent;

    fn submitted() -> Order {
        Order::create(
            OrderId::new("o-1".into()),
            CustomerId::generate(),
            ProductId::generate(),
            Utc::now(),
        )
        .unwrap()
    }

    fn event_types(order: &Order) -> Vec<&'static str> {
        order.events().iter().map(|e| e.event_type()).collect()
    }

    #[test]
    fn create_records_created_event() {
        let order = submitted();

        assert_eq!(order.id(), "o-1");
        assert_eq!(order.status(), OrderStatus::Submitted);
        assert!(order.version().is_new());
        assert_eq!(event_types(&order), vec!["order.created"]);
    }

    #[test]
    fn create_rejects_blank_id() {
        let err = Order::create(
            OrderId::new("  ".into()),
            CustomerId::generate(),
            ProductId::generate(),
            Utc::now(),
        )
        .unwrap_err();

        assert!(matches!(err, DomainError::InvalidValue { .. }));
    }

    #[test]
    fn happy_path_records_events_in_order() {
        let mut order = submitted();
        order.pay().unwrap();
        order.ship().unwrap();

        assert_eq!(order.status(), OrderStatus::Shipped);
        assert_eq!(
            event_types(&order),
            vec!["order.created", "order.paid", "order.shipped"]
        );
    }

    #[test]
    fn ship_requires_payment() {
        let mut order = submitted();
        let err = order.ship().unwrap_err();

        assert!(matches!(err, DomainError::InvalidState { .. }));
        assert_eq!(order.status(), OrderStatus::Submitted);
        assert_eq!(event_types(&order), vec!["order.created"]);
    }

    #[test]
    fn cancel_allowed_until_shipped() {
        let mut paid = submitted();
        paid.pay().unwrap();
        paid.cancel().unwrap();
        assert_eq!(paid.status(), OrderStatus::Cancelled);

        let mut shipped = submitted();
        shipped.pay().unwrap();
        shipped.ship().unwrap();
        assert!(shipped.cancel().is_err());
        assert_eq!(shipped.status(), OrderStatus::Shipped);
    }

    #[test]
    fn cancelled_order_cannot_be_paid() {
        let mut order = submitted();
        order.cancel().unwrap();

        assert!(order.pay().is_err());
        assert_eq!(
            event_types(&order),
            vec!["order.created", "order.cancelled"]
        );
    }
}
