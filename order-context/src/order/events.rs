use super::model::{CustomerId, OrderId, ProductId};
use chrono::{DateTime, Utc};
use mediator_domain::domain_event::DomainEvent;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderEvent {
    Created {
        order_id: OrderId,
        customer_id: CustomerId,
        product_id: ProductId,
        created_time: DateTime<Utc>,
    },
    Paid {
        order_id: OrderId,
    },
    Shipped {
        order_id: OrderId,
    },
    Cancelled {
        order_id: OrderId,
    },
}

impl OrderEvent {
    pub fn order_id(&self) -> &OrderId {
        match self {
            OrderEvent::Created { order_id, .. }
            | OrderEvent::Paid { order_id }
            | OrderEvent::Shipped { order_id }
            | OrderEvent::Cancelled { order_id } => order_id,
        }
    }
}

impl DomainEvent for OrderEvent {
    fn event_type(&self) -> &'static str {
        match self {
            OrderEvent::Created { .. } => "order.created",
            OrderEvent::Paid { .. } => "order.paid",
            OrderEvent::Shipped { .. } => "order.shipped",
            OrderEvent::Cancelled { .. } => "order.cancelled",
        }
    }
}
