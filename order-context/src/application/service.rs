use super::commands::{self, CancelOrder, CreateOrder, PayOrder, ShipOrder};
use super::queries::{self, GetOrder, GetOrders, OrderView};
use crate::config::AppConfig;
use crate::order::{OrderEvent, OrderId, OrderRepository};
use mediator_application::{
    Mediator,
    behaviours::{Cancellator, Logger, Retrier, Validator},
    context::AppContext,
    error::AppError,
};
use mediator_domain::eventing::EventPublisher;
use std::sync::Arc;

/// 订单服务：对外暴露订单用例，内部经由中介者分发
///
/// 管道顺序为 `Logger → Validator → Cancellator → Retrier`。
pub struct OrderService {
    mediator: Mediator,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        publisher: Arc<dyn EventPublisher<OrderEvent>>,
        config: &AppConfig,
    ) -> Result<Self, AppError> {
        let mediator = Mediator::builder()
            .use_behaviour(Logger)
            .use_behaviour(Validator)
            .use_behaviour(Cancellator::new(config.timeout))
            .use_behaviour(Retrier::new(config.retry.clone()))
            .register_handlers(commands::handlers(orders.clone(), publisher))
            .register_handlers(queries::handlers(orders))
            .build()?;

        Ok(Self { mediator })
    }

    /// 以新生成的标识创建订单并返回该标识
    pub async fn create(&self, ctx: &AppContext) -> Result<String, AppError> {
        let id = OrderId::generate().to_string();
        self.mediator
            .send(ctx, CreateOrder { id: id.clone() })
            .await?;
        Ok(id)
    }

    pub async fn pay(&self, ctx: &AppContext, id: &str) -> Result<(), AppError> {
        self.mediator
            .send(
                ctx,
                PayOrder {
                    order_id: id.to_string(),
                },
            )
            .await
    }

    pub async fn cancel(&self, ctx: &AppContext, id: &str) -> Result<(), AppError> {
        self.mediator
            .send(
                ctx,
                CancelOrder {
                    order_id: id.to_string(),
                },
            )
            .await
    }

    pub async fn ship(&self, ctx: &AppContext, id: &str) -> Result<(), AppError> {
        self.mediator
            .send(
                ctx,
                ShipOrder {
                    order_id: id.to_string(),
                },
            )
            .await
    }

    pub async fn get(&self, ctx: &AppContext, id: &str) -> Result<OrderView, AppError> {
        self.mediator
            .send(
                ctx,
                GetOrder {
                    order_id: id.to_string(),
                },
            )
            .await
    }

    pub async fn list(&self, ctx: &AppContext) -> Result<Vec<OrderView>, AppError> {
        self.mediator.send(ctx, GetOrders).await
    }
}
