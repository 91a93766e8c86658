//! 订单限界上下文：以中介者分发订单命令与查询的进程内示例服务
//!
mod application;
mod config;
mod order;

use anyhow::Result;
use application::service::OrderService;
use config::AppConfig;
use futures_util::StreamExt;
use mediator_application::context::{AppContext, BusinessContext};
use mediator_domain::domain_event::DomainEvent;
use mediator_domain::eventing::InMemoryEventPublisher;
use mediator_domain::persist::InMemoryRepository;
use order::{Order, OrderEvent};
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,order_context=debug")),
        )
        .init();

    let config = AppConfig::from_env();
    tracing::info!(
        timeout_ms = config.timeout.as_millis() as u64,
        retry_attempts = config.retry.max_attempts,
        "starting order context"
    );

    let orders = Arc::new(InMemoryRepository::<Order>::new());
    let publisher = Arc::new(InMemoryEventPublisher::<OrderEvent>::new(
        config.publisher_capacity,
    ));

    let mut events = publisher.subscribe();
    let listener = tokio::spawn(async move {
        while let Some(received) = events.next().await {
            match received {
                Ok(event) => tracing::info!(
                    event_type = event.event_type(),
                    order_id = %event.order_id(),
                    "domain event received"
                ),
                Err(err) => tracing::warn!(%err, "event stream lagged"),
            }
        }
    });

    let service = OrderService::new(orders, publisher, &config)?;

    let ctx = AppContext::new().with_biz(
        BusinessContext::builder()
            .correlation_id(Uuid::new_v4().to_string())
            .actor_type("system".into())
            .actor_id("order-context".into())
            .build(),
    );

    let shipped = service.create(&ctx).await?;
    service.pay(&ctx, &shipped).await?;
    service.ship(&ctx, &shipped).await?;

    let cancelled = service.create(&ctx).await?;
    service.cancel(&ctx, &cancelled).await?;
    match service.ship(&ctx, &cancelled).await {
        Ok(()) => anyhow::bail!("cancelled order {cancelled} was shipped"),
        Err(err) => tracing::info!(order_id = %cancelled, %err, "ship rejected"),
    }

    for view in service.list(&ctx).await? {
        tracing::info!(
            order_id = %view.id,
            customer_id = %view.customer_id,
            product_id = %view.product_id,
            status = %view.status,
            version = view.version,
            created_time = %view.created_time,
            "order"
        );
    }

    // 服务持有发布器的最后一个引用，释放后事件流结束
    drop(service);
    listener.await?;

    Ok(())
}
