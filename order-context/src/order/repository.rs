use super::model::Order;
use async_trait::async_trait;
use mediator_domain::error::DomainResult;
use mediator_domain::persist::{InMemoryRepository, Repository};

/// 订单仓储：在通用仓储之上增加列表查询
#[async_trait]
pub trait OrderRepository: Repository<Order> {
    /// 按创建时间升序返回全部订单
    async fn get_all(&self) -> DomainResult<Vec<Order>>;
}

#[async_trait]
impl OrderRepository for InMemoryRepository<Order> {
    async fn get_all(&self) -> DomainResult<Vec<Order>> {
        let mut orders = self.all();
        orders.sort_by(|a, b| {
            a.created_time()
                .cmp(&b.created_time())
                .then_with(|| a.order_id().cmp(&b.order_id()))
        });
        Ok(orders)
    }
}
