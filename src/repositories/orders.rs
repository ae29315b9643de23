use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::models::Order;

/// Storage failures surfaced by repository implementations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Order persistence interface. The storage backend is a collaborator; this
/// crate ships an in-memory implementation for development and tests.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn insert(&self, order: Order) -> Result<Order, RepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, RepositoryError>;
    async fn find_all(&self) -> Result<Vec<Order>, RepositoryError>;
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Order>, RepositoryError>;
    async fn update(&self, order: Order) -> Result<Order, RepositoryError>;
    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError>;
}

/// In-memory order store over a sharded concurrent map.
#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: DashMap<Uuid, Order>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn insert(&self, order: Order) -> Result<Order, RepositoryError> {
        self.orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, RepositoryError> {
        Ok(self.orders.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let mut orders: Vec<Order> = self
            .orders
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        orders.sort_by_key(|order| order.created_at);
        Ok(orders)
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Order>, RepositoryError> {
        let mut orders: Vec<Order> = self
            .orders
            .iter()
            .filter(|entry| entry.value().user_id == user_id)
            .map(|entry| entry.value().clone())
            .collect();
        orders.sort_by_key(|order| order.created_at);
        Ok(orders)
    }

    async fn update(&self, order: Order) -> Result<Order, RepositoryError> {
        self.orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        Ok(self.orders.remove(&id).is_some())
    }
}
