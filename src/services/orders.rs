use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    errors::ServiceError,
    events::{Event, EventSender},
    models::{Order, OrderItem, ShippingAddress},
    repositories::OrderRepository,
};

/// Request to record a new customer order.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateOrder {
    pub user_id: Uuid,
    #[validate(length(min = 1, message = "order must contain at least one item"))]
    pub order_items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    #[validate(length(min = 1))]
    pub payment_method: String,
    pub items_price: Decimal,
    pub shipping_price: Decimal,
    pub tax_price: Decimal,
    pub total_price: Decimal,
}

/// Sales totals for a single day.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DailySales {
    /// Day in `YYYY-MM-DD` form
    pub date: String,
    pub orders: u64,
    pub sales: Decimal,
}

/// Aggregate sales report across all recorded orders.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SalesSummary {
    pub num_orders: u64,
    pub total_sales: Decimal,
    pub daily_orders: Vec<DailySales>,
}

/// Order lifecycle operations over an injected repository.
pub struct OrderService {
    repository: Arc<dyn OrderRepository>,
    event_sender: EventSender,
}

impl OrderService {
    pub fn new(repository: Arc<dyn OrderRepository>, event_sender: EventSender) -> Self {
        Self {
            repository,
            event_sender,
        }
    }

    #[instrument(skip(self, request), fields(user_id = %request.user_id))]
    pub async fn create_order(&self, request: CreateOrder) -> Result<Order, ServiceError> {
        request.validate()?;

        let order = Order {
            id: Uuid::new_v4(),
            user_id: request.user_id,
            order_items: request.order_items,
            shipping_address: request.shipping_address,
            payment_method: request.payment_method,
            items_price: request.items_price,
            shipping_price: request.shipping_price,
            tax_price: request.tax_price,
            total_price: request.total_price,
            is_paid: false,
            paid_at: None,
            is_delivered: false,
            delivered_at: None,
            created_at: Utc::now(),
        };

        let order = self.repository.insert(order).await?;
        info!(order_id = %order.id, "order recorded");
        self.emit(Event::OrderCreated(order.id)).await;
        Ok(order)
    }

    pub async fn list_orders(&self) -> Result<Vec<Order>, ServiceError> {
        Ok(self.repository.find_all().await?)
    }

    pub async fn list_user_orders(&self, user_id: Uuid) -> Result<Vec<Order>, ServiceError> {
        Ok(self.repository.find_by_user(user_id).await?)
    }

    pub async fn get_order(&self, id: Uuid) -> Result<Order, ServiceError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Order Not Found".to_string()))
    }

    /// Marks an order paid, stamping `paid_at` with the current time.
    #[instrument(skip(self))]
    pub async fn mark_paid(&self, id: Uuid) -> Result<Order, ServiceError> {
        let mut order = self.get_order(id).await?;
        order.is_paid = true;
        order.paid_at = Some(Utc::now());
        let order = self.repository.update(order).await?;
        self.emit(Event::OrderPaid(order.id)).await;
        Ok(order)
    }

    /// Marks an order delivered, stamping `delivered_at`.
    #[instrument(skip(self))]
    pub async fn mark_delivered(&self, id: Uuid) -> Result<Order, ServiceError> {
        let mut order = self.get_order(id).await?;
        order.is_delivered = true;
        order.delivered_at = Some(Utc::now());
        let order = self.repository.update(order).await?;
        self.emit(Event::OrderDelivered(order.id)).await;
        Ok(order)
    }

    #[instrument(skip(self))]
    pub async fn delete_order(&self, id: Uuid) -> Result<(), ServiceError> {
        if self.repository.delete(id).await? {
            self.emit(Event::OrderDeleted(id)).await;
            Ok(())
        } else {
            Err(ServiceError::NotFound("Order Not Found".to_string()))
        }
    }

    /// Aggregates recorded orders into overall and per-day totals, sorted by
    /// day.
    pub async fn sales_summary(&self) -> Result<SalesSummary, ServiceError> {
        let orders = self.repository.find_all().await?;

        let num_orders = orders.len() as u64;
        let total_sales: Decimal = orders.iter().map(|order| order.total_price).sum();

        let mut by_day: BTreeMap<NaiveDate, (u64, Decimal)> = BTreeMap::new();
        for order in &orders {
            let entry = by_day
                .entry(order.created_at.date_naive())
                .or_insert((0, Decimal::ZERO));
            entry.0 += 1;
            entry.1 += order.total_price;
        }

        let daily_orders = by_day
            .into_iter()
            .map(|(date, (orders, sales))| DailySales {
                date: date.format("%Y-%m-%d").to_string(),
                orders,
                sales,
            })
            .collect();

        Ok(SalesSummary {
            num_orders,
            total_sales,
            daily_orders,
        })
    }

    async fn emit(&self, event: Event) {
        if let Err(e) = self.event_sender.send(event).await {
            warn!(error = %e, "failed to emit order event");
        }
    }
}
