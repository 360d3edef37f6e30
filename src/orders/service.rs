use chrono::Utc;
use std::sync::Arc;

use crate::catalog::PlanCatalog;
use crate::error::ApiError;
use crate::orders::models::{Order, OrderStatus};
use crate::orders::order_id::next_order_id;
use crate::orders::store::{OrderFilter, OrderStore};

/// Service for the order lifecycle: creation and fulfillment.
///
/// Plan validation happens against the injected catalog before anything is
/// written, so an invalid plan never leaves a partial record behind.
#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn OrderStore>,
    catalog: Arc<PlanCatalog>,
    contact_channel: String,
}

impl OrderService {
    pub fn new(store: Arc<dyn OrderStore>, catalog: Arc<PlanCatalog>, contact_channel: String) -> Self {
        Self {
            store,
            catalog,
            contact_channel,
        }
    }

    /// Create a new order for the given plan code
    ///
    /// # Validation
    /// - The plan code must exist in the catalog; unknown codes fail with
    ///   `InvalidPlan` before any write
    /// - Catalog fields are denormalized into the order at creation time
    /// - Orders start with `status = payment_confirmed` and `fulfilled = false`
    pub async fn create(&self, plan_code: &str, express: bool) -> Result<Order, ApiError> {
        let plan = self
            .catalog
            .resolve(plan_code)
            .ok_or_else(|| ApiError::InvalidPlan(plan_code.to_string()))?;

        let order = Order {
            order_id: next_order_id(),
            plan: plan.code.clone(),
            plan_name: plan.display_name.clone(),
            price: plan.price.clone(),
            delivery: plan.delivery_sla.clone(),
            express,
            status: OrderStatus::PaymentConfirmed,
            fulfilled: false,
            fulfilled_at: None,
            created_at: Utc::now(),
            contact_channel: self.contact_channel.clone(),
        };

        self.store.insert(&order).await?;

        tracing::info!("Order created successfully: {}", order.order_id);
        Ok(order)
    }

    /// Mark an order as fulfilled
    ///
    /// Idempotent at the level of outcome: a repeat call succeeds and leaves
    /// the original `fulfilled_at` untouched (the store fixes the timestamp
    /// on the first transition only).
    pub async fn fulfill(&self, order_id: &str) -> Result<Order, ApiError> {
        let matched = self.store.update_fulfillment(order_id, Utc::now()).await?;
        if matched == 0 {
            return Err(ApiError::OrderNotFound);
        }

        tracing::info!("Order {} marked as fulfilled", order_id);

        self.store
            .get_by_id(order_id)
            .await?
            .ok_or(ApiError::OrderNotFound)
    }

    /// Get an order by id
    pub async fn get(&self, order_id: &str) -> Result<Order, ApiError> {
        self.store
            .get_by_id(order_id)
            .await?
            .ok_or(ApiError::OrderNotFound)
    }

    /// List orders newest-first, filtered and truncated to `limit`
    pub async fn list(&self, filter: &OrderFilter, limit: i64) -> Result<Vec<Order>, ApiError> {
        self.store.list(filter, limit).await
    }
}
