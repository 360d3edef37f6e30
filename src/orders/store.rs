// Order store contract and its PostgreSQL implementation.
// The store is an explicit, injected dependency so tests can substitute an
// in-memory implementation of the same contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::ApiError;
use crate::orders::models::Order;

/// Conjunctive predicate over order fields, used by list and count queries
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub fulfilled: Option<bool>,
    pub plan: Option<String>,
    pub express: Option<bool>,
}

impl OrderFilter {
    pub fn fulfilled(value: bool) -> Self {
        Self {
            fulfilled: Some(value),
            ..Self::default()
        }
    }

    pub fn plan(code: &str) -> Self {
        Self {
            plan: Some(code.to_string()),
            ..Self::default()
        }
    }

    pub fn express(value: bool) -> Self {
        Self {
            express: Some(value),
            ..Self::default()
        }
    }

    fn matches(&self, order: &Order) -> bool {
        self.fulfilled.map_or(true, |f| order.fulfilled == f)
            && self.plan.as_deref().map_or(true, |p| order.plan == p)
            && self.express.map_or(true, |e| order.express == e)
    }
}

/// Durable keyed collection of order records.
///
/// Semantics the lifecycle service relies on:
/// - `insert` enforces order id uniqueness; a duplicate is a hard failure,
///   never a silent overwrite
/// - `list` returns newest-creation-first, truncated to `limit`
/// - `update_fulfillment` is atomic per record and fixes `fulfilled_at` on
///   the first transition only; it returns the matched count (0 or 1)
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn insert(&self, order: &Order) -> Result<(), ApiError>;

    async fn get_by_id(&self, order_id: &str) -> Result<Option<Order>, ApiError>;

    async fn list(&self, filter: &OrderFilter, limit: i64) -> Result<Vec<Order>, ApiError>;

    async fn update_fulfillment(
        &self,
        order_id: &str,
        fulfilled_at: DateTime<Utc>,
    ) -> Result<u64, ApiError>;

    async fn count_where(&self, filter: &OrderFilter) -> Result<i64, ApiError>;

    /// Cheap connectivity probe for the health endpoint
    async fn ping(&self) -> Result<(), ApiError>;
}

/// PostgreSQL-backed order store
#[derive(Clone)]
pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const ORDER_COLUMNS: &str = "order_id, plan, plan_name, price, delivery, express, status, \
                             fulfilled, fulfilled_at, created_at, contact_channel";

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn insert(&self, order: &Order) -> Result<(), ApiError> {
        let result = sqlx::query(
            r#"
            INSERT INTO orders (order_id, plan, plan_name, price, delivery, express,
                                status, fulfilled, fulfilled_at, created_at, contact_channel)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(&order.order_id)
        .bind(&order.plan)
        .bind(&order.plan_name)
        .bind(&order.price)
        .bind(&order.delivery)
        .bind(order.express)
        .bind(order.status)
        .bind(order.fulfilled)
        .bind(order.fulfilled_at)
        .bind(order.created_at)
        .bind(&order.contact_channel)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(ApiError::DuplicateOrderId(order.order_id.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn get_by_id(&self, order_id: &str) -> Result<Option<Order>, ApiError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE order_id = $1"
        ))
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    async fn list(&self, filter: &OrderFilter, limit: i64) -> Result<Vec<Order>, ApiError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            r#"
            SELECT {ORDER_COLUMNS}
            FROM orders
            WHERE ($1::boolean IS NULL OR fulfilled = $1)
              AND ($2::text IS NULL OR plan = $2)
              AND ($3::boolean IS NULL OR express = $3)
            ORDER BY created_at DESC
            LIMIT $4
            "#
        ))
        .bind(filter.fulfilled)
        .bind(filter.plan.as_deref())
        .bind(filter.express)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    async fn update_fulfillment(
        &self,
        order_id: &str,
        fulfilled_at: DateTime<Utc>,
    ) -> Result<u64, ApiError> {
        // Single conditional write: racing fulfillment attempts converge on
        // the first writer's timestamp.
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET fulfilled = TRUE, fulfilled_at = COALESCE(fulfilled_at, $2)
            WHERE order_id = $1
            "#,
        )
        .bind(order_id)
        .bind(fulfilled_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn count_where(&self, filter: &OrderFilter) -> Result<i64, ApiError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM orders
            WHERE ($1::boolean IS NULL OR fulfilled = $1)
              AND ($2::text IS NULL OR plan = $2)
              AND ($3::boolean IS NULL OR express = $3)
            "#,
        )
        .bind(filter.fulfilled)
        .bind(filter.plan.as_deref())
        .bind(filter.express)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn ping(&self) -> Result<(), ApiError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}

/// In-memory order store implementing the same contract, for tests
#[cfg(test)]
pub struct MemoryOrderStore {
    orders: std::sync::Mutex<Vec<Order>>,
}

#[cfg(test)]
impl MemoryOrderStore {
    pub fn new() -> Self {
        Self {
            orders: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn insert(&self, order: &Order) -> Result<(), ApiError> {
        let mut orders = self.orders.lock().unwrap();
        if orders.iter().any(|o| o.order_id == order.order_id) {
            return Err(ApiError::DuplicateOrderId(order.order_id.clone()));
        }
        orders.push(order.clone());
        Ok(())
    }

    async fn get_by_id(&self, order_id: &str) -> Result<Option<Order>, ApiError> {
        let orders = self.orders.lock().unwrap();
        Ok(orders.iter().find(|o| o.order_id == order_id).cloned())
    }

    async fn list(&self, filter: &OrderFilter, limit: i64) -> Result<Vec<Order>, ApiError> {
        let orders = self.orders.lock().unwrap();
        // Insertion order is creation order, so newest-first is a reverse scan
        Ok(orders
            .iter()
            .rev()
            .filter(|o| filter.matches(o))
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn update_fulfillment(
        &self,
        order_id: &str,
        fulfilled_at: DateTime<Utc>,
    ) -> Result<u64, ApiError> {
        let mut orders = self.orders.lock().unwrap();
        match orders.iter_mut().find(|o| o.order_id == order_id) {
            Some(order) => {
                order.fulfilled = true;
                order.fulfilled_at.get_or_insert(fulfilled_at);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn count_where(&self, filter: &OrderFilter) -> Result<i64, ApiError> {
        let orders = self.orders.lock().unwrap();
        Ok(orders.iter().filter(|o| filter.matches(o)).count() as i64)
    }

    async fn ping(&self) -> Result<(), ApiError> {
        Ok(())
    }
}
