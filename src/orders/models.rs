use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Upstream payment state recorded at creation.
/// The core does not manage a payment lifecycle; orders only exist once
/// payment has been confirmed upstream, so this enum has a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    PaymentConfirmed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::PaymentConfirmed => "payment_confirmed",
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::PaymentConfirmed
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Domain model representing an order in the database.
///
/// Plan fields are a denormalized snapshot of the catalog entry at creation
/// time, so later catalog changes never retroactively alter historical
/// orders. After insert only `fulfilled`/`fulfilled_at` ever change.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,
    pub plan: String,
    pub plan_name: String,
    pub price: String,
    pub delivery: String,
    pub express: bool,
    pub status: OrderStatus,
    pub fulfilled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fulfilled_at: Option<DateTime<Utc>>,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
    pub contact_channel: String,
}

/// Request DTO for creating a new order
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, message = "Plan code must not be empty"))]
    pub plan: String,
    /// Legacy expedite flag, kept for backward compatibility
    #[serde(default)]
    pub express: bool,
}

/// Response DTO for a freshly created order
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreatedResponse {
    pub order_id: String,
    pub plan: String,
    pub express: bool,
    pub price: String,
    pub delivery: String,
    pub timestamp: DateTime<Utc>,
    pub contact_channel: String,
}

impl From<Order> for OrderCreatedResponse {
    fn from(order: Order) -> Self {
        Self {
            order_id: order.order_id,
            plan: order.plan,
            express: order.express,
            price: order.price,
            delivery: order.delivery,
            timestamp: order.created_at,
            contact_channel: order.contact_channel,
        }
    }
}

/// Response DTO for a fulfillment call
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FulfillResponse {
    pub message: String,
    pub order_id: String,
}

/// Query parameters for GET /orders
#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    pub limit: Option<i64>,
    pub fulfilled: Option<bool>,
    pub plan: Option<String>,
    pub express: Option<bool>,
}

/// Response DTO for GET /orders
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListOrdersResponse {
    pub orders: Vec<Order>,
    pub count: usize,
}

/// Response DTO for GET /health
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub database_status: String,
    pub timestamp: DateTime<Utc>,
}
