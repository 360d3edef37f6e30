// HTTP handlers for the order endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde_json::json;
use validator::Validate;

use crate::error::ApiError;
use crate::orders::models::{
    CreateOrderRequest, FulfillResponse, HealthResponse, ListOrdersQuery, ListOrdersResponse,
    Order, OrderCreatedResponse,
};
use crate::orders::stats::StatsSummary;
use crate::orders::store::OrderFilter;

/// Default page bound for GET /orders when the caller supplies none
const DEFAULT_LIST_LIMIT: i64 = 50;

/// Handler for GET /
/// Service banner used as a liveness probe
pub async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "message": "SongSnaps API is running",
        "status": "healthy",
    }))
}

/// Handler for POST /orders
/// Creates a new order for the submitted plan selection
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created successfully", body = OrderCreatedResponse),
        (status = 400, description = "Unknown plan code", body = String, example = json!({"error": "Invalid plan type: bogus"})),
        (status = 500, description = "Internal server error", body = String, example = json!({"error": "Internal server error"}))
    ),
    tag = "orders"
)]
pub async fn create_order(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderCreatedResponse>), ApiError> {
    tracing::debug!("Creating order for plan: {}", request.plan);

    request.validate()?;

    let order = state.service.create(&request.plan, request.express).await?;

    Ok((StatusCode::CREATED, Json(order.into())))
}

/// Handler for GET /orders/:order_id
/// Retrieves a specific order by its id
#[utoipa::path(
    get,
    path = "/orders/{order_id}",
    params(
        ("order_id" = String, Path, description = "Order identifier, e.g. SS-3F2A9B0C")
    ),
    responses(
        (status = 200, description = "Order found", body = Order),
        (status = 404, description = "Order not found", body = String, example = json!({"error": "Order not found"})),
        (status = 500, description = "Internal server error", body = String, example = json!({"error": "Internal server error"}))
    ),
    tag = "orders"
)]
pub async fn get_order(
    State(state): State<crate::AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    tracing::debug!("Fetching order: {}", order_id);

    let order = state.service.get(&order_id).await?;
    Ok(Json(order))
}

/// Handler for PUT /orders/:order_id/fulfill
/// Marks an order as fulfilled; idempotent on repeat calls
#[utoipa::path(
    put,
    path = "/orders/{order_id}/fulfill",
    params(
        ("order_id" = String, Path, description = "Order identifier")
    ),
    responses(
        (status = 200, description = "Order fulfilled", body = FulfillResponse),
        (status = 404, description = "Order not found", body = String, example = json!({"error": "Order not found"})),
        (status = 500, description = "Internal server error", body = String, example = json!({"error": "Internal server error"}))
    ),
    tag = "orders"
)]
pub async fn fulfill_order(
    State(state): State<crate::AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<FulfillResponse>, ApiError> {
    let order = state.service.fulfill(&order_id).await?;

    Ok(Json(FulfillResponse {
        message: "Order fulfilled successfully".to_string(),
        order_id: order.order_id,
    }))
}

/// Handler for GET /orders
/// Lists orders newest-first with optional fulfillment and plan filters
#[utoipa::path(
    get,
    path = "/orders",
    params(
        ("limit" = Option<i64>, Query, description = "Maximum number of orders to return (default 50)"),
        ("fulfilled" = Option<bool>, Query, description = "Filter by fulfillment state"),
        ("plan" = Option<String>, Query, description = "Filter by plan code"),
        ("express" = Option<bool>, Query, description = "Filter by the expedite flag")
    ),
    responses(
        (status = 200, description = "List of orders", body = ListOrdersResponse),
        (status = 400, description = "Invalid query parameters", body = String, example = json!({"error": "Limit must be a positive integer"})),
        (status = 500, description = "Internal server error", body = String, example = json!({"error": "Internal server error"}))
    ),
    tag = "orders"
)]
pub async fn list_orders(
    State(state): State<crate::AppState>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<ListOrdersResponse>, ApiError> {
    tracing::debug!("Listing orders with query: {:?}", query);

    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    if limit < 1 {
        return Err(ApiError::Validation(
            "Limit must be a positive integer".to_string(),
        ));
    }

    let filter = OrderFilter {
        fulfilled: query.fulfilled,
        plan: query.plan,
        express: query.express,
    };

    let orders = state.service.list(&filter, limit).await?;
    let count = orders.len();

    Ok(Json(ListOrdersResponse { orders, count }))
}

/// Handler for GET /stats
/// Live order statistics for operator monitoring
#[utoipa::path(
    get,
    path = "/stats",
    responses(
        (status = 200, description = "Current order statistics", body = StatsSummary),
        (status = 500, description = "Internal server error", body = String, example = json!({"error": "Internal server error"}))
    ),
    tag = "stats"
)]
pub async fn get_stats(
    State(state): State<crate::AppState>,
) -> Result<Json<StatsSummary>, ApiError> {
    let summary = state.stats.summarize().await?;
    Ok(Json(summary))
}

/// Handler for GET /health
/// Probes the order store and reports degraded status when it is unreachable
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse),
        (status = 500, description = "Store unreachable", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<crate::AppState>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy".to_string(),
                database_status: "connected".to_string(),
                timestamp: Utc::now(),
            }),
        ),
        Err(err) => {
            tracing::error!("Health check failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthResponse {
                    status: "degraded".to_string(),
                    database_status: "unreachable".to_string(),
                    timestamp: Utc::now(),
                }),
            )
        }
    }
}
