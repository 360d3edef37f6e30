mod catalog;
mod db;
mod error;
mod orders;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use catalog::{PlanCatalog, PlanDefinition};
use orders::{
    CreateOrderRequest, FulfillResponse, HealthResponse, ListOrdersResponse, Order,
    OrderCreatedResponse, OrderService, OrderStatus, OrderStore, PgOrderStore, StatsAggregator,
    StatsSummary,
};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        orders::handlers::create_order,
        orders::handlers::get_order,
        orders::handlers::fulfill_order,
        orders::handlers::list_orders,
        orders::handlers::get_stats,
        orders::handlers::health_check,
    ),
    components(
        schemas(
            CreateOrderRequest,
            Order,
            OrderStatus,
            OrderCreatedResponse,
            FulfillResponse,
            ListOrdersResponse,
            StatsSummary,
            HealthResponse,
            PlanDefinition,
        )
    ),
    tags(
        (name = "orders", description = "Order lifecycle and query endpoints"),
        (name = "stats", description = "Order statistics"),
        (name = "health", description = "Service health")
    ),
    info(
        title = "SongSnaps API",
        version = "1.0.0",
        description = "Order intake service for SongSnaps custom song deliveries"
    )
)]
struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn OrderStore>,
    pub service: OrderService,
    pub stats: StatsAggregator,
}

impl AppState {
    /// Wire the lifecycle service and stats aggregator around one store
    pub fn new(store: Arc<dyn OrderStore>, catalog: PlanCatalog, contact_channel: String) -> Self {
        let catalog = Arc::new(catalog);
        let service = OrderService::new(store.clone(), catalog.clone(), contact_channel);
        let stats = StatsAggregator::new(store.clone(), catalog);
        Self {
            store,
            service,
            stats,
        }
    }
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers and adds CORS middleware
pub fn create_router(state: AppState) -> Router {
    use tower_http::cors::{Any, CorsLayer};

    // Wide-open CORS: the ordering page is served from a separate origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // API routes
        .route("/", get(orders::root))
        .route("/health", get(orders::health_check))
        .route("/orders", post(orders::create_order))
        .route("/orders", get(orders::list_orders))
        .route("/orders/:order_id", get(orders::get_order))
        .route("/orders/:order_id/fulfill", put(orders::fulfill_order))
        .route("/stats", get(orders::get_stats))
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("SongSnaps API - Starting...");

    // Get configuration from environment variables
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set in environment");
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8001".to_string());
    let contact_channel =
        std::env::var("CONTACT_CHANNEL").unwrap_or_else(|_| "+1234567890".to_string());

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&database_url)
        .await
        .expect("Failed to create database pool");

    // Run SQLx migrations on startup
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations completed successfully");

    // Build application state with an explicitly injected store
    let store: Arc<dyn OrderStore> = Arc::new(PgOrderStore::new(db_pool));
    let state = AppState::new(store, PlanCatalog::standard(), contact_channel);

    // Create the application router
    let app = create_router(state);

    // Start the Axum server
    let addr = format!("{}:{}", host, port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("SongSnaps API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await.expect("Server error");
}
