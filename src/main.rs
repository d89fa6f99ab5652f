use axum::{routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use ebank_api::database::manager::DatabaseManager;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, EBANK_DB_NAME, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = ebank_api::config::config();
    tracing::info!("Starting eBank API in {:?} mode", config.environment);

    // Connect (and create tables) up front so the first request doesn't pay
    // for it; a failure here is not fatal since the pool is created lazily
    // and /health reports the degraded state
    if let Err(e) = DatabaseManager::pool().await {
        tracing::warn!("database not reachable at startup: {}", e);
    }

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("EBANK_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("eBank API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

fn app() -> Router {
    let mut app = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Domain routes
        .merge(customer_routes())
        .merge(account_routes())
        .merge(operation_routes())
        // Global middleware
        .layer(CorsLayer::permissive());

    if ebank_api::config::config().api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    app
}

fn customer_routes() -> Router {
    use ebank_api::handlers::customers;

    Router::new()
        .route(
            "/customers",
            get(customers::customer_list).post(customers::customer_post),
        )
        .route(
            "/customers/:id",
            get(customers::customer_get)
                .put(customers::customer_put)
                .delete(customers::customer_delete),
        )
}

fn account_routes() -> Router {
    use axum::routing::post;
    use ebank_api::handlers::accounts;

    Router::new()
        .route("/accounts", get(accounts::account_list))
        .route("/accounts/:id", get(accounts::account_get))
        // Account opening, one route per variant
        .route("/accounts/current", post(accounts::current_account_post))
        .route("/accounts/saving", post(accounts::saving_account_post))
        // Balance mutations
        .route("/accounts/debit", post(accounts::debit_post))
        .route("/accounts/credit", post(accounts::credit_post))
        .route("/accounts/transfer", post(accounts::transfer_post))
}

fn operation_routes() -> Router {
    use ebank_api::handlers::operations;

    Router::new()
        .route("/accounts/:id/operations", get(operations::operations_get))
        .route(
            "/accounts/:id/pageOperations",
            get(operations::page_operations_get),
        )
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "eBank API",
            "version": version,
            "description": "Layered e-banking REST backend built with Rust (Axum)",
            "endpoints": {
                "home": "/",
                "health": "/health",
                "customers": "/customers[/:id]",
                "accounts": "/accounts[/:id], /accounts/current, /accounts/saving",
                "operations": "/accounts/debit, /accounts/credit, /accounts/transfer",
                "history": "/accounts/:id/operations, /accounts/:id/pageOperations?page=&size=",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
