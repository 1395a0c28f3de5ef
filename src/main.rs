use std::str::FromStr;

use axum::{Json, Router, debug_handler, routing::get};
use moviequeue::{AppState, db, queues, users};
use serde_json::{Value, json};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let db_pool = SqlitePoolOptions::new()
        .max_connections(16)
        .connect_with(
            SqliteConnectOptions::from_str(&dotenv::var("DATABASE_URL")?)?.create_if_missing(true),
        )
        .await?;
    db::apply_schema(&db_pool).await?;

    let app_state = AppState { db_pool };
    let app = Router::new()
        .route("/", get(root))
        .nest("/api/v1", users::router().merge(queues::router()))
        .with_state(app_state)
        .layer(CorsLayer::permissive());

    let addr = dotenv::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_owned());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "movie queue api listening");
    axum::serve(listener, app).await?;
    Ok(())
}

#[debug_handler]
async fn root() -> Json<Value> {
    Json(json!({
        "message": "Movie Queue API",
        "versions": [1],
    }))
}
