use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value, json};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};

use crate::config::ServeConfig;

pub struct ServerState {
    pub menu_file: PathBuf,
    pub order_log: PathBuf,
    // Serialises appends so concurrent orders never interleave within a line.
    order_lock: Mutex<()>,
}

impl ServerState {
    pub fn new(menu_file: PathBuf, order_log: PathBuf) -> Self {
        Self {
            menu_file,
            order_log,
            order_lock: Mutex::new(()),
        }
    }
}

type SharedState = Arc<ServerState>;

async fn load_menu(path: &Path) -> anyhow::Result<Value> {
    let raw = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&raw)?)
}

pub async fn get_menu(Extension(state): Extension<SharedState>) -> impl IntoResponse {
    tracing::debug!("reading menu from {}", state.menu_file.display());
    match load_menu(&state.menu_file).await {
        Ok(menu) => {
            let count = menu.as_array().map_or(0, Vec::len);
            tracing::info!(items = count, "menu data loaded");
            Json(menu).into_response()
        }
        Err(err) => {
            tracing::error!("error reading menu: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to load menu" })),
            )
                .into_response()
        }
    }
}

/// Stamps an order with the time it was received. Keys sent by the client
/// take precedence, including `timestamp`.
pub fn stamp_order(order: Map<String, Value>) -> Map<String, Value> {
    let mut record = Map::new();
    record.insert(
        "timestamp".to_string(),
        Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    record.extend(order);
    record
}

async fn append_order(state: &ServerState, record: &Map<String, Value>) -> anyhow::Result<()> {
    let mut line = serde_json::to_string(record)?;
    line.push('\n');

    let _guard = state.order_lock.lock().await;
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&state.order_log)
        .await?;
    file.write_all(line.as_bytes()).await?;
    file.flush().await?;
    Ok(())
}

pub async fn post_order(
    Extension(state): Extension<SharedState>,
    Json(order): Json<Map<String, Value>>,
) -> impl IntoResponse {
    let record = stamp_order(order);
    match append_order(&state, &record).await {
        Ok(()) => {
            let order = Value::Object(record);
            tracing::info!(order = %order, "new order received");
            Json(json!({ "success": true, "message": "Order logged successfully" })).into_response()
        }
        Err(err) => {
            tracing::error!("error logging order: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to log order" })),
            )
                .into_response()
        }
    }
}

pub fn router(config: &ServeConfig) -> Router {
    let state: SharedState = Arc::new(ServerState::new(
        config.menu_file.clone(),
        config.order_log.clone(),
    ));
    let frontend = ServeDir::new(&config.static_dir)
        .fallback(ServeFile::new(config.static_dir.join("index.html")));

    Router::new()
        .route("/api/menu", get(get_menu))
        .route("/api/order", post(post_order))
        .nest_service("/pdfs", ServeDir::new(&config.pdf_dir))
        .fallback_service(frontend)
        .layer(Extension(state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

pub async fn serve(config: &ServeConfig) -> anyhow::Result<()> {
    let app = router(config);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!("menu server running on port {}", config.port);
    println!("API available at http://localhost:{}/api", config.port);
    axum::serve(listener, app).await?;
    Ok(())
}
