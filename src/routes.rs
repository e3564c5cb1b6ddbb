use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::classifier::Scene;
use crate::handlers;
use crate::state::AppState;

pub fn create_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/api/health", get(health_check))

        // REST API routes
        .route("/api/agent-chat", post(handlers::agent_chat))
        .route("/api/scenes", get(get_scenes))
}

/// Full application router with middleware and state attached.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(create_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn get_scenes(State(state): State<AppState>) -> Json<Vec<Scene>> {
    Json(state.catalog.scenes().to_vec())
}
