use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::RecipeStore,
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::providers::RecipeProvider,
};

pub mod favorites;
pub mod generate;
pub mod ratings;
pub mod recipes;
pub mod recommendations;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecipeStore>,
    pub provider: Arc<dyn RecipeProvider>,
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(recipes::list).post(recipes::create))
        .route("/recipes/:id", get(recipes::get_by_id))
        .route("/recipes/:id/ratings", post(ratings::rate))
        .route(
            "/recipes/:id/favorite",
            put(favorites::add).delete(favorites::remove),
        )
        .route("/users/:user_id/favorites", get(favorites::list_for_user))
        .route("/recommendations", get(recommendations::feed))
        .route("/generate", post(generate::generate))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
