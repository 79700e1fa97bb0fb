use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::Recipe,
    routes::AppState,
    services::recommendations::{self, DEFAULT_LIMIT},
};

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub user_id: Uuid,
    pub limit: Option<usize>,
}

/// Handler for the personalized recommendation feed
pub async fn feed(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<FeedQuery>,
) -> AppResult<Json<Vec<Recipe>>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);

    tracing::info!(
        request_id = %request_id,
        user_id = %params.user_id,
        limit,
        "Processing recommendation request"
    );

    let feed = recommendations::personal_feed(state.store.clone(), params.user_id, limit).await?;

    tracing::info!(
        request_id = %request_id,
        results = feed.len(),
        "Recommendation feed built"
    );

    Ok(Json(feed))
}
