use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{error::AppResult, models::RatingSummary, routes::AppState, services::ratings};

#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub user_id: Uuid,
    pub rating: i16,
}

/// Handler for rating a recipe
///
/// Returns the recipe's refreshed aggregates so clients can update their
/// display without a second fetch.
pub async fn rate(
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
    Json(request): Json<RateRequest>,
) -> AppResult<Json<RatingSummary>> {
    let summary =
        ratings::rate_recipe(state.store.clone(), recipe_id, request.user_id, request.rating)
            .await?;
    Ok(Json(summary))
}
