use axum::{extract::State, Json};
use serde::Deserialize;

use crate::{error::AppResult, models::RecipeDraft, routes::AppState, services::generation};

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Handler for the ingredient-to-recipes generation endpoint
///
/// Drafts are returned to the client unsaved; saving one goes through the
/// recipes create route.
pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> AppResult<Json<Vec<RecipeDraft>>> {
    let drafts =
        generation::generate_recipes(state.provider.clone(), request.ingredients, request.notes)
            .await?;
    Ok(Json(drafts))
}
