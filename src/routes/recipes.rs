use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Recipe, RecipeDraft},
    routes::AppState,
};

/// Handler for listing all stored recipes
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Recipe>>> {
    let recipes = state.store.list_recipes().await?;
    Ok(Json(recipes))
}

/// Handler for fetching a single recipe
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Recipe>> {
    state
        .store
        .get_recipe(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Recipe {} not found", id)))
}

/// Handler for saving a recipe draft
///
/// The draft may come from the generation flow or be hand-entered; either
/// way it is persisted verbatim with fresh identity and zeroed aggregates.
pub async fn create(
    State(state): State<AppState>,
    Json(draft): Json<RecipeDraft>,
) -> AppResult<(StatusCode, Json<Recipe>)> {
    if draft.name.trim().is_empty() {
        return Err(AppError::InvalidInput("Recipe name is required".to_string()));
    }

    if draft.ingredients.iter().all(|i| i.trim().is_empty()) {
        return Err(AppError::InvalidInput(
            "At least one ingredient is required".to_string(),
        ));
    }

    let recipe = state.store.insert_recipe(Recipe::from_draft(draft)).await?;

    tracing::info!(recipe_id = %recipe.id, name = %recipe.name, "Recipe saved");

    Ok((StatusCode::CREATED, Json(recipe)))
}
