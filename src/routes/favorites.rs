use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Favorite, Recipe},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct FavoriteRequest {
    pub user_id: Uuid,
}

/// Handler for favoriting a recipe; idempotent
pub async fn add(
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
    Json(request): Json<FavoriteRequest>,
) -> AppResult<StatusCode> {
    if state.store.get_recipe(recipe_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Recipe {} not found", recipe_id)));
    }

    state
        .store
        .add_favorite(Favorite {
            user_id: request.user_id,
            recipe_id,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for unfavoriting a recipe; idempotent
pub async fn remove(
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
    Json(request): Json<FavoriteRequest>,
) -> AppResult<StatusCode> {
    state
        .store
        .remove_favorite(Favorite {
            user_id: request.user_id,
            recipe_id,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for listing a user's favorited recipes
pub async fn list_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<Vec<Recipe>>> {
    let favorites = state.store.favorites_for_user(user_id).await?;
    let ids: Vec<Uuid> = favorites.iter().map(|f| f.recipe_id).collect();
    let recipes = state.store.recipes_by_ids(&ids).await?;
    Ok(Json(recipes))
}
