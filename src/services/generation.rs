use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::RecipeDraft,
    services::providers::RecipeProvider,
};

/// Service function for recipe generation
///
/// Normalizes the ingredient list, then delegates to the configured
/// provider, keeping HTTP routing separate from vendor logic.
pub async fn generate_recipes(
    provider: Arc<dyn RecipeProvider>,
    ingredients: Vec<String>,
    notes: Option<String>,
) -> AppResult<Vec<RecipeDraft>> {
    let ingredients: Vec<String> = ingredients
        .into_iter()
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
        .collect();

    if ingredients.is_empty() {
        return Err(AppError::InvalidInput(
            "At least one ingredient is required".to_string(),
        ));
    }

    provider.generate_recipes(&ingredients, notes.as_deref()).await
}
