use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::RecipeStore,
    error::{AppError, AppResult},
    models::{Rating, RatingSummary},
};

/// Records one user's rating of one recipe
///
/// Validates the 1-5 range, rejects unknown recipes, then upserts the
/// rating. The store refreshes the recipe's rolling aggregates in the same
/// write, so the returned summary is never stale.
pub async fn rate_recipe(
    store: Arc<dyn RecipeStore>,
    recipe_id: Uuid,
    user_id: Uuid,
    rating: i16,
) -> AppResult<RatingSummary> {
    if !(1..=5).contains(&rating) {
        return Err(AppError::InvalidInput(format!(
            "Rating must be between 1 and 5, got {}",
            rating
        )));
    }

    if store.get_recipe(recipe_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Recipe {} not found", recipe_id)));
    }

    let summary = store
        .record_rating(Rating {
            user_id,
            recipe_id,
            rating,
        })
        .await?;

    tracing::info!(
        recipe_id = %recipe_id,
        user_id = %user_id,
        rating,
        avg_rating = summary.avg_rating,
        ratings_count = summary.ratings_count,
        "Rating recorded"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MockRecipeStore;
    use crate::models::{Recipe, RecipeDraft};

    fn stored_recipe() -> Recipe {
        Recipe::from_draft(RecipeDraft {
            name: "Ratatouille".to_string(),
            description: String::new(),
            ingredients: vec!["eggplant".to_string()],
            instructions: Vec::new(),
            nutrition: None,
            cuisine: None,
            tags: Vec::new(),
            difficulty: None,
            total_time: None,
            servings: None,
        })
    }

    #[tokio::test]
    async fn test_out_of_range_rating_never_touches_store() {
        let mut store = MockRecipeStore::new();
        store.expect_get_recipe().never();
        store.expect_record_rating().never();

        let store: Arc<dyn RecipeStore> = Arc::new(store);
        for value in [0, 6, -1] {
            let result = rate_recipe(store.clone(), Uuid::new_v4(), Uuid::new_v4(), value).await;
            assert!(matches!(result, Err(AppError::InvalidInput(_))));
        }
    }

    #[tokio::test]
    async fn test_unknown_recipe_is_not_found() {
        let mut store = MockRecipeStore::new();
        store.expect_get_recipe().returning(|_| Ok(None));
        store.expect_record_rating().never();

        let result = rate_recipe(Arc::new(store), Uuid::new_v4(), Uuid::new_v4(), 4).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_valid_rating_returns_refreshed_summary() {
        let recipe = stored_recipe();
        let recipe_id = recipe.id;

        let mut store = MockRecipeStore::new();
        store
            .expect_get_recipe()
            .returning(move |_| Ok(Some(recipe.clone())));
        store.expect_record_rating().returning(|rating| {
            Ok(RatingSummary {
                avg_rating: f64::from(rating.rating),
                ratings_count: 1,
            })
        });

        let summary = rate_recipe(Arc::new(store), recipe_id, Uuid::new_v4(), 5)
            .await
            .unwrap();

        assert_eq!(summary.avg_rating, 5.0);
        assert_eq!(summary.ratings_count, 1);
    }
}
