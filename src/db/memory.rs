use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    db::store::RecipeStore,
    error::{AppError, AppResult},
    models::{Favorite, Rating, RatingSummary, Recipe},
};

/// In-memory recipe store
///
/// Keeps the same contract as the Postgres store without external
/// infrastructure. Backs the integration test suite and local demos.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    recipes: HashMap<Uuid, Recipe>,
    /// (user_id, recipe_id) -> rating value
    ratings: HashMap<(Uuid, Uuid), i16>,
    favorites: HashSet<(Uuid, Uuid)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl RecipeStore for MemoryStore {
    async fn insert_recipe(&self, recipe: Recipe) -> AppResult<Recipe> {
        let mut inner = self.inner.write().await;
        inner.recipes.insert(recipe.id, recipe.clone());
        Ok(recipe)
    }

    async fn get_recipe(&self, id: Uuid) -> AppResult<Option<Recipe>> {
        let inner = self.inner.read().await;
        Ok(inner.recipes.get(&id).cloned())
    }

    async fn list_recipes(&self) -> AppResult<Vec<Recipe>> {
        let inner = self.inner.read().await;
        let mut recipes: Vec<Recipe> = inner.recipes.values().cloned().collect();
        // Match the Postgres ordering so feeds stay stable across backends
        recipes.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(recipes)
    }

    async fn recipes_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Recipe>> {
        let inner = self.inner.read().await;
        let mut recipes: Vec<Recipe> = ids
            .iter()
            .filter_map(|id| inner.recipes.get(id).cloned())
            .collect();
        recipes.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(recipes)
    }

    async fn record_rating(&self, rating: Rating) -> AppResult<RatingSummary> {
        let mut inner = self.inner.write().await;

        if !inner.recipes.contains_key(&rating.recipe_id) {
            return Err(AppError::NotFound(format!(
                "Recipe {} not found",
                rating.recipe_id
            )));
        }

        inner
            .ratings
            .insert((rating.user_id, rating.recipe_id), rating.rating);

        let values: Vec<i16> = inner
            .ratings
            .iter()
            .filter(|((_, recipe_id), _)| *recipe_id == rating.recipe_id)
            .map(|(_, value)| *value)
            .collect();

        let ratings_count = values.len() as i64;
        let avg_rating = if values.is_empty() {
            0.0
        } else {
            f64::from(values.iter().map(|v| i32::from(*v)).sum::<i32>()) / ratings_count as f64
        };

        if let Some(recipe) = inner.recipes.get_mut(&rating.recipe_id) {
            recipe.avg_rating = avg_rating;
            recipe.ratings_count = ratings_count;
        }

        Ok(RatingSummary {
            avg_rating,
            ratings_count,
        })
    }

    async fn ratings_for_user(&self, user_id: Uuid) -> AppResult<Vec<Rating>> {
        let inner = self.inner.read().await;
        Ok(inner
            .ratings
            .iter()
            .filter(|((user, _), _)| *user == user_id)
            .map(|((user_id, recipe_id), rating)| Rating {
                user_id: *user_id,
                recipe_id: *recipe_id,
                rating: *rating,
            })
            .collect())
    }

    async fn add_favorite(&self, favorite: Favorite) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner.favorites.insert((favorite.user_id, favorite.recipe_id));
        Ok(())
    }

    async fn remove_favorite(&self, favorite: Favorite) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner.favorites.remove(&(favorite.user_id, favorite.recipe_id));
        Ok(())
    }

    async fn favorites_for_user(&self, user_id: Uuid) -> AppResult<Vec<Favorite>> {
        let inner = self.inner.read().await;
        Ok(inner
            .favorites
            .iter()
            .filter(|(user, _)| *user == user_id)
            .map(|(user_id, recipe_id)| Favorite {
                user_id: *user_id,
                recipe_id: *recipe_id,
            })
            .collect())
    }
}
