use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Favorite, Rating, RatingSummary, Recipe},
};

/// Storage abstraction for recipes, ratings and favorites
///
/// Handlers and services depend on this trait rather than a concrete
/// backend. Production uses the Postgres implementation; the in-memory
/// implementation backs the integration test suite.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecipeStore: Send + Sync {
    /// Persists a recipe and returns the stored record
    async fn insert_recipe(&self, recipe: Recipe) -> AppResult<Recipe>;

    /// Fetches one recipe by id
    async fn get_recipe(&self, id: Uuid) -> AppResult<Option<Recipe>>;

    /// Lists every stored recipe in a stable order (creation time, then id)
    async fn list_recipes(&self) -> AppResult<Vec<Recipe>>;

    /// Fetches the recipes matching the given ids; unknown ids are skipped
    async fn recipes_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Recipe>>;

    /// Upserts a rating and refreshes the owning recipe's rolling aggregates
    ///
    /// Re-rating the same (user, recipe) pair overwrites the previous value.
    /// The refreshed aggregates are returned so callers never read a stale
    /// average.
    async fn record_rating(&self, rating: Rating) -> AppResult<RatingSummary>;

    /// All ratings made by one user
    async fn ratings_for_user(&self, user_id: Uuid) -> AppResult<Vec<Rating>>;

    /// Adds a favorite; adding an existing favorite is a no-op
    async fn add_favorite(&self, favorite: Favorite) -> AppResult<()>;

    /// Removes a favorite; removing an absent favorite is a no-op
    async fn remove_favorite(&self, favorite: Favorite) -> AppResult<()>;

    /// All favorites held by one user
    async fn favorites_for_user(&self, user_id: Uuid) -> AppResult<Vec<Favorite>>;
}
