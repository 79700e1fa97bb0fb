use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};
use uuid::Uuid;

use crate::{
    db::store::RecipeStore,
    error::{AppError, AppResult},
    models::{Difficulty, Favorite, Nutrition, Rating, RatingSummary, Recipe},
};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Postgres-backed recipe store
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Flat row shape for the recipes table
///
/// Nutrition lives in four nullable columns; a recipe carries a nutrition
/// record only when all four are present.
#[derive(Debug, FromRow)]
struct RecipeRow {
    id: Uuid,
    name: String,
    description: String,
    ingredients: Vec<String>,
    instructions: Vec<String>,
    calories: Option<f64>,
    protein: Option<f64>,
    carbs: Option<f64>,
    fat: Option<f64>,
    cuisine: Option<String>,
    tags: Vec<String>,
    difficulty: Option<String>,
    total_time: Option<String>,
    servings: Option<i32>,
    avg_rating: f64,
    ratings_count: i64,
    created_at: DateTime<Utc>,
}

impl From<RecipeRow> for Recipe {
    fn from(row: RecipeRow) -> Self {
        let nutrition = match (row.calories, row.protein, row.carbs, row.fat) {
            (Some(calories), Some(protein), Some(carbs), Some(fat)) => Some(Nutrition {
                calories,
                protein,
                carbs,
                fat,
            }),
            _ => None,
        };

        Recipe {
            id: row.id,
            name: row.name,
            description: row.description,
            ingredients: row.ingredients,
            instructions: row.instructions,
            nutrition,
            cuisine: row.cuisine,
            tags: row.tags,
            difficulty: row.difficulty.as_deref().and_then(Difficulty::parse),
            total_time: row.total_time,
            servings: row.servings,
            avg_rating: row.avg_rating,
            ratings_count: row.ratings_count,
            created_at: row.created_at,
        }
    }
}

const RECIPE_COLUMNS: &str = "id, name, description, ingredients, instructions, \
     calories, protein, carbs, fat, cuisine, tags, difficulty, total_time, \
     servings, avg_rating, ratings_count, created_at";

#[async_trait::async_trait]
impl RecipeStore for PostgresStore {
    async fn insert_recipe(&self, recipe: Recipe) -> AppResult<Recipe> {
        let (calories, protein, carbs, fat) = match recipe.nutrition {
            Some(n) => (Some(n.calories), Some(n.protein), Some(n.carbs), Some(n.fat)),
            None => (None, None, None, None),
        };

        sqlx::query(
            "INSERT INTO recipes (id, name, description, ingredients, instructions, \
             calories, protein, carbs, fat, cuisine, tags, difficulty, total_time, \
             servings, avg_rating, ratings_count, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)",
        )
        .bind(recipe.id)
        .bind(&recipe.name)
        .bind(&recipe.description)
        .bind(&recipe.ingredients)
        .bind(&recipe.instructions)
        .bind(calories)
        .bind(protein)
        .bind(carbs)
        .bind(fat)
        .bind(&recipe.cuisine)
        .bind(&recipe.tags)
        .bind(recipe.difficulty.map(|d| d.as_str()))
        .bind(&recipe.total_time)
        .bind(recipe.servings)
        .bind(recipe.avg_rating)
        .bind(recipe.ratings_count)
        .bind(recipe.created_at)
        .execute(&self.pool)
        .await?;

        Ok(recipe)
    }

    async fn get_recipe(&self, id: Uuid) -> AppResult<Option<Recipe>> {
        let row = sqlx::query_as::<_, RecipeRow>(&format!(
            "SELECT {} FROM recipes WHERE id = $1",
            RECIPE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Recipe::from))
    }

    async fn list_recipes(&self) -> AppResult<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, RecipeRow>(&format!(
            "SELECT {} FROM recipes ORDER BY created_at, id",
            RECIPE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Recipe::from).collect())
    }

    async fn recipes_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Recipe>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, RecipeRow>(&format!(
            "SELECT {} FROM recipes WHERE id = ANY($1) ORDER BY created_at, id",
            RECIPE_COLUMNS
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Recipe::from).collect())
    }

    async fn record_rating(&self, rating: Rating) -> AppResult<RatingSummary> {
        // Upsert and aggregate recompute run in one transaction so the stored
        // recipe always reflects the current average of all its ratings.
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO ratings (user_id, recipe_id, rating) VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, recipe_id) DO UPDATE SET rating = EXCLUDED.rating",
        )
        .bind(rating.user_id)
        .bind(rating.recipe_id)
        .bind(rating.rating)
        .execute(&mut *tx)
        .await?;

        let summary = sqlx::query_as::<_, (f64, i64)>(
            "UPDATE recipes SET avg_rating = s.avg, ratings_count = s.cnt \
             FROM (SELECT COALESCE(AVG(rating)::float8, 0) AS avg, COUNT(*) AS cnt \
                   FROM ratings WHERE recipe_id = $1) AS s \
             WHERE id = $1 \
             RETURNING avg_rating, ratings_count",
        )
        .bind(rating.recipe_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Recipe {} not found", rating.recipe_id)))?;

        tx.commit().await?;

        Ok(RatingSummary {
            avg_rating: summary.0,
            ratings_count: summary.1,
        })
    }

    async fn ratings_for_user(&self, user_id: Uuid) -> AppResult<Vec<Rating>> {
        let rows = sqlx::query_as::<_, (Uuid, Uuid, i16)>(
            "SELECT user_id, recipe_id, rating FROM ratings WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(user_id, recipe_id, rating)| Rating {
                user_id,
                recipe_id,
                rating,
            })
            .collect())
    }

    async fn add_favorite(&self, favorite: Favorite) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO favorites (user_id, recipe_id) VALUES ($1, $2) \
             ON CONFLICT (user_id, recipe_id) DO NOTHING",
        )
        .bind(favorite.user_id)
        .bind(favorite.recipe_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove_favorite(&self, favorite: Favorite) -> AppResult<()> {
        sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND recipe_id = $2")
            .bind(favorite.user_id)
            .bind(favorite.recipe_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn favorites_for_user(&self, user_id: Uuid) -> AppResult<Vec<Favorite>> {
        let rows = sqlx::query_as::<_, (Uuid, Uuid)>(
            "SELECT user_id, recipe_id FROM favorites WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(user_id, recipe_id)| Favorite { user_id, recipe_id })
            .collect())
    }
}
