use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::RecipeStore,
    error::AppResult,
    models::{Rating, Recipe},
    services::profile::{build_profile, NutritionBand, PreferenceProfile},
};

/// Feed length when the request does not name one
pub const DEFAULT_LIMIT: usize = 12;

// Hand-picked scoring weights. Ingredient match is the strongest taste
// signal; cuisine and tags are secondary; difficulty is a mild comfort-level
// signal. Tune here without touching the scoring shape.
const INGREDIENT_WEIGHT: f64 = 2.0;
const CUISINE_WEIGHT: f64 = 1.5;
const DIFFICULTY_WEIGHT: f64 = 1.2;
const TAG_WEIGHT: f64 = 1.3;
const NUTRITION_WEIGHT: f64 = 0.5;
const POPULARITY_WEIGHT: f64 = 0.5;

/// Ranks candidate recipes for a user's recommendation feed
///
/// Candidates already rated or favorited are excluded. A user with no
/// interaction history at all gets the global trending order instead of a
/// scored ranking. Ties break on recipe id so identical inputs always
/// produce identical orderings.
pub fn recommend(
    interacted: &[Recipe],
    ratings: &[Rating],
    candidates: Vec<Recipe>,
    limit: usize,
) -> Vec<Recipe> {
    if interacted.is_empty() && ratings.is_empty() {
        return trending(candidates, limit);
    }

    let seen: HashSet<Uuid> = interacted
        .iter()
        .map(|r| r.id)
        .chain(ratings.iter().map(|r| r.recipe_id))
        .collect();

    let profile = build_profile(interacted, ratings);

    let mut scored: Vec<(f64, Recipe)> = candidates
        .into_iter()
        .filter(|candidate| !seen.contains(&candidate.id))
        .map(|candidate| (score_candidate(&profile, &candidate), candidate))
        .collect();

    scored.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.1.id.cmp(&b.1.id))
    });

    scored
        .into_iter()
        .take(limit)
        .map(|(_, recipe)| recipe)
        .collect()
}

/// Global trending order: best average rating first, then rating count,
/// then id
pub fn trending(mut recipes: Vec<Recipe>, limit: usize) -> Vec<Recipe> {
    recipes.sort_by(|a, b| {
        b.avg_rating
            .partial_cmp(&a.avg_rating)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.ratings_count.cmp(&a.ratings_count))
            .then_with(|| a.id.cmp(&b.id))
    });
    recipes.truncate(limit);
    recipes
}

/// Scores one candidate against a preference profile; higher is better
///
/// Contributions are strictly additive. Keys absent from a profile map
/// count as weight zero.
fn score_candidate(profile: &PreferenceProfile, candidate: &Recipe) -> f64 {
    let mut score = 0.0;

    let ingredient_overlap: f64 = candidate
        .ingredients
        .iter()
        .map(|name| profile.ingredients.get(name).copied().unwrap_or(0.0))
        .sum();
    score += ingredient_overlap * INGREDIENT_WEIGHT;

    if let Some(cuisine) = &candidate.cuisine {
        score += profile.cuisines.get(cuisine).copied().unwrap_or(0.0) * CUISINE_WEIGHT;
    }

    if let Some(difficulty) = candidate.difficulty {
        score += profile
            .difficulties
            .get(&difficulty)
            .copied()
            .unwrap_or(0.0)
            * DIFFICULTY_WEIGHT;
    }

    let tag_overlap: f64 = candidate
        .tags
        .iter()
        .map(|tag| profile.tags.get(tag).copied().unwrap_or(0.0))
        .sum();
    score += tag_overlap * TAG_WEIGHT;

    if let Some(nutrition) = candidate.nutrition {
        score += band_closeness(&profile.calories, nutrition.calories);
        score += band_closeness(&profile.protein, nutrition.protein);
        score += band_closeness(&profile.carbs, nutrition.carbs);
        score += band_closeness(&profile.fat, nutrition.fat);
    }

    // Popularity prior surfaces broadly-liked recipes absent personal signal
    if candidate.ratings_count > 0 {
        score +=
            (candidate.avg_rating / 5.0) * ((candidate.ratings_count as f64) + 1.0).ln()
                * POPULARITY_WEIGHT;
    }

    score
}

/// Closeness of one nutrition value to the profile band for that field
///
/// Zero when the band is degenerate (no interacted recipe carried the
/// field) or has zero range (every interacted value was identical, which is
/// not distinguishing). Never produces NaN or infinities.
fn band_closeness(band: &NutritionBand, value: f64) -> f64 {
    if band.avg <= 0.0 {
        return 0.0;
    }

    let range = band.max - band.min;
    if range <= 0.0 {
        return 0.0;
    }

    let diff = (value - band.avg).abs();
    (1.0 - diff / range) * NUTRITION_WEIGHT
}

/// Builds the recommendation feed for one user from stored interactions
///
/// The preference profile is rebuilt from scratch on every call and
/// discarded afterwards; nothing recommendation-related is cached.
pub async fn personal_feed(
    store: Arc<dyn RecipeStore>,
    user_id: Uuid,
    limit: usize,
) -> AppResult<Vec<Recipe>> {
    let ratings = store.ratings_for_user(user_id).await?;
    let favorites = store.favorites_for_user(user_id).await?;

    let mut interacted_ids: Vec<Uuid> = ratings
        .iter()
        .map(|r| r.recipe_id)
        .chain(favorites.iter().map(|f| f.recipe_id))
        .collect();
    interacted_ids.sort_unstable();
    interacted_ids.dedup();

    let candidates = store.list_recipes().await?;

    if interacted_ids.is_empty() {
        tracing::debug!(user_id = %user_id, "No interaction history, serving trending feed");
        return Ok(trending(candidates, limit));
    }

    let interacted = store.recipes_by_ids(&interacted_ids).await?;

    tracing::debug!(
        user_id = %user_id,
        interacted = interacted.len(),
        candidates = candidates.len(),
        "Scoring recommendation candidates"
    );

    Ok(recommend(&interacted, &ratings, candidates, limit))
}
