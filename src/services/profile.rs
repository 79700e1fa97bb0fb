use std::collections::HashMap;

use uuid::Uuid;

use crate::models::{Difficulty, Rating, Recipe};

/// Weight contributed by a favorited-but-unrated recipe.
///
/// Fixed policy value, the midpoint of the 1-5 rating scale.
pub const FAVORITE_DEFAULT_WEIGHT: f64 = 3.0;

/// Running min/max/average band for one nutrition field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NutritionBand {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

impl Default for NutritionBand {
    fn default() -> Self {
        // Degenerate until at least one interacted recipe carries nutrition
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            avg: 0.0,
        }
    }
}

impl NutritionBand {
    fn observe(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }
}

/// Weighted summary of a user's rated and favorited recipes
///
/// Built fresh for every recommendation request and discarded afterwards,
/// so a rating made a moment ago shows up in the very next feed. Maps are
/// empty, never absent, for dimensions without history; consumers treat a
/// missing key as weight zero.
#[derive(Debug, Clone, Default)]
pub struct PreferenceProfile {
    pub ingredients: HashMap<String, f64>,
    pub cuisines: HashMap<String, f64>,
    pub difficulties: HashMap<Difficulty, f64>,
    pub tags: HashMap<String, f64>,
    pub calories: NutritionBand,
    pub protein: NutritionBand,
    pub carbs: NutritionBand,
    pub fat: NutritionBand,
}

/// Folds a user's interacted recipes into a preference profile
///
/// A recipe contributes its rating value when the user rated it, else the
/// neutral favorite default. Absent optional fields simply do not
/// contribute. Pure fold over in-memory data; a null recipe here is a
/// caller contract violation, not a recoverable condition.
pub fn build_profile(interacted: &[Recipe], ratings: &[Rating]) -> PreferenceProfile {
    let rated: HashMap<Uuid, f64> = ratings
        .iter()
        .map(|r| (r.recipe_id, f64::from(r.rating)))
        .collect();

    let mut profile = PreferenceProfile::default();
    let mut sums = [0.0_f64; 4];
    let mut with_nutrition = 0_u32;

    for recipe in interacted {
        let weight = rated
            .get(&recipe.id)
            .copied()
            .unwrap_or(FAVORITE_DEFAULT_WEIGHT);

        // A repeated ingredient name counts once per listing
        for ingredient in &recipe.ingredients {
            *profile.ingredients.entry(ingredient.clone()).or_insert(0.0) += weight;
        }

        if let Some(cuisine) = &recipe.cuisine {
            *profile.cuisines.entry(cuisine.clone()).or_insert(0.0) += weight;
        }

        if let Some(difficulty) = recipe.difficulty {
            *profile.difficulties.entry(difficulty).or_insert(0.0) += weight;
        }

        for tag in &recipe.tags {
            *profile.tags.entry(tag.clone()).or_insert(0.0) += weight;
        }

        if let Some(nutrition) = recipe.nutrition {
            profile.calories.observe(nutrition.calories);
            profile.protein.observe(nutrition.protein);
            profile.carbs.observe(nutrition.carbs);
            profile.fat.observe(nutrition.fat);
            sums[0] += nutrition.calories;
            sums[1] += nutrition.protein;
            sums[2] += nutrition.carbs;
            sums[3] += nutrition.fat;
            with_nutrition += 1;
        }
    }

    if with_nutrition > 0 {
        let count = f64::from(with_nutrition);
        profile.calories.avg = sums[0] / count;
        profile.protein.avg = sums[1] / count;
        profile.carbs.avg = sums[2] / count;
        profile.fat.avg = sums[3] / count;
    }

    profile
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Nutrition;
    use chrono::Utc;

    fn recipe(id: u128) -> Recipe {
        Recipe {
            id: Uuid::from_u128(id),
            name: format!("recipe-{}", id),
            description: String::new(),
            ingredients: Vec::new(),
            instructions: Vec::new(),
            nutrition: None,
            cuisine: None,
            tags: Vec::new(),
            difficulty: None,
            total_time: None,
            servings: None,
            avg_rating: 0.0,
            ratings_count: 0,
            created_at: Utc::now(),
        }
    }

    fn rating(recipe_id: u128, value: i16) -> Rating {
        Rating {
            user_id: Uuid::from_u128(999),
            recipe_id: Uuid::from_u128(recipe_id),
            rating: value,
        }
    }

    #[test]
    fn test_empty_history_yields_empty_profile() {
        let profile = build_profile(&[], &[]);

        assert!(profile.ingredients.is_empty());
        assert!(profile.cuisines.is_empty());
        assert!(profile.difficulties.is_empty());
        assert!(profile.tags.is_empty());
        assert_eq!(profile.calories, NutritionBand::default());
        assert_eq!(profile.calories.min, f64::INFINITY);
        assert_eq!(profile.calories.max, f64::NEG_INFINITY);
        assert_eq!(profile.calories.avg, 0.0);
    }

    #[test]
    fn test_rated_recipe_contributes_its_rating_value() {
        let mut a = recipe(1);
        a.ingredients = vec!["saffron".to_string()];
        a.cuisine = Some("spanish".to_string());
        a.difficulty = Some(Difficulty::Hard);
        a.tags = vec!["dinner".to_string()];

        let profile = build_profile(&[a], &[rating(1, 5)]);

        assert_eq!(profile.ingredients["saffron"], 5.0);
        assert_eq!(profile.cuisines["spanish"], 5.0);
        assert_eq!(profile.difficulties[&Difficulty::Hard], 5.0);
        assert_eq!(profile.tags["dinner"], 5.0);
    }

    #[test]
    fn test_favorite_only_profile_matches_rating_of_three() {
        let mut a = recipe(1);
        a.ingredients = vec!["miso".to_string(), "tofu".to_string()];
        a.cuisine = Some("japanese".to_string());
        a.tags = vec!["soup".to_string()];

        // Reached the interacted set via a favorite, no rating row
        let favorite_only = build_profile(std::slice::from_ref(&a), &[]);
        let rated_three = build_profile(std::slice::from_ref(&a), &[rating(1, 3)]);

        assert_eq!(favorite_only.ingredients, rated_three.ingredients);
        assert_eq!(favorite_only.cuisines, rated_three.cuisines);
        assert_eq!(favorite_only.tags, rated_three.tags);
    }

    #[test]
    fn test_weights_accumulate_across_recipes() {
        let mut a = recipe(1);
        a.ingredients = vec!["garlic".to_string()];
        let mut b = recipe(2);
        b.ingredients = vec!["garlic".to_string()];

        let profile = build_profile(&[a, b], &[rating(1, 4), rating(2, 2)]);

        assert_eq!(profile.ingredients["garlic"], 6.0);
    }

    #[test]
    fn test_duplicate_ingredient_listing_counts_twice() {
        let mut a = recipe(1);
        a.ingredients = vec!["butter".to_string(), "butter".to_string()];

        let profile = build_profile(&[a], &[rating(1, 2)]);

        assert_eq!(profile.ingredients["butter"], 4.0);
    }

    #[test]
    fn test_nutrition_bands_average_only_over_recipes_with_nutrition() {
        let mut a = recipe(1);
        a.nutrition = Some(Nutrition {
            calories: 400.0,
            protein: 20.0,
            carbs: 30.0,
            fat: 10.0,
        });
        let mut b = recipe(2);
        b.nutrition = Some(Nutrition {
            calories: 600.0,
            protein: 40.0,
            carbs: 50.0,
            fat: 30.0,
        });
        let c = recipe(3); // no nutrition record

        let profile = build_profile(&[a, b, c], &[]);

        assert_eq!(profile.calories.min, 400.0);
        assert_eq!(profile.calories.max, 600.0);
        assert_eq!(profile.calories.avg, 500.0);
        assert_eq!(profile.protein.avg, 30.0);
        assert_eq!(profile.carbs.avg, 40.0);
        assert_eq!(profile.fat.avg, 20.0);
    }

    #[test]
    fn test_missing_optional_fields_do_not_contribute() {
        let a = recipe(1); // everything optional absent

        let profile = build_profile(&[a], &[rating(1, 5)]);

        assert!(profile.ingredients.is_empty());
        assert!(profile.cuisines.is_empty());
        assert!(profile.difficulties.is_empty());
        assert!(profile.tags.is_empty());
        assert_eq!(profile.calories.avg, 0.0);
    }
}
