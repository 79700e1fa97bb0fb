use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Recipe difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Parse a stored difficulty string, tolerating case differences
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// Per-serving nutrition facts attached to a recipe
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// A stored recipe
///
/// Created by a save action (user-entered or AI-generated draft) or by
/// seeding. Only `avg_rating` and `ratings_count` are ever mutated, by the
/// rating-aggregate recompute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Ordered ingredient names as free strings
    pub ingredients: Vec<String>,
    /// Ordered instruction steps
    pub instructions: Vec<String>,
    pub nutrition: Option<Nutrition>,
    pub cuisine: Option<String>,
    pub tags: Vec<String>,
    pub difficulty: Option<Difficulty>,
    pub total_time: Option<String>,
    pub servings: Option<i32>,
    /// Rolling average of all ratings, 0 when unrated
    pub avg_rating: f64,
    pub ratings_count: i64,
    pub created_at: DateTime<Utc>,
}

impl Recipe {
    /// Materializes a draft as a stored recipe with a fresh identity
    pub fn from_draft(draft: RecipeDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: draft.name,
            description: draft.description,
            ingredients: draft.ingredients,
            instructions: draft.instructions,
            nutrition: draft.nutrition,
            cuisine: draft.cuisine,
            tags: draft.tags,
            difficulty: draft.difficulty,
            total_time: draft.total_time,
            servings: draft.servings,
            avg_rating: 0.0,
            ratings_count: 0,
            created_at: Utc::now(),
        }
    }
}

/// An unsaved recipe, as entered by a user or produced by the generation
/// provider
///
/// Optional feature dimensions may be absent entirely; absent fields simply
/// do not contribute to preference profiles once the recipe is stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub nutrition: Option<Nutrition>,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub total_time: Option<String>,
    #[serde(default)]
    pub servings: Option<i32>,
}

/// One user's 1-5 score for one recipe, unique per (user, recipe)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: Uuid,
    pub recipe_id: Uuid,
    pub rating: i16,
}

/// A (user, recipe) favorite membership fact
///
/// Carries no weight of its own; when present it acts as an implicit
/// positive signal of fixed default strength.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    pub user_id: Uuid,
    pub recipe_id: Uuid,
}

/// Refreshed rating aggregates returned after a rating write
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingSummary {
    pub avg_rating: f64,
    pub ratings_count: i64,
}

// ============================================================================
// Chat Completions API Types
// ============================================================================

/// Request body for an OpenAI-compatible chat completions endpoint
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Response body from a chat completions endpoint
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

impl ChatResponse {
    /// Returns the assistant text of the first choice, if any
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}
