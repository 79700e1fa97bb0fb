/// OpenAI-compatible generation provider
///
/// Calls a chat-completions endpoint to turn an ingredient list into recipe
/// drafts. The model is asked for a bare JSON array; the parser still
/// tolerates markdown fences and prose around the payload, since models do
/// not reliably honor format instructions.
///
/// Responses are cached in Redis keyed by the normalized ingredient list,
/// so repeat pantry submissions do not re-bill the generation API.
use reqwest::Client as HttpClient;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{ChatMessage, ChatRequest, ChatResponse, RecipeDraft},
    services::providers::RecipeProvider,
};

const GENERATION_CACHE_TTL: u64 = 86400; // 1 day

const SYSTEM_PROMPT: &str = "You are a professional recipe developer. \
Given a list of available ingredients, propose 3 dishes the user can cook. \
Respond with only a JSON array of recipe objects with fields: name, \
description, ingredients (array of strings), instructions (array of steps), \
nutrition (object with numeric calories, protein, carbs, fat), cuisine, \
tags (array of strings), difficulty (easy, medium or hard), total_time and \
servings. Do not include any text outside the JSON array.";

#[derive(Clone)]
pub struct OpenAiProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
    cache: Cache,
}

impl OpenAiProvider {
    pub fn new(cache: Cache, api_key: String, api_url: String, model: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            model,
            cache,
        }
    }
}

/// Normalized cache token for a generation request
///
/// Ingredient order and casing must not fragment the cache, so the token is
/// lowercased, sorted and deduplicated. Free-text notes are folded in as-is;
/// differing notes are different requests.
fn cache_token(ingredients: &[String], notes: Option<&str>) -> String {
    let mut names: Vec<String> = ingredients
        .iter()
        .map(|i| i.trim().to_lowercase())
        .filter(|i| !i.is_empty())
        .collect();
    names.sort();
    names.dedup();

    match notes {
        Some(notes) if !notes.trim().is_empty() => {
            format!("{}|{}", names.join(","), notes.trim().to_lowercase())
        }
        _ => names.join(","),
    }
}

fn build_user_prompt(ingredients: &[String], notes: Option<&str>) -> String {
    let mut prompt = format!("Available ingredients: {}.", ingredients.join(", "));
    if let Some(notes) = notes.filter(|n| !n.trim().is_empty()) {
        prompt.push_str(&format!(" Additional requirements: {}.", notes.trim()));
    }
    prompt
}

/// Extracts and parses the JSON array of drafts from the model's reply
fn parse_drafts(content: &str) -> AppResult<Vec<RecipeDraft>> {
    let start = content.find('[');
    let end = content.rfind(']');

    let json = match (start, end) {
        (Some(start), Some(end)) if start < end => &content[start..=end],
        _ => {
            return Err(AppError::ExternalApi(
                "Generation response contained no JSON array".to_string(),
            ))
        }
    };

    serde_json::from_str(json).map_err(|e| {
        tracing::error!(error = %e, "Failed to deserialize generation response");
        AppError::ExternalApi(format!("Failed to parse generated recipes: {}", e))
    })
}

#[async_trait::async_trait]
impl RecipeProvider for OpenAiProvider {
    async fn generate_recipes(
        &self,
        ingredients: &[String],
        notes: Option<&str>,
    ) -> AppResult<Vec<RecipeDraft>> {
        if ingredients.is_empty() {
            return Err(AppError::InvalidInput(
                "At least one ingredient is required".to_string(),
            ));
        }

        cached!(
            self.cache,
            CacheKey::Generation(cache_token(ingredients, notes)),
            GENERATION_CACHE_TTL,
            async move {
                let url = format!("{}/chat/completions", self.api_url);

                let request = ChatRequest {
                    model: self.model.clone(),
                    messages: vec![
                        ChatMessage {
                            role: "system".to_string(),
                            content: SYSTEM_PROMPT.to_string(),
                        },
                        ChatMessage {
                            role: "user".to_string(),
                            content: build_user_prompt(ingredients, notes),
                        },
                    ],
                    temperature: 0.7,
                };

                let response = self
                    .http_client
                    .post(&url)
                    .bearer_auth(&self.api_key)
                    .json(&request)
                    .send()
                    .await?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    return Err(AppError::ExternalApi(format!(
                        "Generation API returned status {}: {}",
                        status, body
                    )));
                }

                let chat: ChatResponse = response.json().await?;
                let content = chat.first_content().ok_or_else(|| {
                    AppError::ExternalApi("Generation API returned no choices".to_string())
                })?;

                let drafts = parse_drafts(content)?;

                tracing::info!(
                    ingredients = ingredients.len(),
                    drafts = drafts.len(),
                    provider = "openai",
                    "Recipe generation completed"
                );

                Ok(drafts)
            }
        )
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRAFT_ARRAY: &str = r#"[
        {
            "name": "Lemon Garlic Chicken",
            "description": "Pan-seared chicken with a bright pan sauce",
            "ingredients": ["chicken", "garlic", "lemon"],
            "instructions": ["Sear the chicken", "Deglaze with lemon"],
            "cuisine": "mediterranean",
            "tags": ["weeknight"],
            "difficulty": "easy",
            "servings": 2
        }
    ]"#;

    #[test]
    fn test_parse_drafts_bare_array() {
        let drafts = parse_drafts(DRAFT_ARRAY).unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].name, "Lemon Garlic Chicken");
        assert_eq!(drafts[0].ingredients.len(), 3);
    }

    #[test]
    fn test_parse_drafts_fenced_array() {
        let fenced = format!("```json\n{}\n```", DRAFT_ARRAY);
        let drafts = parse_drafts(&fenced).unwrap();
        assert_eq!(drafts.len(), 1);
    }

    #[test]
    fn test_parse_drafts_with_surrounding_prose() {
        let chatty = format!("Here are some ideas:\n{}\nEnjoy!", DRAFT_ARRAY);
        let drafts = parse_drafts(&chatty).unwrap();
        assert_eq!(drafts.len(), 1);
    }

    #[test]
    fn test_parse_drafts_without_array_fails() {
        let result = parse_drafts("Sorry, I cannot help with that.");
        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }

    #[test]
    fn test_parse_drafts_malformed_json_fails() {
        let result = parse_drafts(r#"[{"name": }]"#);
        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }

    #[test]
    fn test_cache_token_normalizes_order_and_case() {
        let a = cache_token(
            &["Chicken".to_string(), "garlic ".to_string(), "LEMON".to_string()],
            None,
        );
        let b = cache_token(
            &["lemon".to_string(), "chicken".to_string(), "garlic".to_string()],
            None,
        );
        assert_eq!(a, b);
        assert_eq!(a, "chicken,garlic,lemon");
    }

    #[test]
    fn test_cache_token_includes_notes() {
        let plain = cache_token(&["rice".to_string()], None);
        let noted = cache_token(&["rice".to_string()], Some("vegan only"));
        assert_ne!(plain, noted);
        assert_eq!(noted, "rice|vegan only");
    }

    #[test]
    fn test_user_prompt_mentions_ingredients_and_notes() {
        let prompt = build_user_prompt(
            &["tofu".to_string(), "scallions".to_string()],
            Some("no peanuts"),
        );
        assert!(prompt.contains("tofu, scallions"));
        assert!(prompt.contains("no peanuts"));

        let bare = build_user_prompt(&["tofu".to_string()], None);
        assert!(!bare.contains("Additional requirements"));
    }
}
