/// Recipe-generation provider abstraction
///
/// This module seams the application off the concrete generative-AI vendor.
/// A provider turns an ingredient list into recipe drafts; swapping vendors
/// means adding an implementation, not touching handlers or services.
use crate::{error::AppResult, models::RecipeDraft};

pub mod openai;

/// Trait for generative recipe providers
#[async_trait::async_trait]
pub trait RecipeProvider: Send + Sync {
    /// Generates recipe drafts from a list of ingredient names
    ///
    /// `notes` carries free-text constraints from the user (dietary limits,
    /// cuisine wishes). Returned drafts are unsaved; persisting one is a
    /// separate, user-initiated action.
    async fn generate_recipes(
        &self,
        ingredients: &[String],
        notes: Option<&str>,
    ) -> AppResult<Vec<RecipeDraft>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
