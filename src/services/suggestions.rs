use std::sync::Arc;
use tracing::instrument;

use crate::{
    error::AppResult,
    models::{Destination, SearchCriteria, SuggestedDestination},
    services::{
        decoration::{decorate, ImagePool, PERSONALIZED_POOL, TRENDING_POOL},
        prompts,
        providers::{GenerationRequest, SuggestionProvider},
    },
};

/// Retrieves destination suggestions from a generative model
///
/// Both entry points issue exactly one provider request, parse the returned
/// text as a destination list and attach cover images by position. Provider
/// failures propagate; unparsable output becomes an empty list.
pub struct SuggestionService {
    provider: Arc<dyn SuggestionProvider>,
}

impl SuggestionService {
    pub fn new(provider: Arc<dyn SuggestionProvider>) -> Self {
        Self { provider }
    }

    /// Destinations matching the user's origin, budget and vibe
    #[instrument(skip(self), fields(provider = self.provider.name()))]
    pub async fn fetch_personalized(&self, criteria: &SearchCriteria) -> AppResult<Vec<Destination>> {
        let request = GenerationRequest {
            prompt: prompts::personalized_prompt(criteria),
            response_schema: prompts::destination_list_schema(),
        };

        let destinations = self.retrieve(&request, &PERSONALIZED_POOL).await?;

        tracing::info!(
            origin = %criteria.origin,
            budget = criteria.budget.value(),
            vibe = %criteria.vibe,
            results = destinations.len(),
            "Personalized suggestions fetched"
        );

        Ok(destinations)
    }

    /// Globally trending destinations for the current season
    #[instrument(skip(self), fields(provider = self.provider.name()))]
    pub async fn fetch_trending(&self) -> AppResult<Vec<Destination>> {
        let request = GenerationRequest {
            prompt: prompts::trending_prompt(),
            response_schema: prompts::destination_list_schema(),
        };

        let destinations = self.retrieve(&request, &TRENDING_POOL).await?;

        tracing::info!(results = destinations.len(), "Trending destinations fetched");

        Ok(destinations)
    }

    async fn retrieve(
        &self,
        request: &GenerationRequest,
        pool: &ImagePool,
    ) -> AppResult<Vec<Destination>> {
        let text = self.provider.generate(request).await.map_err(|e| {
            tracing::error!(error = %e, provider = self.provider.name(), "Suggestion request failed");
            e
        })?;

        let suggestions = parse_suggestions(text.as_deref());
        Ok(decorate(suggestions, pool))
    }
}

/// Parses model output into destination records
///
/// Missing text, invalid JSON, or JSON that is not a list of objects all
/// yield an empty list. Callers cannot tell "no results" apart from
/// "unreadable results"; the warning log is the only trace of the latter.
pub fn parse_suggestions(text: Option<&str>) -> Vec<SuggestedDestination> {
    let text = match text.map(str::trim) {
        Some(text) if !text.is_empty() => text,
        _ => return Vec::new(),
    };

    match serde_json::from_str::<Vec<SuggestedDestination>>(text) {
        Ok(suggestions) => suggestions,
        Err(e) => {
            tracing::warn!(
                error = %e,
                response = %text,
                "Model output is not a destination list, treating as empty"
            );
            Vec::new()
        }
    }
}
