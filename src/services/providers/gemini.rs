/// Google Gemini provider
///
/// Calls `POST {api_url}/v1beta/models/{model}:generateContent` with a JSON
/// response schema and returns the text of the first candidate.
use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::gemini::{GenerateContentRequest, GenerateContentResponse},
    services::providers::{GenerationRequest, SuggestionProvider},
};
use reqwest::Client as HttpClient;

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Clone)]
pub struct GeminiProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            model,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.gemini_api_key.clone(),
            config.gemini_api_url.clone(),
            config.gemini_model.clone(),
        )
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_url, self.model
        )
    }
}

#[async_trait::async_trait]
impl SuggestionProvider for GeminiProvider {
    async fn generate(&self, request: &GenerationRequest) -> AppResult<Option<String>> {
        let body =
            GenerateContentRequest::json_output(&request.prompt, request.response_schema.clone());

        let response = self
            .http_client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Gemini API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        tracing::debug!(response = %response_text, "Raw Gemini API response");

        let payload: GenerateContentResponse =
            serde_json::from_str(&response_text).map_err(|e| {
                tracing::error!(
                    error = %e,
                    response = %response_text,
                    "Failed to deserialize Gemini response"
                );
                AppError::ExternalApi(format!("Failed to parse Gemini response: {}", e))
            })?;

        let text = payload.text();
        if text.is_none() {
            tracing::warn!(
                model = %self.model,
                reason = payload.empty_reason().as_deref().unwrap_or("unknown"),
                "Gemini response carried no text"
            );
        }

        Ok(text)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}
