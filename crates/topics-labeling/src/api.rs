//! API-based labeler using OpenAI-compatible chat completions.

use std::time::Duration;

use async_trait::async_trait;
use backoff::{backoff::Backoff, ExponentialBackoff};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::{LabelerError, TopicLabeler, FALLBACK_CATEGORY, FALLBACK_LABEL};

/// Configuration for the API-based labeler.
#[derive(Debug, Clone)]
pub struct ApiLabelerConfig {
    /// API base URL (e.g., "https://api.openai.com/v1")
    pub base_url: String,

    /// Model to use (e.g., "gpt-4o-mini")
    pub model: String,

    /// API key; `None` means unconfigured, every call yields the fallback
    pub api_key: Option<SecretString>,

    /// Request timeout
    pub timeout: Duration,

    /// Maximum attempts per call
    pub max_retries: u32,
}

impl ApiLabelerConfig {
    /// Create config for an OpenAI-compatible API.
    pub fn openai(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: model.into(),
            api_key: Some(SecretString::from(api_key.into())),
            timeout: Duration::from_secs(30),
            max_retries: 3,
        }
    }

    /// Create a keyless config: calls return the fallback strings without
    /// touching the network.
    pub fn unconfigured() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
            max_retries: 3,
        }
    }
}

/// Labeler backed by an OpenAI-compatible chat-completions endpoint.
///
/// Never surfaces a transport failure to the caller: after retries are
/// exhausted the deterministic fallback string is returned, so a down
/// backend degrades labeling without failing the run.
pub struct ApiLabeler {
    client: Client,
    config: ApiLabelerConfig,
}

impl ApiLabeler {
    /// Create a new API labeler.
    pub fn new(config: ApiLabelerConfig) -> Result<Self, LabelerError> {
        if config.api_key.is_none() {
            warn!("No labeling API key configured; topics will get placeholder names");
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LabelerError::ConfigError(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn label_prompt(titles: &[String]) -> String {
        format!(
            "Give a short, objective topic name (at most 5 words) for the \
             following news headlines:\n{}",
            bullet_list(titles)
        )
    }

    fn category_prompt(titles: &[String]) -> String {
        format!(
            "Give one broad category (a single word). Examples: Politics, \
             Economy, World, Sports, Technology, Crime, Society, Weather.\n\
             The headlines:\n{}",
            bullet_list(titles)
        )
    }

    /// Clean up a completion: trim whitespace and surrounding quotes.
    fn parse_response(response: &str) -> String {
        response
            .trim()
            .trim_matches('"')
            .trim_matches('\'')
            .trim()
            .to_string()
    }

    /// Run one labeling call, substituting `fallback` on any failure.
    async fn complete_or_fallback(
        &self,
        titles: &[String],
        prompt: String,
        max_tokens: u32,
        fallback: &str,
    ) -> String {
        if titles.is_empty() || self.config.api_key.is_none() {
            return fallback.to_string();
        }

        match self.call_api(&prompt, max_tokens).await {
            Ok(content) => {
                let cleaned = Self::parse_response(&content);
                if cleaned.is_empty() {
                    warn!("Labeling backend returned an empty completion");
                    fallback.to_string()
                } else {
                    cleaned
                }
            }
            Err(e) => {
                error!(error = %e, "Labeling call failed, using fallback");
                fallback.to_string()
            }
        }
    }

    /// Call the API with retry logic.
    async fn call_api(&self, prompt: &str, max_tokens: u32) -> Result<String, LabelerError> {
        let mut backoff = ExponentialBackoff {
            max_elapsed_time: Some(Duration::from_secs(60)),
            ..Default::default()
        };

        let mut attempts = 0;

        loop {
            attempts += 1;
            debug!(attempt = attempts, "Calling labeling API");

            match self.make_request(prompt, max_tokens).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    if attempts >= self.config.max_retries {
                        return Err(e);
                    }
                    match backoff.next_backoff() {
                        Some(duration) => {
                            warn!(
                                error = %e,
                                retry_in_ms = duration.as_millis(),
                                "Labeling call failed, retrying"
                            );
                            tokio::time::sleep(duration).await;
                        }
                        None => return Err(e),
                    }
                }
            }
        }
    }

    /// Make a single chat-completions request.
    async fn make_request(&self, prompt: &str, max_tokens: u32) -> Result<String, LabelerError> {
        #[derive(Serialize)]
        struct ChatRequest {
            model: String,
            messages: Vec<ChatMessage>,
            max_tokens: u32,
            temperature: f32,
        }

        #[derive(Serialize)]
        struct ChatMessage {
            role: String,
            content: String,
        }

        #[derive(Deserialize)]
        struct ChatResponse {
            choices: Vec<ChatChoice>,
        }

        #[derive(Deserialize)]
        struct ChatChoice {
            message: ChatMessageResponse,
        }

        #[derive(Deserialize)]
        struct ChatMessageResponse {
            #[serde(default)]
            content: Option<String>,
        }

        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(|| LabelerError::ConfigError("no API key".to_string()))?;

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_tokens,
            temperature: 0.3,
        };

        let url = format!("{}/chat/completions", self.config.base_url);

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| LabelerError::ApiError(e.to_string()))?;

        if response.status() == 429 {
            return Err(LabelerError::RateLimitExceeded);
        }
        if !response.status().is_success() {
            return Err(LabelerError::ApiError(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LabelerError::ParseError(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        Ok(content)
    }
}

#[async_trait]
impl TopicLabeler for ApiLabeler {
    async fn label_topic(&self, titles: &[String]) -> Result<String, LabelerError> {
        let prompt = Self::label_prompt(titles);
        Ok(self
            .complete_or_fallback(titles, prompt, 20, FALLBACK_LABEL)
            .await)
    }

    async fn categorize_topic(&self, titles: &[String]) -> Result<String, LabelerError> {
        let prompt = Self::category_prompt(titles);
        Ok(self
            .complete_or_fallback(titles, prompt, 10, FALLBACK_CATEGORY)
            .await)
    }
}

fn bullet_list(titles: &[String]) -> String {
    titles
        .iter()
        .map(|t| format!("- {}", t))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(items: &[&str]) -> Vec<String> {
        items.iter().map(|t| t.to_string()).collect()
    }

    #[tokio::test]
    async fn test_keyless_labeler_returns_fallbacks() {
        let labeler = ApiLabeler::new(ApiLabelerConfig::unconfigured()).unwrap();
        let headlines = titles(&["Central bank holds rates"]);

        let label = labeler.label_topic(&headlines).await.unwrap();
        let category = labeler.categorize_topic(&headlines).await.unwrap();

        assert_eq!(label, FALLBACK_LABEL);
        assert_eq!(category, FALLBACK_CATEGORY);
    }

    #[tokio::test]
    async fn test_empty_titles_return_fallbacks() {
        let labeler = ApiLabeler::new(ApiLabelerConfig::openai("sk-test", "gpt-4o-mini")).unwrap();

        let label = labeler.label_topic(&[]).await.unwrap();
        assert_eq!(label, FALLBACK_LABEL);
    }

    #[test]
    fn test_label_prompt_contains_titles() {
        let prompt = ApiLabeler::label_prompt(&titles(&["First headline", "Second headline"]));
        assert!(prompt.contains("- First headline"));
        assert!(prompt.contains("- Second headline"));
        assert!(prompt.contains("at most 5 words"));
    }

    #[test]
    fn test_parse_response_strips_quotes() {
        assert_eq!(ApiLabeler::parse_response("\"Budget Vote\""), "Budget Vote");
        assert_eq!(ApiLabeler::parse_response("  Storm Season  "), "Storm Season");
        assert_eq!(ApiLabeler::parse_response("'Election'"), "Election");
    }

    #[test]
    fn test_parse_response_empty() {
        assert_eq!(ApiLabeler::parse_response("  \"\"  "), "");
    }
}
