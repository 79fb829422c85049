use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, warn};

use super::prompt::{self, PromptInput};
use super::{SuggestionGateway, SuggestionResult};

const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone)]
pub struct GeminiAdvisor {
    api_key: String,
    model: String,
    base_url: String,
    http: reqwest::Client,
}

impl GeminiAdvisor {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .with_context(|| "failed to build Gemini HTTP client")?;
        Ok(Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            http,
        })
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub async fn suggest(&self, command: &str) -> SuggestionResult {
        let prompt = match prompt::render(&PromptInput {
            command,
            prefer_bare_command: true,
        }) {
            Ok(prompt) => prompt,
            Err(err) => return SuggestionResult::ToolError(format!("{err:#}")),
        };

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.call(&prompt).await {
                Ok(text) if text.trim().is_empty() => return SuggestionResult::Empty,
                Ok(text) => return SuggestionResult::Suggestion(text.trim().to_string()),
                Err(GeminiError::RateLimited) if attempt < MAX_ATTEMPTS => {
                    let wait = Duration::from_secs(1 << (attempt - 1));
                    warn!("Gemini rate limited, retrying in {}s", wait.as_secs());
                    tokio::time::sleep(wait).await;
                }
                Err(err) => return SuggestionResult::ToolError(err.to_string()),
            }
        }
    }

    fn endpoint(&self) -> Result<reqwest::Url, GeminiError> {
        let endpoint = format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        let mut url = reqwest::Url::parse(&endpoint)
            .map_err(|err| GeminiError::Request(format!("invalid Gemini endpoint URL: {err}")))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    async fn call(&self, prompt: &str) -> Result<String, GeminiError> {
        let url = self.endpoint()?;
        let body = json!({
            "contents": [
                {
                    "parts": [
                        {"text": prompt}
                    ]
                }
            ]
        });

        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|err| GeminiError::Request(err.to_string()))?;
        let status = response.status();
        let payload = response.text().await.map_err(|err| {
            GeminiError::Request(format!("failed to read response body: {err}"))
        })?;
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GeminiError::RateLimited);
        }
        if !status.is_success() {
            return Err(GeminiError::Status(status.to_string(), extract_api_error(&payload)));
        }
        debug!(bytes = payload.len(), "Gemini response received");

        let parsed: GeminiResponse = serde_json::from_str(&payload)
            .map_err(|err| GeminiError::Parse(err.to_string()))?;
        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| {
                candidate
                    .content
                    .parts
                    .into_iter()
                    .find_map(|part| part.text)
            })
            .ok_or_else(|| GeminiError::Parse("no text candidate returned".to_string()))
    }
}

impl SuggestionGateway for GeminiAdvisor {
    fn label(&self) -> &str {
        "Google Gemini"
    }

    fn request<'a>(
        &'a self,
        command: &'a str,
    ) -> Pin<Box<dyn Future<Output = SuggestionResult> + Send + 'a>> {
        Box::pin(self.suggest(command))
    }
}

#[derive(Debug, thiserror::Error)]
enum GeminiError {
    #[error("Gemini API request failed: rate limited")]
    RateLimited,
    #[error("Gemini API request failed: {0}")]
    Request(String),
    #[error("Gemini API error ({0}): {1}")]
    Status(String, String),
    #[error("failed to parse Gemini response: {0}")]
    Parse(String),
}

fn extract_api_error(body: &str) -> String {
    #[derive(Debug, Deserialize)]
    struct GeminiErrorEnvelope {
        error: Option<GeminiApiError>,
    }
    #[derive(Debug, Deserialize)]
    struct GeminiApiError {
        message: Option<String>,
        status: Option<String>,
    }

    if let Ok(parsed) = serde_json::from_str::<GeminiErrorEnvelope>(body)
        && let Some(err) = parsed.error
    {
        let message = err.message.unwrap_or_else(|| "unknown error".to_string());
        let status = err.status.unwrap_or_else(|| "unknown".to_string());
        return format!("{} (status={})", message, status);
    }
    body.trim().to_string()
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}
