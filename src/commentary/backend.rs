//! Chat backend abstraction for commentary.
//!
//! Local Ollama by default; an Anthropic backend is available behind the
//! `remote-ai` feature for clubs that want hosted quality.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::CommentaryConfig;

use super::CommentaryError;

/// Trait for commentary backends.
#[async_trait]
pub trait CommentaryBackend: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &'static str;

    /// Run one system+user completion and return the text.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, CommentaryError>;

    /// Check if the backend is reachable.
    async fn health_check(&self) -> bool;
}

/// Build a backend from configuration.
pub fn create_backend(config: &CommentaryConfig) -> Box<dyn CommentaryBackend> {
    match config.backend.as_str() {
        #[cfg(feature = "remote-ai")]
        "anthropic" => match AnthropicBackend::from_env(config.model.clone(), config.timeout_seconds)
        {
            Ok(backend) => return Box::new(backend),
            Err(e) => {
                warn!("Anthropic backend unavailable ({}), falling back to Ollama", e);
            }
        },
        "ollama" => {}
        other => {
            warn!("Unknown commentary backend '{}', using Ollama", other);
        }
    }
    Box::new(OllamaBackend::new(
        config.base_url.clone(),
        config.model.clone(),
        config.timeout_seconds,
    ))
}

/// Local Ollama backend.
pub struct OllamaBackend {
    client: reqwest::Client,
    base_url: url::Url,
    model: String,
}

impl OllamaBackend {
    pub fn new(base_url: String, model: String, timeout_seconds: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()
            .expect("Failed to build HTTP client");

        let base_url = url::Url::parse(&base_url).unwrap_or_else(|_| {
            warn!("Invalid Ollama base URL '{}', using default", base_url);
            url::Url::parse("http://localhost:11434").unwrap()
        });

        Self {
            client,
            base_url,
            model,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }
}

#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaResponseMessage {
    content: String,
}

#[async_trait]
impl CommentaryBackend for OllamaBackend {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<String, CommentaryError> {
        let url = self.endpoint("/api/chat");

        let request = OllamaChatRequest {
            model: self.model.clone(),
            messages: vec![
                OllamaMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                OllamaMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            stream: false,
        };

        debug!("Sending commentary request to {}", url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| CommentaryError::BackendUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CommentaryError::BackendUnavailable(format!(
                "Ollama returned {}: {}",
                status, body
            )));
        }

        let parsed: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| CommentaryError::BadResponse(e.to_string()))?;

        Ok(parsed.message.content)
    }

    async fn health_check(&self) -> bool {
        let url = self.endpoint("/api/tags");
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!("Ollama health check failed: {}", e);
                false
            }
        }
    }
}

// --- Anthropic backend ---

#[cfg(feature = "remote-ai")]
#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<AnthropicMessage>,
}

#[cfg(feature = "remote-ai")]
#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[cfg(feature = "remote-ai")]
#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
}

#[cfg(feature = "remote-ai")]
#[derive(Debug, Deserialize)]
struct AnthropicContent {
    text: String,
}

/// Anthropic API backend.
#[cfg(feature = "remote-ai")]
pub struct AnthropicBackend {
    client: reqwest::Client,
    model: String,
    api_key: String,
}

#[cfg(feature = "remote-ai")]
impl AnthropicBackend {
    pub fn from_env(model: String, timeout_seconds: u64) -> Result<Self, CommentaryError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
            CommentaryError::BackendUnavailable("ANTHROPIC_API_KEY env var not set".to_string())
        })?;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()
            .expect("Failed to build HTTP client");

        Ok(Self {
            client,
            model,
            api_key,
        })
    }
}

#[cfg(feature = "remote-ai")]
#[async_trait]
impl CommentaryBackend for AnthropicBackend {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<String, CommentaryError> {
        let request = AnthropicRequest {
            model: self.model.clone(),
            max_tokens: 512,
            system: system.to_string(),
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let response = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| CommentaryError::BackendUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CommentaryError::BackendUnavailable(format!(
                "Anthropic API returned {}: {}",
                status, body
            )));
        }

        let parsed: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| CommentaryError::BadResponse(e.to_string()))?;

        Ok(parsed
            .content
            .into_iter()
            .map(|c| c.text)
            .collect::<Vec<_>>()
            .join(""))
    }

    async fn health_check(&self) -> bool {
        // No health endpoint; assume available once the key is set
        true
    }
}

/// Canned backend for tests.
#[cfg(test)]
pub struct MockBackend {
    response: String,
}

#[cfg(test)]
impl MockBackend {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl CommentaryBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, CommentaryError> {
        Ok(self.response.clone())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
