//! Gemini provider
//!
//! Uses the generativelanguage v1beta REST API:
//! - `GET  models` for discovery (paged; 404/501 means no listing, reported
//!   as `DiscoveryError::Unavailable`)
//! - `POST {model}:generateContent` for replies

use async_trait::async_trait;
use reqwest::{Client as HttpClient, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use super::{ChatGateway, GenerationContext, ModelDiscovery};
use crate::error::{DiscoveryError, GenerationError};
use crate::session::{Message, Role};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
const API_VERSION: &str = "v1beta";
const GENERATE_METHOD: &str = "generateContent";
const PAGE_SIZE: u32 = 1000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Gemini REST client
#[derive(Clone)]
pub struct GeminiClient {
    client: HttpClient,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiClient {
    /// Create a new Gemini client against the public endpoint
    pub fn new(api_key: String) -> Self {
        Self {
            client: HttpClient::new(),
            api_key,
            base_url: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn models_url(&self) -> String {
        format!("{}/{}/models", self.base_url, API_VERSION)
    }

    fn generate_url(&self, model: &str) -> String {
        let path = if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{}", model)
        };
        format!("{}/{}/{}:{}", self.base_url, API_VERSION, path, GENERATE_METHOD)
    }

    /// Build Gemini contents from transcript + new input.
    /// The conversation must open with a user turn, so leading assistant
    /// messages (the greeting) are dropped.
    fn build_contents(history: &[Message], new_message: &str) -> Vec<GeminiContent> {
        let mut contents: Vec<GeminiContent> = history
            .iter()
            .skip_while(|msg| msg.role == Role::Assistant)
            .map(|msg| GeminiContent {
                role: match msg.role {
                    Role::User => "user",
                    Role::Assistant => "model",
                }
                .to_string(),
                parts: vec![GeminiPart { text: msg.content.clone() }],
            })
            .collect();

        contents.push(GeminiContent {
            role: "user".to_string(),
            parts: vec![GeminiPart { text: new_message.to_string() }],
        });

        contents
    }

    /// Pull the reply text out of a response
    fn parse_response(response: GeminiResponse) -> Result<String, GenerationError> {
        let text: String = response
            .candidates
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(GenerationError::EmptyReply {
                block_reason: response.prompt_feedback.and_then(|f| f.block_reason),
            });
        }

        Ok(text)
    }

    /// Extract a readable message from an error body
    fn error_message(body: &str) -> String {
        serde_json::from_str::<GeminiErrorEnvelope>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.to_string())
    }
}

#[async_trait]
impl ChatGateway for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(
        &self,
        context: &GenerationContext,
        history: &[Message],
        new_message: &str,
    ) -> Result<String, GenerationError> {
        let api_request = GeminiRequest {
            contents: Self::build_contents(history, new_message),
            system_instruction: GeminiSystemInstruction {
                parts: vec![GeminiPart { text: context.instruction.to_string() }],
            },
        };

        debug!(
            "Gemini generate: model={} turns={}",
            context.model,
            api_request.contents.len()
        );

        let response = self
            .client
            .post(self.generate_url(context.model.as_str()))
            .query(&[("key", self.api_key.as_str())])
            .json(&api_request)
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message: Self::error_message(&body),
            });
        }

        let api_response: GeminiResponse = response.json().await?;
        Self::parse_response(api_response)
    }
}

#[async_trait]
impl ModelDiscovery for GeminiClient {
    async fn list_generation_models(&self) -> Result<Vec<String>, DiscoveryError> {
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(self.models_url())
                .query(&[("key", self.api_key.as_str())])
                .query(&[("pageSize", PAGE_SIZE)])
                .timeout(self.timeout);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = request.send().await?;
            let status = response.status();
            // Endpoints without a model listing (proxies, older deployments)
            if status == StatusCode::NOT_FOUND || status == StatusCode::NOT_IMPLEMENTED {
                return Err(DiscoveryError::Unavailable(format!(
                    "{} returned {}",
                    self.models_url(),
                    status
                )));
            }
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(DiscoveryError::Api {
                    status: status.as_u16(),
                    message: Self::error_message(&body),
                });
            }

            let page: ModelListResponse = response.json().await?;
            models.extend(
                page.models
                    .into_iter()
                    .filter(|m| m.supports(GENERATE_METHOD))
                    .map(|m| m.name),
            );

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        info!("Gemini lists {} generation-capable models", models.len());
        Ok(models)
    }
}

// ============================================================================
// API Types
// ============================================================================

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "systemInstruction")]
    system_instruction: GeminiSystemInstruction,
}

#[derive(Serialize)]
struct GeminiSystemInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Debug)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Debug)]
struct GeminiPart {
    text: String,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContentResponse>,
}

#[derive(Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Deserialize)]
struct GeminiPartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct GeminiPromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiError,
}

#[derive(Deserialize)]
struct GeminiError {
    message: String,
}

#[derive(Deserialize)]
struct ModelListResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct ModelInfo {
    name: String,
    #[serde(rename = "supportedGenerationMethods", default)]
    supported_generation_methods: Vec<String>,
}

impl ModelInfo {
    fn supports(&self, method: &str) -> bool {
        self.supported_generation_methods.iter().any(|m| m == method)
    }
}
