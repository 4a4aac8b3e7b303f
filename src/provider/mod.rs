//! Seams to the hosted generation service
//!
//! - `ModelDiscovery`: which models currently accept generate requests
//! - `ChatGateway`: one generate call for a bound persona context
//!
//! `GeminiClient` implements both against the Gemini REST API.

mod gemini;

pub use gemini::{GeminiClient, DEFAULT_API_BASE, DEFAULT_TIMEOUT_SECS};

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use crate::error::{DiscoveryError, GenerationError};
use crate::session::Message;

/// Opaque model identifier accepted by the remote service (e.g. `models/gemini-1.5-flash`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ModelHandle(String);

impl ModelHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Model + persona instruction bound together for one persona's lifetime
#[derive(Debug, Clone)]
pub struct GenerationContext {
    pub model: ModelHandle,
    pub instruction: Arc<str>,
}

impl GenerationContext {
    pub fn new(model: ModelHandle, instruction: &str) -> Self {
        Self {
            model,
            instruction: Arc::from(instruction),
        }
    }
}

/// Hosted generation capability
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Generate a reply to `new_message`, given the prior transcript
    async fn generate(
        &self,
        context: &GenerationContext,
        history: &[Message],
        new_message: &str,
    ) -> Result<String, GenerationError>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

/// Optional capability query
#[async_trait]
pub trait ModelDiscovery: Send + Sync {
    /// Identifiers of every model that supports free-form generation
    async fn list_generation_models(&self) -> Result<Vec<String>, DiscoveryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_handle_display() {
        let handle = ModelHandle::new("models/gemini-1.5-flash");
        assert_eq!(handle.to_string(), "models/gemini-1.5-flash");
        assert_eq!(serde_json::to_string(&handle).unwrap(), "\"models/gemini-1.5-flash\"");
    }
}
