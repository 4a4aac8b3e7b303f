//! Error types for model resolution, generation and session control

use thiserror::Error;

/// Failure while asking the remote service which models it offers
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model listing failed ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Model discovery unavailable: {0}")]
    Unavailable(String),
}

/// Failure of a single generate call
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Generation API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Model returned no text{}", blocked_suffix(.block_reason))]
    EmptyReply { block_reason: Option<String> },
}

fn blocked_suffix(reason: &Option<String>) -> String {
    reason
        .as_deref()
        .map(|r| format!(" (blocked: {r})"))
        .unwrap_or_default()
}

/// No usable model could be picked
#[derive(Debug, Error)]
pub enum ResolutionFailure {
    #[error("Model discovery query failed: {0}")]
    QueryFailed(#[from] DiscoveryError),

    #[error("No generation-capable models available")]
    EmptyResult,

    #[error("None of {} available models match the preference list or model family", .available.len())]
    NoMatch { available: Vec<String> },
}

/// Unrecognized persona key or label
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown persona: '{0}'")]
pub struct InvalidPersona(pub String);

/// Errors surfaced by [`crate::session::ConversationSession`]
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No persona selected yet")]
    Unbound,

    #[error("Session is not ready: {reason}")]
    NotReady { reason: String },

    #[error(transparent)]
    Resolution(#[from] ResolutionFailure),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    InvalidPersona(#[from] InvalidPersona),
}

/// Startup configuration problems
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY required (set via --gemini-api-key, env var, or ~/.family-chat/config.toml)")]
    MissingApiKey,

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid persona setting: {0}")]
    InvalidPersona(#[from] InvalidPersona),
}
