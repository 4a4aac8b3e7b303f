//! Model resolution
//!
//! Picks one model identifier the remote service will accept, using an
//! ordered preference list and a naming-convention fallback. The first
//! successful pick is memoized for the lifetime of the resolver.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::error::{DiscoveryError, ResolutionFailure};
use crate::provider::{ModelDiscovery, ModelHandle};

/// Default preference order: fastest/cheapest first, most capable last
pub const DEFAULT_PREFERRED_MODELS: &[&str] = &[
    "models/gemini-2.5-flash",
    "models/gemini-2.0-flash",
    "models/gemini-1.5-flash",
    "models/gemini-1.5-pro",
    "models/gemini-1.0-pro",
    "models/gemini-pro",
];

pub const DEFAULT_MODEL_FAMILY: &str = "gemini";

/// Selection policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelPolicy {
    /// Candidates in order of preference
    pub preferred: Vec<String>,
    /// Substring every acceptable fallback model name contains
    pub family: String,
}

impl Default for ModelPolicy {
    fn default() -> Self {
        Self {
            preferred: DEFAULT_PREFERRED_MODELS.iter().map(|s| s.to_string()).collect(),
            family: DEFAULT_MODEL_FAMILY.to_string(),
        }
    }
}

impl ModelPolicy {
    /// First preferred candidate present in `available`, else the first
    /// available name in the model family.
    pub fn select(&self, available: &[String]) -> Result<ModelHandle, ResolutionFailure> {
        if available.is_empty() {
            return Err(ResolutionFailure::EmptyResult);
        }

        self.preferred
            .iter()
            .find(|candidate| available.contains(*candidate))
            .or_else(|| available.iter().find(|name| name.contains(&self.family)))
            .map(|name| ModelHandle::new(name.as_str()))
            .ok_or_else(|| ResolutionFailure::NoMatch {
                available: available.to_vec(),
            })
    }
}

/// Resolves and memoizes the model handle shared by every session
pub struct ModelResolver {
    discovery: Option<Arc<dyn ModelDiscovery>>,
    static_candidates: Vec<String>,
    policy: ModelPolicy,
    resolved: OnceCell<ModelHandle>,
}

impl ModelResolver {
    /// Resolver with no discovery; the policy's preference list doubles as
    /// the static candidate list until replaced.
    pub fn new(policy: ModelPolicy) -> Self {
        Self {
            discovery: None,
            static_candidates: policy.preferred.clone(),
            policy,
            resolved: OnceCell::new(),
        }
    }

    pub fn with_discovery(mut self, discovery: Arc<dyn ModelDiscovery>) -> Self {
        self.discovery = Some(discovery);
        self
    }

    pub fn with_static_candidates(mut self, candidates: Vec<String>) -> Self {
        self.static_candidates = candidates;
        self
    }

    pub fn policy(&self) -> &ModelPolicy {
        &self.policy
    }

    /// The memoized handle, if a resolve has already succeeded
    pub fn cached(&self) -> Option<&ModelHandle> {
        self.resolved.get()
    }

    /// Resolve a usable model. Failures are not memoized, so a later call
    /// queries again.
    pub async fn resolve(&self) -> Result<ModelHandle, ResolutionFailure> {
        self.resolved
            .get_or_try_init(|| self.query())
            .await
            .cloned()
    }

    async fn query(&self) -> Result<ModelHandle, ResolutionFailure> {
        let available = match &self.discovery {
            Some(discovery) => match discovery.list_generation_models().await {
                Ok(models) => models,
                Err(DiscoveryError::Unavailable(reason)) => {
                    warn!("Model discovery unavailable ({}), using static candidates", reason);
                    self.static_candidates.clone()
                }
                Err(e) => {
                    warn!("Model discovery failed: {}", e);
                    return Err(ResolutionFailure::QueryFailed(e));
                }
            },
            None => self.static_candidates.clone(),
        };

        let handle = self.policy.select(&available)?;
        info!("Resolved model {} ({} candidates)", handle, available.len());
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_select_prefers_earlier_candidate() {
        let policy = ModelPolicy::default();
        let available = names(&["models/gemini-1.5-pro", "models/gemini-1.5-flash"]);
        assert_eq!(
            policy.select(&available).unwrap().as_str(),
            "models/gemini-1.5-flash"
        );
    }

    #[test]
    fn test_select_falls_back_to_family() {
        let policy = ModelPolicy::default();
        let available = names(&["models/text-bison-001", "models/gemini-exp-1206"]);
        assert_eq!(
            policy.select(&available).unwrap().as_str(),
            "models/gemini-exp-1206"
        );
    }

    #[test]
    fn test_select_empty_and_no_match() {
        let policy = ModelPolicy::default();
        assert!(matches!(policy.select(&[]), Err(ResolutionFailure::EmptyResult)));

        let available = names(&["models/text-bison-001"]);
        match policy.select(&available) {
            Err(ResolutionFailure::NoMatch { available }) => assert_eq!(available.len(), 1),
            other => panic!("expected NoMatch, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_policy_order() {
        let policy = ModelPolicy {
            preferred: names(&["models/gemini-1.5-pro", "models/gemini-1.5-flash"]),
            family: "gemini".into(),
        };
        let available = names(&["models/gemini-1.5-flash", "models/gemini-1.5-pro"]);
        assert_eq!(policy.select(&available).unwrap().as_str(), "models/gemini-1.5-pro");
    }

    #[tokio::test]
    async fn test_static_resolution_without_discovery() {
        let resolver = ModelResolver::new(ModelPolicy::default());
        assert!(resolver.cached().is_none());
        let handle = resolver.resolve().await.unwrap();
        assert_eq!(handle.as_str(), DEFAULT_PREFERRED_MODELS[0]);
        assert_eq!(resolver.cached(), Some(&handle));
    }

    #[tokio::test]
    async fn test_empty_static_list_fails() {
        let resolver = ModelResolver::new(ModelPolicy::default()).with_static_candidates(vec![]);
        assert!(matches!(
            resolver.resolve().await,
            Err(ResolutionFailure::EmptyResult)
        ));
        assert!(resolver.cached().is_none());
    }
}
