// tests/resolver_memoization.rs


use family_chat::{ModelPolicy, ModelResolver, ResolutionFailure};
use std::sync::Arc;
use test_helpers::{resolver_with, FixedDiscovery};

#[tokio::test]
async fn resolve_twice_returns_same_handle_with_one_query() {
    let discovery = FixedDiscovery::listing(&["models/gemini-1.5-pro", "models/gemini-1.5-flash"]);
    let resolver = resolver_with(discovery.clone());

    let first = resolver.resolve().await.unwrap();
    let second = resolver.resolve().await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first.as_str(), "models/gemini-1.5-flash");
    assert_eq!(discovery.queries(), 1);
}

#[tokio::test]
async fn failures_are_not_memoized() {
    let discovery = FixedDiscovery::failing("permission denied");
    let resolver = resolver_with(discovery.clone());

    assert!(matches!(
        resolver.resolve().await,
        Err(ResolutionFailure::QueryFailed(_))
    ));
    assert!(resolver.cached().is_none());

    discovery.set_models(&["models/gemini-pro"]);
    assert_eq!(resolver.resolve().await.unwrap().as_str(), "models/gemini-pro");
    assert_eq!(discovery.queries(), 2);
}

#[tokio::test]
async fn unavailable_discovery_falls_back_to_static_list() {
    let discovery = FixedDiscovery::unavailable();
    let resolver = ModelResolver::new(ModelPolicy::default())
        .with_discovery(discovery.clone())
        .with_static_candidates(vec!["models/gemini-1.0-pro".into()]);

    assert_eq!(resolver.resolve().await.unwrap().as_str(), "models/gemini-1.0-pro");
    assert_eq!(discovery.queries(), 1);
}

#[tokio::test]
async fn no_family_match_is_a_failure() {
    let discovery = FixedDiscovery::listing(&["models/text-bison-001", "models/embedding-001"]);
    let resolver = resolver_with(discovery);

    match resolver.resolve().await {
        Err(ResolutionFailure::NoMatch { available }) => assert_eq!(available.len(), 2),
        other => panic!("expected NoMatch, got {:?}", other),
    }
}

#[tokio::test]
async fn concurrent_resolves_share_one_result() {
    let discovery = FixedDiscovery::listing(&["models/gemini-2.0-flash"]);
    let resolver = resolver_with(discovery.clone());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let resolver = Arc::clone(&resolver);
            tokio::spawn(async move { resolver.resolve().await.unwrap() })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().as_str(), "models/gemini-2.0-flash");
    }
    assert_eq!(discovery.queries(), 1);
}
