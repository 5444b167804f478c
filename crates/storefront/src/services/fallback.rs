//! Ordered fallback tiers.
//!
//! A tier is a named provider that either produces a value or nothing. Tiers
//! are tried in order, each exactly once, and the first one that produces a
//! value wins; later tiers are never started.

use std::fmt::Debug;
use std::future::Future;

use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::debug;

/// One provider in a fallback chain.
pub struct Tier<'a, S, T> {
    source: S,
    run: Box<dyn FnOnce() -> BoxFuture<'a, Option<T>> + Send + 'a>,
}

impl<'a, S, T> Tier<'a, S, T> {
    /// A tier labelled `source` that runs `provider` when reached.
    pub fn new<F, Fut>(source: S, provider: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'a,
        Fut: Future<Output = Option<T>> + Send + 'a,
    {
        Self {
            source,
            run: Box::new(move || provider().boxed()),
        }
    }
}

/// Run `tiers` in order and return the first value produced, together with
/// the label of the tier that produced it.
pub async fn first_available<S: Debug, T>(tiers: Vec<Tier<'_, S, T>>) -> Option<(S, T)> {
    for Tier { source, run } in tiers {
        if let Some(value) = run().await {
            return Some((source, value));
        }
        debug!(source = ?source, "Fallback tier produced nothing");
    }
    None
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[tokio::test]
    async fn test_first_success_wins_and_later_tiers_do_not_run() {
        let counter = AtomicUsize::new(0);
        let later_calls = &counter;

        let tiers = vec![
            Tier::new("remote", || async { None }),
            Tier::new("cache", || async { Some(2) }),
            Tier::new("bundled", move || async move {
                later_calls.fetch_add(1, Ordering::SeqCst);
                Some(3)
            }),
        ];

        assert_eq!(first_available(tiers).await, Some(("cache", 2)));
        assert_eq!(later_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_each_tier_runs_once_in_order() {
        let order = std::sync::Mutex::new(Vec::new());
        let record = |name: &'static str| {
            if let Ok(mut seen) = order.lock() {
                seen.push(name);
            }
        };

        let tiers: Vec<Tier<'_, &str, u8>> = vec![
            Tier::new("a", move || async move {
                record("a");
                None
            }),
            Tier::new("b", move || async move {
                record("b");
                None
            }),
        ];

        assert_eq!(first_available(tiers).await, None);
        assert_eq!(order.lock().map(|v| v.clone()).ok(), Some(vec!["a", "b"]));
    }

    #[tokio::test]
    async fn test_empty_chain_produces_nothing() {
        let tiers: Vec<Tier<'_, &str, u8>> = Vec::new();
        assert!(first_available(tiers).await.is_none());
    }
}
