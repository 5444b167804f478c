//! Configuration and provisioning checks for the remote store.
//!
//! Every service asks the probe before touching the remote store so that a
//! storefront running without credentials, or against a project whose tables
//! have not been created yet, never issues requests that are bound to fail.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::config::RemoteConfig;
use crate::remote::RemoteStore;

/// What the storefront currently knows about its backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendState {
    /// Credentials are missing or still placeholders.
    NotConfigured,
    /// Credentials look real but the tables do not exist yet.
    NotProvisioned,
    /// The store answered with some other error or could not be reached.
    Unreachable,
    /// The store answered the probe query.
    Connected,
}

impl BackendState {
    /// Whether the state is a fault worth showing to customers. Missing setup
    /// is an expected state and is not.
    #[must_use]
    pub const fn needs_attention(self) -> bool {
        matches!(self, Self::Unreachable)
    }

    /// Whether orders and menu reads go to the remote store.
    #[must_use]
    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }
}

/// Decides whether the remote store may be used.
#[derive(Clone)]
pub struct ConfigProbe {
    configured: bool,
    store: Arc<dyn RemoteStore>,
}

impl ConfigProbe {
    /// Create a probe. Whether the store is configured is decided once, here.
    #[must_use]
    pub fn new(config: &RemoteConfig, store: Arc<dyn RemoteStore>) -> Self {
        Self::with_configured(config.is_configured(), store)
    }

    /// Create a probe with an explicit configured flag.
    #[must_use]
    pub fn with_configured(configured: bool, store: Arc<dyn RemoteStore>) -> Self {
        Self { configured, store }
    }

    /// The store this probe guards.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn RemoteStore> {
        &self.store
    }

    /// Whether credentials are present and not placeholders.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.configured
    }

    /// Whether the expected tables exist and answer a minimal query.
    ///
    /// Any error counts as "not provisioned"; nothing is propagated.
    #[instrument(skip(self))]
    pub async fn is_provisioned(&self) -> bool {
        match self.store.probe().await {
            Ok(()) => true,
            Err(e) => {
                debug!(error = %e, "Remote store not provisioned");
                false
            }
        }
    }

    /// Configured and provisioned: the remote store may be used.
    pub async fn is_ready(&self) -> bool {
        self.configured && self.is_provisioned().await
    }

    /// Classify the backend, telling missing tables apart from outages.
    #[instrument(skip(self))]
    pub async fn backend_state(&self) -> BackendState {
        if !self.configured {
            return BackendState::NotConfigured;
        }
        match self.store.probe().await {
            Ok(()) => BackendState::Connected,
            Err(e) if e.is_relation_missing() => {
                debug!(error = %e, "Remote store tables missing");
                BackendState::NotProvisioned
            }
            Err(e) => {
                warn!(error = %e, "Remote store unreachable");
                BackendState::Unreachable
            }
        }
    }
}

impl std::fmt::Debug for ConfigProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigProbe")
            .field("configured", &self.configured)
            .finish_non_exhaustive()
    }
}
