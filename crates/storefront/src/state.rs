//! Application state shared across handlers.

use std::sync::Arc;

use crate::cache::MenuCache;
use crate::config::CafeConfig;
use crate::probe::ConfigProbe;
use crate::remote::RemoteStore;
use crate::services::menu::sample_menu;
use crate::services::{MenuService, OrderService};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: CafeConfig,
    probe: ConfigProbe,
    menu: MenuService,
    orders: OrderService,
}

impl AppState {
    /// Wire the services around `store` and `cache`.
    #[must_use]
    pub fn new(config: CafeConfig, store: Arc<dyn RemoteStore>, cache: Arc<dyn MenuCache>) -> Self {
        let probe = ConfigProbe::new(&config.remote, store);
        let bundled = config.bundled_menu.then(sample_menu);
        let menu = MenuService::with_bundled(probe.clone(), cache, bundled);
        let orders = OrderService::new(probe.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                probe,
                menu,
                orders,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &CafeConfig {
        &self.inner.config
    }

    /// Backend configuration and provisioning checks.
    #[must_use]
    pub fn probe(&self) -> &ConfigProbe {
        &self.inner.probe
    }

    #[must_use]
    pub fn menu(&self) -> &MenuService {
        &self.inner.menu
    }

    #[must_use]
    pub fn orders(&self) -> &OrderService {
        &self.inner.orders
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.inner.config)
            .field("probe", &self.inner.probe)
            .finish_non_exhaustive()
    }
}
