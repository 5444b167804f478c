//! Menu resolution.
//!
//! The menu is loaded from the first source that can provide one:
//!
//! 1. The remote store, when it is configured and provisioned. A successful
//!    fetch also refreshes the local cache.
//! 2. The local cache, holding the last menu fetched from the remote store.
//! 3. The bundled sample catalog.
//!
//! Callers always get a menu unless the bundled catalog has been disabled.

mod error;
mod sample;

use std::sync::Arc;

use corner_cafe_core::{CategorySummary, MenuCategory, MenuData, MenuItem};
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

pub use error::MenuError;
pub use sample::sample_menu;

use super::fallback::{Tier, first_available};
use crate::cache::MenuCache;
use crate::probe::ConfigProbe;
use crate::remote::{CategoryRow, DishRow};

/// Where a resolved menu came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuSource {
    Remote,
    Cache,
    Bundled,
}

/// A menu together with the tier that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedMenu {
    #[serde(flatten)]
    pub menu: MenuData,
    pub source: MenuSource,
}

/// Resolves the menu through the remote, cache and bundled tiers.
#[derive(Clone)]
pub struct MenuService {
    inner: Arc<MenuServiceInner>,
}

struct MenuServiceInner {
    probe: ConfigProbe,
    cache: Arc<dyn MenuCache>,
    bundled: Option<MenuData>,
}

impl MenuService {
    /// Create a menu service that falls back to the bundled sample catalog.
    #[must_use]
    pub fn new(probe: ConfigProbe, cache: Arc<dyn MenuCache>) -> Self {
        Self::with_bundled(probe, cache, Some(sample_menu()))
    }

    /// Create a menu service with an explicit last-resort menu. `None`
    /// disables the bundled tier.
    #[must_use]
    pub fn with_bundled(
        probe: ConfigProbe,
        cache: Arc<dyn MenuCache>,
        bundled: Option<MenuData>,
    ) -> Self {
        Self {
            inner: Arc::new(MenuServiceInner {
                probe,
                cache,
                bundled,
            }),
        }
    }

    /// Load the menu from the first tier that has one.
    ///
    /// # Errors
    ///
    /// Returns `MenuError::Unavailable` only when every tier came up empty.
    #[instrument(skip(self))]
    pub async fn load_menu(&self) -> Result<ResolvedMenu, MenuError> {
        let tiers = vec![
            Tier::new(MenuSource::Remote, move || self.fetch_remote()),
            Tier::new(MenuSource::Cache, move || self.read_cache()),
            Tier::new(MenuSource::Bundled, move || async move {
                self.inner.bundled.clone()
            }),
        ];

        match first_available(tiers).await {
            Some((source, menu)) => {
                info!(
                    source = ?source,
                    categories = menu.categories.len(),
                    "Menu resolved"
                );
                Ok(ResolvedMenu { menu, source })
            }
            None => {
                error!("No menu source available");
                Err(MenuError::Unavailable)
            }
        }
    }

    /// List active categories from the remote store, in display order.
    ///
    /// # Errors
    ///
    /// Returns `MenuError::Unavailable` if the remote store is not ready, or
    /// `MenuError::Remote` if the query fails.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<CategorySummary>, MenuError> {
        if !self.inner.probe.is_ready().await {
            return Err(MenuError::Unavailable);
        }

        let rows = self
            .inner
            .probe
            .store()
            .fetch_categories()
            .await
            .inspect_err(|e| error!(error = %e, "Failed to fetch categories"))?;

        Ok(rows
            .into_iter()
            .filter(|row| row.is_active)
            .map(|row| CategorySummary {
                id: row.id,
                name: row.name,
                slug: row.slug,
                description: row.description,
                display_order: row.display_order,
            })
            .collect())
    }

    async fn fetch_remote(&self) -> Option<MenuData> {
        if !self.inner.probe.is_ready().await {
            debug!("Remote store not ready, skipping remote menu");
            return None;
        }

        match self.inner.probe.store().fetch_menu().await {
            Ok(rows) => {
                let menu = normalize_menu(rows);
                if let Err(e) = self.inner.cache.put(&menu).await {
                    warn!(error = %e, "Failed to refresh menu cache");
                }
                Some(menu)
            }
            Err(e) => {
                warn!(error = %e, "Remote menu fetch failed");
                None
            }
        }
    }

    async fn read_cache(&self) -> Option<MenuData> {
        match self.inner.cache.get().await {
            Ok(menu) => menu,
            Err(e) => {
                warn!(error = %e, "Menu cache unreadable");
                None
            }
        }
    }
}

impl std::fmt::Debug for MenuService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuService")
            .field("probe", &self.inner.probe)
            .field("bundled", &self.inner.bundled.is_some())
            .finish_non_exhaustive()
    }
}

/// Convert remote rows into the view menu.
///
/// Inactive categories and unavailable dishes are dropped. Categories keep
/// the order the store returned them in; dishes are sorted by display order,
/// ties keeping their original order.
fn normalize_menu(rows: Vec<CategoryRow>) -> MenuData {
    let categories = rows
        .into_iter()
        .filter(|row| row.is_active)
        .map(|row| {
            let mut dishes: Vec<DishRow> =
                row.dishes.into_iter().filter(|d| d.is_available).collect();
            dishes.sort_by_key(|d| d.display_order);

            MenuCategory {
                id: row.id,
                name: row.name,
                slug: row.slug,
                description: row.description,
                items: dishes.into_iter().map(menu_item).collect(),
            }
        })
        .collect();

    MenuData { categories }
}

fn menu_item(dish: DishRow) -> MenuItem {
    MenuItem {
        id: dish.id,
        name: dish.name,
        description: dish.description.unwrap_or_default(),
        price: dish.price,
        image: dish.image_url.unwrap_or_default(),
        is_available: Some(dish.is_available),
        is_featured: dish.is_featured,
        prep_time_minutes: dish.prep_time_minutes,
    }
}

#[cfg(test)]
mod tests {
    use corner_cafe_core::{CategoryId, DishId, Price};

    use super::*;

    fn dish(id: &str, display_order: i32, available: bool) -> DishRow {
        DishRow {
            id: DishId::new(id),
            category_id: None,
            name: format!("Dish {id}"),
            description: None,
            price: Price::from_units(100),
            image_url: None,
            is_available: available,
            is_featured: None,
            prep_time_minutes: None,
            display_order,
        }
    }

    fn category(id: &str, active: bool, dishes: Vec<DishRow>) -> CategoryRow {
        CategoryRow {
            id: CategoryId::new(id),
            name: format!("Category {id}"),
            slug: None,
            description: None,
            display_order: 0,
            is_active: active,
            dishes,
        }
    }

    #[test]
    fn test_normalize_drops_unavailable_dishes() {
        let menu = normalize_menu(vec![category(
            "c1",
            true,
            vec![dish("a", 1, true), dish("b", 2, false)],
        )]);
        let ids: Vec<_> = menu.items().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["a"]);
    }

    #[test]
    fn test_normalize_sorts_dishes_stably() {
        let menu = normalize_menu(vec![category(
            "c1",
            true,
            vec![
                dish("late", 5, true),
                dish("tie-first", 1, true),
                dish("tie-second", 1, true),
            ],
        )]);
        let ids: Vec<_> = menu.items().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["tie-first", "tie-second", "late"]);
    }

    #[test]
    fn test_normalize_skips_inactive_categories_and_keeps_empty_ones() {
        let menu = normalize_menu(vec![
            category("hidden", false, vec![dish("a", 1, true)]),
            category("empty", true, vec![dish("b", 1, false)]),
        ]);
        assert_eq!(menu.categories.len(), 1);
        assert_eq!(menu.categories[0].id.as_str(), "empty");
        assert!(menu.categories[0].items.is_empty());
    }

    #[test]
    fn test_missing_text_columns_become_empty_strings() {
        let item = menu_item(dish("a", 1, true));
        assert_eq!(item.description, "");
        assert_eq!(item.image, "");
        assert_eq!(item.is_available, Some(true));
    }

    #[test]
    fn test_resolved_menu_serializes_source_beside_categories() {
        let resolved = ResolvedMenu {
            menu: MenuData::default(),
            source: MenuSource::Cache,
        };
        let json = serde_json::to_value(&resolved).ok();
        assert_eq!(
            json,
            Some(serde_json::json!({"categories": [], "source": "cache"}))
        );
    }
}
