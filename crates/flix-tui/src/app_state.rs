//! AppState: shared read-only data passed to all components during render/event.
//!
//! The App event loop is the only writer. Each controller inside is owned
//! here and mutated only in response to its own events.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use flix_core::carousel::{CarouselEngine, GuardScope};
use flix_core::catalog::CatalogStore;
use flix_core::config::Config;
use flix_core::image::ImageResolver;
use flix_core::model::{Category, Item};
use flix_core::overlay::DetailOverlay;
use flix_core::route::{Route, View};
use flix_core::search::SearchPaginator;

use crate::widgets::status_bar::InputMode;

pub struct AppState {
    // ── Routing ─────────────────────────────────────────────────────────────
    pub route: Route,

    // ── Catalog + carousels ─────────────────────────────────────────────────
    pub catalog: CatalogStore,
    pub carousel: CarouselEngine,
    /// Start of the running slide animation per row.
    pub slides: HashMap<Category, Instant>,
    pub transition: Duration,

    // ── Search / overlay ────────────────────────────────────────────────────
    pub search: SearchPaginator,
    pub overlay: DetailOverlay,

    pub images: ImageResolver,

    // ── UI mode ─────────────────────────────────────────────────────────────
    pub input_mode: InputMode,
    pub api_key_missing: bool,
}

impl AppState {
    pub fn new(config: &Config, api_key_missing: bool) -> Self {
        let scope = if config.carousel.shared_transition_guard {
            GuardScope::Shared
        } else {
            GuardScope::PerCategory
        };
        Self {
            route: Route::Home,
            catalog: CatalogStore::new(),
            carousel: CarouselEngine::new(config.carousel.page_size, scope),
            slides: HashMap::new(),
            transition: Duration::from_millis(config.carousel.transition_ms),
            search: SearchPaginator::new(),
            overlay: DetailOverlay::new(),
            images: ImageResolver::new(&config.images),
            input_mode: InputMode::Normal,
            api_key_missing,
        }
    }

    pub fn view(&self) -> View {
        self.route.view()
    }

    /// 0.0..=1.0 through the slide on `category`, or None when it is at rest.
    pub fn slide_progress(&self, category: Category) -> Option<f32> {
        let started = self.slides.get(&category)?;
        if self.transition.is_zero() {
            return Some(1.0);
        }
        let p = started.elapsed().as_secs_f32() / self.transition.as_secs_f32();
        Some(p.min(1.0))
    }

    /// Item behind the overlay: catalog rows for Home/TV, accumulated
    /// results for Search.
    pub fn selected_item(&self) -> Option<&Item> {
        self.overlay.selected_item(|kind, id| match self.view() {
            View::Search => self.search.find(kind, id),
            View::Home | View::Tv => self.catalog.find(kind, id),
        })
    }
}
