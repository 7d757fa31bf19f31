//! Detail overlay controller.
//!
//! Open/closed is derived from the route: an item id means open. Each change
//! of selected id bumps a generation counter, and every detail/trailer fetch
//! carries the generation it was issued under. Results are applied only if
//! that generation is still current, so a slow response for an earlier
//! selection can never overwrite the detail of a later one. Closing does not
//! cancel in-flight fetches; their results are simply rejected on arrival.

use std::fmt::Display;

use tracing::debug;

use crate::model::{DetailRecord, Item, MediaKind, VideoList};
use crate::route::Route;

/// Route-derived selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub kind: MediaKind,
    pub item_id: u64,
    /// Row (or banner) the item was activated from. Absent for deep links.
    pub category_tag: Option<String>,
}

/// Identity of one pair of detail + trailer fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailRequest {
    pub kind: MediaKind,
    pub item_id: u64,
    pub generation: u64,
}

/// Fetched supplementary data for the current selection only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailCache {
    pub detail: Option<DetailRecord>,
    pub trailer_key: Option<String>,
    pub detail_error: Option<String>,
    pub detail_done: bool,
    pub trailer_done: bool,
}

impl DetailCache {
    pub fn is_loading(&self) -> bool {
        !self.detail_done || !self.trailer_done
    }
}

#[derive(Debug, Default)]
pub struct DetailOverlay {
    selection: Option<Selection>,
    generation: u64,
    cache: DetailCache,
    /// Tag recorded by `activate` for the id about to be opened.
    pending_tag: Option<(u64, String)>,
}

impl DetailOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// The user picked `id` from the row tagged `tag`. Returns the route to
    /// navigate to; the overlay opens when that route is synced.
    pub fn activate(&mut self, current: &Route, tag: &str, kind: MediaKind, id: u64) -> Route {
        self.pending_tag = Some((id, tag.to_string()));
        current.with_selection(kind, id)
    }

    /// Route to navigate to when the backdrop is clicked.
    pub fn close_route(&self, current: &Route) -> Route {
        current.without_selection()
    }

    /// Re-derive the selection from `route`. Returns the fetches to start
    /// when the selected id changed to a new item.
    pub fn sync(&mut self, route: &Route) -> Option<DetailRequest> {
        let wanted = route.selected_id().map(|id| (route.media_kind(), id));
        let current = self.selection.as_ref().map(|s| (s.kind, s.item_id));
        if wanted == current {
            return None;
        }

        self.generation += 1;
        self.cache = DetailCache::default();

        let Some((kind, item_id)) = wanted else {
            debug!("overlay: closed");
            self.selection = None;
            return None;
        };

        let category_tag = match self.pending_tag.take() {
            Some((id, tag)) if id == item_id => Some(tag),
            _ => None,
        };
        debug!("overlay: open {} {} (gen {})", kind, item_id, self.generation);
        self.selection = Some(Selection {
            kind,
            item_id,
            category_tag,
        });
        Some(DetailRequest {
            kind,
            item_id,
            generation: self.generation,
        })
    }

    pub fn is_open(&self) -> bool {
        self.selection.is_some()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn cache(&self) -> &DetailCache {
        &self.cache
    }

    /// Current request identity, for re-issuing fetches after a failure.
    pub fn current_request(&self) -> Option<DetailRequest> {
        self.selection.as_ref().map(|s| DetailRequest {
            kind: s.kind,
            item_id: s.item_id,
            generation: self.generation,
        })
    }

    /// `"{tag}-{id}"`: visual continuity between the row box and the overlay.
    pub fn continuity_key(&self) -> Option<String> {
        let s = self.selection.as_ref()?;
        let tag = s.category_tag.as_deref().unwrap_or(s.kind.as_str());
        Some(format!("{}-{}", tag, s.item_id))
    }

    /// Resolve the selected item through `lookup` (normally a catalog scan).
    pub fn selected_item<'a, F>(&self, lookup: F) -> Option<&'a Item>
    where
        F: FnOnce(MediaKind, u64) -> Option<&'a Item>,
    {
        let s = self.selection.as_ref()?;
        lookup(s.kind, s.item_id)
    }

    fn is_current(&self, req: &DetailRequest) -> bool {
        req.generation == self.generation
            && self
                .selection
                .as_ref()
                .is_some_and(|s| s.item_id == req.item_id && s.kind == req.kind)
    }

    /// Apply a detail fetch result. Returns false if it was stale.
    pub fn apply_detail<E: Display>(
        &mut self,
        req: &DetailRequest,
        result: Result<DetailRecord, E>,
    ) -> bool {
        if !self.is_current(req) {
            debug!("overlay: dropping stale detail for {}", req.item_id);
            return false;
        }
        match result {
            Ok(detail) => {
                self.cache.detail = Some(detail);
                self.cache.detail_error = None;
            }
            Err(e) => self.cache.detail_error = Some(e.to_string()),
        }
        self.cache.detail_done = true;
        true
    }

    /// Apply a trailer-list fetch result. Failures just mean "no trailer".
    pub fn apply_trailer<E: Display>(
        &mut self,
        req: &DetailRequest,
        result: Result<VideoList, E>,
    ) -> bool {
        if !self.is_current(req) {
            debug!("overlay: dropping stale trailer for {}", req.item_id);
            return false;
        }
        self.cache.trailer_key = match result {
            Ok(videos) => videos.trailer_key(),
            Err(e) => {
                debug!("overlay: trailer fetch failed for {}: {}", req.item_id, e);
                None
            }
        };
        self.cache.trailer_done = true;
        true
    }
}
