//! Carousel paging: a fixed-size window over a category list with circular
//! advance/retreat and a transition guard.
//!
//! Item 0 of every list is the banner item and never appears in a window.
//! The last page may be short; with `N` items and page size `P` there are
//! `floor(N / P)` pages, so trailing items that don't fill a page beyond
//! that are never shown.

use std::collections::HashMap;

use crate::model::Category;

pub const DEFAULT_PAGE_SIZE: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

/// Paging state for one mounted category row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarouselState {
    pub page_index: usize,
    pub direction: Direction,
    pub transition_in_flight: bool,
    /// Page being animated out while a transition is in flight.
    pub outgoing_page: Option<usize>,
}

/// Where the transition guard lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuardScope {
    /// Each row blocks only itself.
    #[default]
    PerCategory,
    /// One flag for every row on screen: a transition anywhere blocks all rows.
    Shared,
}

/// Items `[size*page, size*page + size)` of the list with the banner item removed.
pub fn visible_window<T>(items: &[T], page_index: usize, page_size: usize) -> &[T] {
    let rest = items.get(1..).unwrap_or(&[]);
    let start = page_size.saturating_mul(page_index).min(rest.len());
    let end = start.saturating_add(page_size).min(rest.len());
    &rest[start..end]
}

/// `floor(item_count / page_size) - 1`, clamped at zero.
pub fn max_page_index(item_count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    (item_count / page_size).saturating_sub(1)
}

/// Horizontal offsets of both windows at `progress` (0.0..=1.0) through a
/// transition across a row `width` cells wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideFrame {
    pub outgoing_x: i32,
    pub incoming_x: i32,
}

pub fn slide_offsets(direction: Direction, width: u16, progress: f32) -> SlideFrame {
    let width = width as f32;
    let p = if progress.is_nan() { 1.0 } else { progress.clamp(0.0, 1.0) };
    let travelled = (width * p).round() as i32;
    let width = width as i32;
    match direction {
        // Out to the left, in from the right.
        Direction::Forward => SlideFrame {
            outgoing_x: -travelled,
            incoming_x: width - travelled,
        },
        Direction::Backward => SlideFrame {
            outgoing_x: travelled,
            incoming_x: -width + travelled,
        },
    }
}

#[derive(Debug)]
pub struct CarouselEngine {
    page_size: usize,
    scope: GuardScope,
    rows: HashMap<Category, CarouselState>,
    /// Holder of the shared guard when `scope == Shared`.
    shared_holder: Option<Category>,
}

impl CarouselEngine {
    pub fn new(page_size: usize, scope: GuardScope) -> Self {
        Self {
            page_size: page_size.max(1),
            scope,
            rows: HashMap::new(),
            shared_holder: None,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Create zeroed state for a row if it has none.
    pub fn mount(&mut self, category: Category) {
        self.rows.entry(category).or_default();
    }

    /// Drop a row's state; remounting starts again at page 0.
    pub fn unmount(&mut self, category: Category) {
        self.rows.remove(&category);
        if self.shared_holder == Some(category) {
            self.shared_holder = None;
        }
    }

    pub fn state(&self, category: Category) -> CarouselState {
        self.rows.get(&category).cloned().unwrap_or_default()
    }

    pub fn page_index(&self, category: Category) -> usize {
        self.rows.get(&category).map_or(0, |s| s.page_index)
    }

    pub fn window<'a, T>(&self, category: Category, items: &'a [T]) -> &'a [T] {
        visible_window(items, self.page_index(category), self.page_size)
    }

    /// True when input on `category` must be ignored.
    pub fn is_blocked(&self, category: Category) -> bool {
        match self.scope {
            GuardScope::Shared => self.shared_holder.is_some(),
            GuardScope::PerCategory => self
                .rows
                .get(&category)
                .is_some_and(|s| s.transition_in_flight),
        }
    }

    pub fn any_in_flight(&self) -> bool {
        self.rows.values().any(|s| s.transition_in_flight)
    }

    /// Next page, wrapping from the last page to 0. Returns false (and
    /// changes nothing) while blocked or when the list has a single page.
    pub fn advance(&mut self, category: Category, item_count: usize) -> bool {
        self.turn(category, item_count, Direction::Forward)
    }

    /// Previous page, wrapping from 0 to the last page.
    pub fn retreat(&mut self, category: Category, item_count: usize) -> bool {
        self.turn(category, item_count, Direction::Backward)
    }

    fn turn(&mut self, category: Category, item_count: usize, direction: Direction) -> bool {
        if self.is_blocked(category) {
            return false;
        }
        let max = max_page_index(item_count, self.page_size);
        if max == 0 {
            return false;
        }

        let state = self.rows.entry(category).or_default();
        let from = state.page_index.min(max);
        let to = match direction {
            Direction::Forward => {
                if from == max {
                    0
                } else {
                    from + 1
                }
            }
            Direction::Backward => {
                if from == 0 {
                    max
                } else {
                    from - 1
                }
            }
        };
        state.direction = direction;
        state.transition_in_flight = true;
        state.outgoing_page = Some(from);
        state.page_index = to;
        if self.scope == GuardScope::Shared {
            self.shared_holder = Some(category);
        }
        true
    }

    /// Exit animation finished for `category`; unblocks the next turn.
    pub fn complete_transition(&mut self, category: Category) {
        if let Some(state) = self.rows.get_mut(&category) {
            state.transition_in_flight = false;
            state.outgoing_page = None;
        }
        if self.shared_holder == Some(category) {
            self.shared_holder = None;
        }
    }

    /// Pull the page index back in range after the list shrank.
    pub fn clamp(&mut self, category: Category, item_count: usize) {
        let max = max_page_index(item_count, self.page_size);
        if let Some(state) = self.rows.get_mut(&category) {
            if state.page_index > max {
                state.page_index = max;
            }
        }
    }
}

impl Default for CarouselEngine {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, GuardScope::PerCategory)
    }
}
