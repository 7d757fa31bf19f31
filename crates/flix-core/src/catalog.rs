//! Per-category catalog slots with apply-time staleness checks.

use std::collections::HashMap;

use crate::model::{CatalogPage, Category, Item, MediaKind};

#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Pending,
    Ready(CatalogPage),
    Failed(String),
}

#[derive(Debug, Default)]
pub struct CatalogStore {
    slots: HashMap<Category, (u64, Slot)>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `category` pending and return the generation its result must carry.
    /// A refresh keeps the previous page on screen until the new one lands.
    pub fn begin_load(&mut self, category: Category) -> u64 {
        let entry = self.slots.entry(category).or_insert((0, Slot::Pending));
        entry.0 += 1;
        if matches!(entry.1, Slot::Failed(_)) {
            entry.1 = Slot::Pending;
        }
        entry.0
    }

    /// Store a fetch result. Returns false when a newer load superseded it.
    pub fn apply<E: std::fmt::Display>(
        &mut self,
        category: Category,
        generation: u64,
        result: Result<CatalogPage, E>,
    ) -> bool {
        let Some(entry) = self.slots.get_mut(&category) else {
            return false;
        };
        if entry.0 != generation {
            return false;
        }
        entry.1 = match result {
            Ok(page) => Slot::Ready(page),
            Err(e) => match &entry.1 {
                // Keep stale-but-good data over an error.
                Slot::Ready(_) => return true,
                _ => Slot::Failed(e.to_string()),
            },
        };
        true
    }

    pub fn slot(&self, category: Category) -> &Slot {
        static PENDING: Slot = Slot::Pending;
        self.slots.get(&category).map_or(&PENDING, |(_, s)| s)
    }

    pub fn items(&self, category: Category) -> &[Item] {
        match self.slot(category) {
            Slot::Ready(page) => &page.results,
            _ => &[],
        }
    }

    pub fn is_pending(&self, category: Category) -> bool {
        matches!(self.slot(category), Slot::Pending)
    }

    /// True only while every category of `kind` is still pending.
    pub fn is_loading(&self, kind: MediaKind) -> bool {
        Category::all(kind).iter().all(|c| self.is_pending(*c))
    }

    /// Item 0 of the lead category (now playing / airing today).
    pub fn banner(&self, kind: MediaKind) -> Option<&Item> {
        let lead = Category::all(kind)[0];
        self.items(lead).first()
    }

    /// First item with `id` across the loaded catalogs of `kind`, in row order.
    pub fn find(&self, kind: MediaKind, id: u64) -> Option<&Item> {
        Category::all(kind)
            .iter()
            .flat_map(|c| self.items(*c))
            .find(|item| item.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u64, title: &str) -> Item {
        Item {
            id,
            title: title.to_string(),
            poster_path: None,
            backdrop_path: None,
            overview: String::new(),
            release_date: String::new(),
            vote_average: 0.0,
        }
    }

    fn page(items: Vec<Item>) -> CatalogPage {
        CatalogPage {
            results: items,
            ..CatalogPage::empty()
        }
    }

    #[test]
    fn test_loader_shows_until_any_category_lands() {
        let mut store = CatalogStore::new();
        let gens: Vec<(Category, u64)> = Category::MOVIES
            .iter()
            .map(|c| (*c, store.begin_load(*c)))
            .collect();
        assert!(store.is_loading(MediaKind::Movie));

        let (cat, gen) = gens[2];
        assert!(store.apply::<String>(cat, gen, Ok(page(vec![item(1, "a")]))));
        assert!(!store.is_loading(MediaKind::Movie));
        assert!(store.is_pending(Category::NowPlaying));
        assert!(store.is_loading(MediaKind::Tv));
    }

    #[test]
    fn test_superseded_result_is_dropped() {
        let mut store = CatalogStore::new();
        let old = store.begin_load(Category::Popular);
        let new = store.begin_load(Category::Popular);

        assert!(store.apply::<String>(Category::Popular, new, Ok(page(vec![item(2, "new")]))));
        assert!(!store.apply::<String>(Category::Popular, old, Ok(page(vec![item(1, "old")]))));
        assert_eq!(store.items(Category::Popular)[0].title, "new");
    }

    #[test]
    fn test_failure_keeps_previous_data() {
        let mut store = CatalogStore::new();
        let g = store.begin_load(Category::Upcoming);
        store.apply::<String>(Category::Upcoming, g, Ok(page(vec![item(5, "kept")])));

        let g = store.begin_load(Category::Upcoming);
        assert!(store.apply(Category::Upcoming, g, Err("boom")));
        assert_eq!(store.items(Category::Upcoming).len(), 1);

        let g = store.begin_load(Category::TopRated);
        store.apply(Category::TopRated, g, Err("offline"));
        assert_eq!(store.slot(Category::TopRated), &Slot::Failed("offline".into()));
        assert!(store.items(Category::TopRated).is_empty());
    }

    #[test]
    fn test_find_and_banner_respect_kind() {
        let mut store = CatalogStore::new();
        let g = store.begin_load(Category::NowPlaying);
        store.apply::<String>(Category::NowPlaying, g, Ok(page(vec![item(10, "hero"), item(11, "x")])));
        let g = store.begin_load(Category::AiringToday);
        store.apply::<String>(Category::AiringToday, g, Ok(page(vec![item(11, "show")])));

        assert_eq!(store.banner(MediaKind::Movie).map(|i| i.id), Some(10));
        assert_eq!(store.find(MediaKind::Movie, 11).map(|i| i.title.as_str()), Some("x"));
        assert_eq!(store.find(MediaKind::Tv, 11).map(|i| i.title.as_str()), Some("show"));
        assert!(store.find(MediaKind::Tv, 10).is_none());
        assert!(store.banner(MediaKind::Tv).is_some());
    }
}
