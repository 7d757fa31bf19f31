//! Keyword search accumulators.
//!
//! Movies and shows page independently under one keyword. Pages are appended,
//! never replaced, and a keyword change throws away everything including any
//! responses still in flight for the old keyword.

use std::fmt::Display;

use tracing::debug;

use crate::model::{CatalogPage, Item, MediaKind};

/// Accumulated results for one media kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub items: Vec<Item>,
    /// Last page applied; 0 before the first page lands.
    pub page: u32,
    pub total_pages: u32,
    pub has_more: bool,
    pub loading: bool,
    pub error: Option<String>,
}

impl SearchResults {
    /// Items that can be drawn. Poster-less items stay in `items` so page
    /// counts keep matching the API.
    pub fn visible(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|i| i.has_poster())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub kind: MediaKind,
    pub keyword: String,
    pub page: u32,
    pub generation: u64,
}

#[derive(Debug, Default)]
pub struct SearchPaginator {
    keyword: String,
    generation: u64,
    movies: SearchResults,
    tv: SearchResults,
}

impl SearchPaginator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn results(&self, kind: MediaKind) -> &SearchResults {
        match kind {
            MediaKind::Movie => &self.movies,
            MediaKind::Tv => &self.tv,
        }
    }

    fn results_mut(&mut self, kind: MediaKind) -> &mut SearchResults {
        match kind {
            MediaKind::Movie => &mut self.movies,
            MediaKind::Tv => &mut self.tv,
        }
    }

    /// Switch to `keyword`. Returns the page-1 fetches to start, one per kind,
    /// or nothing when the keyword is unchanged or blank.
    pub fn set_keyword(&mut self, keyword: &str) -> Vec<SearchRequest> {
        let keyword = keyword.trim();
        if keyword == self.keyword {
            return Vec::new();
        }

        self.generation += 1;
        self.keyword = keyword.to_string();
        self.movies = SearchResults::default();
        self.tv = SearchResults::default();
        debug!("search: keyword {:?} (gen {})", self.keyword, self.generation);

        if self.keyword.is_empty() {
            return Vec::new();
        }
        [MediaKind::Movie, MediaKind::Tv]
            .into_iter()
            .map(|kind| self.start(kind, 1))
            .collect()
    }

    /// Next page for `kind` only. `None` if there is nothing more, or a page
    /// for that kind is already loading.
    pub fn load_more(&mut self, kind: MediaKind) -> Option<SearchRequest> {
        let results = self.results(kind);
        if self.keyword.is_empty() || results.loading || !results.has_more {
            return None;
        }
        let next = results.page + 1;
        Some(self.start(kind, next))
    }

    /// Re-request the page that failed last time for `kind`.
    pub fn retry(&mut self, kind: MediaKind) -> Option<SearchRequest> {
        let results = self.results(kind);
        if self.keyword.is_empty() || results.loading || results.error.is_none() {
            return None;
        }
        let next = results.page + 1;
        Some(self.start(kind, next))
    }

    fn start(&mut self, kind: MediaKind, page: u32) -> SearchRequest {
        let generation = self.generation;
        let keyword = self.keyword.clone();
        let results = self.results_mut(kind);
        results.loading = true;
        results.error = None;
        SearchRequest {
            kind,
            keyword,
            page,
            generation,
        }
    }

    /// Append a fetched page. Returns false for responses to an older keyword.
    pub fn apply<E: Display>(&mut self, req: &SearchRequest, result: Result<CatalogPage, E>) -> bool {
        if req.generation != self.generation {
            debug!("search: dropping stale {} page {} for {:?}", req.kind, req.page, req.keyword);
            return false;
        }
        let results = self.results_mut(req.kind);
        results.loading = false;
        match result {
            Ok(page) => {
                results.items.extend(page.results);
                results.page = req.page;
                results.total_pages = page.total_pages;
                results.has_more = results.page < results.total_pages;
            }
            Err(e) => results.error = Some(e.to_string()),
        }
        true
    }

    /// First accumulated item with `id` for `kind`.
    pub fn find(&self, kind: MediaKind, id: u64) -> Option<&Item> {
        self.results(kind).items.iter().find(|i| i.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u64, poster: bool) -> Item {
        Item {
            id,
            title: format!("item {}", id),
            poster_path: poster.then(|| format!("/{}.jpg", id)),
            backdrop_path: None,
            overview: String::new(),
            release_date: String::new(),
            vote_average: 0.0,
        }
    }

    fn page(ids: std::ops::Range<u64>, total_pages: u32) -> CatalogPage {
        CatalogPage {
            results: ids.map(|id| item(id, true)).collect(),
            total_pages,
            ..CatalogPage::empty()
        }
    }

    fn apply_ok(s: &mut SearchPaginator, req: &SearchRequest, p: CatalogPage) -> bool {
        s.apply::<String>(req, Ok(p))
    }

    #[test]
    fn test_keyword_starts_both_kinds_at_page_one() {
        let mut s = SearchPaginator::new();
        let reqs = s.set_keyword("  dune ");
        assert_eq!(reqs.len(), 2);
        assert!(reqs.iter().all(|r| r.page == 1 && r.keyword == "dune"));
        assert_eq!(s.keyword(), "dune");
        assert!(s.results(MediaKind::Movie).loading);
        assert!(s.results(MediaKind::Tv).loading);

        // Same keyword again is a no-op.
        assert!(s.set_keyword("dune").is_empty());
    }

    #[test]
    fn test_has_more_from_total_pages() {
        let mut s = SearchPaginator::new();
        let reqs = s.set_keyword("x");
        apply_ok(&mut s, &reqs[0], page(0..20, 3));
        apply_ok(&mut s, &reqs[1], page(100..105, 1));
        assert!(s.results(MediaKind::Movie).has_more);
        assert!(!s.results(MediaKind::Tv).has_more);
        assert!(s.load_more(MediaKind::Tv).is_none());
    }

    #[test]
    fn test_load_more_movies_leaves_tv_untouched() {
        let mut s = SearchPaginator::new();
        let reqs = s.set_keyword("star");
        apply_ok(&mut s, &reqs[0], page(0..20, 3));
        apply_ok(&mut s, &reqs[1], page(100..120, 4));
        let tv_before = s.results(MediaKind::Tv).clone();

        let more = s.load_more(MediaKind::Movie).unwrap();
        assert_eq!(more.page, 2);
        apply_ok(&mut s, &more, page(20..40, 3));

        let movies = s.results(MediaKind::Movie);
        assert_eq!(movies.items.len(), 40);
        assert_eq!(movies.page, 2);
        assert!(movies.has_more);
        assert_eq!(s.results(MediaKind::Tv), &tv_before);

        // The TV counter was not advanced by the movie page.
        assert_eq!(s.load_more(MediaKind::Tv).map(|r| r.page), Some(2));
    }

    #[test]
    fn test_append_preserves_order_and_duplicates() {
        let mut s = SearchPaginator::new();
        let reqs = s.set_keyword("dup");
        apply_ok(&mut s, &reqs[0], page(0..3, 2));
        let more = s.load_more(MediaKind::Movie).unwrap();
        apply_ok(&mut s, &more, page(2..4, 2));

        let ids: Vec<u64> = s.results(MediaKind::Movie).items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 2, 3]);
        assert!(!s.results(MediaKind::Movie).has_more);
    }

    #[test]
    fn test_second_load_more_refused_while_in_flight() {
        let mut s = SearchPaginator::new();
        let reqs = s.set_keyword("q");
        apply_ok(&mut s, &reqs[0], page(0..20, 5));
        assert!(s.load_more(MediaKind::Movie).is_some());
        assert!(s.load_more(MediaKind::Movie).is_none());
    }

    #[test]
    fn test_keyword_change_drops_old_responses() {
        let mut s = SearchPaginator::new();
        let old = s.set_keyword("old");
        apply_ok(&mut s, &old[0], page(0..5, 2));
        let new = s.set_keyword("new");

        assert!(s.results(MediaKind::Movie).items.is_empty());
        assert!(!apply_ok(&mut s, &old[1], page(50..55, 1)));
        assert!(s.results(MediaKind::Tv).items.is_empty());
        assert!(apply_ok(&mut s, &new[1], page(60..61, 1)));
        assert_eq!(s.results(MediaKind::Tv).items.len(), 1);
    }

    #[test]
    fn test_blank_keyword_clears_without_fetching() {
        let mut s = SearchPaginator::new();
        let reqs = s.set_keyword("a");
        apply_ok(&mut s, &reqs[0], page(0..5, 2));
        assert!(s.set_keyword("   ").is_empty());
        assert!(s.results(MediaKind::Movie).items.is_empty());
        assert!(s.load_more(MediaKind::Movie).is_none());
    }

    #[test]
    fn test_visible_skips_posterless_items() {
        let mut s = SearchPaginator::new();
        let reqs = s.set_keyword("p");
        let mixed = CatalogPage {
            results: vec![item(1, true), item(2, false), item(3, true)],
            total_pages: 2,
            ..CatalogPage::empty()
        };
        apply_ok(&mut s, &reqs[0], mixed);
        let results = s.results(MediaKind::Movie);
        assert_eq!(results.items.len(), 3);
        assert_eq!(results.visible().map(|i| i.id).collect::<Vec<_>>(), vec![1, 3]);
        assert!(s.find(MediaKind::Movie, 2).is_some());
    }

    #[test]
    fn test_failed_page_can_be_retried() {
        let mut s = SearchPaginator::new();
        let reqs = s.set_keyword("err");
        assert!(s.apply(&reqs[1], Err("503")));
        let tv = s.results(MediaKind::Tv);
        assert_eq!(tv.error.as_deref(), Some("503"));
        assert!(!tv.loading);
        assert_eq!(tv.page, 0);

        let retry = s.retry(MediaKind::Tv).unwrap();
        assert_eq!(retry.page, 1);
        assert!(s.results(MediaKind::Tv).error.is_none());
    }
}
