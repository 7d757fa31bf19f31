//! Route model: `/`, `/movies/:id`, `/tvs`, `/tvs/:id`, `/search?keyword=&id=&type=`.
//!
//! The presence of an item id is the only thing that opens the detail
//! overlay; everything else about the selection is derived from the route.

use std::fmt;

use reqwest::Url;

use crate::model::MediaKind;

const ROUTE_BASE: &str = "flix://app/";

/// Which top-level screen a route renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Home,
    Tv,
    Search,
}

impl View {
    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Tv => "TV Shows",
            Self::Search => "Search",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Home,
    Movie(u64),
    Tv,
    TvShow(u64),
    Search {
        keyword: String,
        id: Option<u64>,
        kind: Option<MediaKind>,
    },
}

impl Route {
    /// Parse a path (with optional query). Unknown paths fall back to `Home`.
    pub fn parse(path: &str) -> Self {
        let Ok(url) = Url::parse(ROUTE_BASE).and_then(|base| base.join(path)) else {
            return Self::Home;
        };
        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();

        match segments.as_slice() {
            [] => Self::Home,
            ["movies", id] => id.parse().map(Self::Movie).unwrap_or(Self::Home),
            ["tvs"] => Self::Tv,
            ["tvs", id] => id.parse().map(Self::TvShow).unwrap_or(Self::Tv),
            ["search"] => {
                let mut keyword = String::new();
                let mut id = None;
                let mut kind = None;
                for (k, v) in url.query_pairs() {
                    match k.as_ref() {
                        "keyword" => keyword = v.into_owned(),
                        "id" => id = v.parse().ok(),
                        "type" => kind = MediaKind::parse(&v),
                        _ => {}
                    }
                }
                Self::Search { keyword, id, kind }
            }
            _ => Self::Home,
        }
    }

    pub fn search(keyword: impl Into<String>) -> Self {
        Self::Search {
            keyword: keyword.into(),
            id: None,
            kind: None,
        }
    }

    pub fn view(&self) -> View {
        match self {
            Self::Home | Self::Movie(_) => View::Home,
            Self::Tv | Self::TvShow(_) => View::Tv,
            Self::Search { .. } => View::Search,
        }
    }

    /// The item id that opens the overlay, if any.
    pub fn selected_id(&self) -> Option<u64> {
        match self {
            Self::Movie(id) | Self::TvShow(id) => Some(*id),
            Self::Search { id, .. } => *id,
            Self::Home | Self::Tv => None,
        }
    }

    /// Which catalogs the selected id refers to.
    pub fn media_kind(&self) -> MediaKind {
        match self {
            Self::Home | Self::Movie(_) => MediaKind::Movie,
            Self::Tv | Self::TvShow(_) => MediaKind::Tv,
            Self::Search { kind, .. } => kind.unwrap_or(MediaKind::Movie),
        }
    }

    pub fn keyword(&self) -> Option<&str> {
        match self {
            Self::Search { keyword, .. } => Some(keyword.as_str()),
            _ => None,
        }
    }

    /// Same screen with `id` selected.
    pub fn with_selection(&self, kind: MediaKind, id: u64) -> Self {
        match self {
            Self::Search { keyword, .. } => Self::Search {
                keyword: keyword.clone(),
                id: Some(id),
                kind: Some(kind),
            },
            _ => match kind {
                MediaKind::Movie => Self::Movie(id),
                MediaKind::Tv => Self::TvShow(id),
            },
        }
    }

    /// Same screen with the overlay closed.
    pub fn without_selection(&self) -> Self {
        match self {
            Self::Home | Self::Movie(_) => Self::Home,
            Self::Tv | Self::TvShow(_) => Self::Tv,
            Self::Search { keyword, .. } => Self::search(keyword.clone()),
        }
    }

    pub fn to_path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Movie(id) => format!("/movies/{}", id),
            Self::Tv => "/tvs".to_string(),
            Self::TvShow(id) => format!("/tvs/{}", id),
            Self::Search { keyword, id, kind } => {
                let mut url = match Url::parse(ROUTE_BASE).and_then(|b| b.join("search")) {
                    Ok(u) => u,
                    Err(_) => return "/search".to_string(),
                };
                {
                    let mut q = url.query_pairs_mut();
                    q.append_pair("keyword", keyword);
                    if let Some(id) = id {
                        q.append_pair("id", &id.to_string());
                    }
                    if let Some(kind) = kind {
                        q.append_pair("type", kind.as_str());
                    }
                }
                match url.query() {
                    Some(query) => format!("{}?{}", url.path(), query),
                    None => url.path().to_string(),
                }
            }
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_path())
    }
}

/// Current route plus back history.
#[derive(Debug, Default)]
pub struct Router {
    current: Route,
    history: Vec<Route>,
}

const HISTORY_LIMIT: usize = 64;

impl Router {
    pub fn new(initial: Route) -> Self {
        Self {
            current: initial,
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    /// Returns false when `route` is already current.
    pub fn navigate(&mut self, route: Route) -> bool {
        if route == self.current {
            return false;
        }
        let prev = std::mem::replace(&mut self.current, route);
        self.history.push(prev);
        if self.history.len() > HISTORY_LIMIT {
            self.history.remove(0);
        }
        true
    }

    pub fn back(&mut self) -> bool {
        match self.history.pop() {
            Some(prev) => {
                self.current = prev;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_paths() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse("/movies/550"), Route::Movie(550));
        assert_eq!(Route::parse("/tvs"), Route::Tv);
        assert_eq!(Route::parse("/tvs/1399"), Route::TvShow(1399));
        assert_eq!(
            Route::parse("/search?keyword=star%20wars&id=11&type=movie"),
            Route::Search {
                keyword: "star wars".into(),
                id: Some(11),
                kind: Some(MediaKind::Movie),
            }
        );
    }

    #[test]
    fn test_parse_garbage_falls_back() {
        assert_eq!(Route::parse("/nope/x/y"), Route::Home);
        assert_eq!(Route::parse("/movies/abc"), Route::Home);
        assert_eq!(Route::parse("/tvs/abc"), Route::Tv);
        assert_eq!(Route::parse("/search?id=zz"), Route::search(""));
    }

    #[test]
    fn test_path_round_trip_with_encoding() {
        let route = Route::Search {
            keyword: "amélie & co".into(),
            id: Some(194),
            kind: Some(MediaKind::Tv),
        };
        let path = route.to_path();
        assert!(path.starts_with("/search?keyword="));
        assert!(!path.contains(' '));
        assert_eq!(Route::parse(&path), route);
    }

    #[test]
    fn test_selection_open_close() {
        let home = Route::Home;
        let open = home.with_selection(MediaKind::Movie, 7);
        assert_eq!(open, Route::Movie(7));
        assert_eq!(open.selected_id(), Some(7));
        assert_eq!(open.without_selection(), Route::Home);

        let tv = Route::TvShow(9);
        assert_eq!(tv.media_kind(), MediaKind::Tv);
        assert_eq!(tv.without_selection(), Route::Tv);

        let search = Route::search("dune").with_selection(MediaKind::Tv, 3);
        assert_eq!(search.media_kind(), MediaKind::Tv);
        assert_eq!(search.without_selection(), Route::search("dune"));
        assert_eq!(Route::search("dune").media_kind(), MediaKind::Movie);
    }

    #[test]
    fn test_router_history() {
        let mut router = Router::default();
        assert!(router.navigate(Route::Movie(1)));
        assert!(!router.navigate(Route::Movie(1)));
        assert!(router.navigate(Route::Tv));
        assert!(router.back());
        assert_eq!(router.current(), &Route::Movie(1));
        assert!(router.back());
        assert_eq!(router.current(), &Route::Home);
        assert!(!router.back());
    }
}
