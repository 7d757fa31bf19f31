//! Catalog data as returned by the metadata API.
//!
//! Movie and TV payloads differ only in field names (`title`/`name`,
//! `release_date`/`first_air_date`); both normalise into [`Item`].

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Which half of the catalog an id belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Tv,
}

impl MediaKind {
    /// Path segment used by the API (`movie/...`, `tv/...`) and by search routes.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "movie" | "movies" => Some(Self::Movie),
            "tv" | "tvs" => Some(Self::Tv),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Movie => "Movies",
            Self::Tv => "TV Shows",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named catalog slice with its own carousel row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    NowPlaying,
    Popular,
    TopRated,
    Upcoming,
    AiringToday,
    PopularTv,
    TopRatedTv,
    OnTheAir,
}

impl Category {
    pub const MOVIES: [Category; 4] = [
        Category::NowPlaying,
        Category::Popular,
        Category::TopRated,
        Category::Upcoming,
    ];

    pub const TV: [Category; 4] = [
        Category::AiringToday,
        Category::PopularTv,
        Category::TopRatedTv,
        Category::OnTheAir,
    ];

    pub fn all(kind: MediaKind) -> &'static [Category] {
        match kind {
            MediaKind::Movie => &Self::MOVIES,
            MediaKind::Tv => &Self::TV,
        }
    }

    pub fn kind(self) -> MediaKind {
        match self {
            Self::NowPlaying | Self::Popular | Self::TopRated | Self::Upcoming => MediaKind::Movie,
            Self::AiringToday | Self::PopularTv | Self::TopRatedTv | Self::OnTheAir => {
                MediaKind::Tv
            }
        }
    }

    /// API list endpoint, relative to the base URL.
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::NowPlaying => "movie/now_playing",
            Self::Popular => "movie/popular",
            Self::TopRated => "movie/top_rated",
            Self::Upcoming => "movie/upcoming",
            Self::AiringToday => "tv/airing_today",
            Self::PopularTv => "tv/popular",
            Self::TopRatedTv => "tv/top_rated",
            Self::OnTheAir => "tv/on_the_air",
        }
    }

    /// Stable short tag, used in continuity keys and logs.
    pub fn tag(self) -> &'static str {
        match self {
            Self::NowPlaying => "nowPlaying",
            Self::Popular | Self::PopularTv => "popular",
            Self::TopRated | Self::TopRatedTv => "topRated",
            Self::Upcoming => "upcoming",
            Self::AiringToday => "airToday",
            Self::OnTheAir => "onTheAir",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::NowPlaying => "Now Playing",
            Self::Popular | Self::PopularTv => "Popular",
            Self::TopRated | Self::TopRatedTv => "Top Rated",
            Self::Upcoming => "Upcoming",
            Self::AiringToday => "Airing Today",
            Self::OnTheAir => "On The Air",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind(), self.tag())
    }
}

/// One movie or show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    #[serde(alias = "name", default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    #[serde(
        alias = "first_air_date",
        default,
        deserialize_with = "null_as_default"
    )]
    pub release_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_average: f32,
}

impl Item {
    /// Four-digit year from the ISO release/air date, or "" when absent.
    pub fn year(&self) -> &str {
        match self.release_date.get(..4) {
            Some(y) if y.bytes().all(|b| b.is_ascii_digit()) => y,
            _ => "",
        }
    }

    pub fn has_poster(&self) -> bool {
        self.poster_path.as_deref().is_some_and(|p| !p.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub maximum: String,
    pub minimum: String,
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogPage {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<Item>,
    #[serde(default = "first_page", deserialize_with = "at_least_one")]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
    /// Only present on now-playing / upcoming.
    #[serde(default)]
    pub dates: Option<DateRange>,
}

impl CatalogPage {
    pub fn empty() -> Self {
        Self {
            page: 1,
            results: Vec::new(),
            total_pages: 1,
            total_results: 0,
            dates: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// Extended metadata from `movie/{id}` or `tv/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailRecord {
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Minutes; movies only.
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub number_of_seasons: Option<u32>,
    #[serde(default)]
    pub number_of_episodes: Option<u32>,
}

impl DetailRecord {
    pub fn genre_line(&self) -> String {
        self.genres
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(" • ")
    }

    /// "112 min" for movies, "3 seasons | 24 episodes" for shows.
    pub fn extent(&self) -> Option<String> {
        if let Some(runtime) = self.runtime {
            return Some(format!("{} min", runtime));
        }
        match (self.number_of_seasons, self.number_of_episodes) {
            (Some(s), Some(e)) => Some(format!("{} seasons | {} episodes", s, e)),
            (Some(s), None) => Some(format!("{} seasons", s)),
            (None, Some(e)) => Some(format!("{} episodes", e)),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub site: String,
    pub key: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoList {
    #[serde(default)]
    pub results: Vec<Video>,
}

impl VideoList {
    /// First YouTube trailer, in API order.
    pub fn trailer(&self) -> Option<&Video> {
        self.results
            .iter()
            .find(|v| v.kind == "Trailer" && v.site == "YouTube")
    }

    pub fn trailer_key(&self) -> Option<String> {
        self.trailer().map(|v| v.key.clone())
    }
}

pub fn youtube_watch_url(key: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", key)
}

pub fn youtube_embed_url(key: &str) -> String {
    format!("https://www.youtube.com/embed/{}?autoplay=1&controls=1", key)
}

fn first_page() -> u32 {
    1
}

fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

fn at_least_one<'de, D>(de: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(de)?.unwrap_or(1).max(1))
}
