//! TmdbClient against an in-process mock of the TMDB v3 API.
//!
//! The mock serves fixture JSON on an ephemeral port and checks that every
//! request carries the api_key query parameter.
//!
//! Run with: cargo test --test tmdb_client

use std::collections::HashMap;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use flix_core::config::ApiConfig;
use flix_core::error::FetchError;
use flix_core::model::{Category, MediaKind};
use flix_core::tmdb::TmdbClient;

const KEY: &str = "test-key";

type Params = Query<HashMap<String, String>>;

fn authorised(params: &HashMap<String, String>) -> bool {
    params.get("api_key").map(String::as_str) == Some(KEY)
}

fn unauthorised() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"status_code": 7, "status_message": "Invalid API key"})),
    )
        .into_response()
}

async fn now_playing(Query(params): Params) -> Response {
    if !authorised(&params) {
        return unauthorised();
    }
    let page: u32 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    Json(json!({
        "page": page,
        "dates": {"maximum": "2024-05-01", "minimum": "2024-03-14"},
        "results": [
            {"id": 1, "title": "Hero", "poster_path": "/hero.jpg", "backdrop_path": "/hero_bd.jpg",
             "overview": "Banner item", "release_date": "2024-04-01", "vote_average": 7.5},
            {"id": 2, "title": "Second", "poster_path": null, "backdrop_path": null,
             "overview": null, "release_date": "", "vote_average": 6.1}
        ],
        "total_pages": 12,
        "total_results": 240
    }))
    .into_response()
}

async fn airing_today(Query(params): Params) -> Response {
    if !authorised(&params) {
        return unauthorised();
    }
    Json(json!({
        "page": 1,
        "results": [
            {"id": 77, "name": "Nightly Show", "poster_path": "/n.jpg",
             "first_air_date": "2019-09-09", "overview": "Talk", "vote_average": 5.4}
        ],
        "total_pages": 0,
        "total_results": 1
    }))
    .into_response()
}

async fn movie_detail(Path(id): Path<u64>, Query(params): Params) -> Response {
    if !authorised(&params) {
        return unauthorised();
    }
    if id != 550 {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"status_code": 34, "status_message": "The resource you requested could not be found."})),
        )
            .into_response();
    }
    Json(json!({
        "id": 550,
        "title": "Fight Club",
        "runtime": 139,
        "genres": [{"id": 18, "name": "Drama"}, {"id": 53, "name": "Thriller"}]
    }))
    .into_response()
}

async fn tv_detail(Path(id): Path<u64>) -> Response {
    Json(json!({
        "id": id,
        "name": "Long Runner",
        "number_of_seasons": 4,
        "number_of_episodes": 40,
        "genres": [{"id": 10765, "name": "Sci-Fi & Fantasy"}]
    }))
    .into_response()
}

async fn movie_videos(Path(_id): Path<u64>) -> Response {
    Json(json!({
        "id": 550,
        "results": [
            {"type": "Featurette", "site": "YouTube", "key": "feat", "name": "Behind"},
            {"type": "Trailer", "site": "Vimeo", "key": "vim", "name": "Vimeo cut"},
            {"type": "Trailer", "site": "YouTube", "key": "SUXWAEX2jlg", "name": "Official"}
        ]
    }))
    .into_response()
}

async fn search_movie(Query(params): Params) -> Response {
    // Echo the decoded query back as the item title so the test can see it.
    let query = params.get("query").cloned().unwrap_or_default();
    let page: u32 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    Json(json!({
        "page": page,
        "results": [{"id": 900 + page as u64, "title": query, "poster_path": "/s.jpg"}],
        "total_pages": 3,
        "total_results": 3
    }))
    .into_response()
}

async fn broken() -> Response {
    (StatusCode::OK, "{\"page\": 1, \"results\": [{\"id\": \"not a number\"}]}").into_response()
}

async fn overloaded() -> Response {
    StatusCode::SERVICE_UNAVAILABLE.into_response()
}

async fn spawn_mock() -> String {
    let app = Router::new()
        .route("/movie/now_playing", get(now_playing))
        .route("/movie/popular", get(broken))
        .route("/movie/top_rated", get(overloaded))
        .route("/tv/airing_today", get(airing_today))
        .route("/movie/:id", get(movie_detail))
        .route("/movie/:id/videos", get(movie_videos))
        .route("/tv/:id", get(tv_detail))
        .route("/search/movie", get(search_movie));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client(base_url: &str, api_key: &str) -> TmdbClient {
    TmdbClient::new(&ApiConfig {
        api_key: api_key.to_string(),
        base_url: base_url.to_string(),
        timeout_secs: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn test_catalog_page_parses() {
    let base = spawn_mock().await;
    let page = client(&base, KEY)
        .catalog(Category::NowPlaying, 2)
        .await
        .unwrap();

    assert_eq!(page.page, 2);
    assert_eq!(page.total_pages, 12);
    assert_eq!(page.results.len(), 2);
    assert_eq!(page.results[0].title, "Hero");
    assert_eq!(page.results[0].year(), "2024");
    assert_eq!(page.results[1].overview, "");
    assert!(!page.results[1].has_poster());
    assert_eq!(page.dates.map(|d| d.minimum).as_deref(), Some("2024-03-14"));
}

#[tokio::test]
async fn test_tv_items_normalise() {
    let base = spawn_mock().await;
    let page = client(&base, KEY)
        .catalog(Category::AiringToday, 1)
        .await
        .unwrap();

    let show = &page.results[0];
    assert_eq!(show.title, "Nightly Show");
    assert_eq!(show.release_date, "2019-09-09");
    // total_pages 0 from the API still means one page.
    assert_eq!(page.total_pages, 1);
}

#[tokio::test]
async fn test_details_for_both_kinds() {
    let base = spawn_mock().await;
    let tmdb = client(&base, KEY);

    let movie = tmdb.movie_details(550).await.unwrap();
    assert_eq!(movie.extent().as_deref(), Some("139 min"));
    assert_eq!(movie.genre_line(), "Drama • Thriller");

    let show = tmdb.tv_details(1399).await.unwrap();
    assert_eq!(show.extent().as_deref(), Some("4 seasons | 40 episodes"));
    assert!(show.runtime.is_none());
    assert_eq!(tmdb.details(MediaKind::Tv, 1399).await.unwrap(), show);
}

#[tokio::test]
async fn test_missing_item_maps_to_not_found() {
    let base = spawn_mock().await;
    let err = client(&base, KEY).movie_details(1).await.unwrap_err();
    assert!(matches!(err, FetchError::NotFound(ref e) if e == "movie/1"), "{err}");
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_server_error_maps_to_status() {
    let base = spawn_mock().await;
    let tmdb = client(&base, KEY);

    let err = tmdb.catalog(Category::TopRated, 1).await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 503, .. }), "{err}");
    assert!(err.is_retryable());

    let err = client(&base, "wrong").catalog(Category::NowPlaying, 1).await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 401, .. }), "{err}");
}

#[tokio::test]
async fn test_shape_mismatch_maps_to_malformed() {
    let base = spawn_mock().await;
    let err = client(&base, KEY)
        .catalog(Category::Popular, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::MalformedResponse { .. }), "{err}");
}

#[tokio::test]
async fn test_search_encodes_keyword() {
    let base = spawn_mock().await;
    let page = client(&base, KEY)
        .search(MediaKind::Movie, "amélie & co", 2)
        .await
        .unwrap();
    assert_eq!(page.results[0].title, "amélie & co");
    assert_eq!(page.results[0].id, 902);
    assert_eq!(page.page, 2);
}

#[tokio::test]
async fn test_trailer_is_first_youtube_trailer() {
    let base = spawn_mock().await;
    let videos = client(&base, KEY)
        .videos(MediaKind::Movie, 550)
        .await
        .unwrap();
    assert_eq!(videos.results.len(), 3);
    assert_eq!(videos.trailer_key().as_deref(), Some("SUXWAEX2jlg"));
}

#[tokio::test]
async fn test_missing_key_fails_before_network() {
    // Nothing listens here; MissingApiKey must come back without a connect attempt.
    let tmdb = client("http://127.0.0.1:9", "");
    assert!(!tmdb.has_api_key());
    let err = tmdb.catalog(Category::NowPlaying, 1).await.unwrap_err();
    assert!(matches!(err, FetchError::MissingApiKey));
}

#[tokio::test]
async fn test_unreachable_host_maps_to_network() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{}", addr), KEY)
        .catalog(Category::NowPlaying, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Network(_)), "{err}");
    assert!(err.is_retryable());
}
