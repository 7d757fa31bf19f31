mod action;
mod app;
mod app_state;
mod component;
mod components;
mod focus;
mod theme;
mod widgets;
mod workspace;

use flix_core::config::Config;
use flix_core::platform;
use flix_core::route::Route;
use flix_core::tmdb::TmdbClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let log_path = platform::log_path();
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; default to debug for app code but suppress noisy
    // connection-level DEBUG from HTTP client internals (hyper_util, reqwest).
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("flix log: {}", log_path.display());

    tracing::info!("flix starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(
                "config {} unreadable, using defaults: {}",
                Config::config_path().display(),
                e
            );
            let mut config = Config::default();
            config.apply_env(std::env::var(platform::API_KEY_ENV).ok());
            config
        }
    };

    let tmdb = TmdbClient::new(&config.api)?;
    if !tmdb.has_api_key() {
        tracing::warn!(
            "no API key configured; set api.api_key or {}",
            platform::API_KEY_ENV
        );
    }

    // Optional start path, e.g. `flix /tvs/1399` or `flix '/search?keyword=dune'`.
    let initial = std::env::args()
        .nth(1)
        .map(|path| Route::parse(&path))
        .unwrap_or_default();
    tracing::info!("start route: {}", initial);

    if let Err(e) = app::App::new(&config, tmdb, initial).run().await {
        tracing::error!("flix exited with error: {:#}", e);
        return Err(e);
    }

    Ok(())
}
