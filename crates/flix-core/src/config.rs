use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::platform;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub images: ImagesConfig,
    #[serde(default)]
    pub carousel: CarouselConfig,
}

/// Metadata API access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// TMDB v3 API key. `TMDB_API_KEY` overrides this when set.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagesConfig {
    #[serde(default = "default_image_base_url")]
    pub base_url: String,
    /// Size segment used when a caller doesn't ask for one (e.g. `w500`, `original`).
    #[serde(default = "default_image_size")]
    pub default_size: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarouselConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Duration of the slide between two windows.
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,
    /// When true a transition on any row blocks paging on every row until it
    /// finishes. Off by default: each row has its own guard.
    #[serde(default)]
    pub shared_transition_guard: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_api_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            base_url: default_image_base_url(),
            default_size: default_image_size(),
        }
    }
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            transition_ms: default_transition_ms(),
            shared_transition_guard: false,
        }
    }
}

fn default_api_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_image_size() -> String {
    "w500".to_string()
}

fn default_page_size() -> usize {
    crate::carousel::DEFAULT_PAGE_SIZE
}

fn default_transition_ms() -> u64 {
    600
}

impl Config {
    /// Load from the platform config path, writing defaults on first run.
    /// The `TMDB_API_KEY` environment variable is applied on top.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::load_from(&Self::config_path())?;
        config.apply_env(std::env::var(platform::API_KEY_ENV).ok());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        if config.carousel.page_size == 0 {
            tracing::warn!("carousel.page_size = 0 is invalid, using default");
            config.carousel.page_size = default_page_size();
        }
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn apply_env(&mut self, api_key: Option<String>) {
        if let Some(key) = api_key {
            let key = key.trim();
            if !key.is_empty() {
                self.api.api_key = key.to_string();
            }
        }
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.api.api_key.is_empty());
        assert_eq!(config.api.base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.images.default_size, "w500");
        assert_eq!(config.carousel.page_size, 6);
        assert!(!config.carousel.shared_transition_guard);
        assert!(Config::config_path().ends_with("flix/config.toml"));
    }

    #[test]
    fn test_load_writes_defaults_on_first_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.carousel.transition_ms, 600);

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.api.base_url, config.api.base_url);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[api]\napi_key = \"abc\"\n\n[carousel]\nshared_transition_guard = true\npage_size = 0\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api.api_key, "abc");
        assert_eq!(config.api.timeout_secs, 10);
        assert!(config.carousel.shared_transition_guard);
        assert_eq!(config.carousel.page_size, 6);
        assert_eq!(config.images.base_url, "https://image.tmdb.org/t/p");
    }

    #[test]
    fn test_env_key_overrides_file() {
        let mut config = Config::default();
        config.api.api_key = "from-file".to_string();

        config.apply_env(Some("  ".to_string()));
        assert_eq!(config.api.api_key, "from-file");

        config.apply_env(Some("from-env".to_string()));
        assert_eq!(config.api.api_key, "from-env");

        config.apply_env(None);
        assert_eq!(config.api.api_key, "from-env");
    }
}
