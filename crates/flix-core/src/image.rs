//! Image URL construction.

use crate::config::ImagesConfig;

#[derive(Debug, Clone)]
pub struct ImageResolver {
    base_url: String,
    default_size: String,
}

impl ImageResolver {
    pub fn new(config: &ImagesConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            default_size: config.default_size.clone(),
        }
    }

    /// `{base}/{size}/{path}`. An empty or missing path has no image and
    /// yields `None`; callers render their own placeholder.
    pub fn url(&self, path: Option<&str>, size: Option<&str>) -> Option<String> {
        let path = path?.trim_start_matches('/');
        if path.is_empty() {
            return None;
        }
        let size = size.unwrap_or(&self.default_size);
        Some(format!("{}/{}/{}", self.base_url, size, path))
    }
}

impl Default for ImageResolver {
    fn default() -> Self {
        Self::new(&ImagesConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_uses_default_size() {
        let images = ImageResolver::default();
        assert_eq!(
            images.url(Some("/abc.jpg"), None).as_deref(),
            Some("https://image.tmdb.org/t/p/w500/abc.jpg")
        );
        assert_eq!(
            images.url(Some("/abc.jpg"), Some("original")).as_deref(),
            Some("https://image.tmdb.org/t/p/original/abc.jpg")
        );
    }

    #[test]
    fn test_missing_path_has_no_image() {
        let images = ImageResolver::default();
        assert_eq!(images.url(None, None), None);
        assert_eq!(images.url(Some(""), Some("w300")), None);
        assert_eq!(images.url(Some("/"), None), None);
    }

    #[test]
    fn test_trailing_slash_in_base_is_ignored() {
        let images = ImageResolver::new(&ImagesConfig {
            base_url: "http://img.local/t/p/".into(),
            default_size: "w300".into(),
        });
        assert_eq!(
            images.url(Some("x.png"), None).as_deref(),
            Some("http://img.local/t/p/w300/x.png")
        );
    }
}
