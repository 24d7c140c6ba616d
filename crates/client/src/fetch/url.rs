//! URL checks used before fetching and when classifying scraped links.

use regex::Regex;
use std::sync::LazyLock;

static IMAGE_EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(jpg|jpeg|png|gif|bmp|heic)$").expect("invalid image extension pattern"));

/// Error type for URL parsing failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Parse an identifier into the URL actually requested.
///
/// Only the request is affected: whitespace is trimmed and the fragment
/// dropped. Cache keys are never rewritten.
pub fn parse_remote(input: &str) -> Result<url::Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut parsed = url::Url::parse(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    parsed.set_fragment(None);

    Ok(parsed)
}

/// Whether the URL ends in a common image extension (case-insensitive).
pub fn is_image_url(url: &str) -> bool {
    IMAGE_EXTENSION.is_match(url)
}

/// Whether the last `/`-separated segment of the URL contains a dot.
pub fn has_extension(url: &str) -> bool {
    url.rsplit('/').next().is_some_and(|segment| segment.contains('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_remote_basic() {
        let url = parse_remote("https://example.com/img/photo.jpg").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("example.com"));
        assert_eq!(url.path(), "/img/photo.jpg");
    }

    #[test]
    fn test_parse_remote_remove_fragment() {
        let url = parse_remote("https://example.com/a.jpg#section").unwrap();
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_parse_remote_preserve_query() {
        let url = parse_remote("https://example.com/a.jpg?w=320&h=240").unwrap();
        assert_eq!(url.query(), Some("w=320&h=240"));
    }

    #[test]
    fn test_parse_remote_trim_whitespace() {
        let url = parse_remote("  https://example.com/a.jpg  ").unwrap();
        assert_eq!(url.as_str(), "https://example.com/a.jpg");
    }

    #[test]
    fn test_parse_remote_unsupported_scheme() {
        let result = parse_remote("file:///etc/passwd");
        assert!(matches!(result, Err(UrlError::UnsupportedScheme(_))));
    }

    #[test]
    fn test_parse_remote_relative_is_invalid() {
        let result = parse_remote("images/a.jpg");
        assert!(matches!(result, Err(UrlError::InvalidUrl(_))));
    }

    #[test]
    fn test_parse_remote_empty() {
        assert!(matches!(parse_remote(""), Err(UrlError::Empty)));
        assert!(matches!(parse_remote("   "), Err(UrlError::Empty)));
    }

    #[test]
    fn test_is_image_url() {
        assert!(is_image_url("https://x/s1600/IMG_3765.jpg"));
        assert!(is_image_url("https://x/IMG_3765.JPEG"));
        assert!(is_image_url("https://x/IMG_3765.HEIC"));
        assert!(!is_image_url("https://x/post.html"));
        assert!(!is_image_url("https://x/IMG_3765.jpg?w=320"));
    }

    #[test]
    fn test_has_extension() {
        assert!(has_extension("https://x/img/photo.jpg"));
        assert!(!has_extension("https://x/img/AVvXsEg"));
        assert!(!has_extension("https://x/img/"));
    }
}
