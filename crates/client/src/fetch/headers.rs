//! Naming hints taken from response headers.

use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE, HeaderMap};

/// Filename from a `Content-Disposition` header, if any.
///
/// Handles both `filename="..."` and RFC 5987 `filename*=charset''...`
/// forms; the extended form wins. Any directory part is discarded.
pub fn disposition_filename(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(CONTENT_DISPOSITION)?.to_str().ok()?;

    let mut plain = None;
    let mut extended = None;

    for param in value.split(';').map(str::trim) {
        let Some((key, raw)) = param.split_once('=') else {
            continue;
        };
        let raw = raw.trim().trim_matches('"');
        match key.trim().to_ascii_lowercase().as_str() {
            "filename" => plain = Some(raw.to_string()),
            "filename*" => extended = raw.rsplit_once("''").map(|(_, name)| name.to_string()),
            _ => {}
        }
    }

    let name = extended.or(plain)?;
    let name = name.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// File extension implied by an image `Content-Type`, if any.
pub fn content_type_extension(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(CONTENT_TYPE)?.to_str().ok()?;
    let mime = value.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();

    let ext = match mime.as_str() {
        "image/jpeg" | "image/jpg" | "image/pjpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/bmp" | "image/x-ms-bmp" => "bmp",
        "image/heic" | "image/heic-sequence" => "heic",
        "image/heif" | "image/heif-sequence" => "heif",
        "image/avif" => "avif",
        _ => return None,
    };
    Some(ext.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn with(name: reqwest::header::HeaderName, value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_disposition_quoted() {
        let headers = with(CONTENT_DISPOSITION, r#"inline; filename="IMG_3765.jpg""#);
        assert_eq!(disposition_filename(&headers).as_deref(), Some("IMG_3765.jpg"));
    }

    #[test]
    fn test_disposition_extended_wins() {
        let headers = with(CONTENT_DISPOSITION, r#"attachment; filename="fallback.jpg"; filename*=UTF-8''real.heic"#);
        assert_eq!(disposition_filename(&headers).as_deref(), Some("real.heic"));
    }

    #[test]
    fn test_disposition_strips_directories() {
        let headers = with(CONTENT_DISPOSITION, r#"attachment; filename="../../etc/photo.png""#);
        assert_eq!(disposition_filename(&headers).as_deref(), Some("photo.png"));
    }

    #[test]
    fn test_disposition_missing() {
        assert_eq!(disposition_filename(&HeaderMap::new()), None);
        let headers = with(CONTENT_DISPOSITION, "inline");
        assert_eq!(disposition_filename(&headers), None);
    }

    #[test]
    fn test_content_type_extension() {
        let headers = with(CONTENT_TYPE, "image/jpeg; charset=binary");
        assert_eq!(content_type_extension(&headers).as_deref(), Some("jpg"));

        let headers = with(CONTENT_TYPE, "IMAGE/HEIC");
        assert_eq!(content_type_extension(&headers).as_deref(), Some("heic"));

        let headers = with(CONTENT_TYPE, "text/html");
        assert_eq!(content_type_extension(&headers), None);
    }
}
