//! Filename derivation and collision resolution for cached assets.
//!
//! Names are derived from the identifier's last path segment, falling back to
//! the fetcher's hints and finally to a digest of the identifier. Uniqueness is
//! obtained by prefixing [`COLLISION_PREFIX`] until the name is free.

use super::hash;
use crate::Error;

/// Default bound on derived filename length, in characters.
pub const DEFAULT_MAX_NAME_LEN: usize = 100;

/// Hard filesystem limit on a single filename, in bytes.
pub const MAX_FILENAME_BYTES: usize = 255;

/// Marker prepended to a name while it collides with an existing one.
pub const COLLISION_PREFIX: char = '_';

const ILLEGAL_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Last non-empty path segment of an identifier.
///
/// Fragment and query are ignored, as are trailing slashes. The scheme and
/// authority of an absolute URL are never a segment.
pub fn last_segment(id: &str) -> Option<&str> {
    let id = id.split('#').next().unwrap_or_default();
    let id = id.split('?').next().unwrap_or_default();
    let path = match id.split_once("://") {
        Some((_, rest)) => rest.split_once('/').map_or("", |(_, path)| path),
        None => id,
    };
    path.trim_end_matches('/').rsplit('/').next().filter(|s| !s.is_empty())
}

/// Make a raw name safe to use as a flat filename.
///
/// Returns `None` when nothing usable remains.
pub fn sanitize(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| if c.is_control() || ILLEGAL_CHARS.contains(&c) { '_' } else { c })
        .collect();

    match cleaned.as_str() {
        "" | "." | ".." => None,
        _ => Some(cleaned),
    }
}

/// Extension of a filename, without the dot.
///
/// Dotfiles (`.hidden`) and trailing dots have no extension.
pub fn extension(name: &str) -> Option<&str> {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext),
        _ => None,
    }
}

/// Filename without its extension.
pub fn stem(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => stem,
        _ => name,
    }
}

/// Replace (or add) the extension of a filename.
pub fn with_extension(name: &str, ext: &str) -> String {
    format!("{}.{ext}", stem(name))
}

/// Keep the last `max_chars` characters, also respecting [`MAX_FILENAME_BYTES`].
pub fn truncate_tail(name: &str, max_chars: usize) -> String {
    let total = name.chars().count();
    let mut start = name
        .char_indices()
        .nth(total.saturating_sub(max_chars))
        .map_or(name.len(), |(i, _)| i);

    while name.len() - start > MAX_FILENAME_BYTES {
        start += name[start..].chars().next().map_or(1, char::len_utf8);
    }

    name[start..].to_string()
}

/// Derive the candidate filename for an identifier before collision checks.
pub fn candidate_name(id: &str, hint_name: Option<&str>, hint_ext: Option<&str>, max_chars: usize) -> String {
    let hint_name = hint_name.and_then(sanitize);

    let base = last_segment(id)
        .and_then(sanitize)
        .or_else(|| hint_name.clone())
        .unwrap_or_else(|| hash::derived_stem(id));

    let name = if extension(&base).is_some() {
        base
    } else {
        let ext = hint_ext
            .and_then(sanitize)
            .or_else(|| hint_name.as_deref().and_then(extension).map(str::to_string));
        match ext {
            Some(ext) => format!("{base}.{}", ext.trim_start_matches('.')),
            None => base,
        }
    };

    truncate_tail(&name, max_chars)
}

/// Prefix `name` with [`COLLISION_PREFIX`] until `is_taken` rejects it no more.
///
/// Each prefix produces a name never seen before, so the loop ends after at most
/// one iteration per taken name. It is still cut off once the name would exceed
/// the filesystem limit.
pub fn resolve_collision(mut name: String, is_taken: impl Fn(&str) -> bool) -> Result<String, Error> {
    while is_taken(&name) {
        name.insert(0, COLLISION_PREFIX);
        if name.len() > MAX_FILENAME_BYTES {
            return Err(Error::NameExhausted(name));
        }
    }
    Ok(name)
}
