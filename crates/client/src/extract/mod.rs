//! Rewriting scraped content to point at cached local assets.
//!
//! Discovery lives in [`images`]; [`localize`] resolves each URL through the
//! asset cache and substitutes the local reference into the text.

pub mod images;

use blogvault_core::{AssetCache, AssetReference, Error, Fetcher};

pub use images::{find_html_images, find_markdown_images};

/// Result of localizing a document.
#[derive(Debug)]
pub struct Localized {
    /// The rewritten document.
    pub text: String,
    /// Assets now referenced locally, in input order.
    pub resolved: Vec<AssetReference>,
    /// URLs left untouched, with the reason.
    pub failed: Vec<(String, Error)>,
}

impl Localized {
    /// Assets whose format conversion fell back to the raw bytes.
    pub fn degraded(&self) -> impl Iterator<Item = &AssetReference> {
        self.resolved.iter().filter(|r| r.is_degraded())
    }
}

/// Resolve every URL through `cache` and rewrite `text` to `prefix` + local filename.
///
/// A URL whose failure only concerns itself (fetch error, bad identifier) is
/// recorded in [`Localized::failed`] and left as is; processing continues.
/// Any other error means the cache is unusable and aborts the whole call.
pub async fn localize<F>(
    text: &str, urls: &[String], cache: &AssetCache, fetcher: &F, prefix: &str,
) -> Result<Localized, Error>
where
    F: Fetcher + ?Sized,
{
    let mut resolved = Vec::new();
    let mut failed = Vec::new();

    for url in urls {
        match cache.ensure(url, fetcher).await {
            Ok(reference) => resolved.push(reference),
            Err(e) if e.is_per_item() => {
                tracing::warn!(url = %url, error = %e, "leaving image reference remote");
                failed.push((url.clone(), e));
            }
            Err(e) => return Err(e),
        }
    }

    let mut targets: Vec<(&str, String)> =
        resolved.iter().map(|r| (r.id.as_str(), format!("{prefix}{}", r.local_name))).collect();
    targets.sort_by_key(|(url, _)| std::cmp::Reverse(url.len()));

    let text = rewrite_targets(text, &targets);
    Ok(Localized { text, resolved, failed })
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | '[' | ']' | '<' | '>' | '"' | '\'' | '=')
}

/// Replace each whole occurrence of a URL in `targets`.
///
/// A match counts only when it is bounded by delimiters on both sides, so a
/// longer URL sharing a resolved one as prefix is left alone. `targets` must be
/// sorted longest first.
fn rewrite_targets(text: &str, targets: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut prev: Option<char> = None;

    'scan: while let Some(c) = rest.chars().next() {
        if prev.is_none_or(is_delimiter) {
            for (url, local) in targets {
                if let Some(tail) = rest.strip_prefix(url)
                    && tail.chars().next().is_none_or(is_delimiter)
                {
                    out.push_str(local);
                    prev = url.chars().last();
                    rest = tail;
                    continue 'scan;
                }
            }
        }

        out.push(c);
        prev = Some(c);
        rest = &rest[c.len_utf8()..];
    }

    out
}
