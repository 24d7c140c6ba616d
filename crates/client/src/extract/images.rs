//! Image URL discovery in scraped Markdown and HTML.

use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;

/// `[![alt](preview)](fullres)`: a thumbnail linking to the full-size image.
static LINKED_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[!\[[^\]]*\]\(([^)\s]+)[^)]*\)\]\(([^)\s]+)[^)]*\)").expect("invalid linked image pattern")
});

/// `![alt](src)`, optionally with a title.
static INLINE_IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[[^\]]*\]\(([^)\s]+)[^)]*\)").expect("invalid inline image pattern"));

fn is_remote(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Remote image URLs referenced by a Markdown document.
///
/// Both the preview and the full-size target of linked thumbnails are
/// returned. URLs are deduplicated and kept in order of first appearance,
/// exactly as written (no normalization).
pub fn find_markdown_images(markdown: &str) -> Vec<String> {
    let mut found: Vec<(usize, &str)> = INLINE_IMAGE
        .captures_iter(markdown)
        .filter_map(|c| c.get(1))
        .map(|m| (m.start(), m.as_str()))
        .collect();

    found.extend(LINKED_IMAGE.captures_iter(markdown).filter_map(|c| c.get(2)).map(|m| (m.start(), m.as_str())));
    found.sort_by_key(|(pos, _)| *pos);

    let mut seen = HashSet::new();
    found
        .into_iter()
        .map(|(_, url)| url)
        .filter(|url| is_remote(url) && seen.insert(*url))
        .map(str::to_string)
        .collect()
}

/// Remote `<img src>` URLs in an HTML document or fragment.
pub fn find_html_images(html: &str) -> Vec<String> {
    let document = Html::parse_fragment(html);
    let selector = Selector::parse("img[src]").expect("invalid selector");

    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    for element in document.select(&selector) {
        let Some(src) = element.value().attr("src").map(str::trim) else {
            continue;
        };

        if is_remote(src) && seen.insert(src.to_string()) {
            urls.push(src.to_string());
        }
    }

    urls
}
