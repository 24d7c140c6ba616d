//! Client code for blogvault.
//!
//! This crate provides the HTTP fetcher the asset cache pulls images through,
//! URL classification helpers, and image-link localization for scraped posts.

pub mod extract;
pub mod fetch;

pub use extract::{Localized, find_html_images, find_markdown_images, localize};

pub use fetch::{FetchConfig, HttpFetcher, has_extension, is_image_url};
