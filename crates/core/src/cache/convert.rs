//! Format normalization for fetched assets.
//!
//! Camera-native formats are rewritten to JPEG so every consumer of the asset
//! directory can read them. Decoding sniffs the content instead of trusting
//! the extension, which lets mislabelled files convert cleanly.

use std::fmt;
use std::path::{Path, PathBuf};

use image::{ImageFormat, ImageReader};

use super::naming;

/// Errors raised while converting an asset.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Converts assets whose format consumers cannot read.
pub trait FormatConverter: Send + Sync + fmt::Debug {
    /// Whether a file with this name must be converted.
    fn needs_conversion(&self, name: &str) -> bool;

    /// Extension given to converted files, without the dot.
    fn target_extension(&self) -> &str;

    /// Convert the file at `src`, writing the result to `dst`.
    fn convert(&self, src: &Path, dst: &Path) -> Result<(), ConversionError>;
}

/// Rewrites HEIC/HEIF assets as JPEG.
#[derive(Debug, Clone)]
pub struct JpegNormalizer {
    source_extensions: Vec<String>,
}

impl JpegNormalizer {
    pub fn new<I, S>(source_extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { source_extensions: source_extensions.into_iter().map(Into::into).collect() }
    }
}

impl Default for JpegNormalizer {
    fn default() -> Self {
        Self::new(["heic", "heif"])
    }
}

impl FormatConverter for JpegNormalizer {
    fn needs_conversion(&self, name: &str) -> bool {
        naming::extension(name).is_some_and(|ext| self.source_extensions.iter().any(|s| s.eq_ignore_ascii_case(ext)))
    }

    fn target_extension(&self) -> &str {
        "jpg"
    }

    fn convert(&self, src: &Path, dst: &Path) -> Result<(), ConversionError> {
        let io_err = |source| ConversionError::Io { path: src.to_path_buf(), source };

        let image = ImageReader::open(src)
            .map_err(io_err)?
            .with_guessed_format()
            .map_err(io_err)?
            .decode()
            .map_err(|source| ConversionError::Decode { path: src.to_path_buf(), source })?;

        image
            .to_rgb8()
            .save_with_format(dst, ImageFormat::Jpeg)
            .map_err(|source| ConversionError::Encode { path: dst.to_path_buf(), source })
    }
}
