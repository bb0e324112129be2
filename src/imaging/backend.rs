//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the walker needs:
//! identify (orientation-corrected dimensions) and normalize (orient,
//! downsample, re-encode as JPEG).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend). Tests swap in a
//! recording mock so the walker can be exercised without decoding pixels.

use super::params::NormalizeParams;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },
    #[error("Failed to encode {}: {reason}", path.display())]
    Encode { path: PathBuf, reason: String },
}

/// Result of an identify operation, after EXIF orientation is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
pub trait ImageBackend {
    /// Get image dimensions as displayed, i.e. with a 90°/270° EXIF rotation
    /// already swapping width and height.
    fn identify(&self, path: &Path) -> Result<Dimensions, MediaError>;

    /// Orient, resize to exactly `params.width × params.height`, write JPEG.
    fn normalize(&self, params: &NormalizeParams) -> Result<(), MediaError>;
}
