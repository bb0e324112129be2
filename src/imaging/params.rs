//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides the output geometry) and the [`backend`](super::backend)
//! (which does the actual pixel work).
//!
//! ## Types
//!
//! - [`Quality`]: JPEG encoding quality (1–100, default 75). Clamped on construction.
//! - [`BoundingBox`]: Maximum width × height of a normalized photo.
//! - [`NormalizeParams`]: Full specification for one normalization.

use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(75)
    }
}

/// Maximum output geometry. Photos inside the box are left at their size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new(1080, 1440)
    }
}

impl From<[u32; 2]> for BoundingBox {
    fn from([width, height]: [u32; 2]) -> Self {
        Self::new(width, height)
    }
}

/// Parameters for a single photo normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Final dimensions, after orientation correction.
    pub width: u32,
    pub height: u32,
    pub quality: Quality,
}
