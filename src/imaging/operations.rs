//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take configuration, compute parameters, and call the backend.

use super::backend::{Dimensions, ImageBackend, MediaError};
use super::calculations::calculate_fit_dimensions;
use super::params::{BoundingBox, NormalizeParams, Quality};
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, MediaError>;

/// Configuration for photo normalization.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeConfig {
    pub bounds: BoundingBox,
    pub quality: Quality,
}

/// Plan a normalization without executing it.
pub fn plan_normalize(
    source: &Path,
    output: &Path,
    original: Dimensions,
    config: &NormalizeConfig,
) -> NormalizeParams {
    let (width, height) = calculate_fit_dimensions(
        (original.width, original.height),
        (config.bounds.width, config.bounds.height),
    );

    NormalizeParams {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        width,
        height,
        quality: config.quality,
    }
}

/// Normalize one photo: orient, fit into the bounding box, write JPEG.
///
/// Returns the dimensions actually written.
pub fn normalize(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    config: &NormalizeConfig,
) -> Result<Dimensions> {
    let original = backend.identify(source)?;
    let params = plan_normalize(source, output, original, config);
    tracing::debug!(
        source = %source.display(),
        from = ?(original.width, original.height),
        to = ?(params.width, params.height),
        "normalizing photo"
    );
    backend.normalize(&params)?;

    Ok(Dimensions {
        width: params.width,
        height: params.height,
    })
}
