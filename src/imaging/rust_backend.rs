//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG) | `image` crate (pure Rust decoders) |
//! | EXIF orientation | `ImageDecoder::orientation` + `DynamicImage::apply_orientation` |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |
//!
//! The encoder writes no EXIF block, so orientation is baked into the pixels
//! before encoding.

use super::backend::{Dimensions, ImageBackend, MediaError};
use super::params::NormalizeParams;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageReader};
use std::path::Path;

/// Pure Rust backend using the `image` crate.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_error(path: &Path, err: impl std::fmt::Display) -> MediaError {
    MediaError::Decode {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

/// Open a decoder with the format sniffed from content, not extension.
fn open_decoder(path: &Path) -> Result<impl ImageDecoder, MediaError> {
    ImageReader::open(path)?
        .with_guessed_format()?
        .into_decoder()
        .map_err(|e| decode_error(path, e))
}

/// Missing or unreadable EXIF is treated as "no transform".
fn read_orientation(decoder: &mut impl ImageDecoder) -> Orientation {
    decoder.orientation().unwrap_or(Orientation::NoTransforms)
}

fn swaps_axes(orientation: Orientation) -> bool {
    matches!(
        orientation,
        Orientation::Rotate90
            | Orientation::Rotate270
            | Orientation::Rotate90FlipH
            | Orientation::Rotate270FlipH
    )
}

/// Load and decode an image from disk with its EXIF orientation applied.
fn load_oriented(path: &Path) -> Result<DynamicImage, MediaError> {
    let mut decoder = open_decoder(path)?;
    let orientation = read_orientation(&mut decoder);
    let mut img = DynamicImage::from_decoder(decoder).map_err(|e| decode_error(path, e))?;
    img.apply_orientation(orientation);
    Ok(img)
}

/// Encode as baseline JPEG. Alpha and 16-bit channels are flattened to RGB8.
fn save_jpeg(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), MediaError> {
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(writer, quality as u8);
    DynamicImage::ImageRgb8(img.to_rgb8())
        .write_with_encoder(encoder)
        .map_err(|e| MediaError::Encode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, MediaError> {
        let mut decoder = open_decoder(path)?;
        let (width, height) = decoder.dimensions();
        if swaps_axes(read_orientation(&mut decoder)) {
            Ok(Dimensions {
                width: height,
                height: width,
            })
        } else {
            Ok(Dimensions { width, height })
        }
    }

    fn normalize(&self, params: &NormalizeParams) -> Result<(), MediaError> {
        let img = load_oriented(&params.source)?;
        let resized = if img.width() == params.width && img.height() == params.height {
            img
        } else {
            img.resize_exact(params.width, params.height, FilterType::Lanczos3)
        };
        save_jpeg(&resized, &params.output, params.quality.value())
    }
}
