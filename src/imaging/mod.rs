//! Photo normalization in pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageDecoder::dimensions` + EXIF orientation |
//! | **Orientation** | `image::DynamicImage::apply_orientation` |
//! | **Downsample** | `resize_exact` with `Lanczos3` |
//! | **Encode** | `image::codecs::jpeg::JpegEncoder` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for bounding-box math (unit testable)
//! - **Parameters**: Data structures describing a normalization
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{Dimensions, ImageBackend, MediaError};
pub use calculations::calculate_fit_dimensions;
pub use operations::{NormalizeConfig, normalize, plan_normalize};
pub use params::{BoundingBox, NormalizeParams, Quality};
pub use rust_backend::RustBackend;
