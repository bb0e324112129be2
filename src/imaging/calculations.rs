//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate the largest size that fits inside `bounds` while keeping the
/// source aspect ratio. Never upscales.
///
/// # Arguments
/// * `source` - Oriented image dimensions (width, height)
/// * `bounds` - Bounding box (width, height)
///
/// # Returns
/// * `(width, height)` - Output dimensions, each at least 1px
///
/// # Examples
/// ```
/// # use disk_media_sync::imaging::calculate_fit_dimensions;
/// // 4:3 landscape is limited by the box width
/// assert_eq!(calculate_fit_dimensions((4000, 3000), (1080, 1440)), (1080, 810));
///
/// // already inside the box: untouched
/// assert_eq!(calculate_fit_dimensions((640, 480), (1080, 1440)), (640, 480));
/// ```
pub fn calculate_fit_dimensions(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (max_w, max_h) = bounds;

    if src_w == 0 || src_h == 0 || (src_w <= max_w && src_h <= max_h) {
        return source;
    }

    let scale = (max_w as f64 / src_w as f64).min(max_h as f64 / src_h as f64);
    let w = ((src_w as f64 * scale).round() as u32).clamp(1, max_w);
    let h = ((src_h as f64 * scale).round() as u32).clamp(1, max_h);
    (w, h)
}
