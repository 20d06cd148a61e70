//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate output dimensions that fit within a square of `max_edge`.
///
/// Aspect ratio is preserved and the image is never upscaled: if both
/// dimensions already fit, the original dimensions are returned unchanged.
/// The scaled short edge is rounded to the nearest pixel and never drops
/// below 1.
///
/// # Arguments
/// * `original` - Original image dimensions (width, height)
/// * `max_edge` - Maximum size of either edge in pixels
///
/// # Examples
/// ```
/// # use photo_gal::imaging::calculate_fit_dimensions;
/// // 3000x2000 landscape into 1600 → 1600x1067
/// assert_eq!(calculate_fit_dimensions((3000, 2000), 1600), (1600, 1067));
///
/// // Already small enough → unchanged
/// assert_eq!(calculate_fit_dimensions((640, 480), 1600), (640, 480));
/// ```
pub fn calculate_fit_dimensions(original: (u32, u32), max_edge: u32) -> (u32, u32) {
    let (orig_w, orig_h) = original;
    let longer_edge = orig_w.max(orig_h);

    if longer_edge <= max_edge || longer_edge == 0 {
        return original;
    }

    let ratio = max_edge as f64 / longer_edge as f64;
    if orig_w >= orig_h {
        // Landscape or square
        let h = ((orig_h as f64 * ratio).round() as u32).max(1);
        (max_edge, h)
    } else {
        // Portrait
        let w = ((orig_w as f64 * ratio).round() as u32).max(1);
        (w, max_edge)
    }
}
