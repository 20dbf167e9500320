//! Pure calculation functions for preview dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Best-fit dimensions for `source` inside a `bounds` box.
///
/// Preserves aspect ratio and never crops: the result fits inside `bounds` on
/// both axes, touching at least one edge when scaling happens. Sources already
/// inside the box are returned unchanged unless `allow_upscale` is set.
/// Each side is at least 1px.
///
/// # Examples
/// ```
/// # use gallery_shop::imaging::fit_within;
/// // 1600x1200 into 900x900 → 900x675
/// assert_eq!(fit_within((1600, 1200), (900, 900), false), (900, 675));
///
/// // 800x600 into 900x900 stays 800x600 without upscaling
/// assert_eq!(fit_within((800, 600), (900, 900), false), (800, 600));
/// ```
pub fn fit_within(source: (u32, u32), bounds: (u32, u32), allow_upscale: bool) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (max_w, max_h) = bounds;

    if src_w == 0 || src_h == 0 || max_w == 0 || max_h == 0 {
        return (src_w.max(1), src_h.max(1));
    }

    let scale_w = max_w as f64 / src_w as f64;
    let scale_h = max_h as f64 / src_h as f64;
    let mut scale = scale_w.min(scale_h);
    if !allow_upscale {
        scale = scale.min(1.0);
    }

    let w = ((src_w as f64 * scale).round() as u32).clamp(1, max_w);
    let h = ((src_h as f64 * scale).round() as u32).clamp(1, max_h);
    (w, h)
}
