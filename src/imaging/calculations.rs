//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate output dimensions for a "fit inside, no enlargement" resize.
///
/// The width is capped at `max_width`; the height follows the source aspect
/// ratio, rounded to the nearest pixel and never below 1. Images already
/// narrower than `max_width` keep their original dimensions.
///
/// # Examples
/// ```
/// # use asset_prep::imaging::fit_within_width;
/// // 2000x1000 into 480 → 480x240
/// assert_eq!(fit_within_width((2000, 1000), 480), (480, 240));
///
/// // 300x300 into 1920 → unchanged
/// assert_eq!(fit_within_width((300, 300), 1920), (300, 300));
/// ```
pub fn fit_within_width(original: (u32, u32), max_width: u32) -> (u32, u32) {
    let (orig_w, orig_h) = original;
    if orig_w == 0 || orig_w <= max_width {
        return original;
    }

    let ratio = max_width as f64 / orig_w as f64;
    let height = ((orig_h as f64 * ratio).round() as u32).max(1);
    (max_width, height)
}
