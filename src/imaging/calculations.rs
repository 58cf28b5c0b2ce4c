//! Pure calculation functions for overlay placement.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::{Corner, Padding};

/// Calculate where an overlay's top-left pixel lands on the destination.
///
/// # Arguments
/// * `corner` - Anchor the overlay is positioned against
/// * `destination` - Destination image dimensions (width, height)
/// * `overlay` - Overlay image dimensions (width, height)
/// * `padding` - Distance kept from the anchored edges
///
/// # Returns
/// * `(x, y)` - Origin in destination coordinates. Either value may be
///   negative when the overlay (plus padding) is larger than the destination.
///
/// # Examples
/// ```
/// # use image_resource::imaging::{Corner, Padding, overlay_origin};
/// // 20x10 watermark in the bottom-right of a 200x100 image, 5px from the edges
/// assert_eq!(
///     overlay_origin(Corner::BottomRight, (200, 100), (20, 10), Padding::new(5, 5)),
///     (175, 85)
/// );
/// ```
pub fn overlay_origin(
    corner: Corner,
    destination: (u32, u32),
    overlay: (u32, u32),
    padding: Padding,
) -> (i64, i64) {
    let (dst_w, dst_h) = (i64::from(destination.0), i64::from(destination.1));
    let (src_w, src_h) = (i64::from(overlay.0), i64::from(overlay.1));
    let (pad_x, pad_y) = (i64::from(padding.x), i64::from(padding.y));

    let right = dst_w - src_w - pad_x;
    let bottom = dst_h - src_h - pad_y;

    match corner {
        Corner::TopLeft => (pad_x, pad_y),
        Corner::TopRight => (right, pad_y),
        Corner::BottomLeft => (pad_x, bottom),
        Corner::BottomRight => (right, bottom),
    }
}
