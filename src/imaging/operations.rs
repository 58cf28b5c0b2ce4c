//! High-level raster operations.
//!
//! These functions combine calculations with backend execution. They operate
//! on handles that are already loaded; deciding *when* to load and flush is
//! the resource engine's job.

use super::backend::{BackendError, RasterBackend};
use super::calculations::overlay_origin;
use super::params::{Corner, Padding};
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Copy `overlay` onto `destination`, anchored at `corner`.
///
/// The copy is a straight overwrite of every overlay pixel, alpha included;
/// nothing is blended. Pixels falling outside the destination are clipped.
/// Returns the origin the overlay was placed at.
pub fn composite_overlay<B: RasterBackend>(
    backend: &B,
    destination: &mut B::Handle,
    overlay: &B::Handle,
    corner: Corner,
    padding: Padding,
) -> (i64, i64) {
    let (x, y) = overlay_origin(
        corner,
        backend.dimensions(destination).as_tuple(),
        backend.dimensions(overlay).as_tuple(),
        padding,
    );

    let mut canvas = backend.pixel_buffer(destination);
    let stamp = backend.pixel_buffer(overlay);
    image::imageops::replace(&mut canvas, &stamp, x, y);

    backend.set_pixel_buffer(destination, canvas);
    (x, y)
}

/// Render a resized copy of `source` to `output`, leaving `source` untouched.
pub fn render_resized_copy<B: RasterBackend>(
    backend: &B,
    source: &B::Handle,
    width: u32,
    height: u32,
    output: &Path,
) -> Result<()> {
    let mut copy = source.clone();
    backend.resize(&mut copy, width, height)?;
    backend.save(&copy, output)
}
