//! Raster image processing: pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader` (content-sniffed) |
//! | **Resize** | `DynamicImage::resize` (Lanczos3) |
//! | **Overlay** | `image::imageops::replace` (straight copy, clipped) |
//! | **Encode** | JPEG, PNG, GIF by target extension |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for overlay placement (unit testable)
//! - **Parameters**: Corner anchors and padding
//! - **Backend**: [`RasterBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageInfo, RasterBackend};
pub use calculations::overlay_origin;
pub use operations::{composite_overlay, render_resized_copy};
pub use params::{Corner, Padding, UnknownCorner};
pub use rust_backend::RustBackend;
