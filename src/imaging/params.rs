//! Parameter types for image operations.
//!
//! These types describe *where* an operation lands, not how the pixels move.
//! They are shared between the pure [`calculations`](super::calculations) and
//! the backend-driven [`operations`](super::operations).
//!
//! ## Types
//!
//! - [`Corner`]: one of four anchors an overlay is positioned against.
//! - [`Padding`]: distance kept between the overlay and the anchored edges.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Corner anchor for overlay compositing.
///
/// The short codes (`TL`, `TR`, `BL`, `BR`) are what host applications keep in
/// their settings, so [`FromStr`] and [`Display`](fmt::Display) use them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub fn code(self) -> &'static str {
        match self {
            Corner::TopLeft => "TL",
            Corner::TopRight => "TR",
            Corner::BottomLeft => "BL",
            Corner::BottomRight => "BR",
        }
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A corner code that is not one of `TL`, `TR`, `BL`, `BR`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown corner: {0}")]
pub struct UnknownCorner(pub String);

impl FromStr for Corner {
    type Err = UnknownCorner;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TL" => Ok(Corner::TopLeft),
            "TR" => Ok(Corner::TopRight),
            "BL" => Ok(Corner::BottomLeft),
            "BR" => Ok(Corner::BottomRight),
            other => Err(UnknownCorner(other.to_string())),
        }
    }
}

/// Horizontal and vertical distance from the anchored edges, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Padding {
    pub x: u32,
    pub y: u32,
}

impl Padding {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}
