#![deny(bare_trait_objects)]

//! Software renderers and paint generators for the facet rasterizer.
//!
//! Two renderers implement the [`Renderer`](facet_raster::Renderer)
//! contract:
//!
//! * [`SolidRenderer`] fills shapes with one opaque color, no
//!   antialiasing — simple and fast for large areas;
//! * [`AaRenderer`] supersamples 4x8 per pixel through a scan-line
//!   coverage buffer, alpha-blends with premultiplied-alpha arithmetic,
//!   and paints through pluggable paint generators: solid colors, tiled
//!   patterns, and linear/radial/conic gradients.
//!
//! Pixels are 32-bit BGRA (`0xAARRGGBB` little-endian) in a [`Pixmap`]
//! or any [`BufferView`] over caller memory. Colors handed to the
//! public calls are 32-bit RGBA (`0xAABBGGRR`); the renderers convert.

pub use facet_geom as geom;
pub use facet_path as path;
pub use facet_raster as raster;

mod aa;
mod bmp;
mod color;
mod image;
mod paint;
mod pixmap;
mod solid;

#[cfg(test)]
mod scene_tests;

#[doc(inline)]
pub use crate::aa::AaRenderer;
#[doc(inline)]
pub use crate::bmp::BmpReader;
#[doc(inline)]
pub use crate::color::{premultiply, rgb, rgba, Color};
#[doc(inline)]
pub use crate::image::{ImageError, ImageReader, SlicePixels};
#[doc(inline)]
pub use crate::paint::{
    ConicGradient, LinearGradient, PaintGenerator, RadialGradient, TiledPattern,
};
#[doc(inline)]
pub use crate::pixmap::{BufferView, Pixmap};
#[doc(inline)]
pub use crate::solid::SolidRenderer;

pub use crate::raster::Renderer;

/// Maximum number of color stops in a gradient.
pub const COLOR_STOPS_MAX: usize = 32;

/// How a gradient behaves outside the [0,1] parameter interval.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum SpreadMethod {
    /// Clamp to the end colors.
    Pad,
    /// Repeat with every other cycle mirrored.
    Reflect,
    /// Repeat the color pattern cyclically.
    Repeat,
}

/// Operation for combining source pixels with destination pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum BlendOp {
    /// Porter-Duff "A over B" with premultiplied alpha.
    SrcOverDst,
    /// Per-component add with saturation.
    AddWithSat,
    /// Multiply the destination by 255 minus the source alpha. Used for
    /// front-to-back masking.
    AlphaClear,
}

// Flags for pattern and gradient fills.

/// Extend a gradient to parameter values below 0.
pub const FLAG_EXTEND_START: u32 = 1;
/// Extend a gradient to parameter values of 1 and above.
pub const FLAG_EXTEND_END: u32 = 2;
/// The rows of the source image are ordered bottom-to-top.
pub const FLAG_IMAGE_BOTTOMUP: u32 = 4;
/// The source image pixels are BGRA (`0xAARRGGBB`); otherwise RGBA.
pub const FLAG_IMAGE_BGRA32: u32 = 8;
/// Swap the red and blue fields of each pixel on load.
pub const FLAG_SWAP_REDBLUE: u32 = 16;
/// The source image pixels are already premultiplied by their alphas.
pub const FLAG_PREMULTALPHA: u32 = 32;

#[cfg(feature = "serialization")]
#[macro_use]
extern crate serde;
