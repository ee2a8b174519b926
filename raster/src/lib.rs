#![deny(bare_trait_objects)]

//! Scan conversion for the facet rasterizer.
//!
//! This crate turns finished paths into pixel-aligned geometry:
//!
//! * the edge manager converts path segments into directed polygonal
//!   edges, sorts them, clips them against a clip region, and normalizes
//!   them into non-overlapping trapezoids according to a fill rule;
//! * the [`ShapeFeeder`] breaks a normalized edge list into integer
//!   rectangles or subpixel spans for a renderer to consume;
//! * the stroker expands stroked paths (width, caps, joins, dashes) into
//!   filled outlines before scan conversion;
//! * the [`Rasterizer`] ties it all together and drives a [`Renderer`].
//!
//! Renderers live elsewhere (see `facet_render`); anything that
//! implements [`Renderer`] can be driven by this crate.

pub use facet_geom as geom;
pub use facet_path as path;

#[macro_use]
mod debug_log;

mod edge;
mod feeder;
mod pool;
mod rasterizer;
mod stroke;
mod thinline;

#[doc(inline)]
pub use crate::feeder::{LtrbRect, ShapeFeeder, Span};
#[doc(inline)]
pub use crate::rasterizer::{BoundingBoxOptions, ClipShape, Rasterizer, Renderer};
#[doc(inline)]
pub use crate::stroke::StrokeStyle;

pub use crate::path::{FillRule, LineCap, LineJoin};

/// Default stroked line width in pixels.
pub const LINE_WIDTH_DEFAULT: f32 = 4.0;
/// Default miter limit.
pub const MITER_LIMIT_DEFAULT: f32 = 10.0;
/// Minimum miter limit.
pub const MITER_LIMIT_MINIMUM: f32 = 1.0;
/// Maximum number of dash array entries.
pub const DASH_ARRAY_MAX_LEN: usize = 32;

#[cfg(feature = "serialization")]
#[macro_use]
extern crate serde;
