#![deny(bare_trait_objects)]

//! Path storage and construction for the facet rasterizer.
//!
//! A [`PathBuilder`] accumulates one *path* made of any number of
//! *figures* (also called subpaths or contours). Each figure is a chain of
//! connected points and is either closed (its last point connects back to
//! its first) or open. Curved segments — béziers, elliptic arcs, elliptic
//! splines — are flattened into line segments as they are appended, so a
//! finished path is always polygonal.
//!
//! Coordinates handed to the builder are signed integers; calling
//! [`PathBuilder::set_fixed_bits`] reinterprets them as fixed-point values
//! with up to 16 fractional bits. Internally everything is stored in 16.16
//! format.

pub use facet_geom as geom;

use std::fmt;

mod arc;
mod curve;
mod path;

#[doc(inline)]
pub use crate::path::{FigureView, Figures, PathBuilder};

/// Default flatness (curve-to-chord error tolerance) in pixels.
pub const FLATNESS_DEFAULT: f32 = 0.5;
/// Minimum settable flatness in pixels.
pub const FLATNESS_MINIMUM: f32 = 0.2;
/// Maximum settable flatness in pixels.
pub const FLATNESS_MAXIMUM: f32 = 100.0;

/// The fill rule defines how to determine what is inside and what is
/// outside of the shape.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum FillRule {
    /// A point is inside if a ray from it crosses the boundary an odd
    /// number of times. Also known as the parity rule.
    EvenOdd,
    /// A point is inside if the boundary's signed crossing count is
    /// nonzero. Also known as the winding rule.
    NonZero,
}

/// Line cap applied at the open ends of stroked figures,
/// as defined by the SVG specification.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum LineCap {
    /// The stroke ends flat, exactly at the end point.
    Butt,
    /// The stroke ends with a half-disc centered on the end point.
    Round,
    /// The stroke is extended by half the line width past the end point.
    Square,
}

/// Line join applied where two stroked segments meet,
/// as defined by the SVG specification.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum LineJoin {
    /// The outer corner is cut off with a straight edge.
    Bevel,
    /// The outer corner is rounded with a circular arc.
    Round,
    /// The outer edges are extended to their intersection; if the spike
    /// exceeds the miter limit the join falls back to a bevel.
    Miter,
    /// Like `Miter`, but an overlong spike is clipped at exactly the miter
    /// limit instead of falling back to a bevel.
    MiterClip,
}

/// Error type for the fallible path construction calls.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathError {
    /// A segment was appended to a figure with no current point.
    NoCurrentPoint,
    /// A parameter was outside its documented range.
    InvalidParameter,
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PathError::NoCurrentPoint => write!(f, "no current point"),
            PathError::InvalidParameter => write!(f, "invalid parameter"),
        }
    }
}

impl std::error::Error for PathError {}

/// Result alias for the fallible path construction calls.
pub type PathResult = Result<(), PathError>;

#[cfg(feature = "serialization")]
#[macro_use]
extern crate serde;
