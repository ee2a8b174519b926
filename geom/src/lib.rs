#![deny(bare_trait_objects)]

//! Fixed-point geometric primitives for software rasterization.
//!
//! # Overview
//!
//! This crate implements the math that the rest of the facet crates are
//! built on:
//!
//! - a 16.16 fixed-point scalar and point type,
//! - quadratic and cubic bézier curve segments with flattening,
//! - elliptic arcs described by conjugate diameters,
//! - integer points and rectangles for the public coordinate space.
//!
//! # Flattening
//!
//! Flattening approximates a curve with a succession of line segments. All
//! flattening here is driven by a *flatness tolerance*: the maximum
//! distance allowed between a curve and its chord, in 16.16 pixels.
//! Bézier segments subdivide with de Casteljau's algorithm on an explicit
//! stack; elliptic arcs are generated incrementally with a shift-only
//! rotation whose step size is chosen from the same tolerance.
//!
//! The floating-point side (affine transforms for paint generators) sits
//! on top of [euclid](https://docs.rs/euclid/), which is re-exported.

// Re-export dependencies.
pub use euclid;

mod arc;
mod cubic_bezier;
mod fixed;
mod quadratic_bezier;

#[doc(inline)]
pub use crate::arc::ConjugateArc;
#[doc(inline)]
pub use crate::cubic_bezier::CubicBezierSegment;
#[doc(inline)]
pub use crate::fixed::{fxpoint, Fixed, FxPoint, FIX_2PI, FIX_BIAS, FIX_HALF, FIX_PI};
#[doc(inline)]
pub use crate::quadratic_bezier::QuadraticBezierSegment;

/// Cap on recursive bézier subdivision depth.
pub const MAX_SUBDIVISION_LEVELS: usize = 12;

pub mod math {
    //! Aliases for the floating-point types used on the paint side.

    /// Alias for `euclid::default::Transform2D<f32>`.
    pub type Transform = euclid::default::Transform2D<f32>;

    /// Alias for `euclid::default::Point2D<f32>`.
    pub type Point = euclid::default::Point2D<f32>;

    /// Alias for `euclid::default::Vector2D<f32>`.
    pub type Vector = euclid::default::Vector2D<f32>;

    /// Shorthand for `Point::new(x, y)`.
    #[inline]
    pub fn point(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }

    /// Shorthand for `Vector::new(x, y)`.
    #[inline]
    pub fn vector(x: f32, y: f32) -> Vector {
        Vector::new(x, y)
    }
}

/// A point in the public integer coordinate space.
///
/// The interpretation of the integer bits is up to the caller: the path
/// builder can treat them as plain integers or as fixed-point values with
/// up to 16 fractional bits.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct IntPoint {
    pub x: i32,
    pub y: i32,
}

#[inline]
pub fn int_point(x: i32, y: i32) -> IntPoint {
    IntPoint { x, y }
}

/// An axis-aligned rectangle in the public integer coordinate space.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct IntRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl IntRect {
    #[inline]
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        IntRect { x, y, w, h }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }
}
