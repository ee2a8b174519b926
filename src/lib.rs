//! 2D shape generation and software rasterization.
//!
//! facet turns vector path descriptions — lines, bézier curves,
//! elliptic arcs — into pixels, entirely in software. Paths are built
//! with a stateful [`PathBuilder`](path::PathBuilder), scan-converted
//! into non-overlapping trapezoids by a
//! [`Rasterizer`](raster::Rasterizer) (with nested clipping and
//! masking), and drawn by a renderer: either aliased solid fills or 4x8
//! supersampled antialiasing with solid, pattern and gradient paints.
//!
//! # Crates
//!
//! * **facet_geom** - 16.16 fixed-point scalars, bézier and elliptic
//!   arc flattening.
//! * **facet_path** - path storage and the path construction API.
//! * **facet_raster** - edge management, clipping, stroking, and the
//!   renderer interface.
//! * **facet_render** - pixel buffers, the two renderers, and the paint
//!   generators.
//!
//! This meta-crate reexports the other facet crates for convenience.
//!
//! # Example
//!
//! ```
//! use facet::path::{FillRule, PathBuilder};
//! use facet::raster::Rasterizer;
//! use facet::render::{rgb, AaRenderer, Pixmap};
//!
//! let mut pixmap = Pixmap::new(320, 240).unwrap();
//! let mut renderer = AaRenderer::new(pixmap.view_mut());
//! renderer.set_color(rgb(220, 50, 50));
//!
//! let mut raster = Rasterizer::new(320, 240);
//! let mut path = PathBuilder::new();
//! path.move_to(40, 40);
//! path.line_to(280, 60).unwrap();
//! path.line_to(160, 200).unwrap();
//! path.close_figure();
//! raster.fill_path(&mut path, FillRule::NonZero, &mut renderer);
//! ```

pub use facet_geom as geom;
pub use facet_path as path;
pub use facet_raster as raster;
pub use facet_render as render;

pub use crate::path::{FillRule, LineCap, LineJoin, PathBuilder};
pub use crate::raster::{ClipShape, Rasterizer, Renderer, StrokeStyle};
pub use crate::render::{AaRenderer, Pixmap, SolidRenderer};
