//! The rasterizer driver: fills, strokes, clipping and masking.

use std::mem;

use crate::edge::{EdgeManager, ScanRule};
use crate::feeder::ShapeFeeder;
use crate::geom::{Fixed, IntRect, FIX_HALF};
use crate::path::PathBuilder;
use crate::pool::NONE;
use crate::stroke::{StrokeStyle, Stroker};
use crate::thinline::thin_stroke;
use crate::{FillRule, LineCap, LineJoin};

/// Writes shapes to a display or memory buffer on behalf of a
/// [`Rasterizer`]. The rasterizer hands the renderer a loaded
/// [`ShapeFeeder`]; the renderer drains it and owns every device
/// dependency (pixel formats, blending, paint).
pub trait Renderer {
    /// Draws one shape by pulling rectangles or spans from the feeder
    /// until it is empty.
    fn render_shape(&mut self, feeder: &mut ShapeFeeder);

    /// Extra bits of y resolution per pixel the renderer wants from the
    /// scan converter: 0 for aliased fills, 2 for 4x vertical
    /// supersampling.
    fn y_resolution(&self) -> u32 {
        0
    }

    /// Tells the renderer the maximum shape width it must be able to
    /// buffer. Called when the device clip rectangle changes.
    fn set_max_width(&mut self, _width: i32) -> bool {
        true
    }

    /// Scroll position pass-through, so patterns and gradients can stay
    /// pinned to world coordinates.
    fn set_scroll_position(&mut self, _x: i32, _y: i32) -> bool {
        true
    }
}

/// What shape of the path a clip or mask operation uses.
#[derive(Copy, Clone, Debug)]
pub enum ClipShape<'a> {
    /// The filled interior of the path under the given fill rule.
    Fill(FillRule),
    /// The stroked outline of the path.
    Stroke(&'a StrokeStyle),
}

/// Flags controlling [`Rasterizer::bounding_box`].
#[derive(Copy, Clone, Debug, Default)]
pub struct BoundingBoxOptions<'a> {
    /// Pad the box for stroking with the given style.
    pub stroke: Option<&'a StrokeStyle>,
    /// Intersect the box with the device clip rectangle.
    pub clip: bool,
    /// Union the box with a previously computed box.
    pub accum: Option<IntRect>,
}

/// Converts finished paths into scan-converted shapes and drives a
/// renderer to draw them.
///
/// A `Rasterizer` owns the clip-region state: a current clip region, one
/// saved snapshot, and the device clip rectangle everything is clipped
/// against. Drawing calls take the path and the renderer as arguments:
///
/// ```no_run
/// use facet_path::{FillRule, PathBuilder};
/// use facet_raster::{Rasterizer, Renderer};
/// # fn demo(renderer: &mut dyn Renderer) {
/// let mut raster = Rasterizer::new(640, 480);
/// let mut path = PathBuilder::new();
/// path.move_to(100, 50);
/// path.line_to(200, 150).unwrap();
/// path.line_to(50, 150).unwrap();
/// path.close_figure();
/// raster.fill_path(&mut path, FillRule::NonZero, renderer);
/// # }
/// ```
pub struct Rasterizer {
    edges: EdgeManager,
    /// The device clip rectangle. `x`/`y` hold the scroll position,
    /// `w`/`h` the device dimensions.
    device_clip: IntRect,
    yres: u32,
}

impl Rasterizer {
    /// Creates a rasterizer clipped to `[0,width) x [0,height)`,
    /// configured for aliased (integer) y resolution until a renderer
    /// with subpixel resolution is first used.
    pub fn new(width: i32, height: i32) -> Rasterizer {
        assert!(width > 0 && height > 0, "invalid device dimensions");
        let mut raster = Rasterizer {
            edges: EdgeManager::new(),
            device_clip: IntRect::new(0, 0, width, height),
            yres: 0,
        };
        raster.edges.set_y_resolution(0);
        raster.edges.set_device_clip_rectangle(width, height, false);
        raster
    }

    /// Like [`new`](Self::new), but adopts the renderer's y resolution up
    /// front so clip regions installed before the first draw survive it.
    pub fn for_renderer(renderer: &dyn Renderer, width: i32, height: i32) -> Rasterizer {
        let mut raster = Rasterizer::new(width, height);
        raster.yres = renderer.y_resolution();
        raster.edges.set_y_resolution(raster.yres);
        raster.edges.set_device_clip_rectangle(width, height, false);
        raster
    }

    /// Adapts to the renderer about to be used. Switching between
    /// renderers with different y resolutions invalidates the clip
    /// region, which resets to the device clip rectangle.
    fn bind_renderer(&mut self, renderer: &mut dyn Renderer) {
        let yres = renderer.y_resolution();
        if yres != self.yres {
            self.yres = yres;
            self.edges.set_y_resolution(yres);
            self.reset_clip_region();
        }
        renderer.set_max_width(self.device_clip.w);
        renderer.set_scroll_position(self.device_clip.x, self.device_clip.y);
    }

    /// Sets the displacement subtracted from every shape before it is
    /// drawn, letting the caller pan across an image larger than the
    /// device.
    pub fn set_scroll_position(&mut self, x: i32, y: i32) {
        self.device_clip.x = x;
        self.device_clip.y = y;
    }

    /// Resets the clip region to the device clip rectangle, preserving
    /// any saved clip region.
    pub fn reset_clip_region(&mut self) {
        self.edges
            .set_device_clip_rectangle(self.device_clip.w, self.device_clip.h, true);
    }

    /// Re-dimensions the device clip rectangle and resets the clip
    /// region to it, discarding any saved clip region.
    pub fn init_clip_region(&mut self, width: i32, height: i32) -> bool {
        if width < 1 || height < 1 {
            return false;
        }
        self.device_clip.w = width;
        self.device_clip.h = height;
        self.edges.set_device_clip_rectangle(width, height, false);
        true
    }

    /// Saves a copy of the current clip region, replacing any previously
    /// saved one. Returns false if the current region is empty.
    pub fn save_clip_region(&mut self) -> bool {
        self.edges.save_clip_region()
    }

    /// Exchanges the current clip region with the saved one. Returns
    /// false if the region swapped in is empty.
    pub fn swap_clip_region(&mut self) -> bool {
        self.edges.swap_clip_region()
    }

    /// Converts the path to edges for a filled shape. Fill operations
    /// treat every figure as closed.
    fn filled_shape(&mut self, path: &mut PathBuilder) -> bool {
        path.end_figure();
        if path.is_empty() {
            return false;
        }
        for figure in path.figures() {
            let npts = if figure.closed {
                figure.len() - 1
            } else {
                figure.len()
            };
            debug_assert!(npts >= 2);
            let mut vs = figure.point(npts - 1);
            for i in 0..npts {
                let ve = figure.point(i);
                self.edges.attach_edge(vs, ve);
                vs = ve;
            }
        }
        true
    }

    /// Converts the path to edges for a stroked shape.
    fn stroked_shape(&mut self, path: &mut PathBuilder, style: &StrokeStyle) -> bool {
        path.end_figure();
        if path.is_empty() {
            return false;
        }
        if style.line_width == 0.0 {
            thin_stroke(&mut self.edges, path);
            return true;
        }
        let flatness = path.flatness();
        let mut stroker = Stroker::new(&mut self.edges, style, flatness);
        for figure in path.figures() {
            stroker.stroke_figure(&figure);
        }
        true
    }

    fn translate_scroll(&mut self) {
        if self.device_clip.x != 0 || self.device_clip.y != 0 {
            self.edges
                .translate_edges(self.device_clip.x, self.device_clip.y);
        }
    }

    /// Scan-converts the attached edges and hands them to the renderer.
    fn render_edges(&mut self, rule: ScanRule, renderer: &mut dyn Renderer) -> bool {
        self.translate_scroll();
        self.edges.normalize_edges(rule);
        self.edges.clip_edges(ScanRule::Intersect);
        self.fill_edge_list(renderer)
    }

    /// Fills the current path. Open figures are implicitly closed.
    /// Returns false if nothing was drawn (empty path or empty clip).
    pub fn fill_path(
        &mut self,
        path: &mut PathBuilder,
        rule: FillRule,
        renderer: &mut dyn Renderer,
    ) -> bool {
        self.bind_renderer(renderer);
        if !self.filled_shape(path) {
            return false;
        }
        self.render_edges(rule.into(), renderer)
    }

    /// Strokes the current path with the given style. Returns false if
    /// nothing was drawn.
    pub fn stroke_path(
        &mut self,
        path: &mut PathBuilder,
        style: &StrokeStyle,
        renderer: &mut dyn Renderer,
    ) -> bool {
        self.bind_renderer(renderer);
        if !self.stroked_shape(path, style) {
            return false;
        }
        self.render_edges(ScanRule::Winding, renderer)
    }

    /// Intersects the clip region with the interior of the given shape.
    /// Returns false if the new clip region is empty.
    pub fn set_clip_path(&mut self, path: &mut PathBuilder, shape: ClipShape) -> bool {
        let rule = match shape {
            ClipShape::Fill(rule) => {
                if !self.filled_shape(path) {
                    return false;
                }
                ScanRule::from(rule)
            }
            ClipShape::Stroke(style) => {
                if !self.stroked_shape(path, style) {
                    return false;
                }
                ScanRule::Winding
            }
        };
        self.translate_scroll();
        self.edges.normalize_edges(rule);
        self.edges.clip_edges(ScanRule::Intersect);
        self.edges.set_clip_list()
    }

    /// Masks the given shape out of the clip region, keeping the part of
    /// the region outside the shape. Returns false if the new clip
    /// region is empty.
    pub fn set_mask_path(&mut self, path: &mut PathBuilder, shape: ClipShape) -> bool {
        let rule = match shape {
            ClipShape::Fill(rule) => {
                if !self.filled_shape(path) {
                    return false;
                }
                ScanRule::from(rule)
            }
            ClipShape::Stroke(style) => {
                if !self.stroked_shape(path, style) {
                    return false;
                }
                ScanRule::Winding
            }
        };
        self.translate_scroll();
        self.edges.normalize_edges(rule);
        self.edges.reverse_edges();
        self.edges.clip_edges(ScanRule::Exclude);
        self.edges.set_clip_list()
    }

    /// Hands the normalized shape to the renderer. Returns false if
    /// there was nothing to draw.
    fn fill_edge_list(&mut self, renderer: &mut dyn Renderer) -> bool {
        if self.edges.out.head == NONE {
            return false;
        }
        mem::swap(&mut self.edges.out, &mut self.edges.rend);
        self.edges.out.reset();
        let head = self.edges.rend.head;
        let yshift = self.edges.yshift;
        let mut feeder = ShapeFeeder::new(&mut self.edges.rend.pool, head, yshift);
        renderer.render_shape(&mut feeder);
        true
    }

    /// Computes the path's minimum bounding box in caller coordinates,
    /// expanded outward to pixel boundaries and adjusted per `options`.
    /// Returns `None` for an empty path, or when clipping leaves nothing.
    pub fn bounding_box(
        &self,
        path: &PathBuilder,
        options: &BoundingBoxOptions,
    ) -> Option<IntRect> {
        let (min, max, _) = path.fixed_bounds()?;
        let mut xmin = min.x - FIX_HALF;
        let mut ymin = min.y - FIX_HALF;
        let mut xmax = max.x + FIX_HALF;
        let mut ymax = max.y + FIX_HALF;

        if let Some(style) = options.stroke {
            let width = Fixed::from_f32(style.line_width);
            let pad = if width.is_zero() {
                Fixed::ZERO
            } else if style.line_join == LineJoin::Miter
                || style.line_join == LineJoin::MiterClip
            {
                let limit = style.miter_limit.max(crate::MITER_LIMIT_MINIMUM);
                Fixed::from_f32((limit * limit + 1.0).sqrt() * style.line_width / 2.0)
            } else if style.line_cap == LineCap::Square {
                Fixed::from_f32(std::f32::consts::SQRT_2 * style.line_width / 2.0)
            } else {
                width >> 1
            };
            xmin -= pad;
            ymin -= pad;
            xmax += pad;
            ymax += pad;
        }

        if options.clip {
            let cx = Fixed::from_i32(self.device_clip.x);
            let cy = Fixed::from_i32(self.device_clip.y);
            let cw = cx + Fixed::from_i32(self.device_clip.w);
            let ch = cy + Fixed::from_i32(self.device_clip.h);
            xmin = xmin.max(cx);
            ymin = ymin.max(cy);
            xmax = xmax.min(cw);
            ymax = ymax.min(ch);
            if (xmax - xmin).raw() < 1 || (ymax - ymin).raw() < 1 {
                return None;
            }
        }

        let shift = path.fixed_shift();
        if let Some(prev) = options.accum {
            if prev.w > 0 && prev.h > 0 {
                let px = Fixed::from_raw(prev.x << shift);
                let py = Fixed::from_raw(prev.y << shift);
                let pw = px + Fixed::from_raw(prev.w << shift);
                let ph = py + Fixed::from_raw(prev.h << shift);
                xmin = xmin.min(px);
                ymin = ymin.min(py);
                xmax = xmax.max(pw);
                ymax = ymax.max(ph);
            }
        }

        // Extend the sides outward to the next pixel boundary.
        let xmin = xmin.raw() & !0xFFFF;
        let ymin = ymin.raw() & !0xFFFF;
        let xmax = (xmax.raw() + 0xFFFF) & !0xFFFF;
        let ymax = (ymax.raw() + 0xFFFF) & !0xFFFF;

        Some(IntRect {
            x: xmin >> shift,
            y: ymin >> shift,
            w: (xmax - xmin) >> shift,
            h: (ymax - ymin) >> shift,
        })
    }

    /// The current device clip rectangle, with the scroll position in
    /// `x`/`y`.
    pub fn device_clip(&self) -> IntRect {
        self.device_clip
    }
}

// Test helper: collect the filled pixels of aliased shapes.
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Default)]
    struct PixelSet {
        pixels: HashSet<(i32, i32)>,
    }

    impl Renderer for PixelSet {
        fn render_shape(&mut self, feeder: &mut ShapeFeeder) {
            while let Some(rect) = feeder.next_sdl_rect() {
                for y in rect.y..rect.y + rect.h {
                    for x in rect.x..rect.x + rect.w {
                        assert!(self.pixels.insert((x, y)), "pixel ({},{}) drawn twice", x, y);
                    }
                }
            }
        }
    }

    fn rect_path(x: i32, y: i32, w: i32, h: i32) -> PathBuilder {
        let mut path = PathBuilder::new();
        path.rectangle(&IntRect::new(x, y, w, h));
        path
    }

    #[test]
    fn rect_fill_covers_exactly_its_pixels() {
        let mut raster = Rasterizer::new(100, 100);
        let mut out = PixelSet::default();
        let mut path = rect_path(10, 20, 30, 40);
        assert!(raster.fill_path(&mut path, FillRule::EvenOdd, &mut out));
        assert_eq!(out.pixels.len(), 30 * 40);
        assert!(out.pixels.contains(&(10, 20)));
        assert!(out.pixels.contains(&(39, 59)));
        assert!(!out.pixels.contains(&(9, 20)));
        assert!(!out.pixels.contains(&(40, 20)));
        assert!(!out.pixels.contains(&(10, 60)));
    }

    #[test]
    fn empty_path_draws_nothing() {
        let mut raster = Rasterizer::new(50, 50);
        let mut out = PixelSet::default();
        let mut path = PathBuilder::new();
        assert!(!raster.fill_path(&mut path, FillRule::EvenOdd, &mut out));
        assert!(out.pixels.is_empty());
    }

    #[test]
    fn fill_is_invariant_under_reversal() {
        let tri = [(10, 10), (60, 15), (30, 50)];
        let mut forward = PixelSet::default();
        {
            let mut raster = Rasterizer::new(100, 100);
            let mut path = PathBuilder::new();
            path.move_to(tri[0].0, tri[0].1);
            for &(x, y) in &tri[1..] {
                path.line_to(x, y).unwrap();
            }
            path.close_figure();
            raster.fill_path(&mut path, FillRule::NonZero, &mut forward);
        }
        let mut reverse = PixelSet::default();
        {
            let mut raster = Rasterizer::new(100, 100);
            let mut path = PathBuilder::new();
            path.move_to(tri[2].0, tri[2].1);
            path.line_to(tri[1].0, tri[1].1).unwrap();
            path.line_to(tri[0].0, tri[0].1).unwrap();
            path.close_figure();
            raster.fill_path(&mut path, FillRule::NonZero, &mut reverse);
        }
        assert_eq!(forward.pixels, reverse.pixels);
    }

    #[test]
    fn open_figure_is_closed_for_filling() {
        let mut raster = Rasterizer::new(50, 50);
        let mut open = PixelSet::default();
        let mut path = PathBuilder::new();
        path.move_to(5, 5);
        path.line_to(25, 5).unwrap();
        path.line_to(25, 25).unwrap();
        path.line_to(5, 25).unwrap();
        path.end_figure();
        assert!(raster.fill_path(&mut path, FillRule::EvenOdd, &mut open));
        assert_eq!(open.pixels.len(), 20 * 20);
    }

    #[test]
    fn device_clip_bounds_fills() {
        let mut raster = Rasterizer::new(20, 20);
        let mut out = PixelSet::default();
        let mut path = rect_path(10, 10, 50, 50);
        assert!(raster.fill_path(&mut path, FillRule::EvenOdd, &mut out));
        assert_eq!(out.pixels.len(), 10 * 10);
        assert!(out.pixels.contains(&(19, 19)));
        assert!(!out.pixels.contains(&(20, 10)));
    }

    #[test]
    fn clip_then_mask_leaves_difference() {
        let mut raster = Rasterizer::new(100, 100);
        let mut clip = rect_path(10, 10, 40, 40);
        assert!(raster.set_clip_path(&mut clip, ClipShape::Fill(FillRule::EvenOdd)));
        let mut mask = rect_path(20, 20, 10, 10);
        assert!(raster.set_mask_path(&mut mask, ClipShape::Fill(FillRule::EvenOdd)));

        let mut out = PixelSet::default();
        let mut all = rect_path(0, 0, 100, 100);
        assert!(raster.fill_path(&mut all, FillRule::EvenOdd, &mut out));
        assert_eq!(out.pixels.len(), 40 * 40 - 10 * 10);
        assert!(out.pixels.contains(&(10, 10)));
        assert!(!out.pixels.contains(&(25, 25)));
        assert!(!out.pixels.contains(&(5, 5)));
    }

    #[test]
    fn saved_clip_region_round_trips() {
        let mut raster = Rasterizer::new(60, 60);
        let mut clip = rect_path(0, 0, 30, 30);
        assert!(raster.set_clip_path(&mut clip, ClipShape::Fill(FillRule::EvenOdd)));
        assert!(raster.save_clip_region());
        assert!(raster.swap_clip_region());
        assert!(raster.swap_clip_region());

        let mut out = PixelSet::default();
        let mut all = rect_path(0, 0, 60, 60);
        assert!(raster.fill_path(&mut all, FillRule::EvenOdd, &mut out));
        assert_eq!(out.pixels.len(), 30 * 30);
    }

    #[test]
    fn scroll_translates_output() {
        let mut raster = Rasterizer::new(50, 50);
        raster.set_scroll_position(8, 6);
        let mut out = PixelSet::default();
        let mut path = rect_path(10, 10, 5, 5);
        assert!(raster.fill_path(&mut path, FillRule::EvenOdd, &mut out));
        assert!(out.pixels.contains(&(2, 4)));
        assert_eq!(out.pixels.len(), 25);
    }

    #[test]
    fn stroke_square_produces_a_frame() {
        let mut raster = Rasterizer::new(100, 100);
        let mut out = PixelSet::default();
        let mut path = rect_path(20, 20, 40, 40);
        // Mitered corners keep the frame exactly rectangular.
        let style = StrokeStyle::default()
            .with_line_width(2.0)
            .with_line_join(LineJoin::MiterClip);
        assert!(raster.stroke_path(&mut path, &style, &mut out));
        // A 2-pixel frame around the 40x40 rectangle: outer 42x42 minus
        // inner 38x38.
        assert_eq!(out.pixels.len(), 42 * 42 - 38 * 38);
        assert!(out.pixels.contains(&(20, 20)));
        assert!(!out.pixels.contains(&(40, 40)));
    }

    #[test]
    fn stroke_is_invariant_under_reversal() {
        let pts = [(10, 10), (70, 20), (50, 70)];
        let style = StrokeStyle::default()
            .with_line_width(6.0)
            .with_line_join(LineJoin::Miter);

        let mut forward = PixelSet::default();
        {
            let mut raster = Rasterizer::new(100, 100);
            let mut path = PathBuilder::new();
            path.move_to(pts[0].0, pts[0].1);
            path.line_to(pts[1].0, pts[1].1).unwrap();
            path.line_to(pts[2].0, pts[2].1).unwrap();
            path.close_figure();
            raster.stroke_path(&mut path, &style, &mut forward);
        }
        let mut reverse = PixelSet::default();
        {
            let mut raster = Rasterizer::new(100, 100);
            let mut path = PathBuilder::new();
            path.move_to(pts[2].0, pts[2].1);
            path.line_to(pts[1].0, pts[1].1).unwrap();
            path.line_to(pts[0].0, pts[0].1).unwrap();
            path.close_figure();
            raster.stroke_path(&mut path, &style, &mut reverse);
        }
        assert_eq!(forward.pixels, reverse.pixels);
    }

    #[test]
    fn dashed_line_alternates_in_pattern() {
        let mut raster = Rasterizer::new(120, 40);
        let mut out = PixelSet::default();
        let mut path = PathBuilder::new();
        path.move_to(0, 10);
        path.line_to(100, 10).unwrap();
        path.end_figure();
        let mut style = StrokeStyle::default().with_line_width(1.0);
        assert!(style.set_dash(&[5, 5], 0, 1.0));
        assert!(raster.stroke_path(&mut path, &style, &mut out));

        // The 1-wide stroke of y=10 covers rows 9.5..10.5 and lands on
        // scan row 9. Ten 5-pixel dashes, ten 5-pixel gaps.
        let row: i32 = 9;
        let filled: HashSet<i32> = out
            .pixels
            .iter()
            .filter(|&&(_, y)| y == row)
            .map(|&(x, _)| x)
            .collect();
        assert_eq!(out.pixels.len(), filled.len(), "stroke strayed off its row");
        for x in 0..100 {
            let on = (x / 5) % 2 == 0;
            assert_eq!(
                filled.contains(&x),
                on,
                "column {} should be {}",
                x,
                if on { "set" } else { "clear" }
            );
        }
    }

    #[test]
    fn closed_dashed_stroke_continues_the_pattern() {
        // Stroking a degenerate closed rectangle runs the dash pattern
        // out and back without restarting it, so the return trip fills
        // the gaps the outbound trip left: the row reads solid.
        let mut raster = Rasterizer::new(120, 40);
        let mut out = PixelSet::default();
        let mut path = PathBuilder::new();
        path.rectangle(&IntRect::new(0, 10, 100, 0));
        let mut style = StrokeStyle::default().with_line_width(1.0);
        assert!(style.set_dash(&[5, 5], 0, 1.0));
        assert!(raster.stroke_path(&mut path, &style, &mut out));
        let filled: HashSet<i32> = out
            .pixels
            .iter()
            .filter(|&&(_, y)| y == 9)
            .map(|&(x, _)| x)
            .collect();
        for x in 0..100 {
            assert!(filled.contains(&x), "column {} should be set", x);
        }
    }

    #[test]
    fn thin_stroke_draws_single_pixel_diagonal() {
        let mut raster = Rasterizer::new(40, 40);
        let mut out = PixelSet::default();
        let mut path = PathBuilder::new();
        path.move_to(5, 5);
        path.line_to(25, 25).unwrap();
        path.end_figure();
        let style = StrokeStyle::default().with_line_width(0.0);
        assert!(raster.stroke_path(&mut path, &style, &mut out));
        // One pixel per row along the diagonal.
        for y in 6..25 {
            let row: Vec<i32> = out
                .pixels
                .iter()
                .filter(|&&(_, py)| py == y)
                .map(|&(x, _)| x)
                .collect();
            assert_eq!(row.len(), 1, "row {} has {} pixels", y, row.len());
        }
    }

    #[test]
    fn bounding_box_expands_for_stroke_and_clips() {
        let raster = Rasterizer::new(50, 50);
        let mut path = PathBuilder::new();
        path.rectangle(&IntRect::new(10, 10, 20, 20));
        let bare = raster
            .bounding_box(&path, &BoundingBoxOptions::default())
            .unwrap();
        // Half a pixel of antialiasing fuzz, expanded to pixel bounds.
        assert_eq!(bare, IntRect::new(9, 9, 22, 22));

        let style = StrokeStyle::default().with_line_width(4.0);
        let stroked = raster
            .bounding_box(
                &path,
                &BoundingBoxOptions {
                    stroke: Some(&style),
                    clip: false,
                    accum: None,
                },
            )
            .unwrap();
        assert!(stroked.w > bare.w && stroked.h > bare.h);

        let clipped = raster
            .bounding_box(
                &path,
                &BoundingBoxOptions {
                    stroke: None,
                    clip: true,
                    accum: None,
                },
            )
            .unwrap();
        assert!(clipped.x >= 0 && clipped.y >= 0);
        assert!(clipped.x + clipped.w <= 50);
    }
}
