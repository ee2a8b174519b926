//! The antialiased renderer: 4x8 supersampling through a scan-line
//! coverage buffer.
//!
//! Shapes arrive as subpixel spans at 4x vertical resolution. Each span
//! sets bits in the AA-buffer, a bitmap holding one bit per subpixel
//! for the current scan line: 4 rows of 8 bits per pixel, stored as
//! 32-bit words so four adjacent pixels update in parallel. When a span
//! for a new scan line arrives, the finished line is flushed: coverage
//! bits are counted, converted to colors through a 33-entry look-up
//! table (or handed to a paint generator), and alpha-blended into the
//! target with premultiplied arithmetic.

use crate::color::{premultiply, Color};
use crate::geom::math::Transform;
use crate::geom::FIX_BIAS;
use crate::image::ImageReader;
use crate::paint::{ConicGradient, LinearGradient, Paint, PaintGenerator, RadialGradient, TiledPattern};
use crate::pixmap::BufferView;
use crate::raster::{Renderer, ShapeFeeder};
use crate::{BlendOp, SpreadMethod, COLOR_STOPS_MAX, FLAG_IMAGE_BGRA32, FLAG_SWAP_REDBLUE};

use arrayvec::ArrayVec;

/// Sums the bits of each byte of `word`: the result holds four
/// independent counts in 0..=8, one per byte lane.
#[inline]
pub(crate) fn byte_bit_counts(word: u32) -> u32 {
    let word = (word & 0x5555_5555) + ((word >> 1) & 0x5555_5555);
    let word = (word & 0x3333_3333) + ((word >> 2) & 0x3333_3333);
    (word & 0x0f0f_0f0f) + ((word >> 4) & 0x0f0f_0f0f)
}

/// Alpha-blends premultiplied source pixels over opaque destination
/// pixels: `dst = src + dst*(1 - src.a)`.
fn blend_src_over(src: &[Color], dst: &mut [Color]) {
    for (s, d) in src.iter().zip(dst.iter_mut()) {
        let srcpix = *s;
        let anot = !srcpix >> 24;
        let dstpix = *d;
        let mut rb = dstpix & 0x00ff_00ff;
        rb *= anot;
        rb += 0x0080_0080;
        rb += (rb >> 8) & 0x00ff_00ff;
        rb = (rb >> 8) & 0x00ff_00ff;
        let mut ga = (dstpix >> 8) & 0x00ff_00ff;
        ga *= anot;
        ga += 0x0080_0080;
        ga += (ga >> 8) & 0x00ff_00ff;
        ga &= 0xff00_ff00;
        *d = (ga | rb).wrapping_add(srcpix);
    }
}

/// Adds source to destination with per-component saturation.
fn blend_add_sat(src: &[Color], dst: &mut [Color]) {
    for (s, d) in src.iter().zip(dst.iter_mut()) {
        let a = s.to_le_bytes();
        let b = d.to_le_bytes();
        *d = u32::from_le_bytes([
            a[0].saturating_add(b[0]),
            a[1].saturating_add(b[1]),
            a[2].saturating_add(b[2]),
            a[3].saturating_add(b[3]),
        ]);
    }
}

/// Multiplies the destination by 255 minus the source alpha, leaving a
/// hole where the source is opaque. Supports front-to-back masking.
fn blend_alpha_clear(src: &[Color], dst: &mut [Color]) {
    for (s, d) in src.iter().zip(dst.iter_mut()) {
        let anot = !*s >> 24;
        let dstpix = *d;
        let mut rb = dstpix & 0x00ff_00ff;
        rb *= anot;
        rb += 0x0080_0080;
        rb += (rb >> 8) & 0x00ff_00ff;
        rb = (rb >> 8) & 0x00ff_00ff;
        let mut ga = (dstpix >> 8) & 0x00ff_00ff;
        ga *= anot;
        ga += 0x0080_0080;
        ga += (ga >> 8) & 0x00ff_00ff;
        ga &= 0xff00_ff00;
        *d = ga | rb;
    }
}

/// The antialiased renderer. Supersamples 4x vertically and 8x
/// horizontally, paints with a solid color or an installed paint
/// generator, and blends into its target with a selectable blend
/// operation.
///
/// Coverage-to-color conversion goes through a 33-entry look-up table
/// indexed by a pixel's coverage count (0..=32). For solid fills the
/// table holds the premultiplied color pre-scaled by coverage and the
/// constant alpha; when a paint generator is installed it holds only
/// coverage times the constant alpha, which the generator reads as its
/// per-pixel input opacity.
pub struct AaRenderer<'a> {
    target: BufferView<'a>,
    /// Buffered width, padded up to a multiple of four.
    width: i32,
    /// One scan line of source pixels.
    linebuf: Vec<Color>,
    /// 4 rows of one-bit-per-subpixel coverage.
    aabuf: Vec<u32>,
    lut: [Color; 33],
    /// Raw color stops as added, replayed into each new gradient.
    stops: ArrayVec<(f32, Color), COLOR_STOPS_MAX>,
    paint: Option<Paint>,
    transform: Option<Transform>,
    /// Source constant alpha, 0..=255.
    alpha: u32,
    /// Current solid color as handed to `set_color` (RGBA).
    color: Color,
    blendop: BlendOp,
    xscroll: i32,
    yscroll: i32,
}

impl<'a> AaRenderer<'a> {
    pub fn new(target: BufferView<'a>) -> AaRenderer<'a> {
        let width = target.width() as i32;
        let mut renderer = AaRenderer {
            target,
            width: 0,
            linebuf: Vec::new(),
            aabuf: Vec::new(),
            lut: [0; 33],
            stops: ArrayVec::new(),
            paint: None,
            transform: None,
            alpha: 255,
            color: 0,
            blendop: BlendOp::SrcOverDst,
            xscroll: 0,
            yscroll: 0,
        };
        Renderer::set_max_width(&mut renderer, width);
        renderer.set_color(0xff00_0000);
        renderer
    }

    /// Loads one 8-bit component into the look-up table: each entry
    /// shifts left to make room, and takes the component scaled by
    /// i/32 for entry i.
    fn blend_lut(&mut self, component: u32) {
        let diff = component | (component << 8);
        let mut val: u32 = 15; // rounding
        for entry in self.lut.iter_mut() {
            *entry = (*entry << 8) | (val >> 13);
            val += diff;
        }
    }

    /// Rebuilds the table for solid fills: premultiplied color times
    /// coverage times the constant alpha, converted to BGRA.
    fn rebuild_solid_lut(&mut self) {
        let color = self.color;
        let mut opacity = self.alpha * (color >> 24);
        opacity += 128;
        opacity += opacity >> 8;
        opacity >>= 8;
        let color = (opacity << 24) | (color & 0x00ff_ffff);
        self.blend_lut(opacity);
        let color = premultiply(color);
        for shift in [0u32, 8, 16].iter() {
            self.blend_lut((color >> shift) & 255);
        }
    }

    /// Rebuilds the table for paint fills: the constant-alpha channel
    /// only, so the paint generator sees pure coverage x alpha.
    fn rebuild_paint_lut(&mut self) {
        self.lut = [0; 33];
        let alpha = self.alpha;
        self.blend_lut(alpha);
    }

    /// Selects a solid fill color (RGBA), replacing any installed paint
    /// generator.
    pub fn set_color(&mut self, color: Color) {
        self.paint = None;
        self.color = color;
        self.rebuild_solid_lut();
    }

    fn install_paint(&mut self, mut paint: Paint) {
        paint.set_scroll_position(self.xscroll, self.yscroll);
        self.paint = Some(paint);
        self.rebuild_paint_lut();
    }

    /// Installs a tiled pattern from a pixel array. Returns false if the
    /// parameters are invalid.
    #[allow(clippy::too_many_arguments)]
    pub fn set_pattern(
        &mut self,
        pattern: &[Color],
        u0: f32,
        v0: f32,
        w: i32,
        h: i32,
        stride: i32,
        flags: u32,
    ) -> bool {
        self.paint = None;
        let flags = Self::fix_channel_order(flags);
        match TiledPattern::new(pattern, u0, v0, w, h, stride, flags, self.transform.as_ref()) {
            Some(pat) => {
                self.install_paint(Paint::Pattern(pat));
                true
            }
            None => false,
        }
    }

    /// Installs a tiled pattern supplied by an image reader. On failure
    /// (for example an image underrun) no paint is installed and
    /// subsequent fills are transparent until a color or paint is set.
    pub fn set_pattern_from_reader(
        &mut self,
        reader: &mut dyn ImageReader,
        u0: f32,
        v0: f32,
        w: i32,
        h: i32,
        flags: u32,
    ) -> bool {
        self.paint = None;
        let flags = Self::fix_channel_order(flags);
        match TiledPattern::from_reader(reader, u0, v0, w, h, flags, self.transform.as_ref()) {
            Some(pat) => {
                self.install_paint(Paint::Pattern(pat));
                true
            }
            None => {
                // Substitute transparent: an empty LUT paints nothing.
                self.lut = [0; 33];
                false
            }
        }
    }

    /// This renderer works in BGRA internally; unless the image is
    /// declared BGRA already, swap red and blue on load.
    fn fix_channel_order(flags: u32) -> u32 {
        if flags & FLAG_IMAGE_BGRA32 == 0 {
            flags | FLAG_SWAP_REDBLUE
        } else {
            flags
        }
    }

    /// Installs a linear gradient paint from `(x0, y0)` to `(x1, y1)`,
    /// with the current color stops.
    pub fn set_linear_gradient(
        &mut self,
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        spread: SpreadMethod,
        flags: u32,
    ) {
        let mut grad =
            LinearGradient::new(x0, y0, x1, y1, spread, flags, self.transform.as_ref());
        for &(offset, color) in &self.stops {
            grad.add_color_stop(offset, color);
        }
        self.install_paint(Paint::Linear(grad));
    }

    /// Installs a radial gradient paint between the circles
    /// `(x0, y0, r0)` and `(x1, y1, r1)`, with the current color stops.
    #[allow(clippy::too_many_arguments)]
    pub fn set_radial_gradient(
        &mut self,
        x0: f32,
        y0: f32,
        r0: f32,
        x1: f32,
        y1: f32,
        r1: f32,
        spread: SpreadMethod,
        flags: u32,
    ) {
        let mut grad =
            RadialGradient::new(x0, y0, r0, x1, y1, r1, spread, flags, self.transform.as_ref());
        for &(offset, color) in &self.stops {
            grad.add_color_stop(offset, color);
        }
        self.install_paint(Paint::Radial(grad));
    }

    /// Installs a conic gradient paint around `(x0, y0)`, with the
    /// current color stops.
    pub fn set_conic_gradient(
        &mut self,
        x0: f32,
        y0: f32,
        astart: f32,
        asweep: f32,
        spread: SpreadMethod,
        flags: u32,
    ) {
        let mut grad =
            ConicGradient::new(x0, y0, astart, asweep, spread, flags, self.transform.as_ref());
        for &(offset, color) in &self.stops {
            grad.add_color_stop(offset, color);
        }
        self.install_paint(Paint::Conic(grad));
    }

    /// Adds a gradient color stop (RGBA). Takes effect on the next
    /// `set_*_gradient` call. At most 32 stops are kept.
    pub fn add_color_stop(&mut self, offset: f32, color: Color) {
        if self.stops.len() < COLOR_STOPS_MAX {
            // Store converted to the internal BGRA order.
            self.stops.push((offset, crate::color::swap_red_blue(color)));
        }
    }

    /// Discards all color stops.
    pub fn reset_color_stops(&mut self) {
        self.stops.clear();
    }

    /// Sets the affine transform applied to subsequently installed
    /// patterns and gradients. `None` restores the identity.
    pub fn set_transform(&mut self, xform: Option<&Transform>) {
        self.transform = xform.copied();
    }

    /// Sets the constant alpha mixed into every fill, 0..=255.
    pub fn set_constant_alpha(&mut self, alpha: u32) {
        self.alpha = alpha & 255;
        if self.paint.is_some() {
            self.rebuild_paint_lut();
        } else {
            self.rebuild_solid_lut();
        }
    }

    /// Selects how source pixels combine with the target.
    pub fn set_blend_operation(&mut self, blendop: BlendOp) {
        self.blendop = blendop;
    }

    /// Sets one span of coverage bits on subpixel row `ysub`. `xl` and
    /// `xr` carry 3 fractional (subpixel) bits.
    fn fill_subpixel_span(&mut self, xl: i32, xr: i32, ysub: i32) {
        let il = (xl >> 5) as usize;
        let ir = (xr >> 5) as usize;
        let mask_l: u32 = !0 << (xl & 31);
        let mask_r: u32 = (1u32 << (xr & 31)) - 1;
        let w4 = (self.width / 4) as usize;
        let row = &mut self.aabuf[(ysub & 3) as usize * w4..][..w4];

        if il != ir {
            row[il] |= mask_l;
            for word in &mut row[il + 1..ir] {
                *word = !0;
            }
            if mask_r != 0 {
                row[ir] |= mask_r;
            }
        } else {
            row[il] |= mask_l & mask_r;
        }
    }

    /// Flushes the finished scan line `yscan`: converts coverage counts
    /// to colors, runs the paint generator, and blends into the target.
    fn render_abuffer(&mut self, xmin: i32, xmax: i32, yscan: i32) {
        let il = (xmin >> 5) as usize;
        let ir = ((xmax + 31) >> 5) as usize;
        debug_assert!(il < ir);
        let w4 = (self.width / 4) as usize;

        // Tally the coverage bits for four adjacent pixels at a time,
        // then turn each count into a color by table lookup.
        for i in il..ir {
            let mut count: u32 = 0;
            for j in 0..4 {
                let val = self.aabuf[j * w4 + i];
                self.aabuf[j * w4 + i] = 0;
                count += byte_bit_counts(val);
            }
            let mut x = 4 * i;
            for _ in 0..4 {
                self.linebuf[x] = self.lut[(count & 63) as usize];
                x += 1;
                count >>= 8;
            }
        }

        let xleft = (xmin / 8) as usize;
        let xright = ((xmax + 7) / 8) as usize;

        if let Some(paint) = &mut self.paint {
            paint.fill_span(
                xleft as i32,
                yscan,
                &mut self.linebuf[xleft..xright],
            );
        }

        // Blend the painted pixels into the target.
        let src = &self.linebuf[xleft..xright];
        let dst = &mut self.target.row_mut(yscan as usize)[xleft..xright];
        match self.blendop {
            BlendOp::SrcOverDst => blend_src_over(src, dst),
            BlendOp::AddWithSat => blend_add_sat(src, dst),
            BlendOp::AlphaClear => blend_alpha_clear(src, dst),
        }

        for pixel in &mut self.linebuf[xleft..xright] {
            *pixel = 0;
        }
    }
}

impl<'a> Renderer for AaRenderer<'a> {
    fn render_shape(&mut self, feeder: &mut ShapeFeeder) {
        const YSCAN_INVALID: i32 = i32::MIN;
        let mut yscan = YSCAN_INVALID;
        let mut xmin = 0;
        let mut xmax = 0;

        // Subpixel spans arrive in y-ascending order, so each scan line
        // can be built completely before the next one starts.
        while let Some(span) = feeder.next_span() {
            // Keep 3 subpixel bits of x, trading the pixel-offset bias
            // for a subpixel-offset bias.
            let xl = (span.xl.raw() + FIX_BIAS.raw() / 8 - FIX_BIAS.raw()) >> 13;
            let xr = (span.xr.raw() + FIX_BIAS.raw() / 8 - FIX_BIAS.raw()) >> 13;
            if xl == xr {
                continue; // the span fell into a crack between subpixels
            }
            let ysub = span.y;

            if yscan != ysub / 4 {
                if yscan != YSCAN_INVALID {
                    self.render_abuffer(xmin, xmax, yscan);
                }
                xmin = xl;
                xmax = xr;
                yscan = ysub / 4;
            }
            self.fill_subpixel_span(xl, xr, ysub);
            xmin = xmin.min(xl);
            xmax = xmax.max(xr);
        }

        if yscan != YSCAN_INVALID {
            self.render_abuffer(xmin, xmax, yscan);
        }
    }

    fn y_resolution(&self) -> u32 {
        2
    }

    fn set_max_width(&mut self, width: i32) -> bool {
        // Pad out to a multiple of four so the AA-buffer splits into
        // whole words.
        let width = (width + 3) & !3;
        debug_assert!(width > 0);
        if self.width != width {
            log::debug!("aa renderer: resizing line buffers to {}", width);
            self.width = width;
            self.linebuf = vec![0; width as usize];
            self.aabuf = vec![0; width as usize];
        }
        true
    }

    fn set_scroll_position(&mut self, x: i32, y: i32) -> bool {
        self.xscroll = x;
        self.yscroll = y;
        if let Some(paint) = &mut self.paint {
            paint.set_scroll_position(x, y);
        }
        true
    }
}
