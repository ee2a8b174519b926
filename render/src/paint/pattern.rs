//! The tiled-pattern (texture) paint generator.

use crate::color::{multiply_by_opacity, premultiply_in_place, swap_red_blue, Color};
use crate::geom::math::Transform;
use crate::image::ImageReader;
use crate::paint::PaintGenerator;
use crate::{FLAG_IMAGE_BOTTOMUP, FLAG_PREMULTALPHA, FLAG_SWAP_REDBLUE};

/// A 4-point multisampling pattern for antialiasing, selected by pixel
/// parity. Offsets are in units of 1/8 pixel from the pixel center.
const MSAA4X4: [[(i32, i32); 4]; 4] = [
    [(-3, -2), (2, -3), (3, 2), (-2, 3)], // x even, y even
    [(-2, -3), (3, -2), (2, 3), (-3, 2)], // x odd,  y even
    [(-2, -3), (3, -2), (2, 3), (-3, 2)], // x even, y odd
    [(-3, -2), (2, -3), (3, 2), (-2, 3)], // x odd,  y odd
];

/// `x` modulo `n`, always in `0..n`. Fast paths cover the common cases
/// of coordinates already in range or one tile away.
fn modulus(x: i32, n: i32) -> i32 {
    if (x as u32) < n as u32 {
        return x;
    }
    let x = if x < 0 { x + n } else { x - n };
    if (x as u32) < n as u32 {
        return x;
    }
    let x = x % n;
    if x < 0 {
        x + n
    } else {
        x
    }
}

/// Tiles a 2-D image over the plane and paints it with 4-point
/// multisampled box filtering.
///
/// An affine matrix maps device pixels to texel coordinates; texel
/// lookups wrap modulo the image dimensions. Texels are stored
/// premultiplied, whatever the source format was.
pub struct TiledPattern {
    pixels: Vec<Color>,
    width: i32,
    height: i32,
    /// Device-to-texel transform coefficients.
    xform: [f32; 6],
    dudx: i32,
    dvdx: i32,
    /// Per-parity u-v sampling offsets, 16.16 texels.
    offsets: [[(i32, i32); 4]; 4],
    xscroll: i32,
    yscroll: i32,
}

impl TiledPattern {
    /// Builds a pattern from a pixel array of `w` by `h` texels with the
    /// given row stride. `u0`/`v0` place the pattern-space origin.
    /// Returns `None` for bad dimensions.
    pub fn new(
        pattern: &[Color],
        u0: f32,
        v0: f32,
        w: i32,
        h: i32,
        stride: i32,
        flags: u32,
        xform: Option<&Transform>,
    ) -> Option<TiledPattern> {
        if w < 1 || h < 1 || stride < w {
            return None;
        }
        if pattern.len() < (stride * (h - 1) + w) as usize {
            return None;
        }
        let mut pixels = Vec::with_capacity((w * h) as usize);
        for row in 0..h {
            let start = (row * stride) as usize;
            pixels.extend_from_slice(&pattern[start..start + w as usize]);
        }
        Some(TiledPattern::init(pixels, u0, v0, w, h, flags, xform))
    }

    /// Builds a pattern by draining `w * h` pixels from an image reader.
    /// Returns `None` if the reader runs dry first.
    pub fn from_reader(
        reader: &mut dyn ImageReader,
        u0: f32,
        v0: f32,
        w: i32,
        h: i32,
        flags: u32,
        xform: Option<&Transform>,
    ) -> Option<TiledPattern> {
        if w < 1 || h < 1 {
            return None;
        }
        let mut pixels = vec![0; (w * h) as usize];
        let count = reader.read_pixels(&mut pixels);
        if count != pixels.len() {
            log::warn!(
                "pattern image underrun: got {} of {} pixels",
                count,
                pixels.len()
            );
            return None;
        }
        Some(TiledPattern::init(pixels, u0, v0, w, h, flags, xform))
    }

    fn init(
        mut pixels: Vec<Color>,
        u0: f32,
        v0: f32,
        w: i32,
        h: i32,
        flags: u32,
        xform: Option<&Transform>,
    ) -> TiledPattern {
        if flags & FLAG_SWAP_REDBLUE != 0 {
            for pixel in &mut pixels {
                *pixel = swap_red_blue(*pixel);
            }
        }
        if flags & FLAG_PREMULTALPHA == 0 {
            premultiply_in_place(&mut pixels);
        }

        // Device x-y to pattern u-v transform.
        let mut m = match xform {
            Some(t) => [t.m11, t.m12, t.m21, t.m22, t.m31, t.m32],
            None => [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
        };
        if flags & FLAG_IMAGE_BOTTOMUP != 0 {
            m[1] = -m[1];
            m[3] = -m[3];
        }
        m[4] += (m[0] + m[2]) / 2.0 - u0;
        m[5] += (m[1] + m[3]) / 2.0 - v0;
        let dudx = (65536.0 * m[0]) as i32;
        let dvdx = (65536.0 * m[1]) as i32;
        let dudy = (65536.0 * m[2]) as i32;
        let dvdy = (65536.0 * m[3]) as i32;

        // Map the display-space sampling offsets into u-v space once.
        let mut offsets = [[(0, 0); 4]; 4];
        for (parity, sample) in MSAA4X4.iter().enumerate() {
            for (slot, &(sx, sy)) in sample.iter().enumerate() {
                offsets[parity][slot] = (
                    (dudx.wrapping_mul(sx) + dudy.wrapping_mul(sy)) / 8,
                    (dvdx.wrapping_mul(sx) + dvdy.wrapping_mul(sy)) / 8,
                );
            }
        }

        TiledPattern {
            pixels,
            width: w,
            height: h,
            xform: m,
            dudx,
            dvdx,
            offsets,
            xscroll: 0,
            yscroll: 0,
        }
    }

    #[inline]
    fn texel(&self, i: i32, j: i32) -> Color {
        self.pixels[(j * self.width + i) as usize]
    }
}

impl PaintGenerator for TiledPattern {
    fn fill_span(&mut self, xs: i32, ys: i32, span: &mut [Color]) {
        // Map the span's starting point into u-v coordinates.
        let xs = xs + self.xscroll;
        let ys = ys + self.yscroll;
        let mut u =
            (65536.0 * (self.xform[0] * xs as f32 + self.xform[2] * ys as f32 + self.xform[4]))
                as i32;
        let mut v =
            (65536.0 * (self.xform[1] * xs as f32 + self.xform[3] * ys as f32 + self.xform[5]))
                as i32;
        let row_parity = if ys & 1 != 0 { 2 } else { 0 };

        for (k, pixel) in span.iter_mut().enumerate() {
            let opacity = *pixel & 255;
            if opacity != 0 {
                let parity = row_parity + ((xs + k as i32) & 1) as usize;
                let offsets = &self.offsets[parity];
                let i0 = modulus(u >> 16, self.width);
                let j0 = modulus(v >> 16, self.height);

                // Re-center u-v on the wrapped texel.
                u = (u & 0xFFFF) | (i0 << 16);
                v = (v & 0xFFFF) | (j0 << 16);

                // Box-filter four samples around the pixel center.
                let mut ga: u32 = 0;
                let mut rb: u32 = 0;
                for &(du, dv) in offsets.iter() {
                    let i = modulus(u.wrapping_add(du) >> 16, self.width);
                    let j = modulus(v.wrapping_add(dv) >> 16, self.height);
                    let texel = self.texel(i, j);
                    let half = texel & 0x00ff_00ff;
                    rb += half;
                    ga += (texel ^ half) >> 8;
                }
                ga &= 0x03fc_03fc;
                rb &= 0x03fc_03fc;
                let color = (ga << 6) | (rb >> 2);
                *pixel = multiply_by_opacity(color, opacity);
            }
            u = u.wrapping_add(self.dudx);
            v = v.wrapping_add(self.dvdx);
        }
    }

    fn set_scroll_position(&mut self, x: i32, y: i32) {
        self.xscroll = x;
        self.yscroll = y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FLAG_IMAGE_BGRA32;

    fn checkerboard(w: i32, h: i32, a: Color, b: Color) -> Vec<Color> {
        let mut out = Vec::new();
        for j in 0..h {
            for i in 0..w {
                out.push(if (i + j) & 1 == 0 { a } else { b });
            }
        }
        out
    }

    #[test]
    fn modulus_wraps_into_range() {
        assert_eq!(modulus(5, 8), 5);
        assert_eq!(modulus(8, 8), 0);
        assert_eq!(modulus(-1, 8), 7);
        assert_eq!(modulus(-17, 8), 7);
        assert_eq!(modulus(25, 8), 1);
    }

    #[test]
    fn solid_image_paints_solid() {
        let texels = vec![0xffab_cdef; 16];
        let mut pattern = TiledPattern::new(
            &texels,
            0.0,
            0.0,
            4,
            4,
            4,
            FLAG_IMAGE_BGRA32 | FLAG_PREMULTALPHA,
            None,
        )
        .unwrap();
        let mut span = vec![255u32; 8];
        pattern.fill_span(3, 7, &mut span);
        for pixel in &span {
            // Averaging four identical texels loses at most the two
            // low bits per component to the mask-and-shift filter.
            assert_eq!(pixel & 0xfcfc_fcfc, 0xffab_cdef & 0xfcfc_fcfc);
        }
    }

    #[test]
    fn pattern_repeats_with_image_period() {
        let texels = checkerboard(8, 8, 0xffff_ffff, 0xff00_0000);
        let mut pattern = TiledPattern::new(
            &texels,
            0.0,
            0.0,
            8,
            8,
            8,
            FLAG_IMAGE_BGRA32 | FLAG_PREMULTALPHA,
            None,
        )
        .unwrap();
        let mut a = vec![255u32; 1];
        let mut b = vec![255u32; 1];
        pattern.fill_span(3, 5, &mut a);
        pattern.fill_span(3 + 8, 5, &mut b);
        assert_eq!(a[0], b[0], "one image period apart");
    }

    #[test]
    fn zero_alpha_pixels_are_skipped() {
        let texels = vec![0xffff_ffff; 4];
        let mut pattern = TiledPattern::new(
            &texels,
            0.0,
            0.0,
            2,
            2,
            2,
            FLAG_IMAGE_BGRA32 | FLAG_PREMULTALPHA,
            None,
        )
        .unwrap();
        let mut span = vec![0u32, 255, 0];
        pattern.fill_span(0, 0, &mut span);
        assert_eq!(span[0], 0);
        assert_ne!(span[1], 0);
        assert_eq!(span[2], 0);
    }

    #[test]
    fn stride_larger_than_width_is_honored() {
        // 2x2 image embedded in rows of 5.
        let mut texels = vec![0u32; 10];
        texels[0] = 0xff00_0001;
        texels[1] = 0xff00_0002;
        texels[5] = 0xff00_0003;
        texels[6] = 0xff00_0004;
        let pattern = TiledPattern::new(
            &texels,
            0.0,
            0.0,
            2,
            2,
            5,
            FLAG_IMAGE_BGRA32 | FLAG_PREMULTALPHA,
            None,
        )
        .unwrap();
        assert_eq!(pattern.pixels, vec![0xff00_0001, 0xff00_0002, 0xff00_0003, 0xff00_0004]);
    }

    #[test]
    fn bad_dimensions_are_rejected() {
        let texels = vec![0u32; 4];
        assert!(TiledPattern::new(&texels, 0.0, 0.0, 0, 2, 2, 0, None).is_none());
        assert!(TiledPattern::new(&texels, 0.0, 0.0, 2, 2, 1, 0, None).is_none());
    }
}
