//! Linear, radial and conic gradient paint generators.

use std::f32::consts::PI;

use crate::color::Color;
use crate::geom::math::Transform;
use crate::paint::{ColorStops, PaintGenerator};
use crate::{SpreadMethod, FLAG_EXTEND_END, FLAG_EXTEND_START};

/// The transform as the six affine coefficients
/// `x' = m[0]*x + m[2]*y + m[4]`, `y' = m[1]*x + m[3]*y + m[5]`.
fn coefficients(xform: &Transform) -> [f32; 6] {
    [
        xform.m11, xform.m12, xform.m21, xform.m22, xform.m31, xform.m32,
    ]
}

fn normalize_spread(spread: SpreadMethod) -> SpreadMethod {
    match spread {
        SpreadMethod::Pad | SpreadMethod::Reflect => spread,
        _ => SpreadMethod::Repeat,
    }
}

/// Spread/extend resolution shared by the linear and radial generators:
/// maps an unbounded parameter `t` to a table lookup, honoring the
/// extend flags and spread method.
fn resolve_color(
    stops: &mut ColorStops,
    t: f32,
    spread: SpreadMethod,
    ext_start: bool,
    ext_end: bool,
    opacity: u32,
) -> Color {
    if !(ext_start || t >= 0.0) || !(ext_end || t < 1.0) {
        return 0;
    }
    let mut n = t as i32;
    if t < 0.0 {
        n -= 1;
    }
    if spread == SpreadMethod::Pad && n != 0 {
        return stops.pad_color(n, opacity);
    }
    // 1.0 maps to 0xFFFF rather than 0x10000 so that pattern boundaries
    // stay distinguishable under the reflect spread.
    let mut tfix = (65535.0 * (t - n as f32)) as i32;
    if spread == SpreadMethod::Reflect && (n & 1) != 0 {
        tfix ^= 0xFFFF;
    }
    stops.color_at(tfix, opacity)
}

/// Paints an axis between two points with colors interpolated from a
/// color-stop table; the bands of constant color run perpendicular to
/// the axis.
///
/// The gradient parameter at pixel p is
/// `t = (p - p0).(p1 - p0) / |p1 - p0|^2`, so `t = 0` at `p0` and
/// `t = 1` at `p1`.
pub struct LinearGradient {
    stops: ColorStops,
    x0: f32,
    y0: f32,
    spread: SpreadMethod,
    ext_start: bool,
    ext_end: bool,
    xscroll: i32,
    yscroll: i32,
    /// Degenerate case: p0 == p1.
    degenerate: bool,
    // Constant over the generator's lifetime.
    dtdx: f32,
    dtdy: f32,
}

impl LinearGradient {
    /// Defines a gradient from `(x0, y0)` to `(x1, y1)`. An affine
    /// transform, if supplied, repositions both points.
    pub fn new(
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        spread: SpreadMethod,
        flags: u32,
        xform: Option<&Transform>,
    ) -> LinearGradient {
        let mut grad = LinearGradient {
            stops: ColorStops::new(),
            x0,
            y0,
            spread: normalize_spread(spread),
            ext_start: flags & FLAG_EXTEND_START != 0,
            ext_end: flags & FLAG_EXTEND_END != 0,
            xscroll: 0,
            yscroll: 0,
            degenerate: x0 == x1 && y0 == y1,
            dtdx: 0.0,
            dtdy: 0.0,
        };
        if grad.degenerate {
            return grad;
        }

        let (mut x0, mut y0, mut x1, mut y1) = (x0, y0, x1, y1);
        if let Some(xform) = xform {
            let m = coefficients(xform);
            let tmp = m[0] * x0 + m[2] * y0 + m[4];
            y0 = m[1] * x0 + m[3] * y0 + m[5];
            x0 = tmp;
            let tmp = m[0] * x1 + m[2] * y1 + m[4];
            y1 = m[1] * x1 + m[3] * y1 + m[5];
            x1 = tmp;
        }

        // Work relative to the starting point, sampling pixel centers.
        x1 -= x0;
        y1 -= y0;
        grad.x0 = x0 - 0.5;
        grad.y0 = y0 - 0.5;

        let dist2 = x1 * x1 + y1 * y1;
        grad.dtdx = x1 / dist2;
        grad.dtdy = y1 / dist2;
        grad
    }

    /// Adds a gradient color stop. The color is interpreted in the same
    /// byte order as the output pixels.
    pub fn add_color_stop(&mut self, offset: f32, color: Color) -> bool {
        self.stops.add(offset, color)
    }
}

impl PaintGenerator for LinearGradient {
    fn fill_span(&mut self, xs: i32, ys: i32, span: &mut [Color]) {
        if self.degenerate {
            if self.ext_end {
                for pixel in span.iter_mut() {
                    let opacity = *pixel & 255;
                    *pixel = self.stops.pad_color(1, opacity);
                }
            }
            return;
        }

        let xp = (xs + self.xscroll) as f32 - self.x0;
        let yp = (ys + self.yscroll) as f32 - self.y0;
        let mut t = xp * self.dtdx + yp * self.dtdy;

        for pixel in span.iter_mut() {
            let opacity = *pixel & 255;
            if opacity != 0 {
                *pixel = resolve_color(
                    &mut self.stops,
                    t,
                    self.spread,
                    self.ext_start,
                    self.ext_end,
                    opacity,
                );
            }
            t += self.dtdx;
        }
    }

    fn set_scroll_position(&mut self, x: i32, y: i32) {
        self.xscroll = x;
        self.yscroll = y;
    }
}

/// Paints the family of circles interpolated between a starting circle
/// `(x0, y0, r0)` and an ending circle `(x1, y1, r1)`.
///
/// For each pixel p the generator solves for the largest `t` such that p
/// lies on the circle centered at `c0 + t*(c1 - c0)` with radius
/// `r0 + t*(r1 - r0)`, subject to that radius being non-negative.
pub struct RadialGradient {
    stops: ColorStops,
    x0: f32,
    y0: f32,
    r0: f32,
    x1: f32,
    y1: f32,
    r1: f32,
    spread: SpreadMethod,
    ext_start: bool,
    ext_end: bool,
    /// Degenerate case: identical circles or a collapsed transform.
    degenerate: bool,
    /// Scaling-and-shearing applied to input coordinates when the
    /// gradient has been transformed: x += vx*y; y *= vy.
    vx: f32,
    vy: f32,
    xscroll: i32,
    yscroll: i32,
    // Constant over the generator's lifetime.
    dr: f32,
    a: f32,
    inva: f32,
    a2: f32,
}

impl RadialGradient {
    pub fn new(
        x0: f32,
        y0: f32,
        r0: f32,
        x1: f32,
        y1: f32,
        r1: f32,
        spread: SpreadMethod,
        flags: u32,
        xform: Option<&Transform>,
    ) -> RadialGradient {
        debug_assert!(r0 >= 0.0 && r1 >= 0.0 && (r0 != 0.0 || r1 != 0.0));
        let mut grad = RadialGradient {
            stops: ColorStops::new(),
            x0,
            y0,
            r0: r0.max(0.0),
            x1,
            y1,
            r1: r1.max(0.0),
            spread: normalize_spread(spread),
            ext_start: flags & FLAG_EXTEND_START != 0,
            ext_end: flags & FLAG_EXTEND_END != 0,
            degenerate: x0 == x1 && y0 == y1 && r0 == r1,
            vx: 0.0,
            vy: 1.0,
            xscroll: 0,
            yscroll: 0,
            dr: 0.0,
            a: 0.0,
            inva: 0.0,
            a2: 0.0,
        };
        if grad.degenerate {
            return grad;
        }
        if let Some(xform) = xform {
            grad.apply_transform(&coefficients(xform));
            if grad.degenerate {
                return grad;
            }
        }

        // Work relative to the starting center; any scale or shear from
        // the transform lives in (vx, vy) now.
        grad.x1 -= grad.x0;
        grad.y1 -= grad.y0;
        grad.x1 += grad.vx * grad.y1;
        grad.y1 *= grad.vy;
        grad.x0 -= 0.5;
        grad.y0 -= 0.5;

        grad.dr = grad.r1 - grad.r0;
        grad.a = grad.x1 * grad.x1 + grad.y1 * grad.y1 - grad.dr * grad.dr;
        grad.inva = if grad.a == 0.0 { 0.0 } else { 1.0 / grad.a };
        grad.a2 = grad.dr * grad.dr - grad.y1 * grad.y1;
        grad
    }

    /// Applies an affine transform to the gradient: the circles become
    /// an ellipse family, which is reduced back to circles plus a
    /// scaling-and-shearing of input coordinates. The reduction
    /// decomposes the transformed radius ellipse by rotating its
    /// principal axes onto the coordinate axes, scaling x to turn it
    /// into a circle, renormalizing, and rotating back.
    fn apply_transform(&mut self, m: &[f32; 6]) {
        let (rmax0, rmin0, swapped) = if self.r1 > self.r0 {
            (self.r1, self.r0, false)
        } else {
            (self.r0, self.r1, true)
        };
        let ratio = rmin0 / rmax0;

        // Transform the circle centers, and turn radius rmax into the
        // conjugate diameter end points of the transformed ellipse.
        let tmp = m[0] * self.x0 + m[2] * self.y0 + m[4];
        self.y0 = m[1] * self.x0 + m[3] * self.y0 + m[5];
        self.x0 = tmp;
        let tmp = m[0] * self.x1 + m[2] * self.y1 + m[4];
        self.y1 = m[1] * self.x1 + m[3] * self.y1 + m[5];
        self.x1 = tmp;
        let mut px = m[0] * rmax0;
        let mut py = m[1] * rmax0;
        let mut qx = m[2] * rmax0;
        let mut qy = m[3] * rmax0;

        // Unit vectors u and v accumulate the effect of everything done
        // to the ellipse below.
        let mut ux = 1.0_f32;
        let mut uy = 0.0_f32;
        self.vx = 0.0;
        self.vy = 1.0;

        // Coefficients of the implicit ellipse equation
        // Ax^2 + Bxy + Cy^2 + ... = 0. A nonzero B means the principal
        // axes are tilted; rotate them onto the coordinate axes.
        let b = -2.0 * (px * py + qx * qy);
        if b != 0.0 {
            let a = py * py + qy * qy;
            let c = px * px + qx * qx;
            let beta = (c - a) / b;
            let slope = beta + (beta * beta + 1.0).sqrt();
            let norm = (slope * slope + 1.0).sqrt();
            let cosa = 1.0 / norm;
            let sina = slope / norm;

            let tmp = px * cosa + py * sina;
            py = -px * sina + py * cosa;
            px = tmp;
            let tmp = qx * cosa + qy * sina;
            qy = -qx * sina + qy * cosa;
            qx = tmp;
            let tmp = ux * cosa + uy * sina;
            uy = -ux * sina + uy * cosa;
            ux = tmp;
            let tmp = self.vx * cosa + self.vy * sina;
            self.vy = -self.vx * sina + self.vy * cosa;
            self.vx = tmp;
        }

        // Scale in x to squeeze the axis-aligned ellipse into a circle.
        let dx = px.abs() + qx.abs();
        if dx < 0.00001 {
            self.degenerate = true;
            return;
        }
        let dy = py.abs() + qy.abs();
        let scale = dy / dx;
        px *= scale;
        let mut rmax = (px * px + py * py).sqrt();
        ux *= scale;
        self.vx *= scale;

        // Renormalize u to unit length, carrying v and the radii along.
        let scale = 1.0 / (ux * ux + uy * uy).sqrt();
        ux *= scale;
        uy *= scale;
        self.vx *= scale;
        self.vy *= scale;
        rmax *= scale;
        let rmin = ratio * rmax;
        if swapped {
            self.r0 = rmax;
            self.r1 = rmin;
        } else {
            self.r1 = rmax;
            self.r0 = rmin;
        }

        // Rotate u onto the +x axis; only the rotated v needs keeping.
        let cosb = ux;
        let sinb = uy;
        let tmp = self.vx * cosb + self.vy * sinb;
        self.vy = -self.vx * sinb + self.vy * cosb;
        self.vx = tmp;
    }

    pub fn add_color_stop(&mut self, offset: f32, color: Color) -> bool {
        self.stops.add(offset, color)
    }
}

impl PaintGenerator for RadialGradient {
    fn fill_span(&mut self, xs: i32, ys: i32, span: &mut [Color]) {
        if self.degenerate {
            if self.ext_end {
                for pixel in span.iter_mut() {
                    let opacity = *pixel & 255;
                    *pixel = self.stops.pad_color(1, opacity);
                }
            }
            return;
        }

        let mut xp = (xs + self.xscroll) as f32 - self.x0;
        let mut yp = (ys + self.yscroll) as f32 - self.y0;
        xp += self.vx * yp;
        yp *= self.vy;
        let b0 = yp * self.y1 + self.r0 * self.dr;
        let mut b = xp * self.x1 + b0;
        let phi = yp * yp - self.r0 * self.r0;
        let a0 = b0 * b0 - self.a * phi;
        let a1 = 2.0 * b0 * self.x1;

        for pixel in span.iter_mut() {
            let opacity = *pixel & 255;
            if opacity != 0 {
                let mut color = 0;
                let mut discr = (self.a2 * xp + a1) * xp + a0;
                if discr < 0.0 && self.a < 0.0 {
                    discr = 0.0;
                }
                if discr >= 0.0 {
                    let mut t0 = 0.0;
                    let mut t1 = 0.0;
                    let mut valid0 = false;
                    let mut valid1 = false;

                    if self.a == 0.0 {
                        // Degenerate quadratic: a single root.
                        if b != 0.0 {
                            let c = xp * xp + phi;
                            t1 = (c / b) / 2.0;
                            valid1 = (self.ext_start || t1 >= 0.0)
                                && (self.ext_end || t1 < 1.0)
                                && self.r0 + t1 * self.dr > 0.0;
                        }
                    } else {
                        let root = discr.sqrt();
                        if self.a > 0.0 || self.dr < 0.0 {
                            t0 = self.inva * (b + root);
                            valid0 = (self.ext_start || t0 >= 0.0)
                                && (self.ext_end || t0 < 1.0)
                                && (self.a < 0.0 || self.r0 + t0 * self.dr >= 0.0);
                        }
                        if self.a > 0.0 || self.dr > 0.0 {
                            t1 = self.inva * (b - root);
                            valid1 = (self.ext_start || t1 >= 0.0)
                                && (self.ext_end || t1 < 1.0)
                                && (self.a < 0.0 || self.r0 + t1 * self.dr >= 0.0);
                        }
                    }
                    if valid0 || valid1 {
                        let t = if valid0 && valid1 {
                            t0.max(t1)
                        } else if valid0 {
                            t0
                        } else {
                            t1
                        };
                        color = resolve_color(
                            &mut self.stops,
                            t,
                            self.spread,
                            self.ext_start,
                            self.ext_end,
                            opacity,
                        );
                    }
                }
                *pixel = color;
            }
            xp += 1.0;
            b += self.x1;
        }
    }

    fn set_scroll_position(&mut self, x: i32, y: i32) {
        self.xscroll = x;
        self.yscroll = y;
    }
}

/// Arctangent approximation used in place of the library `atan2` in the
/// conic generator's inner loop. Maximum absolute error 0.0015 radians
/// (0.086 degrees); one divide and three multiplies.
fn fast_atan2(y: f32, x: f32) -> f32 {
    if y == 0.0 {
        return if x < 0.0 { PI } else { 0.0 };
    }
    let xabs = x.abs();
    let yabs = y.abs();
    let z = if xabs < yabs { xabs / yabs } else { yabs / xabs };
    let mut r = z * (PI / 4.0 + (1.0 - z) * (0.2447 + 0.0663 * z));
    if xabs < yabs {
        r = PI / 2.0 - r;
    }
    if x < 0.0 {
        r = PI - r;
    }
    if y < 0.0 {
        -r
    } else {
        r
    }
}

/// Paints colors swept by angle around a center point, from a start
/// angle through a sweep.
pub struct ConicGradient {
    stops: ColorStops,
    x0: f32,
    y0: f32,
    astart: f32,
    tstart: f32,
    tsweep: f32,
    tmult: f32,
    spread: SpreadMethod,
    /// Which pad stop extends outside the sweep: +1 for the end color,
    /// -1 for the start color, 0 for no extension.
    extend: i32,
    vx: f32,
    vy: f32,
    xscroll: i32,
    yscroll: i32,
    degenerate: bool,
}

impl ConicGradient {
    pub fn new(
        x0: f32,
        y0: f32,
        astart: f32,
        asweep: f32,
        spread: SpreadMethod,
        flags: u32,
        xform: Option<&Transform>,
    ) -> ConicGradient {
        let mut grad = ConicGradient {
            stops: ColorStops::new(),
            x0,
            y0,
            astart,
            tstart: 0.0,
            tsweep: 0.0,
            tmult: 0.0,
            spread: normalize_spread(spread),
            extend: 0,
            vx: 0.0,
            vy: 1.0,
            xscroll: 0,
            yscroll: 0,
            degenerate: asweep.abs() < 0.00001,
        };
        if grad.degenerate {
            return grad;
        }

        let mut asweep = asweep;
        if flags & FLAG_EXTEND_END != 0 {
            grad.extend = 1;
        } else if flags & FLAG_EXTEND_START != 0 {
            // Extending the start is the same as extending the end of
            // the reversed sweep.
            grad.extend = -1;
            grad.astart += asweep;
            asweep = -asweep;
        }
        if let Some(xform) = xform {
            grad.apply_transform(&coefficients(xform));
            if grad.degenerate {
                return grad;
            }
        }

        // Normalize: a full turn maps to the unit interval.
        grad.tstart = grad.astart / (2.0 * PI);
        grad.tsweep = asweep / (2.0 * PI);

        let mut n = grad.tstart as i32;
        if grad.tstart < 0.0 {
            n -= 1;
        }
        grad.tstart -= n as f32;

        grad.tsweep = grad.tsweep.max(-1.0).min(1.0);
        grad.tmult = 1.0 / grad.tsweep;
        grad
    }

    /// The conic analogue of the radial transform reduction: the
    /// transformed unit circle is an ellipse, which is reduced back to a
    /// circle plus a scale-and-shear of input coordinates; the rotation
    /// the reduction introduces is folded into the start angle.
    fn apply_transform(&mut self, m: &[f32; 6]) {
        let tmp = m[0] * self.x0 + m[2] * self.y0 + m[4];
        self.y0 = m[1] * self.x0 + m[3] * self.y0 + m[5];
        self.x0 = tmp;
        let mut px = m[0];
        let mut py = m[1];
        let mut qx = m[2];
        let mut qy = m[3];

        let mut ux = 1.0_f32;
        let mut uy = 0.0_f32;
        self.vx = 0.0;
        self.vy = 1.0;

        let b = -2.0 * (px * py + qx * qy);
        if b != 0.0 {
            let a = py * py + qy * qy;
            let c = px * px + qx * qx;
            let beta = (c - a) / b;
            let slope = beta + (beta * beta + 1.0).sqrt();
            let norm = (slope * slope + 1.0).sqrt();
            let cosa = 1.0 / norm;
            let sina = slope / norm;

            let tmp = px * cosa + py * sina;
            py = -px * sina + py * cosa;
            px = tmp;
            let tmp = qx * cosa + qy * sina;
            qy = -qx * sina + qy * cosa;
            qx = tmp;
            let tmp = ux * cosa + uy * sina;
            uy = -ux * sina + uy * cosa;
            ux = tmp;
            let tmp = self.vx * cosa + self.vy * sina;
            self.vy = -self.vx * sina + self.vy * cosa;
            self.vx = tmp;
        }

        let dx = px.abs() + qx.abs();
        if dx < 0.00001 {
            self.degenerate = true;
            return;
        }
        let dy = py.abs() + qy.abs();
        let scale = dy / dx;
        px *= scale;
        ux *= scale;
        self.vx *= scale;

        let scale = 1.0 / (ux * ux + uy * uy).sqrt();
        ux *= scale;
        uy *= scale;
        self.vx *= scale;
        self.vy *= scale;
        px *= scale;
        py *= scale;

        let cosb = ux;
        let sinb = uy;
        let tmp = self.vx * cosb + self.vy * sinb;
        self.vy = -self.vx * sinb + self.vy * cosb;
        self.vx = tmp;
        let tmp = px * cosb + py * sinb;
        py = -px * sinb + py * cosb;
        px = tmp;

        // Compensate the start angle for the rotation the reduction
        // introduced.
        self.astart += py.atan2(px);
    }

    pub fn add_color_stop(&mut self, offset: f32, color: Color) -> bool {
        self.stops.add(offset, color)
    }
}

impl PaintGenerator for ConicGradient {
    fn fill_span(&mut self, xs: i32, ys: i32, span: &mut [Color]) {
        if self.degenerate {
            if self.extend != 0 {
                for pixel in span.iter_mut() {
                    let opacity = *pixel & 255;
                    *pixel = self.stops.pad_color(1, opacity);
                }
            }
            return;
        }

        let mut xp = (xs + self.xscroll) as f32 - self.x0;
        let mut yp = (ys + self.yscroll) as f32 - self.y0;
        xp += self.vx * yp;
        yp *= self.vy;

        for pixel in span.iter_mut() {
            let opacity = *pixel & 255;
            if opacity != 0 {
                // The pixel's angle around the center, normalized so a
                // full turn is 1, measured from the start angle. A
                // negative sweep runs the parameter the other way.
                let phi = fast_atan2(yp, xp);
                let mut t = phi / (2.0 * PI);
                if t < 0.0 {
                    t += 1.0;
                }
                t -= self.tstart;
                if t < 0.0 {
                    t += 1.0;
                } else if t >= 1.0 {
                    t -= 1.0;
                }
                if !(0.0..1.0).contains(&t) {
                    t = 0.0; // absorb tiny precision errors
                }
                if self.tsweep < 0.0 && t > 0.0 {
                    t -= 1.0;
                }

                // Normalize a second time so the swept arc maps to the
                // unit interval, and resolve spread/extension.
                let tfix = (65535.0 * t) as i64;
                let tfix = (tfix as f32 * self.tmult) as i64;
                let n = (tfix >> 16) as i32;

                let mut color = 0;
                if n == 0 || self.extend != 0 {
                    if self.spread == SpreadMethod::Pad && n != 0 {
                        color = self.stops.pad_color(self.extend, opacity);
                    } else {
                        let mut tfix = (tfix & 0xFFFF) as i32;
                        if self.extend < 0 {
                            tfix ^= 0xFFFF;
                        }
                        if self.spread == SpreadMethod::Reflect && (n & 1) != 0 {
                            tfix ^= 0xFFFF;
                        }
                        color = self.stops.color_at(tfix, opacity);
                    }
                }
                *pixel = color;
            }
            xp += 1.0;
        }
    }

    fn set_scroll_position(&mut self, x: i32, y: i32) {
        self.xscroll = x;
        self.yscroll = y;
    }
}
