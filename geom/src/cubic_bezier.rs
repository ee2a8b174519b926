use crate::fixed::{Fixed, FxPoint};
use crate::quadratic_bezier::mid;
use crate::MAX_SUBDIVISION_LEVELS;

/// A 2d cubic bézier curve segment in 16.16 fixed-point coordinates,
/// defined by its four control points.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CubicBezierSegment {
    pub from: FxPoint,
    pub ctrl1: FxPoint,
    pub ctrl2: FxPoint,
    pub to: FxPoint,
}

impl CubicBezierSegment {
    /// Whether the curve can be approximated by the chord from `from` to
    /// `to` without exceeding `tolerance`.
    ///
    /// With `u = 2(ctrl1 - from) + (ctrl1 - to)` and
    /// `v = 2(ctrl2 - to) + (ctrl2 - from)`, the error metric is
    /// `max(|u|, |v|) / 4`. This is the fixed-point form of Willcocks'
    /// flatness criterion.
    pub fn is_flat(&self, tolerance: Fixed) -> bool {
        let ux = Fixed::from_raw(
            2 * (self.ctrl1.x.raw() - self.from.x.raw()) + self.ctrl1.x.raw() - self.to.x.raw(),
        );
        let uy = Fixed::from_raw(
            2 * (self.ctrl1.y.raw() - self.from.y.raw()) + self.ctrl1.y.raw() - self.to.y.raw(),
        );
        let vx = Fixed::from_raw(
            2 * (self.ctrl2.x.raw() - self.to.x.raw()) + self.ctrl2.x.raw() - self.from.x.raw(),
        );
        let vy = Fixed::from_raw(
            2 * (self.ctrl2.y.raw() - self.to.y.raw()) + self.ctrl2.y.raw() - self.from.y.raw(),
        );
        let uerr = Fixed::approx_len(ux, uy);
        let verr = Fixed::approx_len(vx, vy);
        let error = uerr.max(verr) >> 2;
        error <= tolerance
    }

    /// Approximates the curve with a sequence of line segments, invoking
    /// the callback with the end point of each chord. The starting point is
    /// not reported. Subdivision uses de Casteljau's algorithm on an
    /// explicit stack, and gives up refining after 12 levels.
    pub fn for_each_flattened<F: FnMut(FxPoint)>(&self, tolerance: Fixed, callback: &mut F) {
        let mut vstack = [FxPoint::ZERO; 3 * MAX_SUBDIVISION_LEVELS];
        let mut lstack = [0u32; MAX_SUBDIVISION_LEVELS];
        let mut sp = 0;
        let mut level = 0u32;

        let mut v = *self;
        loop {
            while !v.is_flat(tolerance) && (level as usize) < MAX_SUBDIVISION_LEVELS {
                // Subdivide control polygon ABCD into AEHJ and JIGD.
                let e = mid(v.from, v.ctrl1);
                let f = mid(v.ctrl1, v.ctrl2);
                let g = mid(v.ctrl2, v.to);
                let h = mid(e, f);
                let i = mid(f, g);
                let j = mid(h, i);

                level += 1;
                lstack[sp] = level;
                vstack[3 * sp] = v.to; // D
                vstack[3 * sp + 1] = g; // G
                vstack[3 * sp + 2] = i; // I
                sp += 1;

                v.ctrl1 = e;
                v.ctrl2 = h;
                v.to = j;
            }

            // Represent the flattened curve segment by its chord.
            callback(v.to);

            if sp == 0 {
                break;
            }
            sp -= 1;
            level = lstack[sp];
            v.from = v.to;
            v.ctrl1 = vstack[3 * sp + 2];
            v.ctrl2 = vstack[3 * sp + 1];
            v.to = vstack[3 * sp];
        }
    }
}
