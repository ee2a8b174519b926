use crate::fixed::{Fixed, FxPoint};
use crate::MAX_SUBDIVISION_LEVELS;

/// A 2d quadratic bézier curve segment in 16.16 fixed-point coordinates,
/// defined by its three control points.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct QuadraticBezierSegment {
    pub from: FxPoint,
    pub ctrl: FxPoint,
    pub to: FxPoint,
}

#[inline]
pub(crate) fn mid(a: FxPoint, b: FxPoint) -> FxPoint {
    FxPoint {
        x: Fixed::from_raw((a.x.raw() + b.x.raw()) / 2),
        y: Fixed::from_raw((a.y.raw() + b.y.raw()) / 2),
    }
}

impl QuadraticBezierSegment {
    /// Whether the curve can be approximated by the chord from `from` to
    /// `to` without exceeding `tolerance`.
    ///
    /// The error metric is `|from - 2*ctrl + to| / 4`, an upper bound on the
    /// distance between the curve and the chord.
    pub fn is_flat(&self, tolerance: Fixed) -> bool {
        let dx = self.from.x - self.ctrl.x - self.ctrl.x + self.to.x;
        let dy = self.from.y - self.ctrl.y - self.ctrl.y + self.to.y;
        let error = Fixed::approx_len(dx, dy) >> 2;
        error <= tolerance
    }

    /// Approximates the curve with a sequence of line segments, invoking
    /// the callback with the end point of each chord. The starting point is
    /// not reported. Subdivision uses de Casteljau's algorithm on an
    /// explicit stack, and gives up refining after 12 levels.
    pub fn for_each_flattened<F: FnMut(FxPoint)>(&self, tolerance: Fixed, callback: &mut F) {
        let mut vstack = [FxPoint::ZERO; 2 * MAX_SUBDIVISION_LEVELS];
        let mut lstack = [0u32; MAX_SUBDIVISION_LEVELS];
        let mut sp = 0;
        let mut level = 0u32;

        let mut v = *self;
        loop {
            while !v.is_flat(tolerance) && (level as usize) < MAX_SUBDIVISION_LEVELS {
                // Subdivide control polygon ABC into ADF and FEC.
                let d = mid(v.from, v.ctrl);
                let e = mid(v.ctrl, v.to);
                let f = mid(d, e);

                level += 1;
                lstack[sp] = level;
                vstack[2 * sp] = v.to; // C
                vstack[2 * sp + 1] = e; // E
                sp += 1;

                v.ctrl = d;
                v.to = f;
            }

            // Represent the flattened curve segment by its chord.
            callback(v.to);

            if sp == 0 {
                break;
            }
            sp -= 1;
            level = lstack[sp];
            v.from = v.to;
            v.ctrl = vstack[2 * sp + 1];
            v.to = vstack[2 * sp];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: i32, y: i32) -> FxPoint {
        FxPoint::from_i32(x, y)
    }

    #[test]
    fn degenerate_curve_is_flat() {
        let c = QuadraticBezierSegment {
            from: pt(5, 5),
            ctrl: pt(5, 5),
            to: pt(5, 5),
        };
        assert!(c.is_flat(Fixed::from_f32(0.2)));
        let mut n = 0;
        c.for_each_flattened(Fixed::from_f32(0.2), &mut |p| {
            assert_eq!(p, pt(5, 5));
            n += 1;
        });
        assert_eq!(n, 1);
    }

    #[test]
    fn flattened_points_stay_near_the_curve() {
        let c = QuadraticBezierSegment {
            from: pt(0, 0),
            ctrl: pt(50, 100),
            to: pt(100, 0),
        };
        let tolerance = Fixed::from_f32(0.5);
        let mut prev = c.from;
        let mut count = 0;
        c.for_each_flattened(tolerance, &mut |p| {
            // Chords must make forward progress in x for this curve.
            assert!(p.x.raw() > prev.x.raw());
            prev = p;
            count += 1;
        });
        assert_eq!(prev, c.to);
        assert!(count > 4, "expected several segments, got {}", count);
    }

    #[test]
    fn tighter_tolerance_generates_more_segments() {
        let c = QuadraticBezierSegment {
            from: pt(0, 0),
            ctrl: pt(80, 120),
            to: pt(160, 0),
        };
        let mut coarse = 0;
        let mut fine = 0;
        c.for_each_flattened(Fixed::from_f32(2.0), &mut |_| coarse += 1);
        c.for_each_flattened(Fixed::from_f32(0.2), &mut |_| fine += 1);
        assert!(fine > coarse);
    }
}
