//! Elliptic arcs described by conjugate diameters, flattened with a
//! coupled-rotation generator.
//!
//! An origin-centered ellipse is fully described by the end points P and Q
//! of any pair of its conjugate diameters; the parameterization is
//! `C + P*cos(t) + Q*sin(t)`. Rotating the pair `(Q, P)` in small angular
//! steps therefore walks along the ellipse. The rotation used here is
//! Minsky's shift-only recurrence `u -= v >> k; v += u >> k`, which is
//! cheap, stable, and — once the starting vector is preconditioned to
//! cancel the low-order drift — an exact sine-wave generator.

use crate::fixed::{Fixed, FxPoint};

/// Largest k for the angular increment 1/2^k.
const KMAX: u32 = 6;

/// An elliptic arc in 16.16 fixed-point coordinates: the ellipse center
/// plus the center-relative end points of a pair of conjugate diameters.
/// The arc starts at `center + p`; a positive sweep runs from P toward Q.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ConjugateArc {
    pub center: FxPoint,
    pub p: FxPoint,
    pub q: FxPoint,
}

/// Approximate radius of the major auxiliary circle of the ellipse with
/// conjugate diameter end points `p` and `q` (half the major axis). The
/// error falls within -1.3% to +8.4%, which errs on the safe side for the
/// flatness bound.
fn aux_radius(p: FxPoint, q: FxPoint) -> Fixed {
    let dp = p.approx_len();
    let dq = q.approx_len();
    let da = (p + q).approx_len();
    let db = (p - q).approx_len();
    let r1 = dp.max(dq);
    let r2 = da.max(db);
    Fixed::from_raw((r1.raw() + r1.raw() / 16).max(r2.raw() - r2.raw() / 4))
}

/// One step of the coupled rotation: turns (u,v) around the origin by
/// approximately 1/2^k radians.
#[inline]
fn rotate_step(u: &mut Fixed, v: &mut Fixed, k: u32) {
    *u -= *v >> k;
    *v += *u >> k;
}

/// Returns the value to substitute for u0 so that the generator's v
/// coordinates trace a precise sine wave instead of accumulating
/// low-order error.
#[inline]
fn initial_value(u0: Fixed, v0: Fixed, k: u32) -> Fixed {
    let shift = 2 * k + 3;
    let mut w = u0 >> shift;
    let mut u = u0 - w + (v0 >> (k + 1));
    w = w >> (shift + 1);
    u -= w;
    w = w >> shift;
    u -= w;
    u
}

impl ConjugateArc {
    /// Selects the exponent k of the angular increment 1/2^k between
    /// generated points, the largest step whose 2nd- plus 4th-order error
    /// terms stay within the tolerance.
    fn angular_inc(&self, tolerance: Fixed) -> u32 {
        let r = aux_radius(self.p, self.q);
        let mut err2 = r >> 3;
        let mut err4 = r >> 7;
        for k in 0..KMAX {
            if tolerance >= err2 + err4 {
                return k;
            }
            err2 = err2 >> 2;
            err4 = err4 >> 4;
        }
        KMAX
    }

    /// Generates the interior points of the arc, in order, at an angular
    /// step fine enough to keep the chord error within `tolerance`.
    ///
    /// `sweep` is the swept angle in 16.16 radians of ellipse parameter and
    /// must be non-negative. Neither the exact starting point `center + p`
    /// nor the exact arc end point is reported; callers place those
    /// themselves.
    pub fn for_each_flattened<F: FnMut(FxPoint)>(
        &self,
        sweep: Fixed,
        tolerance: Fixed,
        callback: &mut F,
    ) {
        let k = self.angular_inc(tolerance);
        let count = sweep.raw() >> (16 - k);

        let mut xp = self.p.x;
        let mut yp = self.p.y;
        let mut xq = initial_value(self.q.x, xp, k);
        let mut yq = initial_value(self.q.y, yp, k);
        for _ in 0..count {
            rotate_step(&mut xq, &mut xp, k);
            rotate_step(&mut yq, &mut yp, k);
            callback(FxPoint {
                x: self.center.x + xp,
                y: self.center.y + yp,
            });
        }
    }
}
