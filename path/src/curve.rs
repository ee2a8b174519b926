//! Bézier spline construction calls, quadratic and cubic.

use crate::geom::{CubicBezierSegment, IntPoint, QuadraticBezierSegment};
use crate::path::PathBuilder;
use crate::{PathError, PathResult};

impl PathBuilder {
    /// Appends a quadratic bézier curve to the current figure. The current
    /// point is the first point of the 3-point control polygon; `v1` and
    /// `v2` supply the other two. The curve is flattened on the spot to
    /// the current flatness tolerance, and `v2` becomes the new current
    /// point.
    pub fn bezier2(&mut self, v1: IntPoint, v2: IntPoint) -> PathResult {
        let from = match self.current_fx() {
            Some(p) => p,
            None => {
                return Err(PathError::NoCurrentPoint);
            }
        };
        let segment = QuadraticBezierSegment {
            from,
            ctrl: self.to_fx(v1),
            to: self.to_fx(v2),
        };
        let tolerance = self.flatness();
        segment.for_each_flattened(tolerance, &mut |p| self.push_point(p));
        Ok(())
    }

    /// Appends a series of connected quadratic bézier curves. Each curve
    /// consumes two points from `points`; the previous curve's end point
    /// is the next curve's starting point.
    pub fn poly_bezier2(&mut self, points: &[IntPoint]) -> PathResult {
        if self.current_fx().is_none() {
            return Err(PathError::NoCurrentPoint);
        }
        for pair in points.chunks_exact(2) {
            self.bezier2(pair[0], pair[1])?;
        }
        Ok(())
    }

    /// Appends a cubic bézier curve to the current figure. The current
    /// point is the first point of the 4-point control polygon; `v1`,
    /// `v2` and `v3` supply the other three. The curve is flattened on
    /// the spot, and `v3` becomes the new current point.
    pub fn bezier3(&mut self, v1: IntPoint, v2: IntPoint, v3: IntPoint) -> PathResult {
        let from = match self.current_fx() {
            Some(p) => p,
            None => {
                return Err(PathError::NoCurrentPoint);
            }
        };
        let segment = CubicBezierSegment {
            from,
            ctrl1: self.to_fx(v1),
            ctrl2: self.to_fx(v2),
            to: self.to_fx(v3),
        };
        let tolerance = self.flatness();
        segment.for_each_flattened(tolerance, &mut |p| self.push_point(p));
        Ok(())
    }

    /// Appends a series of connected cubic bézier curves, three points
    /// from `points` per curve.
    pub fn poly_bezier3(&mut self, points: &[IntPoint]) -> PathResult {
        if self.current_fx().is_none() {
            return Err(PathError::NoCurrentPoint);
        }
        for triple in points.chunks_exact(3) {
            self.bezier3(triple[0], triple[1], triple[2])?;
        }
        Ok(())
    }
}
