//! Ellipses, elliptic arcs, elliptic splines and rounded rectangles.

use crate::geom::{fxpoint, ConjugateArc, Fixed, FxPoint, IntPoint, IntRect, FIX_2PI, FIX_PI};
use crate::path::PathBuilder;
use crate::{PathError, PathResult};

impl PathBuilder {
    /// Flattens the arc described by center-relative conjugate diameter
    /// end points `p` and `q` into the current figure. Only interior
    /// points are appended; callers place the exact start and end points.
    fn arc_core(&mut self, center: FxPoint, p: FxPoint, q: FxPoint, sweep: Fixed) {
        let arc = ConjugateArc { center, p, q };
        let tolerance = self.flatness();
        arc.for_each_flattened(sweep, tolerance, &mut |pt| self.push_point(pt));
    }

    /// Appends a (possibly rotated) ellipse as a new closed figure. `v0`
    /// is the center; `v1` and `v2` are the end points of two conjugate
    /// diameters. Any figure under construction is ended first, and on
    /// return the current point is undefined.
    pub fn ellipse(&mut self, v0: IntPoint, v1: IntPoint, v2: IntPoint) {
        let center = self.to_fx(v0);
        let start = self.to_fx(v1);
        let p = start - center;
        let q = self.to_fx(v2) - center;

        self.end_figure();
        self.push_point(start);
        self.arc_core(center, p, q, FIX_2PI);
        self.close_figure();
    }

    /// Appends an elliptic arc. `v0` is the ellipse center, `v1` and `v2`
    /// the conjugate diameter end points. `start` is the starting angle
    /// relative to `v1` and `sweep` the swept angle, both in radians of
    /// ellipse parameter, positive in the direction of `v2`. If the
    /// current figure is empty the arc starts a new one; otherwise a line
    /// segment connects the current point to the arc's starting point.
    pub fn elliptic_arc(
        &mut self,
        v0: IntPoint,
        v1: IntPoint,
        v2: IntPoint,
        start: f32,
        sweep: f32,
    ) {
        let center = self.to_fx(v0);
        let mut p = self.to_fx(v1) - center;
        let mut q = self.to_fx(v2) - center;

        if start != 0.0 {
            // Rotate the conjugate diameter end points by the start angle.
            let (sina, cosa) = start.sin_cos();
            let x = Fixed::from_raw((p.x.raw() as f32 * cosa + q.x.raw() as f32 * sina) as i32);
            let y = Fixed::from_raw((p.y.raw() as f32 * cosa + q.y.raw() as f32 * sina) as i32);
            q.x = Fixed::from_raw((q.x.raw() as f32 * cosa - p.x.raw() as f32 * sina) as i32);
            q.y = Fixed::from_raw((q.y.raw() as f32 * cosa - p.y.raw() as f32 * sina) as i32);
            p = fxpoint(x, y);
        }

        // A negative sweep is a positive sweep away from Q.
        let mut sweep = sweep;
        if sweep < 0.0 {
            q = -q;
            sweep = -sweep;
        }
        let swangle = Fixed::from_f32(sweep);

        self.push_point(center + p);
        self.arc_core(center, p, q, swangle);

        // Append the exact arc end point.
        let (sinb, cosb) = sweep.sin_cos();
        let xe = Fixed::from_raw((p.x.raw() as f32 * cosb + q.x.raw() as f32 * sinb) as i32);
        let ye = Fixed::from_raw((p.y.raw() as f32 * cosb + q.y.raw() as f32 * sinb) as i32);
        self.push_point(center + fxpoint(xe, ye));
    }

    /// Appends a quarter-ellipse spline to the current figure. The spline
    /// runs from the current point to `v2` and is tangent to the control
    /// polygon sides at both ends; `v1` is the control point. On return
    /// `v2` is the current point.
    pub fn elliptic_spline(&mut self, v1: IntPoint, v2: IntPoint) -> PathResult {
        let start = match self.current_fx() {
            Some(p) => p,
            None => {
                return Err(PathError::NoCurrentPoint);
            }
        };
        let end = self.to_fx(v2);
        let ctrl = self.to_fx(v1);
        // The implied parallelogram's far corner mirrors the control
        // point through the chord: its center is start + end - ctrl.
        let center = start + end - ctrl;

        self.arc_core(center, start - center, end - center, Fixed::from_raw(FIX_PI.raw() / 2));
        self.push_point(end);
        Ok(())
    }

    /// Appends a series of elliptic splines, two points from `points` per
    /// spline (control point, then end point).
    pub fn poly_elliptic_spline(&mut self, points: &[IntPoint]) -> PathResult {
        if self.current_fx().is_none() {
            return Err(PathError::NoCurrentPoint);
        }
        for pair in points.chunks_exact(2) {
            self.elliptic_spline(pair[0], pair[1])?;
        }
        Ok(())
    }

    /// Appends a rectangle with rounded corners as a new closed figure,
    /// wound clockwise. `round` gives the x and y displacements of the
    /// arc end points from each corner. The top-left corner arc is
    /// constructed once and reflected to the other three corners.
    pub fn rounded_rectangle(&mut self, rect: &IntRect, round: IntPoint) {
        if round.x == 0 || round.y == 0 {
            self.rectangle(rect);
            return;
        }

        let min = self.to_fx(IntPoint {
            x: rect.x,
            y: rect.y,
        });
        let max = self.to_fx(IntPoint {
            x: rect.x + rect.w,
            y: rect.y + rect.h,
        });
        let round = self.to_fx(round);

        // Top-left rounded corner.
        let center = fxpoint(min.x + round.x, min.y + round.y);
        let p = fxpoint(-round.x, Fixed::ZERO);
        let q = fxpoint(Fixed::ZERO, -round.y);

        self.end_figure();
        self.push_point(fxpoint(min.x, min.y + round.y));
        self.arc_core(center, p, q, Fixed::from_raw(FIX_PI.raw() / 2));
        self.push_point(center + q);

        // Reflect the top-left corner onto the other three.
        let first = self.first_point_index();
        let mut last = self.current_point_index();
        let count = last - first + 1;
        for _ in 0..count {
            let pt = self.point_at(last);
            self.push_point(fxpoint(min.x + max.x - pt.x, pt.y));
            last -= 1;
        }
        let mut last = self.current_point_index();
        for _ in 0..2 * count {
            let pt = self.point_at(last);
            self.push_point(fxpoint(pt.x, min.y + max.y - pt.y));
            last -= 1;
        }
        self.close_figure();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::int_point;

    #[test]
    fn ellipse_is_a_closed_figure() {
        let mut path = PathBuilder::new();
        path.ellipse(int_point(100, 100), int_point(150, 100), int_point(100, 140));
        assert!(path.current_point().is_none());
        path.end_figure();
        let fig = path.figures().next().unwrap();
        assert!(fig.closed);
        // Every point lies on the axis-aligned ellipse, within tolerance.
        for p in fig.points() {
            let dx = (p.x.to_f32() - 100.0) / 50.0;
            let dy = (p.y.to_f32() - 100.0) / 40.0;
            let r = (dx * dx + dy * dy).sqrt();
            assert!((r - 1.0).abs() < 0.05, "point off ellipse: r = {}", r);
        }
    }

    #[test]
    fn arc_connects_from_current_point() {
        let mut path = PathBuilder::new();
        path.move_to(0, 0);
        path.elliptic_arc(
            int_point(100, 100),
            int_point(150, 100),
            int_point(100, 150),
            0.0,
            std::f32::consts::FRAC_PI_2,
        );
        // The arc starts at v1 and ends (exactly) at v2.
        assert_eq!(path.current_point(), Some(int_point(100, 150)));
        path.end_figure();
        let fig = path.figures().next().unwrap();
        assert_eq!(fig.point(0), FxPoint::from_i32(0, 0));
        assert_eq!(fig.point(1), FxPoint::from_i32(150, 100));
    }

    #[test]
    fn negative_sweep_mirrors_the_arc() {
        let mut path = PathBuilder::new();
        path.elliptic_arc(
            int_point(0, 0),
            int_point(100, 0),
            int_point(0, 100),
            0.0,
            -std::f32::consts::FRAC_PI_2,
        );
        // Sweeping away from Q lands on -Q.
        let end = path.current_point().unwrap();
        assert_eq!(end, int_point(0, -100));
    }

    #[test]
    fn spline_traces_a_quarter_ellipse() {
        let mut path = PathBuilder::new();
        path.move_to(0, 100);
        path.elliptic_spline(int_point(0, 0), int_point(100, 0)).unwrap();
        assert_eq!(path.current_point(), Some(int_point(100, 0)));
        path.end_figure();
        let fig = path.figures().next().unwrap();
        // Implied center is at start + end - ctrl = (100, 100): points lie
        // on the circle of radius 100 around it.
        for p in fig.points() {
            let dx = p.x.to_f32() - 100.0;
            let dy = p.y.to_f32() - 100.0;
            let r = (dx * dx + dy * dy).sqrt();
            assert!((r - 100.0).abs() < 2.0, "r = {}", r);
        }
    }

    #[test]
    fn rounded_rectangle_has_fourfold_symmetry() {
        let mut path = PathBuilder::new();
        path.rounded_rectangle(&IntRect::new(10, 10, 100, 60), int_point(8, 8));
        path.end_figure();
        let fig = path.figures().next().unwrap();
        assert!(fig.closed);
        let pts: Vec<FxPoint> = fig.points().collect();
        // All points stay inside the rectangle.
        for p in &pts {
            assert!(p.x.to_f32() >= 10.0 - 0.01 && p.x.to_f32() <= 110.0 + 0.01);
            assert!(p.y.to_f32() >= 10.0 - 0.01 && p.y.to_f32() <= 70.0 + 0.01);
        }
        // And the four corner arcs contribute the same number of points.
        assert_eq!(pts.len() % 4, 1, "closed figure repeats its first point");
    }

    #[test]
    fn zero_rounding_degenerates_to_rectangle() {
        let mut path = PathBuilder::new();
        path.rounded_rectangle(&IntRect::new(0, 0, 10, 10), int_point(0, 4));
        path.end_figure();
        let fig = path.figures().next().unwrap();
        assert_eq!(fig.len(), 5);
    }
}
