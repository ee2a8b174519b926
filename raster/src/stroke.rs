//! Stroke expansion: converts stroked paths into filled outlines.
//!
//! Each stroked figure is walked segment by segment. The sides of every
//! segment are offset by half the line width, joins connect adjoining
//! segments, open ends are capped, and all of the resulting boundary
//! segments are attached to the edge manager as a winding-rule outline.

use arrayvec::ArrayVec;

use crate::edge::EdgeManager;
use crate::geom::math::{vector, Vector};
use crate::geom::{fxpoint, ConjugateArc, Fixed, FxPoint, FIX_PI};
use crate::path::{FigureView, LineCap, LineJoin, FLATNESS_DEFAULT};
use crate::{DASH_ARRAY_MAX_LEN, LINE_WIDTH_DEFAULT, MITER_LIMIT_DEFAULT, MITER_LIMIT_MINIMUM};

/// Parameters for stroking a path.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct StrokeStyle {
    /// Line width in pixels. A width of zero selects the thin-line mode,
    /// which draws one-pixel-wide lines and ignores caps, joins and
    /// dashes.
    ///
    /// Default value: `LINE_WIDTH_DEFAULT`.
    pub line_width: f32,

    /// What cap to use at the ends of open figures and dashes.
    ///
    /// Default value: `LineCap::Butt`.
    pub line_cap: LineCap,

    /// How to join adjoining segments.
    ///
    /// Default value: `LineJoin::Bevel`.
    pub line_join: LineJoin,

    /// Maximum miter length in units of half the line width. Values
    /// below 1.0 are treated as 1.0.
    ///
    /// Default value: `MITER_LIMIT_DEFAULT`.
    pub miter_limit: f32,

    /// Dash and gap lengths in 16.16 pixels. Empty for a solid line.
    dash_array: ArrayVec<i32, DASH_ARRAY_MAX_LEN>,
    /// Starting offset into the dash pattern, 16.16 pixels.
    dash_offset: i32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        StrokeStyle {
            line_width: LINE_WIDTH_DEFAULT,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Bevel,
            miter_limit: MITER_LIMIT_DEFAULT,
            dash_array: ArrayVec::new(),
            dash_offset: 0,
        }
    }
}

impl StrokeStyle {
    pub fn new() -> Self {
        StrokeStyle::default()
    }

    #[inline]
    pub fn with_line_width(mut self, width: f32) -> Self {
        debug_assert!(width >= 0.0);
        self.line_width = width.max(0.0);
        self
    }

    #[inline]
    pub fn with_line_cap(mut self, cap: LineCap) -> Self {
        self.line_cap = cap;
        self
    }

    #[inline]
    pub fn with_line_join(mut self, join: LineJoin) -> Self {
        self.line_join = join;
        self
    }

    #[inline]
    pub fn with_miter_limit(mut self, limit: f32) -> Self {
        self.miter_limit = limit.max(MITER_LIMIT_MINIMUM);
        self
    }

    /// Sets the dash pattern. The bytes of `dash` alternately give dash
    /// and gap lengths, each multiplied by `mult` to yield pixels; a zero
    /// byte terminates the pattern early. `offset` is the starting
    /// distance into the pattern, in the same units as the bytes. At most
    /// 32 entries are kept. Passing an empty pattern restores a solid
    /// line. Returns false (leaving a truncated pattern in place) if an
    /// entry scales to 16384 pixels or more, or if `offset` or `mult` is
    /// out of range.
    pub fn set_dash(&mut self, dash: &[u8], offset: i32, mult: f32) -> bool {
        self.dash_array.clear();
        self.dash_offset = 0;
        if dash.is_empty() || dash[0] == 0 {
            return true; // solid line
        }
        if offset < 0 || mult <= 0.0 {
            return false;
        }
        const TOO_LONG: f32 = 16384.0;
        for &byte in dash.iter().take(DASH_ARRAY_MAX_LEN) {
            if byte == 0 {
                break;
            }
            let len = mult * byte as f32;
            if len >= TOO_LONG {
                return false; // excessively long dash
            }
            self.dash_array.push((65536.0 * len) as i32);
        }
        self.dash_offset = (65536.0 * mult * offset as f32) as i32;
        true
    }

    /// Convenience builder form of [`set_dash`](Self::set_dash).
    pub fn with_dash(mut self, dash: &[u8], offset: i32, mult: f32) -> Self {
        self.set_dash(dash, offset, mult);
        self
    }

    #[inline]
    pub fn is_dashed(&self) -> bool {
        !self.dash_array.is_empty()
    }
}

/// Position within the dash pattern while walking a figure.
struct DashState {
    /// Index of the element after the one currently being consumed.
    next: usize,
    /// Length remaining in the current dash or gap.
    len: Fixed,
    /// Whether the current element is a dash (true) or a gap (false).
    on: bool,
    /// Whether a dash pattern is installed at all.
    active: bool,
}

/// Returns the angle in 16.16 radians between two unit vectors. Precision
/// errors can push the dot product slightly past +-1; those cases read as
/// pi.
fn get_angle(u: Vector, v: Vector) -> Fixed {
    let cosine = u.dot(v);
    if cosine.abs() > 1.0 {
        return FIX_PI;
    }
    Fixed::from_f32(cosine.acos())
}

pub(crate) struct Stroker<'a> {
    edges: &'a mut EdgeManager,
    /// Line width in 16.16 pixels.
    width: Fixed,
    cap: LineCap,
    join: LineJoin,
    miter_limit: f32,
    /// Precomputed sqrt(miter_limit^2 - 1) for the miter-length test.
    miter_check: f32,
    /// Dot-product threshold below which a join's true shape differs
    /// from a plain bevel by less than half a pixel.
    join_hint: i64,
    flatness: Fixed,
    dash_array: &'a [i32],
    dash_offset: i32,
    dash: DashState,
    /// Start and end points of the stroked edges of the incoming segment.
    vin: FxPoint,
    vout: FxPoint,
    /// Angle for the next round join, 16.16 radians.
    angle: Fixed,
    arc_scratch: Vec<FxPoint>,
}

impl<'a> Stroker<'a> {
    pub fn new(edges: &'a mut EdgeManager, style: &'a StrokeStyle, flatness: Fixed) -> Self {
        let width = style.line_width;
        debug_assert!(width > 0.0, "thin strokes take the width-zero path");
        let miter_limit = style.miter_limit.max(MITER_LIMIT_MINIMUM);

        // When two short segments along a flattened curve meet at a
        // shallow angle, a round or miter join is indistinguishable from
        // a bevel. The threshold below accepts the bevel shortcut when
        // (1) the geometric error stays under half a pixel and (2) the
        // segment directions diverge by less than 60 degrees.
        let cos30 = 0.866_025_4_f32;
        let cos60 = 0.5_f32;
        let limit = 0.5 * (1.0 - cos30 * cos30) / cos30;
        let ratio = FLATNESS_DEFAULT / width;
        let cosaa = if ratio < limit {
            let cosa = (1.0 + ratio * ratio).sqrt() - ratio;
            (2.0 * cosa.acos()).cos()
        } else {
            cos60
        };
        let join_hint = (16384.0 * width * width * cosaa) as i64;

        Stroker {
            edges,
            width: Fixed::from_f32(width),
            cap: style.line_cap,
            join: style.line_join,
            miter_limit,
            miter_check: (miter_limit * miter_limit - 1.0).sqrt(),
            join_hint,
            flatness,
            dash_array: style.dash_array.as_slice(),
            dash_offset: style.dash_offset,
            dash: DashState {
                next: 0,
                len: Fixed::ZERO,
                on: true,
                active: false,
            },
            vin: FxPoint::ZERO,
            vout: FxPoint::ZERO,
            angle: Fixed::ZERO,
            arc_scratch: Vec::new(),
        }
    }

    /// Rewinds the dash pattern to its starting offset. Returns whether
    /// the figure starts on a dash.
    fn init_line_dash(&mut self) -> bool {
        self.dash.on = true;
        self.dash.active = !self.dash_array.is_empty();
        if self.dash.active {
            let mut offset = self.dash_offset;
            let mut index = 0;
            while offset > self.dash_array[index] {
                offset -= self.dash_array[index];
                index += 1;
                self.dash.on = !self.dash.on;
                if index == self.dash_array.len() {
                    index = 0;
                }
            }
            self.dash.len = Fixed::from_raw(self.dash_array[index] - offset);
            self.dash.next = index + 1;
        }
        self.dash.on
    }

    /// Advances to the next dash or gap, wrapping around the pattern.
    fn next_dash(&mut self) {
        if self.dash.next == self.dash_array.len() {
            self.dash.next = 0;
        }
        self.dash.len = Fixed::from_raw(self.dash_array[self.dash.next]);
        self.dash.next += 1;
        self.dash.on = !self.dash.on;
    }

    /// Length, unit direction and half-width direction vector of the
    /// segment from `vs` to `ve`. Everything is zero for a zero-length
    /// segment.
    fn line_length(&self, vs: FxPoint, ve: FxPoint) -> (Fixed, Vector, FxPoint) {
        let dx = (ve.x.raw() - vs.x.raw()) as f32;
        let dy = (ve.y.raw() - vs.y.raw()) as f32;
        let len = (dx * dx + dy * dy).sqrt();
        if len == 0.0 {
            return (Fixed::ZERO, vector(0.0, 0.0), FxPoint::ZERO);
        }
        let u = vector(dx / len, dy / len);
        let half = (self.width.raw() / 2) as f32;
        let a = fxpoint(
            Fixed::from_raw((u.x * half) as i32),
            Fixed::from_raw((u.y * half) as i32),
        );
        (Fixed::from_raw(len as i32), u, a)
    }

    /// Adds a round join between direction vectors `a1` and `a2` at
    /// vertex `v0`, or a round cap when they point in opposite
    /// directions. `self.angle` must hold the angle swept by the arc.
    fn round_join(&mut self, v0: FxPoint, a1: FxPoint, a2: FxPoint) {
        let v1 = a1.perp();
        let v2 = a2.perp();

        let arc = ConjugateArc {
            center: v0,
            p: v1,
            q: a1,
        };
        self.arc_scratch.clear();
        self.arc_scratch.push(v0 + v1);
        let pts = &mut self.arc_scratch;
        arc.for_each_flattened(self.angle, self.flatness, &mut |p| pts.push(p));
        self.arc_scratch.push(v0 + v2);

        for i in 1..self.arc_scratch.len() {
            self.edges
                .attach_edge(self.arc_scratch[i - 1], self.arc_scratch[i]);
        }
    }

    /// Constructs the transitions between dashes and gaps that fall
    /// within one line segment; the portion after the last transition is
    /// finished by the next `join_lines` call. `ve` is the end of the
    /// segment, `u` its unit direction, `a` the half-width vector, and
    /// `linelen` its length.
    fn dashed_line(&mut self, ve: FxPoint, u: Vector, a: FxPoint, linelen: Fixed) {
        debug_assert!(self.dash.active);
        let mut linelen = linelen;
        while self.dash.len <= linelen {
            linelen -= self.dash.len;
            let mut dx = (linelen.raw() as f32 * u.x) as i32;
            let mut dy = (linelen.raw() as f32 * u.y) as i32;
            if self.dash.on {
                // Close off a dash of the full line width.
                if self.cap == LineCap::Square {
                    dx -= a.x.raw();
                    dy -= a.y.raw();
                }
                let vs = fxpoint(
                    Fixed::from_raw(ve.x.raw() - dx),
                    Fixed::from_raw(ve.y.raw() - dy),
                );
                let v1 = vs + a.perp();
                let v2 = vs - a.perp();
                self.edges.attach_edge(self.vin, v1);
                self.edges.attach_edge(v2, self.vout);

                if self.cap == LineCap::Round {
                    self.angle = FIX_PI;
                    self.round_join(vs, a, -a);
                } else {
                    self.edges.attach_edge(v1, v2); // butt or square cap
                }
            } else {
                // Skip the gap; remember where the next dash starts.
                if self.cap == LineCap::Square {
                    dx += a.x.raw();
                    dy += a.y.raw();
                }
                let vs = fxpoint(
                    Fixed::from_raw(ve.x.raw() - dx),
                    Fixed::from_raw(ve.y.raw() - dy),
                );
                self.vin = vs + a.perp();
                self.vout = vs - a.perp();

                if self.cap == LineCap::Round {
                    self.angle = FIX_PI;
                    self.round_join(vs, -a, a);
                } else {
                    self.edges.attach_edge(self.vout, self.vin);
                }
            }
            self.next_dash();
        }

        self.dash.len -= linelen;
        if self.dash.len.is_zero() {
            self.next_dash();
        }
    }

    /// Joins the incoming segment (direction `ain`) to the outgoing one
    /// (direction `aout`) at vertex `v0`. Both vectors have length equal
    /// to half the line width.
    fn join_lines(&mut self, v0: FxPoint, ain: FxPoint, aout: FxPoint) {
        let dotprod = (ain.x.raw() as i64 * aout.x.raw() as i64
            + ain.y.raw() as i64 * aout.y.raw() as i64)
            >> 16;

        // Normals from v0 to the stroked edges of the incoming (v1, v2)
        // and outgoing (v3, v4) segments.
        let mut v1 = v0 + ain.perp();
        let mut v2 = v0 - ain.perp();
        let mut v3 = v0 + aout.perp();
        let mut v4 = v0 - aout.perp();

        // Shallow turn between short segments: substitute a bevel for
        // whatever join style was requested.
        if dotprod > self.join_hint {
            self.edges.attach_edge(self.vin, v1);
            self.edges.attach_edge(v2, self.vout);
            self.edges.attach_edge(v1, v3);
            self.edges.attach_edge(v4, v2);
            self.vin = v3;
            self.vout = v4;
            return;
        }

        // Connect the edges on the inside of the turn through v0 itself,
        // which keeps a wide dashed line looking right when a join abuts
        // a dash-gap transition.
        let xprod = (ain.x.raw() as i64 * aout.y.raw() as i64
            - ain.y.raw() as i64 * aout.x.raw() as i64)
            >> 16;
        if xprod < 0 {
            // Stroke turns left (counterclockwise) at the join.
            self.edges.attach_edge(v1, v0);
            self.edges.attach_edge(v0, v3);
        } else {
            self.edges.attach_edge(v4, v0);
            self.edges.attach_edge(v0, v2);
        }

        if self.join == LineJoin::Bevel || self.join == LineJoin::Round {
            self.edges.attach_edge(self.vin, v1);
            self.edges.attach_edge(v2, self.vout);

            if xprod < 0 {
                if self.join == LineJoin::Round {
                    self.round_join(v0, -aout, -ain);
                } else {
                    self.edges.attach_edge(v4, v2);
                }
            } else if self.join == LineJoin::Round {
                self.round_join(v0, ain, aout);
            } else {
                self.edges.attach_edge(v1, v3);
            }
            self.vin = v3;
            self.vout = v4;
            return;
        }

        // Mitered join. Compare the miter length against the limit; if
        // the denominator is tiny, treat the limit as exceeded.
        let denom = ((ain.x.raw() + aout.x.raw()).abs() + (ain.y.raw() + aout.y.raw()).abs()) as f32;
        if denom.abs() > 0.00025 {
            let numer =
                ((ain.x.raw() - aout.x.raw()).abs() + (ain.y.raw() - aout.y.raw()).abs()) as f32;
            let t = numer / denom;
            if t <= self.miter_check {
                // Within the limit: draw the full miter.
                let dx = (t * (ain.x.raw() - aout.x.raw()) as f32) as i32;
                let dy = (t * (ain.y.raw() - aout.y.raw()) as f32) as i32;

                if xprod < 0 {
                    v4 = fxpoint(
                        Fixed::from_raw((v2.x.raw() + v4.x.raw() + dx) / 2),
                        Fixed::from_raw((v2.y.raw() + v4.y.raw() + dy) / 2),
                    );
                    self.edges.attach_edge(self.vin, v1);
                    self.edges.attach_edge(v4, self.vout);
                } else {
                    v3 = fxpoint(
                        Fixed::from_raw((v1.x.raw() + v3.x.raw() + dx) / 2),
                        Fixed::from_raw((v1.y.raw() + v3.y.raw() + dy) / 2),
                    );
                    self.edges.attach_edge(self.vin, v3);
                    self.edges.attach_edge(v2, self.vout);
                }
                self.vin = v3;
                self.vout = v4;
                return;
            }
        }

        if self.join == LineJoin::Miter {
            // SVG behavior: past the limit the join falls back to a bevel.
            self.edges.attach_edge(self.vin, v1);
            self.edges.attach_edge(v2, self.vout);
            if xprod < 0 {
                self.edges.attach_edge(v4, v2);
            } else {
                self.edges.attach_edge(v1, v3);
            }
            self.vin = v3;
            self.vout = v4;
            return;
        }

        // MiterClip: snip the spike at exactly the miter limit. Vector vm
        // points from v0 toward the miter point.
        let vm = if dotprod < 0 {
            // The segments form an acute angle at the join.
            fxpoint(ain.x - aout.x, ain.y - aout.y)
        } else if xprod < 0 {
            fxpoint(-ain.y - aout.y, ain.x + aout.x)
        } else {
            fxpoint(ain.y + aout.y, -ain.x - aout.x)
        };

        // Scale vm to the miter-limited length.
        let (_, _, mut am) = self.line_length(FxPoint::ZERO, vm);
        am = fxpoint(
            Fixed::from_raw((am.x.raw() as f32 * self.miter_limit) as i32),
            Fixed::from_raw((am.y.raw() as f32 * self.miter_limit) as i32),
        );

        // Extend the outer edges to the clipped miter.
        let denom = ((ain.x.raw() - aout.x.raw()).abs() + (ain.y.raw() - aout.y.raw()).abs()) as f32;
        if xprod < 0 {
            if denom.abs() > 0.00025 {
                let numer = ((2 * am.x.raw() + ain.y.raw() + aout.y.raw()).abs()
                    + (2 * am.y.raw() - ain.x.raw() - aout.x.raw()).abs())
                    as f32;
                let t = numer / denom;
                v2 = fxpoint(
                    Fixed::from_raw(v2.x.raw() + (t * ain.x.raw() as f32) as i32),
                    Fixed::from_raw(v2.y.raw() + (t * ain.y.raw() as f32) as i32),
                );
                v4 = fxpoint(
                    Fixed::from_raw(v4.x.raw() - (t * aout.x.raw() as f32) as i32),
                    Fixed::from_raw(v4.y.raw() - (t * aout.y.raw() as f32) as i32),
                );
            }
            self.edges.attach_edge(v4, v2);
        } else {
            if denom.abs() > 0.00025 {
                let numer = ((2 * am.x.raw() - ain.y.raw() - aout.y.raw()).abs()
                    + (2 * am.y.raw() + ain.x.raw() + aout.x.raw()).abs())
                    as f32;
                let t = numer / denom;
                v1 = fxpoint(
                    Fixed::from_raw(v1.x.raw() + (t * ain.x.raw() as f32) as i32),
                    Fixed::from_raw(v1.y.raw() + (t * ain.y.raw() as f32) as i32),
                );
                v3 = fxpoint(
                    Fixed::from_raw(v3.x.raw() - (t * aout.x.raw() as f32) as i32),
                    Fixed::from_raw(v3.y.raw() - (t * aout.y.raw() as f32) as i32),
                );
            }
            self.edges.attach_edge(v1, v3);
        }
        self.edges.attach_edge(self.vin, v1);
        self.edges.attach_edge(v2, self.vout);
        self.vin = v3;
        self.vout = v4;
    }

    /// Strokes one figure, attaching the boundary of the stroked shape to
    /// the edge manager.
    pub fn stroke_figure(&mut self, figure: &FigureView) {
        let npts = figure.len();
        debug_assert!(npts >= 2, "finalized figures have at least 2 points");
        let nsegs = npts - 1;

        let dashon0 = self.init_line_dash();
        let vs0 = figure.point(0);
        let (linelen, mut uin, mut ain) = self.line_length(figure.point(0), figure.point(1));
        let u0 = uin;
        let a0 = ain;

        // Offset the stroked edges from the initial line segment.
        let mut vin0 = FxPoint::ZERO;
        let mut vout0 = FxPoint::ZERO;
        if dashon0 {
            self.vin = vs0 + ain.perp();
            self.vout = vs0 - ain.perp();
            vin0 = self.vin;
            vout0 = self.vout;
        }
        if self.dash.active {
            self.dashed_line(figure.point(1), uin, ain, linelen);
        }

        // Each iteration constructs one more segment and the join that
        // leads into it.
        for i in 1..nsegs {
            let (linelen, uout, aout) = self.line_length(figure.point(i), figure.point(i + 1));
            if self.dash.on {
                if self.join == LineJoin::Round {
                    self.angle = get_angle(uin, uout);
                }
                self.join_lines(figure.point(i), ain, aout);
            }
            if self.dash.active {
                self.dashed_line(figure.point(i + 1), uout, aout, linelen);
            }
            uin = uout;
            ain = aout;
        }

        // Finish the two ends of the figure by joining or capping them.
        let last = figure.point(nsegs);
        if figure.closed && dashon0 && self.dash.on {
            // Join the figure's two ends together.
            if self.join == LineJoin::Round {
                self.angle = get_angle(uin, u0);
            }
            self.join_lines(vs0, ain, a0);
            self.edges.attach_edge(self.vin, vin0);
            self.edges.attach_edge(vout0, self.vout);
            return;
        }

        if self.dash.on {
            // Cap the final point.
            let mut tip = last;
            if self.cap == LineCap::Square {
                tip = tip + ain;
            }
            let v1 = tip + ain.perp();
            let v2 = tip - ain.perp();
            self.edges.attach_edge(self.vin, v1);
            self.edges.attach_edge(v2, self.vout);
            if self.cap == LineCap::Round {
                self.angle = FIX_PI;
                self.round_join(last, ain, -ain);
            } else {
                self.edges.attach_edge(v1, v2);
            }
        }
        if dashon0 {
            // Cap the first point.
            if self.cap == LineCap::Round {
                self.angle = FIX_PI;
                self.round_join(vs0, -a0, a0);
            } else {
                let mut vin0 = vin0;
                let mut vout0 = vout0;
                if self.cap == LineCap::Square {
                    let v1 = vin0;
                    let v2 = vout0;
                    vin0 = vin0 - a0;
                    vout0 = vout0 - a0;
                    self.edges.attach_edge(vin0, v1);
                    self.edges.attach_edge(v2, vout0);
                }
                self.edges.attach_edge(vout0, vin0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dash_pattern_parses_and_scales() {
        let mut style = StrokeStyle::default();
        assert!(style.set_dash(&[4, 2], 0, 5.0));
        assert!(style.is_dashed());
        assert_eq!(style.dash_array.as_slice(), &[20 << 16, 10 << 16]);

        assert!(style.set_dash(&[], 0, 1.0));
        assert!(!style.is_dashed());
    }

    #[test]
    fn zero_byte_terminates_dash_pattern() {
        let mut style = StrokeStyle::default();
        assert!(style.set_dash(&[5, 0, 9, 9], 0, 1.0));
        assert_eq!(style.dash_array.as_slice(), &[5 << 16]);
    }

    #[test]
    fn overlong_dash_is_rejected() {
        let mut style = StrokeStyle::default();
        assert!(!style.set_dash(&[255], 0, 100.0));
    }

    #[test]
    fn dash_offset_advances_into_pattern() {
        let mut style = StrokeStyle::default();
        assert!(style.set_dash(&[10, 10], 15, 1.0));
        let mut edges = EdgeManager::new();
        let mut stroker = Stroker::new(&mut edges, &style, Fixed::from_f32(0.5));
        // Offset 15 lands 5 units into the first gap.
        assert!(!stroker.init_line_dash());
        assert_eq!(stroker.dash.len, Fixed::from_i32(5));
    }

    #[test]
    fn dash_offset_wraps_around_pattern() {
        let mut style = StrokeStyle::default();
        assert!(style.set_dash(&[10, 10], 25, 1.0));
        let mut edges = EdgeManager::new();
        let mut stroker = Stroker::new(&mut edges, &style, Fixed::from_f32(0.5));
        // Offset 25 wraps: 5 units into the second copy's dash.
        assert!(stroker.init_line_dash());
        assert_eq!(stroker.dash.len, Fixed::from_i32(5));
    }

    #[test]
    fn miter_limit_is_clamped() {
        let style = StrokeStyle::default().with_miter_limit(0.2);
        assert_eq!(style.miter_limit, MITER_LIMIT_MINIMUM);
    }
}
