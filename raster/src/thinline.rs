//! Thin-line strokes: the width-zero special case.
//!
//! A line width of zero asks for one-pixel-wide figures that mimic
//! Bresenham lines, whatever the other stroke attributes say. Each
//! segment is widened by half a pixel perpendicular to its dominant
//! direction. The +-45 degree diagonals split directions into four
//! quadrants; two adjacent segments in the same quadrant connect
//! naturally through the shared half-pixel offset, while segments in
//! different quadrants get a one-pixel beveled join. An open end is
//! treated as a join against no direction at all.

use crate::edge::EdgeManager;
use crate::geom::{Fixed, FxPoint, FIX_HALF};
use crate::path::PathBuilder;

/// Half-pixel offsets per direction quadrant. The fifth entry is the
/// null direction used when capping an open end.
const NEG_HALF: Fixed = Fixed::from_raw(-FIX_HALF.raw());

const OFFSET: [FxPoint; 5] = [
    FxPoint {
        x: Fixed::ZERO,
        y: NEG_HALF,
    },
    FxPoint {
        x: FIX_HALF,
        y: Fixed::ZERO,
    },
    FxPoint {
        x: Fixed::ZERO,
        y: FIX_HALF,
    },
    FxPoint {
        x: NEG_HALF,
        y: Fixed::ZERO,
    },
    FxPoint {
        x: Fixed::ZERO,
        y: Fixed::ZERO,
    },
];

const CAP: usize = 4;

/// Quadrant number for vector `d`, with boundaries on the diagonals.
fn quadrant(d: FxPoint) -> usize {
    if d.x.raw().abs() > d.y.raw().abs() {
        if d.x.raw() < 0 {
            2
        } else {
            0
        }
    } else if d.y.raw() < 0 {
        3
    } else {
        1
    }
}

/// Joins two thin segments meeting at `vert` with a small bevel, or caps
/// an open end when either quadrant is the cap sentinel.
fn thin_join(edges: &mut EdgeManager, vert: FxPoint, inquad: usize, outquad: usize) {
    let cdir = OFFSET[outquad];
    let pdir = OFFSET[inquad];
    let mut v1 = vert;
    let mut v2 = vert;

    if inquad == CAP || outquad == CAP {
        if inquad == CAP {
            v1 = v1 + cdir.perp();
        } else {
            v2 = v2 - pdir.perp();
        }
    }

    let a = v1 + pdir;
    let b = v2 + cdir;
    let c = v2 - cdir;
    let d = v1 - pdir;
    edges.attach_edge(a, b);
    edges.attach_edge(c, d);
}

/// Strokes every figure of `path` as thin lines, attaching the outline
/// edges to the edge manager. The path must be finalized.
pub(crate) fn thin_stroke(edges: &mut EdgeManager, path: &PathBuilder) {
    for figure in path.figures() {
        let npts = figure.len();
        debug_assert!(npts >= 2);
        let nsegs = npts - 1;

        let mut prevquad = if figure.closed {
            // Direction of the closing segment, so the first join is
            // right.
            quadrant(figure.point(npts - 1) - figure.point(npts - 2))
        } else {
            CAP
        };

        for i in 0..nsegs {
            let vs = figure.point(i);
            let ve = figure.point(i + 1);
            let d = ve - vs;
            debug_assert!(d != FxPoint::ZERO);
            let quad = quadrant(d);
            let dir = OFFSET[quad];

            // Offset the stroked edges half a pixel from the segment.
            let p0 = vs + dir;
            let p1 = p0 + d;
            let p2 = ve - dir;
            let p3 = p2 - d;
            edges.attach_edge(p0, p1);
            edges.attach_edge(p2, p3);

            if quad != prevquad {
                thin_join(edges, vs, prevquad, quad);
                prevquad = quad;
            }
        }
        if !figure.closed {
            thin_join(edges, figure.point(nsegs), prevquad, CAP);
        }
    }
}
