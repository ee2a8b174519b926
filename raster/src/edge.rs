//! The polygonal edge manager.
//!
//! Paths are converted into lists of directed edges, which are then
//! sorted, clipped against the current clip region, and normalized. A
//! *normalized* edge list holds an even number of edges in which each
//! successive pair describes the left and right sides of one trapezoid;
//! the trapezoids are non-overlapping, emitted top to bottom, and ready
//! to be filled by a renderer.

use std::cmp::Ordering;
use std::mem;

use crate::geom::{Fixed, FxPoint, FIX_BIAS};
use crate::pool::{merge_lists, sort_list, Edge, EdgeSet, NONE};
use crate::FillRule;

/// Largest possible band height.
const BIGVAL16: i32 = 0x7FFF;

/// The fill rules understood by the scan converter. The first two are the
/// public rules; the last two combine a shape with the clip region and
/// start their winding count below or at zero so that only the
/// intersection (or difference) survives.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum ScanRule {
    EvenOdd,
    Winding,
    Intersect,
    Exclude,
}

impl From<FillRule> for ScanRule {
    fn from(rule: FillRule) -> ScanRule {
        match rule {
            FillRule::EvenOdd => ScanRule::EvenOdd,
            FillRule::NonZero => ScanRule::Winding,
        }
    }
}

#[inline]
fn sign(x: i32) -> i32 {
    if x < 0 {
        -1
    } else {
        1
    }
}

/// Ascending `ytop`.
fn ycomp(a: &Edge, b: &Edge) -> Ordering {
    a.ytop.cmp(&b.ytop)
}

/// Ascending `xtop`; coincident edges order by slope, then by
/// descending `dy`.
fn xcomp(a: &Edge, b: &Edge) -> Ordering {
    a.xtop
        .cmp(&b.xtop)
        .then(a.dxdy.cmp(&b.dxdy))
        .then(b.dy.cmp(&a.dy))
}

pub(crate) struct EdgeManager {
    pub input: EdgeSet,
    pub out: EdgeSet,
    pub clip: EdgeSet,
    pub rend: EdgeSet,
    pub save: EdgeSet,
    pub yshift: u32,
    ybias: i32,
    yhalf: i32,
    #[cfg_attr(not(test), allow(dead_code))]
    pub log: bool,
}

impl EdgeManager {
    pub fn new() -> Self {
        let mut mgr = EdgeManager {
            input: EdgeSet::new(),
            out: EdgeSet::new(),
            clip: EdgeSet::new(),
            rend: EdgeSet::new(),
            save: EdgeSet::new(),
            yshift: 16,
            ybias: 0,
            yhalf: 0,
            log: false,
        };
        mgr.set_y_resolution(0);
        mgr
    }

    /// Adapts the y quantization to a renderer's subpixel resolution:
    /// `yres` extra bits of y precision per pixel (0 for aliased
    /// rendering, 2 for 4x vertical supersampling).
    pub fn set_y_resolution(&mut self, yres: u32) {
        debug_assert!(yres < 16);
        self.yshift = 16 - yres;
        self.ybias = FIX_BIAS.raw() >> yres;
        self.yhalf = self.ybias + 1;
    }

    /// Converts a directed line segment into a polygonal edge and
    /// prepends it to the input list. Edges that do not cross any scan
    /// row center are discarded.
    pub fn attach_edge(&mut self, v1: FxPoint, v2: FxPoint) {
        let bias = Fixed::from_raw(self.ybias);
        let j = v1.y.bias_shift(bias, self.yshift);
        let k = v2.y.bias_shift(bias, self.yshift);
        let dy = k - j;
        if dy == 0 {
            return;
        }
        let (vtop, vbot, ymin) = if dy > 0 { (v1, v2, j) } else { (v2, v1, k) };

        // Snip off the sliver between the real top vertex and the first
        // scan row center the edge crosses, so xtop sits exactly on that
        // row center.
        let dx = (vbot.x.raw() - vtop.x.raw()) as f32;
        let dxdy = dx / (vbot.y.raw() - vtop.y.raw()) as f32;
        let ygap = (ymin << self.yshift)
            .wrapping_add(self.yhalf)
            .wrapping_sub(vtop.y.raw());
        let xgap = (dxdy * ygap as f32) as i32;

        self.input.push_front(Edge {
            ytop: ymin,
            dy,
            xtop: Fixed::from_raw(
                vtop.x
                    .raw()
                    .wrapping_add(xgap)
                    .wrapping_add(FIX_BIAS.raw()),
            ),
            dxdy: Fixed::from_raw((dxdy * (1i64 << self.yshift) as f32) as i32),
            next: NONE,
        });
    }

    /// Subtracts a scroll displacement from every edge in the input list.
    pub fn translate_edges(&mut self, x: i32, y: i32) {
        let dx = x << 16;
        let dy = y << (16 - self.yshift);
        let pool = &mut self.input.pool;
        let mut p = self.input.head;
        while p != NONE {
            let e = &mut pool[p as usize];
            e.xtop = Fixed::from_raw(e.xtop.raw().wrapping_sub(dx));
            e.ytop -= dy;
            p = e.next;
        }
    }

    /// Partitions the shape held in the input list into the normalized
    /// trapezoid list in `out`, applying `rule`. The input list is
    /// consumed.
    pub fn normalize_edges(&mut self, rule: ScanRule) {
        if self.input.head == NONE {
            return;
        }
        if self.clip.head == NONE {
            self.input.reset();
            return;
        }
        if rule == ScanRule::EvenOdd || rule == ScanRule::Winding {
            // Fresh shape: the edges have not been sorted yet.
            debug_assert!(self.out.head == NONE && self.out.pool.is_empty());
            self.input.head = sort_list(&mut self.input.pool, self.input.head, ycomp);
        }
        self.normalize_core(rule);
        self.input.reset();
    }

    /// The band decomposition. The input list must be sorted by ascending
    /// `ytop`. Each loop iteration produces one band of trapezoids that
    /// share a `ytop` value; trapezoids come out in major y order and
    /// minor x order.
    fn normalize_core(&mut self, rule: ScanRule) {
        let log = self.log;
        let input = &mut self.input;
        let out = &mut self.out;
        let pool = &mut input.pool;

        let mut ylist = input.head;
        while ylist != NONE {
            let yscan = pool[ylist as usize].ytop;

            // Remove the leading run of edges with ytop == yscan, two at
            // a time (a scan row always crosses an even number of edges).
            // The band height starts at the shortest of these edges.
            let mut h = BIGVAL16;
            let mut p = ylist;
            let last;
            loop {
                h = h.min(pool[p as usize].dy.abs());
                let q = pool[p as usize].next;
                debug_assert!(q != NONE, "normalized input must pair up");
                h = h.min(pool[q as usize].dy.abs());
                let next = pool[q as usize].next;
                if next == NONE || pool[next as usize].ytop != yscan {
                    last = q;
                    p = next;
                    break;
                }
                p = next;
            }
            pool[last as usize].next = NONE;
            let xlist = sort_list(pool, ylist, xcomp);
            ylist = p;

            // Shrink the band if the next y-sorted edge cuts in.
            if ylist != NONE {
                h = h.min(pool[ylist as usize].ytop - yscan);
            }

            // Shrink the band to stop just short of the first crossing
            // between adjacent edges.
            let mut pi = xlist;
            while h > 1 {
                let qi = pool[pi as usize].next;
                if qi == NONE {
                    break;
                }
                let ddx = pool[pi as usize].dxdy.raw() - pool[qi as usize].dxdy.raw();
                let xdist = pool[qi as usize].xtop.raw() - pool[pi as usize].xtop.raw();
                if ddx > 0 && (xdist as i64) < (h as i64 - 1) * ddx as i64 {
                    h = 1 + xdist / ddx;
                }
                pi = qi;
            }
            raster_log!(log, "band y={} h={} rule={:?}", yscan, h, rule);

            // Emit the inside pairs of the band according to the rule.
            match rule {
                ScanRule::EvenOdd => {
                    let mut p = xlist;
                    loop {
                        let q = pool[p as usize].next;
                        out.push_pair(h, pool[p as usize], pool[q as usize]);
                        p = pool[q as usize].next;
                        if p == NONE {
                            break;
                        }
                    }
                }
                ScanRule::Winding => {
                    let mut p = xlist;
                    loop {
                        let mut wind = sign(pool[p as usize].dy);
                        let mut q = pool[p as usize].next;
                        loop {
                            wind += sign(pool[q as usize].dy);
                            if wind == 0 {
                                break;
                            }
                            q = pool[q as usize].next;
                            wind += sign(pool[q as usize].dy);
                            q = pool[q as usize].next;
                        }
                        out.push_pair(h, pool[p as usize], pool[q as usize]);
                        p = pool[q as usize].next;
                        if p == NONE {
                            break;
                        }
                    }
                }
                ScanRule::Intersect | ScanRule::Exclude => {
                    let mut wind = if rule == ScanRule::Intersect { -1 } else { 0 };
                    let mut p = xlist;
                    'pairs: loop {
                        loop {
                            if p == NONE {
                                break 'pairs;
                            }
                            wind += sign(pool[p as usize].dy);
                            if wind == 1 {
                                break;
                            }
                            p = pool[p as usize].next;
                        }
                        let mut q = pool[p as usize].next;
                        loop {
                            if q == NONE {
                                break 'pairs;
                            }
                            wind += sign(pool[q as usize].dy);
                            if wind == 0 {
                                break;
                            }
                            q = pool[q as usize].next;
                        }
                        out.push_pair(h, pool[p as usize], pool[q as usize]);
                        p = pool[q as usize].next;
                    }
                }
            }

            // Cut the processed band off every edge and push the
            // leftovers back onto the head of the y-sorted list.
            let yband = yscan + h;
            let mut keep_head = NONE;
            let mut keep_tail = NONE;
            let mut p = xlist;
            while p != NONE {
                let next = pool[p as usize].next;
                let e = &mut pool[p as usize];
                e.dy -= if e.dy < 0 { -h } else { h };
                if e.dy != 0 {
                    e.xtop = Fixed::from_raw(
                        e.xtop
                            .raw()
                            .wrapping_add((h as i64 * e.dxdy.raw() as i64) as i32),
                    );
                    e.ytop = yband;
                    if keep_head == NONE {
                        keep_head = p;
                    } else {
                        pool[keep_tail as usize].next = p;
                    }
                    keep_tail = p;
                }
                p = next;
            }
            if keep_head != NONE {
                pool[keep_tail as usize].next = ylist;
                ylist = keep_head;
            }
        }
    }

    /// Clips the freshly normalized shape in `out` against the current
    /// clip region. `Intersect` keeps what is inside both; `Exclude`
    /// keeps the part of the clip region outside the shape.
    pub fn clip_edges(&mut self, rule: ScanRule) {
        debug_assert!(self.input.head == NONE && self.input.pool.is_empty());
        debug_assert!(rule == ScanRule::Intersect || rule == ScanRule::Exclude);

        // The shape may be so tiny that it fell into a crack between
        // pixels during scan conversion.
        if self.out.head == NONE {
            return;
        }
        // An empty clip region clips everything away.
        if self.clip.head == NONE {
            self.out.reset();
            return;
        }

        mem::swap(&mut self.input, &mut self.out);
        debug_assert!(self.out.head == NONE);

        // The part of the clip region above the shape cannot intersect
        // it: skip it entirely (Intersect), or pass it straight through
        // to the output (Exclude). Edge pairs straddling the shape's top
        // row are split there.
        let mut copy_head = NONE;
        let mut copy_tail = NONE;
        {
            let input = &mut self.input;
            let out = &mut self.out;
            let cpool = &self.clip.pool;
            let yband = input.pool[input.head as usize].ytop;

            let mut append_copy = |input: &mut EdgeSet, edge: Edge| {
                let index = input.alloc(Edge { next: NONE, ..edge });
                if copy_head == NONE {
                    copy_head = index;
                } else {
                    input.pool[copy_tail as usize].next = index;
                }
                copy_tail = index;
            };

            let mut p = self.clip.head;
            while p != NONE && cpool[p as usize].ytop < yband {
                let left = cpool[p as usize];
                let right = cpool[left.next as usize];
                let h = yband - left.ytop;

                if rule == ScanRule::Exclude {
                    let dy = h.min(left.dy);
                    debug_assert!(dy > 0);
                    out.push_pair(dy, left, right);
                }

                // Keep the parts of the pair that reach into the shape's
                // y range.
                if left.dy > h {
                    let mut l = left;
                    l.xtop = Fixed::from_raw(
                        l.xtop
                            .raw()
                            .wrapping_add((h as i64 * l.dxdy.raw() as i64) as i32),
                    );
                    l.ytop = yband;
                    l.dy -= h;
                    append_copy(input, l);

                    let mut r = right;
                    r.xtop = Fixed::from_raw(
                        r.xtop
                            .raw()
                            .wrapping_add((h as i64 * r.dxdy.raw() as i64) as i32),
                    );
                    r.ytop = yband;
                    r.dy += h;
                    append_copy(input, r);
                }
                p = right.next;
            }

            // Copy the rest of the clip region verbatim.
            while p != NONE {
                let edge = cpool[p as usize];
                append_copy(input, edge);
                p = edge.next;
            }
        }

        // Both lists are sorted by ascending y; merge and re-normalize.
        self.input.head = merge_lists(&mut self.input.pool, self.input.head, copy_head);
        self.normalize_core(rule);
        self.input.reset();
    }

    /// Makes the latest normalized shape the active clip region. Returns
    /// false if the new clip region is empty.
    pub fn set_clip_list(&mut self) -> bool {
        if self.out.head == NONE {
            self.clip.reset();
            return false;
        }
        mem::swap(&mut self.out, &mut self.clip);
        self.out.reset();
        true
    }

    /// Flips the direction of every edge in the normalized shape, turning
    /// its interior into its exterior for a subsequent `Exclude` clip.
    pub fn reverse_edges(&mut self) {
        let pool = &mut self.out.pool;
        let mut p = self.out.head;
        while p != NONE {
            let e = &mut pool[p as usize];
            e.dy = -e.dy;
            p = e.next;
        }
    }

    /// Keeps a copy of the current clip region for a later
    /// [`swap_clip_region`](Self::swap_clip_region). Returns false if the
    /// current region is empty.
    pub fn save_clip_region(&mut self) -> bool {
        self.save.reset();
        if self.clip.head == NONE {
            return false;
        }
        let mut p = self.clip.head;
        while p != NONE {
            let edge = self.clip.pool[p as usize];
            self.save.push_back(edge);
            p = edge.next;
        }
        true
    }

    /// Exchanges the current clip region with the saved one. Returns
    /// false if the new current region is empty.
    pub fn swap_clip_region(&mut self) -> bool {
        mem::swap(&mut self.clip, &mut self.save);
        self.clip.head != NONE
    }

    /// Replaces the clip region with the device rectangle `[0,w) x [0,h)`.
    /// The rectangle's sides are inserted in the reverse-y order the
    /// directed-edge convention requires. Unless `preserve_save` is set,
    /// any saved clip region is discarded too.
    pub fn set_device_clip_rectangle(&mut self, width: i32, height: i32, preserve_save: bool) {
        debug_assert!(self.input.head == NONE && self.input.pool.is_empty());
        if !preserve_save {
            self.save.reset();
        }
        let right_bottom = FxPoint::from_i32(width, height);
        let right_top = FxPoint::from_i32(width, 0);
        self.attach_edge(right_bottom, right_top);
        let left_bottom = FxPoint::from_i32(0, height);
        let left_top = FxPoint::from_i32(0, 0);
        self.attach_edge(left_top, left_bottom);

        mem::swap(&mut self.input, &mut self.clip);
        self.input.reset();
    }
}
