//! Page-space geometry: rectangles, bounding boxes, alignment and
//! distribution.
//!
//! All helpers are pure. Rotation is ignored: an element is treated as
//! its axis-aligned `position`/`size` box, which is what the alignment
//! toolbar operates on.

use serde::{Deserialize, Serialize};

/// A point in page units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// A width/height pair in page units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_parts(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.left() && px <= self.right() && py >= self.top() && py <= self.bottom()
    }

    /// Smallest rectangle covering both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left().min(other.left());
        let top = self.top().min(other.top());
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(left, top, right - left, bottom - top)
    }
}

/// Union bounding box of a set of rectangles. `None` for an empty set.
pub fn bounding_box<I>(rects: I) -> Option<Rect>
where
    I: IntoIterator<Item = Rect>,
{
    rects.into_iter().reduce(|acc, r| acc.union(&r))
}

// ─── Alignment ───────────────────────────────────────────────────────────

/// Alignment / distribution operations offered for a multi-selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlignMode {
    AlignLeft,
    AlignRight,
    AlignTop,
    AlignBottom,
    AlignCenterH,
    AlignCenterV,
    DistributeH,
    DistributeV,
}

/// Target origin for `rect` when snapping it to `bounds` under an
/// edge/center mode. Distribution modes return the origin unchanged; they
/// depend on the whole set and go through [`distribute`].
pub fn align_target(rect: &Rect, bounds: &Rect, mode: AlignMode) -> Point {
    let (bcx, bcy) = bounds.center();
    match mode {
        AlignMode::AlignLeft => Point::new(bounds.left(), rect.y),
        AlignMode::AlignRight => Point::new(bounds.right() - rect.width, rect.y),
        AlignMode::AlignTop => Point::new(rect.x, bounds.top()),
        AlignMode::AlignBottom => Point::new(rect.x, bounds.bottom() - rect.height),
        AlignMode::AlignCenterH => Point::new(bcx - rect.width / 2.0, rect.y),
        AlignMode::AlignCenterV => Point::new(rect.x, bcy - rect.height / 2.0),
        AlignMode::DistributeH | AlignMode::DistributeV => rect.origin(),
    }
}

/// Uniform gap between `count` items of combined length `total` laid out
/// over `span`. Negative when the items overlap more than the span allows.
///
/// Returns `0.0` for fewer than two items.
pub fn distribution_gap(span: f64, total: f64, count: usize) -> f64 {
    if count < 2 {
        return 0.0;
    }
    (span - total) / (count - 1) as f64
}

/// Evenly distribute `rects` horizontally (`DistributeH`) or vertically
/// (`DistributeV`) inside their own bounding box.
///
/// Items are ordered by their current near edge and packed from the box's
/// near edge with a uniform gap. Returned origins are in input order.
/// Fewer than two rectangles are returned unmoved.
pub fn distribute(rects: &[Rect], horizontal: bool) -> Vec<Point> {
    let mut out: Vec<Point> = rects.iter().map(Rect::origin).collect();
    let Some(bounds) = bounding_box(rects.iter().copied()) else {
        return out;
    };
    if rects.len() < 2 {
        return out;
    }

    let extent = |r: &Rect| if horizontal { r.width } else { r.height };
    let near = |r: &Rect| if horizontal { r.x } else { r.y };

    let mut order: Vec<usize> = (0..rects.len()).collect();
    order.sort_by(|&a, &b| near(&rects[a]).total_cmp(&near(&rects[b])));

    let (span, start) = if horizontal {
        (bounds.width, bounds.left())
    } else {
        (bounds.height, bounds.top())
    };
    let total: f64 = rects.iter().map(extent).sum();
    let gap = distribution_gap(span, total, rects.len());

    let mut cursor = start;
    for idx in order {
        if horizontal {
            out[idx].x = cursor;
        } else {
            out[idx].y = cursor;
        }
        cursor += extent(&rects[idx]) + gap;
    }
    out
}

/// New origins for `rects` under `mode`, in input order.
///
/// Requires at least two rectangles; smaller sets come back unmoved.
pub fn arrange(rects: &[Rect], mode: AlignMode) -> Vec<Point> {
    if rects.len() < 2 {
        return rects.iter().map(Rect::origin).collect();
    }
    match mode {
        AlignMode::DistributeH => distribute(rects, true),
        AlignMode::DistributeV => distribute(rects, false),
        _ => {
            let Some(bounds) = bounding_box(rects.iter().copied()) else {
                return Vec::new();
            };
            rects
                .iter()
                .map(|r| align_target(r, &bounds, mode))
                .collect()
        }
    }
}
