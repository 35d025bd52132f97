#![forbid(unsafe_code)]

//! Geometric primitives.

/// A pointer position in host viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - origin`.
    #[inline]
    pub fn delta_from(self, origin: Point) -> (f64, f64) {
        (self.x - origin.x, self.y - origin.y)
    }
}

/// An axis-aligned bounding box captured from the host at a single instant.
///
/// Uses viewport pixel coordinates with the origin at the top-left. Edges are
/// stored directly, the way a host bounding-box query reports them.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub left: f64,
    /// Right edge.
    pub right: f64,
    /// Top edge.
    pub top: f64,
    /// Bottom edge.
    pub bottom: f64,
}

impl Rect {
    /// Create a rectangle from its four edges.
    #[inline]
    pub const fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Create a rectangle from an origin and a size.
    #[inline]
    pub fn from_origin_size(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self::new(left, left + width, top, top + height)
    }

    /// Width in pixels (never negative).
    #[inline]
    pub fn width(&self) -> f64 {
        (self.right - self.left).max(0.0)
    }

    /// Height in pixels (never negative).
    #[inline]
    pub fn height(&self) -> f64 {
        (self.bottom - self.top).max(0.0)
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width() == 0.0 || self.height() == 0.0
    }

    /// Top-left corner.
    #[inline]
    pub const fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Strict containment: points on an edge are outside.
    ///
    /// Two siblings sharing an edge therefore never both claim a point on it.
    #[inline]
    pub fn contains_strict(&self, point: Point) -> bool {
        point.x > self.left && point.x < self.right && point.y > self.top && point.y < self.bottom
    }

    /// Offset that moves this rectangle's origin onto `origin`'s origin.
    #[inline]
    pub fn offset_to(&self, origin: &Rect) -> (f64, f64) {
        (origin.left - self.left, origin.top - self.top)
    }
}
