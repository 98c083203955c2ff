//! Integer fractal-space geometry: points, directed segments, and the
//! truncating projections the growth engine is built on.

/// A point on the unscaled fractal canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Walk `distance` units from this point along `angle` (radians).
    /// The summed coordinates truncate toward zero, like an integer canvas.
    pub fn offset(self, distance: f64, angle: f64) -> Self {
        Self::new(
            (f64::from(self.x) + distance * angle.cos()) as i32,
            (f64::from(self.y) + distance * angle.sin()) as i32,
        )
    }

    /// Scale then translate into display space, truncating toward zero.
    pub fn scaled(self, scale: f64, dx: i32, dy: i32) -> Self {
        Self::new(
            (f64::from(self.x) * scale) as i32 + dx,
            (f64::from(self.y) * scale) as i32 + dy,
        )
    }
}

/// A directed line between two points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub p1: Point,
    pub p2: Point,
}

impl Segment {
    pub const fn new(p1: Point, p2: Point) -> Self {
        Self { p1, p2 }
    }

    /// Signed horizontal extent.
    pub fn width(&self) -> i32 {
        self.p2.x - self.p1.x
    }

    /// Signed vertical extent.
    pub fn height(&self) -> i32 {
        self.p2.y - self.p1.y
    }

    /// Euclidean length.
    pub fn length(&self) -> f64 {
        f64::from(self.width()).hypot(f64::from(self.height()))
    }

    /// Direction in radians, atan2 convention: (-pi, pi].
    pub fn angle(&self) -> f64 {
        f64::from(self.height()).atan2(f64::from(self.width()))
    }

    /// Project both endpoints into display space.
    pub fn scaled(&self, scale: f64, dx: i32, dy: i32) -> Self {
        Self::new(self.p1.scaled(scale, dx, dy), self.p2.scaled(scale, dx, dy))
    }
}
