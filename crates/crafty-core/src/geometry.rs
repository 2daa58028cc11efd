#![forbid(unsafe_code)]

//! Geometric primitives shared by chords and tools.
//!
//! Screen positions are `f64` host coordinates (origin at the top-left of
//! the viewport). Model positions are 3D points in host model units.

/// A position in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[inline]
    #[must_use]
    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// An axis-aligned rectangle in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds2 {
    /// Upper-left corner (smallest x and y).
    pub upper_left: Point,
    /// Lower-right corner (largest x and y).
    pub lower_right: Point,
}

impl Bounds2 {
    /// The smallest rectangle containing both points.
    #[must_use]
    pub fn from_points(a: Point, b: Point) -> Self {
        Self {
            upper_left: Point::new(a.x.min(b.x), a.y.min(b.y)),
            lower_right: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Width of the rectangle.
    #[inline]
    #[must_use]
    pub fn width(&self) -> f64 {
        self.lower_right.x - self.upper_left.x
    }

    /// Height of the rectangle.
    #[inline]
    #[must_use]
    pub fn height(&self) -> f64 {
        self.lower_right.y - self.upper_left.y
    }

    /// The four corners, clockwise from the upper-left.
    #[must_use]
    pub fn corners(&self) -> [Point; 4] {
        let (x0, y0) = (self.upper_left.x, self.upper_left.y);
        let (x1, y1) = (self.lower_right.x, self.lower_right.y);
        [
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ]
    }
}

/// A position in model space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    /// Create a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// This point translated by `v`.
    #[inline]
    #[must_use]
    pub fn offset(&self, v: Vector3) -> Self {
        Self::new(self.x + v.x, self.y + v.y, self.z + v.z)
    }

    /// Vector from this point to `other`.
    #[inline]
    #[must_use]
    pub fn vector_to(&self, other: Point3) -> Vector3 {
        Vector3::new(other.x - self.x, other.y - self.y, other.z - self.z)
    }
}

/// A displacement in model space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Create a new vector.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean length.
    #[inline]
    #[must_use]
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Whether the vector has (numerically) zero length.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.length() <= f64::EPSILON
    }

    /// The vector scaled to `length`, keeping its direction.
    ///
    /// A negative length flips the direction. Returns `None` for the zero
    /// vector, which has no direction.
    #[must_use]
    pub fn with_length(&self, length: f64) -> Option<Self> {
        let current = self.length();
        if current <= f64::EPSILON {
            return None;
        }
        Some(self.scaled(length / current))
    }

    /// The vector multiplied by `factor`.
    #[inline]
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }

    /// Dot product.
    #[inline]
    #[must_use]
    pub fn dot(&self, other: Vector3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }
}

impl std::ops::Add for Vector3 {
    type Output = Vector3;

    fn add(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

/// An infinite plane through `origin`, facing along a unit `normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub origin: Point3,
    pub normal: Vector3,
}

impl Plane {
    /// The plane through `origin` perpendicular to `normal`. `None` for a
    /// zero normal.
    #[must_use]
    pub fn through(origin: Point3, normal: Vector3) -> Option<Self> {
        normal.with_length(1.0).map(|normal| Self { origin, normal })
    }
}

/// An axis-aligned bounding box in model space that grows as points are added.
///
/// An empty box contains nothing; adding the first point makes it a
/// degenerate box around that point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extents {
    bounds: Option<(Point3, Point3)>,
}

impl Extents {
    /// An empty box.
    #[must_use]
    pub const fn new() -> Self {
        Self { bounds: None }
    }

    /// Whether no point has been added since creation or the last clear.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    /// Remove every point.
    pub fn clear(&mut self) -> &mut Self {
        self.bounds = None;
        self
    }

    /// Grow the box to contain `p`.
    pub fn add_point(&mut self, p: Point3) -> &mut Self {
        self.bounds = Some(match self.bounds {
            None => (p, p),
            Some((min, max)) => (
                Point3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z)),
                Point3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z)),
            ),
        });
        self
    }

    /// Grow the box to contain `other`.
    pub fn add(&mut self, other: &Extents) -> &mut Self {
        if let Some((min, max)) = other.bounds {
            self.add_point(min).add_point(max);
        }
        self
    }

    /// Smallest corner, if any point was added.
    #[must_use]
    pub fn min(&self) -> Option<Point3> {
        self.bounds.map(|(min, _)| min)
    }

    /// Largest corner, if any point was added.
    #[must_use]
    pub fn max(&self) -> Option<Point3> {
        self.bounds.map(|(_, max)| max)
    }

    /// Center of the box, if any point was added.
    #[must_use]
    pub fn center(&self) -> Option<Point3> {
        self.bounds.map(|(min, max)| {
            Point3::new(
                (min.x + max.x) / 2.0,
                (min.y + max.y) / 2.0,
                (min.z + max.z) / 2.0,
            )
        })
    }

    /// The same box translated by `v`.
    #[must_use]
    pub fn translated(&self, v: Vector3) -> Self {
        Self {
            bounds: self.bounds.map(|(min, max)| (min.offset(v), max.offset(v))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_normal_is_unit_length() {
        let plane = Plane::through(Point3::new(1.0, 2.0, 3.0), Vector3::new(0.0, -4.0, 0.0)).unwrap();
        assert_eq!(plane.normal, Vector3::new(0.0, -1.0, 0.0));
        assert_eq!(plane.origin, Point3::new(1.0, 2.0, 3.0));
        assert!(Plane::through(Point3::default(), Vector3::ZERO).is_none());
    }

    #[test]
    fn bounds_from_points_normalizes_corners() {
        let b = Bounds2::from_points(Point::new(10.0, 2.0), Point::new(4.0, 8.0));
        assert_eq!(b.upper_left, Point::new(4.0, 2.0));
        assert_eq!(b.lower_right, Point::new(10.0, 8.0));
        assert_eq!(b.width(), 6.0);
        assert_eq!(b.height(), 6.0);
    }

    #[test]
    fn point_distance() {
        assert_eq!(Point::new(0.0, 0.0).distance(Point::new(3.0, 4.0)), 5.0);
    }

    #[test]
    fn vector_with_length_keeps_direction() {
        let v = Vector3::new(0.0, 0.0, 2.0).with_length(-3.0).unwrap();
        assert_eq!(v, Vector3::new(0.0, 0.0, -3.0));
        assert!(Vector3::ZERO.with_length(1.0).is_none());
    }

    #[test]
    fn extents_grow_and_clear() {
        let mut e = Extents::new();
        assert!(e.is_empty());
        e.add_point(Point3::new(1.0, 2.0, 3.0))
            .add_point(Point3::new(-1.0, 5.0, 0.0));
        assert_eq!(e.min(), Some(Point3::new(-1.0, 2.0, 0.0)));
        assert_eq!(e.max(), Some(Point3::new(1.0, 5.0, 3.0)));
        assert_eq!(e.center(), Some(Point3::new(0.0, 3.5, 1.5)));

        let mut other = Extents::new();
        other.add(&e);
        assert_eq!(other, e);

        e.clear();
        assert!(e.is_empty());
        assert_eq!(e.center(), None);
    }
}
