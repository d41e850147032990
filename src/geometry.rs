//! Planar primitives shared by the triangulation and warping stages.

use std::cmp::Ordering;

/// Determinant threshold below which an affine solve is rejected as singular.
const DEGENERATE_EPS: f64 = 1e-6;

/// A 2-D point in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal coordinate (pixels).
    pub x: f32,
    /// Vertical coordinate (pixels).
    pub y: f32,
}

impl Point {
    /// Create a point from pixel coordinates.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle with integer pixel bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    /// X coordinate of the top-left corner.
    pub x: i32,
    /// Y coordinate of the top-left corner.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// Create a rectangle from its top-left corner and extent.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The full pixel rectangle of a `width` x `height` image.
    pub fn of_image(width: u32, height: u32) -> Self {
        Self::new(0, 0, width as i32, height as i32)
    }

    /// One past the rightmost column.
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// One past the bottom row.
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Overlap with `other`, or `None` when the rectangles are disjoint.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x || bottom <= y {
            return None;
        }
        Some(Rect::new(x, y, right - x, bottom - y))
    }
}

/// Minimal enclosing integer rectangle of a point set.
///
/// The rectangle always covers at least one pixel, so a single point maps to
/// the pixel it falls in.
pub fn bounding_rect(points: &[Point]) -> Rect {
    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    let x = min_x.floor() as i32;
    let y = min_y.floor() as i32;
    let width = (max_x.ceil() as i32 - x).max(1);
    let height = (max_y.ceil() as i32 - y).max(1);
    Rect::new(x, y, width, height)
}

/// Twice the signed area of the triangle `abc`.
fn cross(o: Point, a: Point, b: Point) -> f64 {
    (a.x as f64 - o.x as f64) * (b.y as f64 - o.y as f64)
        - (a.y as f64 - o.y as f64) * (b.x as f64 - o.x as f64)
}

/// Unsigned area of a triangle in square pixels.
pub fn triangle_area(tri: &[Point; 3]) -> f64 {
    cross(tri[0], tri[1], tri[2]).abs() / 2.0
}

/// 2x3 affine transform computed from three point correspondences.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    // Row-major [a, b, c, d, e, f]: x' = a*x + b*y + c, y' = d*x + e*y + f.
    m: [f64; 6],
}

impl AffineTransform {
    /// Solve the transform taking `from[i]` to `to[i]`.
    ///
    /// Returns `None` when the `from` points are collinear or repeated, which
    /// leaves the linear system singular.
    pub fn from_triangles(from: &[Point; 3], to: &[Point; 3]) -> Option<Self> {
        let (x1, y1) = (from[0].x as f64, from[0].y as f64);
        let (x2, y2) = (from[1].x as f64, from[1].y as f64);
        let (x3, y3) = (from[2].x as f64, from[2].y as f64);

        let det = x1 * (y2 - y3) - y1 * (x2 - x3) + (x2 * y3 - x3 * y2);
        if det.abs() < DEGENERATE_EPS {
            return None;
        }

        // Cramer's rule; the coefficient matrix is shared between the x and y
        // solves, only the right-hand side changes.
        let solve = |u1: f64, u2: f64, u3: f64| -> (f64, f64, f64) {
            let a = u1 * (y2 - y3) - y1 * (u2 - u3) + (u2 * y3 - u3 * y2);
            let b = x1 * (u2 - u3) - u1 * (x2 - x3) + (x2 * u3 - x3 * u2);
            let c = x1 * (y2 * u3 - y3 * u2) - y1 * (x2 * u3 - x3 * u2) + u1 * (x2 * y3 - x3 * y2);
            (a / det, b / det, c / det)
        };

        let (a, b, c) = solve(to[0].x as f64, to[1].x as f64, to[2].x as f64);
        let (d, e, f) = solve(to[0].y as f64, to[1].y as f64, to[2].y as f64);
        Some(Self {
            m: [a, b, c, d, e, f],
        })
    }

    /// Map a point through the transform.
    pub fn apply(&self, p: Point) -> Point {
        let (x, y) = (p.x as f64, p.y as f64);
        Point::new(
            (self.m[0] * x + self.m[1] * y + self.m[2]) as f32,
            (self.m[3] * x + self.m[4] * y + self.m[5]) as f32,
        )
    }
}

/// Convex hull of a point set (Andrew's monotone chain).
///
/// Fewer than three distinct points yield the deduplicated input;
/// [`point_in_convex_polygon`] treats such hulls as covering nothing.
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut pts: Vec<Point> = points.to_vec();
    pts.sort_by(|a, b| {
        a.x.partial_cmp(&b.x)
            .unwrap_or(Ordering::Equal)
            .then(a.y.partial_cmp(&b.y).unwrap_or(Ordering::Equal))
    });
    pts.dedup();
    if pts.len() < 3 {
        return pts;
    }

    let mut lower: Vec<Point> = Vec::new();
    for &p in &pts {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<Point> = Vec::new();
    for &p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Test whether `p` lies inside or on the boundary of a convex polygon.
///
/// The polygon must be in the winding order produced by [`convex_hull`].
/// Hulls with fewer than three vertices contain nothing.
pub fn point_in_convex_polygon(p: Point, hull: &[Point]) -> bool {
    if hull.len() < 3 {
        return false;
    }
    for i in 0..hull.len() {
        let a = hull[i];
        let b = hull[(i + 1) % hull.len()];
        if cross(a, b, p) < -1e-9 {
            return false;
        }
    }
    true
}
