//! Delaunay triangulation of landmark point sets.
//!
//! Bowyer–Watson incremental insertion with a super triangle. The landmark
//! sets this crate processes are capped at 100 points, so the quadratic
//! cavity search is not worth optimizing.

use crate::geometry::Point;

/// Output triangles with less area than this are dropped as degenerate.
const MIN_AREA: f64 = 1e-9;

/// Triangulate `points`, returning vertex index triples into the input slice.
///
/// Deterministic for a fixed input order. Duplicate points are silently
/// skipped and triangles that collapse to zero area are dropped, so the
/// result may be empty even for three or more input points (e.g. an
/// all-collinear set).
pub fn triangulate(points: &[Point]) -> Vec<[usize; 3]> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }

    // Working vertex list with the three super-triangle corners appended.
    let mut verts: Vec<(f64, f64)> = points
        .iter()
        .map(|p| (p.x as f64, p.y as f64))
        .collect();

    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &(x, y) in &verts {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }
    let dmax = (max_x - min_x).max(max_y - min_y).max(1.0);
    let mid_x = (min_x + max_x) / 2.0;
    let mid_y = (min_y + max_y) / 2.0;
    verts.push((mid_x - 20.0 * dmax, mid_y - dmax));
    verts.push((mid_x, mid_y + 20.0 * dmax));
    verts.push((mid_x + 20.0 * dmax, mid_y - dmax));

    let mut triangles: Vec<[usize; 3]> = vec![[n, n + 1, n + 2]];

    for i in 0..n {
        let p = verts[i];

        // Triangles whose circumcircle contains the new point form the cavity.
        let mut bad: Vec<usize> = Vec::new();
        for (ti, tri) in triangles.iter().enumerate() {
            if circumcircle_contains(verts[tri[0]], verts[tri[1]], verts[tri[2]], p) {
                bad.push(ti);
            }
        }

        // The cavity boundary is every edge owned by exactly one bad triangle.
        let mut boundary: Vec<(usize, usize)> = Vec::new();
        for &ti in &bad {
            let t = triangles[ti];
            for &(a, b) in &[(t[0], t[1]), (t[1], t[2]), (t[2], t[0])] {
                let key = (a.min(b), a.max(b));
                if let Some(pos) = boundary.iter().position(|&e| e == key) {
                    boundary.remove(pos);
                } else {
                    boundary.push(key);
                }
            }
        }

        for &ti in bad.iter().rev() {
            triangles.remove(ti);
        }
        for &(a, b) in &boundary {
            triangles.push([a, b, i]);
        }
    }

    triangles.retain(|t| t.iter().all(|&v| v < n));
    triangles.retain(|t| signed_area(verts[t[0]], verts[t[1]], verts[t[2]]).abs() > MIN_AREA);
    triangles
}

/// Twice the signed area of the triangle `abc`.
fn signed_area(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
    (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0)
}

/// Strict in-circle test, normalized to counter-clockwise orientation.
fn circumcircle_contains(a: (f64, f64), b: (f64, f64), c: (f64, f64), p: (f64, f64)) -> bool {
    let (a, b, c) = if signed_area(a, b, c) < 0.0 {
        (a, c, b)
    } else {
        (a, b, c)
    };
    let (ax, ay) = (a.0 - p.0, a.1 - p.1);
    let (bx, by) = (b.0 - p.0, b.1 - p.1);
    let (cx, cy) = (c.0 - p.0, c.1 - p.1);
    let det = (ax * ax + ay * ay) * (bx * cy - cx * by)
        - (bx * bx + by * by) * (ax * cy - cx * ay)
        + (cx * cx + cy * cy) * (ax * by - bx * ay);
    det > 0.0
}
