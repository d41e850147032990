//! Per-triangle pixel transfer between images.

use image::RgbImage;

use crate::geometry::{self, AffineTransform, Point, Rect};

/// Triangles with less area than this (square pixels) are rejected before
/// the affine solve; they cannot produce a stable transform.
const MIN_TRIANGLE_AREA: f64 = 1e-4;

/// Why a single triangle warp was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarpSkip {
    /// The point correspondences were collinear or repeated, leaving the
    /// affine solve singular.
    DegenerateTransform,
    /// The destination triangle does not overlap the destination image.
    OutsideImage,
}

impl std::fmt::Display for WarpSkip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WarpSkip::DegenerateTransform => write!(f, "degenerate transform"),
            WarpSkip::OutsideImage => write!(f, "triangle outside image"),
        }
    }
}

/// Transfer the triangular region `tri_src` of `src` onto `tri_dst` of `dst`.
///
/// The destination is mutated in place. Only pixels inside the convex hull of
/// `tri_dst` (clipped to the image) are written; everything else keeps its
/// original value. Source pixels are bilinear-sampled, clamped at the image
/// edges. A skipped warp leaves `dst` completely untouched.
pub fn warp_triangle(
    src: &RgbImage,
    dst: &mut RgbImage,
    tri_src: &[Point; 3],
    tri_dst: &[Point; 3],
) -> Result<(), WarpSkip> {
    if geometry::triangle_area(tri_src) < MIN_TRIANGLE_AREA
        || geometry::triangle_area(tri_dst) < MIN_TRIANGLE_AREA
    {
        return Err(WarpSkip::DegenerateTransform);
    }

    let dst_rect = geometry::bounding_rect(tri_dst)
        .intersect(&Rect::of_image(dst.width(), dst.height()))
        .ok_or(WarpSkip::OutsideImage)?;

    // Inverse mapping: walk destination pixels and pull from the source.
    let to_src = AffineTransform::from_triangles(tri_dst, tri_src)
        .ok_or(WarpSkip::DegenerateTransform)?;

    let hull = geometry::convex_hull(tri_dst);
    if hull.len() < 3 {
        return Err(WarpSkip::DegenerateTransform);
    }

    for y in dst_rect.y..dst_rect.bottom() {
        for x in dst_rect.x..dst_rect.right() {
            let p = Point::new(x as f32, y as f32);
            if !geometry::point_in_convex_polygon(p, &hull) {
                continue;
            }
            let q = to_src.apply(p);
            let pixel = sample_bilinear(src, q.x, q.y);
            dst.put_pixel(x as u32, y as u32, pixel);
        }
    }

    Ok(())
}

/// Bilinear sample at `(x, y)`, clamped to the image bounds.
fn sample_bilinear(img: &RgbImage, x: f32, y: f32) -> image::Rgb<u8> {
    let w = img.width() as i32;
    let h = img.height() as i32;

    let x = x.clamp(0.0, (w - 1) as f32);
    let y = y.clamp(0.0, (h - 1) as f32);
    let x0 = x.floor() as i32;
    let y0 = y.floor() as i32;
    let x1 = (x0 + 1).min(w - 1);
    let y1 = (y0 + 1).min(h - 1);
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let p00 = img.get_pixel(x0 as u32, y0 as u32).0;
    let p10 = img.get_pixel(x1 as u32, y0 as u32).0;
    let p01 = img.get_pixel(x0 as u32, y1 as u32).0;
    let p11 = img.get_pixel(x1 as u32, y1 as u32).0;

    let mut out = [0u8; 3];
    for ch in 0..3 {
        let v = (1.0 - fx) * (1.0 - fy) * p00[ch] as f32
            + fx * (1.0 - fy) * p10[ch] as f32
            + (1.0 - fx) * fy * p01[ch] as f32
            + fx * fy * p11[ch] as f32;
        out[ch] = (v + 0.5).clamp(0.0, 255.0) as u8;
    }
    image::Rgb(out)
}
