//! Landmark point sets and the detection backend seam.

use image::RgbImage;

use crate::geometry::Point;

/// Ordered set of 2-D facial reference points in pixel coordinates.
///
/// Index `i` in one set corresponds positionally to index `i` in another set
/// produced by the same detector; the pairing comes from the detection model's
/// fixed output layout, not from image content.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LandmarkSet {
    points: Vec<Point>,
}

impl LandmarkSet {
    /// Wrap an ordered list of landmark points.
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Rescale normalized `[0, 1]` model coordinates to pixel coordinates.
    pub fn from_normalized(normalized: &[(f32, f32)], width: u32, height: u32) -> Self {
        let points = normalized
            .iter()
            .map(|&(x, y)| Point::new(x * width as f32, y * height as f32))
            .collect();
        Self { points }
    }

    /// Number of landmarks in the set.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the set holds no landmarks.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The landmark points in model order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Landmark at `index`, if present.
    pub fn get(&self, index: usize) -> Option<Point> {
        self.points.get(index).copied()
    }
}

/// Pluggable facial landmark detection backend.
///
/// Implement this trait to plug in any detection engine (ONNX, dlib, etc.);
/// the swap pipeline only needs "given an image, return N ordered points or
/// none".
///
/// Contract:
/// - process at most one face, even when several are present;
/// - never panic on malformed input — normalize internal failures to `None`
///   and log them for diagnostics.
pub trait LandmarkDetector: Send + Sync {
    /// Detect facial landmarks in `image`, or return `None` when no face is
    /// found.
    fn detect_landmarks(&self, image: &RgbImage) -> Option<LandmarkSet>;
}
