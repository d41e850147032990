//! Landmark-based face region transfer between portrait images.
//!
//! Given two single-face images, the facial region of the source is carried
//! onto the destination triangle-by-triangle: landmarks are extracted from
//! both images, a Delaunay triangulation is built over the destination
//! landmarks, and each triangle is affine-warped from the source and
//! composited inside its convex hull. Per-triangle failures are skipped and
//! reported, never escalated.
//!
//! # Example
//!
//! ```no_run
//! use faceswap::{FaceSwapper, LandmarkDetector, LandmarkSet};
//! use image::RgbImage;
//!
//! struct MyDetector;
//! impl LandmarkDetector for MyDetector {
//!     fn detect_landmarks(&self, image: &RgbImage) -> Option<LandmarkSet> {
//!         // Run your detection model here
//!         None
//!     }
//! }
//!
//! let source = image::open("face_a.jpg").unwrap().to_rgb8();
//! let destination = image::open("face_b.jpg").unwrap().to_rgb8();
//!
//! let output = FaceSwapper::new(Box::new(MyDetector))
//!     .swap(&source, &destination)
//!     .unwrap();
//! println!(
//!     "warped {} of {} triangles",
//!     output.report.warped(),
//!     output.report.outcomes.len()
//! );
//! output.save("swapped.jpg").unwrap();
//! ```
#![warn(missing_docs)]

mod delaunay;
mod error;
/// Planar primitives: points, rectangles, affine transforms, convex hulls.
pub mod geometry;
/// Landmark sets and the detection backend trait.
pub mod landmarks;
#[cfg(feature = "rustface")]
/// Built-in SeetaFace-based landmark backend.
pub mod rustface_backend;
mod swap;
/// Per-triangle region warping.
pub mod warp;

/// Error type returned by faceswap operations.
pub use error::{FaceSwapError, ImageRole};
/// Landmark detection trait and point-set type.
pub use landmarks::{LandmarkDetector, LandmarkSet};
#[cfg(feature = "rustface")]
/// Built-in detector that loads a SeetaFace model from disk.
pub use rustface_backend::RustfaceLandmarker;
/// Swap results and per-triangle accounting.
pub use swap::{OutputFormat, SwapOutput, SwapReport, WarpOutcome, MAX_LANDMARK_PAIRS};
/// Per-triangle skip reasons.
pub use warp::WarpSkip;

use image::RgbImage;

/// Builder for face-swap calls.
///
/// Holds the detection backend and per-call limits; each [`swap`] invocation
/// is independent and returns its output in memory, so concurrent calls never
/// contend on shared state.
///
/// [`swap`]: FaceSwapper::swap
pub struct FaceSwapper {
    detector: Box<dyn LandmarkDetector>,
    max_landmarks: usize,
}

impl FaceSwapper {
    /// Create a swapper with the given landmark detection backend.
    pub fn new(detector: Box<dyn LandmarkDetector>) -> Self {
        Self {
            detector,
            max_landmarks: MAX_LANDMARK_PAIRS,
        }
    }

    /// Limit the number of landmark pairs processed per call.
    ///
    /// Values above [`MAX_LANDMARK_PAIRS`] are clamped to it; the ceiling
    /// bounds worst-case warp cost no matter how many points the detector
    /// emits.
    pub fn max_landmarks(mut self, limit: usize) -> Self {
        self.max_landmarks = limit.min(MAX_LANDMARK_PAIRS);
        self
    }

    /// Swap the facial region of `source` onto a copy of `destination`.
    ///
    /// Both images must be at least 2x2 pixels. Returns the composited image
    /// and a per-triangle [`SwapReport`]; landmark extraction failure on
    /// either image aborts with [`FaceSwapError::NoFaceDetected`].
    pub fn swap(
        &self,
        source: &RgbImage,
        destination: &RgbImage,
    ) -> Result<SwapOutput, FaceSwapError> {
        if self.max_landmarks == 0 {
            return Err(FaceSwapError::InvalidMaxLandmarks);
        }
        swap::swap_pipeline(
            self.detector.as_ref(),
            source,
            destination,
            self.max_landmarks,
        )
    }

    /// Decode two raw image buffers (JPEG, PNG, or WebP) and swap.
    ///
    /// Alpha channels are flattened over white before processing.
    pub fn swap_bytes(
        &self,
        source: &[u8],
        destination: &[u8],
    ) -> Result<SwapOutput, FaceSwapError> {
        let src = swap::decode_rgb(source, ImageRole::Source)?;
        let dst = swap::decode_rgb(destination, ImageRole::Destination)?;
        self.swap(&src, &dst)
    }
}
