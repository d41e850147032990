//! Swap pipeline: validate, extract landmarks, triangulate, warp, report.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ImageEncoder, RgbImage};

use crate::delaunay;
use crate::error::{FaceSwapError, ImageRole};
use crate::landmarks::LandmarkDetector;
use crate::warp::{self, WarpSkip};

/// Hard ceiling on landmark pairs per call, bounding worst-case warp cost.
pub const MAX_LANDMARK_PAIRS: usize = 100;

/// Inputs below this width/height cannot hold a warpable region.
const MIN_IMAGE_DIMENSION: u32 = 2;

/// Outcome of one attempted triangle warp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarpOutcome {
    /// The triangle was transferred onto the output image.
    Warped,
    /// The triangle was skipped and its destination region left unchanged.
    Skipped(WarpSkip),
}

/// Per-call accounting of what the warp loop did.
///
/// Skips are recovered locally and never abort the call; this report is how
/// callers observe partial failure.
#[derive(Debug, Clone, Default)]
pub struct SwapReport {
    /// Landmark pairs used: min(source count, destination count, limit).
    pub landmark_pairs: usize,
    /// One entry per triangle in the destination triangulation, in warp order.
    pub outcomes: Vec<WarpOutcome>,
}

impl SwapReport {
    /// Number of triangles transferred onto the output.
    pub fn warped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, WarpOutcome::Warped))
            .count()
    }

    /// Number of triangles skipped.
    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.warped()
    }
}

/// Output encoding for [`SwapOutput::encode`].
#[derive(Debug, Clone, Default)]
pub enum OutputFormat {
    /// JPEG encoding at a configurable quality.
    #[default]
    Jpeg,
    /// Lossless PNG encoding (the quality parameter is ignored).
    Png,
}

/// Composited image plus the warp accounting for the call.
#[derive(Debug, Clone)]
pub struct SwapOutput {
    /// The composited image, same dimensions as the destination input.
    pub image: RgbImage,
    /// What happened to each triangle.
    pub report: SwapReport,
}

impl SwapOutput {
    /// Write the composited image to `path`, choosing the container format
    /// from the file extension.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<(), FaceSwapError> {
        self.image
            .save(path)
            .map_err(|e| FaceSwapError::WriteError(e.to_string()))
    }

    /// Encode the composited image to an in-memory buffer.
    ///
    /// `quality` is 0.0–1.0 and applies to JPEG only; out-of-range values are
    /// clamped.
    pub fn encode(&self, format: &OutputFormat, quality: f32) -> Result<Vec<u8>, FaceSwapError> {
        let mut buffer = Vec::new();
        match format {
            OutputFormat::Jpeg => {
                let quality_percent = (quality.clamp(0.0, 1.0) * 100.0).round().max(1.0) as u8;
                let encoder = JpegEncoder::new_with_quality(&mut buffer, quality_percent);
                encoder
                    .write_image(
                        self.image.as_raw(),
                        self.image.width(),
                        self.image.height(),
                        image::ExtendedColorType::Rgb8,
                    )
                    .map_err(|e| FaceSwapError::EncodeError(e.to_string()))?;
            }
            OutputFormat::Png => {
                let encoder = PngEncoder::new(&mut buffer);
                encoder
                    .write_image(
                        self.image.as_raw(),
                        self.image.width(),
                        self.image.height(),
                        image::ExtendedColorType::Rgb8,
                    )
                    .map_err(|e| FaceSwapError::EncodeError(e.to_string()))?;
            }
        }
        Ok(buffer)
    }
}

/// Run the full swap: the facial region of `source` composited onto a copy
/// of `destination`.
///
/// Linear pipeline, no retries. Per-triangle failures are logged, recorded in
/// the report, and never escalated.
pub(crate) fn swap_pipeline(
    detector: &dyn LandmarkDetector,
    source: &RgbImage,
    destination: &RgbImage,
    max_landmarks: usize,
) -> Result<SwapOutput, FaceSwapError> {
    validate_dimensions(source, ImageRole::Source)?;
    validate_dimensions(destination, ImageRole::Destination)?;

    let lm_src = detector
        .detect_landmarks(source)
        .filter(|l| !l.is_empty())
        .ok_or(FaceSwapError::NoFaceDetected(ImageRole::Source))?;
    let lm_dst = detector
        .detect_landmarks(destination)
        .filter(|l| !l.is_empty())
        .ok_or(FaceSwapError::NoFaceDetected(ImageRole::Destination))?;

    let pair_count = lm_src
        .len()
        .min(lm_dst.len())
        .min(max_landmarks.min(MAX_LANDMARK_PAIRS));

    // Triangulate over the destination landmarks; source triangles are looked
    // up by index, so every vertex index stays below pair_count.
    let triangles = delaunay::triangulate(&lm_dst.points()[..pair_count]);
    if triangles.is_empty() {
        log::debug!("no usable triangles from {pair_count} landmark pairs");
    }

    let mut output = destination.clone();
    let mut outcomes = Vec::with_capacity(triangles.len());
    for (index, tri) in triangles.iter().enumerate() {
        let tri_src = [
            lm_src.points()[tri[0]],
            lm_src.points()[tri[1]],
            lm_src.points()[tri[2]],
        ];
        let tri_dst = [
            lm_dst.points()[tri[0]],
            lm_dst.points()[tri[1]],
            lm_dst.points()[tri[2]],
        ];
        match warp::warp_triangle(source, &mut output, &tri_src, &tri_dst) {
            Ok(()) => outcomes.push(WarpOutcome::Warped),
            Err(skip) => {
                log::debug!("triangle {index} skipped: {skip}");
                outcomes.push(WarpOutcome::Skipped(skip));
            }
        }
    }

    Ok(SwapOutput {
        image: output,
        report: SwapReport {
            landmark_pairs: pair_count,
            outcomes,
        },
    })
}

fn validate_dimensions(image: &RgbImage, role: ImageRole) -> Result<(), FaceSwapError> {
    let (width, height) = image.dimensions();
    if width < MIN_IMAGE_DIMENSION || height < MIN_IMAGE_DIMENSION {
        return Err(FaceSwapError::ImageTooSmall {
            role,
            width,
            height,
        });
    }
    Ok(())
}

/// Decode raw bytes to RGB, compositing any alpha channel over white.
pub(crate) fn decode_rgb(input: &[u8], role: ImageRole) -> Result<RgbImage, FaceSwapError> {
    let decoded = image::load_from_memory(input).map_err(|e| FaceSwapError::DecodeError {
        role,
        reason: e.to_string(),
    })?;
    Ok(flatten_alpha(&decoded))
}

fn flatten_alpha(image: &image::DynamicImage) -> RgbImage {
    let rgba = image.to_rgba8();
    let mut rgb = RgbImage::new(rgba.width(), rgba.height());
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as f32 / 255.0;
        let blend = |v: u8| (v as f32 * alpha + 255.0 * (1.0 - alpha)).round() as u8;
        rgb.put_pixel(x, y, image::Rgb([blend(r), blend(g), blend(b)]));
    }
    rgb
}
