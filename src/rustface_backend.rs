//! SeetaFace-based landmark backend built on the `rustface` crate.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::RgbImage;

use crate::error::FaceSwapError;
use crate::geometry::Point;
use crate::landmarks::{LandmarkDetector, LandmarkSet};

/// Five reference points (eyes, nose tip, mouth corners) as fractions of a
/// detected face box, derived from the ArcFace 112x112 alignment template.
const FACE_TEMPLATE: [(f32, f32); 5] = [
    (0.3419, 0.4616), // left eye
    (0.6565, 0.4598), // right eye
    (0.5002, 0.6405), // nose tip
    (0.3710, 0.8247), // left mouth corner
    (0.6315, 0.8232), // right mouth corner
];

/// Landmark backend that runs SeetaFace detection and places a fixed
/// five-point template inside the highest-scoring face box.
///
/// The template placement assumes a roughly frontal face filling the detected
/// box. It is an approximation, but good enough to drive the triangle warp
/// without any model files beyond the SeetaFace detector itself.
pub struct RustfaceLandmarker {
    model: rustface::Model,
}

impl RustfaceLandmarker {
    /// Load the SeetaFace frontal-face model from `path`.
    pub fn from_model_path(path: impl AsRef<Path>) -> Result<Self, FaceSwapError> {
        let file = File::open(path).map_err(|e| FaceSwapError::ModelError(e.to_string()))?;
        let model = rustface::read_model(BufReader::new(file))
            .map_err(|e| FaceSwapError::ModelError(e.to_string()))?;
        Ok(Self { model })
    }
}

impl LandmarkDetector for RustfaceLandmarker {
    fn detect_landmarks(&self, image: &RgbImage) -> Option<LandmarkSet> {
        let gray = image::imageops::grayscale(image);
        let (width, height) = (gray.width(), gray.height());

        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(20);
        detector.set_score_thresh(2.0);
        detector.set_pyramid_scale_factor(0.8);
        detector.set_slide_window_step(4, 4);

        let faces = detector.detect(&rustface::ImageData::new(gray.as_raw(), width, height));
        if faces.len() > 1 {
            log::debug!("{} faces detected, keeping the highest-scoring one", faces.len());
        }

        // At most one face is processed, even in group shots.
        let face = faces.iter().max_by(|a, b| {
            a.score()
                .partial_cmp(&b.score())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;

        let bbox = face.bbox();
        let (bx, by) = (bbox.x() as f32, bbox.y() as f32);
        let (bw, bh) = (bbox.width() as f32, bbox.height() as f32);
        let points = FACE_TEMPLATE
            .iter()
            .map(|&(tx, ty)| Point::new(bx + tx * bw, by + ty * bh))
            .collect();
        Some(LandmarkSet::new(points))
    }
}
