use faceswap::geometry::Point;
use faceswap::{
    FaceSwapError, FaceSwapper, ImageRole, LandmarkDetector, LandmarkSet, WarpOutcome,
};
use image::RgbImage;

/// Deterministic stand-in for a portrait photo.
fn portrait(width: u32, height: u32, seed: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([
            ((x * 7 + seed * 31) % 256) as u8,
            ((y * 5 + seed * 17) % 256) as u8,
            ((x + y + seed) % 256) as u8,
        ])
    })
}

fn png_bytes(img: &RgbImage) -> Vec<u8> {
    use image::codecs::png::PngEncoder;
    use image::ImageEncoder;

    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgb8,
        )
        .unwrap();
    buffer
}

/// Detector that never finds a face (blank/white inputs behave this way).
struct NoFaceDetector;

impl LandmarkDetector for NoFaceDetector {
    fn detect_landmarks(&self, _image: &RgbImage) -> Option<LandmarkSet> {
        None
    }
}

/// Lays a `per_side` x `per_side` grid of landmarks over the central region
/// of the image, with a small deterministic jitter so grid cells are not
/// cocircular.
struct GridDetector {
    per_side: u32,
}

impl GridDetector {
    fn landmarks_for(&self, width: u32, height: u32) -> Vec<Point> {
        let (w, h) = (width as f32, height as f32);
        let n = self.per_side;
        let mut points = Vec::with_capacity((n * n) as usize);
        for row in 0..n {
            for col in 0..n {
                let fx = (col as f32 + 1.0) / (n as f32 + 1.0);
                let fy = (row as f32 + 1.0) / (n as f32 + 1.0);
                let jitter = ((row * n + col) % 3) as f32 * 0.37;
                points.push(Point::new(fx * w + jitter, fy * h - jitter));
            }
        }
        points
    }
}

impl LandmarkDetector for GridDetector {
    fn detect_landmarks(&self, image: &RgbImage) -> Option<LandmarkSet> {
        Some(LandmarkSet::new(
            self.landmarks_for(image.width(), image.height()),
        ))
    }
}

/// Grid detector that corrupts the source image's landmarks by collapsing
/// the first two points onto each other. Keyed on image width so the two
/// inputs of one call can behave differently.
struct CorruptingDetector {
    inner: GridDetector,
    corrupt_width: u32,
}

impl LandmarkDetector for CorruptingDetector {
    fn detect_landmarks(&self, image: &RgbImage) -> Option<LandmarkSet> {
        let mut points = self.inner.landmarks_for(image.width(), image.height());
        if image.width() == self.corrupt_width {
            points[1] = points[0];
        }
        Some(LandmarkSet::new(points))
    }
}

/// Detector whose landmark count depends on the image width.
struct CountBySize;

impl LandmarkDetector for CountBySize {
    fn detect_landmarks(&self, image: &RgbImage) -> Option<LandmarkSet> {
        let per_side = if image.width() < 220 { 3 } else { 5 };
        Some(LandmarkSet::new(
            GridDetector { per_side }.landmarks_for(image.width(), image.height()),
        ))
    }
}

#[test]
fn no_face_in_source_reports_source_role() {
    let img = portrait(100, 100, 1);
    let result = FaceSwapper::new(Box::new(NoFaceDetector)).swap(&img, &img);
    assert!(matches!(
        result,
        Err(FaceSwapError::NoFaceDetected(ImageRole::Source))
    ));
}

#[test]
fn blank_white_image_yields_no_face() {
    // A uniform white raster has nothing to detect; the detector contract is
    // to return None, which the pipeline surfaces as NoFaceDetected.
    let blank = RgbImage::from_pixel(100, 100, image::Rgb([255, 255, 255]));
    let result = FaceSwapper::new(Box::new(NoFaceDetector)).swap(&blank, &blank);
    assert!(result.is_err());
}

#[test]
fn two_portraits_produce_destination_sized_output() {
    let src = portrait(256, 256, 7);
    let dst = portrait(256, 256, 3);
    let output = FaceSwapper::new(Box::new(GridDetector { per_side: 4 }))
        .swap(&src, &dst)
        .unwrap();

    assert_eq!(output.image.dimensions(), (256, 256));
    assert!(output.report.warped() > 0);
    assert_eq!(
        output.report.outcomes.len(),
        output.report.warped() + output.report.skipped()
    );
}

#[test]
fn warps_change_only_the_landmark_region() {
    let src = portrait(256, 256, 7);
    let dst = portrait(256, 256, 3);
    let output = FaceSwapper::new(Box::new(GridDetector { per_side: 4 }))
        .swap(&src, &dst)
        .unwrap();

    // Corners lie outside the landmark grid's hull and must be untouched.
    for &(x, y) in &[(0u32, 0u32), (255, 0), (0, 255), (255, 255)] {
        assert_eq!(output.image.get_pixel(x, y), dst.get_pixel(x, y));
    }
    // The interior was transferred from the source, which differs from the
    // destination everywhere.
    assert_ne!(output.image.as_raw(), dst.as_raw());
}

#[test]
fn landmark_pairs_capped_at_one_hundred() {
    // 12x12 grid = 144 landmarks per image, above the ceiling.
    let src = portrait(256, 256, 1);
    let dst = portrait(256, 256, 2);
    let output = FaceSwapper::new(Box::new(GridDetector { per_side: 12 }))
        .swap(&src, &dst)
        .unwrap();
    assert_eq!(output.report.landmark_pairs, 100);
}

#[test]
fn landmark_pairs_use_the_smaller_count() {
    // Source gets 9 landmarks, destination 25; only 9 pairs are usable.
    let src = portrait(200, 200, 1);
    let dst = portrait(256, 256, 2);
    let output = FaceSwapper::new(Box::new(CountBySize))
        .swap(&src, &dst)
        .unwrap();
    assert_eq!(output.report.landmark_pairs, 9);
}

#[test]
fn corrupted_landmark_pair_does_not_abort_the_run() {
    let src = portrait(200, 200, 9);
    let dst = portrait(256, 256, 4);
    let detector = CorruptingDetector {
        inner: GridDetector { per_side: 4 },
        corrupt_width: 200,
    };
    let output = FaceSwapper::new(Box::new(detector)).swap(&src, &dst).unwrap();

    // Triangles touching the collapsed source pair are skipped, the rest warp.
    assert!(output.report.skipped() > 0, "expected degenerate skips");
    assert!(output.report.warped() > 0, "expected surviving warps");
    assert!(output
        .report
        .outcomes
        .iter()
        .any(|o| matches!(o, WarpOutcome::Skipped(_))));
    assert_eq!(output.image.dimensions(), (256, 256));
}

#[test]
fn swap_is_idempotent_for_a_deterministic_detector() {
    let src = portrait(128, 128, 11);
    let dst = portrait(128, 128, 5);
    let swapper = FaceSwapper::new(Box::new(GridDetector { per_side: 5 }));

    let first = swapper.swap(&src, &dst).unwrap();
    let second = swapper.swap(&src, &dst).unwrap();
    assert_eq!(first.image.as_raw(), second.image.as_raw());
}

#[test]
fn one_pixel_image_is_rejected_not_crashed() {
    let tiny = RgbImage::new(1, 1);
    let dst = portrait(128, 128, 5);
    let result = FaceSwapper::new(Box::new(GridDetector { per_side: 4 })).swap(&tiny, &dst);
    assert!(matches!(
        result,
        Err(FaceSwapError::ImageTooSmall {
            role: ImageRole::Source,
            ..
        })
    ));
}

#[test]
fn saved_output_is_a_decodable_image() {
    let src = portrait(96, 96, 7);
    let dst = portrait(96, 96, 2);
    let output = FaceSwapper::new(Box::new(GridDetector { per_side: 4 }))
        .swap(&src, &dst)
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("swapped.png");
    output.save(&path).unwrap();

    let reloaded = image::open(&path).unwrap().to_rgb8();
    assert_eq!(reloaded.dimensions(), (96, 96));
    assert_eq!(reloaded.as_raw(), output.image.as_raw());
}

#[test]
fn save_to_bad_path_is_a_write_error() {
    let src = portrait(64, 64, 1);
    let dst = portrait(64, 64, 2);
    let output = FaceSwapper::new(Box::new(GridDetector { per_side: 4 }))
        .swap(&src, &dst)
        .unwrap();

    let result = output.save("/nonexistent-dir/swapped.png");
    assert!(matches!(result, Err(FaceSwapError::WriteError(_))));
}

#[test]
fn swap_bytes_accepts_encoded_inputs() {
    let src = png_bytes(&portrait(128, 128, 8));
    let dst = png_bytes(&portrait(128, 128, 3));
    let output = FaceSwapper::new(Box::new(GridDetector { per_side: 4 }))
        .swap_bytes(&src, &dst)
        .unwrap();
    assert_eq!(output.image.dimensions(), (128, 128));
    assert!(output.report.warped() > 0);
}

#[test]
fn swap_bytes_rejects_undecodable_destination() {
    let src = png_bytes(&portrait(64, 64, 8));
    let result =
        FaceSwapper::new(Box::new(GridDetector { per_side: 4 })).swap_bytes(&src, b"junk");
    assert!(matches!(
        result,
        Err(FaceSwapError::DecodeError {
            role: ImageRole::Destination,
            ..
        })
    ));
}
