use facecrop::{
    crop_to_largest_face, draw_regions, largest, padded_crop, ColorMode, DetectionParams,
    EncodeFormat, FaceBounds, FaceCropError, FaceDetector, FaceScanner, ImageHandle, Region,
};

/// Build a PNG gradient in memory; no fixture files needed.
fn make_test_png(width: u32, height: u32) -> Vec<u8> {
    use image::ImageEncoder;

    let mut img = image::RgbImage::new(width, height);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        *pixel = image::Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            128,
        ]);
    }
    let mut buffer = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut buffer);
    encoder
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    buffer
}

fn decode_test_image(width: u32, height: u32) -> ImageHandle {
    ImageHandle::decode(&make_test_png(width, height), ColorMode::Color).unwrap()
}

/// Mock scanner returning a fixed set of boxes.
struct MockScanner {
    faces: Vec<FaceBounds>,
}

impl MockScanner {
    fn with_face(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            faces: vec![FaceBounds {
                x,
                y,
                width,
                height,
                confidence: 10.0,
            }],
        }
    }

    fn with_no_faces() -> Self {
        Self { faces: vec![] }
    }
}

impl FaceScanner for MockScanner {
    fn scan(
        &self,
        _gray: &[u8],
        _width: u32,
        _height: u32,
        _params: &DetectionParams,
    ) -> Vec<FaceBounds> {
        self.faces.clone()
    }
}

#[test]
fn detect_then_crop_pipeline() {
    let image = decode_test_image(640, 480);
    let detector =
        FaceDetector::with_scanner(Box::new(MockScanner::with_face(100.0, 80.0, 200.0, 200.0)));

    let regions = detector.detect(&image, &DetectionParams::default()).unwrap();
    assert_eq!(
        regions,
        vec![Region {
            x: 100,
            y: 80,
            width: 200,
            height: 200
        }]
    );

    let padded = padded_crop(&image, &regions[0], 0.2).unwrap();
    assert_eq!(
        padded,
        Region {
            x: 60,
            y: 40,
            width: 280,
            height: 280
        }
    );

    let cropped = facecrop::crop(&image, &padded).unwrap();
    assert_eq!(cropped.dimensions().unwrap(), (280, 280));
    // Source survives the whole pipeline untouched.
    assert_eq!(image.dimensions().unwrap(), (640, 480));
}

#[test]
fn crop_to_largest_face_end_to_end() {
    let image = decode_test_image(640, 480);
    let detector = FaceDetector::with_scanner(Box::new(MockScanner {
        faces: vec![
            FaceBounds {
                x: 10.0,
                y: 10.0,
                width: 40.0,
                height: 40.0,
                confidence: 3.0,
            },
            FaceBounds {
                x: 100.0,
                y: 80.0,
                width: 200.0,
                height: 200.0,
                confidence: 8.0,
            },
        ],
    }));

    let cropped = crop_to_largest_face(&image, &detector, 0.2).unwrap();
    // The larger face wins; 200x200 padded by 40 on each side.
    assert_eq!(cropped.dimensions().unwrap(), (280, 280));
}

#[test]
fn crop_to_largest_face_zero_padding_is_exact() {
    let image = decode_test_image(640, 480);
    let detector =
        FaceDetector::with_scanner(Box::new(MockScanner::with_face(100.0, 80.0, 200.0, 200.0)));

    let cropped = crop_to_largest_face(&image, &detector, 0.0).unwrap();
    assert_eq!(cropped.dimensions().unwrap(), (200, 200));
}

#[test]
fn no_faces_is_its_own_error() {
    let image = decode_test_image(640, 480);
    let detector = FaceDetector::with_scanner(Box::new(MockScanner::with_no_faces()));

    let result = crop_to_largest_face(&image, &detector, 0.2);
    assert!(matches!(result, Err(FaceCropError::NoFacesFound)));
}

#[test]
fn corner_face_clamps_padding() {
    // Face at the top-left corner: padding only extends right and down.
    let image = decode_test_image(640, 480);
    let detector =
        FaceDetector::with_scanner(Box::new(MockScanner::with_face(0.0, 0.0, 50.0, 50.0)));

    let cropped = crop_to_largest_face(&image, &detector, 0.5).unwrap();
    assert_eq!(cropped.dimensions().unwrap(), (75, 75));
}

#[test]
fn unloaded_detector_fails_before_scanning() {
    let image = decode_test_image(64, 64);
    let detector = FaceDetector::new();
    assert!(!detector.is_loaded());

    let result = detector.detect(&image, &DetectionParams::default());
    assert!(matches!(result, Err(FaceCropError::ModelNotLoaded)));
}

#[test]
fn out_of_bounds_scanner_output_is_normalized() {
    let image = decode_test_image(100, 100);
    let detector =
        FaceDetector::with_scanner(Box::new(MockScanner::with_face(-20.0, 60.0, 80.0, 80.0)));

    let regions = detector.detect(&image, &DetectionParams::default()).unwrap();
    assert_eq!(regions.len(), 1);
    assert!(regions[0].fits_within(100, 100));
    assert_eq!(
        regions[0],
        Region {
            x: 0,
            y: 60,
            width: 60,
            height: 40
        }
    );
}

#[test]
fn annotate_then_crop_from_same_source() {
    let image = decode_test_image(640, 480);
    let detector =
        FaceDetector::with_scanner(Box::new(MockScanner::with_face(100.0, 80.0, 200.0, 200.0)));
    let regions = detector.detect(&image, &DetectionParams::default()).unwrap();

    let annotated = draw_regions(&image, &regions).unwrap();
    let cropped = crop_to_largest_face(&image, &detector, 0.0).unwrap();

    // Both artifacts derive from the same untouched source.
    assert_eq!(annotated.dimensions().unwrap(), (640, 480));
    assert_eq!(cropped.dimensions().unwrap(), (200, 200));
    assert_eq!(image.dimensions().unwrap(), (640, 480));
}

#[test]
fn clone_and_source_encode_identically() {
    let image = decode_test_image(120, 90);
    let copy = image.try_clone().unwrap();

    assert_eq!(image.dimensions().unwrap(), copy.dimensions().unwrap());
    assert_eq!(
        image.encode(EncodeFormat::Png).unwrap(),
        copy.encode(EncodeFormat::Png).unwrap()
    );
}

#[test]
fn grayscale_clone_leaves_source_color() {
    let image = decode_test_image(80, 80);
    let gray = image.to_grayscale().unwrap();

    assert_eq!(gray.channels().unwrap(), 1);
    assert_eq!(image.channels().unwrap(), 3);
}

#[test]
fn full_artifact_chain_encodes() {
    // decode, detect, annotate, crop, grayscale, encode: the full
    // enrollment flow, with every intermediate owned and releasable.
    let image = decode_test_image(640, 480);
    let detector =
        FaceDetector::with_scanner(Box::new(MockScanner::with_face(150.0, 120.0, 180.0, 180.0)));

    let regions = detector.detect(&image, &DetectionParams::default()).unwrap();
    let annotated = draw_regions(&image, &regions).unwrap();
    let face = crop_to_largest_face(&image, &detector, 0.1).unwrap();
    let gray_face = face.to_grayscale().unwrap();

    let jpeg = gray_face.encode(EncodeFormat::Jpeg).unwrap();
    assert_eq!(jpeg[0], 0xFF);
    assert_eq!(jpeg[1], 0xD8);

    let overlay_png = annotated.encode(EncodeFormat::Png).unwrap();
    assert!(!overlay_png.is_empty());
}

#[test]
fn largest_selection_matches_detect_output_order() {
    let regions = vec![
        Region {
            x: 0,
            y: 0,
            width: 30,
            height: 40,
        },
        Region {
            x: 50,
            y: 50,
            width: 40,
            height: 30,
        },
    ];
    // Equal areas: the first stays selected however often we ask.
    for _ in 0..3 {
        assert_eq!(largest(&regions).unwrap(), regions[0]);
    }
}

#[test]
fn decode_round_trip_preserves_dimensions() {
    let png = make_test_png(123, 77);
    let first = ImageHandle::decode(&png, ColorMode::Color).unwrap();

    let reencoded = first.encode(EncodeFormat::Png).unwrap();
    let second = ImageHandle::decode(&reencoded, ColorMode::Color).unwrap();
    assert_eq!(second.dimensions().unwrap(), (123, 77));

    let jpeg = first.encode(EncodeFormat::Jpeg).unwrap();
    let third = ImageHandle::decode(&jpeg, ColorMode::Color).unwrap();
    assert_eq!(third.dimensions().unwrap(), (123, 77));
}

#[cfg(feature = "rustface")]
mod rustface_backend {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_model_missing_file_fails() {
        let mut detector = FaceDetector::new();
        let result = detector.load_model("/nonexistent/seeta_model.bin");
        assert!(matches!(result, Err(FaceCropError::ModelLoad(_))));
        assert!(!detector.is_loaded());
    }

    #[test]
    fn load_model_invalid_file_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"definitely not a model").unwrap();

        let mut detector = FaceDetector::new();
        let result = detector.load_model(file.path());
        assert!(matches!(result, Err(FaceCropError::ModelLoad(_))));
    }

    #[test]
    fn detect_after_failed_load_still_reports_not_loaded() {
        let image = decode_test_image(64, 64);
        let mut detector = FaceDetector::new();
        let _ = detector.load_model("/nonexistent/seeta_model.bin");

        let result = detector.detect(&image, &DetectionParams::default());
        assert!(matches!(result, Err(FaceCropError::ModelNotLoaded)));
    }
}
