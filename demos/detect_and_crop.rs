//! Detect faces in a photo, then write an annotated overlay and a padded
//! crop of the largest face next to it.
//!
//! Usage:
//!   cargo run --example detect_and_crop -- <model.bin> <photo.jpg> [padding]

use facecrop::{
    crop_to_largest_face, draw_regions, ColorMode, DetectionParams, EncodeFormat, FaceDetector,
    ImageHandle,
};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("usage: detect_and_crop <model.bin> <photo> [padding]");
        std::process::exit(2);
    }
    let model_path = &args[1];
    let photo_path = &args[2];
    let padding: f32 = args.get(3).map(|p| p.parse().unwrap()).unwrap_or(0.2);

    let bytes = std::fs::read(photo_path).expect("failed to read photo");
    let image = ImageHandle::decode(&bytes, ColorMode::Color).expect("failed to decode photo");
    let (width, height) = image.dimensions().unwrap();
    println!("{photo_path}: {width}x{height}");

    let mut detector = FaceDetector::new();
    detector.load_model(model_path).expect("failed to load model");

    let regions = detector
        .detect(&image, &DetectionParams::default())
        .expect("detection failed");
    println!("found {} face(s)", regions.len());
    for (i, r) in regions.iter().enumerate() {
        println!("  face {i}: {}x{} at ({}, {})", r.width, r.height, r.x, r.y);
    }

    if regions.is_empty() {
        return;
    }

    let annotated = draw_regions(&image, &regions).unwrap();
    let overlay_path = format!("{photo_path}.faces.png");
    std::fs::write(&overlay_path, annotated.encode(EncodeFormat::Png).unwrap()).unwrap();
    println!("wrote {overlay_path}");

    let face = crop_to_largest_face(&image, &detector, padding).unwrap();
    let (fw, fh) = face.dimensions().unwrap();
    let crop_path = format!("{photo_path}.face.jpg");
    std::fs::write(&crop_path, face.encode(EncodeFormat::Jpeg).unwrap()).unwrap();
    println!("wrote {crop_path} ({fw}x{fh}, padding {padding})");
}
