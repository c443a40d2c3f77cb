//! Face region detection, padded cropping, and annotation for still images.
//!
//! The crate takes raw encoded image bytes, finds rectangular face regions
//! in them, and produces derived artifacts: padded crops of the largest
//! face, or copies with every region outlined. Pixel buffers live behind
//! the value-semantic [`ImageHandle`]; detection runs through a
//! caller-owned [`FaceDetector`] whose backend is pluggable via
//! [`FaceScanner`].
//!
//! # Example
//!
//! ```no_run
//! use facecrop::{ColorMode, FaceDetector, ImageHandle};
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let image = ImageHandle::decode(&bytes, ColorMode::Color).unwrap();
//!
//! let mut detector = FaceDetector::new();
//! detector.load_model("seeta_fd_frontal_v1.0.bin").unwrap();
//!
//! let face = facecrop::crop_to_largest_face(&image, &detector, 0.2).unwrap();
//! println!("cropped to {:?}", face.dimensions().unwrap());
//! ```
#![warn(missing_docs)]

mod annotate;
mod crop;
mod error;
/// Face detection traits and data types.
pub mod face_detector;
mod handle;
mod region;
#[cfg(feature = "rustface")]
/// Built-in SeetaFace-based scanner backend.
pub mod rustface_backend;

use tracing::debug;

/// Region outline rendering.
pub use annotate::draw_regions;
/// Padded-crop geometry and the crop operation.
pub use crop::{crop, padded_crop};
/// Error type returned by facecrop operations.
pub use error::FaceCropError;
/// Detector types: scan contract, parameters, raw bounds.
pub use face_detector::{DetectionParams, FaceBounds, FaceDetector, FaceScanner};
/// Image decode/encode and the owned handle type.
pub use handle::{ColorMode, EncodeFormat, EncodeOptions, ImageHandle, PngCompression};
/// Face region value type and largest-area selection.
pub use region::{largest, Region};
#[cfg(feature = "rustface")]
/// Built-in scanner that loads a SeetaFace model from a file.
pub use rustface_backend::RustfaceScanner;

/// Detect faces, pick the largest, and crop to it with padding.
///
/// Runs [`FaceDetector::detect`] with [`DetectionParams::default`], selects
/// the largest region, grows it by `padding_ratio` via [`padded_crop`], and
/// returns the cropped pixels as a new handle.
///
/// Fails with [`FaceCropError::NoFacesFound`] when detection succeeds but
/// reports nothing. That condition is distinct from decode, geometry, and
/// model errors, so
/// callers can treat "no face in this photo" as its own condition.
pub fn crop_to_largest_face(
    image: &ImageHandle,
    detector: &FaceDetector,
    padding_ratio: f32,
) -> Result<ImageHandle, FaceCropError> {
    let regions = detector.detect(image, &DetectionParams::default())?;
    if regions.is_empty() {
        return Err(FaceCropError::NoFacesFound);
    }

    let face = region::largest(&regions)?;
    let padded = crop::padded_crop(image, &face, padding_ratio)?;
    debug!(
        faces = regions.len(),
        x = padded.x,
        y = padded.y,
        width = padded.width,
        height = padded.height,
        "cropping to largest face"
    );
    crop::crop(image, &padded)
}
