use std::path::Path;

use tracing::info;

use crate::error::FaceCropError;
use crate::face_detector::{DetectionParams, FaceBounds, FaceScanner};

/// The SeetaFace engine rejects face sizes below 20 pixels.
const ENGINE_MIN_FACE_SIZE: u32 = 20;

/// Score threshold below which SeetaFace output is mostly noise.
const ENGINE_MIN_SCORE: f64 = 2.0;

/// Face scanner backed by the `rustface` crate (SeetaFace engine).
///
/// The model is read from a caller-supplied file; nothing is bundled into
/// the binary. Scanning creates a fresh engine instance from the parsed
/// model on every call, so a loaded scanner is immutable and can back any
/// number of detections.
pub struct RustfaceScanner {
    model: rustface::Model,
}

impl RustfaceScanner {
    /// Read and validate a SeetaFace model file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, FaceCropError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            FaceCropError::ModelLoad(format!("cannot read {}: {e}", path.display()))
        })?;
        let model = rustface::read_model(std::io::Cursor::new(bytes))
            .map_err(|e| FaceCropError::ModelLoad(e.to_string()))?;

        info!(path = %path.display(), "detection model loaded");
        Ok(Self { model })
    }
}

impl FaceScanner for RustfaceScanner {
    fn scan(
        &self,
        gray: &[u8],
        width: u32,
        height: u32,
        params: &DetectionParams,
    ) -> Vec<FaceBounds> {
        let mut detector = rustface::create_detector_with_model(self.model.clone());

        // Map the scan parameters onto the engine's knobs. SeetaFace walks
        // the pyramid downward, so its scale factor is the reciprocal of
        // the upward step, and its score threshold plays the corroboration
        // role of a neighbor count.
        detector.set_min_face_size(params.min_size.max(ENGINE_MIN_FACE_SIZE));
        detector.set_score_thresh(f64::from(params.min_neighbors).max(ENGINE_MIN_SCORE));
        detector.set_pyramid_scale_factor((1.0 / params.scale_factor).clamp(0.1, 0.99));
        detector.set_slide_window_step(4, 4);

        let faces = detector.detect(&rustface::ImageData::new(gray, width, height));

        faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                FaceBounds {
                    x: f64::from(bbox.x()),
                    y: f64::from(bbox.y()),
                    width: f64::from(bbox.width()),
                    height: f64::from(bbox.height()),
                    confidence: face.score(),
                }
            })
            .collect()
    }
}
