use tracing::debug;

use crate::error::FaceCropError;
use crate::handle::ImageHandle;
use crate::region::Region;

/// Raw bounding box reported by a scanner backend.
///
/// Coordinates are in source-image pixels but carry no guarantees: engines
/// may report boxes that are partially or wholly outside the image.
/// [`FaceDetector::detect`] is responsible for turning these into
/// bounds-safe [`Region`]s.
#[derive(Debug, Clone)]
pub struct FaceBounds {
    /// X coordinate of the top-left corner (pixels).
    pub x: f64,
    /// Y coordinate of the top-left corner (pixels).
    pub y: f64,
    /// Width of the bounding box (pixels).
    pub width: f64,
    /// Height of the bounding box (pixels).
    pub height: f64,
    /// Detection confidence score.
    pub confidence: f64,
}

/// Per-call scan parameters. Never stored by the detector.
#[derive(Debug, Clone)]
pub struct DetectionParams {
    /// Pyramid step between scan scales. Must be finite and greater than 1.0.
    pub scale_factor: f32,

    /// Detection strictness: how much corroboration a candidate needs
    /// before it is reported.
    pub min_neighbors: u32,

    /// Smallest face edge, in pixels, worth reporting.
    pub min_size: u32,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            scale_factor: 1.1,
            min_neighbors: 3,
            min_size: 50,
        }
    }
}

impl DetectionParams {
    fn validate(&self) -> Result<(), FaceCropError> {
        if !self.scale_factor.is_finite() || self.scale_factor <= 1.0 {
            return Err(FaceCropError::Detection(format!(
                "scale factor must be > 1.0, got {}",
                self.scale_factor
            )));
        }
        Ok(())
    }
}

/// Pluggable face scanning backend.
///
/// Implement this to adapt a concrete detection engine (ONNX, dlib, a
/// remote service, ...) and pass it to [`FaceDetector::with_scanner`].
pub trait FaceScanner: Send + Sync {
    /// Scan a row-major grayscale buffer of `width` x `height` bytes and
    /// return every candidate box, in whatever order the engine produces.
    fn scan(&self, gray: &[u8], width: u32, height: u32, params: &DetectionParams)
        -> Vec<FaceBounds>;
}

/// Face detector with explicit, caller-owned model state.
///
/// A detector starts unloaded; [`FaceDetector::detect`] fails with
/// [`FaceCropError::ModelNotLoaded`] until either
/// [`FaceDetector::load_model`] succeeds or a custom scanner is supplied.
/// There is no process-wide state: callers wanting concurrency create one
/// detector per thread or serialize access themselves.
#[derive(Default)]
pub struct FaceDetector {
    scanner: Option<Box<dyn FaceScanner>>,
}

impl FaceDetector {
    /// An unloaded detector.
    pub fn new() -> Self {
        Self { scanner: None }
    }

    /// A detector backed by a caller-supplied scanner.
    pub fn with_scanner(scanner: Box<dyn FaceScanner>) -> Self {
        Self {
            scanner: Some(scanner),
        }
    }

    /// Load a SeetaFace model from `path` and make it this detector's
    /// backend. Replaces any previously loaded model.
    #[cfg(feature = "rustface")]
    pub fn load_model<P: AsRef<std::path::Path>>(
        &mut self,
        path: P,
    ) -> Result<(), FaceCropError> {
        let scanner = crate::rustface_backend::RustfaceScanner::from_file(path)?;
        self.scanner = Some(Box::new(scanner));
        Ok(())
    }

    /// Whether a scan backend is available.
    pub fn is_loaded(&self) -> bool {
        self.scanner.is_some()
    }

    /// Detect face regions in `image`.
    ///
    /// Multi-channel images are converted to intensity for the scan (the
    /// scanner contract is single-channel). Raw scanner output is clamped
    /// into the image: negative origins are moved to zero, extents are
    /// clipped, and boxes that end up degenerate or wholly outside are
    /// dropped. Returns an empty vector (never an error) when nothing is
    /// found, in the order the scanner reported; callers must not assume
    /// spatial or size ordering.
    pub fn detect(
        &self,
        image: &ImageHandle,
        params: &DetectionParams,
    ) -> Result<Vec<Region>, FaceCropError> {
        if image.is_empty() {
            return Err(FaceCropError::Detection(
                "cannot detect faces in an empty image".to_string(),
            ));
        }
        params.validate()?;

        let scanner = self
            .scanner
            .as_deref()
            .ok_or(FaceCropError::ModelNotLoaded)?;

        let gray = image.intensity_buffer();
        let (width, height) = (gray.width(), gray.height());

        let raw = scanner.scan(gray.as_raw(), width, height, params);
        let regions: Vec<Region> = raw
            .iter()
            .filter_map(|bounds| clamp_to_image(bounds, width, height))
            .collect();

        debug!(
            raw = raw.len(),
            kept = regions.len(),
            width,
            height,
            "face scan complete"
        );

        Ok(regions)
    }
}

/// Clamp a raw scanner box into a bounds-safe region, or drop it.
fn clamp_to_image(bounds: &FaceBounds, img_w: u32, img_h: u32) -> Option<Region> {
    if !(bounds.x.is_finite()
        && bounds.y.is_finite()
        && bounds.width.is_finite()
        && bounds.height.is_finite())
    {
        return None;
    }

    let left = bounds.x.max(0.0).floor() as i64;
    let top = bounds.y.max(0.0).floor() as i64;
    let right = ((bounds.x + bounds.width).ceil() as i64).min(i64::from(img_w));
    let bottom = ((bounds.y + bounds.height).ceil() as i64).min(i64::from(img_h));

    if right <= left || bottom <= top {
        return None;
    }

    Some(Region {
        x: left as u32,
        y: top as u32,
        width: (right - left) as u32,
        height: (bottom - top) as u32,
    })
}
