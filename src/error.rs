use thiserror::Error;

#[derive(Debug, Error)]
pub enum FaceCropError {
    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("failed to encode image: {0}")]
    Encode(String),

    #[error("cannot {0} an empty image")]
    EmptyImage(&'static str),

    #[error("failed to load detection model: {0}")]
    ModelLoad(String),

    #[error("no detection model loaded")]
    ModelNotLoaded,

    #[error("face detection failed: {0}")]
    Detection(String),

    #[error("region list is empty")]
    EmptyRegionSet,

    #[error("degenerate crop rectangle: {0}")]
    Geometry(String),

    #[error("no faces found in image")]
    NoFacesFound,
}
