use thiserror::Error;

use super::face_geometry::DetectionResponse;

/// Failures below the response payload: the request never produced JSON.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("request failed: invalid response: {0}")]
    Parse(String),
}

/// Issues one detection request against a fully built request target.
pub trait DetectionClient: Send + Sync {
    fn fetch(&self, target: &str) -> Result<DetectionResponse, ClientError>;
}
