use serde::{Deserialize, Serialize};

use crate::shared::constants::UNEXPECTED_ERROR;
use crate::shared::geometry::{Circle, Rect};

/// Detected face with landmark shapes, in source-image pixel coordinates.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceGeometry {
    pub bounds: Rect,
    pub right_eye: Circle,
    pub left_eye: Circle,
    pub mouth: Rect,
}

/// Error body of the detection endpoint: `{"message": ..., "code": ...}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
}

/// Wire shape of one detection response.
///
/// Successful replies carry `faces`, failures carry `error`. Either field
/// may be missing (or `null`) in a malformed reply.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faces: Option<Vec<FaceGeometry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorPayload>,
}

impl DetectionResponse {
    pub fn faces(faces: Vec<FaceGeometry>) -> Self {
        Self {
            faces: Some(faces),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>, code: u16) -> Self {
        Self {
            faces: None,
            error: Some(ErrorPayload {
                message: Some(message.into()),
                code: Some(code),
            }),
        }
    }
}

/// What the overlay does with a response: draw faces or show a message.
#[derive(Clone, Debug, PartialEq)]
pub enum DetectionOutcome {
    Faces(Vec<FaceGeometry>),
    Error(String),
}

impl From<DetectionResponse> for DetectionOutcome {
    /// `faces` wins whenever present; otherwise the payload message is shown
    /// verbatim, falling back to [`UNEXPECTED_ERROR`].
    fn from(response: DetectionResponse) -> Self {
        match response {
            DetectionResponse {
                faces: Some(faces), ..
            } => DetectionOutcome::Faces(faces),
            DetectionResponse {
                error: Some(ErrorPayload {
                    message: Some(message),
                    ..
                }),
                ..
            } => DetectionOutcome::Error(message),
            _ => DetectionOutcome::Error(UNEXPECTED_ERROR.to_string()),
        }
    }
}
