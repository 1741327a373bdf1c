use thiserror::Error;

use super::face_geometry::DetectionResponse;

/// Failures of the detection service, each mapped to an HTTP status.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DetectionError {
    #[error("no image specified")]
    NoImageSpecified,
    #[error("bad input data")]
    BadInput,
    #[error("can't read image")]
    CantReadImage,
    #[error("image type not supported")]
    ImageTypeNotSupported,
    #[error("no faces found")]
    NoFacesFound,
    #[error("internal error: {0}")]
    Internal(String),
}

impl DetectionError {
    /// "No faces" is an answer, not a failure, so it stays a 200.
    pub fn status_code(&self) -> u16 {
        match self {
            DetectionError::NoImageSpecified
            | DetectionError::BadInput
            | DetectionError::CantReadImage
            | DetectionError::ImageTypeNotSupported => 400,
            DetectionError::NoFacesFound => 200,
            DetectionError::Internal(_) => 500,
        }
    }

    pub fn to_response(&self) -> DetectionResponse {
        DetectionResponse::error(self.to_string(), self.status_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(DetectionError::NoImageSpecified, 400)]
    #[case(DetectionError::BadInput, 400)]
    #[case(DetectionError::CantReadImage, 400)]
    #[case(DetectionError::ImageTypeNotSupported, 400)]
    #[case(DetectionError::NoFacesFound, 200)]
    #[case(DetectionError::Internal("session crashed".into()), 500)]
    fn test_status_codes(#[case] err: DetectionError, #[case] expected: u16) {
        assert_eq!(err.status_code(), expected);
    }

    #[test]
    fn test_to_response_carries_message_and_code() {
        let response = DetectionError::ImageTypeNotSupported.to_response();
        let payload = response.error.unwrap();
        assert_eq!(payload.message.as_deref(), Some("image type not supported"));
        assert_eq!(payload.code, Some(400));
        assert!(response.faces.is_none());
    }
}
