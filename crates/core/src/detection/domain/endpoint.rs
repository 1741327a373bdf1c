use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::shared::constants::{DEFAULT_ORIGIN, DETECTION_PATH};
use crate::shared::image_descriptor::ImageDescriptor;

use super::detection_error::DetectionError;

/// Location of the detection service, and the codec for its request path.
///
/// The image to analyze travels inside the path as standard (padded,
/// non-URL-safe) base64 of its absolute URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetectionEndpoint {
    origin: String,
}

impl DetectionEndpoint {
    pub fn new(origin: impl Into<String>) -> Self {
        let origin = origin.into();
        Self {
            origin: origin.trim_end_matches('/').to_string(),
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Origin-relative descriptor URLs are resolved against this origin.
    pub fn absolute_image_url(&self, image: &ImageDescriptor) -> String {
        if image.is_absolute() {
            image.url.clone()
        } else if image.url.starts_with('/') {
            format!("{}{}", self.origin, image.url)
        } else {
            format!("{}/{}", self.origin, image.url)
        }
    }

    pub fn request_target(&self, image: &ImageDescriptor) -> String {
        let encoded = STANDARD.encode(self.absolute_image_url(image).as_bytes());
        format!("{}{}{}", self.origin, DETECTION_PATH, encoded)
    }
}

impl Default for DetectionEndpoint {
    fn default() -> Self {
        Self::new(DEFAULT_ORIGIN)
    }
}

/// Inverse of the path encoding, as the service sees it.
pub fn decode_image_url(segment: &str) -> Result<String, DetectionError> {
    let segment = segment.trim();
    if segment.is_empty() {
        return Err(DetectionError::NoImageSpecified);
    }
    let bytes = STANDARD
        .decode(segment)
        .map_err(|_| DetectionError::BadInput)?;
    String::from_utf8(bytes).map_err(|_| DetectionError::BadInput)
}
