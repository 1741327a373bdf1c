use crate::shared::frame::Frame;

use super::face_geometry::FaceGeometry;

/// Domain interface for face detection on a single decoded image.
///
/// Inference sessions need exclusive access, hence `&mut self`.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceGeometry>, Box<dyn std::error::Error>>;
}
