use std::sync::Mutex;

use crate::detection::domain::detection_error::DetectionError;
use crate::detection::domain::endpoint::decode_image_url;
use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::face_geometry::FaceGeometry;
use crate::detection::domain::image_source::ImageSource;
use crate::shared::frame::Frame;

/// Service-side pipeline: decode path → fetch → decode image → detect.
///
/// Shareable across request threads; fetching runs unlocked, inference
/// takes the detector lock.
pub struct DetectFacesUseCase {
    source: Box<dyn ImageSource>,
    detector: Mutex<Box<dyn FaceDetector>>,
}

impl DetectFacesUseCase {
    pub fn new(source: Box<dyn ImageSource>, detector: Box<dyn FaceDetector>) -> Self {
        Self {
            source,
            detector: Mutex::new(detector),
        }
    }

    /// Runs detection for the base64 path segment of a request.
    pub fn execute(&self, encoded_url: &str) -> Result<Vec<FaceGeometry>, DetectionError> {
        let url = decode_image_url(encoded_url)?;
        self.execute_url(&url)
    }

    pub fn execute_url(&self, url: &str) -> Result<Vec<FaceGeometry>, DetectionError> {
        let bytes = self.source.fetch(url)?;
        let frame = Frame::decode(&bytes).map_err(|e| {
            log::warn!("Cannot decode image {url}: {e}");
            DetectionError::CantReadImage
        })?;

        let faces = {
            let mut detector = self
                .detector
                .lock()
                .map_err(|_| DetectionError::Internal("detector lock poisoned".into()))?;
            detector
                .detect(&frame)
                .map_err(|e| DetectionError::Internal(e.to_string()))?
        };

        log::info!(
            "{} face(s) in {url} ({}x{})",
            faces.len(),
            frame.width(),
            frame.height()
        );
        if faces.is_empty() {
            return Err(DetectionError::NoFacesFound);
        }
        Ok(faces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::geometry::{Circle, Rect};
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use rstest::rstest;
    use std::io::Cursor;
    use std::sync::Arc;

    // --- Stubs ---

    struct StubSource {
        result: Result<Vec<u8>, DetectionError>,
        requested: Arc<Mutex<Vec<String>>>,
    }

    impl ImageSource for StubSource {
        fn fetch(&self, url: &str) -> Result<Vec<u8>, DetectionError> {
            self.requested.lock().unwrap().push(url.to_string());
            self.result.clone()
        }
    }

    struct StubDetector {
        faces: Vec<FaceGeometry>,
        fail: bool,
    }

    impl FaceDetector for StubDetector {
        fn detect(
            &mut self,
            _frame: &Frame,
        ) -> Result<Vec<FaceGeometry>, Box<dyn std::error::Error>> {
            if self.fail {
                return Err("session crashed".into());
            }
            Ok(self.faces.clone())
        }
    }

    fn png() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(16, 16, image::Rgb([200, 180, 160]));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    fn face() -> FaceGeometry {
        FaceGeometry {
            bounds: Rect::new(1.0, 1.0, 10.0, 10.0),
            right_eye: Circle::new(7.0, 4.0, 1.0),
            left_eye: Circle::new(3.0, 4.0, 1.0),
            mouth: Rect::new(3.0, 8.0, 4.0, 1.0),
        }
    }

    fn use_case(
        source: Result<Vec<u8>, DetectionError>,
        faces: Vec<FaceGeometry>,
        fail: bool,
    ) -> (DetectFacesUseCase, Arc<Mutex<Vec<String>>>) {
        let requested = Arc::new(Mutex::new(Vec::new()));
        let source = StubSource {
            result: source,
            requested: requested.clone(),
        };
        let detector = StubDetector { faces, fail };
        (
            DetectFacesUseCase::new(Box::new(source), Box::new(detector)),
            requested,
        )
    }

    #[test]
    fn test_fetches_decoded_url_and_returns_faces() {
        let (uc, requested) = use_case(Ok(png()), vec![face()], false);
        let segment = STANDARD.encode("http://localhost:8080/img/1.png");

        let faces = uc.execute(&segment).unwrap();

        assert_eq!(faces, vec![face()]);
        assert_eq!(
            *requested.lock().unwrap(),
            vec!["http://localhost:8080/img/1.png".to_string()]
        );
    }

    #[test]
    fn test_bad_segment_never_fetches() {
        let (uc, requested) = use_case(Ok(png()), vec![face()], false);
        assert_eq!(uc.execute("bad_image_url"), Err(DetectionError::BadInput));
        assert!(requested.lock().unwrap().is_empty());
    }

    #[rstest]
    #[case::fetch_failure(Err(DetectionError::CantReadImage), DetectionError::CantReadImage)]
    #[case::wrong_type(Err(DetectionError::ImageTypeNotSupported), DetectionError::ImageTypeNotSupported)]
    #[case::corrupt_png(Ok(b"\x89PNG\r\n\x1a\ntruncated".to_vec()), DetectionError::CantReadImage)]
    fn test_source_and_decode_errors(
        #[case] source: Result<Vec<u8>, DetectionError>,
        #[case] expected: DetectionError,
    ) {
        let (uc, _) = use_case(source, vec![face()], false);
        assert_eq!(uc.execute_url("http://x/img.png"), Err(expected));
    }

    #[test]
    fn test_no_faces() {
        let (uc, _) = use_case(Ok(png()), vec![], false);
        assert_eq!(uc.execute_url("http://x/img.png"), Err(DetectionError::NoFacesFound));
    }

    #[test]
    fn test_detector_failure_is_internal() {
        let (uc, _) = use_case(Ok(png()), vec![], true);
        assert_eq!(
            uc.execute_url("http://x/img.png"),
            Err(DetectionError::Internal("session crashed".into()))
        );
    }
}
