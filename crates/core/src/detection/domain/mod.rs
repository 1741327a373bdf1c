pub mod detection_client;
pub mod detection_error;
pub mod endpoint;
pub mod face_detector;
pub mod face_geometry;
pub mod face_landmarks;
pub mod image_source;
