pub mod detection_worker;
pub mod image_worker;
