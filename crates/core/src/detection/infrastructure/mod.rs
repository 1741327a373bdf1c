pub mod execution_provider;
pub mod http_detection_client;
pub mod http_image_fetcher;
pub mod onnx_yolo_detector;
