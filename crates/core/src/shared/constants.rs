use std::time::Duration;

pub const YOLO_MODEL_NAME: &str = "yolo11n-pose_widerface.onnx";
pub const YOLO_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/yolo11n-pose_widerface.onnx";

/// Origin the demo gallery and the detection service are served from.
pub const DEFAULT_ORIGIN: &str = "http://localhost:8080";

/// Route prefix of the detection endpoint; the base64 image URL follows it.
pub const DETECTION_PATH: &str = "/v1/facedetection/";

/// Upper bound on fetching a remote image for detection.
pub const IMAGE_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Shown when a response carries neither faces nor an error message.
pub const UNEXPECTED_ERROR: &str = "unexpected error";

pub const OVERLAY_LINE_WIDTH: f32 = 3.0;

/// Pure green, RGBA.
pub const OVERLAY_COLOR: [u8; 4] = [0x00, 0xff, 0x00, 0xff];
