pub mod constants;
pub mod frame;
pub mod geometry;
pub mod image_descriptor;
pub mod model_resolver;
