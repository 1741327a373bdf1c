use super::overlay_path::{OverlayPath, StrokeStyle};

/// Anything face geometry can be stroked onto.
pub trait DrawingSurface {
    /// Surface size in source-image pixels.
    fn size(&self) -> (u32, u32);

    /// Outlines every subpath of `path` in one call.
    fn stroke(&mut self, path: &OverlayPath, style: &StrokeStyle);
}
