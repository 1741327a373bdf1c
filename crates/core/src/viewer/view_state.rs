use crate::overlay::domain::drawing_surface::DrawingSurface;
use crate::overlay::domain::overlay_path::{OverlayPath, StrokeStyle};
use crate::shared::geometry::Offset;
use crate::shared::image_descriptor::ImageDescriptor;

/// A user activation (click, key press) that may bubble to enclosing
/// handlers unless stopped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Activation {
    propagation_stopped: bool,
}

impl Activation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Transparent layer sized to the selected image's intrinsic pixels.
///
/// Records each stroke call; renderers replay them.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlaySurface {
    width: u32,
    height: u32,
    offset: Option<Offset>,
    strokes: Vec<(OverlayPath, StrokeStyle)>,
}

impl OverlaySurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            offset: None,
            strokes: Vec::new(),
        }
    }

    /// Absolute position, unset until the first detection.
    pub fn offset(&self) -> Option<Offset> {
        self.offset
    }

    pub fn place_at(&mut self, offset: Offset) {
        self.offset = Some(offset);
    }

    pub fn strokes(&self) -> &[(OverlayPath, StrokeStyle)] {
        &self.strokes
    }
}

impl DrawingSurface for OverlaySurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn stroke(&mut self, path: &OverlayPath, style: &StrokeStyle) {
        self.strokes.push((path.clone(), *style));
    }
}

/// Everything the detection panel shows.
#[derive(Clone, Debug, Default)]
pub struct ViewState {
    pub panel_visible: bool,
    pub displayed_image: Option<ImageDescriptor>,
    pub surface: Option<OverlaySurface>,
    /// Image the detect trigger currently acts on.
    pub detect_binding: Option<ImageDescriptor>,
    pub error_message: Option<String>,
    /// Bumped on every selection so late responses can be recognized.
    pub(crate) generation: u64,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
