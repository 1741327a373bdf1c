use crate::detection::domain::detection_client::{ClientError, DetectionClient};
use crate::detection::domain::endpoint::DetectionEndpoint;
use crate::detection::domain::face_geometry::{DetectionOutcome, DetectionResponse};
use crate::overlay::domain::drawing_surface::DrawingSurface;
use crate::overlay::domain::overlay_path::{EyeConnector, OverlayPath, StrokeStyle};
use crate::shared::geometry::Offset;
use crate::shared::image_descriptor::ImageDescriptor;

use super::view_state::{Activation, OverlaySurface, ViewState};

/// Where the displayed image currently sits, read at call time.
pub trait ImageLayout {
    fn image_offset(&self) -> Offset;
}

/// Shows `image` in the detection panel with a fresh overlay surface and
/// rebinds the detect trigger to it.
///
/// Any previous image, surface, drawing and error are discarded.
pub fn select_image(state: &mut ViewState, image: &ImageDescriptor, activation: &mut Activation) {
    activation.stop_propagation();

    state.panel_visible = true;
    state.displayed_image = Some(image.clone());
    state.surface = Some(OverlaySurface::new(image.width, image.height));
    state.detect_binding = Some(image.clone());
    state.error_message = None;
    state.generation += 1;

    log::debug!(
        "Selected {} ({}x{})",
        image.url,
        image.width,
        image.height
    );
}

/// A request that has been issued for a given selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingDetection {
    pub target: String,
    pub image: ImageDescriptor,
    generation: u64,
}

/// How a response was applied to the view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetectionApplied {
    Drawn { faces: usize },
    ErrorShown,
    /// The selection changed while the request was in flight.
    Stale,
}

/// Runs the detect trigger against the bound image.
#[derive(Clone, Debug, Default)]
pub struct OverlayController {
    endpoint: DetectionEndpoint,
    eyes: EyeConnector,
    style: StrokeStyle,
}

impl OverlayController {
    pub fn new(endpoint: DetectionEndpoint, eyes: EyeConnector) -> Self {
        Self {
            endpoint,
            eyes,
            style: StrokeStyle::default(),
        }
    }

    pub fn endpoint(&self) -> &DetectionEndpoint {
        &self.endpoint
    }

    /// Positions the surface over the displayed image and builds the
    /// request. `None` when nothing is selected yet.
    pub fn begin_detection(
        &self,
        state: &mut ViewState,
        layout: &dyn ImageLayout,
        activation: &mut Activation,
    ) -> Option<PendingDetection> {
        activation.stop_propagation();

        let image = state.detect_binding.clone()?;
        let surface = state.surface.as_mut()?;
        surface.place_at(layout.image_offset());
        state.error_message = None;

        let target = self.endpoint.request_target(&image);
        log::info!("Detecting faces in {}", image.url);
        Some(PendingDetection {
            target,
            image,
            generation: state.generation,
        })
    }

    /// Draws the faces of a response, or shows its error.
    ///
    /// All faces go into one path with one stroke call; an empty face list
    /// strokes nothing.
    pub fn finish_detection(
        &self,
        state: &mut ViewState,
        pending: &PendingDetection,
        result: Result<DetectionResponse, ClientError>,
    ) -> DetectionApplied {
        if pending.generation != state.generation {
            log::debug!("Dropping response for {}: selection changed", pending.image.url);
            return DetectionApplied::Stale;
        }

        let outcome = match result {
            Ok(response) => DetectionOutcome::from(response),
            Err(e) => DetectionOutcome::Error(e.to_string()),
        };

        match outcome {
            DetectionOutcome::Faces(faces) => {
                if let (Some(surface), false) = (state.surface.as_mut(), faces.is_empty()) {
                    let path = OverlayPath::from_faces(&faces, self.eyes);
                    surface.stroke(&path, &self.style);
                }
                DetectionApplied::Drawn { faces: faces.len() }
            }
            DetectionOutcome::Error(message) => {
                log::warn!("Detection failed for {}: {message}", pending.image.url);
                state.error_message = Some(message);
                DetectionApplied::ErrorShown
            }
        }
    }

    /// Begin, fetch and finish in one blocking call.
    pub fn detect_and_draw(
        &self,
        state: &mut ViewState,
        layout: &dyn ImageLayout,
        client: &dyn DetectionClient,
        activation: &mut Activation,
    ) -> Option<DetectionApplied> {
        let pending = self.begin_detection(state, layout, activation)?;
        let result = client.fetch(&pending.target);
        Some(self.finish_detection(state, &pending, result))
    }
}
