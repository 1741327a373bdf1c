//! Vector path of detected face outlines, independent of any renderer.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::detection::domain::face_geometry::FaceGeometry;
use crate::shared::constants::{OVERLAY_COLOR, OVERLAY_LINE_WIDTH};
use crate::shared::geometry::{Circle, Rect};

/// One drawing instruction, with 2D-canvas path semantics.
#[derive(Clone, Debug, PartialEq)]
pub enum PathCommand {
    /// Closed rectangle subpath; leaves the pen at its top-left.
    Rect(Rect),
    /// Lifts the pen to a new point.
    MoveTo { x: f64, y: f64 },
    /// Arc around `circle`; connects from the current pen position to the
    /// arc start when the two differ.
    Arc {
        circle: Circle,
        start_angle: f64,
        end_angle: f64,
        counter_clockwise: bool,
    },
    /// Closed full circle subpath with no connecting segment.
    Circle(Circle),
}

/// How eyes are traced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EyeConnector {
    /// Pen move to the rightmost point, then a counter-clockwise full turn.
    #[default]
    Preserve,
    /// Standalone circle.
    Suppress,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    pub width: f32,
    pub color: [u8; 4],
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            width: OVERLAY_LINE_WIDTH,
            color: OVERLAY_COLOR,
        }
    }
}

/// All faces of one response queued into a single path.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OverlayPath {
    commands: Vec<PathCommand>,
}

impl OverlayPath {
    /// Per face, in order: bounds, right eye, left eye, mouth.
    pub fn from_faces(faces: &[FaceGeometry], eyes: EyeConnector) -> Self {
        let mut path = Self::default();
        for face in faces {
            path.rect(face.bounds);
            path.eye(face.right_eye, eyes);
            path.eye(face.left_eye, eyes);
            path.rect(face.mouth);
        }
        path
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn rect(&mut self, rect: Rect) {
        self.commands.push(PathCommand::Rect(rect));
    }

    fn eye(&mut self, circle: Circle, eyes: EyeConnector) {
        match eyes {
            EyeConnector::Preserve => {
                let (x, y) = circle.rightmost();
                self.commands.push(PathCommand::MoveTo { x, y });
                self.commands.push(PathCommand::Arc {
                    circle,
                    start_angle: 0.0,
                    end_angle: TAU,
                    counter_clockwise: true,
                });
            }
            EyeConnector::Suppress => self.commands.push(PathCommand::Circle(circle)),
        }
    }
}

/// Signed angle an arc covers, positive in the y-down clockwise direction.
///
/// A span of a full turn or more in either direction covers the whole
/// circle, whatever the winding flag says.
pub fn arc_sweep(start_angle: f64, end_angle: f64, counter_clockwise: bool) -> f64 {
    let direction = if counter_clockwise { -1.0 } else { 1.0 };
    if (end_angle - start_angle).abs() >= TAU {
        direction * TAU
    } else if counter_clockwise {
        -(start_angle - end_angle).rem_euclid(TAU)
    } else {
        (end_angle - start_angle).rem_euclid(TAU)
    }
}
