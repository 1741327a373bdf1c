//! 5-point face landmarks and their reduction to overlay geometry.
//!
//! Point order is [left_eye, right_eye, nose, left_mouth, right_mouth], with
//! "left" meaning the smaller x in image space.

use crate::shared::geometry::{Circle, Rect};

use super::face_geometry::FaceGeometry;

const LEFT_EYE: usize = 0;
const RIGHT_EYE: usize = 1;
const LEFT_MOUTH: usize = 3;
const RIGHT_MOUTH: usize = 4;

/// Pupil search window relative to the face width; the drawn radius is an
/// eighth of it, floored to whole pixels and at least 1.
const EYE_WINDOW_RATIO: f64 = 0.45;
const EYE_SCALE_DIVISOR: f64 = 8.0;

#[derive(Clone, Debug, PartialEq)]
pub struct FaceLandmarks {
    /// Points with x <= 0 are treated as invisible.
    points: [(f64, f64); 5],
}

impl FaceLandmarks {
    pub fn new(points: [(f64, f64); 5]) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[(f64, f64); 5] {
        &self.points
    }

    pub fn has_visible(&self) -> bool {
        self.points.iter().any(|(x, _)| *x > 0.0)
    }

    fn visible(&self, index: usize) -> Option<(f64, f64)> {
        let point = self.points[index];
        (point.0 > 0.0).then_some(point)
    }

    /// Builds the drawable face, or `None` when either eye is missing.
    ///
    /// The mouth rect spans the two mouth corners; its height never drops
    /// below one pixel. Without both corners the mouth stays a zero rect.
    pub fn to_geometry(&self, bounds: Rect) -> Option<FaceGeometry> {
        let left = self.visible(LEFT_EYE)?;
        let right = self.visible(RIGHT_EYE)?;

        let scale = (bounds.width * EYE_WINDOW_RATIO / EYE_SCALE_DIVISOR)
            .floor()
            .max(1.0);

        let mouth = match (self.visible(LEFT_MOUTH), self.visible(RIGHT_MOUTH)) {
            (Some(p1), Some(p2)) => {
                let height = (p2.1 - p1.1).max(1.0);
                Rect::new(p1.0, p1.1 + (p1.1 - p2.1) / 2.0, p2.0 - p1.0, height)
            }
            _ => Rect::default(),
        };

        Some(FaceGeometry {
            bounds,
            right_eye: Circle::new(right.0, right.1, scale),
            left_eye: Circle::new(left.0, left.1, scale),
            mouth,
        })
    }
}
