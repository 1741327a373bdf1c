use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in source-image pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds a rectangle from corner coordinates `(x1, y1, x2, y2)`.
    pub fn from_corners(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// The four corners in drawing order, starting top-left, clockwise.
    pub fn corners(&self) -> [(f64, f64); 4] {
        [
            (self.x, self.y),
            (self.x + self.width, self.y),
            (self.x + self.width, self.y + self.height),
            (self.x, self.y + self.height),
        ]
    }
}

/// Circle given by its center and radius (`scale` on the wire).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl Circle {
    pub fn new(x: f64, y: f64, scale: f64) -> Self {
        Self { x, y, scale }
    }

    /// Point at angle 0, where a full-turn arc starts and ends.
    pub fn rightmost(&self) -> (f64, f64) {
        (self.x + self.scale, self.y)
    }
}

/// Absolute on-screen offset of a laid-out element's top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Offset {
    pub left: f64,
    pub top: f64,
}

impl Offset {
    pub fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_corners() {
        let r = Rect::from_corners(10.0, 20.0, 50.0, 80.0);
        assert_eq!(r, Rect::new(10.0, 20.0, 40.0, 60.0));
    }

    #[test]
    fn test_corners_clockwise_from_top_left() {
        let r = Rect::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(r.corners(), [(1.0, 2.0), (4.0, 2.0), (4.0, 6.0), (1.0, 6.0)]);
    }

    #[test]
    fn test_circle_rightmost() {
        assert_eq!(Circle::new(15.0, 15.0, 2.0).rightmost(), (17.0, 15.0));
    }

    #[test]
    fn test_deserialize_integral_and_fractional_numbers() {
        let r: Rect = serde_json::from_str(r#"{"x":10,"y":10.5,"width":20,"height":20}"#).unwrap();
        assert_relative_eq!(r.y, 10.5);
        let c: Circle = serde_json::from_str(r#"{"x":1,"y":2,"scale":3}"#).unwrap();
        assert_eq!(c, Circle::new(1.0, 2.0, 3.0));
    }
}
