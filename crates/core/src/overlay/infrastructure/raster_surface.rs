use image::{Rgba, RgbaImage};

use crate::overlay::domain::drawing_surface::DrawingSurface;
use crate::overlay::domain::overlay_path::{arc_sweep, OverlayPath, PathCommand, StrokeStyle};
use crate::shared::geometry::Circle;

/// Distance between brush stamps along a segment, in pixels.
const STAMP_STEP: f64 = 0.5;

/// Upper bound on polyline segments per full turn.
const MAX_ARC_SEGMENTS: usize = 256;

/// CPU surface that strokes overlay paths onto an RGBA raster.
///
/// Lines are drawn by stamping a filled disk of the stroke width along
/// every segment, which gives round caps and joins.
pub struct RasterSurface {
    image: RgbaImage,
}

impl RasterSurface {
    /// Transparent surface of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    /// Draws on top of an existing picture.
    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    fn stamp(&mut self, cx: f64, cy: f64, radius: f64, color: Rgba<u8>) {
        let (w, h) = self.image.dimensions();
        let x0 = (cx - radius).floor().max(0.0) as i64;
        let y0 = (cy - radius).floor().max(0.0) as i64;
        let x1 = ((cx + radius).ceil() as i64).min(w as i64 - 1);
        let y1 = ((cy + radius).ceil() as i64).min(h as i64 - 1);
        let r2 = radius * radius;

        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f64 + 0.5 - cx;
                let dy = y as f64 + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.image.put_pixel(x as u32, y as u32, color);
                }
            }
        }
    }

    /// Stamps along `from → to`, restricted to the part of the segment that
    /// can touch the raster.
    fn segment(&mut self, from: (f64, f64), to: (f64, f64), radius: f64, color: Rgba<u8>) {
        let (w, h) = self.image.dimensions();
        let Some((from, to)) = clip_segment(
            from,
            to,
            (-radius - 1.0, -radius - 1.0),
            (f64::from(w) + radius + 1.0, f64::from(h) + radius + 1.0),
        ) else {
            return;
        };
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let steps = ((dx.hypot(dy) / STAMP_STEP).ceil() as usize).max(1);
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            self.stamp(from.0 + dx * t, from.1 + dy * t, radius, color);
        }
    }

    fn polyline(&mut self, points: &[(f64, f64)], radius: f64, color: Rgba<u8>) {
        for pair in points.windows(2) {
            self.segment(pair[0], pair[1], radius, color);
        }
    }
}

impl DrawingSurface for RasterSurface {
    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn stroke(&mut self, path: &OverlayPath, style: &StrokeStyle) {
        let color = Rgba(style.color);
        let radius = f64::from(style.width) / 2.0;
        let mut pen: Option<(f64, f64)> = None;

        for command in path.commands() {
            match command {
                PathCommand::Rect(rect) => {
                    let corners = rect.corners();
                    let mut outline = corners.to_vec();
                    outline.push(corners[0]);
                    self.polyline(&outline, radius, color);
                    pen = Some(corners[0]);
                }
                PathCommand::MoveTo { x, y } => pen = Some((*x, *y)),
                PathCommand::Arc {
                    circle,
                    start_angle,
                    end_angle,
                    counter_clockwise,
                } => {
                    let points =
                        arc_points(circle, *start_angle, *end_angle, *counter_clockwise);
                    if let (Some(from), Some(start)) = (pen, points.first()) {
                        self.segment(from, *start, radius, color);
                    }
                    self.polyline(&points, radius, color);
                    pen = points.last().copied();
                }
                PathCommand::Circle(circle) => {
                    let points = arc_points(circle, 0.0, std::f64::consts::TAU, false);
                    self.polyline(&points, radius, color);
                    pen = Some(circle.rightmost());
                }
            }
        }
    }
}

/// Liang-Barsky clip of `from → to` against the box `min..max`.
///
/// `None` when the segment misses the box or has a non-finite endpoint.
fn clip_segment(
    from: (f64, f64),
    to: (f64, f64),
    min: (f64, f64),
    max: (f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    if ![from.0, from.1, to.0, to.1].iter().all(|v| v.is_finite()) {
        return None;
    }
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    let edges = [
        (-dx, from.0 - min.0),
        (dx, max.0 - from.0),
        (-dy, from.1 - min.1),
        (dy, max.1 - from.1),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }
    Some((
        (from.0 + t0 * dx, from.1 + t0 * dy),
        (from.0 + t1 * dx, from.1 + t1 * dy),
    ))
}

/// Samples an arc as a polyline. A sweep of a full turn or more draws the
/// whole circle in the requested direction; shorter sweeps follow 2D-canvas
/// rules.
fn arc_points(circle: &Circle, start: f64, end: f64, counter_clockwise: bool) -> Vec<(f64, f64)> {
    let sweep = arc_sweep(start, end, counter_clockwise);

    // Roughly one segment per two pixels of circumference
    let segments = ((sweep.abs() * circle.scale / 2.0).ceil() as usize).clamp(8, MAX_ARC_SEGMENTS);
    (0..=segments)
        .map(|i| {
            let angle = start + sweep * i as f64 / segments as f64;
            (
                circle.x + circle.scale * angle.cos(),
                circle.y + circle.scale * angle.sin(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::face_geometry::FaceGeometry;
    use crate::overlay::domain::overlay_path::EyeConnector;
    use crate::shared::geometry::Rect;
    use approx::assert_relative_eq;

    const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);

    fn face() -> FaceGeometry {
        FaceGeometry {
            bounds: Rect::new(10.0, 10.0, 20.0, 20.0),
            right_eye: Circle::new(15.0, 15.0, 2.0),
            left_eye: Circle::new(25.0, 15.0, 2.0),
            mouth: Rect::new(15.0, 25.0, 10.0, 5.0),
        }
    }

    #[test]
    fn test_rect_outline_is_green_and_interior_untouched() {
        let mut surface = RasterSurface::new(40, 40);
        let path = OverlayPath::from_faces(&[face()], EyeConnector::Suppress);
        surface.stroke(&path, &StrokeStyle::default());

        let img = surface.image();
        // On the top edge of the bounds
        assert_eq!(*img.get_pixel(20, 10), GREEN);
        // Inside the face, away from eyes and mouth
        assert_eq!(img.get_pixel(20, 20)[3], 0);
        // Outside the face
        assert_eq!(img.get_pixel(35, 35)[3], 0);
    }

    #[test]
    fn test_eye_ring_is_drawn() {
        let mut surface = RasterSurface::new(40, 40);
        let path = OverlayPath::from_faces(&[face()], EyeConnector::Preserve);
        surface.stroke(&path, &StrokeStyle::default());
        // Rightmost point of the right eye
        assert_eq!(*surface.image().get_pixel(17, 15), GREEN);
    }

    #[test]
    fn test_shapes_outside_surface_are_clipped() {
        let mut surface = RasterSurface::new(8, 8);
        let faces = [FaceGeometry {
            bounds: Rect::new(-50.0, -50.0, 200.0, 200.0),
            ..face()
        }];
        surface.stroke(
            &OverlayPath::from_faces(&faces, EyeConnector::Suppress),
            &StrokeStyle::default(),
        );
        assert_eq!(surface.size(), (8, 8));
    }

    #[test]
    fn test_draws_over_existing_image() {
        let base = RgbaImage::from_pixel(40, 40, Rgba([255, 0, 0, 255]));
        let mut surface = RasterSurface::from_image(base);
        surface.stroke(
            &OverlayPath::from_faces(&[face()], EyeConnector::Suppress),
            &StrokeStyle::default(),
        );
        let img = surface.into_image();
        assert_eq!(*img.get_pixel(20, 10), GREEN);
        assert_eq!(*img.get_pixel(1, 1), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_full_turn_counter_clockwise_closes() {
        let pts = arc_points(&Circle::new(0.0, 0.0, 10.0), 0.0, std::f64::consts::TAU, true);
        let first = pts[0];
        let last = *pts.last().unwrap();
        assert_relative_eq!(first.0, last.0, epsilon = 1e-9);
        assert_relative_eq!(first.1, last.1, epsilon = 1e-9);
        // Counter-clockwise in screen space moves toward negative y first
        assert!(pts[1].1 < 0.0);
    }

    #[test]
    fn test_quarter_arc_clockwise() {
        let pts = arc_points(&Circle::new(0.0, 0.0, 10.0), 0.0, std::f64::consts::FRAC_PI_2, false);
        let last = *pts.last().unwrap();
        assert_relative_eq!(last.0, 0.0, epsilon = 1e-9);
        assert_relative_eq!(last.1, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_huge_face_on_tiny_surface_finishes() {
        let mut surface = RasterSurface::new(8, 8);
        let faces = [FaceGeometry {
            bounds: Rect::new(0.0, 0.0, 1e10, 1e10),
            right_eye: Circle::new(5e9, 5e9, 1e10),
            left_eye: Circle::new(-5e9, 5e9, 1e10),
            mouth: Rect::new(-1e10, 4.0, 2e10, 1e10),
        }];

        surface.stroke(
            &OverlayPath::from_faces(&faces, EyeConnector::Preserve),
            &StrokeStyle::default(),
        );

        // Top and left edges of the bounds cross the raster
        assert_eq!(*surface.image().get_pixel(4, 0), GREEN);
        assert_eq!(*surface.image().get_pixel(0, 6), GREEN);
    }

    #[test]
    fn test_clip_segment_crossing_box() {
        let (a, b) = clip_segment((-100.0, 5.0), (100.0, 5.0), (0.0, 0.0), (10.0, 10.0)).unwrap();
        assert_relative_eq!(a.0, 0.0, epsilon = 1e-9);
        assert_relative_eq!(b.0, 10.0, epsilon = 1e-9);
        assert_relative_eq!(a.1, 5.0, epsilon = 1e-9);
        assert_relative_eq!(b.1, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_clip_segment_outside_or_non_finite() {
        let (min, max) = ((0.0, 0.0), (10.0, 10.0));
        assert!(clip_segment((20.0, 0.0), (30.0, 10.0), min, max).is_none());
        assert!(clip_segment((-5.0, 20.0), (50.0, 20.0), min, max).is_none());
        assert!(clip_segment((f64::NAN, 1.0), (5.0, 5.0), min, max).is_none());
    }

    #[test]
    fn test_clip_segment_inside_is_unchanged() {
        let clipped = clip_segment((1.0, 2.0), (3.0, 4.0), (0.0, 0.0), (10.0, 10.0));
        assert_eq!(clipped, Some(((1.0, 2.0), (3.0, 4.0))));
    }
}
