//! Replays recorded overlay strokes on an iced canvas.

use iced::mouse;
use iced::widget::canvas::{self, path, Path, Stroke};
use iced::{Color, Point, Radians, Rectangle, Renderer, Size, Theme, Vector};

use facespot_core::overlay::domain::overlay_path::{arc_sweep, OverlayPath, PathCommand, StrokeStyle};
use facespot_core::viewer::view_state::OverlaySurface;

/// Canvas program drawing every stroke of an overlay surface, shifted by
/// the surface's offset.
pub struct OverlayCanvas<'a> {
    surface: &'a OverlaySurface,
}

impl<'a> OverlayCanvas<'a> {
    pub fn new(surface: &'a OverlaySurface) -> Self {
        Self { surface }
    }
}

impl<Message> canvas::Program<Message> for OverlayCanvas<'_> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        if let Some(offset) = self.surface.offset() {
            frame.translate(Vector::new(offset.left as f32, offset.top as f32));
        }
        for (overlay, style) in self.surface.strokes() {
            frame.stroke(&to_canvas_path(overlay), to_stroke(style));
        }
        vec![frame.into_geometry()]
    }
}

fn to_stroke(style: &StrokeStyle) -> Stroke<'static> {
    let [r, g, b, a] = style.color;
    Stroke::default()
        .with_color(Color::from_rgba8(r, g, b, a as f32 / 255.0))
        .with_width(style.width)
}

fn to_canvas_path(overlay: &OverlayPath) -> Path {
    Path::new(|builder| {
        for command in overlay.commands() {
            match command {
                PathCommand::Rect(rect) => builder.rectangle(
                    Point::new(rect.x as f32, rect.y as f32),
                    Size::new(rect.width as f32, rect.height as f32),
                ),
                PathCommand::MoveTo { x, y } => builder.move_to(Point::new(*x as f32, *y as f32)),
                PathCommand::Arc {
                    circle,
                    start_angle,
                    end_angle,
                    counter_clockwise,
                } => {
                    let (start, end) = arc_bounds(*start_angle, *end_angle, *counter_clockwise);
                    builder.arc(path::Arc {
                        center: Point::new(circle.x as f32, circle.y as f32),
                        radius: circle.scale as f32,
                        start_angle: Radians(start),
                        end_angle: Radians(end),
                    });
                }
                PathCommand::Circle(circle) => builder.circle(
                    Point::new(circle.x as f32, circle.y as f32),
                    circle.scale as f32,
                ),
            }
        }
    })
}

/// iced arcs have no winding flag; the sweep sign carries the direction.
fn arc_bounds(start_angle: f64, end_angle: f64, counter_clockwise: bool) -> (f32, f32) {
    let sweep = arc_sweep(start_angle, end_angle, counter_clockwise);
    (start_angle as f32, (start_angle + sweep) as f32)
}
