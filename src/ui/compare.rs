use iced::mouse::{self, Cursor};
use iced::widget::canvas::{self, Program};
use iced::widget::image;
use iced::{Color, Point, Rectangle, Renderer, Size, Theme};

use crate::Message;

/// Draggable before/after comparison renderer.
///
/// The original is drawn across the full area with the processed result
/// overlaid and clipped to the left of a vertical divider. The divider
/// position is a percentage in [0, 100] owned by the application and reset
/// whenever a new pair is displayed; it is never persisted.
pub struct ImageCompare {
    /// The uploaded original
    pub original: image::Handle,
    /// The background-removed result
    pub processed: image::Handle,
    /// Divider position as a percentage of the width
    pub position: f32,
    /// Pixel dimensions of the original, for aspect-correct placement
    pub image_size: Option<(u32, u32)>,
}

impl ImageCompare {
    /// Largest rectangle with the original's aspect ratio that fits the
    /// canvas, centered. Falls back to the full area when the dimensions
    /// are unknown.
    fn display_rect(&self, area: Size) -> Rectangle {
        match self.image_size {
            Some((w, h)) if w > 0 && h > 0 => {
                let scale = (area.width / w as f32).min(area.height / h as f32);
                let width = w as f32 * scale;
                let height = h as f32 * scale;

                Rectangle {
                    x: (area.width - width) / 2.0,
                    y: (area.height - height) / 2.0,
                    width,
                    height,
                }
            }
            _ => Rectangle {
                x: 0.0,
                y: 0.0,
                width: area.width,
                height: area.height,
            },
        }
    }
}

impl Program<Message> for ImageCompare {
    type State = DragState;

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        // Panel background behind letterboxed images
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.11, 0.11, 0.13),
        );

        let target = self.display_rect(bounds.size());
        frame.draw_image(target, canvas::Image::new(self.original.clone()));

        // Processed overlay, visible to the left of the divider
        let divider_x = bounds.width * (self.position / 100.0).clamp(0.0, 1.0);
        if divider_x > 0.0 {
            let visible = Rectangle {
                x: 0.0,
                y: 0.0,
                width: divider_x,
                height: bounds.height,
            };
            frame.with_clip(visible, |frame| {
                frame.draw_image(target, canvas::Image::new(self.processed.clone()));
            });
        }

        // Divider line with a grab handle
        frame.fill_rectangle(
            Point::new(divider_x - 1.0, 0.0),
            Size::new(2.0, bounds.height),
            Color::WHITE,
        );

        let handle_center = Point::new(divider_x, bounds.height / 2.0);
        frame.fill(&canvas::Path::circle(handle_center, 12.0), Color::WHITE);
        frame.fill(
            &canvas::Path::circle(handle_center, 4.0),
            Color::from_rgb(0.35, 0.35, 0.38),
        );

        frame.fill_text(canvas::Text {
            content: "Drag to compare".to_string(),
            position: Point::new(12.0, bounds.height - 26.0),
            color: Color::from_rgba(1.0, 1.0, 1.0, 0.8),
            size: 14.0.into(),
            ..canvas::Text::default()
        });

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        match event {
            // Mouse button press - grab the divider and jump it to the cursor
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if let Some(position) = cursor.position_in(bounds) {
                    state.is_dragging = true;
                    return (
                        canvas::event::Status::Captured,
                        Some(Message::CompareDragged(position_percent(
                            position.x,
                            bounds.width,
                        ))),
                    );
                }
            }

            // Mouse button release - stop dragging
            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                if state.is_dragging {
                    state.is_dragging = false;
                    return (canvas::event::Status::Captured, None);
                }
            }

            // Mouse move - follow the cursor while dragging
            canvas::Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                if state.is_dragging {
                    if let Some(position) = cursor.position_in(bounds) {
                        return (
                            canvas::event::Status::Captured,
                            Some(Message::CompareDragged(position_percent(
                                position.x,
                                bounds.width,
                            ))),
                        );
                    }
                }
            }

            _ => {}
        }

        (canvas::event::Status::Ignored, None)
    }
}

/// State for divider drag interactions
#[derive(Debug, Clone, Default)]
pub struct DragState {
    pub is_dragging: bool,
}

/// Convert a cursor x offset into a divider percentage, clamped to [0, 100]
fn position_percent(x: f32, width: f32) -> f32 {
    if width <= 0.0 {
        return 50.0;
    }

    (x / width * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_percent_clamps() {
        assert_eq!(position_percent(-20.0, 400.0), 0.0);
        assert_eq!(position_percent(200.0, 400.0), 50.0);
        assert_eq!(position_percent(500.0, 400.0), 100.0);
    }

    #[test]
    fn test_position_percent_degenerate_width() {
        assert_eq!(position_percent(10.0, 0.0), 50.0);
    }
}
