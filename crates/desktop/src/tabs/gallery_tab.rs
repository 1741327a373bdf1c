use iced::widget::{button, canvas, column, container, image, row, scrollable, stack, text, Space};
use iced::{ContentFit, Element, Length, Theme};

use crate::app::{App, Message};
use crate::widgets::overlay_canvas::OverlayCanvas;
use crate::widgets::thumbnail_card::{thumbnail_card, CardImage};

pub fn view<'a>(app: &'a App, theme: &Theme) -> Element<'a, Message> {
    let manifest_label = app
        .settings
        .last_manifest
        .as_ref()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "No manifest loaded".to_string());

    let toolbar = row![
        button(text("Open manifest\u{2026}").size(13))
            .on_press(Message::OpenManifest)
            .padding([6, 14])
            .style(button::primary),
        text(manifest_label).size(13),
    ]
    .spacing(12)
    .align_y(iced::Alignment::Center);

    let mut content = column![toolbar].spacing(12);

    if let Some(status) = &app.status {
        content = content.push(text(status.as_str()).size(13).style(text::danger));
    }

    let cards: Vec<Element<'a, Message>> = app
        .gallery
        .thumbnails()
        .iter()
        .map(|thumb| {
            let shown = thumb.image();
            thumbnail_card(
                app.card_image(thumb.index()),
                format!("{}\u{00d7}{}", shown.width, shown.height),
                app.selected == Some(thumb.index()),
                app.hovered == Some(thumb.index()),
                thumb.index(),
                theme,
            )
        })
        .collect();
    content = content.push(row(cards).spacing(8).wrap());

    if app.view_state.panel_visible {
        content = content.push(Space::new().height(8)).push(detection_panel(app));
    }

    content.into()
}

fn detection_panel(app: &App) -> Element<'_, Message> {
    let state = &app.view_state;
    let (Some(shown), Some(surface)) = (&state.displayed_image, &state.surface) else {
        return Space::new().into();
    };
    let width = shown.width as f32;
    let height = shown.height as f32;

    let picture: Element<'_, Message> = match app.selected.map(|i| app.card_image(i)) {
        Some(CardImage::Ready(handle)) => image(handle)
            .width(width)
            .height(height)
            .content_fit(ContentFit::Fill)
            .into(),
        Some(CardImage::Failed(error)) => {
            placeholder(format!("Image unavailable: {error}"), width, height)
        }
        _ => placeholder("Loading\u{2026}".to_string(), width, height),
    };

    let mut layers = vec![picture];
    if surface.offset().is_some() {
        layers.push(
            canvas(OverlayCanvas::new(surface))
                .width(width)
                .height(height)
                .into(),
        );
    }
    let overlay_stack = stack(layers).width(width).height(height);

    let detect = button(text(if app.in_flight > 0 {
        "Detecting\u{2026}"
    } else {
        "Detect faces"
    })
    .size(13))
    .on_press_maybe(state.detect_binding.as_ref().map(|_| Message::DetectPressed))
    .padding([6, 14])
    .style(button::primary);

    let mut panel = column![
        row![detect, text(shown.url.as_str()).size(13)]
            .spacing(12)
            .align_y(iced::Alignment::Center)
    ]
    .spacing(8);

    if let Some(message) = &state.error_message {
        panel = panel.push(text(message.as_str()).size(13).style(text::danger));
    }

    // Intrinsic pixel size keeps the overlay aligned; wide images scroll.
    panel
        .push(
            scrollable(overlay_stack)
                .direction(scrollable::Direction::Horizontal(
                    scrollable::Scrollbar::default(),
                ))
                .width(Length::Fill),
        )
        .into()
}

fn placeholder(label: String, width: f32, height: f32) -> Element<'static, Message> {
    container(text(label).size(13))
        .width(width)
        .height(height)
        .center_x(width)
        .center_y(height)
        .style(container::bordered_box)
        .into()
}
