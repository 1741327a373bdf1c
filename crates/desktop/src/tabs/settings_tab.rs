use iced::widget::{button, checkbox, column, pick_list, row, text, text_input, Space};
use iced::Element;

use facespot_core::overlay::domain::overlay_path::EyeConnector;

use crate::app::Message;
use crate::settings::{Appearance, Settings};

pub fn view(settings: &Settings) -> Element<'_, Message> {
    column![
        text("Detection service").size(16),
        Space::new().height(8),
        row![
            text("Origin").size(13),
            text_input("http://localhost:8080", &settings.origin)
                .on_input(Message::OriginChanged)
                .size(13),
        ]
        .spacing(12)
        .align_y(iced::Alignment::Center),
        Space::new().height(20),
        text("Overlay").size(16),
        Space::new().height(8),
        checkbox(settings.eye_connector == EyeConnector::Preserve)
            .label("Join each eye to the previous outline")
            .on_toggle(Message::EyeConnectorToggled)
            .text_size(13),
        Space::new().height(20),
        text("Theme").size(16),
        Space::new().height(8),
        row![
            text("Mode").size(13),
            pick_list(Appearance::ALL, Some(settings.appearance), |a| {
                Message::AppearanceChanged(a)
            })
            .text_size(13),
        ]
        .spacing(12)
        .align_y(iced::Alignment::Center),
        Space::new().height(20),
        button(text("Restore defaults").size(13))
            .on_press(Message::RestoreDefaults)
            .padding([6, 14]),
    ]
    .spacing(0)
    .into()
}
