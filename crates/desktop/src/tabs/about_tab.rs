use iced::widget::{column, text, Space};
use iced::Element;

use crate::app::Message;

pub fn view() -> Element<'static, Message> {
    let version = env!("CARGO_PKG_VERSION");

    column![
        text("Facespot").size(22),
        Space::new().height(4),
        text(format!("Version {version}")).size(13),
        Space::new().height(12),
        text(
            "Open a gallery manifest, pick a picture and press Detect faces. \
             Each face is outlined in green: the face itself, both eyes and \
             the mouth."
        )
        .size(13),
        Space::new().height(12),
        text(
            "Detection runs on the service at the configured origin. Run it \
             locally with `facespot serve`."
        )
        .size(13),
    ]
    .spacing(0)
    .into()
}
