use std::time::Duration;

use iced::widget::{button, container, image, mouse_area, row, stack, text, Space};
use iced::{Color, Element, Length, Theme};
use iced_anim::transition::Easing;
use iced_anim::AnimationBuilder;

use crate::app::Message;

const CORNER_RADIUS: f32 = 12.0;
const BORDER_WIDTH: f32 = 2.5;
const BADGE_RADIUS: f32 = 10.0;
const SCALE_GROW: f32 = 3.0;
const ANIMATION_DURATION: Duration = Duration::from_millis(200);

/// The outer size each card occupies in the gallery (fixed, never changes with hover).
pub const FULL_CARD_SIZE: f32 = 132.0;

/// Image size at rest. Leaves room for border + padding on each side.
const IMG_SIZE: f32 = FULL_CARD_SIZE - BORDER_WIDTH * 4.0;

/// What a card shows while its image is downloading or after it failed.
#[derive(Debug, Clone)]
pub enum CardImage {
    Loading,
    Ready(image::Handle),
    /// Download or format error, shown in the detection panel.
    Failed(String),
}

pub fn thumbnail_card<'a>(
    picture: CardImage,
    caption: String,
    selected: bool,
    hovered: bool,
    index: usize,
    theme: &Theme,
) -> Element<'a, Message> {
    let palette = theme.palette();
    let surface_alt = surface_alt_color(theme);

    let target = if hovered { 1.0_f32 } else { 0.0 };

    let animated: Element<'a, Message> = AnimationBuilder::new(target, move |t: f32| {
        let t = t.clamp(0.0, 1.0);
        build_card(&picture, &caption, selected, index, t, palette, surface_alt)
    })
    .animates_layout(true)
    .animation(Easing::EASE_OUT.with_duration(ANIMATION_DURATION))
    .into();

    // The animated card can overflow this footprint while hovered.
    container(
        mouse_area(animated)
            .on_enter(Message::ThumbnailHover(index, true))
            .on_exit(Message::ThumbnailHover(index, false)),
    )
    .width(FULL_CARD_SIZE)
    .height(FULL_CARD_SIZE)
    .center_x(FULL_CARD_SIZE)
    .center_y(FULL_CARD_SIZE)
    .into()
}

fn build_card<'a>(
    picture: &CardImage,
    caption: &str,
    selected: bool,
    index: usize,
    hover_amount: f32,
    palette: iced::theme::Palette,
    surface_alt: Color,
) -> Element<'a, Message> {
    let card_size = IMG_SIZE + SCALE_GROW * hover_amount * 2.0;
    let inner_radius = (CORNER_RADIUS - BORDER_WIDTH).max(0.0);

    let face: Element<'a, Message> = match picture {
        CardImage::Ready(handle) => image(handle.clone())
            .width(card_size)
            .height(card_size)
            .content_fit(iced::ContentFit::Cover)
            .border_radius(inner_radius)
            .into(),
        CardImage::Loading | CardImage::Failed(_) => {
            let label = if matches!(picture, CardImage::Failed(_)) {
                "\u{26a0}"
            } else {
                "\u{2026}"
            };
            container(text(label).size(20).color(Color {
                a: 0.5,
                ..palette.text
            }))
            .width(card_size)
            .height(card_size)
            .center_x(card_size)
            .center_y(card_size)
            .into()
        }
    };

    let badge: Element<'a, Message> = container(
        text(caption.to_string())
            .size(11)
            .color(Color::WHITE)
            .font(iced::Font {
                weight: iced::font::Weight::Semibold,
                ..iced::Font::DEFAULT
            }),
    )
    .padding([2, 6])
    .style(|_theme: &Theme| container::Style {
        background: Some(Color::from_rgba(0.0, 0.0, 0.0, 0.55).into()),
        border: iced::border::Border {
            radius: BADGE_RADIUS.into(),
            ..iced::border::Border::default()
        },
        ..container::Style::default()
    })
    .into();

    let overlay = container(row![Space::new().width(Length::Fill), badge].width(Length::Fill))
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(6)
        .align_y(iced::alignment::Vertical::Bottom);

    let border_color = if selected {
        palette.primary
    } else {
        Color {
            a: 0.15,
            ..palette.text
        }
    };

    // Transparent button over the stack handles the click.
    let btn = button(stack![face, overlay])
        .on_press(Message::ThumbnailPressed(index))
        .padding(0)
        .style(|_theme: &Theme, _status: button::Status| button::Style {
            background: None,
            border: iced::border::Border::default(),
            ..button::Style::default()
        });

    container(btn)
        .padding(iced::Padding::from(BORDER_WIDTH))
        .style(move |_theme: &Theme| container::Style {
            background: Some(surface_alt.into()),
            border: iced::border::Border {
                color: border_color,
                width: BORDER_WIDTH,
                radius: CORNER_RADIUS.into(),
            },
            ..container::Style::default()
        })
        .into()
}

fn surface_alt_color(theme: &Theme) -> Color {
    let p = theme.palette();
    let luma = p.background.r * 0.299 + p.background.g * 0.587 + p.background.b * 0.114;
    if luma > 0.5 {
        Color::from_rgb(
            0xF0 as f32 / 255.0,
            0xED as f32 / 255.0,
            0xE8 as f32 / 255.0,
        )
    } else {
        Color {
            r: (p.background.r + 0.12).min(1.0),
            g: (p.background.g + 0.12).min(1.0),
            b: (p.background.b + 0.12).min(1.0),
            a: 1.0,
        }
    }
}
