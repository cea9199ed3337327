use iced::mouse::Interaction;
use iced::widget::{center, column, container, image, mouse_area, text, Space};
use iced::{Border, Color, ContentFit, Element, Length, Padding, Theme};
use std::time::Instant;

use crate::state::data::{Tile, TileImage};
use crate::Message;

/// Second line of every tile overlay
pub const TILE_SUBTITLE: &str = "From the photo gallery";

const ERROR_COLOR: Color = Color {
    r: 0.906,
    g: 0.298,
    b: 0.235,
    a: 1.0,
};

/// One grid cell: picture on top, caption overlay below
///
/// The cell keeps a fixed square footprint so the grid layout matches the
/// viewport arithmetic; the reveal offset is applied inside it.
pub fn view<'a>(tile: &'a Tile, size: f32, now: Instant) -> Element<'a, Message> {
    let opacity = tile.reveal.opacity(now);
    let offset = tile.reveal.offset(now);

    let picture: Element<'a, Message> = match &tile.image {
        TileImage::Ready { handle, .. } => image(handle.clone())
            .width(Length::Fill)
            .height(Length::Fill)
            .content_fit(ContentFit::Cover)
            .opacity(opacity)
            .into(),
        TileImage::Placeholder { message } => center(
            text(message.as_str())
                .size(14)
                .color(Color { a: opacity, ..ERROR_COLOR }),
        )
        .padding(10)
        .into(),
        TileImage::Pending | TileImage::Loading { .. } => {
            Space::new(Length::Fill, Length::Fill).into()
        }
    };

    let caption = container(
        column![
            text(tile.title())
                .size(16)
                .color(Color { a: opacity, ..Color::WHITE }),
            text(TILE_SUBTITLE)
                .size(12)
                .color(Color { a: 0.7 * opacity, ..Color::WHITE }),
        ]
        .spacing(2),
    )
    .padding(8)
    .width(Length::Fill);

    let card = container(column![
        container(picture)
            .width(Length::Fill)
            .height(Length::Fill)
            .clip(true),
        caption,
    ])
    .width(Length::Fill)
    .height(Length::Fill)
    .style(move |theme: &Theme| card_style(theme, opacity));

    let clickable = mouse_area(card)
        .on_press(Message::TileClicked(tile.id))
        .interaction(Interaction::Pointer);

    container(clickable)
        .width(Length::Fixed(size))
        .height(Length::Fixed(size))
        .padding(Padding {
            top: offset,
            right: 0.0,
            bottom: 0.0,
            left: 0.0,
        })
        .clip(true)
        .into()
}

fn card_style(theme: &Theme, opacity: f32) -> container::Style {
    let palette = theme.extended_palette();
    let mut background = palette.background.weak.color;
    background.a = opacity;

    container::Style {
        background: Some(background.into()),
        border: Border {
            radius: 8.0.into(),
            ..Border::default()
        },
        ..container::Style::default()
    }
}
