use iced::widget::{button, center, column, container, image, mouse_area, opaque, row, stack, text, Space};
use iced::{Alignment, Color, ContentFit, Element, Length};

use crate::state::lightbox::Lightbox;
use crate::Message;

/// Layer the lightbox over `base` when it is open
///
/// The backdrop closes the lightbox on click; the content in the middle
/// swallows clicks so pressing the image itself keeps it open.
pub fn view<'a>(base: Element<'a, Message>, lightbox: &'a Lightbox) -> Element<'a, Message> {
    let Lightbox::Open {
        caption, handle, ..
    } = lightbox
    else {
        return base;
    };

    let close = button(text("×").size(28))
        .on_press(Message::CloseLightbox)
        .style(button::text);

    // Nothing to draw until the tile or the full-size decode delivers pixels
    let picture: Element<'a, Message> = match handle {
        Some(handle) => image(handle.clone())
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
        None => Space::new(Length::Fill, Length::Fill).into(),
    };

    let content = column![
        row![Space::with_width(Length::Fill), close],
        picture,
        text(caption.as_str()).size(20).color(Color::WHITE),
    ]
    .spacing(12)
    .max_width(1100)
    .align_x(Alignment::Center);

    let backdrop = center(opaque(content))
        .padding(40)
        .style(|_theme| container::Style {
            background: Some(
                Color {
                    a: 0.9,
                    ..Color::BLACK
                }
                .into(),
            ),
            ..container::Style::default()
        });

    stack![base, opaque(mouse_area(backdrop).on_press(Message::CloseLightbox))].into()
}
