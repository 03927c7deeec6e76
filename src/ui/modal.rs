/// Detail view for a single record, rendered as an overlay card.

use iced::widget::{button, column, container, image, row, scrollable, text};
use iced::{Alignment, Element, Length};

use crate::catalog::record::Record;
use crate::thumbs::ThumbState;
use crate::Message;

const MODAL_WIDTH: f32 = 760.0;
const IMAGE_AREA_HEIGHT: f32 = 420.0;
const DESCRIPTION_HEIGHT: f32 = 140.0;

pub fn view<'a>(
    record: &'a Record,
    full: Option<&'a ThumbState>,
    thumb: Option<&'a ThumbState>,
) -> Element<'a, Message> {
    let title = if record.title.is_empty() {
        "Untitled"
    } else {
        record.title.as_str()
    };

    let header = row![
        text(title).size(20).width(Length::Fill),
        button(text("✕").size(16))
            .style(button::text)
            .on_press(Message::CloseDetail),
    ]
    .spacing(10)
    .align_y(Alignment::Center);

    // The full-size image takes over once it arrives; the grid's
    // already-fetched thumbnail stands in until then
    let best = match (full, thumb) {
        (Some(ThumbState::Ready(fetched)), _) => Some(fetched),
        (_, Some(ThumbState::Ready(fetched))) => Some(fetched),
        _ => None,
    };
    let picture: Element<'a, Message> = match best {
        Some(fetched) => image(fetched.handle.clone())
            .width(Length::Fill)
            .height(Length::Fixed(IMAGE_AREA_HEIGHT))
            .into(),
        None => {
            let label = if matches!(full, Some(ThumbState::Failed)) {
                "image unavailable"
            } else {
                "loading…"
            };
            container(text(label).size(14))
                .width(Length::Fill)
                .height(Length::Fixed(IMAGE_AREA_HEIGHT))
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into()
        }
    };

    let mut body = column![header, picture].spacing(12);
    if let Some(description) = record.description.as_deref().filter(|d| !d.is_empty()) {
        body = body.push(
            scrollable(text(description).size(14)).height(Length::Fixed(DESCRIPTION_HEIGHT)),
        );
    }
    if !record.tags.is_empty() {
        body = body.push(text(record.tags.join(" · ")).size(12));
    }

    container(body)
        .padding(16)
        .width(Length::Fixed(MODAL_WIDTH))
        .style(container::rounded_box)
        .into()
}
