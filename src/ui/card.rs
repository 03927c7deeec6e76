/// One gallery card: thumbnail plus caption, clickable as a whole.

use iced::widget::{column, container, image, mouse_area, text, Space};
use iced::{Element, Length};

use crate::catalog::record::Record;
use crate::thumbs::ThumbState;
use crate::Message;

/// Height reserved while the thumbnail is loading or after it failed
const PLACEHOLDER_HEIGHT: f32 = 180.0;

pub fn view<'a>(
    index: usize,
    record: &'a Record,
    thumb: Option<&'a ThumbState>,
) -> Element<'a, Message> {
    let picture: Element<'a, Message> = match thumb {
        Some(ThumbState::Ready(fetched)) => {
            image(fetched.handle.clone()).width(Length::Fill).into()
        }
        Some(ThumbState::Failed) => container(text("no image").size(13))
            .width(Length::Fill)
            .height(Length::Fixed(PLACEHOLDER_HEIGHT))
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into(),
        _ => Space::new(Length::Fill, Length::Fixed(PLACEHOLDER_HEIGHT)).into(),
    };

    let mut body = column![picture].spacing(6);
    if !record.title.is_empty() {
        body = body.push(text(record.title.as_str()).size(13));
    }

    mouse_area(
        container(body)
            .padding(6)
            .width(Length::Fill)
            .style(container::rounded_box),
    )
    .on_press(Message::CardPressed(index))
    .into()
}
