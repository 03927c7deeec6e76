/// The tag chip strip: one button per chip, horizontally scrollable with
/// edge buttons, selection shown through the button style.

use std::collections::BTreeSet;

use iced::widget::{button, row, scrollable, text};
use iced::{Alignment, Element};

use crate::Message;

/// Scrollable id shared with the update loop so the edge buttons can
/// drive the strip's offset.
pub fn chips_id() -> scrollable::Id {
    scrollable::Id::new("chips")
}

pub fn view<'a>(chips: &'a [String], selected: &BTreeSet<String>) -> Element<'a, Message> {
    let mut strip = row![].spacing(6);
    for chip in chips {
        let style = if selected.contains(chip) {
            button::primary
        } else {
            button::secondary
        };
        strip = strip.push(
            button(text(chip.as_str()).size(13))
                .style(style)
                .padding([4.0, 10.0])
                .on_press(Message::TagToggled(chip.clone())),
        );
    }

    let strip = scrollable(strip).id(chips_id()).direction(
        scrollable::Direction::Horizontal(scrollable::Scrollbar::new().width(2).scroller_width(2)),
    );

    row![
        button(text("‹").size(16))
            .style(button::text)
            .on_press(Message::ChipsPrev),
        strip,
        button(text("›").size(16))
            .style(button::text)
            .on_press(Message::ChipsNext),
    ]
    .spacing(8)
    .align_y(Alignment::Center)
    .into()
}
