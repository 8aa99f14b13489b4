use iced::widget::{button, column, image, row, text};
use iced::{Alignment, ContentFit, Element, Length};
use iced_aw::Wrap;

use crate::state::data::ProcessedImage;
use crate::Message;

/// Edge length of one thumbnail card
const THUMBNAIL_SIZE: f32 = 110.0;

/// The "Recent Images" section: a header with a count, then a wrapped grid
/// of thumbnail cards with select / download / delete actions
pub fn recent_images(entries: &[ProcessedImage]) -> Element<'_, Message> {
    let header = row![
        text("Recent Images").size(18),
        text(format!("{} images", entries.len())).size(14),
    ]
    .spacing(10)
    .align_y(Alignment::Center);

    let cards: Vec<Element<Message>> = entries.iter().map(card).collect();

    column![
        header,
        Wrap::with_elements(cards).spacing(12.0).line_spacing(12.0),
    ]
    .spacing(12)
    .into()
}

/// One history entry: thumbnail (click to re-open), name, age, actions
fn card(entry: &ProcessedImage) -> Element<'_, Message> {
    let thumbnail = button(
        image(image::Handle::from_path(&entry.processed_path))
            .width(Length::Fixed(THUMBNAIL_SIZE))
            .height(Length::Fixed(THUMBNAIL_SIZE))
            .content_fit(ContentFit::Cover),
    )
    .on_press(Message::SelectRecent(entry.id.clone()))
    .padding(0);

    let actions = row![
        button(text("Download").size(12))
            .on_press(Message::DownloadRecent(entry.id.clone()))
            .padding([2.0, 6.0]),
        button(text("Delete").size(12))
            .style(button::danger)
            .on_press(Message::DeleteRecent(entry.id.clone()))
            .padding([2.0, 6.0]),
    ]
    .spacing(6);

    column![
        thumbnail,
        text(&entry.name).size(12).width(Length::Fixed(THUMBNAIL_SIZE)),
        text(entry.age_label()).size(11),
        actions,
    ]
    .spacing(4)
    .into()
}
