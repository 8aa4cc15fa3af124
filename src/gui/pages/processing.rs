use crate::gui::{DoclystApp, Message};
use crate::i18n::tr;
use iced::widget::{column, container, text};
use iced::{Element, Length};

pub fn view(app: &DoclystApp) -> Element<'_, Message> {
    let lang = app.flow.language();

    let content = column![
        text("⏳").size(48),
        text(tr(lang, "processing_heading")).size(28),
        text(tr(lang, "processing_hint")).size(15).style(text::secondary),
    ]
    .spacing(15)
    .align_x(iced::Alignment::Center);

    container(content)
        .width(Length::Fill)
        .height(Length::Fixed(400.0))
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}
