use crate::gui::{DoclystApp, Message};
use crate::i18n::tr;
use iced::widget::{button, column, container, text, Space};
use iced::{Element, Length};

pub fn view(app: &DoclystApp) -> Element<'_, Message> {
    let lang = app.flow.language();

    let content = column![
        text(tr(lang, "landing_heading")).size(40),
        text(tr(lang, "tagline")).size(18).style(text::secondary),
        Space::with_height(10),
        text(tr(lang, "landing_blurb")).size(16),
        Space::with_height(20),
        button(text(tr(lang, "landing_start")).size(18))
            .padding(14)
            .style(button::primary)
            .on_press(Message::StartPressed),
    ]
    .spacing(15)
    .max_width(560);

    container(content)
        .width(Length::Fill)
        .center_x(Length::Fill)
        .padding(40)
        .into()
}
