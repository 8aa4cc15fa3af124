use crate::gui::{DoclystApp, Message};
use crate::i18n::tr;
use crate::report::FALLBACK_DISCLAIMER;
use iced::widget::{button, column, container, text, Space};
use iced::{Element, Length};

pub fn view(app: &DoclystApp) -> Element<'_, Message> {
    let lang = app.flow.language();

    let content = column![
        text(tr(lang, "about_heading")).size(32),
        text(tr(lang, "about_body")).size(16),
        Space::with_height(10),
        text(FALLBACK_DISCLAIMER).size(13).style(text::secondary),
        Space::with_height(20),
        button(text(tr(lang, "nav_close_about")))
            .padding(10)
            .style(button::secondary)
            .on_press(Message::CloseAbout),
    ]
    .spacing(15)
    .max_width(640);

    container(content)
        .width(Length::Fill)
        .center_x(Length::Fill)
        .padding(30)
        .into()
}
