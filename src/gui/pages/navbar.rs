use crate::flow::AppStep;
use crate::gui::{DoclystApp, Message};
use crate::i18n::tr;
use crate::language::Language;
use iced::widget::{button, pick_list, row, text, Space};
use iced::{Alignment, Element, Length};

pub fn view(app: &DoclystApp) -> Element<'_, Message> {
    let lang = app.flow.language();

    let logo = button(text(format!("🩺 {}", tr(lang, "app_title"))).size(22))
        .style(button::text)
        .on_press(Message::ResetPressed);

    let mut bar = row![logo].spacing(12).padding(10).align_y(Alignment::Center);

    if matches!(app.flow.step(), AppStep::Upload | AppStep::Results) {
        bar = bar.push(
            button(text(tr(lang, "nav_back")))
                .style(button::text)
                .on_press(Message::ResetPressed),
        );
    }

    bar = bar.push(Space::with_width(Length::Fill));

    if let Some(online) = app.backend_online {
        let (key, style) = if online {
            ("health_online", text::success as fn(&iced::Theme) -> text::Style)
        } else {
            ("health_offline", text::danger as fn(&iced::Theme) -> text::Style)
        };
        bar = bar.push(text(tr(lang, key)).size(14).style(style));
    }

    bar = bar.push(
        pick_list(Language::ALL, Some(lang), Message::LanguageSelected).text_size(14),
    );

    match app.flow.step() {
        AppStep::About => {
            bar = bar.push(
                button(text(tr(lang, "nav_close_about")))
                    .style(button::secondary)
                    .on_press(Message::CloseAbout),
            );
        }
        AppStep::Upload | AppStep::Results => {
            bar = bar.push(
                button(text(tr(lang, "nav_about")))
                    .style(button::secondary)
                    .on_press(Message::OpenAbout),
            );
        }
        _ => {}
    }

    bar.into()
}
