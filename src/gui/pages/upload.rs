use crate::gui::{DoclystApp, Message};
use crate::i18n::tr;
use crate::language::Language;
use crate::staging::{Bucket, StagedFile, UploadMode};
use iced::widget::{button, column, container, row, text, Column, Space};
use iced::{Alignment, Element, Length};

pub fn view(app: &DoclystApp) -> Element<'_, Message> {
    let lang = app.flow.language();
    let staging = app.flow.staging();
    let mode = staging.mode();

    let mut content = column![
        text(tr(lang, "upload_heading")).size(28),
        text(tr(lang, "upload_hint")).size(15).style(text::secondary),
    ]
    .spacing(16);

    if let Some(notice) = app.flow.notice() {
        content = content.push(notice_banner(lang, notice));
    }

    // Mode toggle; switching clears staged files on purpose
    let mode_button = |label_key: &'static str, value: UploadMode| {
        let style = if mode == value {
            button::primary
        } else {
            button::secondary
        };
        button(text(tr(lang, label_key)))
            .padding(10)
            .style(style)
            .on_press(Message::ModeSelected(value))
    };
    content = content.push(
        row![
            mode_button("mode_single", UploadMode::Single),
            mode_button("mode_comparison", UploadMode::Comparison),
        ]
        .spacing(10),
    );

    content = match mode {
        UploadMode::Single => content.push(bucket_panel(lang, staging.files(Bucket::Selected), Bucket::Selected, None)),
        UploadMode::Comparison => content.push(
            row![
                bucket_panel(lang, staging.files(Bucket::Old), Bucket::Old, Some("old_report")),
                bucket_panel(lang, staging.files(Bucket::New), Bucket::New, Some("new_report")),
            ]
            .spacing(20),
        ),
    };

    let action_key = match mode {
        UploadMode::Single => "analyze",
        UploadMode::Comparison => "compare",
    };
    let submit = button(text(tr(lang, action_key)).size(18))
        .padding(12)
        .style(button::success)
        .on_press_maybe(staging.can_submit().then_some(Message::SubmitPressed));
    content = content.push(submit);

    container(content).width(Length::Fill).into()
}

fn notice_banner<'a>(lang: Language, notice: &'a str) -> Element<'a, Message> {
    container(
        row![
            text(notice).style(text::danger),
            Space::with_width(Length::Fill),
            button(text(tr(lang, "notice_dismiss")).size(13))
                .style(button::text)
                .on_press(Message::DismissNotice),
        ]
        .align_y(Alignment::Center),
    )
    .padding(12)
    .width(Length::Fill)
    .style(container::rounded_box)
    .into()
}

fn bucket_panel<'a>(
    lang: Language,
    files: &'a [StagedFile],
    bucket: Bucket,
    title_key: Option<&'static str>,
) -> Element<'a, Message> {
    let mut panel = column![].spacing(10);

    if let Some(key) = title_key {
        panel = panel.push(text(tr(lang, key)).size(18));
    }

    panel = panel.push(
        button(text(tr(lang, "pick_files")))
            .padding(10)
            .on_press(Message::PickFiles(bucket)),
    );

    if files.is_empty() {
        panel = panel.push(text(tr(lang, "no_files")).size(14).style(text::secondary));
    } else {
        let rows: Vec<Element<Message>> = files
            .iter()
            .enumerate()
            .map(|(index, file)| file_row(file, bucket, index))
            .collect();
        panel = panel.push(Column::with_children(rows).spacing(6));
    }

    container(panel)
        .padding(15)
        .width(Length::Fill)
        .style(container::rounded_box)
        .into()
}

fn file_row(file: &StagedFile, bucket: Bucket, index: usize) -> Element<'_, Message> {
    let icon = if file.mime.starts_with("image/") {
        "🖼"
    } else if file.mime == "application/pdf" {
        "📄"
    } else {
        "📎"
    };

    row![
        text(icon),
        column![
            text(&file.name).size(14),
            text(file.human_size()).size(12).style(text::secondary),
        ]
        .spacing(2),
        Space::with_width(Length::Fill),
        button(text("✕").size(13))
            .style(button::danger)
            .on_press(Message::RemoveFile(bucket, index)),
    ]
    .spacing(10)
    .align_y(Alignment::Center)
    .into()
}
