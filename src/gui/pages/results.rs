use crate::gui::{DoclystApp, Message};
use crate::i18n::tr;
use crate::language::Language;
use crate::report::{AnalysisResult, ComparisonItem, ReportStatus, TestItem, TestStatus};
use iced::widget::{button, column, container, row, text, Column, Space};
use iced::{Alignment, Element, Length};

pub fn view(app: &DoclystApp) -> Element<'_, Message> {
    let lang = app.flow.language();

    // The state machine only routes here with a stored analysis
    let Some(result) = app.flow.analysis() else {
        return Space::with_height(0).into();
    };

    let mut content = column![banner(lang, result), controls(app, lang)].spacing(20);

    if !result.summary.is_empty() {
        content = content.push(section(
            tr(lang, "summary_heading"),
            text(&result.summary).size(16).into(),
        ));
    }

    if !result.tests.is_empty() {
        let rows: Vec<Element<Message>> = result.tests.iter().map(test_row).collect();
        content = content.push(section(
            tr(lang, "tests_heading"),
            Column::with_children(rows).spacing(12).into(),
        ));
    }

    if let Some(comparison) = &result.comparison {
        if !comparison.comparison_summary.is_empty() {
            content = content.push(section(
                tr(lang, "comparison_heading"),
                text(&comparison.comparison_summary).size(16).into(),
            ));
        }
        let buckets: [(&str, &[ComparisonItem]); 4] = [
            ("improved_heading", &comparison.improved),
            ("worsened_heading", &comparison.worsened),
            ("stable_heading", &comparison.stable),
            ("new_findings_heading", &comparison.new_findings),
        ];
        for (key, items) in buckets {
            if items.is_empty() {
                continue;
            }
            let rows: Vec<Element<Message>> = items.iter().map(comparison_row).collect();
            content = content.push(section(
                tr(lang, key),
                Column::with_children(rows).spacing(8).into(),
            ));
        }
    }

    let lists: [(&str, &[String]); 3] = [
        ("does_not_mean_heading", &result.does_not_mean),
        ("next_steps_heading", &result.next_steps),
        ("doctor_questions_heading", &result.doctor_questions),
    ];
    for (key, items) in lists {
        if items.is_empty() {
            continue;
        }
        let bullets: Vec<Element<Message>> = items
            .iter()
            .map(|item| text(format!("• {}", item)).size(15).into())
            .collect();
        content = content.push(section(
            tr(lang, key),
            Column::with_children(bullets).spacing(6).into(),
        ));
    }

    content = content.push(text(&result.disclaimer).size(13).style(text::secondary));

    container(content).width(Length::Fill).into()
}

fn banner<'a>(lang: Language, result: &'a AnalysisResult) -> Element<'a, Message> {
    container(
        text(tr(lang, result.overall_status.label_key()))
            .size(26)
            .style(status_style(result.overall_status)),
    )
    .padding(15)
    .width(Length::Fill)
    .style(container::rounded_box)
    .into()
}

fn controls<'a>(app: &'a DoclystApp, lang: Language) -> Element<'a, Message> {
    let narrate = if app.narrating {
        button(text(format!("🔇 {}", tr(lang, "stop_reading"))))
            .padding(10)
            .style(button::danger)
            .on_press(Message::StopReadingPressed)
    } else {
        button(text(format!("🔊 {}", tr(lang, "read_aloud"))))
            .padding(10)
            .style(button::primary)
            .on_press(Message::ReadAloudPressed)
    };

    row![
        narrate,
        Space::with_width(Length::Fill),
        button(text(tr(lang, "start_over")))
            .padding(10)
            .style(button::secondary)
            .on_press(Message::ResetPressed),
    ]
    .align_y(Alignment::Center)
    .into()
}

fn section<'a>(title: String, body: Element<'a, Message>) -> Element<'a, Message> {
    container(column![text(title).size(20), body].spacing(10))
        .padding(15)
        .width(Length::Fill)
        .style(container::rounded_box)
        .into()
}

fn test_row(test: &TestItem) -> Element<'_, Message> {
    row![
        text(test_marker(test.status)).style(test_style(test.status)),
        column![
            text(&test.name).size(16),
            text(format!("{} ({})", test.value, test.range))
                .size(14)
                .style(text::secondary),
            text(&test.explanation).size(14),
        ]
        .spacing(2),
    ]
    .spacing(10)
    .into()
}

fn comparison_row(item: &ComparisonItem) -> Element<'_, Message> {
    column![
        text(format!(
            "{}: {} → {}",
            item.name, item.old_value, item.new_value
        ))
        .size(15),
        text(&item.explanation).size(14).style(text::secondary),
    ]
    .spacing(2)
    .into()
}

fn status_style(status: ReportStatus) -> fn(&iced::Theme) -> text::Style {
    match status {
        ReportStatus::Normal => text::success,
        ReportStatus::Attention => attention_text,
        ReportStatus::Urgent => text::danger,
    }
}

fn test_style(status: TestStatus) -> fn(&iced::Theme) -> text::Style {
    match status {
        TestStatus::Normal => text::success,
        TestStatus::Warning => attention_text,
        TestStatus::Alert => text::danger,
    }
}

fn test_marker(status: TestStatus) -> &'static str {
    match status {
        TestStatus::Normal => "●",
        TestStatus::Warning => "◐",
        TestStatus::Alert => "○",
    }
}

fn attention_text(_theme: &iced::Theme) -> text::Style {
    text::Style {
        color: Some(iced::Color::from_rgb(0.85, 0.55, 0.10)),
    }
}
