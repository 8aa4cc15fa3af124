//! GUI module using iced
//!
//! Glue between the flow state machine and the widget tree: dispatches
//! commands into [`AppFlow`](crate::flow::AppFlow), performs async work
//! through [`iced::Task`], and routes the active step to its page view.

use iced::widget::{column, scrollable};
use iced::{Element, Length, Subscription, Task};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use crate::backend::BackendClient;
use crate::flow::{AnalysisRequest, AppStep, Submission};
use crate::report::AnalysisResult;
use crate::staging::StagedFile;

// Sub-modules
pub mod app;
pub mod messages;
pub mod pages;

// Re-exports for convenience
pub use app::DoclystApp;
pub use messages::Message;

/// Set by the playback on-end callback, drained by the tick subscription
pub static NARRATION_ENDED: AtomicBool = AtomicBool::new(false);

/// Scrollable id of the page body, for the scroll-to-top effect
const PAGE_SCROLL: &str = "doclyst-page";

impl DoclystApp {
    pub fn update(&mut self, message: Message) -> Task<Message> {
        let step_before = self.flow.step();
        let task = self.dispatch(message);

        // Every step change scrolls the page back to the top
        if self.flow.step() != step_before {
            let scroll = scrollable::scroll_to(
                scrollable::Id::new(PAGE_SCROLL),
                scrollable::AbsoluteOffset { x: 0.0, y: 0.0 },
            );
            return Task::batch(vec![task, scroll]);
        }
        task
    }

    fn dispatch(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::None => {}

            Message::StartPressed => {
                self.flow.begin();
            }
            Message::ResetPressed => {
                // Reset clears pending intent; playback must not outlive it
                self.speech.stop();
                self.narrating = false;
                self.flow.reset();
            }
            Message::OpenAbout => {
                self.flow.open_about();
            }
            Message::CloseAbout => {
                self.flow.close_about();
            }

            Message::ModeSelected(mode) => {
                self.flow.set_mode(mode);
            }
            Message::LanguageSelected(language) => {
                self.flow.set_language(language);
            }
            Message::PickFiles(bucket) => {
                return Task::perform(pick_files(), move |files| {
                    if files.is_empty() {
                        Message::None
                    } else {
                        Message::FilesPicked(bucket, files)
                    }
                });
            }
            Message::FilesPicked(bucket, files) => {
                info!("📎 Staged {} file(s) into {:?}", files.len(), bucket);
                self.flow.add_files(bucket, files);
            }
            Message::RemoveFile(bucket, index) => {
                self.flow.remove_file(bucket, index);
            }
            Message::DismissNotice => {
                self.flow.dismiss_notice();
            }

            Message::SubmitPressed => match self.flow.submit() {
                Ok(submission) => {
                    let backend = self.backend.clone();
                    return Task::perform(run_analysis(backend, submission), |(token, outcome)| {
                        Message::AnalysisFinished { token, outcome }
                    });
                }
                Err(e) => {
                    // The submit affordance is disabled in these states;
                    // a rejected command is worth a trace, not a dialog
                    debug!("Submit rejected: {}", e);
                }
            },
            Message::AnalysisFinished { token, outcome } => {
                self.flow.complete(token, outcome);
            }

            Message::ReadAloudPressed => {
                if let Some(result) = self.flow.analysis() {
                    let narration = result.narration(self.flow.language());
                    let language = self.flow.language();
                    let speech = self.speech.clone();

                    NARRATION_ENDED.store(false, Ordering::SeqCst);
                    self.narrating = true;

                    return Task::perform(
                        async move {
                            speech
                                .speak(&narration, language)
                                .await
                                .map_err(|e| e.to_string())
                        },
                        Message::NarrationStarted,
                    );
                }
            }
            Message::StopReadingPressed => {
                self.speech.stop();
                self.narrating = false;
            }
            Message::NarrationStarted(outcome) => {
                if let Err(notice) = outcome {
                    debug!("Narration did not start: {}", notice);
                }
                self.narrating = self.speech.is_speaking();
            }
            Message::NarrationTick => {
                if NARRATION_ENDED.swap(false, Ordering::SeqCst) || !self.speech.is_speaking() {
                    self.narrating = false;
                }
            }

            Message::BackendHealth(online) => {
                if !online {
                    tracing::warn!("⚠️ Backend health probe failed");
                }
                self.backend_online = Some(online);
            }
        }
        Task::none()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        if self.narrating {
            // Poll for natural narration completion while a session runs
            iced::time::every(std::time::Duration::from_millis(200))
                .map(|_| Message::NarrationTick)
        } else {
            Subscription::none()
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let page = match self.flow.step() {
            AppStep::Landing => pages::landing::view(self),
            AppStep::Upload => pages::upload::view(self),
            AppStep::Processing => pages::processing::view(self),
            AppStep::Results => pages::results::view(self),
            AppStep::About => pages::about::view(self),
        };

        let body = scrollable(
            iced::widget::container(page)
                .width(Length::Fill)
                .padding(20),
        )
        .id(scrollable::Id::new(PAGE_SCROLL))
        .height(Length::Fill);

        column![pages::navbar::view(self), body].into()
    }
}

/// Open the file dialog and read every picked file into memory
async fn pick_files() -> Vec<StagedFile> {
    let Some(handles) = rfd::AsyncFileDialog::new()
        .add_filter("Report files (PDF or image)", &["pdf", "jpg", "jpeg", "png"])
        .pick_files()
        .await
    else {
        return Vec::new();
    };

    let mut files = Vec::with_capacity(handles.len());
    for handle in handles {
        let bytes = handle.read().await;
        files.push(StagedFile::new(handle.file_name(), bytes));
    }
    files
}

/// Run one submission against the backend, tagging the outcome with its token
async fn run_analysis(
    backend: Arc<BackendClient>,
    submission: Submission,
) -> (u64, Result<AnalysisResult, String>) {
    let outcome = match &submission.request {
        AnalysisRequest::Single(files) => backend.analyze(files, submission.language).await,
        AnalysisRequest::Comparison { old, new } => {
            backend.compare(old, new, submission.language).await
        }
    };

    (submission.token, outcome.map_err(|e| e.to_string()))
}
