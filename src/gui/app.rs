//! Main application state for the Doclyst GUI
//!
//! Contains the DoclystApp struct and initialization logic.

use iced::Task;
use std::sync::Arc;
use tracing::info;

use crate::backend::BackendClient;
use crate::config::Config;
use crate::flow::AppFlow;
use crate::i18n;
use crate::speech::SpeechPlayer;

use super::messages::Message;
use super::NARRATION_ENDED;

/// Main application state
pub struct DoclystApp {
    /// Session state machine (step, staging, analysis, preferences)
    pub(crate) flow: AppFlow,
    /// Analysis service client
    pub(crate) backend: Arc<BackendClient>,
    /// Narration playback
    pub(crate) speech: Arc<SpeechPlayer>,
    /// Is a narration session active (drives the read-aloud affordance)
    pub(crate) narrating: bool,
    /// Backend health (None = not checked yet)
    pub(crate) backend_online: Option<bool>,
}

impl DoclystApp {
    /// Create a new DoclystApp instance
    pub fn new(config: Config) -> (Self, Task<Message>) {
        let backend = Arc::new(BackendClient::new(&config.backend_url));
        let speech = Arc::new(SpeechPlayer::new(&config.backend_url));

        // Natural narration completion flips a flag the tick subscription
        // picks up; an explicit stop never does
        speech.on_end(|| {
            NARRATION_ENDED.store(true, std::sync::atomic::Ordering::SeqCst);
        });

        info!("🚀 Doclyst client initialized ({})", config.backend_url);

        let app = Self {
            flow: AppFlow::new(config.language),
            backend: backend.clone(),
            speech,
            narrating: false,
            backend_online: None,
        };

        // Probe the backend once at startup
        let probe = Task::perform(
            async move { backend.health().await },
            Message::BackendHealth,
        );

        (app, probe)
    }

    /// Application title
    pub fn title(&self) -> String {
        i18n::tr(self.flow.language(), "app_title")
    }

    /// Application theme
    pub fn theme(&self) -> iced::Theme {
        iced::Theme::Light
    }
}
