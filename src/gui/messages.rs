//! Message types for the Doclyst GUI
//!
//! All messages that can be sent to update the application state.

use crate::language::Language;
use crate::report::AnalysisResult;
use crate::staging::{Bucket, StagedFile, UploadMode};

/// Messages that drive the application
#[derive(Debug, Clone)]
pub enum Message {
    None,

    // Navigation
    StartPressed,
    ResetPressed,
    OpenAbout,
    CloseAbout,

    // Staging
    ModeSelected(UploadMode),
    PickFiles(Bucket),
    FilesPicked(Bucket, Vec<StagedFile>),
    RemoveFile(Bucket, usize),
    DismissNotice,

    // Analysis
    SubmitPressed,
    AnalysisFinished {
        token: u64,
        outcome: Result<AnalysisResult, String>,
    },

    // Preferences
    LanguageSelected(Language),

    // Narration
    ReadAloudPressed,
    StopReadingPressed,
    NarrationStarted(Result<(), String>),
    NarrationTick,

    // Backend
    BackendHealth(bool),
}
