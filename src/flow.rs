//! Application flow state machine
//!
//! Single owner of the client's session state: the visible step, the
//! staged files, the fetched analysis and the user's mode/language
//! preferences. Views issue commands and read projections; nothing else
//! mutates this state.
//!
//! Submissions are asynchronous, so every one carries a token from a
//! monotonically increasing counter. A completion only applies when its
//! token is still current and the step is still `Processing`; responses
//! that arrive after a reset (or after a newer submission) are discarded
//! instead of being applied to stale state.

use crate::error::{DoclystError, DoclystResult};
use crate::language::Language;
use crate::report::AnalysisResult;
use crate::staging::{Bucket, FileStaging, StagedFile, UploadMode};
use tracing::{debug, info, warn};

/// Which view is visible; exactly one step is active at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppStep {
    #[default]
    Landing,
    Upload,
    Processing,
    Results,
    About,
}

/// The payload of one dispatched submission
#[derive(Debug, Clone)]
pub enum AnalysisRequest {
    Single(Vec<StagedFile>),
    Comparison {
        old: Vec<StagedFile>,
        new: Vec<StagedFile>,
    },
}

/// A validated submission, ready for the backend client
#[derive(Debug, Clone)]
pub struct Submission {
    pub token: u64,
    pub request: AnalysisRequest,
    pub language: Language,
}

/// What `complete` did with an analysis outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Result stored, step moved to Results
    Success,
    /// Failure surfaced, step moved back to Upload
    Failure,
    /// Response no longer matches current state; discarded
    Stale,
}

/// The application state machine
#[derive(Debug, Default)]
pub struct AppFlow {
    step: AppStep,
    return_step: AppStep,
    staging: FileStaging,
    analysis: Option<AnalysisResult>,
    language: Language,
    notice: Option<String>,
    submission: u64,
    submitted_mode: Option<UploadMode>,
}

impl AppFlow {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ..Self::default()
        }
    }

    // -- projections ------------------------------------------------------

    pub fn step(&self) -> AppStep {
        self.step
    }

    pub fn staging(&self) -> &FileStaging {
        &self.staging
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.analysis.as_ref()
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// The pending user-visible failure notice, if any
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    // -- navigation -------------------------------------------------------

    /// Landing -> Upload
    pub fn begin(&mut self) {
        if self.step == AppStep::Landing {
            self.step = AppStep::Upload;
        }
    }

    /// Upload/Results -> About, remembering where to return
    pub fn open_about(&mut self) {
        if matches!(self.step, AppStep::Upload | AppStep::Results) {
            self.return_step = self.step;
            self.step = AppStep::About;
        }
    }

    /// About -> wherever the user came from
    pub fn close_about(&mut self) {
        if self.step == AppStep::About {
            self.step = self.return_step;
        }
    }

    /// Any step -> Landing
    ///
    /// Clears staging, the stored analysis and any notice, and resets the
    /// mode to Single. The language survives: it is a durable preference,
    /// not session state. In-flight submissions become stale.
    pub fn reset(&mut self) {
        self.submission += 1;
        self.step = AppStep::Landing;
        self.return_step = AppStep::Landing;
        self.staging = FileStaging::new();
        self.analysis = None;
        self.notice = None;
        self.submitted_mode = None;
        info!("🔄 Session reset");
    }

    // -- staging & preferences -------------------------------------------

    pub fn set_mode(&mut self, mode: UploadMode) {
        if self.staging.mode() != mode {
            self.staging.set_mode(mode);
        }
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn add_files(&mut self, bucket: Bucket, files: Vec<StagedFile>) {
        self.staging.add(bucket, files);
    }

    pub fn remove_file(&mut self, bucket: Bucket, index: usize) {
        self.staging.remove(bucket, index);
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    // -- submission lifecycle --------------------------------------------

    /// Upload -> Processing, handing back the request to dispatch
    ///
    /// Rejected while a submission is already in flight, and when the
    /// active mode's required buckets are not all populated.
    pub fn submit(&mut self) -> DoclystResult<Submission> {
        if self.step == AppStep::Processing {
            return Err(DoclystError::Staging(
                "an analysis is already in flight".into(),
            ));
        }
        if self.step != AppStep::Upload {
            return Err(DoclystError::Staging("nothing staged to submit".into()));
        }
        if !self.staging.can_submit() {
            return Err(DoclystError::Staging(match self.staging.mode() {
                UploadMode::Single => "select at least one report page".into(),
                UploadMode::Comparison => "both the older and newer report are required".into(),
            }));
        }

        let mode = self.staging.mode();
        let request = match mode {
            UploadMode::Single => AnalysisRequest::Single(self.staging.files(Bucket::Selected).to_vec()),
            UploadMode::Comparison => AnalysisRequest::Comparison {
                old: self.staging.files(Bucket::Old).to_vec(),
                new: self.staging.files(Bucket::New).to_vec(),
            },
        };

        self.analysis = None;
        self.notice = None;
        self.submitted_mode = Some(mode);
        self.submission += 1;
        self.step = AppStep::Processing;

        info!("📤 Submission {} dispatched ({:?})", self.submission, mode);
        Ok(Submission {
            token: self.submission,
            request,
            language: self.language,
        })
    }

    /// Apply an analysis outcome, unless it has gone stale
    pub fn complete(
        &mut self,
        token: u64,
        outcome: Result<AnalysisResult, String>,
    ) -> Resolution {
        if token != self.submission || self.step != AppStep::Processing {
            debug!(
                "🗑️ Discarding stale analysis response (token {}, current {})",
                token, self.submission
            );
            return Resolution::Stale;
        }

        match outcome {
            Ok(mut result) => {
                // The flag follows the request actually sent, not the wire
                result.is_comparison =
                    self.submitted_mode.take() == Some(UploadMode::Comparison);
                info!("✅ Analysis ready ({:?})", result.overall_status);
                self.analysis = Some(result);
                self.step = AppStep::Results;
                Resolution::Success
            }
            Err(notice) => {
                warn!("⚠️ Analysis failed: {}", notice);
                // Clear the buckets of the mode that was submitted so the
                // user restages from a clean slate
                match self.submitted_mode.take() {
                    Some(UploadMode::Single) => self.staging.clear(Bucket::Selected),
                    Some(UploadMode::Comparison) => {
                        self.staging.clear(Bucket::Old);
                        self.staging.clear(Bucket::New);
                    }
                    None => {}
                }
                self.notice = Some(notice);
                self.step = AppStep::Upload;
                Resolution::Failure
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{ReportStatus, TestItem, TestStatus, FALLBACK_DISCLAIMER};

    fn staged(name: &str) -> StagedFile {
        StagedFile::new(name, vec![1u8; 8])
    }

    fn analysis_ok() -> AnalysisResult {
        AnalysisResult {
            overall_status: ReportStatus::Normal,
            summary: "ok".to_string(),
            tests: vec![TestItem {
                name: "Hgb".to_string(),
                value: "14".to_string(),
                range: "13-17".to_string(),
                explanation: "fine".to_string(),
                status: TestStatus::Normal,
            }],
            disclaimer: FALLBACK_DISCLAIMER.to_string(),
            does_not_mean: Vec::new(),
            next_steps: Vec::new(),
            doctor_questions: Vec::new(),
            is_comparison: false,
            comparison: None,
        }
    }

    fn flow_at_upload() -> AppFlow {
        let mut flow = AppFlow::new(Language::En);
        flow.begin();
        flow
    }

    #[test]
    fn test_single_mode_happy_path() {
        let mut flow = flow_at_upload();
        flow.add_files(Bucket::Selected, vec![staged("report.jpg")]);

        let submission = flow.submit().expect("submit accepted");
        assert_eq!(flow.step(), AppStep::Processing);
        assert!(matches!(submission.request, AnalysisRequest::Single(ref f) if f.len() == 1));

        let resolution = flow.complete(submission.token, Ok(analysis_ok()));
        assert_eq!(resolution, Resolution::Success);
        assert_eq!(flow.step(), AppStep::Results);

        let result = flow.analysis().expect("analysis stored");
        assert_eq!(result.overall_status, ReportStatus::Normal);
        assert_eq!(result.tests.len(), 1);
        assert!(result.does_not_mean.is_empty());
        assert!(!result.is_comparison);
    }

    #[test]
    fn test_submit_rejected_with_missing_comparison_bucket() {
        let mut flow = flow_at_upload();
        flow.set_mode(UploadMode::Comparison);
        flow.add_files(Bucket::Old, vec![staged("old.pdf")]);

        assert!(matches!(flow.submit(), Err(DoclystError::Staging(_))));
        assert_eq!(flow.step(), AppStep::Upload);
    }

    #[test]
    fn test_submit_rejected_while_processing() {
        let mut flow = flow_at_upload();
        flow.add_files(Bucket::Selected, vec![staged("a.png")]);
        let first = flow.submit().expect("first submit");

        assert!(matches!(flow.submit(), Err(DoclystError::Staging(_))));
        // The original submission is still the live one
        assert_eq!(
            flow.complete(first.token, Ok(analysis_ok())),
            Resolution::Success
        );
    }

    #[test]
    fn test_stale_response_after_reset_is_discarded() {
        let mut flow = flow_at_upload();
        flow.add_files(Bucket::Selected, vec![staged("a.png")]);
        let submission = flow.submit().expect("submit");

        flow.reset();
        let resolution = flow.complete(submission.token, Ok(analysis_ok()));

        assert_eq!(resolution, Resolution::Stale);
        assert_eq!(flow.step(), AppStep::Landing);
        assert!(flow.analysis().is_none());
    }

    #[test]
    fn test_failure_returns_to_upload_and_clears_selection() {
        let mut flow = flow_at_upload();
        flow.add_files(Bucket::Selected, vec![staged("a.png")]);
        let submission = flow.submit().expect("submit");

        let resolution = flow.complete(submission.token, Err("couldn't analyze".to_string()));

        assert_eq!(resolution, Resolution::Failure);
        assert_eq!(flow.step(), AppStep::Upload);
        assert!(flow.staging().files(Bucket::Selected).is_empty());
        assert_eq!(flow.notice(), Some("couldn't analyze"));
    }

    #[test]
    fn test_comparison_failure_clears_both_buckets() {
        let mut flow = flow_at_upload();
        flow.set_mode(UploadMode::Comparison);
        flow.add_files(Bucket::Old, vec![staged("old.pdf")]);
        flow.add_files(Bucket::New, vec![staged("new.pdf")]);
        let submission = flow.submit().expect("submit");

        flow.complete(submission.token, Err("couldn't compare".to_string()));

        assert!(flow.staging().files(Bucket::Old).is_empty());
        assert!(flow.staging().files(Bucket::New).is_empty());
    }

    #[test]
    fn test_comparison_flag_follows_submitted_mode() {
        let mut flow = flow_at_upload();
        flow.set_mode(UploadMode::Comparison);
        flow.add_files(Bucket::Old, vec![staged("old.pdf")]);
        flow.add_files(Bucket::New, vec![staged("new.pdf")]);
        let submission = flow.submit().expect("submit");

        // Even if the wire response forgot the flag
        flow.complete(submission.token, Ok(analysis_ok()));
        assert!(flow.analysis().expect("stored").is_comparison);
    }

    #[test]
    fn test_reset_preserves_language() {
        let mut flow = AppFlow::new(Language::Hi);
        flow.begin();
        flow.set_mode(UploadMode::Comparison);
        flow.reset();

        assert_eq!(flow.language(), Language::Hi);
        assert_eq!(flow.step(), AppStep::Landing);
        assert_eq!(flow.staging().mode(), UploadMode::Single);
    }

    #[test]
    fn test_about_round_trip() {
        let mut flow = flow_at_upload();
        flow.open_about();
        assert_eq!(flow.step(), AppStep::About);
        flow.close_about();
        assert_eq!(flow.step(), AppStep::Upload);

        // Not reachable from Landing
        flow.reset();
        flow.open_about();
        assert_eq!(flow.step(), AppStep::Landing);
    }

    #[test]
    fn test_new_submission_clears_previous_result() {
        let mut flow = flow_at_upload();
        flow.add_files(Bucket::Selected, vec![staged("a.png")]);
        let first = flow.submit().expect("submit");
        flow.complete(first.token, Ok(analysis_ok()));
        assert!(flow.analysis().is_some());

        // Back to upload via a failure-free route: reset + restage
        flow.reset();
        flow.begin();
        flow.add_files(Bucket::Selected, vec![staged("b.png")]);
        let second = flow.submit().expect("second submit");
        assert!(flow.analysis().is_none());
        assert!(second.token > first.token);
    }
}
