//! Analysis backend client
//!
//! Submits staged report pages to the remote analyzer and decodes the
//! heterogeneous JSON response into the canonical [`AnalysisResult`].
//! The wire shape is trusted nowhere past this module: every optional
//! array becomes an empty sequence, unknown enum strings collapse to
//! their safe defaults, and transport/parse failures map to one fixed
//! user-safe message per operation.

use crate::error::{DoclystError, DoclystResult};
use crate::language::Language;
use crate::report::{
    AnalysisResult, ChangeDirection, ComparisonItem, ComparisonResult, ReportStatus, TestItem,
    TestStatus, FALLBACK_DISCLAIMER,
};
use crate::staging::StagedFile;
use reqwest::multipart;
use serde::Deserialize;
use tracing::{debug, warn};

/// User-safe notice for a failed analyze call
pub const ANALYZE_FAILED_NOTICE: &str = "We couldn't analyze your report. Please try again.";

/// User-safe notice for a failed compare call
pub const COMPARE_FAILED_NOTICE: &str = "We couldn't compare your reports. Please try again.";

// ---------------------------------------------------------------------------
// Raw wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawAnalysis {
    overall_status: Option<String>,
    summary: Option<String>,
    tests: Option<Vec<RawTest>>,
    disclaimer: Option<String>,
    does_not_mean: Option<Vec<String>>,
    next_steps: Option<Vec<String>>,
    doctor_questions: Option<Vec<String>>,
    comparison: Option<RawComparison>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawTest {
    name: Option<String>,
    value: Option<String>,
    range: Option<String>,
    explanation: Option<String>,
    status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawComparison {
    improved: Option<Vec<RawComparisonItem>>,
    worsened: Option<Vec<RawComparisonItem>>,
    stable: Option<Vec<RawComparisonItem>>,
    new_findings: Option<Vec<RawComparisonItem>>,
    comparison_summary: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawComparisonItem {
    name: Option<String>,
    old_value: Option<String>,
    new_value: Option<String>,
    change: Option<String>,
    explanation: Option<String>,
}

/// Failure body shape for non-2xx responses
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorBody {
    message: Option<String>,
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

fn normalize(raw: RawAnalysis, is_comparison: bool) -> AnalysisResult {
    let disclaimer = match raw.disclaimer {
        Some(text) if !text.trim().is_empty() => text,
        _ => FALLBACK_DISCLAIMER.to_string(),
    };

    AnalysisResult {
        overall_status: ReportStatus::from_wire(raw.overall_status.as_deref().unwrap_or_default()),
        summary: raw.summary.unwrap_or_default(),
        tests: raw
            .tests
            .unwrap_or_default()
            .into_iter()
            .map(normalize_test)
            .collect(),
        disclaimer,
        does_not_mean: raw.does_not_mean.unwrap_or_default(),
        next_steps: raw.next_steps.unwrap_or_default(),
        doctor_questions: raw.doctor_questions.unwrap_or_default(),
        is_comparison,
        comparison: is_comparison
            .then(|| normalize_comparison(raw.comparison.unwrap_or_default())),
    }
}

fn normalize_test(raw: RawTest) -> TestItem {
    TestItem {
        name: raw.name.unwrap_or_default(),
        value: raw.value.unwrap_or_default(),
        range: raw.range.unwrap_or_default(),
        explanation: raw.explanation.unwrap_or_default(),
        status: TestStatus::from_wire(raw.status.as_deref().unwrap_or_default()),
    }
}

fn normalize_comparison(raw: RawComparison) -> ComparisonResult {
    let items = |list: Option<Vec<RawComparisonItem>>| {
        list.unwrap_or_default()
            .into_iter()
            .map(|item| ComparisonItem {
                name: item.name.unwrap_or_default(),
                old_value: item.old_value.unwrap_or_default(),
                new_value: item.new_value.unwrap_or_default(),
                change: ChangeDirection::from_wire(item.change.as_deref().unwrap_or_default()),
                explanation: item.explanation.unwrap_or_default(),
            })
            .collect()
    };

    ComparisonResult {
        improved: items(raw.improved),
        worsened: items(raw.worsened),
        stable: items(raw.stable),
        new_findings: items(raw.new_findings),
        comparison_summary: raw.comparison_summary.unwrap_or_default(),
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for the analysis service
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    http: reqwest::Client,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Analyze one report; all pages travel in a single request
    ///
    /// Callers must not split a multi-page report across calls — the
    /// backend stitches the parts into one analysis.
    pub async fn analyze(
        &self,
        files: &[StagedFile],
        language: Language,
    ) -> DoclystResult<AnalysisResult> {
        if files.is_empty() {
            return Err(DoclystError::Staging("no files staged for analysis".into()));
        }

        let mut form = multipart::Form::new().text("language", language.code());
        form = attach_files(form, "file", files);

        self.submit("/analyze", form, ANALYZE_FAILED_NOTICE, false)
            .await
    }

    /// Compare an older and a newer report
    pub async fn compare(
        &self,
        old: &[StagedFile],
        new: &[StagedFile],
        language: Language,
    ) -> DoclystResult<AnalysisResult> {
        if old.is_empty() || new.is_empty() {
            return Err(DoclystError::Staging(
                "both reports are required for a comparison".into(),
            ));
        }

        let mut form = multipart::Form::new().text("language", language.code());
        form = attach_files(form, "old_file", old);
        form = attach_files(form, "new_file", new);

        self.submit("/compare", form, COMPARE_FAILED_NOTICE, true)
            .await
    }

    /// Liveness probe - is the backend reachable?
    pub async fn health(&self) -> bool {
        match self
            .http
            .get(format!("{}/health", self.base_url))
            .timeout(std::time::Duration::from_secs(2))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    async fn submit(
        &self,
        endpoint: &str,
        form: multipart::Form,
        notice: &str,
        is_comparison: bool,
    ) -> DoclystResult<AnalysisResult> {
        let url = format!("{}{}", self.base_url, endpoint);

        let response = match self.http.post(&url).multipart(form).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!("❌ Request to {} failed: {}", endpoint, e);
                return Err(DoclystError::Analysis(notice.to_string()));
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("❌ Could not read {} response body: {}", endpoint, e);
                return Err(DoclystError::Analysis(notice.to_string()));
            }
        };

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| body.chars().take(200).collect());
            warn!("❌ Backend {} error ({}): {}", endpoint, status, message);
            return Err(DoclystError::Analysis(notice.to_string()));
        }

        let raw: RawAnalysis = match serde_json::from_str(&body) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("❌ Failed to decode {} response: {}", endpoint, e);
                return Err(DoclystError::Analysis(notice.to_string()));
            }
        };

        debug!("📥 Decoded {} response ({} bytes)", endpoint, body.len());
        Ok(normalize(raw, is_comparison))
    }
}

/// Append one multipart file part per staged file, in staging order
fn attach_files(mut form: multipart::Form, field: &str, files: &[StagedFile]) -> multipart::Form {
    for file in files {
        let part = multipart::Part::bytes(file.bytes.clone()).file_name(file.name.clone());
        let part = match part.mime_str(&file.mime) {
            Ok(part) => part,
            Err(e) => {
                // MIME hints come from our own extension table; an invalid
                // one is a bug worth hearing about, not worth failing over
                warn!("⚠️ Invalid MIME '{}' for {}: {}", file.mime, file.name, e);
                multipart::Part::bytes(file.bytes.clone()).file_name(file.name.clone())
            }
        };
        form = form.part(field.to_string(), part);
    }
    form
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> RawAnalysis {
        serde_json::from_str(json).expect("raw decode")
    }

    #[test]
    fn test_normalization_totality() {
        // Every optional array absent -> empty sequences, never absent
        let result = normalize(decode("{}"), false);
        assert!(result.tests.is_empty());
        assert!(result.does_not_mean.is_empty());
        assert!(result.next_steps.is_empty());
        assert!(result.doctor_questions.is_empty());
        assert_eq!(result.disclaimer, FALLBACK_DISCLAIMER);
        assert!(result.comparison.is_none());
    }

    #[test]
    fn test_null_fields_normalize_like_absent_ones() {
        let raw = decode(
            r#"{"tests": null, "doesNotMean": null, "nextSteps": null,
                "doctorQuestions": null, "disclaimer": null}"#,
        );
        let result = normalize(raw, false);
        assert!(result.tests.is_empty());
        assert!(result.does_not_mean.is_empty());
        assert!(result.next_steps.is_empty());
        assert!(result.doctor_questions.is_empty());
        assert_eq!(result.disclaimer, FALLBACK_DISCLAIMER);
    }

    #[test]
    fn test_unknown_overall_status_collapses_to_attention() {
        let result = normalize(decode(r#"{"overallStatus": "BOGUS"}"#), false);
        assert_eq!(result.overall_status, ReportStatus::Attention);
    }

    #[test]
    fn test_full_single_response() {
        let raw = decode(
            r#"{
                "overallStatus": "NORMAL",
                "summary": "ok",
                "tests": [{"name": "Hgb", "value": "14", "range": "13-17",
                           "explanation": "fine", "status": "normal"}]
            }"#,
        );
        let result = normalize(raw, false);

        assert_eq!(result.overall_status, ReportStatus::Normal);
        assert_eq!(result.summary, "ok");
        assert_eq!(result.tests.len(), 1);
        assert_eq!(result.tests[0].name, "Hgb");
        assert_eq!(result.tests[0].status, TestStatus::Normal);
        assert!(result.does_not_mean.is_empty());
        assert!(!result.is_comparison);
    }

    #[test]
    fn test_blank_disclaimer_gets_fallback() {
        let result = normalize(decode(r#"{"disclaimer": "   "}"#), false);
        assert_eq!(result.disclaimer, FALLBACK_DISCLAIMER);

        let kept = normalize(decode(r#"{"disclaimer": "Ask your doctor."}"#), false);
        assert_eq!(kept.disclaimer, "Ask your doctor.");
    }

    #[test]
    fn test_comparison_populated_even_when_wire_omits_it() {
        // A compare response without a comparison object still yields the
        // canonical shape: present, with empty buckets
        let result = normalize(decode("{}"), true);
        assert!(result.is_comparison);
        let comparison = result.comparison.expect("comparison present");
        assert!(comparison.improved.is_empty());
        assert!(comparison.new_findings.is_empty());
        assert!(comparison.comparison_summary.is_empty());
    }

    #[test]
    fn test_comparison_items_decode() {
        let raw = decode(
            r#"{"comparison": {
                "improved": [{"name": "LDL", "oldValue": "160", "newValue": "120",
                              "change": "improved", "explanation": "better"}],
                "newFindings": [{"name": "TSH", "newValue": "6.1", "change": "odd"}],
                "comparisonSummary": "trending well"
            }}"#,
        );
        let result = normalize(raw, true);
        let comparison = result.comparison.expect("comparison present");

        assert_eq!(comparison.improved.len(), 1);
        assert_eq!(comparison.improved[0].change, ChangeDirection::Improved);
        assert_eq!(comparison.new_findings[0].old_value, "");
        // Unknown change direction collapses to the neutral reading
        assert_eq!(comparison.new_findings[0].change, ChangeDirection::Stable);
        assert_eq!(comparison.comparison_summary, "trending well");
        assert!(comparison.worsened.is_empty());
        assert!(comparison.stable.is_empty());
    }

    #[test]
    fn test_single_response_never_carries_comparison() {
        let raw = decode(r#"{"comparison": {"comparisonSummary": "stray"}}"#);
        let result = normalize(raw, false);
        assert!(result.comparison.is_none());
    }
}
