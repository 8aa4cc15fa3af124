//! Canonical analysis result types
//!
//! The normalized shape every analysis and comparison response is decoded
//! into before it reaches application state. Unknown wire values collapse
//! to safe defaults here; views never see a partially-filled result.

use crate::i18n;
use crate::language::Language;
use serde::{Deserialize, Serialize};

/// Shown when the analyzer omits its own disclaimer
pub const FALLBACK_DISCLAIMER: &str = "This explanation is for information only and is not a \
medical diagnosis. Always discuss your results with a doctor.";

/// Overall report triage level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReportStatus {
    Normal,
    #[default]
    Attention,
    Urgent,
}

impl ReportStatus {
    /// Lenient wire decode; anything unrecognized reads as Attention
    pub fn from_wire(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "normal" => ReportStatus::Normal,
            "urgent" => ReportStatus::Urgent,
            _ => ReportStatus::Attention,
        }
    }

    /// i18n key for the banner headline
    pub fn label_key(&self) -> &'static str {
        match self {
            ReportStatus::Normal => "status_normal",
            ReportStatus::Attention => "status_attention",
            ReportStatus::Urgent => "status_urgent",
        }
    }
}

/// Per-test severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Normal,
    #[default]
    Warning,
    Alert,
}

impl TestStatus {
    pub fn from_wire(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "normal" => TestStatus::Normal,
            "alert" => TestStatus::Alert,
            _ => TestStatus::Warning,
        }
    }
}

/// Direction of change for one comparison entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeDirection {
    Improved,
    Worsened,
    #[default]
    Stable,
    New,
}

impl ChangeDirection {
    pub fn from_wire(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "improved" => ChangeDirection::Improved,
            "worsened" => ChangeDirection::Worsened,
            "new" => ChangeDirection::New,
            _ => ChangeDirection::Stable,
        }
    }
}

/// One extracted test value with its plain-language explanation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestItem {
    pub name: String,
    pub value: String,
    pub range: String,
    pub explanation: String,
    pub status: TestStatus,
}

/// One old-vs-new entry of a comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonItem {
    pub name: String,
    pub old_value: String,
    pub new_value: String,
    pub change: ChangeDirection,
    pub explanation: String,
}

/// The structured diff between two report submissions
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub improved: Vec<ComparisonItem>,
    pub worsened: Vec<ComparisonItem>,
    pub stable: Vec<ComparisonItem>,
    pub new_findings: Vec<ComparisonItem>,
    pub comparison_summary: String,
}

/// The normalized analysis of one submission
///
/// Invariant: every sequence field is total (never absent), `disclaimer`
/// is never empty, and `comparison` is present iff `is_comparison`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub overall_status: ReportStatus,
    pub summary: String,
    pub tests: Vec<TestItem>,
    pub disclaimer: String,
    pub does_not_mean: Vec<String>,
    pub next_steps: Vec<String>,
    pub doctor_questions: Vec<String>,
    pub is_comparison: bool,
    pub comparison: Option<ComparisonResult>,
}

impl AnalysisResult {
    /// Assemble the narration text for read-aloud playback
    ///
    /// Order is fixed: summary, each test as "name: value. explanation",
    /// then a labeled block per non-empty anti-panic section, every item
    /// its own sentence, joined with ". ". Stable for a given result.
    pub fn narration(&self, language: Language) -> String {
        let mut parts: Vec<String> = Vec::new();

        if !self.summary.trim().is_empty() {
            parts.push(sentence(&self.summary));
        }

        for test in &self.tests {
            parts.push(format!(
                "{}: {}. {}",
                test.name,
                test.value,
                sentence(&test.explanation)
            ));
        }

        let sections: [(&str, &[String]); 3] = [
            ("does_not_mean_heading", &self.does_not_mean),
            ("next_steps_heading", &self.next_steps),
            ("doctor_questions_heading", &self.doctor_questions),
        ];
        for (label_key, items) in sections {
            if items.is_empty() {
                continue;
            }
            parts.push(i18n::tr(language, label_key));
            parts.extend(items.iter().map(|item| sentence(item)));
        }

        parts.join(". ")
    }
}

/// One narration fragment: trimmed, without a trailing period so the
/// ". " join never doubles up
fn sentence(text: &str) -> String {
    text.trim().trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AnalysisResult {
        AnalysisResult {
            overall_status: ReportStatus::Normal,
            summary: "Most things look great.".to_string(),
            tests: vec![TestItem {
                name: "Hemoglobin".to_string(),
                value: "14.2 g/dL".to_string(),
                range: "13.5 - 17.5".to_string(),
                explanation: "Your level is perfect".to_string(),
                status: TestStatus::Normal,
            }],
            disclaimer: FALLBACK_DISCLAIMER.to_string(),
            does_not_mean: vec!["You are not anemic".to_string()],
            next_steps: Vec::new(),
            doctor_questions: Vec::new(),
            is_comparison: false,
            comparison: None,
        }
    }

    #[test]
    fn test_status_fallback() {
        assert_eq!(ReportStatus::from_wire("BOGUS"), ReportStatus::Attention);
        assert_eq!(ReportStatus::from_wire("NORMAL"), ReportStatus::Normal);
        assert_eq!(ReportStatus::from_wire("urgent"), ReportStatus::Urgent);
    }

    #[test]
    fn test_test_status_fallback() {
        assert_eq!(TestStatus::from_wire("alert"), TestStatus::Alert);
        assert_eq!(TestStatus::from_wire(""), TestStatus::Warning);
    }

    #[test]
    fn test_change_fallback() {
        assert_eq!(ChangeDirection::from_wire("new"), ChangeDirection::New);
        assert_eq!(
            ChangeDirection::from_wire("sideways"),
            ChangeDirection::Stable
        );
    }

    #[test]
    fn test_narration_order_and_stability() {
        let result = sample();
        let narration = result.narration(Language::En);

        assert_eq!(
            narration,
            "Most things look great. Hemoglobin: 14.2 g/dL. Your level is perfect. \
             What this does not mean. You are not anemic"
        );
        // Reproducible for the same result
        assert_eq!(narration, result.narration(Language::En));
    }

    #[test]
    fn test_narration_skips_empty_sections() {
        let mut result = sample();
        result.does_not_mean.clear();
        let narration = result.narration(Language::En);
        assert!(!narration.contains("What this does not mean"));
    }
}
