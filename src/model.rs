use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base: String,
    pub user_agent: String,
    pub timeout: Option<Duration>,
    pub accept: String,
}

/// Which of the two remote operations a request represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Analyze,
    Score,
}

impl OperationKind {
    pub const ALL: [OperationKind; 2] = [OperationKind::Analyze, OperationKind::Score];

    /// Endpoint path relative to the API base.
    pub fn endpoint(self) -> &'static str {
        match self {
            OperationKind::Analyze => "/analyze",
            OperationKind::Score => "/score",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OperationKind::Analyze => "Analyze",
            OperationKind::Score => "Score",
        }
    }

    /// Label shown on the action while a request is outstanding.
    pub fn busy_label(self) -> &'static str {
        match self {
            OperationKind::Analyze => "Analyzing...",
            OperationKind::Score => "Scoring...",
        }
    }

    pub fn export_file_name(self) -> &'static str {
        match self {
            OperationKind::Analyze => "resume-analyze.json",
            OperationKind::Score => "resume-score.json",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            OperationKind::Analyze => 0,
            OperationKind::Score => 1,
        }
    }
}

/// Body of a successful `/analyze` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeReport {
    #[serde(default)]
    pub resume_preview: String,
    // The service has shipped both spellings of this field.
    #[serde(default, alias = "resume_char")]
    pub resume_chars: u64,
    #[serde(default)]
    pub jd_preview: String,
    #[serde(default)]
    pub jd_chars: u64,
}

/// Body of a successful `/score` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub overall_score: f64,
    pub cosine_similarity: f64,
    pub coverage: f64,
    #[serde(default)]
    pub matched: Vec<String>,
    #[serde(default)]
    pub missing_sample: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OperationResult {
    Analyze(AnalyzeReport),
    Score(ScoreReport),
}

impl OperationResult {
    pub fn kind(&self) -> OperationKind {
        match self {
            OperationResult::Analyze(_) => OperationKind::Analyze,
            OperationResult::Score(_) => OperationKind::Score,
        }
    }

    /// The wire-shaped payload, without any tagging.
    pub fn to_json_value(&self) -> serde_json::Result<serde_json::Value> {
        match self {
            OperationResult::Analyze(r) => serde_json::to_value(r),
            OperationResult::Score(r) => serde_json::to_value(r),
        }
    }
}

/// Structured error body returned by the service on non-success statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: String,
}

/// Combined output of a headless run, printed with `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub api_base: String,
    pub resume: Option<String>,
    pub job_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyze: Option<AnalyzeReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<ScoreReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyze_accepts_singular_char_field() {
        let r: AnalyzeReport = serde_json::from_str(
            r#"{"resume_preview":"abc","resume_char":3,"jd_preview":"x","jd_chars":1}"#,
        )
        .unwrap();
        assert_eq!(r.resume_chars, 3);
        assert_eq!(r.jd_chars, 1);
    }

    #[test]
    fn score_defaults_missing_lists() {
        let r: ScoreReport = serde_json::from_str(
            r#"{"overall_score":0.5,"cosine_similarity":0.4,"coverage":0.3}"#,
        )
        .unwrap();
        assert!(r.matched.is_empty());
        assert!(r.missing_sample.is_empty());
    }

    #[test]
    fn export_names_follow_kind() {
        assert_eq!(OperationKind::Score.export_file_name(), "resume-score.json");
        assert_eq!(
            OperationKind::Analyze.export_file_name(),
            "resume-analyze.json"
        );
    }
}
