//! Writing results to disk.

use crate::model::OperationResult;
use crate::orchestrator::RunState;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Write the result payload as pretty-printed JSON to `path`.
pub fn export_json(path: &Path, result: &OperationResult) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
    }
    let value = result.to_json_value().context("serialize result")?;
    let data = serde_json::to_vec_pretty(&value).context("encode result JSON")?;
    std::fs::write(path, data).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Download the preferred result into `dir` under its kind's default file name.
pub fn export_preferred(dir: &Path, state: &RunState) -> Result<PathBuf> {
    if !state.can_download() {
        anyhow::bail!("nothing to download yet");
    }
    let result = state
        .preferred_result()
        .context("nothing to download yet")?;
    let path = dir.join(result.kind().export_file_name());
    export_json(&path, &result)?;
    tracing::info!(path = %path.display(), "exported result");
    Ok(path)
}

/// Directory for the TUI's log file.
#[cfg_attr(not(feature = "tui"), allow(dead_code))]
pub fn log_dir() -> PathBuf {
    dirs::cache_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("smart-resume-cli")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::{FileSlot, SlotRole};
    use crate::model::ScoreReport;

    fn slot(name: &str) -> FileSlot {
        FileSlot {
            name: name.into(),
            size_bytes: 1,
            path: PathBuf::from(name),
        }
    }

    #[test]
    fn score_export_is_exactly_the_payload() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = RunState::default();
        state.select(SlotRole::Resume, slot("resume.pdf"));
        state.select(SlotRole::JobDescription, slot("jd.pdf"));
        state.begin(crate::model::OperationKind::Score);
        state.succeed(OperationResult::Score(ScoreReport {
            overall_score: 0.82,
            cosine_similarity: 0.75,
            coverage: 0.9,
            matched: vec!["python".into(), "sql".into()],
            missing_sample: vec!["docker".into()],
        }));

        let path = export_preferred(dir.path(), &state).unwrap();
        assert_eq!(path.file_name().unwrap(), "resume-score.json");

        let written: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(
            written,
            serde_json::json!({
                "overall_score": 0.82,
                "cosine_similarity": 0.75,
                "coverage": 0.9,
                "matched": ["python", "sql"],
                "missing_sample": ["docker"]
            })
        );
    }

    #[test]
    fn analyze_export_uses_canonical_char_key() {
        let dir = tempfile::tempdir().unwrap();
        let report: crate::model::AnalyzeReport = serde_json::from_str(
            r#"{"resume_preview":"abc","resume_char":3,"jd_preview":"x","jd_chars":1,"lang":"en"}"#,
        )
        .unwrap();
        let path = dir.path().join("out.json");
        export_json(&path, &OperationResult::Analyze(report)).unwrap();

        let written: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(
            written,
            serde_json::json!({
                "resume_preview": "abc",
                "resume_chars": 3,
                "jd_preview": "x",
                "jd_chars": 1
            })
        );
    }

    #[test]
    fn export_without_result_fails() {
        let dir = tempfile::tempdir().unwrap();
        let state = RunState::default();
        assert!(export_preferred(dir.path(), &state).is_err());
    }
}
