//! Post-run processing for headless modes.
//!
//! Builds the JSON report and handles `--export-json` once every requested
//! operation has completed.

use super::RunState;
use crate::cli::Cli;
use crate::intake::SlotRole;
use crate::model::RunReport;
use crate::storage;

/// Result of post-run processing, ready for output.
pub(crate) struct ProcessedRun {
    pub report: RunReport,
    pub export_messages: Vec<String>,
}

pub(crate) fn finish_headless_run(args: &Cli, api_base: &str, state: &RunState) -> ProcessedRun {
    let report = RunReport {
        api_base: api_base.to_string(),
        resume: state.slot(SlotRole::Resume).map(|s| s.name.clone()),
        job_description: state.slot(SlotRole::JobDescription).map(|s| s.name.clone()),
        analyze: state.analyze_result().cloned(),
        score: state.score_result().cloned(),
        error: state.last_error().map(|s| s.to_string()),
    };

    let mut export_messages = Vec::new();
    if let Some(export_path) = args.export_json.as_deref() {
        match state.preferred_result() {
            Some(result) => match storage::export_json(export_path, &result) {
                Ok(()) => export_messages.push(format!("Exported JSON: {}", export_path.display())),
                Err(e) => export_messages.push(format!("Export JSON failed: {e:#}")),
            },
            None => export_messages.push("Export JSON skipped: no result to export".into()),
        }
    }

    ProcessedRun {
        report,
        export_messages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn export_is_skipped_without_result() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.json");
        let args = Cli::parse_from([
            "smart-resume-cli",
            "--json",
            "--export-json",
            target.to_str().unwrap(),
        ]);
        let processed = finish_headless_run(&args, "http://127.0.0.1:8000", &RunState::default());
        assert_eq!(processed.export_messages.len(), 1);
        assert!(processed.export_messages[0].starts_with("Export JSON skipped"));
        assert!(!target.exists());
        assert!(processed.report.score.is_none());
    }
}
