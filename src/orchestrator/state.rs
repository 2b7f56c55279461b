//! The single owned state of an interaction and its named transitions.

use crate::intake::{FileSlot, SlotRole};
use crate::model::{AnalyzeReport, OperationKind, OperationResult, ScoreReport};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunState {
    resume: Option<FileSlot>,
    job_description: Option<FileSlot>,
    analyze_result: Option<AnalyzeReport>,
    score_result: Option<ScoreReport>,
    analyze_in_flight: bool,
    score_in_flight: bool,
    last_error: Option<String>,
}

impl RunState {
    pub fn slot(&self, role: SlotRole) -> Option<&FileSlot> {
        match role {
            SlotRole::Resume => self.resume.as_ref(),
            SlotRole::JobDescription => self.job_description.as_ref(),
        }
    }

    pub fn analyze_result(&self) -> Option<&AnalyzeReport> {
        self.analyze_result.as_ref()
    }

    pub fn score_result(&self) -> Option<&ScoreReport> {
        self.score_result.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn in_flight(&self, kind: OperationKind) -> bool {
        match kind {
            OperationKind::Analyze => self.analyze_in_flight,
            OperationKind::Score => self.score_in_flight,
        }
    }

    pub fn any_in_flight(&self) -> bool {
        self.analyze_in_flight || self.score_in_flight
    }

    pub fn can_run(&self) -> bool {
        self.resume.is_some() && self.job_description.is_some()
    }

    pub fn can_download(&self) -> bool {
        self.can_run() && (self.analyze_result.is_some() || self.score_result.is_some())
    }

    pub fn can_reset(&self) -> bool {
        self.resume.is_some() || self.job_description.is_some()
    }

    /// Payload a download writes: the score result if present, else the analyze result.
    pub fn preferred_result(&self) -> Option<OperationResult> {
        self.score_result
            .clone()
            .map(OperationResult::Score)
            .or_else(|| self.analyze_result.clone().map(OperationResult::Analyze))
    }

    /// Replace the slot for `role` with an accepted file.
    pub fn select(&mut self, role: SlotRole, slot: FileSlot) {
        match role {
            SlotRole::Resume => self.resume = Some(slot),
            SlotRole::JobDescription => self.job_description = Some(slot),
        }
    }

    /// Idle -> Running(kind). Returns false (and changes nothing) if the
    /// kind is already running or a slot is empty.
    pub fn begin(&mut self, kind: OperationKind) -> bool {
        if !self.can_run() || self.in_flight(kind) {
            return false;
        }
        self.last_error = None;
        match kind {
            OperationKind::Analyze => {
                self.analyze_result = None;
                self.analyze_in_flight = true;
            }
            OperationKind::Score => {
                self.score_result = None;
                self.score_in_flight = true;
            }
        }
        true
    }

    /// Running(kind) -> Idle with a result.
    pub fn succeed(&mut self, result: OperationResult) {
        match result {
            OperationResult::Analyze(r) => {
                self.analyze_in_flight = false;
                self.analyze_result = Some(r);
            }
            OperationResult::Score(r) => {
                self.score_in_flight = false;
                self.score_result = Some(r);
            }
        }
    }

    /// Running(kind) -> Idle with an error; the kind's result stays absent.
    pub fn fail(&mut self, kind: OperationKind, message: String) {
        match kind {
            OperationKind::Analyze => self.analyze_in_flight = false,
            OperationKind::Score => self.score_in_flight = false,
        }
        self.last_error = Some(message);
    }

    pub fn reset(&mut self) {
        *self = RunState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn slot(name: &str) -> FileSlot {
        FileSlot {
            name: name.into(),
            size_bytes: 10,
            path: PathBuf::from(name),
        }
    }

    fn loaded() -> RunState {
        let mut s = RunState::default();
        s.select(SlotRole::Resume, slot("resume.pdf"));
        s.select(SlotRole::JobDescription, slot("jd.txt"));
        s
    }

    fn score() -> ScoreReport {
        ScoreReport {
            overall_score: 0.5,
            cosine_similarity: 0.5,
            coverage: 0.5,
            matched: vec!["rust".into()],
            missing_sample: vec![],
        }
    }

    fn analyze() -> AnalyzeReport {
        AnalyzeReport {
            resume_preview: "r".into(),
            resume_chars: 1,
            jd_preview: "j".into(),
            jd_chars: 1,
        }
    }

    #[test]
    fn begin_requires_both_slots() {
        let mut s = RunState::default();
        s.select(SlotRole::Resume, slot("resume.pdf"));
        assert!(!s.can_run());
        assert!(!s.begin(OperationKind::Score));
        assert!(!s.in_flight(OperationKind::Score));
        assert!(s.can_reset());
    }

    #[test]
    fn begin_is_noop_while_same_kind_in_flight() {
        let mut s = loaded();
        assert!(s.begin(OperationKind::Score));
        let snapshot = s.clone();
        assert!(!s.begin(OperationKind::Score));
        assert_eq!(s, snapshot);
        // The other kind is gated independently.
        assert!(s.begin(OperationKind::Analyze));
        assert!(s.in_flight(OperationKind::Score) && s.in_flight(OperationKind::Analyze));
    }

    #[test]
    fn begin_clears_own_result_and_error_only() {
        let mut s = loaded();
        s.begin(OperationKind::Analyze);
        s.succeed(OperationResult::Analyze(analyze()));
        s.begin(OperationKind::Score);
        s.succeed(OperationResult::Score(score()));
        s.begin(OperationKind::Analyze);
        s.fail(OperationKind::Analyze, "Analyze failed: boom".into());
        assert_eq!(s.last_error(), Some("Analyze failed: boom"));

        assert!(s.begin(OperationKind::Analyze));
        assert!(s.last_error().is_none());
        assert!(s.analyze_result().is_none());
        assert_eq!(s.score_result(), Some(&score()));
    }

    #[test]
    fn failure_leaves_result_absent() {
        let mut s = loaded();
        s.begin(OperationKind::Score);
        s.fail(OperationKind::Score, "Score failed: nope".into());
        assert!(!s.in_flight(OperationKind::Score));
        assert!(s.score_result().is_none());
        assert!(!s.can_download());
    }

    #[test]
    fn reset_clears_everything_from_any_state() {
        let mut s = loaded();
        s.begin(OperationKind::Analyze);
        s.succeed(OperationResult::Analyze(analyze()));
        s.begin(OperationKind::Score);
        s.begin(OperationKind::Analyze);
        s.fail(OperationKind::Analyze, "x".into());
        s.reset();

        assert!(s.slot(SlotRole::Resume).is_none());
        assert!(s.slot(SlotRole::JobDescription).is_none());
        assert!(s.analyze_result().is_none() && s.score_result().is_none());
        assert!(s.last_error().is_none());
        assert!(!s.any_in_flight());
        assert!(!s.can_reset() && !s.can_run() && !s.can_download());
    }

    #[test]
    fn download_prefers_score() {
        let mut s = loaded();
        s.begin(OperationKind::Analyze);
        s.succeed(OperationResult::Analyze(analyze()));
        assert!(s.can_download());
        assert_eq!(s.preferred_result().map(|r| r.kind()), Some(OperationKind::Analyze));

        s.begin(OperationKind::Score);
        s.succeed(OperationResult::Score(score()));
        assert_eq!(s.preferred_result().map(|r| r.kind()), Some(OperationKind::Score));
    }

    #[test]
    fn select_replaces_existing_slot() {
        let mut s = loaded();
        s.select(SlotRole::Resume, slot("other.txt"));
        assert_eq!(s.slot(SlotRole::Resume).map(|f| f.name.as_str()), Some("other.txt"));
    }
}
