//! Display projection of `RunState`.
//!
//! Everything here is derived; nothing is stored. Both the TUI and the text
//! summary render from these values.

use crate::metrics::{clamp_unit, display_percent};
use crate::model::{AnalyzeReport, ScoreReport};
use crate::orchestrator::RunState;

/// Number of matched keywords shown; the copy action always includes all of them.
pub const MATCHED_VISIBLE_LIMIT: usize = 50;

pub struct PreviewView<'a> {
    pub resume_preview: &'a str,
    pub resume_chars: u64,
    pub jd_preview: &'a str,
    pub jd_chars: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricView {
    pub label: &'static str,
    /// Value as returned by the service.
    pub raw: f64,
    /// Value bounded to [0, 1], used for bar widths.
    pub ratio: f64,
    pub percent: u8,
}

impl MetricView {
    fn new(label: &'static str, raw: f64) -> Self {
        Self {
            label,
            raw,
            ratio: clamp_unit(raw),
            percent: display_percent(raw),
        }
    }
}

pub struct KeywordListView<'a> {
    pub title: &'static str,
    entries: &'a [String],
    limit: Option<usize>,
}

impl<'a> KeywordListView<'a> {
    pub fn total(&self) -> usize {
        self.entries.len()
    }

    /// Entries shown on screen.
    pub fn visible(&self) -> &'a [String] {
        let entries = self.entries;
        match self.limit {
            Some(limit) => &entries[..entries.len().min(limit)],
            None => entries,
        }
    }

    pub fn hidden(&self) -> usize {
        self.total() - self.visible().len()
    }

    /// Clipboard text: every entry, comma-space joined.
    pub fn copy_text(&self) -> String {
        self.entries.join(", ")
    }
}

pub struct ScoreView<'a> {
    pub metrics: [MetricView; 3],
    pub matched: KeywordListView<'a>,
    pub missing: KeywordListView<'a>,
}

pub struct ResultView<'a> {
    pub previews: Option<PreviewView<'a>>,
    pub score: Option<ScoreView<'a>>,
    pub error: Option<&'a str>,
}

impl<'a> ResultView<'a> {
    pub fn from_state(state: &'a RunState) -> Self {
        Self {
            previews: state.analyze_result().map(preview_view),
            score: state.score_result().map(score_view),
            error: state.last_error(),
        }
    }
}

fn preview_view(r: &AnalyzeReport) -> PreviewView<'_> {
    PreviewView {
        resume_preview: &r.resume_preview,
        resume_chars: r.resume_chars,
        jd_preview: &r.jd_preview,
        jd_chars: r.jd_chars,
    }
}

fn score_view(r: &ScoreReport) -> ScoreView<'_> {
    ScoreView {
        metrics: [
            MetricView::new("Overall", r.overall_score),
            MetricView::new("Cosine", r.cosine_similarity),
            MetricView::new("Coverage", r.coverage),
        ],
        matched: KeywordListView {
            title: "Matched",
            entries: &r.matched,
            limit: Some(MATCHED_VISIBLE_LIMIT),
        },
        missing: KeywordListView {
            title: "Missing (sample)",
            entries: &r.missing_sample,
            limit: None,
        },
    }
}
