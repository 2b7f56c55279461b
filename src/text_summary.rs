//! Text summary builder for CLI output.
//!
//! Formats the `ResultView` projection into human-readable lines for text mode.

use crate::intake::SlotRole;
use crate::orchestrator::RunState;
use crate::view::{KeywordListView, ResultView};

/// Pre-formatted lines for text output.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

pub(crate) fn build_text_summary(state: &RunState) -> TextSummary {
    let mut lines = Vec::new();
    let view = ResultView::from_state(state);

    for role in [SlotRole::Resume, SlotRole::JobDescription] {
        if let Some(slot) = state.slot(role) {
            lines.push(format!("{}: {}", role.label(), slot.display_name()));
        }
    }

    if let Some(p) = view.previews.as_ref() {
        lines.push(String::new());
        lines.push(format!("Resume preview ({} chars)", p.resume_chars));
        lines.extend(indented(p.resume_preview));
        lines.push(format!("JD preview ({} chars)", p.jd_chars));
        lines.extend(indented(p.jd_preview));
    }

    if let Some(score) = view.score.as_ref() {
        lines.push(String::new());
        for m in &score.metrics {
            lines.push(format!("{:<9} {:>3}%  {}", m.label, m.percent, bar(m.ratio, 30)));
        }
        lines.push(keyword_line(&score.matched));
        lines.push(keyword_line(&score.missing));
    }

    if let Some(err) = view.error {
        lines.push(String::new());
        lines.push(format!("Error: {err}"));
    }

    TextSummary { lines }
}

fn indented(text: &str) -> impl Iterator<Item = String> + '_ {
    text.lines().map(|l| format!("  {l}"))
}

fn keyword_line(list: &KeywordListView<'_>) -> String {
    let mut line = format!("{} ({}): {}", list.title, list.total(), list.visible().join(", "));
    if list.hidden() > 0 {
        line.push_str(&format!(" (+{} more)", list.hidden()));
    }
    line
}

/// Fixed-width text bar, e.g. `[#######-----]`.
fn bar(ratio: f64, width: usize) -> String {
    let filled = ((ratio * width as f64).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}
