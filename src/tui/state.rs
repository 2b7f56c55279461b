use crate::intake::{AllowList, SlotRole};
use ratatui::{
    style::Color,
    style::Style,
    text::{Line, Span},
};

pub const TAB_DASHBOARD: usize = 0;
pub const TAB_HELP: usize = 1;

/// Presentation-only state. Everything about the run itself lives in the
/// controller's `RunState`.
pub struct UiState {
    pub tab: usize,
    pub focus: SlotRole,
    /// Path prompt buffer for the focused slot.
    pub input: String,
    pub editing: bool,
    pub info: String,
    pub allow: AllowList,
    pub preview_scroll: u16,
    pub last_exported_path: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tab: TAB_DASHBOARD,
            focus: SlotRole::Resume,
            input: String::new(),
            editing: false,
            info: String::new(),
            allow: AllowList::default(),
            preview_scroll: 0,
            last_exported_path: None,
        }
    }
}

impl UiState {
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            SlotRole::Resume => SlotRole::JobDescription,
            SlotRole::JobDescription => SlotRole::Resume,
        };
    }

    /// Drop everything the user typed or was told since the last reset.
    pub fn clear_intake(&mut self) {
        self.input.clear();
        self.editing = false;
        self.preview_scroll = 0;
        self.last_exported_path = None;
    }
}

pub fn push_wrapped_status_kv(
    out: &mut Vec<Line<'static>>,
    label: &str,
    value: &str,
    status_area_width: u16,
    value_style: Style,
) {
    let value = value.trim();
    if value.is_empty() {
        return;
    }

    // Account for borders (2 chars on each side)
    let usable_width = status_area_width.saturating_sub(4).max(1);
    let label_text = format!("{label}:");
    let label_width = label_text.chars().count() as u16;

    let value_chars: Vec<char> = value.chars().collect();
    let mut remaining = value_chars.as_slice();
    let mut first = true;

    while !remaining.is_empty() {
        let line_width = if first {
            usable_width.saturating_sub(label_width + 1).max(1)
        } else {
            usable_width.saturating_sub(2).max(1)
        };

        let chars_to_take = (remaining.len() as u16).min(line_width) as usize;
        let (line_chars, rest) = remaining.split_at(chars_to_take);
        let line_text: String = line_chars.iter().collect();

        if first {
            out.push(Line::from(vec![
                Span::styled(label_text.clone(), Style::default().fg(Color::Gray)),
                Span::raw(" "),
                Span::styled(line_text, value_style),
            ]));
            first = false;
        } else {
            out.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(line_text, value_style),
            ]));
        }

        remaining = rest;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_value_splits_across_lines() {
        let mut out = Vec::new();
        push_wrapped_status_kv(&mut out, "Info", &"x".repeat(30), 20, Style::default());
        assert!(out.len() > 1);
        let total: usize = out
            .iter()
            .flat_map(|l| l.spans.iter())
            .filter(|s| s.content.chars().all(|c| c == 'x'))
            .map(|s| s.content.chars().count())
            .sum();
        assert_eq!(total, 30);
    }

    #[test]
    fn blank_value_adds_nothing() {
        let mut out = Vec::new();
        push_wrapped_status_kv(&mut out, "Info", "   ", 40, Style::default());
        assert!(out.is_empty());
    }

    #[test]
    fn clear_intake_forgets_typed_path() {
        let mut s = UiState {
            input: "/tmp/old.pdf".into(),
            editing: true,
            ..Default::default()
        };
        s.clear_intake();
        assert!(s.input.is_empty() && !s.editing);
    }
}
