//! Dashboard panels: file slots, actions, results and status.

use super::state::{push_wrapped_status_kv, UiState};
use crate::intake::SlotRole;
use crate::model::OperationKind;
use crate::orchestrator::RunState;
use crate::view::{KeywordListView, MetricView, PreviewView, ResultView, ScoreView};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

pub fn draw_dashboard(area: Rect, f: &mut Frame, run: &RunState, ui: &UiState, api_base: &str) {
    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(5), // Slots side-by-side
                Constraint::Length(3), // Actions
                Constraint::Min(0),    // Results
                Constraint::Length(5), // Status
            ]
            .as_ref(),
        )
        .split(area);

    let slots_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(main[0]);
    draw_slot(slots_row[0], f, run, ui, SlotRole::Resume);
    draw_slot(slots_row[1], f, run, ui, SlotRole::JobDescription);

    draw_actions(main[1], f, run);
    draw_results(main[2], f, run, ui);
    draw_status(main[3], f, run, ui, api_base);
}

fn draw_slot(area: Rect, f: &mut Frame, run: &RunState, ui: &UiState, role: SlotRole) {
    let focused = ui.focus == role;
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let mut lines = Vec::new();
    if focused && ui.editing {
        lines.push(Line::from(vec![
            Span::styled("Path: ", Style::default().fg(Color::Gray)),
            Span::raw(ui.input.clone()),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ]));
        lines.push(Line::from(Span::styled(
            "Enter to select, Esc to cancel",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        lines.push(Line::from(vec![
            Span::raw("Drag & drop or press "),
            Span::styled("Enter", Style::default().fg(Color::Magenta)),
            Span::raw(" to browse"),
        ]));
        if let Some(slot) = run.slot(role) {
            lines.push(Line::from(Span::styled(
                slot.display_name(),
                Style::default().fg(Color::Green),
            )));
        }
    }

    let title = format!("{} ({})", role.label(), ui.allow.describe());
    let p = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(title),
    );
    f.render_widget(p, area);
}

fn action_span(key: &'static str, label: &'static str, enabled: bool) -> Vec<Span<'static>> {
    let (key_style, label_style) = if enabled {
        (Style::default().fg(Color::Magenta), Style::default())
    } else {
        (
            Style::default().fg(Color::DarkGray),
            Style::default().fg(Color::DarkGray),
        )
    };
    vec![
        Span::styled(format!("[{key}] "), key_style),
        Span::styled(label, label_style),
        Span::raw("   "),
    ]
}

fn draw_actions(area: Rect, f: &mut Frame, run: &RunState) {
    let mut spans = Vec::new();
    for (key, kind) in [("a", OperationKind::Analyze), ("s", OperationKind::Score)] {
        let busy = run.in_flight(kind);
        let label = if busy { kind.busy_label() } else { kind.label() };
        spans.extend(action_span(key, label, run.can_run() && !busy));
    }
    spans.extend(action_span("d", "Download JSON", run.can_download()));
    spans.extend(action_span("r", "Reset", run.can_reset()));

    let p = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title("Actions"));
    f.render_widget(p, area);
}

fn draw_results(area: Rect, f: &mut Frame, run: &RunState, ui: &UiState) {
    let view = ResultView::from_state(run);
    match (view.previews.as_ref(), view.score.as_ref()) {
        (None, None) => {
            let hint = if run.any_in_flight() {
                "Waiting for the service..."
            } else if run.can_run() {
                "Press a to analyze or s to score."
            } else {
                "Select a resume and a job description to begin."
            };
            let p = Paragraph::new(hint)
                .block(Block::default().borders(Borders::ALL).title("Results"));
            f.render_widget(p, area);
        }
        (Some(p), None) => draw_previews(area, f, p, ui.preview_scroll),
        (None, Some(s)) => draw_scores(area, f, s),
        (Some(p), Some(s)) => {
            let row = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(55), Constraint::Percentage(45)].as_ref())
                .split(area);
            draw_previews(row[0], f, p, ui.preview_scroll);
            draw_scores(row[1], f, s);
        }
    }
}

fn draw_previews(area: Rect, f: &mut Frame, p: &PreviewView<'_>, scroll: u16) {
    let halves = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(area);

    let resume = Paragraph::new(p.resume_preview.to_string())
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Resume preview ({} chars)", p.resume_chars)),
        );
    f.render_widget(resume, halves[0]);

    let jd = Paragraph::new(p.jd_preview.to_string())
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("JD preview ({} chars)", p.jd_chars)),
        );
    f.render_widget(jd, halves[1]);
}

fn draw_scores(area: Rect, f: &mut Frame, s: &ScoreView<'_>) {
    let block = Block::default().borders(Borders::ALL).title("Scores");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .split(inner);
    for (i, metric) in s.metrics.iter().enumerate() {
        draw_metric_bar(rows[i], f, metric);
    }

    let lists = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(rows[3]);
    draw_keyword_list(lists[0], f, &s.matched, "m", Color::Green);
    draw_keyword_list(lists[1], f, &s.missing, "x", Color::Red);
}

fn draw_metric_bar(area: Rect, f: &mut Frame, m: &MetricView) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(10), Constraint::Min(0)].as_ref())
        .split(area);
    f.render_widget(
        Paragraph::new(Span::styled(m.label, Style::default().fg(Color::Gray))),
        cols[0],
    );
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
        .ratio(m.ratio)
        .label(format!("{}%", m.percent));
    f.render_widget(gauge, cols[1]);
}

fn draw_keyword_list(
    area: Rect,
    f: &mut Frame,
    list: &KeywordListView<'_>,
    copy_key: &'static str,
    color: Color,
) {
    let mut lines: Vec<Line> = list
        .visible()
        .iter()
        .map(|k| Line::from(Span::styled(format!("• {k}"), Style::default().fg(color))))
        .collect();
    if list.hidden() > 0 {
        lines.push(Line::from(Span::styled(
            format!("… {} more (copy to see all)", list.hidden()),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let title = Line::from(vec![
        Span::raw(format!("{} ({}) ", list.title, list.total())),
        Span::styled(format!("[{copy_key}] copy"), Style::default().fg(Color::Magenta)),
    ]);
    let p = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(p, area);
}

fn draw_status(area: Rect, f: &mut Frame, run: &RunState, ui: &UiState, api_base: &str) {
    let mut status_lines = Vec::new();
    if let Some(err) = run.last_error() {
        push_wrapped_status_kv(
            &mut status_lines,
            "Error",
            err,
            area.width,
            Style::default().fg(Color::Red),
        );
    }
    push_wrapped_status_kv(&mut status_lines, "Info", &ui.info, area.width, Style::default());
    status_lines.push(Line::from(vec![
        Span::styled("API: ", Style::default().fg(Color::Gray)),
        Span::styled(api_base.to_string(), Style::default().fg(Color::Blue)),
    ]));

    let status =
        Paragraph::new(status_lines).block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, area);
}
