use ratatui::{
    layout::Rect,
    style::Color,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Key and description pairs shown on the help tab.
pub const KEYBINDS: &[(&str, &str)] = &[
    ("q / Ctrl-C", "Quit"),
    ("1 / 2", "Focus resume / job description slot"),
    ("←/→", "Switch focused slot"),
    ("Enter", "Type a path for the focused slot"),
    ("drop/paste", "Select the dropped file for the focused slot"),
    ("a", "Analyze (previews)"),
    ("s", "Score (similarity and keywords)"),
    ("d", "Download result JSON to the current directory"),
    ("m", "Copy all matched keywords"),
    ("x", "Copy missing keyword sample"),
    ("y", "Copy downloaded file path"),
    ("r", "Reset files and results"),
    ("↑/↓ or j/k", "Scroll previews"),
    ("tab / ?", "Switch tabs / show this help"),
];

pub fn draw_help(area: Rect, f: &mut Frame, accept: &str) {
    let mut lines = vec![Line::from("Keybinds:")];
    for (key, desc) in KEYBINDS {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(format!("{key:<12}"), Style::default().fg(Color::Magenta)),
            Span::raw(*desc),
        ]));
    }
    lines.extend([
        Line::from(""),
        Line::from("Selecting files:"),
        Line::from("  Drag a file onto the terminal window; most terminals paste its path."),
        Line::from(vec![
            Span::raw("  Accepted types: "),
            Span::styled(accept.to_string(), Style::default().fg(Color::Cyan)),
            Span::raw(". Other files are ignored."),
        ]),
        Line::from(""),
        Line::from("Errors are cleared on the next run or on reset."),
    ]);

    let p = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(p, area);
}
