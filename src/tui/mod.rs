mod export;
mod help;
mod panels;
mod state;

use crate::cli::{build_config, Cli};
use crate::client::RequestClient;
use crate::intake::{candidate_from_input, AllowList, FileSlot, SlotRole};
use crate::model::OperationKind;
use crate::orchestrator::{CompletionOutcome, RunController};
use crate::view::ResultView;
use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Color,
    style::Style,
    text::Line,
    widgets::{Block, Borders, Tabs},
    Terminal,
};
use state::{UiState, TAB_DASHBOARD, TAB_HELP};
use std::path::Path;
use std::{io, time::Duration, time::Instant};

pub async fn run(args: Cli) -> Result<()> {
    let cfg = build_config(&args);
    let client = RequestClient::new(&cfg)?;
    let runtime = tokio::runtime::Handle::current();

    // The TUI runs on a dedicated thread to keep blocking terminal I/O out of the
    // Tokio runtime; request tasks still run on the runtime via `runtime`.
    let ui_handle = std::thread::spawn(move || {
        let ctl = RunController::new(client, runtime);
        run_threaded(args, AllowList::parse(&cfg.accept), ctl)
    });

    let join_res = tokio::task::spawn_blocking(move || ui_handle.join())
        .await
        .context("join TUI thread")?;
    match join_res {
        Ok(res) => res,
        Err(_) => Err(anyhow::anyhow!("TUI thread panicked")),
    }
}

/// Run the TUI loop on a dedicated thread. The controller is owned here.
fn run_threaded(args: Cli, allow: AllowList, mut ctl: RunController) -> Result<()> {
    let mut state = UiState {
        allow,
        ..Default::default()
    };

    for (role, path) in [
        (SlotRole::Resume, args.resume.as_deref()),
        (SlotRole::JobDescription, args.job_description.as_deref()),
    ] {
        if let Some(path) = path {
            select_into(&mut ctl, &mut state, role, path);
        }
    }

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    let res = loop {
        // Completions are applied here, on the thread that owns the controller.
        for outcome in ctl.drain_completions() {
            apply_outcome(&mut state, outcome);
        }

        if last_tick.elapsed() >= tick_rate {
            terminal
                .draw(|f| draw(f.area(), f, &ctl, &state))
                .ok();
            last_tick = Instant::now();
        }

        // Poll input with a short timeout to avoid blocking the render loop.
        if event::poll(Duration::from_millis(10)).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(k)) => {
                    if k.kind != KeyEventKind::Press {
                        continue;
                    }
                    if handle_key(&mut ctl, &mut state, k) == KeyOutcome::Quit {
                        break Ok(());
                    }
                }
                Ok(Event::Paste(text)) => handle_paste(&mut ctl, &mut state, &text),
                _ => {}
            }
        }
    };

    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    execute!(stdout, DisableBracketedPaste, LeaveAlternateScreen).ok();
    res
}

#[derive(Debug, PartialEq, Eq)]
enum KeyOutcome {
    Continue,
    Quit,
}

fn apply_outcome(state: &mut UiState, outcome: CompletionOutcome) {
    match outcome {
        CompletionOutcome::Succeeded(kind) => {
            state.info = format!("{} complete", kind.label());
            if kind == OperationKind::Analyze {
                state.preview_scroll = 0;
            }
        }
        // The message itself is shown from RunState's error slot.
        CompletionOutcome::Failed(kind, _) => state.info = format!("{} failed", kind.label()),
        CompletionOutcome::Discarded(_) => {}
    }
}

/// Try to put `path` into `role`'s slot. A rejected file never changes the slot.
fn select_into(ctl: &mut RunController, state: &mut UiState, role: SlotRole, path: &Path) {
    match FileSlot::try_select(path, &state.allow) {
        Ok(slot) => {
            state.info = format!("{}: {}", role.label(), slot.display_name());
            ctl.select(role, slot);
        }
        Err(e) => {
            tracing::info!(role = role.label(), reason = %e, "file rejected");
            state.info = format!("Ignored: {e}");
        }
    }
}

/// A drop onto the terminal arrives as a paste of the file path.
fn handle_paste(ctl: &mut RunController, state: &mut UiState, text: &str) {
    if state.editing {
        state.input.push_str(text.trim_end_matches(['\n', '\r']));
        return;
    }
    if let Some(path) = candidate_from_input(text) {
        let role = state.focus;
        select_into(ctl, state, role, &path);
    }
}

fn handle_key(ctl: &mut RunController, state: &mut UiState, k: KeyEvent) -> KeyOutcome {
    if state.editing {
        match k.code {
            KeyCode::Esc => {
                state.editing = false;
                state.input.clear();
            }
            KeyCode::Enter => {
                state.editing = false;
                let input = std::mem::take(&mut state.input);
                if let Some(path) = candidate_from_input(&input) {
                    let role = state.focus;
                    select_into(ctl, state, role, &path);
                }
            }
            KeyCode::Backspace => {
                state.input.pop();
            }
            KeyCode::Char('c') if k.modifiers.contains(KeyModifiers::CONTROL) => {
                return KeyOutcome::Quit;
            }
            KeyCode::Char(c) => state.input.push(c),
            _ => {}
        }
        return KeyOutcome::Continue;
    }

    match (k.modifiers, k.code) {
        (_, KeyCode::Char('q')) | (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
            return KeyOutcome::Quit;
        }
        (_, KeyCode::Tab) => {
            state.tab = if state.tab == TAB_DASHBOARD {
                TAB_HELP
            } else {
                TAB_DASHBOARD
            };
        }
        (_, KeyCode::Char('?')) => state.tab = TAB_HELP,
        (_, KeyCode::Char('1')) => state.focus = SlotRole::Resume,
        (_, KeyCode::Char('2')) => state.focus = SlotRole::JobDescription,
        (_, KeyCode::Left) | (_, KeyCode::Right) => state.toggle_focus(),
        (_, KeyCode::Enter) => {
            state.tab = TAB_DASHBOARD;
            state.editing = true;
            state.input.clear();
        }
        (_, KeyCode::Char('a')) => start(ctl, state, OperationKind::Analyze),
        (_, KeyCode::Char('s')) => start(ctl, state, OperationKind::Score),
        (_, KeyCode::Char('d')) => {
            if ctl.state().can_download() {
                match export::download_preferred(ctl.state()) {
                    Ok(p) => {
                        state.last_exported_path = Some(p.to_string_lossy().to_string());
                        state.info =
                            format!("Downloaded: {} (press 'y' to copy path)", p.display());
                    }
                    Err(e) => state.info = format!("Download failed: {e:#}"),
                }
            } else {
                state.info = "Nothing to download yet.".into();
            }
        }
        (_, KeyCode::Char('m')) => copy_keywords(ctl, state, true),
        (_, KeyCode::Char('x')) => copy_keywords(ctl, state, false),
        (_, KeyCode::Char('y')) => match state.last_exported_path.clone() {
            Some(path) => match export::copy_to_clipboard(&path) {
                Ok(()) => state.info = format!("✓ Copied to clipboard: {path}"),
                Err(e) => state.info = format!("Clipboard copy failed: {e:#}"),
            },
            None => state.info = "No downloaded file path to copy. Press 'd' first.".into(),
        },
        (_, KeyCode::Char('r')) => {
            if ctl.state().can_reset() {
                ctl.reset();
                state.clear_intake();
                state.info = "Reset".into();
            }
        }
        (_, KeyCode::Up) | (_, KeyCode::Char('k')) => {
            state.preview_scroll = state.preview_scroll.saturating_sub(1);
        }
        (_, KeyCode::Down) | (_, KeyCode::Char('j')) => {
            state.preview_scroll = state.preview_scroll.saturating_add(1);
        }
        _ => {}
    }
    KeyOutcome::Continue
}

fn start(ctl: &mut RunController, state: &mut UiState, kind: OperationKind) {
    // Disabled actions do nothing, matching the greyed-out buttons.
    if ctl.run(kind) {
        state.tab = TAB_DASHBOARD;
        state.info = kind.busy_label().into();
    }
}

fn copy_keywords(ctl: &RunController, state: &mut UiState, matched: bool) {
    let view = ResultView::from_state(ctl.state());
    let Some(score) = view.score.as_ref() else {
        state.info = "No score result yet.".into();
        return;
    };
    let list = if matched { &score.matched } else { &score.missing };
    match export::copy_to_clipboard(&list.copy_text()) {
        Ok(()) => state.info = format!("✓ Copied {} {} keyword(s)", list.total(), list.title),
        Err(e) => state.info = format!("Clipboard copy failed: {e:#}"),
    }
}

fn draw(area: Rect, f: &mut ratatui::Frame, ctl: &RunController, state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)].as_ref())
        .split(area);

    let tabs = Tabs::new(vec![Line::from("Dashboard"), Line::from("Help")])
        .select(state.tab)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Smart Resume Analyzer"),
        )
        .highlight_style(Style::default().fg(Color::Yellow));
    f.render_widget(tabs, chunks[0]);

    match state.tab {
        TAB_DASHBOARD => {
            panels::draw_dashboard(chunks[1], f, ctl.state(), state, ctl.api_base())
        }
        _ => help::draw_help(chunks[1], f, &state.allow.describe()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::client_for;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn controller() -> RunController {
        RunController::new(client_for("http://127.0.0.1:9"), tokio::runtime::Handle::current())
    }

    #[tokio::test]
    async fn rejected_drop_leaves_slot_empty() {
        let dir = tempfile::tempdir().unwrap();
        let resume = dir.path().join("resume.pdf");
        let notes = dir.path().join("notes.csv");
        std::fs::write(&resume, b"%PDF").unwrap();
        std::fs::write(&notes, b"a,b").unwrap();

        let mut ctl = controller();
        let mut ui = UiState::default();
        handle_paste(&mut ctl, &mut ui, resume.to_str().unwrap());
        handle_key(&mut ctl, &mut ui, press(KeyCode::Char('2')));
        handle_paste(&mut ctl, &mut ui, notes.to_str().unwrap());

        assert!(ctl.state().slot(SlotRole::Resume).is_some());
        assert!(ctl.state().slot(SlotRole::JobDescription).is_none());
        assert!(!ctl.state().can_run());
        assert!(ctl.state().last_error().is_none());
        assert!(ui.info.starts_with("Ignored:"));

        // Score is disabled, so pressing it does nothing.
        handle_key(&mut ctl, &mut ui, press(KeyCode::Char('s')));
        assert!(!ctl.state().any_in_flight());
    }

    #[tokio::test]
    async fn typed_path_selects_and_reset_clears_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let jd = dir.path().join("role.txt");
        std::fs::write(&jd, b"rust").unwrap();

        let mut ctl = controller();
        let mut ui = UiState::default();
        handle_key(&mut ctl, &mut ui, press(KeyCode::Right));
        handle_key(&mut ctl, &mut ui, press(KeyCode::Enter));
        assert!(ui.editing);
        for c in jd.to_str().unwrap().chars() {
            handle_key(&mut ctl, &mut ui, press(KeyCode::Char(c)));
        }
        handle_key(&mut ctl, &mut ui, press(KeyCode::Enter));
        assert_eq!(
            ctl.state().slot(SlotRole::JobDescription).map(|s| s.name.as_str()),
            Some("role.txt")
        );

        handle_key(&mut ctl, &mut ui, press(KeyCode::Enter));
        handle_key(&mut ctl, &mut ui, press(KeyCode::Char('x')));
        handle_key(&mut ctl, &mut ui, press(KeyCode::Esc));
        handle_key(&mut ctl, &mut ui, press(KeyCode::Char('r')));
        assert!(ctl.state().slot(SlotRole::JobDescription).is_none());
        assert!(ui.input.is_empty() && !ui.editing);
    }

    #[tokio::test]
    async fn quit_keys() {
        let mut ctl = controller();
        let mut ui = UiState::default();
        assert_eq!(
            handle_key(&mut ctl, &mut ui, press(KeyCode::Char('q'))),
            KeyOutcome::Quit
        );
        assert_eq!(
            handle_key(
                &mut ctl,
                &mut ui,
                KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)
            ),
            KeyOutcome::Quit
        );
    }
}
