use crate::client::RequestClient;
use crate::intake::{AllowList, FileSlot, SlotRole, DEFAULT_ACCEPT};
use crate::model::{ClientConfig, OperationKind};
use crate::orchestrator::{self, CompletionOutcome, RunController};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

/// Output line routing for stdout/stderr writer.
enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Spawn a blocking writer for stdout/stderr to avoid blocking async tasks.
fn spawn_output_writer() -> (
    mpsc::UnboundedSender<OutputLine>,
    tokio::task::JoinHandle<()>,
) {
    let (tx, mut rx) = mpsc::unbounded_channel::<OutputLine>();
    let handle = tokio::task::spawn_blocking(move || {
        let stdout = std::io::stdout();
        let stderr = std::io::stderr();
        let mut out = std::io::LineWriter::new(stdout.lock());
        let mut err = std::io::LineWriter::new(stderr.lock());

        while let Some(line) = rx.blocking_recv() {
            match line {
                OutputLine::Stdout(msg) => {
                    let _ = writeln!(out, "{}", msg);
                }
                OutputLine::Stderr(msg) => {
                    let _ = writeln!(err, "{}", msg);
                }
            }
        }

        let _ = out.flush();
        let _ = err.flush();
    });
    (tx, handle)
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "smart-resume-cli",
    version,
    about = "Upload a resume and a job description to an analysis/scoring API"
)]
pub struct Cli {
    /// Base URL of the analysis/scoring service
    #[arg(long, env = "SMART_RESUME_API_BASE_URL", default_value = "http://127.0.0.1:8000")]
    pub api_base: String,

    /// Resume file (.pdf / .txt / .docx)
    #[arg(long)]
    pub resume: Option<PathBuf>,

    /// Job description file (.pdf / .txt / .docx)
    #[arg(long)]
    pub job_description: Option<PathBuf>,

    /// Comma-separated list of accepted file extensions
    #[arg(long, default_value = DEFAULT_ACCEPT)]
    pub accept: String,

    /// Run the analyze operation (headless modes; default runs both)
    #[arg(long)]
    pub analyze: bool,

    /// Run the score operation (headless modes; default runs both)
    #[arg(long)]
    pub score: bool,

    /// Print JSON result and exit (no TUI)
    #[arg(long)]
    pub json: bool,

    /// Print text summary and exit (no TUI)
    #[arg(long, conflicts_with = "json")]
    pub text: bool,

    /// Write the preferred result (score, else analyze) as JSON to this path
    #[arg(long)]
    pub export_json: Option<PathBuf>,

    /// Request timeout (e.g. 30s). Without it the transport default applies
    #[arg(long)]
    pub timeout: Option<humantime::Duration>,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,
}

impl Cli {
    fn is_headless(&self) -> bool {
        self.json || self.text || cfg!(not(feature = "tui"))
    }

    /// Operations requested for a headless run; neither flag means both.
    fn requested_kinds(&self) -> Vec<OperationKind> {
        match (self.analyze, self.score) {
            (true, false) => vec![OperationKind::Analyze],
            (false, true) => vec![OperationKind::Score],
            _ => OperationKind::ALL.to_vec(),
        }
    }
}

pub async fn run(args: Cli) -> Result<()> {
    if args.export_json.is_some() && !args.is_headless() {
        return Err(anyhow::anyhow!(
            "--export-json can only be used with --json or --text. Press 'd' in the TUI to download."
        ));
    }

    if !args.is_headless() {
        #[cfg(feature = "tui")]
        {
            crate::logging::init(
                args.verbose,
                crate::logging::LogTarget::File(crate::storage::log_dir()),
            )?;
            return crate::tui::run(args).await;
        }
    }

    crate::logging::init(args.verbose, crate::logging::LogTarget::Stderr)?;
    run_headless(args).await
}

/// Build a `ClientConfig` from CLI arguments.
pub fn build_config(args: &Cli) -> ClientConfig {
    ClientConfig {
        api_base: args.api_base.trim_end_matches('/').to_string(),
        user_agent: format!("smart-resume-cli/{}", env!("CARGO_PKG_VERSION")),
        timeout: args.timeout.map(Duration::from),
        accept: args.accept.clone(),
    }
}

/// Select both files, run the requested operations and print the outcome.
async fn run_headless(args: Cli) -> Result<()> {
    let cfg = build_config(&args);
    let allow = AllowList::parse(&cfg.accept);
    let client = RequestClient::new(&cfg)?;
    let mut ctl = RunController::new(client, tokio::runtime::Handle::current());

    for (role, path) in [
        (SlotRole::Resume, args.resume.as_deref()),
        (SlotRole::JobDescription, args.job_description.as_deref()),
    ] {
        let path = path.with_context(|| {
            format!(
                "--{} is required with --json/--text",
                role.field_name().replace('_', "-")
            )
        })?;
        let slot = FileSlot::try_select(path, &allow)
            .map_err(|e| anyhow::anyhow!("{}: {e}", role.label()))?;
        ctl.select(role, slot);
    }

    let (out_tx, out_handle) = spawn_output_writer();
    let chatty = !args.json;

    for kind in args.requested_kinds() {
        if ctl.run(kind) && chatty {
            let _ = out_tx.send(OutputLine::Stderr(format!("== {} ==", kind.busy_label())));
        }
    }

    let mut failures = Vec::new();
    while let Some(outcome) = ctl.next_completion().await {
        match outcome {
            CompletionOutcome::Succeeded(kind) => {
                if chatty {
                    let _ = out_tx.send(OutputLine::Stderr(format!("{} complete", kind.label())));
                }
            }
            CompletionOutcome::Failed(_, message) => {
                if chatty {
                    let _ = out_tx.send(OutputLine::Stderr(message.clone()));
                }
                failures.push(message);
            }
            CompletionOutcome::Discarded(_) => {}
        }
    }

    let processed = orchestrator::finish_headless_run(&args, ctl.api_base(), ctl.state());
    for msg in &processed.export_messages {
        let _ = out_tx.send(OutputLine::Stderr(msg.clone()));
    }

    if args.json {
        let out = serde_json::to_string_pretty(&processed.report)?;
        let _ = out_tx.send(OutputLine::Stdout(out));
    } else {
        let summary = crate::text_summary::build_text_summary(ctl.state());
        for line in summary.lines {
            let _ = out_tx.send(OutputLine::Stdout(line));
        }
    }

    drop(out_tx);
    let _ = out_handle.await;

    if failures.is_empty() {
        Ok(())
    } else {
        Err(anyhow::anyhow!(failures.join("; ")))
    }
}
