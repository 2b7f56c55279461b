//! Run lifecycle controller.
//!
//! Owns the `RunState`, spawns one request task per operation kind and commits
//! completions only if they still belong to the current run of that kind.

use super::state::RunState;
use crate::client::{RequestClient, RequestError};
use crate::intake::{FileSlot, SlotRole};
use crate::model::{OperationKind, OperationResult};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// Message sent by a request task when it finishes.
#[derive(Debug)]
pub(crate) struct Completion {
    kind: OperationKind,
    token: u64,
    outcome: Result<OperationResult, RequestError>,
}

/// What applying a completion did to the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CompletionOutcome {
    Succeeded(OperationKind),
    Failed(OperationKind, String),
    /// The run was reset (or superseded) after dispatch.
    Discarded(OperationKind),
}

/// Delivers a task's completion. If the task is dropped first (panic or
/// abort) it reports a failure instead, so waiters never block on it.
struct CompletionSender {
    tx: UnboundedSender<Completion>,
    kind: OperationKind,
    token: u64,
    sent: bool,
}

impl CompletionSender {
    fn send(mut self, outcome: Result<OperationResult, RequestError>) {
        self.sent = true;
        let _ = self.tx.send(Completion {
            kind: self.kind,
            token: self.token,
            outcome,
        });
    }
}

impl Drop for CompletionSender {
    fn drop(&mut self) {
        if !self.sent {
            let _ = self.tx.send(Completion {
                kind: self.kind,
                token: self.token,
                outcome: Err(RequestError::new(self.kind, "request task ended unexpectedly")),
            });
        }
    }
}

pub(crate) struct RunController {
    state: RunState,
    client: RequestClient,
    runtime: Handle,
    // Per-kind run token; a completion is only committed if its token matches.
    tokens: [u64; 2],
    tasks: [Option<JoinHandle<()>>; 2],
    done_tx: UnboundedSender<Completion>,
    done_rx: UnboundedReceiver<Completion>,
}

impl RunController {
    pub fn new(client: RequestClient, runtime: Handle) -> Self {
        let (done_tx, done_rx) = mpsc::unbounded_channel::<Completion>();
        Self {
            state: RunState::default(),
            client,
            runtime,
            tokens: [0; 2],
            tasks: [None, None],
            done_tx,
            done_rx,
        }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn api_base(&self) -> &str {
        self.client.api_base()
    }

    pub fn select(&mut self, role: SlotRole, slot: FileSlot) {
        tracing::info!(role = role.label(), file = %slot.name, bytes = slot.size_bytes, "file selected");
        self.state.select(role, slot);
    }

    /// Start `kind` if both slots are filled and it is not already running.
    /// Returns whether a request was dispatched.
    pub fn run(&mut self, kind: OperationKind) -> bool {
        let (Some(resume), Some(jd)) = (
            self.state.slot(SlotRole::Resume).cloned(),
            self.state.slot(SlotRole::JobDescription).cloned(),
        ) else {
            tracing::debug!(kind = kind.label(), "run ignored: missing file");
            return false;
        };
        if !self.state.begin(kind) {
            tracing::debug!(kind = kind.label(), "run ignored: already in flight");
            return false;
        }

        let idx = kind.index();
        self.tokens[idx] += 1;
        let token = self.tokens[idx];
        let client = self.client.clone();
        let done = CompletionSender {
            tx: self.done_tx.clone(),
            kind,
            token,
            sent: false,
        };
        tracing::info!(kind = kind.label(), token, "dispatching request");

        let handle = self.runtime.spawn(async move {
            let outcome = client.submit(kind, &resume, &jd).await;
            done.send(outcome);
        });
        self.tasks[idx] = Some(handle);
        true
    }

    /// Clear slots, results and errors. Outstanding requests are aborted and
    /// any completion they still deliver is discarded.
    pub fn reset(&mut self) {
        for (idx, task) in self.tasks.iter_mut().enumerate() {
            if let Some(handle) = task.take() {
                handle.abort();
            }
            self.tokens[idx] += 1;
        }
        self.state.reset();
        tracing::info!("state reset");
    }

    /// Apply every completion that has already arrived, without waiting.
    pub fn drain_completions(&mut self) -> Vec<CompletionOutcome> {
        let mut applied = Vec::new();
        while let Ok(done) = self.done_rx.try_recv() {
            applied.push(self.apply(done));
        }
        applied
    }

    /// Wait for the next completion that changes state. Returns `None` once
    /// nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<CompletionOutcome> {
        while self.state.any_in_flight() {
            let done = self.done_rx.recv().await?;
            match self.apply(done) {
                CompletionOutcome::Discarded(_) => continue,
                other => return Some(other),
            }
        }
        None
    }

    fn apply(&mut self, done: Completion) -> CompletionOutcome {
        let Completion {
            kind,
            token,
            outcome,
        } = done;
        let idx = kind.index();
        if token != self.tokens[idx] || !self.state.in_flight(kind) {
            tracing::debug!(kind = kind.label(), token, current = self.tokens[idx], "discarding stale completion");
            return CompletionOutcome::Discarded(kind);
        }
        self.tasks[idx] = None;

        match outcome {
            Ok(result) => {
                tracing::info!(kind = kind.label(), "request succeeded");
                self.state.succeed(result);
                CompletionOutcome::Succeeded(kind)
            }
            Err(e) => {
                tracing::warn!(kind = kind.label(), error = %e, "request failed");
                self.state.fail(kind, e.message.clone());
                CompletionOutcome::Failed(kind, e.message)
            }
        }
    }
}
