//! Application-level orchestration.
//!
//! This module owns the run state machine (select/run/complete/reset) and the
//! post-run processing used by headless output. UI/CLI layers call into it so
//! that `RunState` has exactly one owner.

mod controller;
mod post_process;
mod state;

pub(crate) use controller::{CompletionOutcome, RunController};
pub(crate) use post_process::finish_headless_run;
pub use state::RunState;
