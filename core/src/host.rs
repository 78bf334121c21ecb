//! Execution boundary
//!
//! The host starts one [`Execution`] per run and calls [`Execution::step`]
//! once per tick until it reports a terminal [`RunStatus`]. The transcript the
//! user sees is kept in a [`Console`], which mirrors the program's output and
//! adds the run-state markers.

use crate::interpreter::{tick, Context, Control, Step, VM};
use crate::tree::Sequence;
use chrono::{DateTime, Utc};
use std::fmt;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Continuing,
    Completed,
    Faulted(String),
    Halted,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RunStatus::Continuing)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Continuing => write!(f, "continuing"),
            RunStatus::Completed => write!(f, "completed"),
            RunStatus::Faulted(message) => write!(f, "faulted: {}", message),
            RunStatus::Halted => write!(f, "halted"),
        }
    }
}

/* ===================== Console ===================== */

/// Host-side transcript of a run
#[derive(Debug, Clone, Default)]
pub struct Console {
    lines: Vec<String>,
    synced: usize,
}

impl Console {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Copy any program output not yet mirrored
    pub fn sync(&mut self, ctx: &Context) {
        let output = ctx.output();
        if self.synced < output.len() {
            self.lines.extend_from_slice(&output[self.synced..]);
            self.synced = output.len();
        }
    }

    fn finish(&mut self, status: &RunStatus) {
        match status {
            RunStatus::Continuing => {}
            RunStatus::Completed | RunStatus::Halted => {
                self.lines.push(String::new());
                self.lines.push("Program finished.".to_string());
            }
            RunStatus::Faulted(message) => {
                self.lines.push(String::new());
                self.lines.push("Program encountered an error.".to_string());
                self.lines.push(message.clone());
            }
        }
    }

    fn stopped(&mut self) {
        self.lines.push(String::new());
        self.lines.push("Program stopped.".to_string());
    }
}

/* ===================== Execution ===================== */

/// Handle for one run of a sequence
///
/// Owns the run's context. Once a terminal status is returned further steps
/// keep returning it; the host is expected to drop the handle.
#[derive(Debug)]
pub struct Execution<'p> {
    vm: VM<'p>,
    ctx: Context,
    console: Console,
    run_id: Uuid,
    started_at: DateTime<Utc>,
    outcome: Option<RunStatus>,
}

impl<'p> Execution<'p> {
    pub fn start(sequence: &'p Sequence) -> Self {
        let run_id = Uuid::new_v4();
        info!(%run_id, blocks = sequence.blocks.len(), "run started");
        Self {
            vm: VM::new(sequence),
            ctx: Context::new(),
            console: Console::default(),
            run_id,
            started_at: Utc::now(),
            outcome: None,
        }
    }

    /// Advance the run by one tick
    pub fn step(&mut self) -> RunStatus {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }

        let status = match tick(&mut self.vm, &mut self.ctx) {
            Step::Done => match &self.vm.control {
                Control::Throw(fault) => RunStatus::Faulted(fault.to_string()),
                Control::Halt => RunStatus::Halted,
                _ => RunStatus::Completed,
            },
            Step::Continue | Step::Yield => RunStatus::Continuing,
        };

        self.console.sync(&self.ctx);
        if status.is_terminal() {
            self.console.finish(&status);
            let elapsed_ms = (Utc::now() - self.started_at).num_milliseconds();
            info!(run_id = %self.run_id, ticks = self.vm.ticks, elapsed_ms, %status, "run finished");
            self.outcome = Some(status.clone());
        }
        status
    }

    /// Abandon the run between ticks
    pub fn cancel(mut self) -> Console {
        if self.outcome.is_none() {
            self.console.sync(&self.ctx);
            self.console.stopped();
            info!(run_id = %self.run_id, ticks = self.vm.ticks, "run cancelled");
        }
        self.console
    }

    /// Prompt of an input request still waiting for a value
    pub fn pending_prompt(&self) -> Option<&str> {
        self.ctx.pending_prompt()
    }

    pub fn supply_input(&mut self, value: impl Into<String>) {
        self.ctx.supply_input(value);
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn ticks(&self) -> u64 {
        self.vm.ticks
    }
}
