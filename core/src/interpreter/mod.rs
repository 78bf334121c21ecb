//! # Interpreter - Resumable Frame-Stack Engine
//!
//! Executes a block program one scheduling token at a time.
//!
//! ## Core Principles
//!
//! 1. **Stack-driven execution**: All run state in `frames: Vec<Frame>`, no recursion
//!    across statements
//! 2. **Phased frames**: Each frame records the micro-step it is at, so a run
//!    can stop after any tick and resume on the next one
//! 3. **Centralized control flow**: `Control` carries break/continue/fault/halt
//!    while the stack unwinds
//! 4. **Pure engine**: No clocks, no I/O of its own; the host decides when to tick
//!
//! Reporters are evaluated eagerly within their statement's micro-step
//! (`expressions`). Variables, output, the delay timer and input requests live
//! in the `Context`.

pub mod context;
pub mod errors;
pub mod exec_loop;
pub mod expressions;
pub mod statements;
pub mod types;
pub mod vm;

#[cfg(test)]
mod tests;

// Re-export commonly used items
pub use context::{Context, TICK_RATE, TICK_SECONDS};
pub use errors::Fault;
pub use exec_loop::{run_for, run_until_done, step, tick};
pub use expressions::{EvalResult, Interrupt};
pub use types::{Control, Val};
pub use vm::{Step, VM};
