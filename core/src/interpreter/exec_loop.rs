//! Core execution loop
//!
//! This module contains the step() function - the heart of the interpreter.
//! It processes one frame at a time, advancing execution phases and managing the frame stack.
//!
//! ## Function Organization
//! Functions are ordered by call hierarchy:
//! 1. run_until_done() / run_for() - Drivers (call tick repeatedly)
//! 2. tick() - One host tick (calls step until a token is yielded)
//! 3. step() - One micro-step (dispatches to statement handlers)

use super::context::Context;
use super::statements::{
    execute_branch, execute_for_each, execute_repeat, execute_sequence, execute_signal,
    execute_simple, execute_try, execute_wait, execute_while,
};
use super::types::{Control, FrameKind, LoopPhase, TryPhase};
use super::vm::{Step, VM};
use tracing::{debug, warn};

/* ===================== Public API ===================== */

/// Run the VM until it completes
///
/// Returns `Step::Done` once the frame stack is empty, or `Step::Yield` early
/// if the program is waiting for input that nobody has supplied. Inspect
/// `vm.control` for the final state: `None` on normal completion, `Throw` on an
/// unhandled fault, `Halt` after quit.
pub fn run_until_done(vm: &mut VM<'_>, ctx: &mut Context) -> Step {
    loop {
        match tick(vm, ctx) {
            Step::Done => return Step::Done,
            _ if ctx.pending_prompt().is_some() => return Step::Yield,
            _ => continue,
        }
    }
}

/// Run at most `budget` ticks
pub fn run_for(vm: &mut VM<'_>, ctx: &mut Context, budget: u64) -> Step {
    for _ in 0..budget {
        if tick(vm, ctx) == Step::Done {
            return Step::Done;
        }
    }
    if vm.is_done() {
        Step::Done
    } else {
        Step::Yield
    }
}

/// Advance until one scheduling token is consumed or the run ends
pub fn tick(vm: &mut VM<'_>, ctx: &mut Context) -> Step {
    loop {
        match step(vm, ctx) {
            Step::Continue => continue,
            Step::Yield => {
                vm.ticks += 1;
                return Step::Yield;
            }
            Step::Done => return Step::Done,
        }
    }
}

/// Execute one micro-step of the VM
///
/// 1. Checks for active control flow and unwinds if needed
/// 2. Gets the top frame
/// 3. Dispatches on the frame kind and phase
pub fn step(vm: &mut VM<'_>, ctx: &mut Context) -> Step {
    if vm.control != Control::None {
        return unwind(vm);
    }

    let Some(ix) = vm.frames.len().checked_sub(1) else {
        return Step::Done;
    };

    // Frame kinds are Copy; take one so the handlers can borrow the VM
    let kind = vm.frames[ix].kind;
    match kind {
        FrameKind::Sequence { seq, idx } => execute_sequence(vm, ix, seq, idx),
        FrameKind::Simple { node, phase } => execute_simple(vm, ctx, ix, node, phase),
        FrameKind::Wait {
            node,
            phase,
            remaining,
        } => execute_wait(vm, ctx, ix, node, phase, remaining),
        FrameKind::Repeat {
            node,
            phase,
            done,
            times,
        } => execute_repeat(vm, ctx, ix, node, phase, done, times),
        FrameKind::ForEach { node, phase, idx } => execute_for_each(vm, ctx, ix, node, phase, idx),
        FrameKind::While { node, phase } => execute_while(vm, ctx, ix, node, phase),
        FrameKind::Branch { node } => execute_branch(vm, ctx, node),
        FrameKind::Try { node, phase } => execute_try(vm, ix, node, phase),
        FrameKind::Signal { node } => execute_signal(vm, node),
    }
}

/* ===================== Control Flow ===================== */

/// Unwind the stack when control flow is active
///
/// - Break pops up to and including the nearest loop
/// - Continue pops down to the nearest loop and ends its iteration
/// - Throw pops down to the nearest try still running its protected body
/// - Halt, and anything with no handler, clears the stack
///
/// Break and continue pass through try frames untouched: loop signals are not
/// faults, so they never run a fallback body. A fault or halt that ends the
/// run stays in `vm.control`.
fn unwind(vm: &mut VM<'_>) -> Step {
    match std::mem::replace(&mut vm.control, Control::None) {
        Control::None => Step::Continue,

        signal @ (Control::Break | Control::Continue) => {
            let Some(ix) = vm.frames.iter().rposition(|f| f.kind.is_loop()) else {
                warn!(?signal, "loop signal outside of any loop; halting");
                vm.frames.clear();
                vm.control = Control::Halt;
                return Step::Done;
            };

            if signal == Control::Break {
                debug!(popped = vm.frames.len() - ix, "break");
                vm.frames.truncate(ix);
            } else {
                debug!(popped = vm.frames.len() - ix - 1, "continue");
                vm.frames.truncate(ix + 1);
                vm.frames[ix].kind = vm.frames[ix].kind.with_loop_phase(LoopPhase::PostBody);
            }
            Step::Continue
        }

        Control::Throw(fault) => {
            let handler = vm.frames.iter().rposition(|f| {
                matches!(
                    f.kind,
                    FrameKind::Try {
                        phase: TryPhase::Protected,
                        ..
                    }
                )
            });

            match handler {
                Some(ix) => {
                    debug!(code = fault.code(), %fault, "fault caught");
                    vm.frames.truncate(ix + 1);
                    if let FrameKind::Try { node, .. } = vm.frames[ix].kind {
                        vm.frames[ix].kind = FrameKind::Try {
                            node,
                            phase: TryPhase::Recover,
                        };
                    }
                    Step::Continue
                }
                None => {
                    vm.frames.clear();
                    vm.control = Control::Throw(fault);
                    Step::Done
                }
            }
        }

        Control::Halt => {
            vm.frames.clear();
            vm.control = Control::Halt;
            Step::Done
        }
    }
}
