//! Statement execution handlers
//!
//! One handler per frame kind. Each handler performs a single micro-step for
//! the top frame: it either advances the frame's phase, pushes a child frame,
//! pops itself, or raises a control signal on the VM.
//!
//! Token accounting: a simple statement yields once after its effect, a delay
//! yields once per tick of its duration, and a loop iteration whose body
//! yielded nothing yields once on its own. Branches, try and cap statements
//! yield nothing themselves.

use super::context::{Context, TICK_RATE};
use super::errors::Fault;
use super::expressions::{deprecated, evaluate_statement, resolve_statement_args, Interrupt};
use super::types::{Control, FrameKind, Iteration, LoopPhase, SimplePhase, TryPhase, Val, WaitPhase};
use super::vm::{push_sequence, push_stmt, Step, VM};
use crate::catalog::{Behavior, Flow};
use crate::tree::{Node, Sequence, SlotValue, EMPTY_SEQUENCE};
use tracing::debug;

/* ===================== Helpers ===================== */

/// Turn an interrupted resolution into the step outcome
///
/// A suspension yields without advancing the frame, so the statement retries
/// on the next tick. A fault becomes the active control signal.
fn interrupted(vm: &mut VM<'_>, interrupt: Interrupt) -> Step {
    match interrupt {
        Interrupt::Suspend => Step::Yield,
        Interrupt::Throw(fault) => raise(vm, fault),
    }
}

fn raise(vm: &mut VM<'_>, fault: Fault) -> Step {
    debug!(code = fault.code(), %fault, "fault raised");
    vm.control = Control::Throw(fault);
    Step::Continue
}

/// The body held in a sequence slot; an absent slot is an empty body
fn body<'p>(node: &'p Node, index: usize) -> Result<&'p Sequence, Fault> {
    match node.value(index) {
        Some(SlotValue::Sequence(seq)) => Ok(seq),
        None | Some(SlotValue::Absent) => Ok(&EMPTY_SEQUENCE),
        Some(_) => Err(Fault::NotASequence(node.id().to_string())),
    }
}

/// Enter the body of the loop frame at `ix`
fn enter_body<'p>(vm: &mut VM<'p>, ix: usize, next: FrameKind<'p>, seq: &'p Sequence) -> Step {
    vm.frames[ix].kind = next;
    vm.frames[ix].mark = vm.ticks;
    push_sequence(vm, seq);
    Step::Continue
}

/// Finish an iteration; iterations that consumed no token yield one
fn end_iteration<'p>(vm: &mut VM<'p>, ix: usize, next: FrameKind<'p>) -> Step {
    vm.frames[ix].kind = next;
    if vm.ticks == vm.frames[ix].mark {
        Step::Yield
    } else {
        Step::Continue
    }
}

fn finish(vm: &mut VM<'_>) -> Step {
    vm.frames.pop();
    Step::Continue
}

/// Number of ticks a delay of `seconds` spans
///
/// Products within 1e-9 of a whole number are snapped to it before rounding
/// up, so 2.3 seconds is 138 ticks rather than 139.
pub fn delay_ticks(seconds: f64) -> u64 {
    let exact = seconds * TICK_RATE;
    if !(exact > 0.0) {
        return 0;
    }
    let nearest = exact.round();
    if (exact - nearest).abs() < 1e-9 {
        nearest as u64
    } else {
        exact.ceil() as u64
    }
}

/* ===================== Sequence ===================== */

pub fn execute_sequence<'p>(vm: &mut VM<'p>, ix: usize, seq: &'p Sequence, idx: usize) -> Step {
    let Some(node) = seq.blocks.get(idx) else {
        return finish(vm);
    };
    vm.frames[ix].kind = FrameKind::Sequence { seq, idx: idx + 1 };
    push_stmt(vm, node);
    Step::Continue
}

/* ===================== Simple Statements ===================== */

pub fn execute_simple<'p>(
    vm: &mut VM<'p>,
    ctx: &mut Context,
    ix: usize,
    node: &'p Node,
    phase: SimplePhase,
) -> Step {
    match phase {
        SimplePhase::Run => {
            let outcome = match node.definition().behavior {
                Behavior::Command(command) => {
                    match resolve_statement_args(node, ctx, &mut vm.replay) {
                        Ok(args) => command(&args, ctx).map_err(Interrupt::from),
                        Err(interrupt) => Err(interrupt),
                    }
                }
                // A bare reporter is evaluated and its value dropped
                Behavior::Reporter(_) | Behavior::Prompt => {
                    evaluate_statement(node, ctx, &mut vm.replay).map(|_| ())
                }
                Behavior::Deprecated => Err(deprecated(node).into()),
                Behavior::Trigger | Behavior::Flow(_) => Ok(()),
            };

            if let Err(interrupt) = outcome {
                return interrupted(vm, interrupt);
            }
            vm.frames[ix].kind = FrameKind::Simple {
                node,
                phase: SimplePhase::Finish,
            };
            Step::Yield
        }

        SimplePhase::Finish => finish(vm),
    }
}

/* ===================== Delay ===================== */

pub fn execute_wait<'p>(
    vm: &mut VM<'p>,
    ctx: &mut Context,
    ix: usize,
    node: &'p Node,
    phase: WaitPhase,
    remaining: u64,
) -> Step {
    match phase {
        WaitPhase::Start => {
            let seconds = match resolve_statement_args(node, ctx, &mut vm.replay) {
                Ok(args) => args.first().map(Val::to_number).unwrap_or(Ok(0.0)),
                Err(interrupt) => return interrupted(vm, interrupt),
            };
            let seconds = match seconds {
                Ok(seconds) => seconds,
                Err(fault) => return raise(vm, fault),
            };

            let ticks = delay_ticks(seconds);
            if ticks == 0 {
                return finish(vm);
            }
            ctx.start_delay(seconds);
            vm.frames[ix].kind = FrameKind::Wait {
                node,
                phase: WaitPhase::Counting,
                remaining: ticks,
            };
            Step::Continue
        }

        WaitPhase::Counting if remaining == 0 => {
            ctx.clear_delay();
            finish(vm)
        }

        WaitPhase::Counting => {
            ctx.tick_delay();
            vm.frames[ix].kind = FrameKind::Wait {
                node,
                phase,
                remaining: remaining - 1,
            };
            Step::Yield
        }
    }
}

/* ===================== Loops ===================== */

pub fn execute_repeat<'p>(
    vm: &mut VM<'p>,
    ctx: &mut Context,
    ix: usize,
    node: &'p Node,
    phase: LoopPhase,
    done: u64,
    times: u64,
) -> Step {
    match phase {
        LoopPhase::Enter => {
            let count = match resolve_statement_args(node, ctx, &mut vm.replay) {
                Ok(args) => args.first().map(Val::to_number).unwrap_or(Ok(0.0)),
                Err(interrupt) => return interrupted(vm, interrupt),
            };
            let count = match count {
                Ok(count) if count.is_nan() => {
                    return raise(vm, Fault::instruction("cannot repeat NaN times"))
                }
                Ok(count) => count,
                Err(fault) => return raise(vm, fault),
            };

            let times = if count > 0.0 { count.trunc() as u64 } else { 0 };
            vm.frames[ix].kind = FrameKind::Repeat {
                node,
                phase: LoopPhase::Check,
                done: 0,
                times,
            };
            Step::Continue
        }

        LoopPhase::Check if done < times => match body(node, 1) {
            Ok(seq) => {
                let next = FrameKind::Repeat {
                    node,
                    phase: LoopPhase::PostBody,
                    done,
                    times,
                };
                enter_body(vm, ix, next, seq)
            }
            Err(fault) => raise(vm, fault),
        },

        LoopPhase::Check => finish(vm),

        LoopPhase::PostBody => {
            let next = FrameKind::Repeat {
                node,
                phase: LoopPhase::Check,
                done: done + 1,
                times,
            };
            end_iteration(vm, ix, next)
        }
    }
}

/// Iterate the characters of the text held by the source variable
pub fn execute_for_each<'p>(
    vm: &mut VM<'p>,
    ctx: &mut Context,
    ix: usize,
    node: &'p Node,
    phase: LoopPhase,
    idx: usize,
) -> Step {
    match phase {
        LoopPhase::Enter => {
            let args = match resolve_statement_args(node, ctx, &mut vm.replay) {
                Ok(args) => args,
                Err(interrupt) => return interrupted(vm, interrupt),
            };
            let var = args.first().map(Val::to_text).unwrap_or_default();
            let source = args.get(1).map(Val::to_text).unwrap_or_default();

            let items: Vec<Val> = match ctx.read(&source) {
                Ok(Val::Text(text)) => text.chars().map(|c| Val::Text(c.to_string())).collect(),
                Ok(other) => {
                    return raise(
                        vm,
                        Fault::instruction(format!("cannot iterate over a {}", other.type_name())),
                    )
                }
                Err(fault) => return raise(vm, fault),
            };

            vm.frames[ix].iteration = Some(Iteration { var, items });
            vm.frames[ix].kind = FrameKind::ForEach {
                node,
                phase: LoopPhase::Check,
                idx: 0,
            };
            Step::Continue
        }

        LoopPhase::Check => {
            let current = vm.frames[ix]
                .iteration
                .as_ref()
                .and_then(|it| it.items.get(idx).map(|item| (it.var.clone(), item.clone())));
            let Some((var, item)) = current else {
                return finish(vm);
            };

            match body(node, 2) {
                Ok(seq) => {
                    ctx.write(&var, item);
                    let next = FrameKind::ForEach {
                        node,
                        phase: LoopPhase::PostBody,
                        idx: idx + 1,
                    };
                    enter_body(vm, ix, next, seq)
                }
                Err(fault) => raise(vm, fault),
            }
        }

        LoopPhase::PostBody => {
            let next = FrameKind::ForEach {
                node,
                phase: LoopPhase::Check,
                idx,
            };
            end_iteration(vm, ix, next)
        }
    }
}

pub fn execute_while<'p>(
    vm: &mut VM<'p>,
    ctx: &mut Context,
    ix: usize,
    node: &'p Node,
    phase: LoopPhase,
) -> Step {
    match phase {
        LoopPhase::Enter | LoopPhase::Check => {
            let holds = match resolve_statement_args(node, ctx, &mut vm.replay) {
                Ok(args) => args.first().is_some_and(Val::is_truthy),
                Err(interrupt) => return interrupted(vm, interrupt),
            };
            if !holds {
                return finish(vm);
            }
            match body(node, 1) {
                Ok(seq) => {
                    let next = FrameKind::While {
                        node,
                        phase: LoopPhase::PostBody,
                    };
                    enter_body(vm, ix, next, seq)
                }
                Err(fault) => raise(vm, fault),
            }
        }

        LoopPhase::PostBody => {
            let next = FrameKind::While {
                node,
                phase: LoopPhase::Check,
            };
            end_iteration(vm, ix, next)
        }
    }
}

/* ===================== Branching ===================== */

/// if / if-else: the chosen body replaces the branch frame
pub fn execute_branch<'p>(vm: &mut VM<'p>, ctx: &mut Context, node: &'p Node) -> Step {
    let holds = match resolve_statement_args(node, ctx, &mut vm.replay) {
        Ok(args) => args.first().is_some_and(Val::is_truthy),
        Err(interrupt) => return interrupted(vm, interrupt),
    };

    let chosen = match (node.definition().behavior, holds) {
        (_, true) => Some(1),
        (Behavior::Flow(Flow::IfElse), false) => Some(2),
        _ => None,
    };

    vm.frames.pop();
    match chosen.map(|index| body(node, index)) {
        Some(Ok(seq)) => {
            push_sequence(vm, seq);
            Step::Continue
        }
        Some(Err(fault)) => raise(vm, fault),
        None => Step::Continue,
    }
}

/* ===================== Try ===================== */

pub fn execute_try<'p>(vm: &mut VM<'p>, ix: usize, node: &'p Node, phase: TryPhase) -> Step {
    let (slot, next) = match phase {
        TryPhase::Enter => (0, TryPhase::Protected),
        TryPhase::Recover => (1, TryPhase::Fallback),
        TryPhase::Protected | TryPhase::Fallback => return finish(vm),
    };

    match body(node, slot) {
        Ok(seq) => {
            vm.frames[ix].kind = FrameKind::Try { node, phase: next };
            push_sequence(vm, seq);
            Step::Continue
        }
        Err(fault) => raise(vm, fault),
    }
}

/* ===================== Cap Statements ===================== */

/// break, continue and quit
pub fn execute_signal(vm: &mut VM<'_>, node: &Node) -> Step {
    vm.frames.pop();
    vm.control = match node.definition().behavior {
        Behavior::Flow(Flow::Break) => Control::Break,
        Behavior::Flow(Flow::Continue) => Control::Continue,
        _ => Control::Halt,
    };
    Step::Continue
}
