//! Virtual Machine state
//!
//! The VM holds all execution state of one run:
//! - frames: Stack of active statements
//! - control: Current control flow state (break, continue, fault, halt)
//! - ticks: Number of scheduling tokens yielded so far

use super::expressions::InputReplay;
use super::types::{Control, Frame, FrameKind, LoopPhase, SimplePhase, TryPhase, WaitPhase};
use crate::catalog::{Behavior, Flow};
use crate::tree::{Node, Sequence};
use tracing::trace;

/* ===================== VM ===================== */

/// Virtual Machine state
///
/// Borrows the program for the lifetime of the run. Variables and output live
/// in the separate `Context`.
#[derive(Debug)]
pub struct VM<'p> {
    /// Stack of execution frames
    pub frames: Vec<Frame<'p>>,

    /// Current control flow state
    pub control: Control,

    /// Tokens yielded to the host so far
    pub ticks: u64,

    pub(crate) replay: InputReplay,
}

impl<'p> VM<'p> {
    /// Create a new VM with a program
    ///
    /// The sequence is wrapped in a root frame and execution begins on the
    /// first step.
    pub fn new(program: &'p Sequence) -> Self {
        let mut vm = VM {
            frames: vec![],
            control: Control::None,
            ticks: 0,
            replay: InputReplay::default(),
        };

        push_sequence(&mut vm, program);

        vm
    }

    /// True once no frames remain
    pub fn is_done(&self) -> bool {
        self.frames.is_empty()
    }
}

/* ===================== Frame Management ===================== */

pub fn push_sequence<'p>(vm: &mut VM<'p>, seq: &'p Sequence) {
    trace!(blocks = seq.blocks.len(), depth = vm.frames.len(), "push sequence");
    vm.frames.push(Frame::new(FrameKind::Sequence { seq, idx: 0 }));
}

/// Push a new frame for a statement onto the stack
///
/// The frame kind and its initial phase follow from the node's behavior.
pub fn push_stmt<'p>(vm: &mut VM<'p>, node: &'p Node) {
    let kind = match node.definition().behavior {
        Behavior::Flow(Flow::Wait) => FrameKind::Wait {
            node,
            phase: WaitPhase::Start,
            remaining: 0,
        },
        Behavior::Flow(Flow::Repeat) => FrameKind::Repeat {
            node,
            phase: LoopPhase::Enter,
            done: 0,
            times: 0,
        },
        Behavior::Flow(Flow::ForEach) => FrameKind::ForEach {
            node,
            phase: LoopPhase::Enter,
            idx: 0,
        },
        // The condition is re-evaluated before every iteration
        Behavior::Flow(Flow::While) => FrameKind::While {
            node,
            phase: LoopPhase::Check,
        },
        Behavior::Flow(Flow::If | Flow::IfElse) => FrameKind::Branch { node },
        Behavior::Flow(Flow::Try) => FrameKind::Try {
            node,
            phase: TryPhase::Enter,
        },
        Behavior::Flow(Flow::Break | Flow::Continue | Flow::Quit) => FrameKind::Signal { node },
        Behavior::Trigger
        | Behavior::Command(_)
        | Behavior::Reporter(_)
        | Behavior::Prompt
        | Behavior::Deprecated => FrameKind::Simple {
            node,
            phase: SimplePhase::Run,
        },
    };

    trace!(id = node.id(), depth = vm.frames.len(), "push frame");
    vm.frames.push(Frame::new(kind));
}

/* ===================== Step Result ===================== */

/// Result of executing one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Continue to next micro-step within the same tick
    Continue,
    /// A scheduling token was consumed; hand control back to the host
    Yield,
    /// Execution complete
    Done,
}
