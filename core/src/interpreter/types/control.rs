//! Control flow and execution frame types

use super::phase::{LoopPhase, SimplePhase, TryPhase, WaitPhase};
use super::values::Val;
use crate::interpreter::errors::Fault;
use crate::tree::{Node, Sequence};

/* ===================== Control Flow ===================== */

/// Control flow state
///
/// This represents active non-local control flow. When control != None, the VM
/// unwinds the frame stack to the nearest frame that handles it: loops take
/// Break/Continue, try frames take Throw, nothing takes Halt.
#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    None,
    Break,
    Continue,
    Throw(Fault),
    Halt,
}

/* ===================== Frames ===================== */

/// Frame kind - the statement being executed and its state
///
/// Frames borrow the nodes they execute; the program tree is read-only for
/// the whole run.
#[derive(Debug, Clone, Copy)]
pub enum FrameKind<'p> {
    Sequence {
        seq: &'p Sequence,
        idx: usize,
    },
    Simple {
        node: &'p Node,
        phase: SimplePhase,
    },
    Wait {
        node: &'p Node,
        phase: WaitPhase,
        remaining: u64,
    },
    Repeat {
        node: &'p Node,
        phase: LoopPhase,
        done: u64,
        times: u64,
    },
    ForEach {
        node: &'p Node,
        phase: LoopPhase,
        idx: usize,
    },
    While {
        node: &'p Node,
        phase: LoopPhase,
    },
    Branch {
        node: &'p Node,
    },
    Try {
        node: &'p Node,
        phase: TryPhase,
    },
    Signal {
        node: &'p Node,
    },
}

impl<'p> FrameKind<'p> {
    pub fn is_loop(&self) -> bool {
        matches!(
            self,
            FrameKind::Repeat { .. } | FrameKind::ForEach { .. } | FrameKind::While { .. }
        )
    }

    /// Same loop frame moved to another phase; other kinds are unchanged
    pub fn with_loop_phase(self, next: LoopPhase) -> Self {
        match self {
            FrameKind::Repeat {
                node, done, times, ..
            } => FrameKind::Repeat {
                node,
                phase: next,
                done,
                times,
            },
            FrameKind::ForEach { node, idx, .. } => FrameKind::ForEach {
                node,
                phase: next,
                idx,
            },
            FrameKind::While { node, .. } => FrameKind::While { node, phase: next },
            other => other,
        }
    }
}

/// State of a for-each loop: the bound variable and the values left to visit
#[derive(Debug, Clone, Default)]
pub struct Iteration {
    pub var: String,
    pub items: Vec<Val>,
}

/// Execution frame - one per active statement
///
/// The frame stack replaces the host call stack, so execution can stop after
/// any micro-step and resume on the next host tick.
#[derive(Debug, Clone)]
pub struct Frame<'p> {
    pub kind: FrameKind<'p>,

    /// Tick count when the current loop iteration began
    pub mark: u64,

    pub iteration: Option<Iteration>,
}

impl<'p> Frame<'p> {
    pub fn new(kind: FrameKind<'p>) -> Self {
        Self {
            kind,
            mark: 0,
            iteration: None,
        }
    }
}
