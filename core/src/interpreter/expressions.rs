//! Expression evaluation
//!
//! Reporter nodes are evaluated eagerly and recursively: every nested reporter
//! resolves within the micro-step of the statement that owns it. The one
//! exception is the input reporter, which suspends the whole statement until
//! the host supplies a line.

use super::context::Context;
use super::errors::Fault;
use super::types::Val;
use crate::catalog::{Behavior, SlotKind};
use crate::tree::{Node, SlotValue};

/// Why an evaluation did not produce a value
#[derive(Debug, Clone, PartialEq)]
pub enum Interrupt {
    /// Waiting for input; the prompt is recorded in the context
    Suspend,
    Throw(Fault),
}

impl From<Fault> for Interrupt {
    fn from(fault: Fault) -> Self {
        Interrupt::Throw(fault)
    }
}

pub type EvalResult = Result<Val, Interrupt>;

/* ===================== Input Replay ===================== */

/// Answers already consumed by the statement currently being resolved
///
/// A statement that suspends re-resolves all of its arguments on retry.
/// Input reporters that already received an answer during an earlier attempt
/// get the same answer back instead of prompting again.
#[derive(Debug, Clone, Default)]
pub struct InputReplay {
    answers: Vec<String>,
    cursor: usize,
}

impl InputReplay {
    fn rewind(&mut self) {
        self.cursor = 0;
    }

    fn clear(&mut self) {
        self.answers.clear();
        self.cursor = 0;
    }

    fn next(&mut self) -> Option<String> {
        let answer = self.answers.get(self.cursor).cloned()?;
        self.cursor += 1;
        Some(answer)
    }

    fn record(&mut self, answer: String) {
        self.answers.push(answer);
        self.cursor = self.answers.len();
    }
}

/// One resolution attempt on behalf of a statement
///
/// Replayed answers survive only a suspension.
fn attempt<T>(
    replay: &mut InputReplay,
    resolve: impl FnOnce(&mut InputReplay) -> Result<T, Interrupt>,
) -> Result<T, Interrupt> {
    replay.rewind();
    let result = resolve(replay);
    if !matches!(result, Err(Interrupt::Suspend)) {
        replay.clear();
    }
    result
}

/// Resolve every input slot of a statement
pub fn resolve_statement_args(
    node: &Node,
    ctx: &mut Context,
    replay: &mut InputReplay,
) -> Result<Vec<Val>, Interrupt> {
    attempt(replay, |replay| resolve_args(node, ctx, replay))
}

/// Evaluate a reporter placed directly in a sequence
pub fn evaluate_statement(node: &Node, ctx: &mut Context, replay: &mut InputReplay) -> EvalResult {
    attempt(replay, |replay| eval_node(node, ctx, replay))
}

/* ===================== Evaluation ===================== */

pub fn resolve_args(
    node: &Node,
    ctx: &mut Context,
    replay: &mut InputReplay,
) -> Result<Vec<Val>, Interrupt> {
    (0..node.definition().slot_count())
        .map(|index| resolve_slot(node, index, ctx, replay))
        .collect()
}

/// Resolve one input slot to a value of the slot's kind
///
/// Sequence slots resolve to `Nil`; the frame machine reads their bodies
/// directly from the node.
pub fn resolve_slot(
    node: &Node,
    index: usize,
    ctx: &mut Context,
    replay: &mut InputReplay,
) -> EvalResult {
    let def = node.definition();
    let Some(slot) = def.input(index) else {
        return Ok(Val::Nil);
    };
    if slot.kind == SlotKind::Sequence {
        return Ok(Val::Nil);
    }

    let raw = match node.value(index) {
        None | Some(SlotValue::Absent) => slot.default.clone(),
        Some(SlotValue::Literal(value)) => value.clone(),
        Some(SlotValue::Variable(name)) => Val::Text(name.clone()),
        Some(SlotValue::Node(inner)) => eval_node(inner, ctx, replay)?,
        Some(SlotValue::Sequence(_)) => {
            return Err(Fault::TypeCoercion {
                value: "a block sequence".to_string(),
                expected: "value",
            }
            .into())
        }
    };

    Ok(coerce(raw, slot.kind)?)
}

/// Convert a resolved value to what the slot kind requires
pub fn coerce(value: Val, kind: SlotKind) -> Result<Val, Fault> {
    match kind {
        SlotKind::Text | SlotKind::Variable => Ok(Val::Text(value.to_text())),
        SlotKind::Number => value.to_number().map(Val::Number),
        _ => Ok(value),
    }
}

/// Evaluate a reporter node
pub fn eval_node(node: &Node, ctx: &mut Context, replay: &mut InputReplay) -> EvalResult {
    match node.definition().behavior {
        Behavior::Reporter(report) => {
            let args = resolve_args(node, ctx, replay)?;
            Ok(report(&args, ctx)?)
        }
        Behavior::Prompt => {
            let args = resolve_args(node, ctx, replay)?;
            if let Some(answer) = replay.next() {
                return Ok(Val::Text(answer));
            }
            let prompt = args.first().map(Val::to_text).unwrap_or_default();
            match ctx.request_input(&prompt) {
                Some(answer) => {
                    replay.record(answer.clone());
                    Ok(Val::Text(answer))
                }
                None => Err(Interrupt::Suspend),
            }
        }
        Behavior::Deprecated => Err(deprecated(node).into()),
        _ => Err(Fault::NotAReporter(node.id().to_string()).into()),
    }
}

pub(crate) fn deprecated(node: &Node) -> Fault {
    Fault::instruction(format!(
        "instruction '{}' is no longer supported and cannot run",
        node.id()
    ))
}
