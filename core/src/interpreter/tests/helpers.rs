//! Test helpers for interpreter tests
//!
//! Small constructors for program fixtures, plus a runner that drives a
//! sequence to completion on a fresh context.

use crate::catalog::Catalog;
use crate::codec::SequenceRecord;
use crate::interpreter::types::Val;
use crate::interpreter::{run_until_done, Context, Control, VM};
use crate::tree::{Node, Sequence, SlotValue};

pub fn node(id: &str, values: Vec<SlotValue>) -> Node {
    Node::from_id(id, values).expect("valid node")
}

pub fn num(n: f64) -> SlotValue {
    SlotValue::Literal(Val::Number(n))
}

pub fn text(s: &str) -> SlotValue {
    SlotValue::Literal(Val::from(s))
}

pub fn boolean(b: bool) -> SlotValue {
    SlotValue::Literal(Val::Boolean(b))
}

pub fn var(name: &str) -> SlotValue {
    SlotValue::Variable(name.to_string())
}

pub fn reporter(id: &str, values: Vec<SlotValue>) -> SlotValue {
    node(id, values).into()
}

pub fn get(name: &str) -> SlotValue {
    reporter("get-var", vec![var(name)])
}

pub fn body(blocks: Vec<Node>) -> SlotValue {
    Sequence::new(blocks).into()
}

pub fn say(value: SlotValue) -> Node {
    node("print", vec![value])
}

/// Build a sequence and round-trip it through the codec
///
/// This helper:
/// - Serializes the sequence to its JSON record
/// - Deserializes it against the global catalog
/// - Checks the rebuilt tree equals the input
pub fn program(blocks: Vec<Node>) -> Sequence {
    let seq = Sequence::new(blocks);
    let json = serde_json::to_string(&SequenceRecord::from(&seq)).expect("Sequence serialization failed");
    let record: SequenceRecord = serde_json::from_str(&json).expect("Sequence deserialization failed");
    let rebuilt = record.into_sequence(Catalog::global());
    assert_eq!(rebuilt, seq, "codec round-trip changed the program");
    rebuilt
}

/// Final state of a finished run
pub struct Outcome {
    pub ctx: Context,
    pub control: Control,
    pub ticks: u64,
}

impl Outcome {
    pub fn output(&self) -> Vec<&str> {
        self.ctx.output().iter().map(String::as_str).collect()
    }
}

pub fn run(seq: &Sequence) -> Outcome {
    let mut vm = VM::new(seq);
    let mut ctx = Context::new();
    run_until_done(&mut vm, &mut ctx);
    Outcome {
        ctx,
        control: vm.control,
        ticks: vm.ticks,
    }
}
