//! Program tree
//!
//! A `Node` is one instantiated block: a definition plus one value per
//! non-label slot. A `Sequence` is an ordered run of statement nodes (a
//! "stack" in the editor). `Clone` on either is a deep copy; nothing in the
//! tree is shared, so an editor can duplicate a dragged block and mutate the
//! copy freely.

use crate::catalog::{Catalog, CatalogError, InstructionDef, SlotKind};
use crate::interpreter::types::Val;
use std::collections::BTreeSet;
use thiserror::Error;

/// Shared empty body used for absent nested-sequence slots
pub static EMPTY_SEQUENCE: Sequence = Sequence {
    blocks: Vec::new(),
    anchor: None,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreeError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("block '{id}' takes {expected} values, got {actual}")]
    Arity {
        id: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("block '{id}' has no slot {index}")]
    NoSuchSlot { id: &'static str, index: usize },

    #[error("slot {index} of '{id}' does not accept {what}")]
    Incompatible {
        id: &'static str,
        index: usize,
        what: String,
    },
}

/* ===================== Slot Values ===================== */

#[derive(Debug, Clone, PartialEq)]
pub enum SlotValue {
    /// Use the slot's declared default
    Absent,
    Literal(Val),
    /// Variable name in a variable-name slot
    Variable(String),
    /// Nested expression
    Node(Box<Node>),
    /// Nested statement body
    Sequence(Sequence),
}

impl From<Val> for SlotValue {
    fn from(v: Val) -> Self {
        SlotValue::Literal(v)
    }
}

impl From<Node> for SlotValue {
    fn from(node: Node) -> Self {
        SlotValue::Node(Box::new(node))
    }
}

impl From<Sequence> for SlotValue {
    fn from(seq: Sequence) -> Self {
        SlotValue::Sequence(seq)
    }
}

/* ===================== Node ===================== */

#[derive(Debug, Clone)]
pub struct Node {
    def: &'static InstructionDef,
    values: Vec<SlotValue>,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.def.id == other.def.id && self.values == other.values
    }
}

impl Node {
    /// A node with every slot absent
    pub fn new(def: &'static InstructionDef) -> Self {
        Self {
            def,
            values: vec![SlotValue::Absent; def.slot_count()],
        }
    }

    pub fn with_values(
        def: &'static InstructionDef,
        values: Vec<SlotValue>,
    ) -> Result<Self, TreeError> {
        if values.len() != def.slot_count() {
            return Err(TreeError::Arity {
                id: def.id,
                expected: def.slot_count(),
                actual: values.len(),
            });
        }
        let values = values
            .into_iter()
            .enumerate()
            .map(|(index, value)| fit_slot(def, index, value))
            .collect::<Result<_, _>>()?;
        Ok(Self { def, values })
    }

    /// Build a node from a definition id in the global catalog
    pub fn from_id(id: &str, values: Vec<SlotValue>) -> Result<Self, TreeError> {
        Self::with_values(Catalog::global().lookup(id)?, values)
    }

    pub fn definition(&self) -> &'static InstructionDef {
        self.def
    }

    pub fn id(&self) -> &'static str {
        self.def.id
    }

    pub fn values(&self) -> &[SlotValue] {
        &self.values
    }

    pub fn value(&self, index: usize) -> Option<&SlotValue> {
        self.values.get(index)
    }

    /// Replace one slot value; see [`fit_slot`] for what a slot accepts
    pub fn set_value(&mut self, index: usize, value: SlotValue) -> Result<(), TreeError> {
        self.values[index] = fit_slot(self.def, index, value)?;
        Ok(())
    }

    /// Attach a reporter into a value slot, checking type compatibility
    pub fn attach(&mut self, index: usize, reporter: Node) -> Result<(), TreeError> {
        let kind = self.slot_kind(index)?;
        if !reporter.def.is_reporter() || !kind.fits(reporter.def.output) {
            return Err(self.incompatible(index, format!("block '{}'", reporter.id())));
        }
        self.values[index] = SlotValue::Node(Box::new(reporter));
        Ok(())
    }

    /// Rename a variable everywhere it is referenced in this subtree
    pub fn rename_variable(&mut self, from: &str, to: &str) {
        for value in &mut self.values {
            match value {
                SlotValue::Variable(name) if name.as_str() == from => *name = to.to_string(),
                SlotValue::Node(node) => node.rename_variable(from, to),
                SlotValue::Sequence(seq) => seq.rename_variable(from, to),
                _ => {}
            }
        }
    }

    fn collect_variables(&self, out: &mut BTreeSet<String>) {
        for value in &self.values {
            match value {
                SlotValue::Variable(name) if !name.is_empty() => {
                    out.insert(name.clone());
                }
                SlotValue::Node(node) => node.collect_variables(out),
                SlotValue::Sequence(seq) => seq.collect_variables(out),
                _ => {}
            }
        }
    }

    fn slot_kind(&self, index: usize) -> Result<SlotKind, TreeError> {
        self.def.slot_kind(index).ok_or(TreeError::NoSuchSlot {
            id: self.def.id,
            index,
        })
    }

    fn incompatible(&self, index: usize, what: String) -> TreeError {
        incompatible(self.def, index, what)
    }
}

/// Check a value against slot `index` of `def` and bring it to canonical form
///
/// Nested-sequence slots only take sequences; other slots never do. A text
/// literal in a variable-name slot becomes a variable reference, and a
/// variable reference anywhere else becomes a text literal. Nil literals and
/// non-finite numbers have no persisted form and are rejected.
pub fn fit_slot(
    def: &'static InstructionDef,
    index: usize,
    value: SlotValue,
) -> Result<SlotValue, TreeError> {
    let Some(kind) = def.slot_kind(index) else {
        return Err(TreeError::NoSuchSlot { id: def.id, index });
    };

    let value = match value {
        SlotValue::Absent => return Ok(SlotValue::Absent),
        SlotValue::Literal(Val::Nil) => {
            return Err(incompatible(def, index, "a nil literal".to_string()))
        }
        SlotValue::Literal(Val::Number(n)) if !n.is_finite() => {
            return Err(incompatible(def, index, format!("the number {}", n)))
        }
        SlotValue::Literal(Val::Text(name)) if kind == SlotKind::Variable => {
            SlotValue::Variable(name)
        }
        SlotValue::Variable(name) if kind != SlotKind::Variable => {
            SlotValue::Literal(Val::Text(name))
        }
        value => value,
    };

    let is_body = matches!(value, SlotValue::Sequence(_));
    if is_body != (kind == SlotKind::Sequence) {
        return Err(incompatible(def, index, describe(&value)));
    }
    Ok(value)
}

fn incompatible(def: &'static InstructionDef, index: usize, what: String) -> TreeError {
    TreeError::Incompatible {
        id: def.id,
        index,
        what,
    }
}

fn describe(value: &SlotValue) -> String {
    match value {
        SlotValue::Absent => "an empty value".to_string(),
        SlotValue::Literal(v) => format!("a {} literal", v.type_name()),
        SlotValue::Variable(_) => "a variable".to_string(),
        SlotValue::Node(node) => format!("block '{}'", node.id()),
        SlotValue::Sequence(_) => "a block sequence".to_string(),
    }
}

/* ===================== Sequence ===================== */

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sequence {
    pub blocks: Vec<Node>,
    /// Editor position; never read by the engine
    pub anchor: Option<(i32, i32)>,
}

impl Sequence {
    pub fn new(blocks: Vec<Node>) -> Self {
        Self {
            blocks,
            anchor: None,
        }
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.anchor = Some((x, y));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Variable names referenced anywhere in this sequence
    pub fn variables(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_variables(&mut out);
        out
    }

    pub fn rename_variable(&mut self, from: &str, to: &str) {
        for node in &mut self.blocks {
            node.rename_variable(from, to);
        }
    }

    fn collect_variables(&self, out: &mut BTreeSet<String>) {
        for node in &self.blocks {
            node.collect_variables(out);
        }
    }
}

/* ===================== Program ===================== */

/// Everything the editor persists: top-level sequences plus declared globals
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub sequences: Vec<Sequence>,
    pub globals: BTreeSet<String>,
}

impl Program {
    /// The first top-level sequence that begins with the `start` hat
    pub fn start_sequence(&self) -> Option<&Sequence> {
        self.sequences
            .iter()
            .find(|s| s.blocks.first().map(Node::id) == Some("start"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DataType;

    fn node(id: &str, values: Vec<SlotValue>) -> Node {
        Node::from_id(id, values).expect("valid node")
    }

    fn var(name: &str) -> SlotValue {
        SlotValue::Variable(name.to_string())
    }

    #[test]
    fn test_with_values_checks_arity() {
        let err = Node::from_id("print", vec![]).unwrap_err();
        assert_eq!(
            err,
            TreeError::Arity {
                id: "print",
                expected: 1,
                actual: 0
            }
        );
        assert!(matches!(
            Node::from_id("nope", vec![]),
            Err(TreeError::Catalog(CatalogError::UnknownDefinition(_)))
        ));
    }

    #[test]
    fn test_copy_is_independent() {
        let body = Sequence::new(vec![node("print", vec![Val::from("hi").into()])]);
        let original = node("repeat", vec![Val::Number(3.0).into(), body.into()]);

        let mut copy = original.clone();
        copy.set_value(0, Val::Number(9.0).into()).unwrap();
        if let Some(SlotValue::Sequence(_)) = copy.value(1) {
            copy.set_value(1, Sequence::default().into()).unwrap();
        }

        assert_ne!(copy, original);
        assert_eq!(original.value(0), Some(&SlotValue::Literal(Val::Number(3.0))));
        let Some(SlotValue::Sequence(seq)) = original.value(1) else {
            unreachable!("repeat body should still be a sequence");
        };
        assert_eq!(seq.blocks.len(), 1);
    }

    #[test]
    fn test_structural_equality() {
        let a = node("+", vec![Val::Number(1.0).into(), SlotValue::Absent]);
        let b = node("+", vec![Val::Number(1.0).into(), SlotValue::Absent]);
        let c = node("-", vec![Val::Number(1.0).into(), SlotValue::Absent]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_set_value_rejects_body_in_value_slot() {
        let mut print = node("print", vec![SlotValue::Absent]);
        assert!(print.set_value(0, Sequence::default().into()).is_err());
        assert!(print.set_value(1, Val::from("x").into()).is_err());

        let mut repeat = node("repeat", vec![SlotValue::Absent, SlotValue::Absent]);
        assert!(repeat.set_value(1, Val::from("x").into()).is_err());
        assert!(repeat.set_value(1, Sequence::default().into()).is_ok());
    }

    #[test]
    fn test_slot_values_take_canonical_form() {
        let get = node("get-var", vec![Val::from("x").into()]);
        assert_eq!(get.value(0), Some(&var("x")));

        let mut print = node("print", vec![var("y")]);
        assert_eq!(print.value(0), Some(&SlotValue::Literal(Val::from("y"))));

        print.set_value(0, Val::Nil.into()).unwrap_err();
        print.set_value(0, Val::Number(f64::NAN).into()).unwrap_err();
        print.set_value(0, Val::Number(f64::INFINITY).into()).unwrap_err();
        assert!(Node::from_id("print", vec![Val::Nil.into()]).is_err());
        assert_eq!(print.value(0), Some(&SlotValue::Literal(Val::from("y"))));
    }

    #[test]
    fn test_attach_checks_fit() {
        let sum = node("+", vec![SlotValue::Absent, SlotValue::Absent]);
        let join = node("join", vec![SlotValue::Absent, SlotValue::Absent]);
        let get = node("get-var", vec![var("x")]);
        assert_eq!(get.definition().output, DataType::Any);

        let mut gt = node(">", vec![SlotValue::Absent, SlotValue::Absent]);
        assert!(gt.attach(0, sum.clone()).is_ok());
        assert!(gt.attach(1, join).is_err());
        assert!(gt.attach(1, get.clone()).is_ok());

        let mut repeat = node("repeat", vec![SlotValue::Absent, SlotValue::Absent]);
        assert!(repeat.attach(1, get).is_err());
        let print = node("print", vec![SlotValue::Absent]);
        assert!(repeat.attach(0, print).is_err());
    }

    #[test]
    fn test_variables_and_rename() {
        let mut seq = Sequence::new(vec![
            node("set", vec![var("x"), Val::Number(0.0).into()]),
            node(
                "repeat",
                vec![
                    Val::Number(2.0).into(),
                    Sequence::new(vec![node(
                        "print",
                        vec![node("get-var", vec![var("y")]).into()],
                    )])
                    .into(),
                ],
            ),
        ]);
        let names: Vec<String> = seq.variables().into_iter().collect();
        assert_eq!(names, vec!["x".to_string(), "y".to_string()]);

        seq.rename_variable("y", "z");
        assert!(seq.variables().contains("z"));
        assert!(!seq.variables().contains("y"));
    }

    #[test]
    fn test_start_sequence() {
        let program = Program {
            sequences: vec![
                Sequence::new(vec![node("print", vec![SlotValue::Absent])]),
                Sequence::new(vec![node("start", vec![])]).at(10, 20),
            ],
            globals: BTreeSet::new(),
        };
        assert_eq!(program.start_sequence().and_then(|s| s.anchor), Some((10, 20)));
    }
}
