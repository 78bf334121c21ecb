//! Instruction catalog
//!
//! The fixed registry of block definitions. Each definition declares its shape
//! (an ordered list of labels and typed input slots), what kind of block it is,
//! what type it reports, and its behavior. The catalog is built once on first
//! use and is read-only afterwards.

pub mod builtins;

use crate::interpreter::types::Val;
use crate::interpreter::{Context, Fault};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// Id of the placeholder substituted for definitions that no longer exist
pub const DEPRECATED_ID: &str = "deprecated";

static CATALOG: OnceLock<Catalog> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("unknown block definition '{0}'")]
    UnknownDefinition(String),
}

/* ===================== Shape ===================== */

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Program-start trigger
    Hat,
    /// Flow-terminating statement
    Cap,
    Statement,
    /// Produces a value
    Reporter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Label,
    Text,
    Number,
    Boolean,
    Variable,
    Expression,
    Sequence,
    /// Fully generic value slot
    Input,
}

impl SlotKind {
    /// Whether a reporter producing `data_type` may be attached to this slot
    pub fn fits(self, data_type: DataType) -> bool {
        if data_type == DataType::Any {
            return !matches!(
                self,
                SlotKind::Sequence | SlotKind::Expression | SlotKind::Variable | SlotKind::Label
            );
        }

        match self {
            SlotKind::Number => data_type == DataType::Number,
            SlotKind::Text => data_type == DataType::Text,
            SlotKind::Boolean => data_type == DataType::Boolean,
            SlotKind::Input => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Text,
    Number,
    Boolean,
    Any,
    Nil,
}

/// One entry in a definition's shape
#[derive(Debug, Clone)]
pub struct Slot {
    pub kind: SlotKind,
    /// Display text, only set for labels
    pub text: Option<&'static str>,
    pub default: Val,
}

impl Slot {
    pub fn label(text: &'static str) -> Self {
        Self {
            kind: SlotKind::Label,
            text: Some(text),
            default: Val::Nil,
        }
    }

    pub fn input(kind: SlotKind) -> Self {
        let default = match kind {
            SlotKind::Boolean => Val::Boolean(false),
            SlotKind::Sequence | SlotKind::Label => Val::Nil,
            _ => Val::Text(String::new()),
        };
        Self {
            kind,
            text: None,
            default,
        }
    }

    pub fn input_with(kind: SlotKind, default: impl Into<Val>) -> Self {
        Self {
            default: default.into(),
            ..Self::input(kind)
        }
    }
}

/* ===================== Behavior ===================== */

pub type CommandFn = fn(&[Val], &mut Context) -> Result<(), Fault>;
pub type ReporterFn = fn(&[Val], &mut Context) -> Result<Val, Fault>;

/// Control constructs executed by the frame machine itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Wait,
    Repeat,
    ForEach,
    While,
    If,
    IfElse,
    Try,
    Break,
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    /// Program start marker; runs as a no-op statement
    Trigger,
    /// Statement with a side effect on the context or filesystem
    Command(CommandFn),
    /// Pure (or filesystem-reading) value producer
    Reporter(ReporterFn),
    /// Reporter that asks the host for a line of input
    Prompt,
    Flow(Flow),
    /// Placeholder for definitions missing at load time
    Deprecated,
}

/* ===================== Definitions ===================== */

#[derive(Debug)]
pub struct InstructionDef {
    pub id: &'static str,
    pub kind: BlockKind,
    pub output: DataType,
    pub behavior: Behavior,
    slots: Vec<Slot>,
    inputs: Vec<usize>,
}

impl InstructionDef {
    pub fn new(id: &'static str, kind: BlockKind, slots: Vec<Slot>, behavior: Behavior) -> Self {
        let inputs = slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.kind != SlotKind::Label)
            .map(|(i, _)| i)
            .collect();
        Self {
            id,
            kind,
            output: DataType::Nil,
            behavior,
            slots,
            inputs,
        }
    }

    pub fn reporter(id: &'static str, output: DataType, slots: Vec<Slot>, f: ReporterFn) -> Self {
        Self::new(id, BlockKind::Reporter, slots, Behavior::Reporter(f)).reports(output)
    }

    pub fn reports(mut self, output: DataType) -> Self {
        self.output = output;
        self
    }

    /// Full shape, labels included
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Number of non-label slots
    pub fn slot_count(&self) -> usize {
        self.inputs.len()
    }

    /// Kind of the `index`-th non-label slot
    pub fn slot_kind(&self, index: usize) -> Option<SlotKind> {
        self.input(index).map(|s| s.kind)
    }

    /// The `index`-th non-label slot
    pub fn input(&self, index: usize) -> Option<&Slot> {
        self.inputs.get(index).map(|&i| &self.slots[i])
    }

    pub fn is_reporter(&self) -> bool {
        self.kind == BlockKind::Reporter
    }
}

impl PartialEq for InstructionDef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Display for InstructionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape: Vec<&str> = self
            .slots
            .iter()
            .map(|slot| match slot.kind {
                SlotKind::Label => slot.text.unwrap_or(""),
                SlotKind::Text => "[]",
                SlotKind::Number => "()",
                SlotKind::Boolean => "<>",
                SlotKind::Variable => "[ v]",
                SlotKind::Sequence => "[>  >]",
                SlotKind::Expression | SlotKind::Input => "{}",
            })
            .collect();
        let shape = shape.join(" ");

        match (self.kind, self.output) {
            (BlockKind::Reporter, DataType::Boolean) => write!(f, "<{}>", shape),
            (BlockKind::Reporter, _) => write!(f, "({})", shape),
            _ => f.write_str(&shape),
        }
    }
}

/* ===================== Catalog ===================== */

#[derive(Debug, Clone)]
pub struct Category {
    pub name: &'static str,
    pub description: &'static str,
    members: Vec<usize>,
}

#[derive(Debug)]
pub struct Catalog {
    defs: Vec<InstructionDef>,
    categories: Vec<Category>,
    index: HashMap<&'static str, usize>,
    deprecated: InstructionDef,
}

impl Catalog {
    /// The process-wide catalog, built on first access
    pub fn global() -> &'static Catalog {
        CATALOG.get_or_init(Catalog::builtin)
    }

    /// Build the catalog from the builtin categories
    pub fn builtin() -> Self {
        let mut defs = Vec::new();
        let mut categories = Vec::new();
        let mut index = HashMap::new();

        for (name, description, members) in builtins::categories() {
            let mut ids = Vec::with_capacity(members.len());
            for def in members {
                index.insert(def.id, defs.len());
                ids.push(defs.len());
                defs.push(def);
            }
            categories.push(Category {
                name,
                description,
                members: ids,
            });
        }

        Self {
            defs,
            categories,
            index,
            deprecated: InstructionDef::new(
                DEPRECATED_ID,
                BlockKind::Statement,
                vec![Slot::label("deprecated code")],
                Behavior::Deprecated,
            ),
        }
    }

    pub fn lookup(&self, id: &str) -> Result<&InstructionDef, CatalogError> {
        if id == DEPRECATED_ID {
            return Ok(&self.deprecated);
        }
        self.index
            .get(id)
            .map(|&i| &self.defs[i])
            .ok_or_else(|| CatalogError::UnknownDefinition(id.to_string()))
    }

    pub fn deprecated(&self) -> &InstructionDef {
        &self.deprecated
    }

    pub fn definitions(&self) -> impl Iterator<Item = &InstructionDef> {
        self.defs.iter()
    }

    /// Categories in palette order, each with its member definitions
    pub fn categories(&self) -> impl Iterator<Item = (&Category, Vec<&InstructionDef>)> {
        self.categories.iter().map(move |c| {
            let members = c.members.iter().map(|&i| &self.defs[i]).collect();
            (c, members)
        })
    }
}
