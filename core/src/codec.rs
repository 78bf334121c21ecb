//! Serialization codec
//!
//! Program trees are persisted as plain serde records: a node is its
//! definition id plus its slot values, a sequence is its blocks plus an
//! optional canvas anchor. On disk the JSON form of a [`ProgramRecord`] is
//! gzip-compressed.
//!
//! Decoding never fails on catalog drift. A record naming a definition the
//! catalog no longer has becomes the deprecated placeholder, and a record
//! whose value count disagrees with its definition is padded or truncated.

use crate::catalog::Catalog;
use crate::interpreter::types::Val;
use crate::tree::{fit_slot, Node, Program, Sequence, SlotValue};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed program record: {0}")]
    Json(#[from] serde_json::Error),
}

/* ===================== Records ===================== */

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub definition: String,
    #[serde(default)]
    pub values: Vec<ValueRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceRecord {
    pub blocks: Vec<NodeRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<(i32, i32)>,
}

/// One slot value. Variable names are stored as plain text; the slot kind
/// tells them apart from text literals on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueRecord {
    Node(NodeRecord),
    Sequence(SequenceRecord),
    Bool(bool),
    Number(f64),
    Text(String),
    Null,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramRecord {
    pub sequences: Vec<SequenceRecord>,
    #[serde(default)]
    pub global_variable_names: Vec<String>,
}

/* ===================== Serialize ===================== */

impl From<&Node> for NodeRecord {
    fn from(node: &Node) -> Self {
        Self {
            definition: node.id().to_string(),
            values: node.values().iter().map(ValueRecord::from).collect(),
        }
    }
}

impl From<&SlotValue> for ValueRecord {
    fn from(value: &SlotValue) -> Self {
        match value {
            SlotValue::Absent | SlotValue::Literal(Val::Nil) => ValueRecord::Null,
            SlotValue::Literal(Val::Boolean(b)) => ValueRecord::Bool(*b),
            SlotValue::Literal(Val::Number(n)) => ValueRecord::Number(*n),
            SlotValue::Literal(Val::Text(s)) | SlotValue::Variable(s) => {
                ValueRecord::Text(s.clone())
            }
            SlotValue::Node(node) => ValueRecord::Node(node.as_ref().into()),
            SlotValue::Sequence(seq) => ValueRecord::Sequence(seq.into()),
        }
    }
}

impl From<&Sequence> for SequenceRecord {
    fn from(seq: &Sequence) -> Self {
        Self {
            blocks: seq.blocks.iter().map(NodeRecord::from).collect(),
            anchor: seq.anchor,
        }
    }
}

impl From<&Program> for ProgramRecord {
    fn from(program: &Program) -> Self {
        Self {
            sequences: program.sequences.iter().map(SequenceRecord::from).collect(),
            global_variable_names: program.globals.iter().cloned().collect(),
        }
    }
}

/* ===================== Deserialize ===================== */

impl NodeRecord {
    /// Rebuild the node against `catalog`
    pub fn into_node(self, catalog: &'static Catalog) -> Node {
        let def = match catalog.lookup(&self.definition) {
            Ok(def) => def,
            Err(err) => {
                warn!(definition = %self.definition, %err, "substituting deprecated placeholder");
                return Node::new(catalog.deprecated());
            }
        };

        let expected = def.slot_count();
        if self.values.len() != expected {
            warn!(
                definition = def.id,
                expected,
                actual = self.values.len(),
                "slot count mismatch; repairing"
            );
        }

        let mut values: Vec<SlotValue> = self
            .values
            .into_iter()
            .take(expected)
            .enumerate()
            .map(|(index, value)| {
                fit_slot(def, index, value.into_slot(catalog)).unwrap_or_else(|err| {
                    warn!(definition = def.id, index, %err, "dropping slot value");
                    SlotValue::Absent
                })
            })
            .collect();
        values.resize(expected, SlotValue::Absent);

        Node::with_values(def, values).unwrap_or_else(|_| Node::new(def))
    }
}

impl ValueRecord {
    /// Text comes back as a literal; the slot kind decides if it names a
    /// variable when the node is assembled
    fn into_slot(self, catalog: &'static Catalog) -> SlotValue {
        match self {
            ValueRecord::Null => SlotValue::Absent,
            ValueRecord::Bool(b) => SlotValue::Literal(Val::Boolean(b)),
            ValueRecord::Number(n) => SlotValue::Literal(Val::Number(n)),
            ValueRecord::Text(s) => SlotValue::Literal(Val::Text(s)),
            ValueRecord::Node(node) => SlotValue::Node(Box::new(node.into_node(catalog))),
            ValueRecord::Sequence(seq) => SlotValue::Sequence(seq.into_sequence(catalog)),
        }
    }
}

impl SequenceRecord {
    pub fn into_sequence(self, catalog: &'static Catalog) -> Sequence {
        Sequence {
            blocks: self
                .blocks
                .into_iter()
                .map(|node| node.into_node(catalog))
                .collect(),
            anchor: self.anchor,
        }
    }
}

impl ProgramRecord {
    pub fn into_program(self, catalog: &'static Catalog) -> Program {
        Program {
            sequences: self
                .sequences
                .into_iter()
                .map(|seq| seq.into_sequence(catalog))
                .collect(),
            globals: self.global_variable_names.into_iter().collect(),
        }
    }
}

/* ===================== Persisted Format ===================== */

pub fn to_json(program: &Program) -> Result<String, CodecError> {
    Ok(serde_json::to_string_pretty(&ProgramRecord::from(program))?)
}

pub fn from_json(json: &str) -> Result<Program, CodecError> {
    let record: ProgramRecord = serde_json::from_str(json)?;
    Ok(record.into_program(Catalog::global()))
}

/// Gzip-compressed JSON
pub fn encode(program: &Program) -> Result<Vec<u8>, CodecError> {
    let json = serde_json::to_vec(&ProgramRecord::from(program))?;
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&json)?;
    Ok(encoder.finish()?)
}

/// Accepts the compressed format, or plain JSON
pub fn decode(bytes: &[u8]) -> Result<Program, CodecError> {
    let record: ProgramRecord = if bytes.starts_with(&GZIP_MAGIC) {
        let mut json = Vec::new();
        GzDecoder::new(bytes).read_to_end(&mut json)?;
        serde_json::from_slice(&json)?
    } else {
        serde_json::from_slice(bytes)?
    };
    Ok(record.into_program(Catalog::global()))
}

pub fn save(program: &Program, path: impl AsRef<Path>) -> Result<(), CodecError> {
    std::fs::write(path, encode(program)?)?;
    Ok(())
}

pub fn load(path: impl AsRef<Path>) -> Result<Program, CodecError> {
    decode(&std::fs::read(path)?)
}

/// SHA-256 of the canonical JSON record, hex encoded
pub fn fingerprint(program: &Program) -> Result<String, CodecError> {
    let json = serde_json::to_vec(&ProgramRecord::from(program))?;
    let mut hasher = Sha256::new();
    hasher.update(&json);
    Ok(format!("{:x}", hasher.finalize()))
}
