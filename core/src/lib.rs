pub mod catalog;
pub mod cli;
pub mod codec;
pub mod config;
pub mod host;
pub mod interpreter;
pub mod tree;

// Re-export main types
pub use catalog::{Catalog, InstructionDef};
pub use host::{Console, Execution, RunStatus};
pub use interpreter::{Context, Fault, Val};
pub use tree::{Node, Program, Sequence, SlotValue};
