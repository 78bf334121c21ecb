//! Builtin block definitions
//!
//! Definitions are grouped by palette category, one file per category. Each
//! file exposes a `definitions()` function returning its blocks in palette
//! order; behaviors live next to the definitions that use them.

mod boolean;
mod compare;
mod control;
mod io;
mod number;
mod text;
mod variable;

use super::InstructionDef;
use crate::interpreter::types::Val;
use crate::interpreter::Fault;

/// (name, description, definitions) for every builtin category
pub fn categories() -> Vec<(&'static str, &'static str, Vec<InstructionDef>)> {
    vec![
        ("Control", "Controls how the program runs.", control::definitions()),
        ("Input", "Gathers input from the user.", io::input_definitions()),
        ("Output", "How the program outputs information.", io::output_definitions()),
        ("Number", "Manipulates numbers and does calculations.", number::definitions()),
        ("Compare", "Compare and contrasts different values.", compare::definitions()),
        ("Boolean", "Manipulates booleans for decision making.", boolean::definitions()),
        ("Text", "Manipulates different sorts of text.", text::definitions()),
        ("Variable", "Stores and change variables.", variable::definitions()),
    ]
}

/* ===================== Argument Helpers ===================== */

// Arguments arrive already coerced to their slot kinds, positionally aligned
// with the definition's non-label slots.

fn arg(args: &[Val], index: usize) -> &Val {
    args.get(index).unwrap_or(&Val::Nil)
}

fn arg_num(args: &[Val], index: usize) -> Result<f64, Fault> {
    arg(args, index).to_number()
}

fn arg_text(args: &[Val], index: usize) -> String {
    arg(args, index).to_text()
}
