//! Compare category

use super::{arg, arg_num, Val};
use crate::catalog::{DataType, InstructionDef, ReporterFn, Slot, SlotKind};
use crate::interpreter::{Context, Fault};

pub(super) fn definitions() -> Vec<InstructionDef> {
    let compare = |id: &'static str, op: &'static str, kind: SlotKind, f: ReporterFn| {
        InstructionDef::reporter(
            id,
            DataType::Boolean,
            vec![
                Slot::input(kind),
                Slot::label(op),
                Slot::input_with(kind, 50.0),
            ],
            f,
        )
    };

    vec![
        compare("=", "=", SlotKind::Input, equal),
        compare("!=", "≠", SlotKind::Input, not_equal),
        compare(">", ">", SlotKind::Number, greater),
        compare(">=", "≥", SlotKind::Number, greater_equal),
        compare("<", "<", SlotKind::Number, less),
        compare("<=", "≤", SlotKind::Number, less_equal),
    ]
}

/// Numeric equality when both sides look like numbers, textual otherwise
fn loosely_equal(a: &Val, b: &Val) -> Result<bool, Fault> {
    if a.is_numeric() && b.is_numeric() {
        return Ok(a.to_number()? == b.to_number()?);
    }
    Ok(a.to_text() == b.to_text())
}

fn equal(args: &[Val], _ctx: &mut Context) -> Result<Val, Fault> {
    loosely_equal(arg(args, 0), arg(args, 1)).map(Val::Boolean)
}

fn not_equal(args: &[Val], _ctx: &mut Context) -> Result<Val, Fault> {
    loosely_equal(arg(args, 0), arg(args, 1)).map(|eq| Val::Boolean(!eq))
}

fn greater(args: &[Val], _ctx: &mut Context) -> Result<Val, Fault> {
    Ok(Val::Boolean(arg_num(args, 0)? > arg_num(args, 1)?))
}

fn greater_equal(args: &[Val], _ctx: &mut Context) -> Result<Val, Fault> {
    Ok(Val::Boolean(arg_num(args, 0)? >= arg_num(args, 1)?))
}

fn less(args: &[Val], _ctx: &mut Context) -> Result<Val, Fault> {
    Ok(Val::Boolean(arg_num(args, 0)? < arg_num(args, 1)?))
}

fn less_equal(args: &[Val], _ctx: &mut Context) -> Result<Val, Fault> {
    Ok(Val::Boolean(arg_num(args, 0)? <= arg_num(args, 1)?))
}
