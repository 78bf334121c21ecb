//! Input and Output categories
//!
//! File primitives go straight to the host filesystem; the engine does not
//! mediate them. Text input is a `Prompt` behavior resolved by the evaluator.

use super::{arg_text, Val};
use crate::catalog::{Behavior, BlockKind, DataType, InstructionDef, Slot, SlotKind};
use crate::interpreter::{Context, Fault};

pub(super) fn input_definitions() -> Vec<InstructionDef> {
    vec![
        InstructionDef::new(
            "input",
            BlockKind::Reporter,
            vec![
                Slot::label("ask"),
                Slot::input_with(SlotKind::Text, "What's your name? "),
            ],
            Behavior::Prompt,
        )
        .reports(DataType::Text),
        InstructionDef::reporter(
            "read-file",
            DataType::Text,
            vec![
                Slot::label("read from file"),
                Slot::input_with(SlotKind::Text, "input.txt"),
            ],
            read_file,
        ),
    ]
}

pub(super) fn output_definitions() -> Vec<InstructionDef> {
    vec![
        InstructionDef::new(
            "print",
            BlockKind::Statement,
            vec![
                Slot::label("say"),
                Slot::input_with(SlotKind::Text, "Hello world!"),
            ],
            Behavior::Command(print),
        ),
        InstructionDef::new(
            "write-file",
            BlockKind::Statement,
            vec![
                Slot::label("write to file"),
                Slot::input_with(SlotKind::Text, "output.txt"),
                Slot::label("contents"),
                Slot::input_with(SlotKind::Text, "Hello world!"),
            ],
            Behavior::Command(write_file),
        ),
    ]
}

fn read_file(args: &[Val], _ctx: &mut Context) -> Result<Val, Fault> {
    let path = arg_text(args, 0);
    std::fs::read_to_string(&path)
        .map(Val::Text)
        .map_err(|e| Fault::io(&path, &e))
}

fn print(args: &[Val], ctx: &mut Context) -> Result<(), Fault> {
    ctx.emit(arg_text(args, 0));
    Ok(())
}

fn write_file(args: &[Val], _ctx: &mut Context) -> Result<(), Fault> {
    let path = arg_text(args, 0);
    std::fs::write(&path, arg_text(args, 1)).map_err(|e| Fault::io(&path, &e))
}
