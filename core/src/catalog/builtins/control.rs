//! Control category
//!
//! Everything here is executed by the frame machine (see
//! `interpreter::statements`), so the definitions carry a `Flow` tag instead of
//! a behavior function.

use crate::catalog::{Behavior, BlockKind, Flow, InstructionDef, Slot, SlotKind};

pub(super) fn definitions() -> Vec<InstructionDef> {
    use BlockKind::{Cap, Hat, Statement};

    vec![
        InstructionDef::new(
            "start",
            Hat,
            vec![Slot::label("when the program starts")],
            Behavior::Trigger,
        ),
        InstructionDef::new(
            "sleep",
            Statement,
            vec![
                Slot::label("wait for"),
                Slot::input_with(SlotKind::Number, 1.0),
                Slot::label("seconds"),
            ],
            Behavior::Flow(Flow::Wait),
        ),
        InstructionDef::new(
            "repeat",
            Statement,
            vec![
                Slot::label("repeat"),
                Slot::input_with(SlotKind::Number, 10.0),
                Slot::label("times"),
                Slot::input(SlotKind::Sequence),
            ],
            Behavior::Flow(Flow::Repeat),
        ),
        InstructionDef::new(
            "for",
            Statement,
            vec![
                Slot::label("for each"),
                Slot::input(SlotKind::Variable),
                Slot::label("in"),
                Slot::input(SlotKind::Variable),
                Slot::input(SlotKind::Sequence),
            ],
            Behavior::Flow(Flow::ForEach),
        ),
        InstructionDef::new(
            "while",
            Statement,
            vec![
                Slot::label("repeat while"),
                Slot::input_with(SlotKind::Boolean, true),
                Slot::label("is true"),
                Slot::input(SlotKind::Sequence),
            ],
            Behavior::Flow(Flow::While),
        ),
        InstructionDef::new(
            "if",
            Statement,
            vec![
                Slot::label("if"),
                Slot::input(SlotKind::Boolean),
                Slot::label("then"),
                Slot::input(SlotKind::Sequence),
            ],
            Behavior::Flow(Flow::If),
        ),
        InstructionDef::new(
            "if-else",
            Statement,
            vec![
                Slot::label("if"),
                Slot::input(SlotKind::Boolean),
                Slot::label("then"),
                Slot::input(SlotKind::Sequence),
                Slot::label("else"),
                Slot::input(SlotKind::Sequence),
            ],
            Behavior::Flow(Flow::IfElse),
        ),
        InstructionDef::new(
            "try",
            Statement,
            vec![
                Slot::label("try to do"),
                Slot::input(SlotKind::Sequence),
                Slot::label("except on error"),
                Slot::input(SlotKind::Sequence),
            ],
            Behavior::Flow(Flow::Try),
        ),
        InstructionDef::new(
            "break",
            Cap,
            vec![Slot::label("stop the current loop")],
            Behavior::Flow(Flow::Break),
        ),
        InstructionDef::new(
            "continue",
            Cap,
            vec![Slot::label("skip to next iteration")],
            Behavior::Flow(Flow::Continue),
        ),
        InstructionDef::new(
            "quit",
            Cap,
            vec![Slot::label("quit the program")],
            Behavior::Flow(Flow::Quit),
        ),
    ]
}
