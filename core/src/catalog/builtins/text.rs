//! Text category

use super::{arg, arg_num, arg_text, Val};
use crate::catalog::{DataType, InstructionDef, Slot, SlotKind};
use crate::interpreter::{Context, Fault};

const SAMPLE: &str = "Hello world!";

pub(super) fn definitions() -> Vec<InstructionDef> {
    use SlotKind::{Input, Number, Text};

    vec![
        InstructionDef::reporter(
            "join",
            DataType::Text,
            vec![
                Slot::label("join"),
                Slot::input_with(Text, "Hello "),
                Slot::label("with"),
                Slot::input_with(Text, "world!"),
            ],
            join,
        ),
        InstructionDef::reporter(
            "parse-text",
            DataType::Text,
            vec![
                Slot::label("turn"),
                Slot::input_with(Input, 21.0),
                Slot::label("into text"),
            ],
            parse_text,
        ),
        InstructionDef::reporter(
            "char-at",
            DataType::Text,
            vec![
                Slot::label("character"),
                Slot::input_with(Number, 1.0),
                Slot::label("of"),
                Slot::input_with(Text, SAMPLE),
            ],
            char_at,
        ),
        InstructionDef::reporter(
            "str-len",
            DataType::Number,
            vec![Slot::label("length of"), Slot::input_with(Text, SAMPLE)],
            length,
        ),
        InstructionDef::reporter(
            "str-in",
            DataType::Boolean,
            vec![
                Slot::input_with(Text, SAMPLE),
                Slot::label("contains"),
                Slot::input_with(Text, "world"),
            ],
            contains,
        ),
        InstructionDef::reporter(
            "startswith",
            DataType::Boolean,
            vec![
                Slot::input_with(Text, SAMPLE),
                Slot::label("starts with"),
                Slot::input_with(Text, "H"),
            ],
            starts_with,
        ),
        InstructionDef::reporter(
            "endswith",
            DataType::Boolean,
            vec![
                Slot::input_with(Text, SAMPLE),
                Slot::label("ends with"),
                Slot::input_with(Text, "!"),
            ],
            ends_with,
        ),
        InstructionDef::reporter(
            "str-remove",
            DataType::Text,
            vec![
                Slot::label("remove all"),
                Slot::input_with(Text, "o"),
                Slot::label("from"),
                Slot::input_with(Text, SAMPLE),
            ],
            remove,
        ),
        InstructionDef::reporter(
            "str-replace",
            DataType::Text,
            vec![
                Slot::label("replace all"),
                Slot::input_with(Text, "o"),
                Slot::label("with"),
                Slot::input_with(Text, "a"),
                Slot::label("of"),
                Slot::input_with(Text, SAMPLE),
            ],
            replace,
        ),
    ]
}

fn join(args: &[Val], _ctx: &mut Context) -> Result<Val, Fault> {
    Ok(Val::Text(arg_text(args, 0) + &arg_text(args, 1)))
}

fn parse_text(args: &[Val], _ctx: &mut Context) -> Result<Val, Fault> {
    Ok(Val::Text(arg(args, 0).to_text()))
}

/// 1-based character index
fn char_at(args: &[Val], _ctx: &mut Context) -> Result<Val, Fault> {
    let index = arg_num(args, 0)?.trunc();
    let text = arg_text(args, 1);
    let found = if index >= 1.0 {
        text.chars().nth(index as usize - 1)
    } else {
        None
    };
    found
        .map(|c| Val::Text(c.to_string()))
        .ok_or_else(|| Fault::instruction(format!("character {} is out of range", index)))
}

fn length(args: &[Val], _ctx: &mut Context) -> Result<Val, Fault> {
    Ok(Val::Number(arg_text(args, 0).chars().count() as f64))
}

fn contains(args: &[Val], _ctx: &mut Context) -> Result<Val, Fault> {
    Ok(Val::Boolean(arg_text(args, 0).contains(&arg_text(args, 1))))
}

fn starts_with(args: &[Val], _ctx: &mut Context) -> Result<Val, Fault> {
    Ok(Val::Boolean(arg_text(args, 0).starts_with(&arg_text(args, 1))))
}

fn ends_with(args: &[Val], _ctx: &mut Context) -> Result<Val, Fault> {
    Ok(Val::Boolean(arg_text(args, 0).ends_with(&arg_text(args, 1))))
}

fn remove(args: &[Val], _ctx: &mut Context) -> Result<Val, Fault> {
    Ok(Val::Text(arg_text(args, 1).replace(&arg_text(args, 0), "")))
}

fn replace(args: &[Val], _ctx: &mut Context) -> Result<Val, Fault> {
    let (from, to) = (arg_text(args, 0), arg_text(args, 1));
    Ok(Val::Text(arg_text(args, 2).replace(&from, &to)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_at_is_one_based() {
        let mut ctx = Context::new();
        let args = vec![Val::Number(1.0), Val::from("héllo")];
        assert_eq!(char_at(&args, &mut ctx), Ok(Val::from("h")));

        let args = vec![Val::Number(2.0), Val::from("héllo")];
        assert_eq!(char_at(&args, &mut ctx), Ok(Val::from("é")));

        let args = vec![Val::Number(0.0), Val::from("abc")];
        assert!(char_at(&args, &mut ctx).is_err());
        let args = vec![Val::Number(4.0), Val::from("abc")];
        assert!(char_at(&args, &mut ctx).is_err());
    }

    #[test]
    fn test_length_counts_characters() {
        let mut ctx = Context::new();
        assert_eq!(length(&[Val::from("héllo")], &mut ctx), Ok(Val::Number(5.0)));
        assert_eq!(length(&[Val::from("")], &mut ctx), Ok(Val::Number(0.0)));
        assert_eq!(length(&[Val::Number(12.5)], &mut ctx), Ok(Val::Number(4.0)));
    }

    #[test]
    fn test_remove_and_replace() {
        let mut ctx = Context::new();
        let args = vec![Val::from("o"), Val::from(SAMPLE)];
        assert_eq!(remove(&args, &mut ctx), Ok(Val::from("Hell wrld!")));

        let args = vec![Val::from("o"), Val::from("a"), Val::from(SAMPLE)];
        assert_eq!(replace(&args, &mut ctx), Ok(Val::from("Hella warld!")));
    }
}
