//! Boolean category

use super::{arg, Val};
use crate::catalog::{DataType, InstructionDef, Slot, SlotKind};
use crate::interpreter::{Context, Fault};

pub(super) fn definitions() -> Vec<InstructionDef> {
    use SlotKind::{Boolean, Input};

    vec![
        InstructionDef::reporter("bool", DataType::Boolean, vec![Slot::input(Boolean)], truthiness),
        InstructionDef::reporter(
            "not",
            DataType::Boolean,
            vec![Slot::label("not"), Slot::input(Boolean)],
            not,
        ),
        InstructionDef::reporter(
            "and",
            DataType::Boolean,
            vec![Slot::input(Boolean), Slot::label("and"), Slot::input(Boolean)],
            and,
        ),
        InstructionDef::reporter(
            "or",
            DataType::Boolean,
            vec![Slot::input(Boolean), Slot::label("or"), Slot::input(Boolean)],
            or,
        ),
        InstructionDef::reporter(
            "xor",
            DataType::Boolean,
            vec![Slot::input(Boolean), Slot::label("xor"), Slot::input(Boolean)],
            xor,
        ),
        InstructionDef::reporter(
            "convert-bool",
            DataType::Boolean,
            vec![Slot::label("truthiness of"), Slot::input(Input)],
            truthiness,
        ),
    ]
}

fn truthiness(args: &[Val], _ctx: &mut Context) -> Result<Val, Fault> {
    Ok(Val::Boolean(arg(args, 0).is_truthy()))
}

fn not(args: &[Val], _ctx: &mut Context) -> Result<Val, Fault> {
    Ok(Val::Boolean(!arg(args, 0).is_truthy()))
}

fn and(args: &[Val], _ctx: &mut Context) -> Result<Val, Fault> {
    Ok(Val::Boolean(arg(args, 0).is_truthy() && arg(args, 1).is_truthy()))
}

fn or(args: &[Val], _ctx: &mut Context) -> Result<Val, Fault> {
    Ok(Val::Boolean(arg(args, 0).is_truthy() || arg(args, 1).is_truthy()))
}

fn xor(args: &[Val], _ctx: &mut Context) -> Result<Val, Fault> {
    Ok(Val::Boolean(arg(args, 0).is_truthy() ^ arg(args, 1).is_truthy()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ReporterFn;

    fn call(f: ReporterFn, args: &[Val]) -> Val {
        f(args, &mut Context::new()).unwrap()
    }

    #[test]
    fn test_binary_truth_tables() {
        let cases = [(false, false), (false, true), (true, false), (true, true)];
        for (a, b) in cases {
            let args = [Val::Boolean(a), Val::Boolean(b)];
            assert_eq!(call(and, &args), Val::Boolean(a && b), "{} and {}", a, b);
            assert_eq!(call(or, &args), Val::Boolean(a || b), "{} or {}", a, b);
            assert_eq!(call(xor, &args), Val::Boolean(a != b), "{} xor {}", a, b);
        }
    }

    #[test]
    fn test_not() {
        assert_eq!(call(not, &[Val::Boolean(true)]), Val::Boolean(false));
        assert_eq!(call(not, &[Val::Boolean(false)]), Val::Boolean(true));
    }

    #[test]
    fn test_truthiness_of_each_type() {
        let cases = [
            (Val::Number(0.0), false),
            (Val::Number(-2.0), true),
            (Val::from(""), false),
            (Val::from("false"), true),
            (Val::Nil, false),
            (Val::Boolean(true), true),
        ];
        for (value, expected) in cases {
            assert_eq!(
                call(truthiness, &[value.clone()]),
                Val::Boolean(expected),
                "{:?}",
                value
            );
        }
    }
}
