//! Variable category
//!
//! All variables live in the run's single global store.

use super::{arg, arg_num, arg_text, Val};
use crate::catalog::{Behavior, BlockKind, DataType, InstructionDef, Slot, SlotKind};
use crate::interpreter::{Context, Fault};

pub(super) fn definitions() -> Vec<InstructionDef> {
    use SlotKind::{Input, Number, Variable};

    vec![
        InstructionDef::reporter(
            "get-var",
            DataType::Any,
            vec![Slot::label("get"), Slot::input(Variable)],
            get,
        ),
        InstructionDef::new(
            "set",
            BlockKind::Statement,
            vec![
                Slot::label("set variable"),
                Slot::input(Variable),
                Slot::label("to"),
                Slot::input(Input),
            ],
            Behavior::Command(set),
        ),
        InstructionDef::new(
            "increment",
            BlockKind::Statement,
            vec![
                Slot::label("increment"),
                Slot::input(Variable),
                Slot::label("by"),
                Slot::input_with(Number, 1.0),
            ],
            Behavior::Command(increment),
        ),
        InstructionDef::new(
            "decrement",
            BlockKind::Statement,
            vec![
                Slot::label("decrement"),
                Slot::input(Variable),
                Slot::label("by"),
                Slot::input_with(Number, 1.0),
            ],
            Behavior::Command(decrement),
        ),
    ]
}

fn get(args: &[Val], ctx: &mut Context) -> Result<Val, Fault> {
    ctx.read(&arg_text(args, 0))
}

fn set(args: &[Val], ctx: &mut Context) -> Result<(), Fault> {
    ctx.write(&arg_text(args, 0), arg(args, 1).clone());
    Ok(())
}

fn adjust(args: &[Val], ctx: &mut Context, sign: f64) -> Result<(), Fault> {
    let name = arg_text(args, 0);
    let current = ctx.read(&name)?.to_number()?;
    ctx.write(&name, Val::Number(current + sign * arg_num(args, 1)?));
    Ok(())
}

fn increment(args: &[Val], ctx: &mut Context) -> Result<(), Fault> {
    adjust(args, ctx, 1.0)
}

fn decrement(args: &[Val], ctx: &mut Context) -> Result<(), Fault> {
    adjust(args, ctx, -1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decrement_numeric_text() {
        let mut ctx = Context::new();
        ctx.write("n", Val::from("10"));

        decrement(&[Val::from("n"), Val::Number(3.0)], &mut ctx).unwrap();
        assert_eq!(ctx.read("n"), Ok(Val::Number(7.0)));

        increment(&[Val::from("n"), Val::from("0.5")], &mut ctx).unwrap();
        assert_eq!(ctx.read("n"), Ok(Val::Number(7.5)));
    }

    #[test]
    fn test_adjust_needs_a_numeric_variable() {
        let mut ctx = Context::new();
        assert_eq!(
            decrement(&[Val::from("missing"), Val::Number(1.0)], &mut ctx),
            Err(Fault::UndefinedVariable("missing".to_string()))
        );

        ctx.write("word", Val::from("abc"));
        let err = increment(&[Val::from("word"), Val::Number(1.0)], &mut ctx).unwrap_err();
        assert!(matches!(err, Fault::TypeCoercion { .. }));
        assert_eq!(ctx.read("word"), Ok(Val::from("abc")));
    }

    #[test]
    fn test_set_then_get() {
        let mut ctx = Context::new();
        set(&[Val::from("x"), Val::Boolean(true)], &mut ctx).unwrap();
        assert_eq!(get(&[Val::from("x")], &mut ctx), Ok(Val::Boolean(true)));
    }
}
