//! Number category

use super::{arg_num, arg_text, Val};
use crate::catalog::{DataType, InstructionDef, ReporterFn, Slot, SlotKind};
use crate::interpreter::{Context, Fault};
use rand::Rng;

pub(super) fn definitions() -> Vec<InstructionDef> {
    use SlotKind::{Number, Text};

    let binary = |id: &'static str, op: &'static str, f: ReporterFn| {
        InstructionDef::reporter(
            id,
            DataType::Number,
            vec![Slot::input(Number), Slot::label(op), Slot::input(Number)],
            f,
        )
    };
    let unary = |id: &'static str, label: &'static str, f: ReporterFn| {
        InstructionDef::reporter(
            id,
            DataType::Number,
            vec![Slot::label(label), Slot::input(Number)],
            f,
        )
    };

    vec![
        binary("+", "+", add),
        binary("-", "-", sub),
        binary("*", "×", mul),
        binary("/", "÷", div),
        binary("^", "^", pow),
        binary("%", "mod", modulo),
        InstructionDef::reporter(
            "rand",
            DataType::Number,
            vec![
                Slot::label("random number between"),
                Slot::input_with(Number, 1.0),
                Slot::label("and"),
                Slot::input_with(Number, 10.0),
            ],
            random,
        ),
        InstructionDef::reporter(
            "parse-number",
            DataType::Number,
            vec![
                Slot::label("parse"),
                Slot::input_with(Text, "-17.25"),
                Slot::label("as a number"),
            ],
            parse_number,
        ),
        InstructionDef::reporter(
            "convert-base",
            DataType::Number,
            vec![
                Slot::label("convert"),
                Slot::input_with(Text, "2A"),
                Slot::label("from base"),
                Slot::input_with(Number, 16.0),
            ],
            convert_base,
        ),
        unary("round", "round", round),
        unary("floor", "round down", floor),
        unary("ceil", "round up", ceil),
        unary("pos", "positive of", pos),
        unary("neg", "negative of", neg),
        InstructionDef::reporter(
            "root",
            DataType::Number,
            vec![
                Slot::input_with(Number, 2.0),
                Slot::label("th root of"),
                Slot::input(Number),
            ],
            root,
        ),
        InstructionDef::reporter(
            "log",
            DataType::Number,
            vec![
                Slot::label("log base"),
                Slot::input_with(Number, 10.0),
                Slot::label("of"),
                Slot::input(Number),
            ],
            log,
        ),
    ]
}

fn checked(n: f64) -> Result<Val, Fault> {
    if n.is_nan() {
        return Err(Fault::instruction("math domain error"));
    }
    Ok(Val::Number(n))
}

fn add(args: &[Val], _ctx: &mut Context) -> Result<Val, Fault> {
    Ok(Val::Number(arg_num(args, 0)? + arg_num(args, 1)?))
}

fn sub(args: &[Val], _ctx: &mut Context) -> Result<Val, Fault> {
    Ok(Val::Number(arg_num(args, 0)? - arg_num(args, 1)?))
}

fn mul(args: &[Val], _ctx: &mut Context) -> Result<Val, Fault> {
    Ok(Val::Number(arg_num(args, 0)? * arg_num(args, 1)?))
}

fn div(args: &[Val], _ctx: &mut Context) -> Result<Val, Fault> {
    let divisor = arg_num(args, 1)?;
    if divisor == 0.0 {
        return Err(Fault::instruction("division by zero"));
    }
    Ok(Val::Number(arg_num(args, 0)? / divisor))
}

fn pow(args: &[Val], _ctx: &mut Context) -> Result<Val, Fault> {
    let (base, exp) = (arg_num(args, 0)?, arg_num(args, 1)?);
    if base == 0.0 && exp < 0.0 {
        return Err(Fault::instruction("zero cannot be raised to a negative power"));
    }
    checked(base.powf(exp))
}

/// Floored modulo: the result takes the sign of the divisor
fn modulo(args: &[Val], _ctx: &mut Context) -> Result<Val, Fault> {
    let (a, b) = (arg_num(args, 0)?, arg_num(args, 1)?);
    if b == 0.0 {
        return Err(Fault::instruction("modulo by zero"));
    }
    Ok(Val::Number(a - b * (a / b).floor()))
}

fn random(args: &[Val], _ctx: &mut Context) -> Result<Val, Fault> {
    let (low, high) = (arg_num(args, 0)?.trunc(), arg_num(args, 1)?.trunc());
    if !low.is_finite() || !high.is_finite() || low > high {
        return Err(Fault::instruction(format!(
            "empty range for random number ({}, {})",
            low, high
        )));
    }
    let n = rand::thread_rng().gen_range(low as i64..=high as i64);
    Ok(Val::Number(n as f64))
}

fn parse_number(args: &[Val], _ctx: &mut Context) -> Result<Val, Fault> {
    Val::Text(arg_text(args, 0)).to_number().map(Val::Number)
}

fn convert_base(args: &[Val], _ctx: &mut Context) -> Result<Val, Fault> {
    let digits = arg_text(args, 0);
    let base = arg_num(args, 1)?;
    if base.fract() != 0.0 || !(2.0..=36.0).contains(&base) {
        return Err(Fault::instruction("base must be a whole number from 2 to 36"));
    }
    i64::from_str_radix(digits.trim(), base as u32)
        .map(|n| Val::Number(n as f64))
        .map_err(|_| {
            Fault::instruction(format!(
                "invalid literal for base {}: '{}'",
                base as u32, digits
            ))
        })
}

/// Halves round to the nearest even number
fn round(args: &[Val], _ctx: &mut Context) -> Result<Val, Fault> {
    Ok(Val::Number(arg_num(args, 0)?.round_ties_even()))
}

fn floor(args: &[Val], _ctx: &mut Context) -> Result<Val, Fault> {
    Ok(Val::Number(arg_num(args, 0)?.floor()))
}

fn ceil(args: &[Val], _ctx: &mut Context) -> Result<Val, Fault> {
    Ok(Val::Number(arg_num(args, 0)?.ceil()))
}

fn pos(args: &[Val], _ctx: &mut Context) -> Result<Val, Fault> {
    Ok(Val::Number(arg_num(args, 0)?.abs()))
}

fn neg(args: &[Val], _ctx: &mut Context) -> Result<Val, Fault> {
    Ok(Val::Number(-arg_num(args, 0)?))
}

fn root(args: &[Val], _ctx: &mut Context) -> Result<Val, Fault> {
    let (degree, x) = (arg_num(args, 0)?, arg_num(args, 1)?);
    if degree == 0.0 {
        return Err(Fault::instruction("zeroth root is undefined"));
    }
    checked(x.powf(1.0 / degree))
}

fn log(args: &[Val], _ctx: &mut Context) -> Result<Val, Fault> {
    let (base, x) = (arg_num(args, 0)?, arg_num(args, 1)?);
    if x <= 0.0 || base <= 0.0 || base == 1.0 {
        return Err(Fault::instruction("math domain error"));
    }
    checked(x.ln() / base.ln())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(f: ReporterFn, args: &[f64]) -> Result<Val, Fault> {
        let args: Vec<Val> = args.iter().map(|&n| Val::Number(n)).collect();
        f(&args, &mut Context::new())
    }

    #[test]
    fn test_division_by_zero_faults() {
        assert_eq!(call(div, &[1.0, 0.0]), Err(Fault::instruction("division by zero")));
        assert_eq!(call(div, &[9.0, 3.0]), Ok(Val::Number(3.0)));
    }

    #[test]
    fn test_modulo_takes_divisor_sign() {
        assert_eq!(call(modulo, &[-7.0, 3.0]), Ok(Val::Number(2.0)));
        assert_eq!(call(modulo, &[7.0, -3.0]), Ok(Val::Number(-2.0)));
        assert!(call(modulo, &[1.0, 0.0]).is_err());
    }

    #[test]
    fn test_round_half_to_even() {
        assert_eq!(call(round, &[2.5]), Ok(Val::Number(2.0)));
        assert_eq!(call(round, &[3.5]), Ok(Val::Number(4.0)));
        assert_eq!(call(round, &[-1.6]), Ok(Val::Number(-2.0)));
    }

    #[test]
    fn test_parse_number() {
        let mut ctx = Context::new();
        assert_eq!(parse_number(&[Val::from(" -17.25 ")], &mut ctx), Ok(Val::Number(-17.25)));
        assert_eq!(parse_number(&[Val::Number(4.0)], &mut ctx), Ok(Val::Number(4.0)));
        let err = parse_number(&[Val::from("twelve")], &mut ctx).unwrap_err();
        assert!(matches!(err, Fault::TypeCoercion { .. }));
    }

    #[test]
    fn test_root_and_log() {
        assert_eq!(call(root, &[2.0, 9.0]), Ok(Val::Number(3.0)));
        assert!(call(root, &[2.0, -4.0]).is_err());
        assert_eq!(call(log, &[2.0, 8.0]), Ok(Val::Number(3.0)));
        assert!(call(log, &[1.0, 8.0]).is_err());
    }

    #[test]
    fn test_random_stays_in_range() {
        for _ in 0..50 {
            let Ok(Val::Number(n)) = call(random, &[3.0, 5.0]) else {
                unreachable!("rand should report a number");
            };
            assert!((3.0..=5.0).contains(&n));
        }
        assert!(call(random, &[5.0, 3.0]).is_err());
    }

    #[test]
    fn test_convert_base() {
        let args = vec![Val::from("2A"), Val::Number(16.0)];
        assert_eq!(convert_base(&args, &mut Context::new()), Ok(Val::Number(42.0)));

        let args = vec![Val::from("2A"), Val::Number(2.0)];
        assert!(convert_base(&args, &mut Context::new()).is_err());
    }
}
