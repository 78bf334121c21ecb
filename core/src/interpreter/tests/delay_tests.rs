//! Tests for the delay statement

use super::helpers::*;
use crate::interpreter::{tick, Context, Control, Step, VM};

#[test]
fn test_delay_yields_ceil_of_sixty_per_second() {
    for (seconds, expected) in [(0.0, 0), (0.5, 30), (1.0, 60), (2.3, 138)] {
        let seq = program(vec![node("sleep", vec![num(seconds)])]);
        let outcome = run(&seq);

        assert_eq!(outcome.control, Control::None, "sleep {}", seconds);
        assert_eq!(outcome.ticks, expected, "sleep {}", seconds);
        assert_eq!(outcome.ctx.timer(), 0.0);
    }
}

#[test]
fn test_timer_counts_down() {
    let seq = program(vec![node("sleep", vec![num(1.0)])]);
    let mut vm = VM::new(&seq);
    let mut ctx = Context::new();

    assert_eq!(tick(&mut vm, &mut ctx), Step::Yield);
    let after_one = ctx.timer();
    assert!((after_one - (1.0 - 1.0 / 60.0)).abs() < 1e-9);

    for _ in 0..29 {
        tick(&mut vm, &mut ctx);
    }
    assert!((ctx.timer() - 0.5).abs() < 1e-9);
}

#[test]
fn test_negative_delay_does_not_wait() {
    let seq = program(vec![node("sleep", vec![num(-2.0)]), say(text("go"))]);
    let outcome = run(&seq);
    assert_eq!(outcome.output(), vec!["go"]);
    assert_eq!(outcome.ticks, 1);
}

#[test]
fn test_delay_duration_from_reporter() {
    // wait (1 / 4) seconds
    let seq = program(vec![node(
        "sleep",
        vec![reporter("/", vec![num(1.0), num(4.0)])],
    )]);
    assert_eq!(run(&seq).ticks, 15);
}
