//! End-to-end programs

use super::helpers::*;
use crate::interpreter::types::Val;
use crate::interpreter::Control;
use maplit::hashmap;

#[test]
fn test_counter_loop_prints_three() {
    // start; set x to 0; repeat 3 { increment x }; say x
    let seq = program(vec![
        node("start", vec![]),
        node("set", vec![var("x"), num(0.0)]),
        node(
            "repeat",
            vec![num(3.0), body(vec![node("increment", vec![var("x"), num(1.0)])])],
        ),
        say(get("x")),
    ]);

    let outcome = run(&seq);

    assert_eq!(outcome.control, Control::None);
    assert_eq!(outcome.output(), vec!["3"]);
    assert_eq!(
        outcome.ctx.variables(),
        &hashmap! { "x".to_string() => Val::Number(3.0) }
    );
    // start, set, three increments, say
    assert_eq!(outcome.ticks, 6);
}

#[test]
fn test_try_recovers_division_by_zero() {
    let seq = program(vec![
        node("start", vec![]),
        node(
            "try",
            vec![
                body(vec![say(reporter("/", vec![num(1.0), num(0.0)]))]),
                body(vec![say(text("error"))]),
            ],
        ),
    ]);

    let outcome = run(&seq);

    assert_eq!(outcome.control, Control::None);
    assert_eq!(outcome.output(), vec!["error"]);
}

#[test]
fn test_if_else_picks_branch() {
    let branch = |cond: bool| {
        node(
            "if-else",
            vec![
                boolean(cond),
                body(vec![say(text("yes"))]),
                body(vec![say(text("no"))]),
            ],
        )
    };
    let seq = program(vec![branch(true), branch(false)]);

    let outcome = run(&seq);
    assert_eq!(outcome.output(), vec!["yes", "no"]);
    // branches yield nothing of their own
    assert_eq!(outcome.ticks, 2);
}

#[test]
fn test_if_without_match_skips_body() {
    let seq = program(vec![
        node("if", vec![boolean(false), body(vec![say(text("hidden"))])]),
        say(text("after")),
    ]);
    assert_eq!(run(&seq).output(), vec!["after"]);
}

#[test]
fn test_nested_reporters_and_text() {
    // say join("n=", 2 ^ 10)
    let seq = program(vec![say(reporter(
        "join",
        vec![text("n="), reporter("^", vec![num(2.0), num(10.0)])],
    ))]);
    assert_eq!(run(&seq).output(), vec!["n=1024"]);
}

#[test]
fn test_quit_halts_the_run() {
    let seq = program(vec![
        say(text("a")),
        node("quit", vec![]),
        say(text("b")),
    ]);

    let outcome = run(&seq);
    assert_eq!(outcome.control, Control::Halt);
    assert_eq!(outcome.output(), vec!["a"]);
}

#[test]
fn test_bare_reporter_statement_is_evaluated() {
    let seq = program(vec![node("+", vec![num(1.0), num(2.0)]), say(text("done"))]);
    let outcome = run(&seq);
    assert_eq!(outcome.control, Control::None);
    assert_eq!(outcome.output(), vec!["done"]);
    assert_eq!(outcome.ticks, 2);
}
