//! Tests for repeat, while and for-each, including break and continue

use super::helpers::*;
use crate::interpreter::types::Val;
use crate::interpreter::{run_for, Context, Control, Fault, Step, VM};
use maplit::hashmap;

#[test]
fn test_break_on_first_iteration_runs_once() {
    let once = program(vec![
        node("set", vec![var("x"), num(0.0)]),
        node(
            "repeat",
            vec![
                num(1.0),
                body(vec![
                    node("increment", vec![var("x"), num(1.0)]),
                    say(get("x")),
                ]),
            ],
        ),
    ]);
    let reference = run(&once);
    assert_eq!(reference.control, Control::None);
    assert_eq!(reference.output(), vec!["1"]);

    for n in [1.0, 5.0, 100.0] {
        let seq = program(vec![
            node("set", vec![var("x"), num(0.0)]),
            node(
                "repeat",
                vec![
                    num(n),
                    body(vec![
                        node("increment", vec![var("x"), num(1.0)]),
                        say(get("x")),
                        node("break", vec![]),
                    ]),
                ],
            ),
        ]);
        let outcome = run(&seq);

        assert_eq!(outcome.control, Control::None, "repeat {}", n);
        assert_eq!(outcome.output(), reference.output(), "repeat {}", n);
        assert_eq!(outcome.ctx.variables(), reference.ctx.variables());
    }
}

#[test]
fn test_continue_skips_rest_of_iteration_only() {
    // set x to 0; repeat 3 { increment x; if x = 2 { continue }; say x }
    let seq = program(vec![
        node("set", vec![var("x"), num(0.0)]),
        node(
            "repeat",
            vec![
                num(3.0),
                body(vec![
                    node("increment", vec![var("x"), num(1.0)]),
                    node(
                        "if",
                        vec![
                            reporter("=", vec![get("x"), num(2.0)]),
                            body(vec![node("continue", vec![])]),
                        ],
                    ),
                    say(get("x")),
                ]),
            ],
        ),
    ]);

    let outcome = run(&seq);
    assert_eq!(outcome.control, Control::None);
    assert_eq!(outcome.output(), vec!["1", "3"]);
    assert_eq!(
        outcome.ctx.variables(),
        &hashmap! { "x".to_string() => Val::Number(3.0) }
    );
}

#[test]
fn test_break_leaves_only_innermost_loop() {
    // repeat 2 { repeat 5 { say "in"; break }; say "out" }
    let seq = program(vec![node(
        "repeat",
        vec![
            num(2.0),
            body(vec![
                node(
                    "repeat",
                    vec![
                        num(5.0),
                        body(vec![say(text("in")), node("break", vec![])]),
                    ],
                ),
                say(text("out")),
            ]),
        ],
    )]);
    assert_eq!(run(&seq).output(), vec!["in", "out", "in", "out"]);
}

#[test]
fn test_break_passes_through_try() {
    let seq = program(vec![
        node("set", vec![var("x"), num(0.0)]),
        node(
            "repeat",
            vec![
                num(5.0),
                body(vec![
                    node("increment", vec![var("x"), num(1.0)]),
                    node(
                        "try",
                        vec![
                            body(vec![node("break", vec![])]),
                            body(vec![say(text("caught"))]),
                        ],
                    ),
                ]),
            ],
        ),
        say(get("x")),
    ]);

    let outcome = run(&seq);
    assert_eq!(outcome.control, Control::None);
    assert_eq!(outcome.output(), vec!["1"]);
}

#[test]
fn test_break_outside_loop_halts() {
    let seq = program(vec![say(text("a")), node("break", vec![]), say(text("b"))]);
    let outcome = run(&seq);
    assert_eq!(outcome.control, Control::Halt);
    assert_eq!(outcome.output(), vec!["a"]);
}

#[test]
fn test_repeat_count_edge_cases() {
    for (count, expected) in [(0.0, 0), (-4.0, 0), (2.9, 2)] {
        let seq = program(vec![node(
            "repeat",
            vec![num(count), body(vec![say(text("x"))])],
        )]);
        assert_eq!(run(&seq).output().len(), expected, "repeat {}", count);
    }
}

#[test]
fn test_while_counts_up() {
    // set i to 0; while i < 3 { increment i }; say i
    let seq = program(vec![
        node("set", vec![var("i"), num(0.0)]),
        node(
            "while",
            vec![
                reporter("<", vec![get("i"), num(3.0)]),
                body(vec![node("increment", vec![var("i"), num(1.0)])]),
            ],
        ),
        say(get("i")),
    ]);
    assert_eq!(run(&seq).output(), vec!["3"]);
}

#[test]
fn test_while_false_never_enters() {
    let seq = program(vec![
        node("while", vec![boolean(false), body(vec![say(text("never"))])]),
        say(text("after")),
    ]);
    let outcome = run(&seq);
    assert_eq!(outcome.output(), vec!["after"]);
    assert_eq!(outcome.ticks, 1);
}

#[test]
fn test_empty_loop_yields_every_iteration() {
    // while true {} must hand control back on every tick
    let seq = program(vec![node("while", vec![boolean(true), body(vec![])])]);
    let mut vm = VM::new(&seq);
    let mut ctx = Context::new();

    assert_eq!(run_for(&mut vm, &mut ctx, 10), Step::Yield);
    assert_eq!(vm.ticks, 10);
    assert!(!vm.is_done());
}

#[test]
fn test_for_each_visits_characters() {
    let seq = program(vec![
        node("set", vec![var("word"), text("abc")]),
        node(
            "for",
            vec![var("c"), var("word"), body(vec![say(get("c"))])],
        ),
    ]);

    let outcome = run(&seq);
    assert_eq!(outcome.control, Control::None);
    assert_eq!(outcome.output(), vec!["a", "b", "c"]);
    assert_eq!(outcome.ctx.read("c"), Ok(Val::from("c")));
}

#[test]
fn test_for_each_over_number_faults() {
    let seq = program(vec![
        node("set", vec![var("n"), num(5.0)]),
        node("for", vec![var("c"), var("n"), body(vec![])]),
    ]);
    assert!(matches!(
        run(&seq).control,
        Control::Throw(Fault::Instruction(_))
    ));
}
