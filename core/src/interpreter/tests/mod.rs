//! Tests for the interpreter
//!
//! Organized by feature area

mod delay_tests;
mod helpers;
mod loop_tests;
mod scenario_tests;
