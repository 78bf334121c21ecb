//! Execution context
//!
//! Mutable state scoped to one program run: the global variable store, the
//! output log, the delay countdown and the input request/supply slots. The
//! context is owned by the run and handed to every step by reference.

use super::errors::Fault;
use super::types::Val;
use std::collections::HashMap;

/// Host ticks per second
pub const TICK_RATE: f64 = 60.0;

/// Seconds consumed by one host tick
pub const TICK_SECONDS: f64 = 1.0 / TICK_RATE;

#[derive(Debug, Clone, Default)]
pub struct Context {
    variables: HashMap<String, Val>,
    output: Vec<String>,
    timer: f64,
    input_request: Option<String>,
    input_supply: Option<String>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /* ===================== Variables ===================== */

    pub fn read(&self, name: &str) -> Result<Val, Fault> {
        self.variables
            .get(name)
            .cloned()
            .ok_or_else(|| Fault::UndefinedVariable(name.to_string()))
    }

    pub fn write(&mut self, name: &str, value: Val) {
        self.variables.insert(name.to_string(), value);
    }

    pub fn variables(&self) -> &HashMap<String, Val> {
        &self.variables
    }

    /* ===================== Output ===================== */

    pub fn emit(&mut self, text: impl Into<String>) {
        self.output.push(text.into());
    }

    pub fn output(&self) -> &[String] {
        &self.output
    }

    /* ===================== Delay ===================== */

    pub fn start_delay(&mut self, seconds: f64) {
        self.timer = seconds.max(0.0);
    }

    /// Consume one tick of the active delay
    pub fn tick_delay(&mut self) {
        self.timer = (self.timer - TICK_SECONDS).max(0.0);
    }

    pub fn clear_delay(&mut self) {
        self.timer = 0.0;
    }

    /// Seconds remaining on the active delay, 0 when idle
    pub fn timer(&self) -> f64 {
        self.timer
    }

    /* ===================== Input ===================== */

    /// Ask for a line of input
    ///
    /// Returns the supplied value if one is waiting. Otherwise records the
    /// prompt as the pending request and returns `None`; the caller suspends
    /// until the host calls `supply_input`.
    pub fn request_input(&mut self, prompt: &str) -> Option<String> {
        match self.input_supply.take() {
            Some(value) => {
                self.input_request = None;
                Some(value)
            }
            None => {
                self.input_request = Some(prompt.to_string());
                None
            }
        }
    }

    /// Deposit a value for the pending (or next) input request
    pub fn supply_input(&mut self, value: impl Into<String>) {
        self.input_supply = Some(value.into());
    }

    /// Prompt of the request currently waiting for a value
    pub fn pending_prompt(&self) -> Option<&str> {
        if self.input_supply.is_some() {
            return None;
        }
        self.input_request.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_before_write_is_undefined() {
        let ctx = Context::new();
        assert_eq!(
            ctx.read("x"),
            Err(Fault::UndefinedVariable("x".to_string()))
        );
    }

    #[test]
    fn test_write_is_upsert() {
        let mut ctx = Context::new();
        ctx.write("x", Val::Number(1.0));
        ctx.write("x", Val::from("two"));
        assert_eq!(ctx.read("x"), Ok(Val::from("two")));
    }

    #[test]
    fn test_input_request_then_supply() {
        let mut ctx = Context::new();
        assert_eq!(ctx.request_input("name? "), None);
        assert_eq!(ctx.pending_prompt(), Some("name? "));

        ctx.supply_input("Ada");
        assert_eq!(ctx.pending_prompt(), None);
        assert_eq!(ctx.request_input("name? "), Some("Ada".to_string()));
        assert_eq!(ctx.pending_prompt(), None);
    }

    #[test]
    fn test_delay_countdown_never_negative() {
        let mut ctx = Context::new();
        ctx.start_delay(TICK_SECONDS / 2.0);
        ctx.tick_delay();
        assert_eq!(ctx.timer(), 0.0);
    }
}
