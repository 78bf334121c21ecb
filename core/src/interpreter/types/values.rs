//! Runtime value types

use super::super::errors::Fault;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Runtime value type
///
/// Variables are global and dynamically typed, so every value stored in the
/// context or produced by a reporter is one of these shapes. Serialized
/// untagged so literals in saved programs stay plain JSON scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Val {
    Boolean(bool),
    Number(f64),
    Text(String),
    Nil,
}

impl Val {
    /// Check if value is truthy (for conditionals)
    pub fn is_truthy(&self) -> bool {
        match self {
            Val::Boolean(b) => *b,
            Val::Number(n) => *n != 0.0,
            Val::Text(s) => !s.is_empty(),
            Val::Nil => false,
        }
    }

    /// Text form used by text slots, output and textual comparison
    pub fn to_text(&self) -> String {
        match self {
            Val::Boolean(b) => b.to_string(),
            Val::Number(n) => format_number(*n),
            Val::Text(s) => s.clone(),
            Val::Nil => String::new(),
        }
    }

    /// Numeric form used by number slots
    pub fn to_number(&self) -> Result<f64, Fault> {
        match self {
            Val::Number(n) => Ok(*n),
            Val::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Val::Text(s) => s.trim().parse::<f64>().map_err(|_| Fault::TypeCoercion {
                value: s.clone(),
                expected: "number",
            }),
            Val::Nil => Err(Fault::TypeCoercion {
                value: String::new(),
                expected: "number",
            }),
        }
    }

    /// True for numbers and for text that parses as a number
    pub fn is_numeric(&self) -> bool {
        match self {
            Val::Number(_) => true,
            Val::Text(s) => s.trim().parse::<f64>().is_ok(),
            _ => false,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Val::Boolean(_) => "boolean",
            Val::Number(_) => "number",
            Val::Text(_) => "text",
            Val::Nil => "nil",
        }
    }
}

/// General number format: six significant digits, trailing zeros dropped,
/// exponent form below 1e-4 or from 1e6 up (`0.333333`, `1.23457e+06`).
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "nan".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    // Six significant digits; the exponent is taken after rounding
    let sci = format!("{:.*e}", SIGNIFICANT_DIGITS - 1, n);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);

    if (-4..SIGNIFICANT_DIGITS as i32).contains(&exp) {
        let decimals = (SIGNIFICANT_DIGITS as i32 - 1 - exp) as usize;
        trim_fraction(&format!("{:.*}", decimals, n)).to_string()
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exp.abs())
    }
}

const SIGNIFICANT_DIGITS: usize = 6;

fn trim_fraction(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}

impl fmt::Display for Val {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<f64> for Val {
    fn from(n: f64) -> Self {
        Val::Number(n)
    }
}

impl From<bool> for Val {
    fn from(b: bool) -> Self {
        Val::Boolean(b)
    }
}

impl From<&str> for Val {
    fn from(s: &str) -> Self {
        Val::Text(s.to_string())
    }
}

impl From<String> for Val {
    fn from(s: String) -> Self {
        Val::Text(s)
    }
}
