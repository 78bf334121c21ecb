//! Runtime faults
//!
//! A fault is any recoverable error raised while a program runs. Faults travel
//! up the frame stack as `Control::Throw` and can be caught by a `try` block;
//! uncaught ones end the run with `RunStatus::Faulted`.

use thiserror::Error;

/* ===================== Error Codes ===================== */

pub const TYPE_ERROR: &str = "TypeError";
pub const UNDEFINED_VARIABLE: &str = "UndefinedVariable";
pub const INSTRUCTION_ERROR: &str = "InstructionError";
pub const IO_ERROR: &str = "IoError";

/* ===================== Fault ===================== */

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Fault {
    /// Slot value could not be coerced to the slot's declared kind
    #[error("cannot convert '{value}' to a {expected}")]
    TypeCoercion {
        value: String,
        expected: &'static str,
    },

    /// Variable read before it was ever written
    #[error("variable '{0}' is not defined")]
    UndefinedVariable(String),

    /// Raised by an instruction's own behavior (division by zero, bad index, ...)
    #[error("{0}")]
    Instruction(String),

    /// File primitives failed against the host filesystem
    #[error("{path}: {message}")]
    Io { path: String, message: String },

    /// A nested-sequence slot held something other than a sequence
    #[error("block '{0}' expected a nested sequence")]
    NotASequence(String),

    /// A non-reporter block was used where a value is needed
    #[error("block '{0}' does not report a value")]
    NotAReporter(String),
}

impl Fault {
    pub fn instruction(message: impl Into<String>) -> Self {
        Fault::Instruction(message.into())
    }

    pub fn io(path: &str, err: &std::io::Error) -> Self {
        Fault::Io {
            path: path.to_string(),
            message: err.to_string(),
        }
    }

    /// Stable code for the fault category
    pub fn code(&self) -> &'static str {
        match self {
            Fault::TypeCoercion { .. } | Fault::NotASequence(_) | Fault::NotAReporter(_) => {
                TYPE_ERROR
            }
            Fault::UndefinedVariable(_) => UNDEFINED_VARIABLE,
            Fault::Instruction(_) => INSTRUCTION_ERROR,
            Fault::Io { .. } => IO_ERROR,
        }
    }
}
