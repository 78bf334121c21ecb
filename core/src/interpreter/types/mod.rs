//! Type definitions for the executor
//!
//! This module contains the core types used by the executor:
//! - Runtime values (Val)
//! - Control flow (Control, Frame, FrameKind)
//! - Execution phases for each frame kind

pub mod control;
pub mod phase;
pub mod values;

// Re-export all types for convenient access
pub use control::{Control, Frame, FrameKind, Iteration};
pub use phase::*;
pub use values::{format_number, Val};
