#![forbid(unsafe_code)]
#![allow(clippy::match_bool)]
#![warn(clippy::must_use_candidate, clippy::clone_on_copy)]

//! The instruction and value model shared by every `ownir` crate.
//!
//! Registers live in frame scope, labels live in program scope. Nothing in
//! here executes anything; see `ownir-interp` for that.

#[cfg(feature = "disassemble")]
pub mod disassemble;
pub mod instruction;
mod program;
pub mod register;
mod value;


pub use instruction::{ArithOp, CmpKind, Incoming, Instruction, Phi};
pub use program::Program;
pub use register::{Label, ParseNameError, Register};
pub use value::{Binding, BindingKind, RawKind, RawValue};
