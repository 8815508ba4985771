#![forbid(unsafe_code)]
#![allow(clippy::match_bool)]
#![warn(clippy::must_use_candidate, clippy::clone_on_copy)]

//! Executes a verified, analyzed [`Program`](ownir_core::Program) to a single scalar.
//!
//! Ownership (`Ref`/`Deref`/`Move`/`Drop`) is checked at the moment of use, never ahead of time.

mod error;
mod frame;
mod interpreter;
pub mod ops;
mod state;

#[cfg(test)]
mod tests;

pub use error::{Fault, RuntimeError};
pub use interpreter::Interpreter;
