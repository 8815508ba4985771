#![forbid(unsafe_code)]
#![warn(clippy::must_use_candidate)]

//! Verifies, analyzes and evaluates `ownir` programs.
//!
//! ```
//! use ownir::{Instruction, Label, Program, RawValue, Register};
//!
//! let program = Program::new(vec![
//!     Instruction::block(Label::entry()),
//!     Instruction::constant(Register::new("0"), 11),
//!     Instruction::exit(Register::new("0")),
//! ]);
//!
//! assert_eq!(ownir::evaluate(&program).unwrap(), RawValue::Number(11.0));
//! ```

use core::fmt;
use std::io;
use std::path::{Path, PathBuf};

pub use ownir_analysis::{Analysis, AnalysisError, VerifyError};
pub use ownir_core::{Binding, Instruction, Label, Program, RawValue, Register};
pub use ownir_decode::{DecodeError, decode};
pub use ownir_interp::{Fault, Interpreter, RuntimeError};


#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {}: {error}", .path.display())]
    Io { path: PathBuf, error: io::Error },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Verify(#[from] VerifyError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Runtime(#[from] Fault),
}

/// Reads and decodes a program from a JSON file.
pub fn load(path: &Path) -> Result<Program, Error> {
    let input = std::fs::read_to_string(path)
        .map_err(|error| Error::Io { path: path.to_owned(), error })?;

    tracing::debug!(path = %path.display(), bytes = input.len(), "loaded program");

    Ok(decode(&input)?)
}

/// Hands `program` back once every register is known to be assigned at most once.
pub fn verify(program: &Program) -> Result<&Program, Error> {
    Ok(ownir_analysis::verify(program)?)
}

pub fn analyze(program: &Program) -> Result<Analysis, Error> {
    Ok(ownir_analysis::analyze(program)?)
}

/// Verifies and analyzes `program`, then runs it to its `Exit`.
pub fn evaluate(program: &Program) -> Result<RawValue, Error> {
    let program = verify(program)?;
    let analysis = analyze(program)?;

    Ok(Interpreter::new(program, &analysis.table).run()?)
}

/// Renders the nodes, edges and reachability sets of an [`Analysis`].
pub struct FmtAnalysis<'a>(&'a Analysis);

impl<'a> FmtAnalysis<'a> {
    #[must_use]
    pub fn new(analysis: &'a Analysis) -> Self {
        Self(analysis)
    }
}

impl fmt::Display for FmtAnalysis<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let analysis = self.0;

        f.write_str("nodes:")?;
        for label in &analysis.nodes {
            write!(f, " {label}")?;
        }
        f.write_str("\n")?;

        f.write_str("edges:\n")?;
        for edge in &analysis.edges {
            writeln!(f, "    {edge}")?;
        }

        f.write_str("reachability:\n")?;
        for label in &analysis.nodes {
            write!(f, "    {label}:")?;
            for reachable in analysis.reachability.reachable_from(label).into_iter().flatten() {
                write!(f, " {reachable}")?;
            }
            f.write_str("\n")?;
        }

        Ok(())
    }
}
