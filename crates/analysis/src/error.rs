use ownir_core::{Label, Register};

use crate::Edge;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    #[error("line {line}: register {register} is already assigned")]
    DuplicateAssignment { register: Register, line: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    #[error("expected a `block {}` marker at the start of the program", Label::entry())]
    MissingEntry,

    #[error("line {line}: label {label} is already defined")]
    DuplicateLabel { label: Label, line: usize },

    #[error("edge {edge} references unknown label {label}")]
    UnknownLabel { label: Label, edge: Edge },

    #[error("the control-flow graph has no nodes")]
    EmptyGraph,
}
