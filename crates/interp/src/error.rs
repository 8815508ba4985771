use ownir_core::{Label, Register};

fn or_none(label: Option<&Label>) -> String {
    label.map_or_else(|| "none".to_owned(), ToString::to_string)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    #[error("fell through into {label} without a terminator")]
    UnterminatedBlock { label: Label },

    #[error("reached the end of the program without an `exit`")]
    MissingExit,

    #[error("register {register} is not defined in this frame")]
    UndefinedRegister { register: Register },

    #[error("register {register} was used after being moved")]
    UseAfterMove { register: Register },

    #[error("register {register} was used after being dropped")]
    UseAfterDrop { register: Register },

    #[error("register {register} was dropped twice")]
    DoubleDrop { register: Register },

    #[error("`deref` expected {register} to hold a reference, found a value")]
    NotAReference { register: Register },

    #[error("reference {reference} points at {target}, which is no longer live")]
    DanglingReference { reference: Register, target: Register },

    #[error("expected {register} to hold a {expected}, found a {found}")]
    TypeMismatch { register: Register, expected: &'static str, found: &'static str },

    #[error("function {callee} expects {expected} argument(s), got {provided}")]
    ArityMismatch { callee: Label, expected: usize, provided: usize },

    #[error("call to unknown function {callee}")]
    UnknownFunction { callee: Label },

    #[error("cannot call {callee}: it is a block, not a function")]
    NotAFunction { callee: Label },

    #[error("jump to unknown label {label}")]
    UnknownLabel { label: Label },

    #[error(
        "cannot resolve phi over {left} and {right} when the previous block is {}",
        or_none(.previous.as_ref())
    )]
    UnresolvablePhi { previous: Option<Label>, left: Label, right: Label },

    #[error("`return` outside of a function")]
    ReturnOutsideFunction,
}

/// A [`RuntimeError`] and the line it happened on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {error}")]
pub struct Fault {
    pub line: usize,
    #[source]
    pub error: RuntimeError,
}
