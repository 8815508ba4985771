use core::fmt;

use crate::Register;

/// A scalar.
///
/// Equality follows the payload: values of different kinds are never equal, and `NaN` is unequal
/// to itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawValue {
    Bool(bool),
    Number(f64),
}

impl RawValue {
    #[must_use]
    pub const fn kind(self) -> RawKind {
        match self {
            Self::Bool(_) => RawKind::Bool,
            Self::Number(_) => RawKind::Number,
        }
    }

    #[must_use]
    pub const fn as_number(self) -> Option<f64> {
        match self {
            Self::Number(it) => Some(it),
            Self::Bool(_) => None,
        }
    }

    #[must_use]
    pub const fn as_bool(self) -> Option<bool> {
        match self {
            Self::Bool(it) => Some(it),
            Self::Number(_) => None,
        }
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for RawValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(it) => fmt::Display::fmt(it, f),
            Self::Number(it) => fmt::Display::fmt(it, f),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawKind {
    Bool,
    Number,
}

impl RawKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "boolean",
            Self::Number => "number",
        }
    }
}

impl fmt::Display for RawKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a register holds: either a scalar, or a non-owning reference to another register in the
/// same frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    Value(RawValue),
    Reference(Register),
}

impl Binding {
    #[must_use]
    pub const fn kind(&self) -> BindingKind {
        match self {
            Self::Value(_) => BindingKind::Value,
            Self::Reference(_) => BindingKind::Reference,
        }
    }
}

impl From<RawValue> for Binding {
    fn from(value: RawValue) -> Self {
        Self::Value(value)
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(it) => fmt::Display::fmt(it, f),
            Self::Reference(target) => write!(f, "&{target}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    Value,
    Reference,
}

impl BindingKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Value => "value",
            Self::Reference => "reference",
        }
    }
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
