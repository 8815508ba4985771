//! Operand checks and the scalar semantics of arithmetic and comparison.

use ownir_core::{ArithOp, Binding, BindingKind, CmpKind, RawKind, RawValue, Register};

use crate::RuntimeError;

fn mismatch(register: &Register, expected: &'static str, found: &'static str) -> RuntimeError {
    RuntimeError::TypeMismatch { register: register.clone(), expected, found }
}

pub fn require_defined<'a>(
    register: &Register,
    binding: Option<&'a Binding>,
) -> Result<&'a Binding, RuntimeError> {
    binding.ok_or_else(|| RuntimeError::UndefinedRegister { register: register.clone() })
}

pub fn require_value(register: &Register, binding: &Binding) -> Result<RawValue, RuntimeError> {
    match binding {
        Binding::Value(it) => Ok(*it),
        Binding::Reference(_) => {
            Err(mismatch(register, BindingKind::Value.name(), BindingKind::Reference.name()))
        }
    }
}

/// The scalar in `binding`, which must be of `expected` kind.
fn require_kind<T>(
    register: &Register,
    binding: &Binding,
    expected: RawKind,
    extract: impl FnOnce(RawValue) -> Option<T>,
) -> Result<T, RuntimeError> {
    match binding {
        Binding::Value(value) => extract(*value)
            .ok_or_else(|| mismatch(register, expected.name(), value.kind().name())),
        Binding::Reference(_) => {
            Err(mismatch(register, expected.name(), BindingKind::Reference.name()))
        }
    }
}

pub fn require_number(register: &Register, binding: &Binding) -> Result<f64, RuntimeError> {
    require_kind(register, binding, RawKind::Number, RawValue::as_number)
}

pub fn require_boolean(register: &Register, binding: &Binding) -> Result<bool, RuntimeError> {
    require_kind(register, binding, RawKind::Bool, RawValue::as_bool)
}

/// Host `f64` arithmetic: division by zero yields an infinity or `NaN`, never an error.
#[must_use]
pub fn arith(op: ArithOp, lhs: f64, rhs: f64) -> f64 {
    match op {
        ArithOp::Add => lhs + rhs,
        ArithOp::Subtract => lhs - rhs,
        ArithOp::Multiply => lhs * rhs,
        ArithOp::Divide => lhs / rhs,
        ArithOp::Remainder => lhs % rhs,
    }
}

/// Payload equality. Values of different kinds are unequal.
#[must_use]
pub fn compare(kind: CmpKind, lhs: RawValue, rhs: RawValue) -> bool {
    match kind {
        CmpKind::Equal => lhs == rhs,
        CmpKind::Unequal => lhs != rhs,
    }
}
