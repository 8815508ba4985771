use fnv::FnvHashMap;
use ownir_core::{Binding, Label, Register};

use crate::{RuntimeError, ops};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Retired {
    Moved,
    Dropped,
}

/// Where a `Return` resumes: the `Call` line, its block, and the caller register receiving the
/// result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReturnSite {
    pub pc: usize,
    pub block: Label,
    pub dest: Register,
}

/// One call activation.
///
/// Registers that were moved or dropped are remembered, so that a later read can say which of
/// the two happened.
#[derive(Debug, Default)]
pub(crate) struct Frame {
    registers: FnvHashMap<Register, Binding>,
    retired: FnvHashMap<Register, Retired>,
    return_site: Option<ReturnSite>,
}

impl Frame {
    pub(crate) fn root() -> Self {
        Self::default()
    }

    pub(crate) fn callee(return_site: ReturnSite) -> Self {
        Self { return_site: Some(return_site), ..Self::default() }
    }

    pub(crate) fn return_site(&self) -> Option<&ReturnSite> {
        self.return_site.as_ref()
    }

    fn dead(&self, register: &Register) -> RuntimeError {
        let register = register.clone();
        match self.retired.get(&register) {
            Some(Retired::Moved) => RuntimeError::UseAfterMove { register },
            Some(Retired::Dropped) => RuntimeError::UseAfterDrop { register },
            None => RuntimeError::UndefinedRegister { register },
        }
    }

    pub(crate) fn get(&self, register: &Register) -> Result<&Binding, RuntimeError> {
        if self.retired.contains_key(register) {
            return Err(self.dead(register));
        }

        ops::require_defined(register, self.registers.get(register))
    }

    /// Binds `register`, overwriting whatever an earlier trip around a loop left behind.
    pub(crate) fn set(&mut self, register: Register, binding: Binding) {
        self.retired.remove(&register);
        self.registers.insert(register, binding);
    }

    pub(crate) fn take(&mut self, register: &Register) -> Result<Binding, RuntimeError> {
        let binding = self.registers.remove(register).ok_or_else(|| self.dead(register))?;
        self.retired.insert(register.clone(), Retired::Moved);
        Ok(binding)
    }

    pub(crate) fn drop(&mut self, register: &Register) -> Result<(), RuntimeError> {
        if self.registers.remove(register).is_none() {
            return Err(match self.retired.get(register) {
                Some(Retired::Dropped) => RuntimeError::DoubleDrop { register: register.clone() },
                _ => self.dead(register),
            });
        }

        self.retired.insert(register.clone(), Retired::Dropped);
        Ok(())
    }

    /// Follows the reference held in `reference`, which must point at `target`.
    pub(crate) fn resolve(
        &self,
        reference: &Register,
        target: &Register,
    ) -> Result<&Binding, RuntimeError> {
        self.registers.get(target).ok_or_else(|| RuntimeError::DanglingReference {
            reference: reference.clone(),
            target: target.clone(),
        })
    }
}
