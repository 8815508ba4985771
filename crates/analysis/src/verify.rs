use fnv::FnvHashSet;
use ownir_core::Program;

use crate::VerifyError;

/// Checks that every register, function parameters included, is assigned at most once.
///
/// The whole program is one namespace: two functions can't share a parameter name either.
pub fn verify(program: &Program) -> Result<&Program, VerifyError> {
    let mut assigned = FnvHashSet::default();

    for (line, instruction) in program.iter().enumerate() {
        let mut duplicate = None;

        instruction.visit_assigned(|register| {
            if duplicate.is_none() && !assigned.insert(register) {
                duplicate = Some(register.clone());
            }
        });

        if let Some(register) = duplicate {
            return Err(VerifyError::DuplicateAssignment { register, line });
        }
    }

    tracing::trace!(registers = assigned.len(), "verified single assignment");

    Ok(program)
}
