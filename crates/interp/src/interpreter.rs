use ownir_analysis::TableOfContents;
use ownir_core::{Binding, Instruction, Label, Phi, Program, RawValue, Register};

use crate::frame::{Frame, ReturnSite};
use crate::ops;
use crate::state::State;
use crate::{Fault, RuntimeError};

/// What the dispatch loop does after an instruction.
enum Flow {
    Next,
    /// The instruction already moved `pc`.
    Jumped,
    Exit(RawValue),
}

/// Runs one program from `@entry` until an `Exit`.
pub struct Interpreter<'a> {
    program: &'a Program,
    toc: &'a TableOfContents,
    state: State,
}

impl<'a> Interpreter<'a> {
    /// `toc` must be the table of contents of `program`.
    #[must_use]
    pub fn new(program: &'a Program, toc: &'a TableOfContents) -> Self {
        Self { program, toc, state: State::new() }
    }

    pub fn run(mut self) -> Result<RawValue, Fault> {
        let _span = tracing::debug_span!("evaluate", len = self.program.len()).entered();

        let program = self.program;
        loop {
            let pc = self.state.pc;
            let Some(instruction) = program.get(pc) else {
                return Err(Fault { line: pc, error: RuntimeError::MissingExit });
            };

            tracing::trace!(pc, instruction = %instruction);

            match self.step(instruction) {
                Ok(Flow::Next) => self.state.pc += 1,
                Ok(Flow::Jumped) => {}
                Ok(Flow::Exit(value)) => {
                    tracing::debug!(pc, %value, "exit");
                    return Ok(value);
                }
                Err(error) => return Err(Fault { line: pc, error }),
            }
        }
    }

    fn frame(&self) -> &Frame {
        &self.state.frame
    }

    fn read(&self, register: &Register) -> Result<Binding, RuntimeError> {
        self.frame().get(register).cloned()
    }

    fn number(&self, register: &Register) -> Result<f64, RuntimeError> {
        ops::require_number(register, self.frame().get(register)?)
    }

    fn value(&self, register: &Register) -> Result<RawValue, RuntimeError> {
        ops::require_value(register, self.frame().get(register)?)
    }

    fn assign(&mut self, dest: &Register, binding: Binding) -> Flow {
        self.state.frame.set(dest.clone(), binding);
        Flow::Next
    }

    fn step(&mut self, instruction: &Instruction) -> Result<Flow, RuntimeError> {
        let flow = match instruction {
            Instruction::Const { dest, value } => self.assign(dest, Binding::Value(*value)),

            Instruction::Copy { dest, src } => {
                let binding = self.read(src)?;
                self.assign(dest, binding)
            }

            Instruction::Move { dest, src } => {
                let binding = self.state.frame.take(src)?;
                self.assign(dest, binding)
            }

            Instruction::Drop { src } => {
                self.state.frame.drop(src)?;
                Flow::Next
            }

            Instruction::Ref { dest, src } => {
                self.frame().get(src)?;
                self.assign(dest, Binding::Reference(src.clone()))
            }

            Instruction::Deref { dest, src } => {
                let Binding::Reference(target) = self.frame().get(src)? else {
                    return Err(RuntimeError::NotAReference { register: src.clone() });
                };

                let binding = self.frame().resolve(src, target)?.clone();
                self.assign(dest, binding)
            }

            Instruction::Arith { dest, op, lhs, rhs } => {
                let value = ops::arith(*op, self.number(lhs)?, self.number(rhs)?);
                self.assign(dest, Binding::Value(RawValue::Number(value)))
            }

            Instruction::Cmp { dest, kind, lhs, rhs } => {
                let value = ops::compare(*kind, self.value(lhs)?, self.value(rhs)?);
                self.assign(dest, Binding::Value(RawValue::Bool(value)))
            }

            Instruction::Block { label } | Instruction::Function { label, .. } => {
                return Err(RuntimeError::UnterminatedBlock { label: label.clone() });
            }

            Instruction::Jump { target } => {
                self.jump(target)?;
                Flow::Jumped
            }

            Instruction::Branch { then_label, else_label, cond } => {
                let taken = match ops::require_boolean(cond, self.frame().get(cond)?)? {
                    true => then_label,
                    false => else_label,
                };

                self.jump(taken)?;
                Flow::Jumped
            }

            Instruction::Call { dest, callee, args } => {
                self.call(dest, callee, args)?;
                Flow::Jumped
            }

            Instruction::Return { src } => {
                self.ret(src)?;
                Flow::Jumped
            }

            Instruction::Exit { src } => Flow::Exit(self.value(src)?),

            Instruction::Phi(phi) => self.phi(phi)?,
        };

        Ok(flow)
    }

    fn jump(&mut self, target: &Label) -> Result<(), RuntimeError> {
        let pc = self
            .toc
            .entry_pc(target)
            .ok_or_else(|| RuntimeError::UnknownLabel { label: target.clone() })?;

        tracing::debug!(from = %self.state.current_block, to = %target, "jump");

        self.state.enter(target.clone(), pc);
        Ok(())
    }

    fn call(
        &mut self,
        dest: &Register,
        callee: &Label,
        args: &[Register],
    ) -> Result<(), RuntimeError> {
        let program = self.program;
        let interval = self
            .toc
            .lookup(callee)
            .ok_or_else(|| RuntimeError::UnknownFunction { callee: callee.clone() })?;

        let Some(Instruction::Function { params, .. }) = program.get(interval.begin) else {
            return Err(RuntimeError::NotAFunction { callee: callee.clone() });
        };

        if params.len() != args.len() {
            return Err(RuntimeError::ArityMismatch {
                callee: callee.clone(),
                expected: params.len(),
                provided: args.len(),
            });
        }

        let site = ReturnSite {
            pc: self.state.pc,
            block: self.state.current_block.clone(),
            dest: dest.clone(),
        };

        let mut frame = Frame::callee(site);
        for (param, arg) in params.iter().zip(args) {
            frame.set(param.clone(), self.read(arg)?);
        }

        let caller = std::mem::replace(&mut self.state.frame, frame);
        self.state.callers.push(caller);

        tracing::debug!(callee = %callee, depth = self.state.depth(), "call");

        self.state.enter(callee.clone(), interval.body());
        Ok(())
    }

    /// Writes the callee's result into the caller and resumes after the `Call`.
    ///
    /// A returned reference is transferred as-is, and is resolved against the caller's frame from
    /// then on.
    fn ret(&mut self, src: &Register) -> Result<(), RuntimeError> {
        let site = self.frame().return_site().cloned().ok_or(RuntimeError::ReturnOutsideFunction)?;
        let binding = self.read(src)?;

        let caller = self.state.callers.pop().ok_or(RuntimeError::ReturnOutsideFunction)?;
        self.state.frame = caller;
        self.state.frame.set(site.dest, binding);

        tracing::debug!(to = %site.block, depth = self.state.depth(), "return");

        self.state.enter(site.block, site.pc + 1);
        Ok(())
    }

    fn phi(&mut self, phi: &Phi) -> Result<Flow, RuntimeError> {
        let incoming = self.state.previous_block.as_ref().and_then(|previous| phi.select(previous));

        let Some(incoming) = incoming else {
            return Err(RuntimeError::UnresolvablePhi {
                previous: self.state.previous_block.clone(),
                left: phi.left.block.clone(),
                right: phi.right.block.clone(),
            });
        };

        let binding = self.read(&incoming.src)?;
        Ok(self.assign(&phi.dest, binding))
    }
}
