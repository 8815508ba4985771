use core::fmt;

use crate::{Instruction, Program, Register};

struct FmtList<'a>(&'a [Register]);

impl fmt::Display for FmtList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (idx, register) in self.0.iter().enumerate() {
            if idx != 0 {
                f.write_str(", ")?;
            }

            write!(f, "{register}")?;
        }

        f.write_str("]")
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Const { dest, value } => write!(f, "{dest} = const {value}"),
            Self::Copy { dest, src } => write!(f, "{dest} = copy {src}"),
            Self::Move { dest, src } => write!(f, "{dest} = move {src}"),
            Self::Drop { src } => write!(f, "drop {src}"),
            Self::Ref { dest, src } => write!(f, "{dest} = ref {src}"),
            Self::Deref { dest, src } => write!(f, "{dest} = deref {src}"),
            Self::Arith { dest, op, lhs, rhs } => write!(f, "{dest} = {op} {lhs}, {rhs}"),
            Self::Cmp { dest, kind, lhs, rhs } => write!(f, "{dest} = {kind} {lhs}, {rhs}"),
            Self::Block { label } => write!(f, "block {label}:"),
            Self::Function { label, params } => write!(f, "function {label} {}:", FmtList(params)),
            Self::Jump { target } => write!(f, "jump {target}"),
            Self::Branch { then_label, else_label, cond } => {
                write!(f, "branch {then_label}, {else_label}, {cond}")
            }
            Self::Call { dest, callee, args } => write!(f, "{dest} = call {callee} {}", FmtList(args)),
            Self::Return { src } => write!(f, "return {src}"),
            Self::Exit { src } => write!(f, "exit {src}"),
            Self::Phi(phi) => write!(
                f,
                "{} = phi [{}: {}], [{}: {}]",
                phi.dest, phi.left.block, phi.left.src, phi.right.block, phi.right.src
            ),
        }
    }
}

/// Renders a whole program, one instruction per line.
///
/// Every marker after the first is preceded by a blank line, and everything else is indented.
pub struct FmtProgram<'a>(&'a Program);

impl<'a> FmtProgram<'a> {
    #[must_use]
    pub fn new(program: &'a Program) -> Self {
        Self(program)
    }
}

impl fmt::Display for FmtProgram<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, instruction) in self.0.iter().enumerate() {
            match instruction.is_marker() {
                true if idx != 0 => writeln!(f, "\n{instruction}")?,
                true => writeln!(f, "{instruction}")?,
                false => writeln!(f, "    {instruction}")?,
            }
        }

        Ok(())
    }
}
