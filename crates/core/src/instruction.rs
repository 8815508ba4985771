use core::fmt;

use crate::{Label, RawValue, Register};

#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum ArithOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
}

impl ArithOp {
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Add => "Add",
            Self::Subtract => "Subtract",
            Self::Multiply => "Multiply",
            Self::Divide => "Divide",
            Self::Remainder => "Remainder",
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
            Self::Remainder => "remainder",
        }
    }
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum CmpKind {
    Equal,
    Unequal,
}

impl CmpKind {
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Equal => "Equal",
            Self::Unequal => "Unequal",
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::Unequal => "unequal",
        }
    }
}

impl fmt::Display for CmpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One arm of a [`Phi`]: take `src` if control arrived from `block`.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct Incoming {
    pub block: Label,
    pub src: Register,
}

#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct Phi {
    pub dest: Register,
    pub left: Incoming,
    pub right: Incoming,
}

impl Phi {
    /// The arm whose block is `previous`, left first.
    #[must_use]
    pub fn select(&self, previous: &Label) -> Option<&Incoming> {
        [&self.left, &self.right].into_iter().find(|arm| arm.block == *previous)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Instruction {
    Const {
        dest: Register,
        value: RawValue,
    },
    Copy {
        dest: Register,
        src: Register,
    },
    /// Copies `src` into `dest`, then invalidates `src`.
    Move {
        dest: Register,
        src: Register,
    },
    Drop {
        src: Register,
    },
    Ref {
        dest: Register,
        src: Register,
    },
    Deref {
        dest: Register,
        src: Register,
    },
    Arith {
        dest: Register,
        op: ArithOp,
        lhs: Register,
        rhs: Register,
    },
    Cmp {
        dest: Register,
        kind: CmpKind,
        lhs: Register,
        rhs: Register,
    },
    Block {
        label: Label,
    },
    Function {
        label: Label,
        params: Vec<Register>,
    },
    Jump {
        target: Label,
    },
    Branch {
        then_label: Label,
        else_label: Label,
        cond: Register,
    },
    Call {
        dest: Register,
        callee: Label,
        args: Vec<Register>,
    },
    Return {
        src: Register,
    },
    Exit {
        src: Register,
    },
    Phi(Phi),
}

impl Instruction {
    #[must_use]
    pub fn constant(dest: Register, value: impl Into<RawValue>) -> Self {
        Self::Const { dest, value: value.into() }
    }

    #[must_use]
    pub fn copy(dest: Register, src: Register) -> Self {
        Self::Copy { dest, src }
    }

    #[must_use]
    pub fn move_(dest: Register, src: Register) -> Self {
        Self::Move { dest, src }
    }

    #[must_use]
    pub fn drop(src: Register) -> Self {
        Self::Drop { src }
    }

    #[must_use]
    pub fn reference(dest: Register, src: Register) -> Self {
        Self::Ref { dest, src }
    }

    #[must_use]
    pub fn deref(dest: Register, src: Register) -> Self {
        Self::Deref { dest, src }
    }

    #[must_use]
    pub fn arith(op: ArithOp, dest: Register, lhs: Register, rhs: Register) -> Self {
        Self::Arith { dest, op, lhs, rhs }
    }

    #[must_use]
    pub fn add(dest: Register, lhs: Register, rhs: Register) -> Self {
        Self::arith(ArithOp::Add, dest, lhs, rhs)
    }

    #[must_use]
    pub fn subtract(dest: Register, lhs: Register, rhs: Register) -> Self {
        Self::arith(ArithOp::Subtract, dest, lhs, rhs)
    }

    #[must_use]
    pub fn multiply(dest: Register, lhs: Register, rhs: Register) -> Self {
        Self::arith(ArithOp::Multiply, dest, lhs, rhs)
    }

    #[must_use]
    pub fn divide(dest: Register, lhs: Register, rhs: Register) -> Self {
        Self::arith(ArithOp::Divide, dest, lhs, rhs)
    }

    #[must_use]
    pub fn remainder(dest: Register, lhs: Register, rhs: Register) -> Self {
        Self::arith(ArithOp::Remainder, dest, lhs, rhs)
    }

    #[must_use]
    pub fn cmp(kind: CmpKind, dest: Register, lhs: Register, rhs: Register) -> Self {
        Self::Cmp { dest, kind, lhs, rhs }
    }

    #[must_use]
    pub fn equal(dest: Register, lhs: Register, rhs: Register) -> Self {
        Self::cmp(CmpKind::Equal, dest, lhs, rhs)
    }

    #[must_use]
    pub fn unequal(dest: Register, lhs: Register, rhs: Register) -> Self {
        Self::cmp(CmpKind::Unequal, dest, lhs, rhs)
    }

    #[must_use]
    pub fn block(label: Label) -> Self {
        Self::Block { label }
    }

    #[must_use]
    pub fn function(label: Label, params: Vec<Register>) -> Self {
        Self::Function { label, params }
    }

    #[must_use]
    pub fn jump(target: Label) -> Self {
        Self::Jump { target }
    }

    #[must_use]
    pub fn branch(then_label: Label, else_label: Label, cond: Register) -> Self {
        Self::Branch { then_label, else_label, cond }
    }

    #[must_use]
    pub fn call(dest: Register, callee: Label, args: Vec<Register>) -> Self {
        Self::Call { dest, callee, args }
    }

    #[must_use]
    pub fn ret(src: Register) -> Self {
        Self::Return { src }
    }

    #[must_use]
    pub fn exit(src: Register) -> Self {
        Self::Exit { src }
    }

    #[must_use]
    pub fn phi(dest: Register, left: (Label, Register), right: (Label, Register)) -> Self {
        let (left_block, left_src) = left;
        let (right_block, right_src) = right;

        Self::Phi(Phi {
            dest,
            left: Incoming { block: left_block, src: left_src },
            right: Incoming { block: right_block, src: right_src },
        })
    }

    /// The wire tag of this instruction, e.g. `"Const"`.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Const { .. } => "Const",
            Self::Copy { .. } => "Copy",
            Self::Move { .. } => "Move",
            Self::Drop { .. } => "Drop",
            Self::Ref { .. } => "Ref",
            Self::Deref { .. } => "Deref",
            Self::Arith { op, .. } => op.tag(),
            Self::Cmp { kind, .. } => kind.tag(),
            Self::Block { .. } => "Block",
            Self::Function { .. } => "Function",
            Self::Jump { .. } => "Jump",
            Self::Branch { .. } => "Branch",
            Self::Call { .. } => "Call",
            Self::Return { .. } => "Return",
            Self::Exit { .. } => "Exit",
            Self::Phi(_) => "Phi",
        }
    }

    #[must_use]
    pub fn dest(&self) -> Option<&Register> {
        match self {
            Self::Const { dest, .. }
            | Self::Copy { dest, .. }
            | Self::Move { dest, .. }
            | Self::Ref { dest, .. }
            | Self::Deref { dest, .. }
            | Self::Arith { dest, .. }
            | Self::Cmp { dest, .. }
            | Self::Call { dest, .. }
            | Self::Phi(Phi { dest, .. }) => Some(dest),

            Self::Drop { .. }
            | Self::Block { .. }
            | Self::Function { .. }
            | Self::Jump { .. }
            | Self::Branch { .. }
            | Self::Return { .. }
            | Self::Exit { .. } => None,
        }
    }

    /// Visits every register this instruction assigns, including the parameters of a `Function`.
    pub fn visit_assigned<'a, F: FnMut(&'a Register)>(&'a self, mut visit: F) {
        match self {
            Self::Function { params, .. } => params.iter().for_each(visit),
            _ => {
                if let Some(dest) = self.dest() {
                    visit(dest);
                }
            }
        }
    }

    /// Visits the labels control may transfer to within the current function.
    ///
    /// `Call` is not included: calls are handled by the call stack, not by the graph.
    pub fn visit_targets<'a, F: FnMut(&'a Label)>(&'a self, mut visit: F) {
        match self {
            Self::Jump { target } => visit(target),
            Self::Branch { then_label, else_label, .. } => {
                visit(then_label);
                visit(else_label);
            }
            _ => {}
        }
    }

    /// The label opened by a `Block` or `Function` marker.
    #[must_use]
    pub fn marker_label(&self) -> Option<&Label> {
        match self {
            Self::Block { label } | Self::Function { label, .. } => Some(label),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_marker(&self) -> bool {
        matches!(self, Self::Block { .. } | Self::Function { .. })
    }
}
