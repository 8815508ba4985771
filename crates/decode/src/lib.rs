#![forbid(unsafe_code)]
#![allow(clippy::match_bool)]
#![warn(clippy::must_use_candidate)]

//! Decodes the tuple wire format into a [`Program`].
//!
//! A program is a JSON array of instructions, and every instruction is itself an array whose
//! first two fields are always the destination register (or `null`) and the tag:
//!
//! ```json
//! [
//!     [null, "Block", "@entry"],
//!     ["%0", "Const", 11],
//!     [null, "Exit", "%0"]
//! ]
//! ```

use ownir_core::{ArithOp, CmpKind, Instruction, Label, Program, RawValue, Register};
use serde_json::Value;

mod error;


pub use error::DecodeError;

const fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Decodes a program from JSON text.
pub fn decode(input: &str) -> Result<Program, DecodeError> {
    let value: Value = serde_json::from_str(input)?;
    decode_value(&value)
}

/// Decodes a program from an already-parsed JSON value.
pub fn decode_value(value: &Value) -> Result<Program, DecodeError> {
    let Value::Array(entries) = value else {
        return Err(DecodeError::NotAProgram { found: describe(value) });
    };

    let program = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| instruction(index, entry))
        .collect::<Result<Program, _>>()?;

    tracing::debug!(instructions = program.len(), "decoded program");

    Ok(program)
}

/// The fields of one entry, past its destination and tag.
struct Fields<'a> {
    index: usize,
    tag: &'a str,
    dest: &'a Value,
    rest: &'a [Value],
}

impl Fields<'_> {
    // the first field after the tag is field 2 of the tuple.
    const OFFSET: usize = 2;

    fn arity(&self, expected: usize) -> Result<(), DecodeError> {
        match self.rest.len() == expected {
            true => Ok(()),
            false => Err(DecodeError::FieldCount {
                index: self.index,
                tag: self.tag.to_owned(),
                expected,
                found: self.rest.len(),
            }),
        }
    }

    fn field_type(&self, field: usize, expected: &'static str) -> DecodeError {
        DecodeError::FieldType {
            index: self.index,
            tag: self.tag.to_owned(),
            field: field + Self::OFFSET,
            expected,
        }
    }

    fn name<T>(&self, token: &str) -> Result<T, DecodeError>
    where
        T: core::str::FromStr<Err = ownir_core::ParseNameError>,
    {
        token.parse().map_err(|source| DecodeError::Name { index: self.index, source })
    }

    fn dest(&self) -> Result<Register, DecodeError> {
        match self.dest {
            Value::String(token) => self.name(token),
            Value::Null => Err(DecodeError::MissingDestination {
                index: self.index,
                tag: self.tag.to_owned(),
            }),
            _ => Err(DecodeError::FieldType {
                index: self.index,
                tag: self.tag.to_owned(),
                field: 0,
                expected: "a register or null",
            }),
        }
    }

    fn no_dest(&self) -> Result<(), DecodeError> {
        match self.dest {
            Value::Null => Ok(()),
            _ => Err(DecodeError::UnexpectedDestination {
                index: self.index,
                tag: self.tag.to_owned(),
            }),
        }
    }

    fn register(&self, field: usize) -> Result<Register, DecodeError> {
        match &self.rest[field] {
            Value::String(token) => self.name(token),
            _ => Err(self.field_type(field, "a register")),
        }
    }

    fn label(&self, field: usize) -> Result<Label, DecodeError> {
        match &self.rest[field] {
            Value::String(token) => self.name(token),
            _ => Err(self.field_type(field, "a label")),
        }
    }

    fn registers(&self, field: usize) -> Result<Vec<Register>, DecodeError> {
        let Value::Array(items) = &self.rest[field] else {
            return Err(self.field_type(field, "an array of registers"));
        };

        items
            .iter()
            .map(|item| match item {
                Value::String(token) => self.name(token),
                _ => Err(self.field_type(field, "an array of registers")),
            })
            .collect()
    }

    fn literal(&self, field: usize) -> Result<RawValue, DecodeError> {
        match &self.rest[field] {
            Value::Bool(it) => Ok(RawValue::Bool(*it)),
            Value::Number(it) => it
                .as_f64()
                .map(RawValue::Number)
                .ok_or_else(|| self.field_type(field, "a boolean or number literal")),
            _ => Err(self.field_type(field, "a boolean or number literal")),
        }
    }

    fn unary(&self) -> Result<(Register, Register), DecodeError> {
        self.arity(1)?;
        Ok((self.dest()?, self.register(0)?))
    }

    fn binary(&self) -> Result<(Register, Register, Register), DecodeError> {
        self.arity(2)?;
        Ok((self.dest()?, self.register(0)?, self.register(1)?))
    }

    fn sink(&self) -> Result<Register, DecodeError> {
        self.arity(1)?;
        self.no_dest()?;
        self.register(0)
    }
}

fn arith_op(tag: &str) -> Option<ArithOp> {
    match tag {
        "Add" => Some(ArithOp::Add),
        "Subtract" => Some(ArithOp::Subtract),
        "Multiply" => Some(ArithOp::Multiply),
        "Divide" => Some(ArithOp::Divide),
        "Remainder" => Some(ArithOp::Remainder),
        _ => None,
    }
}

fn cmp_kind(tag: &str) -> Option<CmpKind> {
    match tag {
        "Equal" => Some(CmpKind::Equal),
        "Unequal" => Some(CmpKind::Unequal),
        _ => None,
    }
}

fn instruction(index: usize, entry: &Value) -> Result<Instruction, DecodeError> {
    let Value::Array(fields) = entry else {
        return Err(DecodeError::NotAnInstruction { index, found: describe(entry) });
    };

    let [dest, tag, rest @ ..] = fields.as_slice() else {
        return Err(DecodeError::MissingTag { index });
    };

    let Value::String(tag) = tag else {
        return Err(DecodeError::FieldType {
            index,
            tag: String::new(),
            field: 1,
            expected: "a tag string",
        });
    };

    let fields = Fields { index, tag, dest, rest };

    if let Some(op) = arith_op(tag) {
        let (dest, lhs, rhs) = fields.binary()?;
        return Ok(Instruction::Arith { dest, op, lhs, rhs });
    }

    if let Some(kind) = cmp_kind(tag) {
        let (dest, lhs, rhs) = fields.binary()?;
        return Ok(Instruction::Cmp { dest, kind, lhs, rhs });
    }

    let instruction = match tag.as_str() {
        "Const" => {
            fields.arity(1)?;
            Instruction::Const { dest: fields.dest()?, value: fields.literal(0)? }
        }

        "Copy" => {
            let (dest, src) = fields.unary()?;
            Instruction::Copy { dest, src }
        }

        "Move" => {
            let (dest, src) = fields.unary()?;
            Instruction::Move { dest, src }
        }

        "Ref" => {
            let (dest, src) = fields.unary()?;
            Instruction::Ref { dest, src }
        }

        "Deref" => {
            let (dest, src) = fields.unary()?;
            Instruction::Deref { dest, src }
        }

        "Drop" => Instruction::Drop { src: fields.sink()? },
        "Return" => Instruction::Return { src: fields.sink()? },
        "Exit" => Instruction::Exit { src: fields.sink()? },

        "Block" => {
            fields.arity(1)?;
            fields.no_dest()?;
            Instruction::Block { label: fields.label(0)? }
        }

        "Function" => {
            fields.arity(2)?;
            fields.no_dest()?;
            Instruction::Function { label: fields.label(0)?, params: fields.registers(1)? }
        }

        "Jump" => {
            fields.arity(1)?;
            fields.no_dest()?;
            Instruction::Jump { target: fields.label(0)? }
        }

        "Branch" => {
            fields.arity(3)?;
            fields.no_dest()?;
            Instruction::Branch {
                then_label: fields.label(0)?,
                else_label: fields.label(1)?,
                cond: fields.register(2)?,
            }
        }

        "Call" => {
            fields.arity(2)?;
            Instruction::Call {
                dest: fields.dest()?,
                callee: fields.label(0)?,
                args: fields.registers(1)?,
            }
        }

        "Phi" => {
            fields.arity(4)?;
            Instruction::phi(
                fields.dest()?,
                (fields.label(0)?, fields.register(1)?),
                (fields.label(2)?, fields.register(3)?),
            )
        }

        _ => return Err(DecodeError::UnknownTag { index, tag: tag.clone() }),
    };

    Ok(instruction)
}
