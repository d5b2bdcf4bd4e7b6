//! FILENAME: engine/src/component.rs
//! PURPOSE: The evaluable structure a formula is compiled into.
//! CONTEXT: Tokens validated by the `parser` crate are compiled here into a
//! flat infix sequence of `Component`s — the shunting-yard evaluator walks
//! this sequence directly, so parentheses and operators stay as standalone
//! items rather than being folded into a tree. A function call's arguments,
//! by contrast, are never re-shunted: they're resolved as a nested
//! `Argument` structure at evaluation time, one level below the flat
//! top-level sequence.

use crate::coord::Coordinate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

impl Op {
    /// Higher binds tighter. Both precedence levels are left-associative.
    pub fn precedence(self) -> u8 {
        match self {
            Op::Add | Op::Sub => 1,
            Op::Mul | Op::Div => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FuncKind {
    Suma,
    Max,
    Min,
    Promedio,
}

impl FuncKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "SUMA" => Some(FuncKind::Suma),
            "MAX" => Some(FuncKind::Max),
            "MIN" => Some(FuncKind::Min),
            "PROMEDIO" => Some(FuncKind::Promedio),
            _ => None,
        }
    }
}

/// A single item of the flat, infix component sequence a formula compiles to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Component {
    Number(f64),
    Operator(Op),
    OpenParen,
    CloseParen,
    CellRef(Coordinate),
    /// Present in the sequence only when a range appears outside a function
    /// call; it is never a valid scalar operand and the evaluator rejects it
    /// on sight.
    Range(Coordinate, Coordinate),
    Func(FuncKind, Vec<Argument>),
}

/// A single argument to a function call. Arguments are atomic: they cannot
/// themselves be arbitrary sub-expressions built from operators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Argument {
    Number(f64),
    CellRef(Coordinate),
    Range(Coordinate, Coordinate),
    Func(FuncKind, Vec<Argument>),
}
