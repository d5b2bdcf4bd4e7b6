//! FILENAME: engine/src/value.rs
//! PURPOSE: The result type produced by evaluating a cell's content.
//! CONTEXT: Distinct from `Content`, which is what the user typed; `Value`
//! is what a cell currently evaluates to.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Number(f64),
    Text(String),
    Empty,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{:.0}", n)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Text(s) => write!(f, "{}", s),
            Value::Empty => write!(f, ""),
        }
    }
}
