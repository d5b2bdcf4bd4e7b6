//! FILENAME: engine/src/content.rs
//! PURPOSE: What the user typed into a cell, as opposed to what it evaluates to.
//! CONTEXT: Classification happens purely on the raw text, before any
//! formula is tokenized or built: a leading '=' makes it a formula, a
//! successful `f64` parse makes it numeric, anything else is textual. This
//! mirrors the classify-on-write rule the rest of this pipeline is modeled
//! on: nothing about dependencies or evaluation is decided at this stage.

use crate::component::Component;
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// What a cell currently holds, prior to evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Content {
    /// A numeric literal, or — only for placeholder cells materialized as a
    /// dependency target before anyone has written to them — `Value::Empty`.
    Numeric(Value),
    Textual(String),
    Formula {
        /// The original source text, leading '=' included.
        source: String,
        components: Vec<Component>,
        cached: Value,
    },
}

impl Content {
    pub fn placeholder() -> Self {
        Content::Numeric(Value::Empty)
    }

    pub fn is_formula(&self) -> bool {
        matches!(self, Content::Formula { .. })
    }
}

/// The result of classifying raw cell input, before a formula's tokens are
/// built into components.
#[derive(Debug, Clone, PartialEq)]
pub enum Classified {
    Numeric(f64),
    Textual(String),
    /// Source text with the leading '=' stripped off.
    Formula(String),
}

/// Classifies raw user input per the write-time rule: surrounding
/// whitespace is trimmed first; a leading '=' then makes it a formula,
/// otherwise a successful float parse makes it numeric, otherwise it's
/// textual.
pub fn classify(raw: &str) -> Classified {
    let trimmed = raw.trim();
    if let Some(rest) = trimmed.strip_prefix('=') {
        return Classified::Formula(rest.to_string());
    }
    if let Ok(n) = trimmed.parse::<f64>() {
        return Classified::Numeric(n);
    }
    Classified::Textual(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_formulas_by_leading_equals() {
        assert_eq!(classify("=A1+1"), Classified::Formula("A1+1".to_string()));
    }

    #[test]
    fn trims_surrounding_whitespace_before_checking_for_a_formula_prefix() {
        assert_eq!(classify("  =A1+1  "), Classified::Formula("A1+1".to_string()));
        assert_eq!(classify(" 42 "), Classified::Numeric(42.0));
        assert_eq!(classify("  hello  "), Classified::Textual("hello".to_string()));
    }

    #[test]
    fn classifies_numeric_literals() {
        assert_eq!(classify("42"), Classified::Numeric(42.0));
        assert_eq!(classify("-3.5"), Classified::Numeric(-3.5));
    }

    #[test]
    fn classifies_everything_else_as_text() {
        assert_eq!(classify("hello"), Classified::Textual("hello".to_string()));
        assert_eq!(classify(""), Classified::Textual("".to_string()));
    }

    #[test]
    fn classify_of_a_rendered_number_round_trips() {
        let value = crate::value::Value::Number(42.0);
        assert_eq!(classify(&value.to_string()), Classified::Numeric(42.0));
    }

    #[test]
    fn classify_of_rendered_text_round_trips() {
        let value = crate::value::Value::Text("hello".to_string());
        assert_eq!(classify(&value.to_string()), Classified::Textual("hello".to_string()));
    }
}
