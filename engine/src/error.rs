//! FILENAME: engine/src/error.rs
//! PURPOSE: The public error type surfaced by the spreadsheet engine.
//! CONTEXT: Every fallible public operation returns `Result<_, SpreadsheetError>`.
//! Internal lexing/parsing failures are folded into `ContentError` at this
//! boundary so callers only ever see the four kinds named here, matching
//! the error enums this crate's sibling `parser` crate already uses:
//! a hand-rolled struct-or-enum with manual `Display`/`Error` impls, no
//! `thiserror`.

use std::fmt;

/// Errors raised while editing or reading a spreadsheet.
#[derive(Debug, Clone, PartialEq)]
pub enum SpreadsheetError {
    /// The coordinate string couldn't be parsed ("A1", "AA100", ...).
    BadCoordinate(String),
    /// The formula failed to tokenize, failed to parse, or failed to
    /// evaluate (textual operand in arithmetic, division by zero,
    /// malformed range, unknown function, empty reference, etc).
    ContentError(String),
    /// Installing this formula would create a dependency cycle; the edit
    /// was rejected and the cell's prior state is unchanged.
    CircularDependency,
    /// The cell's value could not be interpreted as a number.
    NoNumber,
}

impl fmt::Display for SpreadsheetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpreadsheetError::BadCoordinate(raw) => write!(f, "bad coordinate: {}", raw),
            SpreadsheetError::ContentError(msg) => write!(f, "content error: {}", msg),
            SpreadsheetError::CircularDependency => write!(f, "circular dependency detected"),
            SpreadsheetError::NoNumber => write!(f, "cell does not hold a number"),
        }
    }
}

impl std::error::Error for SpreadsheetError {}

impl From<parser::LexError> for SpreadsheetError {
    fn from(e: parser::LexError) -> Self {
        SpreadsheetError::ContentError(e.to_string())
    }
}

impl From<parser::ParseError> for SpreadsheetError {
    fn from(e: parser::ParseError) -> Self {
        SpreadsheetError::ContentError(e.to_string())
    }
}
