//! FILENAME: engine/src/engine.rs
//! PURPOSE: The public edit controller — the one entry point the rest of an
//! application (CLI, UI, persistence layer) is expected to drive.
//! CONTEXT: Wraps a `Spreadsheet` and exposes exactly the operations an
//! editor needs: create a fresh sheet, edit a cell from raw text, and read
//! a cell back as a number, as display text, or as its formula source.
//! Classification, dependency wiring, cycle rejection and cascading
//! recomputation all happen inside `edit_cell`; callers never see the
//! intermediate pipeline stages.

use crate::content::{classify, Classified, Content};
use crate::coord::parse_coordinate;
use crate::dependency::detach;
use crate::driver::{cascade, install_formula};
use crate::error::SpreadsheetError;
use crate::store::Spreadsheet;
use crate::value::Value;
use log::trace;

/// An in-memory spreadsheet plus its edit controller.
#[derive(Debug, Default)]
pub struct Engine {
    sheet: Spreadsheet,
}

impl Engine {
    /// Starts a brand-new, empty spreadsheet. Any cached formula components
    /// and dependency edges from a prior sheet are dropped along with the
    /// cell data — there's nothing left to reuse across sheets.
    pub fn new_spreadsheet() -> Self {
        Engine {
            sheet: Spreadsheet::new(),
        }
    }

    pub fn spreadsheet(&self) -> &Spreadsheet {
        &self.sheet
    }

    /// Writes `raw` into the cell at `coord_str`, classifying it as a
    /// number, text, or formula. A text write is rejected outright if any
    /// other cell already depends on this one — text cells can't
    /// participate in formulas. Every edit that could change the cell's
    /// value (a plain number, or a formula — whether or not it evaluates
    /// successfully) triggers cascading recomputation of dependents.
    pub fn edit_cell(&mut self, coord_str: &str, raw: &str) -> Result<(), SpreadsheetError> {
        let coord = parse_coordinate(coord_str)?;
        let classified = classify(raw);

        let has_dependents = self
            .sheet
            .get(&coord)
            .map(|c| !c.depended_on_by.is_empty())
            .unwrap_or(false);

        if has_dependents {
            if let Classified::Textual(_) = classified {
                return Err(SpreadsheetError::ContentError(format!(
                    "{} cannot hold text while other cells depend on it",
                    coord
                )));
            }
        }

        match classified {
            Classified::Textual(text) => {
                trace!("writing text into {}", coord);
                detach(&mut self.sheet, &coord);
                self.sheet.set_content(&coord, Content::Textual(text));
                Ok(())
            }
            Classified::Numeric(n) => {
                trace!("writing number into {}", coord);
                detach(&mut self.sheet, &coord);
                self.sheet.set_content(&coord, Content::Numeric(Value::Number(n)));
                cascade(&mut self.sheet, &coord);
                Ok(())
            }
            Classified::Formula(source) => {
                let result = install_formula(&mut self.sheet, &coord, &source);
                if !matches!(result, Err(SpreadsheetError::CircularDependency)) {
                    cascade(&mut self.sheet, &coord);
                }
                result
            }
        }
    }

    /// Reads a cell's current value as a number. Text cells and empty
    /// cells report `SpreadsheetError::NoNumber`.
    pub fn get_cell_value_as_number(&self, coord_str: &str) -> Result<f64, SpreadsheetError> {
        let coord = parse_coordinate(coord_str)?;
        match self.sheet.get(&coord).map(|c| &c.content) {
            None => Err(SpreadsheetError::NoNumber),
            Some(Content::Numeric(Value::Number(n))) => Ok(*n),
            Some(Content::Formula { cached: Value::Number(n), .. }) => Ok(*n),
            _ => Err(SpreadsheetError::NoNumber),
        }
    }

    /// Reads a cell's current value rendered as display text. Numbers are
    /// formatted without a trailing ".0" when they're whole; empty cells
    /// render as an empty string.
    pub fn get_cell_value_as_string(&self, coord_str: &str) -> Result<String, SpreadsheetError> {
        let coord = parse_coordinate(coord_str)?;
        match self.sheet.get(&coord).map(|c| &c.content) {
            None => Ok(String::new()),
            Some(Content::Numeric(v)) => Ok(v.to_string()),
            Some(Content::Textual(t)) => Ok(t.clone()),
            Some(Content::Formula { cached, .. }) => Ok(cached.to_string()),
        }
    }

    /// Reads a cell's formula source, leading '=' included. Errors if the
    /// cell isn't a formula.
    pub fn get_cell_formula_source(&self, coord_str: &str) -> Result<String, SpreadsheetError> {
        let coord = parse_coordinate(coord_str)?;
        match self.sheet.get(&coord).map(|c| &c.content) {
            Some(Content::Formula { source, .. }) => Ok(source.clone()),
            _ => Err(SpreadsheetError::ContentError(format!("{} does not hold a formula", coord))),
        }
    }
}
