//! FILENAME: engine/src/cell.rs
//! PURPOSE: The atomic unit of the spreadsheet.
//! CONTEXT: A cell carries its content plus both halves of its dependency
//! edges directly, rather than through a separate graph registry: the set
//! of cells it reads from (`depends_on`) and the set of cells that read
//! from it (`depended_on_by`). Both are insertion-ordered so cascade
//! recomputation visits dependents in a reproducible order.

use crate::content::Content;
use crate::coord::Coordinate;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    pub id: Coordinate,
    pub content: Content,
    pub depends_on: IndexSet<Coordinate>,
    pub depended_on_by: IndexSet<Coordinate>,
}

impl Cell {
    pub fn new(id: Coordinate, content: Content) -> Self {
        Cell {
            id,
            content,
            depends_on: IndexSet::new(),
            depended_on_by: IndexSet::new(),
        }
    }

    /// A freshly materialized placeholder: numeric-empty, no edges yet.
    pub fn placeholder(id: Coordinate) -> Self {
        Cell::new(id, Content::placeholder())
    }
}
