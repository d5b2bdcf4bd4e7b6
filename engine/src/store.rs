//! FILENAME: engine/src/store.rs
//! PURPOSE: The sparse, insertion-ordered collection of all cells.
//! CONTEXT: Mirrors the teacher's `Grid` in spirit — a sparse map keyed by
//! coordinate, since most of a spreadsheet is empty — but keyed by the
//! canonical `Coordinate` rather than a numeric (row, col) pair, and backed
//! by an `IndexMap` so iteration order always matches insertion order.

use crate::cell::Cell;
use crate::content::Content;
use crate::coord::Coordinate;
use indexmap::IndexMap;

#[derive(Debug, Clone, Default)]
pub struct Spreadsheet {
    cells: IndexMap<Coordinate, Cell>,
}

impl Spreadsheet {
    pub fn new() -> Self {
        Spreadsheet {
            cells: IndexMap::new(),
        }
    }

    pub fn get(&self, id: &Coordinate) -> Option<&Cell> {
        self.cells.get(id)
    }

    pub fn get_mut(&mut self, id: &Coordinate) -> Option<&mut Cell> {
        self.cells.get_mut(id)
    }

    pub fn contains(&self, id: &Coordinate) -> bool {
        self.cells.contains_key(id)
    }

    /// Iterates cells in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Coordinate, &Cell)> {
        self.cells.iter()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Inserts a brand-new cell. Idempotent over the coordinate: if a cell
    /// already occupies it, the existing cell (and its position in
    /// insertion order) is left untouched.
    pub fn insert_new(&mut self, id: Coordinate, content: Content) {
        self.cells.entry(id.clone()).or_insert_with(|| Cell::new(id, content));
    }

    /// Returns the cell at `id`, materializing an empty-numeric placeholder
    /// first if it doesn't exist yet.
    pub fn get_or_create_placeholder(&mut self, id: &Coordinate) -> &mut Cell {
        self.cells
            .entry(id.clone())
            .or_insert_with(|| Cell::placeholder(id.clone()))
    }

    /// Overwrites a cell's content in place, preserving its dependency edges
    /// and its position in insertion order. Materializes the cell first if
    /// it doesn't exist yet.
    pub fn set_content(&mut self, id: &Coordinate, content: Content) {
        self.get_or_create_placeholder(id).content = content;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn c(col: &str, row: u32) -> Coordinate {
        Coordinate::new(col, row)
    }

    #[test]
    fn insert_new_is_idempotent_over_coordinate() {
        let mut store = Spreadsheet::new();
        store.insert_new(c("A", 1), Content::Numeric(Value::Number(1.0)));
        store.insert_new(c("A", 1), Content::Numeric(Value::Number(2.0)));
        assert_eq!(store.get(&c("A", 1)).unwrap().content, Content::Numeric(Value::Number(1.0)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn iteration_order_matches_insertion_order() {
        let mut store = Spreadsheet::new();
        store.insert_new(c("B", 1), Content::Textual("b".into()));
        store.insert_new(c("A", 1), Content::Textual("a".into()));
        store.insert_new(c("C", 1), Content::Textual("c".into()));
        let order: Vec<&Coordinate> = store.iter().map(|(k, _)| k).collect();
        assert_eq!(order, vec![&c("B", 1), &c("A", 1), &c("C", 1)]);
    }

    #[test]
    fn get_or_create_placeholder_materializes_once() {
        let mut store = Spreadsheet::new();
        store.get_or_create_placeholder(&c("A", 1));
        assert!(store.contains(&c("A", 1)));
        assert_eq!(store.get(&c("A", 1)).unwrap().content, Content::placeholder());
    }
}
