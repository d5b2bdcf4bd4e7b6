//! FILENAME: engine/src/driver.rs
//! PURPOSE: Installs a formula into a cell and cascades recomputation to dependents.
//! CONTEXT: Ties together the tokenizer, the grammar acceptor, the component
//! builder, the dependency graph and the shunting-yard evaluator into the
//! single operation the edit controller calls for formula content.

use crate::builder::build_components;
use crate::content::Content;
use crate::coord::Coordinate;
use crate::dependency::{attach, detach, extract_dependencies, has_cycle, recalculation_order};
use crate::error::SpreadsheetError;
use crate::evaluator::{evaluate_postfix, infix_to_postfix};
use crate::store::Spreadsheet;
use crate::value::Value;
use log::{debug, trace};

/// Tokenizes, validates, builds, wires dependencies for, and evaluates a
/// formula, installing it at `cell_id`. On a cycle the cell's previous
/// dependency edges are restored and its content is left untouched. On any
/// other failure (parse or evaluation) the content is still updated — with
/// `cached = Value::Empty` — since the formula's new source and dependency
/// wiring are the caller's intent even when evaluation couldn't complete.
pub fn install_formula(store: &mut Spreadsheet, cell_id: &Coordinate, source: &str) -> Result<(), SpreadsheetError> {
    trace!("installing formula into {}: {}", cell_id, source);
    let tokens = parser::tokenize(source)?;
    parser::validate(&tokens)?;
    let components = build_components(&tokens, store)?;

    let old_deps = store
        .get(cell_id)
        .map(|c| c.depends_on.clone())
        .unwrap_or_default();
    detach(store, cell_id);
    let new_deps = extract_dependencies(&components);
    attach(store, cell_id, new_deps);

    if has_cycle(store, cell_id) {
        debug!("rejecting formula at {}: would create a circular dependency", cell_id);
        detach(store, cell_id);
        attach(store, cell_id, old_deps);
        return Err(SpreadsheetError::CircularDependency);
    }

    let postfix = infix_to_postfix(components.clone());
    let full_source = format!("={}", source);
    match evaluate_postfix(&postfix, store) {
        Ok(value) => {
            if let Some(cell) = store.get_mut(cell_id) {
                cell.content = Content::Formula {
                    source: full_source,
                    components,
                    cached: value,
                };
            }
            Ok(())
        }
        Err(e) => {
            if let Some(cell) = store.get_mut(cell_id) {
                cell.content = Content::Formula {
                    source: full_source,
                    components,
                    cached: Value::Empty,
                };
            }
            Err(e)
        }
    }
}

/// Re-evaluates every cell transitively dependent on `origin`, in
/// topological order, updating each one's cached value in place. Never
/// fails: a dependent whose recompute errors (e.g. because a precedent
/// became textual) simply caches `Value::Empty`, matching how a failed
/// formula installation behaves.
pub fn cascade(store: &mut Spreadsheet, origin: &Coordinate) {
    let order = recalculation_order(store, origin);
    if order.is_empty() {
        return;
    }
    debug!("cascading recomputation from {} to {} dependent cell(s)", origin, order.len());
    for coord in order {
        let components = match store.get(&coord) {
            Some(cell) => match &cell.content {
                Content::Formula { components, .. } => components.clone(),
                _ => continue,
            },
            None => continue,
        };
        let postfix = infix_to_postfix(components.clone());
        let value = evaluate_postfix(&postfix, store).unwrap_or(Value::Empty);
        if let Some(cell) = store.get_mut(&coord) {
            if let Content::Formula { cached, .. } = &mut cell.content {
                *cached = value;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Content;

    fn set_number(store: &mut Spreadsheet, coord: &str, n: f64) {
        let c = crate::coord::parse_coordinate(coord).unwrap();
        store.set_content(&c, Content::Numeric(Value::Number(n)));
    }

    #[test]
    fn install_formula_evaluates_and_caches() {
        let mut store = Spreadsheet::new();
        set_number(&mut store, "A1", 10.0);
        set_number(&mut store, "B1", 20.0);
        let c1 = crate::coord::parse_coordinate("C1").unwrap();
        install_formula(&mut store, &c1, "A1+B1").unwrap();
        match &store.get(&c1).unwrap().content {
            Content::Formula { cached, .. } => assert_eq!(*cached, Value::Number(30.0)),
            _ => panic!("expected formula content"),
        }
    }

    #[test]
    fn install_formula_rejects_cycles_and_restores_prior_edges() {
        let mut store = Spreadsheet::new();
        let a1 = crate::coord::parse_coordinate("A1").unwrap();
        let b1 = crate::coord::parse_coordinate("B1").unwrap();
        install_formula(&mut store, &a1, "B1").unwrap();
        let err = install_formula(&mut store, &b1, "A1").unwrap_err();
        assert_eq!(err, SpreadsheetError::CircularDependency);
        // B1's content is untouched: it never got past the cycle check.
        assert_eq!(store.get(&b1).unwrap().content, Content::placeholder());
    }

    #[test]
    fn cascade_propagates_through_a_chain() {
        let mut store = Spreadsheet::new();
        let a1 = crate::coord::parse_coordinate("A1").unwrap();
        let b1 = crate::coord::parse_coordinate("B1").unwrap();
        set_number(&mut store, "A1", 1.0);
        install_formula(&mut store, &b1, "A1+1").unwrap();

        set_number(&mut store, "A1", 5.0);
        cascade(&mut store, &a1);

        match &store.get(&b1).unwrap().content {
            Content::Formula { cached, .. } => assert_eq!(*cached, Value::Number(6.0)),
            _ => panic!("expected formula content"),
        }
    }
}
