//! FILENAME: engine/src/dependency.rs
//! PURPOSE: Dependency-edge maintenance and cycle detection.
//! CONTEXT: Unlike the teacher's `DependencyGraph`, which keeps precedent
//! and dependent sets in a registry separate from the cells themselves,
//! this engine stores both edge sets directly on each `Cell`
//! (`depends_on` / `depended_on_by`). These functions walk those fields in
//! place rather than maintaining a parallel structure.

use crate::builder::rectangle;
use crate::component::{Argument, Component};
use crate::coord::Coordinate;
use indexmap::IndexSet;
use log::trace;

/// Walks a compiled component sequence and collects every coordinate it
/// reads from, expanding ranges into their full rectangle.
pub fn extract_dependencies(components: &[Component]) -> IndexSet<Coordinate> {
    let mut deps = IndexSet::new();
    for comp in components {
        match comp {
            Component::CellRef(c) => {
                deps.insert(c.clone());
            }
            Component::Range(a, b) => {
                deps.extend(rectangle(a, b));
            }
            Component::Func(_, args) => {
                for arg in args {
                    extract_from_argument(arg, &mut deps);
                }
            }
            Component::Number(_) | Component::Operator(_) | Component::OpenParen | Component::CloseParen => {}
        }
    }
    deps
}

fn extract_from_argument(arg: &Argument, deps: &mut IndexSet<Coordinate>) {
    match arg {
        Argument::Number(_) => {}
        Argument::CellRef(c) => {
            deps.insert(c.clone());
        }
        Argument::Range(a, b) => deps.extend(rectangle(a, b)),
        Argument::Func(_, args) => {
            for a in args {
                extract_from_argument(a, deps);
            }
        }
    }
}

/// Removes `cell_id`'s current outgoing edges and the matching incoming
/// edges on each of its former precedents.
pub fn detach(store: &mut crate::store::Spreadsheet, cell_id: &Coordinate) {
    let old_deps: Vec<Coordinate> = store
        .get(cell_id)
        .map(|c| c.depends_on.iter().cloned().collect())
        .unwrap_or_default();
    for dep in &old_deps {
        if let Some(cell) = store.get_mut(dep) {
            cell.depended_on_by.shift_remove(cell_id);
        }
    }
    if let Some(cell) = store.get_mut(cell_id) {
        cell.depends_on.clear();
    }
}

/// Installs `deps` as `cell_id`'s outgoing edges, materializing any
/// precedent that doesn't exist yet, and records the matching incoming
/// edge on each precedent.
pub fn attach(store: &mut crate::store::Spreadsheet, cell_id: &Coordinate, deps: IndexSet<Coordinate>) {
    for dep in &deps {
        let precedent = store.get_or_create_placeholder(dep);
        precedent.depended_on_by.insert(cell_id.clone());
    }
    if let Some(cell) = store.get_mut(cell_id) {
        cell.depends_on = deps;
    }
}

/// Checks whether `origin` is reachable from itself by following
/// `depended_on_by` edges — i.e. whether installing `origin`'s current
/// `depends_on` set created a cycle back through its own dependents.
pub fn has_cycle(store: &crate::store::Spreadsheet, origin: &Coordinate) -> bool {
    let mut visited: IndexSet<Coordinate> = IndexSet::new();
    let mut stack: Vec<Coordinate> = store
        .get(origin)
        .map(|c| c.depended_on_by.iter().cloned().collect())
        .unwrap_or_default();
    while let Some(current) = stack.pop() {
        if current == *origin {
            trace!("cycle detected reaching back to {}", origin);
            return true;
        }
        if !visited.insert(current.clone()) {
            continue;
        }
        if let Some(cell) = store.get(&current) {
            stack.extend(cell.depended_on_by.iter().cloned());
        }
    }
    false
}

/// Breadth-first collection of every cell transitively dependent on
/// `origin`, returned in a stable topological order (precedents before
/// dependents) with ties broken by each cell's `depended_on_by` insertion
/// order.
pub fn recalculation_order(store: &crate::store::Spreadsheet, origin: &Coordinate) -> Vec<Coordinate> {
    let mut affected: IndexSet<Coordinate> = IndexSet::new();
    let mut queue: std::collections::VecDeque<Coordinate> = std::collections::VecDeque::new();
    if let Some(cell) = store.get(origin) {
        for dep in &cell.depended_on_by {
            queue.push_back(dep.clone());
        }
    }
    while let Some(current) = queue.pop_front() {
        if !affected.insert(current.clone()) {
            continue;
        }
        if let Some(cell) = store.get(&current) {
            for dep in &cell.depended_on_by {
                queue.push_back(dep.clone());
            }
        }
    }

    // Kahn's algorithm restricted to the affected set, so only relevant
    // in-degrees are counted.
    let mut in_degree: std::collections::HashMap<Coordinate, usize> =
        affected.iter().map(|c| (c.clone(), 0)).collect();
    for coord in &affected {
        if let Some(cell) = store.get(coord) {
            for precedent in &cell.depends_on {
                if let Some(count) = in_degree.get_mut(coord) {
                    if affected.contains(precedent) {
                        *count += 1;
                    }
                }
            }
        }
    }

    let mut ready: std::collections::VecDeque<Coordinate> = affected
        .iter()
        .filter(|c| in_degree.get(*c).copied().unwrap_or(0) == 0)
        .cloned()
        .collect();
    let mut order = Vec::with_capacity(affected.len());
    while let Some(coord) = ready.pop_front() {
        order.push(coord.clone());
        if let Some(cell) = store.get(&coord) {
            for dependent in &cell.depended_on_by {
                if let Some(count) = in_degree.get_mut(dependent) {
                    *count -= 1;
                    if *count == 0 {
                        ready.push_back(dependent.clone());
                    }
                }
            }
        }
    }
    order
}
