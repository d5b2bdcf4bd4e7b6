//! FILENAME: engine/src/evaluator.rs
//! PURPOSE: Infix-to-postfix conversion (shunting yard) and postfix evaluation.
//! CONTEXT: The fourth and fifth stages of the pipeline. `infix_to_postfix`
//! is a textbook shunting yard over the flat `Component` sequence the
//! builder produced; `evaluate_postfix` then walks that postfix sequence
//! with an operand stack. Parentheses never survive into the postfix form —
//! they only ever reorder operators during the shunting pass.

use crate::component::{Argument, Component, FuncKind, Op};
use crate::coord::Coordinate;
use crate::error::SpreadsheetError;
use crate::store::Spreadsheet;
use crate::value::Value;

/// Converts a flat infix `Component` sequence into postfix order.
pub fn infix_to_postfix(infix: Vec<Component>) -> Vec<Component> {
    let mut output = Vec::with_capacity(infix.len());
    let mut stack: Vec<Component> = Vec::new();

    for comp in infix {
        match comp {
            Component::Number(_) | Component::CellRef(_) | Component::Range(_, _) | Component::Func(_, _) => {
                output.push(comp);
            }
            Component::OpenParen => stack.push(comp),
            Component::CloseParen => {
                while let Some(top) = stack.last() {
                    if matches!(top, Component::OpenParen) {
                        break;
                    }
                    output.push(stack.pop().unwrap());
                }
                stack.pop(); // discard the matching OpenParen
            }
            Component::Operator(op) => {
                while let Some(Component::Operator(top_op)) = stack.last() {
                    if top_op.precedence() >= op.precedence() {
                        output.push(stack.pop().unwrap());
                    } else {
                        break;
                    }
                }
                stack.push(Component::Operator(op));
            }
        }
    }
    while let Some(top) = stack.pop() {
        output.push(top);
    }
    output
}

fn resolve_cell_value(coord: &Coordinate, store: &Spreadsheet) -> Result<Value, SpreadsheetError> {
    let cell = store
        .get(coord)
        .expect("cell referenced by a formula is always materialized during component building");
    match &cell.content {
        crate::content::Content::Numeric(v) => Ok(v.clone()),
        crate::content::Content::Textual(_) => {
            Err(SpreadsheetError::ContentError(format!("{} holds text, not a number", coord)))
        }
        crate::content::Content::Formula { cached, .. } => Ok(cached.clone()),
    }
}

fn require_number(value: Value, context: &str) -> Result<f64, SpreadsheetError> {
    match value {
        Value::Number(n) => Ok(n),
        Value::Empty => Err(SpreadsheetError::ContentError(format!("empty reference used as {}", context))),
        Value::Text(_) => Err(SpreadsheetError::ContentError(format!("text used as {}", context))),
    }
}

fn apply_op(op: Op, a: f64, b: f64) -> Result<f64, SpreadsheetError> {
    match op {
        Op::Add => Ok(a + b),
        Op::Sub => Ok(a - b),
        Op::Mul => Ok(a * b),
        Op::Div => {
            if b == 0.0 {
                Err(SpreadsheetError::ContentError("division by zero".to_string()))
            } else {
                Ok(a / b)
            }
        }
    }
}

fn flatten_into(arg: &Argument, store: &Spreadsheet, out: &mut Vec<f64>) -> Result<(), SpreadsheetError> {
    match arg {
        Argument::Number(n) => out.push(*n),
        Argument::CellRef(c) => match resolve_cell_value(c, store)? {
            Value::Number(n) => out.push(n),
            Value::Empty => {}
            Value::Text(_) => return Err(SpreadsheetError::ContentError(format!("{} holds text, not a number", c))),
        },
        Argument::Range(start, end) => {
            for coord in crate::builder::rectangle(start, end) {
                match resolve_cell_value(&coord, store)? {
                    Value::Number(n) => out.push(n),
                    Value::Empty => {}
                    Value::Text(_) => {
                        return Err(SpreadsheetError::ContentError(format!(
                            "{} holds text, not a number",
                            coord
                        )))
                    }
                }
            }
        }
        Argument::Func(kind, args) => {
            if let Value::Number(n) = evaluate_func(*kind, args, store)? {
                out.push(n);
            }
        }
    }
    Ok(())
}

fn apply_func(kind: FuncKind, values: &[f64]) -> Value {
    if values.is_empty() {
        return Value::Empty;
    }
    match kind {
        FuncKind::Suma => Value::Number(values.iter().sum()),
        FuncKind::Max => Value::Number(values.iter().cloned().fold(f64::NEG_INFINITY, f64::max)),
        FuncKind::Min => Value::Number(values.iter().cloned().fold(f64::INFINITY, f64::min)),
        FuncKind::Promedio => Value::Number(values.iter().sum::<f64>() / values.len() as f64),
    }
}

fn evaluate_func(kind: FuncKind, args: &[Argument], store: &Spreadsheet) -> Result<Value, SpreadsheetError> {
    let mut values = Vec::new();
    for arg in args {
        flatten_into(arg, store, &mut values)?;
    }
    Ok(apply_func(kind, &values))
}

/// Evaluates a postfix `Component` sequence against the current state of
/// `store`. The final stack value is the formula's result: it may be
/// `Value::Empty` when the whole formula reduces to an aggregate function
/// over an all-empty argument list, or when it is a bare reference to an
/// empty cell.
pub fn evaluate_postfix(postfix: &[Component], store: &Spreadsheet) -> Result<Value, SpreadsheetError> {
    let mut stack: Vec<Value> = Vec::new();
    for comp in postfix {
        match comp {
            Component::Number(n) => stack.push(Value::Number(*n)),
            Component::CellRef(c) => stack.push(resolve_cell_value(c, store)?),
            Component::Range(a, b) => {
                return Err(SpreadsheetError::ContentError(format!(
                    "range {}:{} used outside a function call",
                    a, b
                )))
            }
            Component::Func(kind, args) => stack.push(evaluate_func(*kind, args, store)?),
            Component::Operator(op) => {
                let b = stack
                    .pop()
                    .ok_or_else(|| SpreadsheetError::ContentError("malformed expression".to_string()))?;
                let a = stack
                    .pop()
                    .ok_or_else(|| SpreadsheetError::ContentError("malformed expression".to_string()))?;
                let bn = require_number(b, "an arithmetic operand")?;
                let an = require_number(a, "an arithmetic operand")?;
                stack.push(Value::Number(apply_op(*op, an, bn)?));
            }
            Component::OpenParen | Component::CloseParen => {
                unreachable!("postfix sequences never retain parentheses")
            }
        }
    }
    stack
        .pop()
        .ok_or_else(|| SpreadsheetError::ContentError("empty expression".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_components;
    use crate::content::Content;

    fn eval(src: &str, store: &mut Spreadsheet) -> Result<Value, SpreadsheetError> {
        let tokens = parser::tokenize(src).unwrap();
        parser::validate(&tokens).unwrap();
        let components = build_components(&tokens, store)?;
        let postfix = infix_to_postfix(components);
        evaluate_postfix(&postfix, store)
    }

    fn set_number(store: &mut Spreadsheet, coord: &str, n: f64) {
        let c = crate::coord::parse_coordinate(coord).unwrap();
        store.set_content(&c, Content::Numeric(Value::Number(n)));
    }

    #[test]
    fn evaluates_arithmetic_with_precedence() {
        let mut store = Spreadsheet::new();
        assert_eq!(eval("1+2*3", &mut store).unwrap(), Value::Number(7.0));
    }

    #[test]
    fn evaluates_two_equal_precedence_terms_on_either_side_of_a_lower_precedence_operator() {
        let mut store = Spreadsheet::new();
        assert_eq!(eval("2*3+4*5", &mut store).unwrap(), Value::Number(26.0));
    }

    #[test]
    fn subtraction_chains_are_left_associative() {
        let mut store = Spreadsheet::new();
        assert_eq!(eval("1-2-3", &mut store).unwrap(), Value::Number(-4.0));
    }

    #[test]
    fn evaluates_parenthesized_expressions() {
        let mut store = Spreadsheet::new();
        assert_eq!(eval("(1+2)*3", &mut store).unwrap(), Value::Number(9.0));
    }

    #[test]
    fn resolves_cell_references() {
        let mut store = Spreadsheet::new();
        set_number(&mut store, "A1", 10.0);
        set_number(&mut store, "B1", 5.0);
        assert_eq!(eval("A1+B1", &mut store).unwrap(), Value::Number(15.0));
    }

    #[test]
    fn empty_bare_reference_evaluates_to_empty() {
        let mut store = Spreadsheet::new();
        assert_eq!(eval("A1", &mut store).unwrap(), Value::Empty);
    }

    #[test]
    fn empty_reference_used_in_arithmetic_errors() {
        let mut store = Spreadsheet::new();
        assert!(eval("A1+1", &mut store).is_err());
    }

    #[test]
    fn division_by_zero_errors() {
        let mut store = Spreadsheet::new();
        assert!(eval("1/0", &mut store).is_err());
    }

    #[test]
    fn suma_over_empty_range_evaluates_to_empty() {
        let mut store = Spreadsheet::new();
        assert_eq!(eval("SUMA(A1:A3)", &mut store).unwrap(), Value::Empty);
    }

    #[test]
    fn suma_skips_empty_cells_within_a_range() {
        let mut store = Spreadsheet::new();
        set_number(&mut store, "A1", 10.0);
        set_number(&mut store, "A3", 20.0);
        assert_eq!(eval("SUMA(A1:A3)", &mut store).unwrap(), Value::Number(30.0));
    }

    #[test]
    fn max_min_promedio_aggregate_correctly() {
        let mut store = Spreadsheet::new();
        set_number(&mut store, "A1", 4.0);
        set_number(&mut store, "A2", 9.0);
        set_number(&mut store, "A3", 2.0);
        assert_eq!(eval("MAX(A1:A3)", &mut store).unwrap(), Value::Number(9.0));
        assert_eq!(eval("MIN(A1:A3)", &mut store).unwrap(), Value::Number(2.0));
        assert_eq!(eval("PROMEDIO(A1:A3)", &mut store).unwrap(), Value::Number(5.0));
    }

    #[test]
    fn nested_function_calls_contribute_their_result() {
        let mut store = Spreadsheet::new();
        set_number(&mut store, "A1", 1.0);
        set_number(&mut store, "A2", 2.0);
        assert_eq!(eval("SUMA(MAX(A1;A2);10)", &mut store).unwrap(), Value::Number(12.0));
    }

    #[test]
    fn bare_range_at_top_level_is_rejected() {
        let mut store = Spreadsheet::new();
        assert!(eval("A1:A3", &mut store).is_err());
    }

    #[test]
    fn deeply_nested_parentheses_evaluate() {
        let mut store = Spreadsheet::new();
        let depth = 128;
        let mut src = String::new();
        for _ in 0..depth {
            src.push('(');
        }
        src.push('1');
        for _ in 0..depth {
            src.push(')');
        }
        assert_eq!(eval(&src, &mut store).unwrap(), Value::Number(1.0));
    }

    #[test]
    fn textual_operand_in_arithmetic_errors() {
        let mut store = Spreadsheet::new();
        let c = crate::coord::parse_coordinate("A1").unwrap();
        store.set_content(&c, Content::Textual("hello".into()));
        assert!(eval("A1+1", &mut store).is_err());
    }
}
