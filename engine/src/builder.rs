//! FILENAME: engine/src/builder.rs
//! PURPOSE: Compiles a validated token stream into a flat `Component` sequence.
//! CONTEXT: This is the third stage of the pipeline, one layer above the
//! `parser` crate's grammar acceptor. It walks the same grammar again —
//! deliberately: the acceptor's only job is fast, precise rejection with a
//! pure function of the tokens, while this pass has side effects (it
//! materializes placeholder cells for any referenced coordinate that
//! doesn't exist yet) and produces the actual structure the evaluator
//! consumes. Tokens reaching this stage are assumed already grammar-valid.

use crate::component::{Argument, Component, FuncKind, Op};
use crate::coord::{column_to_index, parse_coordinate, Coordinate};
use crate::error::SpreadsheetError;
use crate::store::Spreadsheet;
use parser::Token;

struct Builder<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> Builder<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        Builder { tokens, pos: 0 }
    }

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&Token::EOF)
    }

    fn advance(&mut self) -> Token {
        let tok = self.current().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, expected: &Token) -> Result<(), SpreadsheetError> {
        if self.current() == expected {
            self.advance();
            Ok(())
        } else {
            Err(SpreadsheetError::ContentError(format!(
                "expected {}, found {}",
                expected,
                self.current()
            )))
        }
    }

    /// expression --> term (("+"|"-") term)*
    ///
    /// Pushes components in true source order: operand, then operator, then
    /// the next operand. Precedence is not resolved here — that is the
    /// shunting-yard evaluator's job, one stage up, over the flat infix
    /// sequence this produces.
    fn expression(&mut self, store: &mut Spreadsheet, out: &mut Vec<Component>) -> Result<(), SpreadsheetError> {
        self.term(store, out)?;
        loop {
            let op = match self.current() {
                Token::Plus => Op::Add,
                Token::Minus => Op::Sub,
                _ => break,
            };
            self.advance();
            out.push(Component::Operator(op));
            self.term(store, out)?;
        }
        Ok(())
    }

    /// term --> factor (("*"|"/") factor)*
    ///
    /// Same infix-order discipline as `expression`: operand, operator,
    /// operand, left to right, with no precedence folding at this stage.
    fn term(&mut self, store: &mut Spreadsheet, out: &mut Vec<Component>) -> Result<(), SpreadsheetError> {
        self.factor(store, out)?;
        loop {
            let op = match self.current() {
                Token::Asterisk => Op::Mul,
                Token::Slash => Op::Div,
                _ => break,
            };
            self.advance();
            out.push(Component::Operator(op));
            self.factor(store, out)?;
        }
        Ok(())
    }

    /// factor --> NUMBER | "(" expression ")" | FUNCTION "(" arg (";" arg)* ")" | CELL_OR_RANGE
    ///
    /// Components are pushed in source order; parentheses are carried
    /// through as `OpenParen`/`CloseParen` markers for the shunting-yard
    /// stage to resolve.
    fn factor(&mut self, store: &mut Spreadsheet, out: &mut Vec<Component>) -> Result<(), SpreadsheetError> {
        match self.current().clone() {
            Token::Number(n) => {
                self.advance();
                out.push(Component::Number(n));
                Ok(())
            }
            Token::CellOrRange(raw) => {
                self.advance();
                out.push(cell_or_range_component(&raw, store)?);
                Ok(())
            }
            Token::LParen => {
                self.advance();
                out.push(Component::OpenParen);
                self.expression(store, out)?;
                self.expect(&Token::RParen)?;
                out.push(Component::CloseParen);
                Ok(())
            }
            Token::Function(name) => {
                let args = self.function_call(&name, store)?;
                let kind = FuncKind::from_name(&name)
                    .ok_or_else(|| SpreadsheetError::ContentError(format!("unknown function {}", name)))?;
                out.push(Component::Func(kind, args));
                Ok(())
            }
            other => Err(SpreadsheetError::ContentError(format!(
                "expected a number, cell reference, function call or parenthesized expression, found {}",
                other
            ))),
        }
    }

    fn function_call(&mut self, name: &str, store: &mut Spreadsheet) -> Result<Vec<Argument>, SpreadsheetError> {
        self.advance(); // consume FUNCTION token
        self.expect(&Token::LParen)?;
        let mut args = vec![self.arg(store)?];
        while *self.current() == Token::Semicolon {
            self.advance();
            args.push(self.arg(store)?);
        }
        self.expect(&Token::RParen)?;
        let _ = name;
        Ok(args)
    }

    /// arg --> NUMBER | CELL_OR_RANGE | FUNCTION "(" arg (";" arg)* ")"
    fn arg(&mut self, store: &mut Spreadsheet) -> Result<Argument, SpreadsheetError> {
        match self.current().clone() {
            Token::Number(n) => {
                self.advance();
                Ok(Argument::Number(n))
            }
            Token::CellOrRange(raw) => {
                self.advance();
                cell_or_range_argument(&raw, store)
            }
            Token::Function(name) => {
                let args = self.function_call(&name, store)?;
                let kind = FuncKind::from_name(&name)
                    .ok_or_else(|| SpreadsheetError::ContentError(format!("unknown function {}", name)))?;
                Ok(Argument::Func(kind, args))
            }
            other => Err(SpreadsheetError::ContentError(format!(
                "expected a number, cell reference or function call as an argument, found {}",
                other
            ))),
        }
    }
}

fn split_cell_or_range(raw: &str) -> Result<(Coordinate, Option<Coordinate>), SpreadsheetError> {
    match raw.split_once(':') {
        Some((a, b)) => Ok((parse_coordinate(a)?, Some(parse_coordinate(b)?))),
        None => Ok((parse_coordinate(raw)?, None)),
    }
}

fn check_range_order(start: &Coordinate, end: &Coordinate) -> Result<(), SpreadsheetError> {
    if column_to_index(&start.column) > column_to_index(&end.column) || start.row > end.row {
        return Err(SpreadsheetError::ContentError(format!(
            "malformed range: {}:{}",
            start, end
        )));
    }
    Ok(())
}

fn materialize(coord: &Coordinate, store: &mut Spreadsheet) {
    store.get_or_create_placeholder(coord);
}

fn cell_or_range_component(raw: &str, store: &mut Spreadsheet) -> Result<Component, SpreadsheetError> {
    let (start, end) = split_cell_or_range(raw)?;
    match end {
        None => {
            materialize(&start, store);
            Ok(Component::CellRef(start))
        }
        Some(end) => {
            check_range_order(&start, &end)?;
            for coord in rectangle(&start, &end) {
                materialize(&coord, store);
            }
            Ok(Component::Range(start, end))
        }
    }
}

fn cell_or_range_argument(raw: &str, store: &mut Spreadsheet) -> Result<Argument, SpreadsheetError> {
    let (start, end) = split_cell_or_range(raw)?;
    match end {
        None => {
            materialize(&start, store);
            Ok(Argument::CellRef(start))
        }
        Some(end) => {
            check_range_order(&start, &end)?;
            for coord in rectangle(&start, &end) {
                materialize(&coord, store);
            }
            Ok(Argument::Range(start, end))
        }
    }
}

/// Expands a rectangle in row-major order: rows vary slowest, columns
/// fastest, so `Z1:AB3` yields (Z,1),(AA,1),(AB,1),(Z,2),(AA,2),(AB,2),...
pub fn rectangle(start: &Coordinate, end: &Coordinate) -> Vec<Coordinate> {
    let start_col = column_to_index(&start.column);
    let end_col = column_to_index(&end.column);
    let mut cells = Vec::new();
    for row in start.row..=end.row {
        for col_idx in start_col..=end_col {
            cells.push(Coordinate::new(crate::coord::index_to_column(col_idx), row));
        }
    }
    cells
}

/// Builds the flat `Component` sequence for `tokens`, materializing any
/// referenced cell that doesn't exist yet as an empty-numeric placeholder.
pub fn build_components(tokens: &[Token], store: &mut Spreadsheet) -> Result<Vec<Component>, SpreadsheetError> {
    let mut out = Vec::new();
    let mut builder = Builder::new(tokens);
    builder.expression(store, &mut out)?;
    Ok(out)
}
