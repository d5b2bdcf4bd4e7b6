//! FILENAME: parser/src/parser.rs
//! PURPOSE: Validates that a token stream is a grammatically well-formed
//! formula, without building any tree out of it.
//! CONTEXT: This is the second stage of the pipeline. Unlike a conventional
//! recursive descent parser, this one is a pure acceptor: on success it
//! hands back the exact token slice it was given, unchanged. Building the
//! evaluable structure out of the tokens is the component builder's job,
//! one layer up in the `engine` crate.
//!
//! GRAMMAR:
//!   formula        --> "=" expression | expression
//!   expression     --> term ( ("+" | "-") term )*
//!   term           --> factor ( ("*" | "/") factor )*
//!   factor         --> NUMBER | "(" expression ")" | FUNCTION "(" arg (";" arg)* ")" | CELL_OR_RANGE
//!   arg            --> NUMBER | CELL_OR_RANGE | FUNCTION "(" arg (";" arg)* ")"
//!
//! Arguments deliberately cannot themselves be arbitrary sub-expressions:
//! operators and parenthesized groups are rejected inside a function call's
//! argument list.

use crate::token::Token;

/// Parser errors carry a human-readable message, matching the style used
/// for lexing failures.
#[derive(Debug, PartialEq, Clone)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        ParseError {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "parse error: {}", self.message)
    }
}

impl std::error::Error for ParseError {}

pub type ParseResult<T> = Result<T, ParseError>;

struct Acceptor<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> Acceptor<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        Acceptor { tokens, pos: 0 }
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

    fn expect(&mut self, expected: &Token) -> ParseResult<()> {
        if self.current() == expected {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::new(format!(
                "expected {}, found {}",
                expected, self.current()
            )))
        }
    }

    /// expression --> term (("+"|"-") term)*
    fn expression(&mut self) -> ParseResult<()> {
        self.term()?;
        loop {
            match self.current() {
                Token::Plus | Token::Minus => {
                    self.advance();
                    self.term()?;
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// term --> factor (("*"|"/") factor)*
    fn term(&mut self) -> ParseResult<()> {
        self.factor()?;
        loop {
            match self.current() {
                Token::Asterisk | Token::Slash => {
                    self.advance();
                    self.factor()?;
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// factor --> NUMBER | "(" expression ")" | FUNCTION "(" arg (";" arg)* ")" | CELL_OR_RANGE
    fn factor(&mut self) -> ParseResult<()> {
        match self.current().clone() {
            Token::Number(_) => {
                self.advance();
                Ok(())
            }
            Token::CellOrRange(_) => {
                self.advance();
                Ok(())
            }
            Token::LParen => {
                self.advance();
                self.expression()?;
                self.expect(&Token::RParen)
            }
            Token::Function(_) => {
                self.advance();
                self.expect(&Token::LParen)?;
                self.arg()?;
                while *self.current() == Token::Semicolon {
                    self.advance();
                    self.arg()?;
                }
                self.expect(&Token::RParen)
            }
            other => Err(ParseError::new(format!(
                "expected a number, cell reference, function call or parenthesized expression, found {}",
                other
            ))),
        }
    }

    /// arg --> NUMBER | CELL_OR_RANGE | FUNCTION "(" arg (";" arg)* ")"
    ///
    /// No operators and no parenthesized groups: arguments are atomic.
    fn arg(&mut self) -> ParseResult<()> {
        match self.current().clone() {
            Token::Number(_) | Token::CellOrRange(_) => {
                self.advance();
                Ok(())
            }
            Token::Function(_) => {
                self.advance();
                self.expect(&Token::LParen)?;
                self.arg()?;
                while *self.current() == Token::Semicolon {
                    self.advance();
                    self.arg()?;
                }
                self.expect(&Token::RParen)
            }
            other => Err(ParseError::new(format!(
                "expected a number, cell reference or function call as an argument, found {}",
                other
            ))),
        }
    }
}

/// Validates `tokens` against the grammar. On success, every token was
/// consumed exactly once and the stream formed a single complete
/// expression; the caller's token slice is untouched and may be handed
/// straight to the component builder.
pub fn validate(tokens: &[Token]) -> ParseResult<()> {
    if tokens.is_empty() || tokens[0] == Token::EOF {
        return Err(ParseError::new("empty formula"));
    }
    let mut acceptor = Acceptor::new(tokens);
    acceptor.expression()?;
    if *acceptor.current() != Token::EOF {
        return Err(ParseError::new(format!(
            "unexpected token after expression: {}",
            acceptor.current()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn validate_str(src: &str) -> ParseResult<()> {
        validate(&tokenize(src).unwrap())
    }

    #[test]
    fn accepts_simple_arithmetic() {
        assert!(validate_str("1+2*3-4/5").is_ok());
    }

    #[test]
    fn accepts_parenthesized_expressions() {
        assert!(validate_str("(1+2)*3").is_ok());
    }

    #[test]
    fn accepts_cell_refs_and_ranges() {
        assert!(validate_str("A1+B2").is_ok());
        assert!(validate_str("SUMA(A1:A10)").is_ok());
    }

    #[test]
    fn accepts_nested_function_calls() {
        assert!(validate_str("SUMA(MAX(A1;A2);3)").is_ok());
    }

    #[test]
    fn rejects_empty_formula() {
        assert!(validate_str("").is_err());
    }

    #[test]
    fn rejects_mismatched_parens() {
        assert!(validate_str("(1+2").is_err());
        assert!(validate_str("1+2)").is_err());
    }

    #[test]
    fn rejects_operator_inside_function_argument() {
        assert!(validate_str("SUMA(1+2;3)").is_err());
    }

    #[test]
    fn rejects_parenthesized_group_as_argument() {
        assert!(validate_str("SUMA((1+2);3)").is_err());
    }

    #[test]
    fn rejects_dangling_operator() {
        assert!(validate_str("1+").is_err());
        assert!(validate_str("+1").is_err());
    }

    #[test]
    fn rejects_trailing_garbage() {
        assert!(validate_str("1 1").is_err());
    }
}
