//! FILENAME: parser/src/lexer.rs
//! PURPOSE: Scans a raw formula string and produces a stream of Tokens.
//! CONTEXT: This is the first stage of the parsing pipeline. A single
//! compiled regular expression drives the scan: the input is repeatedly
//! matched against an alternation of every token shape, in priority order,
//! and whitespace between matches is skipped implicitly because `find_at`
//! only ever looks forward for the next match.
//!
//! SUPPORTED TOKENS:
//! - Operators: + - * /
//! - Delimiters: ( ) : ; ,
//! - Numbers: 123, 1.5, .5
//! - Cell references and ranges: A1, AA100, A1:B2
//! - Function names: SUMA MAX MIN PROMEDIO

use crate::token::Token;
use once_cell::sync::Lazy;
use regex::Regex;

/// Alternation order is significant: the regex crate resolves ambiguity
/// leftmost-first, so the cell/range pattern must be tried before the
/// function-name pattern — a column label like "MAX1" or "MIN7" is a
/// legal coordinate per the coordinate codec, and must lex as one even
/// though its letters happen to spell a function name. The catch-all "any
/// other byte" group comes last so it only fires once nothing structured
/// matches.
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?xi)
        (?P<op>[+\-*/])
        |(?P<cell>[A-Za-z]+[0-9]+(?::[A-Za-z]+[0-9]+)?)
        |(?P<func>SUMA|MAX|MIN|PROMEDIO)
        |(?P<num>[0-9]+(?:\.[0-9]*)?|\.[0-9]+)
        |(?P<lparen>\()
        |(?P<rparen>\))
        |(?P<colon>:)
        |(?P<semi>;)
        |(?P<comma>,)
        |(?P<bad>\S)
        ",
    )
    .expect("token regex is a compile-time constant")
});

/// A single lexing failure: an input byte that matched none of the
/// recognized token shapes.
#[derive(Debug, PartialEq, Clone)]
pub struct LexError {
    pub offending: char,
    pub offset: usize,
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unexpected character '{}' at offset {}",
            self.offending, self.offset
        )
    }
}

impl std::error::Error for LexError {}

pub type LexResult<T> = Result<T, LexError>;

/// Scans `input` in full, producing a token stream terminated by `Token::EOF`.
///
/// Whitespace between tokens is skipped silently. The first byte that
/// matches none of the recognized shapes aborts the scan immediately with
/// its offset, rather than collecting an `Illegal` token for later handling.
pub fn tokenize(input: &str) -> LexResult<Vec<Token>> {
    let mut tokens = Vec::new();
    for caps in TOKEN_RE.captures_iter(input) {
        if let Some(m) = caps.name("op") {
            tokens.push(match m.as_str() {
                "+" => Token::Plus,
                "-" => Token::Minus,
                "*" => Token::Asterisk,
                "/" => Token::Slash,
                _ => unreachable!("operator alternative only matches +-*/"),
            });
        } else if let Some(m) = caps.name("func") {
            tokens.push(Token::Function(m.as_str().to_ascii_uppercase()));
        } else if let Some(m) = caps.name("cell") {
            tokens.push(Token::CellOrRange(m.as_str().to_ascii_uppercase()));
        } else if let Some(m) = caps.name("num") {
            let n: f64 = m
                .as_str()
                .parse()
                .expect("regex only matches well-formed decimal literals");
            tokens.push(Token::Number(n));
        } else if caps.name("lparen").is_some() {
            tokens.push(Token::LParen);
        } else if caps.name("rparen").is_some() {
            tokens.push(Token::RParen);
        } else if caps.name("colon").is_some() {
            tokens.push(Token::Colon);
        } else if caps.name("semi").is_some() {
            tokens.push(Token::Semicolon);
        } else if caps.name("comma").is_some() {
            tokens.push(Token::Comma);
        } else if let Some(m) = caps.name("bad") {
            return Err(LexError {
                offending: m.as_str().chars().next().unwrap(),
                offset: m.start(),
            });
        }
    }
    tokens.push(Token::EOF);
    Ok(tokens)
}
