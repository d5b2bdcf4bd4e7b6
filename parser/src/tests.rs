//! FILENAME: parser/src/tests.rs
//! PURPOSE: Consolidated pipeline tests for the tokenizer + grammar acceptor.

use crate::lexer::tokenize;
use crate::parser::validate;
use crate::token::Token;

fn accepts(src: &str) -> bool {
    tokenize(src).map(|toks| validate(&toks).is_ok()).unwrap_or(false)
}

fn rejects(src: &str) -> bool {
    !accepts(src)
}

#[test]
fn tokenizes_leading_equals_as_part_of_the_editor_prefix() {
    // The tokenizer itself has no notion of a leading '=': callers strip it
    // before tokenizing. A formula source beginning with '=' is handled one
    // layer up, in the component builder.
    let tokens = tokenize("1+2").unwrap();
    assert_eq!(tokens.last(), Some(&Token::EOF));
}

#[test]
fn full_pipeline_accepts_arithmetic() {
    assert!(accepts("1 + 2 * 3 - 4 / 2"));
}

#[test]
fn full_pipeline_accepts_cell_refs_and_ranges() {
    assert!(accepts("A1 + B2"));
    assert!(accepts("SUMA(A1:A10)"));
    assert!(accepts("MAX(A1:B10;C1;10)"));
}

#[test]
fn full_pipeline_accepts_multi_letter_columns() {
    assert!(accepts("AA1 + AB2"));
    assert!(accepts("SUMA(Z1:AB3)"));
}

#[test]
fn full_pipeline_accepts_nested_parens_and_functions() {
    assert!(accepts("(1 + 2) * (3 - 4)"));
    assert!(accepts("PROMEDIO(SUMA(A1;A2);MIN(B1:B2))"));
}

#[test]
fn full_pipeline_rejects_unknown_function_names() {
    assert!(rejects("FOO(1)"));
}

#[test]
fn full_pipeline_rejects_operator_inside_argument() {
    assert!(rejects("SUMA(1+2;3)"));
}

#[test]
fn full_pipeline_rejects_unbalanced_parens() {
    assert!(rejects("(1 + 2"));
    assert!(rejects("1 + 2)"));
}

#[test]
fn full_pipeline_rejects_empty_source() {
    assert!(rejects(""));
    assert!(rejects("   "));
}

#[test]
fn full_pipeline_rejects_illegal_characters() {
    assert!(rejects("1 & 2"));
    assert!(rejects("1 @ 2"));
}

#[test]
fn full_pipeline_rejects_dangling_operator() {
    assert!(rejects("1 +"));
    assert!(rejects("* 1"));
}

#[test]
fn full_pipeline_rejects_missing_comma_separator() {
    // Arguments are separated by ';', not ','.
    assert!(rejects("SUMA(A1,B1)"));
}
