//! Lexical analysis module for the compiler.
//!
//! This module contains the lexer (tokenizer) that converts source code
//! into a stream of tokens for parsing. It handles:
//!
//! - Tokenization of source code using anchored regex patterns
//! - Recognition of keywords, identifiers, literals, and operators
//! - Line and nested multi-line comments, kept as `Comment` tokens
//! - A copyable `Cursor` over the token stream for backtracking parsers

pub mod cursor;
pub mod lexer;
pub mod tokens;

#[cfg(test)]
mod tests;
