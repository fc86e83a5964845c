//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the `Parser` cursor and the entry point `parse`.
//! Grammar rules live in the sibling modules and all share one shape:
//!
//! ```ignore
//! fn rule<'t>(p: Parser<'t>) -> ParseResult<'t, T>
//! ```
//!
//! A rule receives its own copy of the parser and returns the advanced copy
//! together with the parsed value. On failure the caller simply keeps its own
//! copy, so backtracking never has to undo anything.
//!
//! Diagnostics follow an arm/quiet policy:
//! - Speculative alternatives run on `p.quiet()` and fail silently
//! - Once a rule has recognised its leading token it calls `p.arm(context)`
//! - A failure while armed is reported with that context and is never
//!   backtracked over, so a compile unit produces exactly one syntax error

use crate::{
    ast::statements::Module,
    errors::errors::{internal_error, Error, ErrorImpl},
    lexer::{
        cursor::Cursor,
        tokens::{Token, TokenKind},
    },
    Span,
};

use super::stmt::parse_module;

/// Why a grammar rule did not match.
#[derive(Debug)]
pub enum Failure {
    /// The rule did not match and nothing was reported, alternatives may
    /// still be tried.
    Quiet,
    /// The rule failed after being armed. Propagates straight to `parse`.
    Reported(Error),
}

pub type ParseResult<'t, T> = Result<(Parser<'t>, T), Failure>;

/// Immutable parsing state: a token cursor plus the current error context.
#[derive(Debug, Clone, Copy)]
pub struct Parser<'t> {
    cursor: Cursor<'t>,
    context: Option<&'static str>,
}

impl<'t> Parser<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            context: None,
        }
    }

    /// Copy of this parser whose failures are not reported.
    pub fn quiet(self) -> Self {
        Parser {
            context: None,
            ..self
        }
    }

    /// Commits to the current branch: failures from here on are reported
    /// under `context`.
    pub fn arm(&mut self, context: &'static str) {
        tracing::trace!(context, position = self.cursor.position(), "armed");
        self.context = Some(context);
    }

    pub fn is_armed(&self) -> bool {
        self.context.is_some()
    }

    fn skip_comments(&mut self) {
        while self.cursor.peek().is_comment() {
            self.cursor.advance();
        }
    }

    /// Returns the next non-comment token without consuming it.
    pub fn peek(&self) -> &'t Token {
        let mut p = *self;
        p.skip_comments();
        p.cursor.peek()
    }

    /// Consumes and returns the next non-comment token.
    pub fn next_token(&mut self) -> &'t Token {
        self.skip_comments();
        self.cursor.advance()
    }

    /// Matches a single token of the given kind.
    pub fn parse_token(self, kind: TokenKind) -> ParseResult<'t, &'t Token> {
        let start = self;
        let mut p = self;

        let token = p.next_token();
        if token.kind != kind {
            return self.error(&start, format!("Expected {}, received {}", kind, token));
        }

        Ok((p, token))
    }

    /// Fails a rule that started at `start`. Reported only when armed.
    pub fn error<T>(&self, start: &Parser<'t>, message: impl Into<String>) -> Result<T, Failure> {
        match self.context {
            None => Err(Failure::Quiet),
            Some(context) => Err(Failure::Reported(Error::new(
                ErrorImpl::ParseFailure {
                    context: context.to_string(),
                    message: message.into(),
                },
                start.peek().span.start.clone(),
            ))),
        }
    }

    /// Moves to `parsed` if it is strictly ahead of this parser.
    ///
    /// Only the cursor is taken over, the error context stays.
    pub fn advance(&mut self, parsed: Parser<'t>) -> bool {
        if parsed.cursor.position() <= self.cursor.position() {
            return false;
        }

        self.cursor = parsed.cursor;
        true
    }

    /// Runs an optional sub-rule. A quiet failure (or a match that did not
    /// move forward) yields `None`; a reported failure is passed on.
    pub fn attempt<T>(&mut self, result: ParseResult<'t, T>) -> Result<Option<T>, Failure> {
        match result {
            Ok((parsed, value)) if self.advance(parsed) => Ok(Some(value)),
            Ok(_) | Err(Failure::Quiet) => Ok(None),
            Err(reported) => Err(reported),
        }
    }

    /// Runs a mandatory sub-rule, failing this rule when it does not match.
    pub fn require<T>(&mut self, result: ParseResult<'t, T>) -> Result<T, Failure> {
        match result {
            Ok((parsed, value)) if self.advance(parsed) => Ok(value),
            Ok(_) => Err(Failure::Quiet),
            Err(failure) => Err(failure),
        }
    }

    /// Span from the first token of `start` to the last token consumed here.
    pub fn span_from(&self, start: &Parser<'t>) -> Span {
        let begin = start.peek().span.start.clone();

        let end = match self.cursor.previous() {
            Some(token) if self.cursor.position() > start.cursor.position() => {
                token.span.end.clone()
            }
            _ => begin.clone(),
        };

        Span { start: begin, end }
    }
}

/// Parses a token stream into a `Module`.
///
/// The stream must be terminated by an `EOF` token, as produced by
/// `tokenize`. Comments are skipped here, not by the lexer.
///
/// # Returns
///
/// The module, or the single diagnostic of the deepest armed rule that failed.
pub fn parse(tokens: &[Token]) -> Result<Module, Error> {
    if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
        internal_error("token stream is not terminated by EOF");
    }

    let parser = Parser::new(tokens);

    match parse_module(parser) {
        Ok((_, module)) => {
            tracing::debug!(declarations = module.declarations.len(), "parsed module");
            Ok(module)
        }
        Err(Failure::Reported(error)) => Err(error),
        Err(Failure::Quiet) => Err(Error::new(
            ErrorImpl::ParseFailure {
                context: String::from("parsing module"),
                message: String::from("Failed to parse module"),
            },
            parser.peek().span.start.clone(),
        )),
    }
}
