use super::tokens::{Token, TokenKind};

/// A position in a token stream.
///
/// `Cursor` is `Copy`: saving a snapshot is a copy and restoring one is an
/// assignment, so speculative parsing never has to undo anything. The stream
/// handed to [`Cursor::new`] must end with an `EOF` token, which the cursor
/// never moves past.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> Cursor<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        debug_assert!(
            tokens.last().is_some_and(|token| token.kind == TokenKind::EOF),
            "token stream must end with EOF"
        );
        Cursor { tokens, pos: 0 }
    }

    /// Returns the next token without consuming it.
    pub fn peek(&self) -> &'t Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Consumes and returns the next token.
    pub fn advance(&mut self) -> &'t Token {
        let token = self.peek();
        if token.kind != TokenKind::EOF {
            self.pos += 1;
        }
        token
    }

    /// The most recently consumed token, if any.
    pub fn previous(&self) -> Option<&'t Token> {
        self.pos.checked_sub(1).map(|pos| &self.tokens[pos])
    }

    /// Index of the next token; strictly grows as tokens are consumed.
    pub fn position(&self) -> usize {
        self.pos
    }
}
