use std::rc::Rc;

use crate::{
    ast::{
        ast::Ast,
        expressions::{
            BinaryExpr, CallExpr, IdentifierExpr, LiteralExpr, LiteralSuffix, LiteralValue,
            ProcedureExpr,
        },
    },
    errors::errors::{internal_error, Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Position,
};

use super::{
    lookups::{binary_operator, Precedence},
    parser::{Failure, ParseResult, Parser},
    stmt::parse_block,
    types::parse_signature,
};

pub fn parse_expr<'t>(p: Parser<'t>) -> ParseResult<'t, Ast> {
    parse_binary_expr(p, 0)
}

// Precedence climbing: recurse only while the next operator binds strictly
// tighter than `min_precedence`, which keeps equal precedences left-associative.
fn parse_binary_expr<'t>(p: Parser<'t>, min_precedence: Precedence) -> ParseResult<'t, Ast> {
    let start = p;
    let mut p = p;

    let mut left = p.require(parse_primary_expr(p))?;

    while let Some(arguments) = p.attempt(parse_call_suffix(p.quiet()))? {
        let span = p.span_from(&start);
        left = Ast::ProcedureCall(CallExpr {
            callee: Box::new(left),
            arguments,
            span,
        });
    }

    loop {
        let Some((operator, precedence)) = binary_operator(p.peek().kind) else {
            break;
        };

        if precedence <= min_precedence {
            break;
        }

        p.next_token();
        p.arm("parsing binary operator right hand side");

        let right = p.require(parse_binary_expr(p, precedence))?;
        let span = p.span_from(&start);

        left = Ast::BinaryOperator(BinaryExpr {
            operator,
            left: Box::new(left),
            right: Box::new(right),
            span,
        });
    }

    Ok((p, left))
}

pub fn parse_primary_expr<'t>(p: Parser<'t>) -> ParseResult<'t, Ast> {
    let start = p;
    let mut p = p;

    if let Some(token) = p.attempt(p.quiet().parse_token(TokenKind::Number))? {
        p.arm("parsing number literal");
        return Ok((p, Ast::Literal(parse_number_literal(token)?)));
    }

    if let Some(token) = p.attempt(p.quiet().parse_token(TokenKind::String))? {
        p.arm("parsing string literal");
        return Ok((p, Ast::Literal(parse_string_literal(token)?)));
    }

    if let Some(token) = p.attempt(p.quiet().parse_token(TokenKind::Identifier))? {
        return Ok((
            p,
            Ast::Identifier(IdentifierExpr {
                name: token.value.clone(),
                span: token.span.clone(),
            }),
        ));
    }

    for (kind, value) in [(TokenKind::True, true), (TokenKind::False, false)] {
        if let Some(token) = p.attempt(p.quiet().parse_token(kind))? {
            return Ok((
                p,
                Ast::Literal(LiteralExpr {
                    value: LiteralValue::Bool(value),
                    suffix: LiteralSuffix::None,
                    span: token.span.clone(),
                }),
            ));
        }
    }

    if p.attempt(p.quiet().parse_token(TokenKind::OpenParen))?.is_some() {
        p.arm("parsing parenthesis expression");

        let expression = p.require(parse_expr(p))?;
        p.require(p.parse_token(TokenKind::CloseParen))?;

        return Ok((p, expression));
    }

    if let Some(procedure) = p.attempt(parse_procedure(p.quiet()))? {
        return Ok((p, Ast::Procedure(procedure)));
    }

    p.error(&start, "Failed to parse primary expression")
}

/// `(` args `)` following a callee.
fn parse_call_suffix<'t>(p: Parser<'t>) -> ParseResult<'t, Vec<Ast>> {
    let mut p = p;

    p.require(p.quiet().parse_token(TokenKind::OpenParen))?;
    p.arm("parsing procedure call");

    let mut arguments = vec![];
    let mut require_close = false;

    loop {
        if require_close {
            p.require(p.parse_token(TokenKind::CloseParen))?;
            break;
        }

        if p.attempt(p.quiet().parse_token(TokenKind::CloseParen))?.is_some() {
            break;
        }

        arguments.push(p.require(parse_expr(p))?);

        if p.attempt(p.quiet().parse_token(TokenKind::Comma))?.is_none() {
            require_close = true;
        }
    }

    Ok((p, arguments))
}

/// A procedure literal: a signature followed by `external` or a body.
pub fn parse_procedure<'t>(p: Parser<'t>) -> ParseResult<'t, ProcedureExpr> {
    let start = p;
    let mut p = p;

    let signature = p.require(parse_signature(p.quiet()))?;

    p.arm("parsing procedure");

    let body = if p.attempt(p.quiet().parse_token(TokenKind::External))?.is_some() {
        None
    } else {
        Some(p.require(parse_block(p, true))?)
    };

    let span = p.span_from(&start);
    Ok((
        p,
        ProcedureExpr {
            signature,
            body,
            span,
        },
    ))
}

fn number_error(token: &Token) -> Failure {
    Failure::Reported(Error::new(
        ErrorImpl::NumberParseError {
            token: token.value.clone(),
        },
        token.span.start.clone(),
    ))
}

/// Decodes the text of a number token.
///
/// `0x` selects base 16. A trailing `u` (any base) or `f` (decimal only) is a
/// suffix. `f` yields an `f32`, a decimal point an `f64` and anything else a
/// `u64`. The whole text has to be consumed and fit its type.
pub fn parse_number_literal(token: &Token) -> Result<LiteralExpr, Failure> {
    let text = token.text();

    let (digits, base) = match text.strip_prefix("0x") {
        Some(hex) => (hex, 16),
        None => (text, 10),
    };

    let (digits, suffix) = if let Some(digits) = digits.strip_suffix('u') {
        (digits, LiteralSuffix::Unsigned)
    } else if let Some(digits) = digits.strip_suffix('f').filter(|_| base == 10) {
        (digits, LiteralSuffix::Float)
    } else {
        (digits, LiteralSuffix::None)
    };

    let has_point = digits.contains('.');

    let value = match suffix {
        LiteralSuffix::Float => digits
            .parse::<f32>()
            .ok()
            .filter(|value| value.is_finite())
            .map(LiteralValue::F32),
        LiteralSuffix::None if has_point && base == 10 => digits
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(LiteralValue::F64),
        _ if has_point => None,
        _ => u64::from_str_radix(digits, base).ok().map(LiteralValue::Int),
    };

    match value {
        Some(value) => Ok(LiteralExpr {
            value,
            suffix,
            span: token.span.clone(),
        }),
        None => Err(number_error(token)),
    }
}

/// Strips the quotes of a string token and resolves its escape sequences.
pub fn parse_string_literal(token: &Token) -> Result<LiteralExpr, Failure> {
    let text = token.text();
    let inner = &text[1..text.len() - 1];

    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.char_indices();

    while let Some((_, c)) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }

        let escaped = match chars.next() {
            Some((_, 'a')) => '\x07',
            Some((_, 'b')) => '\x08',
            Some((_, 'e')) => '\x1b',
            Some((_, 'f')) => '\x0c',
            Some((_, 'n')) => '\n',
            Some((_, 'r')) => '\r',
            Some((_, 't')) => '\t',
            Some((_, 'v')) => '\x0b',
            Some((_, '0')) => '\0',
            Some((_, '"')) => '"',
            Some((_, '\\')) => '\\',
            Some((offset, sequence)) => {
                // Points at the backslash.
                let position = Position(
                    token.span.start.0 + offset as u32,
                    Rc::clone(&token.span.start.1),
                );
                return Err(Failure::Reported(Error::new(
                    ErrorImpl::InvalidEscapeSequence { sequence },
                    position,
                )));
            }
            None => internal_error("string token ends inside an escape sequence"),
        };

        value.push(escaped);
    }

    Ok(LiteralExpr {
        value: LiteralValue::Str(value),
        suffix: LiteralSuffix::None,
        span: token.span.clone(),
    })
}
