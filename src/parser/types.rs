use crate::{
    ast::{
        ast::Ast,
        types::{ArrayType, PointerType, SignatureType, TypeIdentifier},
    },
    lexer::tokens::TokenKind,
};

use super::{
    expr::parse_expr,
    parser::{ParseResult, Parser},
    stmt::parse_decl,
};

/// type := ident | `*` type | `[` expr `]` type | signature
pub fn parse_type<'t>(p: Parser<'t>) -> ParseResult<'t, Ast> {
    let start = p;
    let mut p = p;

    if let Some(token) = p.attempt(p.quiet().parse_token(TokenKind::Identifier))? {
        return Ok((
            p,
            Ast::TypeIdentifier(TypeIdentifier {
                name: token.value.clone(),
                span: token.span.clone(),
            }),
        ));
    }

    if p.attempt(p.quiet().parse_token(TokenKind::Star))?.is_some() {
        let target = p.require(parse_type(p))?;
        let span = p.span_from(&start);

        return Ok((
            p,
            Ast::PointerType(PointerType {
                target: Box::new(target),
                span,
            }),
        ));
    }

    if p.attempt(p.quiet().parse_token(TokenKind::OpenBracket))?.is_some() {
        let length = p.require(parse_expr(p))?;
        p.require(p.parse_token(TokenKind::CloseBracket))?;
        let element = p.require(parse_type(p))?;
        let span = p.span_from(&start);

        return Ok((
            p,
            Ast::ArrayType(ArrayType {
                length: Box::new(length),
                element: Box::new(element),
                span,
            }),
        ));
    }

    if let Some(signature) = p.attempt(parse_signature(p.quiet()))? {
        return Ok((p, Ast::ProcedureSignature(signature)));
    }

    p.error(&start, "Failed to parse type")
}

/// signature := `proc` `(` [decl {`,` decl}] [`,` `...`] `)` [type]
pub fn parse_signature<'t>(p: Parser<'t>) -> ParseResult<'t, SignatureType> {
    let start = p;
    let mut p = p;

    p.require(p.quiet().parse_token(TokenKind::Proc))?;
    p.arm("parsing procedure signature");

    p.require(p.parse_token(TokenKind::OpenParen))?;

    let mut parameters = vec![];
    let mut is_vararg = false;
    let mut require_close = false;

    loop {
        if require_close {
            p.require(p.parse_token(TokenKind::CloseParen))?;
            break;
        }

        if p.attempt(p.quiet().parse_token(TokenKind::CloseParen))?.is_some() {
            break;
        }

        if p.attempt(p.quiet().parse_token(TokenKind::Ellipsis))?.is_some() {
            is_vararg = true;
            require_close = true;
            continue;
        }

        parameters.push(p.require(parse_decl(p))?);

        if p.attempt(p.quiet().parse_token(TokenKind::Comma))?.is_none() {
            require_close = true;
        }
    }

    // Omitted return type means void
    let return_type = p.attempt(parse_type(p.quiet()))?.map(Box::new);

    let span = p.span_from(&start);
    Ok((
        p,
        SignatureType {
            parameters,
            return_type,
            is_vararg,
            span,
        },
    ))
}
