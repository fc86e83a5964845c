use crate::{
    ast::{
        ast::Ast,
        statements::{
            BlockStmt, CompilerErrorKind, DeclarationStmt, ForStmt, GotoStmt, IfStmt, LabelStmt,
            Module, ReturnStmt, WhileStmt,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{
    expr::parse_expr,
    lookups::range_operator,
    parser::{Failure, ParseResult, Parser},
    types::parse_type,
};

/// Statements are tried in priority order; the first alternative that
/// recognises its leading token wins.
pub fn parse_statement<'t>(p: Parser<'t>) -> ParseResult<'t, Ast> {
    let start = p;
    let mut p = p;

    if let Some(declaration) = p.attempt(parse_decl(p.quiet()))? {
        return Ok((p, Ast::Declaration(declaration)));
    }

    if p.attempt(p.quiet().parse_token(TokenKind::If))?.is_some() {
        p.arm("parsing if statement");

        let condition = p.require(parse_expr(p))?;
        let then_block = p.require(parse_block(p, true))?;

        let else_block = if p.attempt(p.quiet().parse_token(TokenKind::Else))?.is_some() {
            Some(p.require(parse_block(p, true))?)
        } else {
            None
        };

        let span = p.span_from(&start);
        return Ok((
            p,
            Ast::If(IfStmt {
                condition: Box::new(condition),
                then_block,
                else_block,
                span,
            }),
        ));
    }

    if p.attempt(p.quiet().parse_token(TokenKind::While))?.is_some() {
        p.arm("parsing while loop");

        let condition = p.require(parse_expr(p))?;
        let block = p.require(parse_block(p, true))?;

        let span = p.span_from(&start);
        return Ok((
            p,
            Ast::While(WhileStmt {
                condition: Box::new(condition),
                block,
                span,
            }),
        ));
    }

    if p.attempt(p.quiet().parse_token(TokenKind::For))?.is_some() {
        p.arm("parsing for loop");
        let foa = parse_for_loop(&start, &mut p)?;
        return Ok((p, Ast::For(foa)));
    }

    if let Some(token) = p.attempt(p.quiet().parse_token(TokenKind::Break))? {
        return Ok((p, Ast::Break(token.span.clone())));
    }

    if let Some(token) = p.attempt(p.quiet().parse_token(TokenKind::Continue))? {
        return Ok((p, Ast::Continue(token.span.clone())));
    }

    if p.attempt(p.quiet().parse_token(TokenKind::Return))?.is_some() {
        p.arm("parsing return statement");

        // Empty return for void procedures
        let expression = p.attempt(parse_expr(p.quiet()))?.map(Box::new);

        let span = p.span_from(&start);
        return Ok((p, Ast::Return(ReturnStmt { expression, span })));
    }

    if p.attempt(p.quiet().parse_token(TokenKind::Colon))?.is_some() {
        p.arm("parsing label");

        let name = p.require(p.parse_token(TokenKind::Identifier))?.value.clone();

        let span = p.span_from(&start);
        return Ok((p, Ast::Label(LabelStmt { name, span })));
    }

    if p.attempt(p.quiet().parse_token(TokenKind::Goto))?.is_some() {
        p.arm("parsing goto statement");

        let label = p.require(p.parse_token(TokenKind::Identifier))?.value.clone();

        let span = p.span_from(&start);
        return Ok((p, Ast::Goto(GotoStmt { label, span })));
    }

    if let Some(block) = p.attempt(parse_block(p.quiet(), false))? {
        return Ok((p, Ast::Block(block)));
    }

    if let Some(block) = p.attempt(parse_compiler_error_block(p.quiet()))? {
        return Ok((p, Ast::Block(block)));
    }

    if let Some(expression) = p.attempt(parse_expr(p.quiet()))? {
        return Ok((p, expression));
    }

    p.error(&start, "Failed to parse statement")
}

// for := `for` ident `:` [begin] `:` range-op end [`:` step] block
fn parse_for_loop<'t>(start: &Parser<'t>, p: &mut Parser<'t>) -> Result<ForStmt, Failure> {
    let iterator = p.require(p.parse_token(TokenKind::Identifier))?.value.clone();
    p.require(p.parse_token(TokenKind::Colon))?;

    let begin = if p.peek().kind == TokenKind::Colon {
        None
    } else {
        Some(Box::new(p.require(parse_expr(*p))?))
    };

    p.require(p.parse_token(TokenKind::Colon))?;

    let operator = p.peek();
    let Some(comparison) = range_operator(operator.kind) else {
        return Err(Failure::Reported(Error::new(
            ErrorImpl::UnexpectedToken {
                expected: String::from("a range operator (`<`, `<=`, `>` or `>=`)"),
                received: operator.value.clone(),
            },
            operator.span.start.clone(),
        )));
    };
    p.next_token();

    let end = p.require(parse_expr(*p))?;

    let step = if p.attempt(p.quiet().parse_token(TokenKind::Colon))?.is_some() {
        Some(Box::new(p.require(parse_expr(*p))?))
    } else {
        None
    };

    let block = p.require(parse_block(*p, true))?;

    Ok(ForStmt {
        iterator,
        begin,
        comparison,
        end: Box::new(end),
        step,
        block,
        span: p.span_from(start),
    })
}

/// block := `{` statement* `}`, or a single raw statement when
/// `allow_raw_statement` is set.
pub fn parse_block<'t>(p: Parser<'t>, allow_raw_statement: bool) -> ParseResult<'t, BlockStmt> {
    let start = p;
    let mut p = p;

    if allow_raw_statement && p.peek().kind != TokenKind::OpenCurly {
        let statement = p.require(parse_statement(p))?;
        let span = p.span_from(&start);

        return Ok((
            p,
            BlockStmt {
                statements: vec![statement],
                expected_error: None,
                span,
            },
        ));
    }

    p.require(p.parse_token(TokenKind::OpenCurly))?;
    p.arm("parsing block");

    let mut statements = vec![];

    while p.attempt(p.quiet().parse_token(TokenKind::CloseCurly))?.is_none() {
        statements.push(p.require(parse_statement(p))?);
    }

    let span = p.span_from(&start);
    Ok((
        p,
        BlockStmt {
            statements,
            expected_error: None,
            span,
        },
    ))
}

/// `__error("declaration" | "typecheck") { ... }`
pub fn parse_compiler_error_block<'t>(p: Parser<'t>) -> ParseResult<'t, BlockStmt> {
    let start = p;
    let mut p = p;

    let token = p.require(p.quiet().parse_token(TokenKind::Identifier))?;
    if token.value != "__error" {
        return Err(Failure::Quiet);
    }

    p.arm("parsing compiler error block");

    p.require(p.parse_token(TokenKind::OpenParen))?;

    let mode_token = p.require(p.parse_token(TokenKind::String))?;
    let mode = &mode_token.value[1..mode_token.value.len() - 1];

    let kind = match mode {
        "declaration" => CompilerErrorKind::Declaration,
        "typecheck" => CompilerErrorKind::Typecheck,
        _ => {
            return Err(Failure::Reported(Error::new(
                ErrorImpl::InvalidErrorBlockMode {
                    mode: mode.to_string(),
                },
                mode_token.span.start.clone(),
            )))
        }
    };

    p.require(p.parse_token(TokenKind::CloseParen))?;

    let mut block = p.require(parse_block(p, false))?;
    block.expected_error = Some(kind);
    block.span = p.span_from(&start);

    Ok((p, block))
}

/// decl := ident `:` [type] [`=` expr]
///
/// Both parts may be missing here; the type checker rejects that case.
pub fn parse_decl<'t>(p: Parser<'t>) -> ParseResult<'t, DeclarationStmt> {
    let start = p;
    let mut p = p;

    let name = p.require(p.parse_token(TokenKind::Identifier))?.value.clone();
    p.require(p.parse_token(TokenKind::Colon))?;

    p.arm("parsing declaration");

    let specified_type = p.attempt(parse_type(p.quiet()))?.map(Box::new);

    let init_expression = if p.attempt(p.quiet().parse_token(TokenKind::Assignment))?.is_some() {
        Some(Box::new(p.require(parse_expr(p))?))
    } else {
        None
    };

    let span = p.span_from(&start);
    Ok((
        p,
        DeclarationStmt {
            name,
            specified_type,
            init_expression,
            span,
        },
    ))
}

/// program := decl* EOF
pub fn parse_module<'t>(p: Parser<'t>) -> ParseResult<'t, Module> {
    let start = p;
    let mut p = p;

    p.arm("parsing module");

    let mut declarations = vec![];

    while p.peek().kind != TokenKind::EOF {
        declarations.push(p.require(parse_decl(p))?);
    }

    let span = p.span_from(&start);
    Ok((p, Module { declarations, span }))
}
