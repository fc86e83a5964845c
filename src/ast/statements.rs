use std::fmt::Display;

use crate::Span;

use super::{ast::Ast, expressions::BinaryOperator};

/// Pass an `__error(...)` fixture block is expected to fail in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilerErrorKind {
    Declaration,
    Typecheck,
}

impl Display for CompilerErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompilerErrorKind::Declaration => write!(f, "declaration"),
            CompilerErrorKind::Typecheck => write!(f, "typecheck"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BlockStmt {
    pub statements: Vec<Ast>,
    pub expected_error: Option<CompilerErrorKind>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct DeclarationStmt {
    pub name: String,
    pub specified_type: Option<Box<Ast>>,
    pub init_expression: Option<Box<Ast>>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub condition: Box<Ast>,
    pub then_block: BlockStmt,
    pub else_block: Option<BlockStmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct WhileStmt {
    pub condition: Box<Ast>,
    pub block: BlockStmt,
    pub span: Span,
}

/// `for i : begin : < end : step { ... }`
#[derive(Debug, Clone)]
pub struct ForStmt {
    pub iterator: String,
    pub begin: Option<Box<Ast>>,
    pub comparison: BinaryOperator,
    pub end: Box<Ast>,
    pub step: Option<Box<Ast>>,
    pub block: BlockStmt,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub expression: Option<Box<Ast>>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct LabelStmt {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct GotoStmt {
    pub label: String,
    pub span: Span,
}

/// Root of a compile unit: a flat list of top-level declarations.
#[derive(Debug, Clone)]
pub struct Module {
    pub declarations: Vec<DeclarationStmt>,
    pub span: Span,
}
