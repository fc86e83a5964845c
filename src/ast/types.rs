use crate::Span;

use super::{ast::Ast, statements::DeclarationStmt};

/// A named type. Only built-in names resolve during lowering.
#[derive(Debug, Clone)]
pub struct TypeIdentifier {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct PointerType {
    pub target: Box<Ast>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ArrayType {
    pub length: Box<Ast>,
    pub element: Box<Ast>,
    pub span: Span,
}

/// `proc(a: i64, ...) i64`. An omitted return type means `void`.
#[derive(Debug, Clone)]
pub struct SignatureType {
    pub parameters: Vec<DeclarationStmt>,
    pub return_type: Option<Box<Ast>>,
    pub is_vararg: bool,
    pub span: Span,
}
