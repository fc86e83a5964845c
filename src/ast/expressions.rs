use std::fmt::Display;

use crate::Span;

use super::{ast::Ast, statements::BlockStmt, types::SignatureType};

/// Payload of a literal, decided while parsing its text.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Int(u64),
    F32(f32),
    F64(f64),
    Bool(bool),
    Str(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralSuffix {
    None,
    /// `u`
    Unsigned,
    /// `f`
    Float,
}

#[derive(Debug, Clone)]
pub struct LiteralExpr {
    pub value: LiteralValue,
    pub suffix: LiteralSuffix,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct IdentifierExpr {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Multiply,
    Divide,
    Modulo,
    Add,
    Subtract,
    ShiftLeft,
    ShiftRight,
    Less,
    Greater,
    LessEquals,
    GreaterEquals,
    Equals,
    NotEquals,
    BitAnd,
    BitXor,
    BitOr,
    And,
    Or,
    Assign,
}

/// The rule set the type checker applies to an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorCategory {
    Arithmetic,
    Bitwise,
    Comparison,
    ShortCircuit,
    Assignment,
}

impl BinaryOperator {
    pub fn category(&self) -> OperatorCategory {
        match self {
            BinaryOperator::Multiply
            | BinaryOperator::Divide
            | BinaryOperator::Modulo
            | BinaryOperator::Add
            | BinaryOperator::Subtract => OperatorCategory::Arithmetic,
            BinaryOperator::ShiftLeft
            | BinaryOperator::ShiftRight
            | BinaryOperator::BitAnd
            | BinaryOperator::BitXor
            | BinaryOperator::BitOr => OperatorCategory::Bitwise,
            BinaryOperator::Less
            | BinaryOperator::Greater
            | BinaryOperator::LessEquals
            | BinaryOperator::GreaterEquals
            | BinaryOperator::Equals
            | BinaryOperator::NotEquals => OperatorCategory::Comparison,
            BinaryOperator::And | BinaryOperator::Or => OperatorCategory::ShortCircuit,
            BinaryOperator::Assign => OperatorCategory::Assignment,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::ShiftLeft => "<<",
            BinaryOperator::ShiftRight => ">>",
            BinaryOperator::Less => "<",
            BinaryOperator::Greater => ">",
            BinaryOperator::LessEquals => "<=",
            BinaryOperator::GreaterEquals => ">=",
            BinaryOperator::Equals => "==",
            BinaryOperator::NotEquals => "!=",
            BinaryOperator::BitAnd => "&",
            BinaryOperator::BitXor => "^",
            BinaryOperator::BitOr => "|",
            BinaryOperator::And => "&&",
            BinaryOperator::Or => "||",
            BinaryOperator::Assign => "=",
        }
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub operator: BinaryOperator,
    pub left: Box<Ast>,
    pub right: Box<Ast>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct CallExpr {
    pub callee: Box<Ast>,
    pub arguments: Vec<Ast>,
    pub span: Span,
}

/// A procedure literal. `body` is `None` for `external` procedures.
#[derive(Debug, Clone)]
pub struct ProcedureExpr {
    pub signature: SignatureType,
    pub body: Option<BlockStmt>,
    pub span: Span,
}
