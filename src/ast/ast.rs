use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::Span;

use super::{
    expressions::{
        BinaryExpr, CallExpr, IdentifierExpr, LiteralExpr, LiteralSuffix, LiteralValue,
        ProcedureExpr,
    },
    statements::{
        BlockStmt, DeclarationStmt, ForStmt, GotoStmt, IfStmt, LabelStmt, ReturnStmt, WhileStmt,
    },
    types::{ArrayType, PointerType, SignatureType, TypeIdentifier},
};

/// Every syntactic construct of the language.
///
/// Children are owned, so the AST is a plain tree. Matches over `Ast` are
/// exhaustive everywhere, adding a variant has to be handled by the
/// lowering pass before the crate compiles again.
#[derive(Debug, Clone)]
pub enum Ast {
    Literal(LiteralExpr),
    Identifier(IdentifierExpr),
    BinaryOperator(BinaryExpr),
    ProcedureCall(CallExpr),
    Procedure(ProcedureExpr),
    ProcedureSignature(SignatureType),

    Block(BlockStmt),
    Declaration(DeclarationStmt),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    Break(Span),
    Continue(Span),
    Return(ReturnStmt),
    Label(LabelStmt),
    Goto(GotoStmt),

    TypeIdentifier(TypeIdentifier),
    PointerType(PointerType),
    ArrayType(ArrayType),
}

impl Ast {
    pub fn get_span(&self) -> &Span {
        match self {
            Ast::Literal(literal) => &literal.span,
            Ast::Identifier(identifier) => &identifier.span,
            Ast::BinaryOperator(binary) => &binary.span,
            Ast::ProcedureCall(call) => &call.span,
            Ast::Procedure(procedure) => &procedure.span,
            Ast::ProcedureSignature(signature) => &signature.span,
            Ast::Block(block) => &block.span,
            Ast::Declaration(declaration) => &declaration.span,
            Ast::If(yf) => &yf.span,
            Ast::While(whyle) => &whyle.span,
            Ast::For(foa) => &foa.span,
            Ast::Break(span) | Ast::Continue(span) => span,
            Ast::Return(retyrn) => &retyrn.span,
            Ast::Label(label) => &label.span,
            Ast::Goto(goto) => &goto.span,
            Ast::TypeIdentifier(identifier) => &identifier.span,
            Ast::PointerType(pointer) => &pointer.span,
            Ast::ArrayType(array) => &array.span,
        }
    }
}

// Compact s-expression rendering, used by the tests and trace output.

fn write_optional(f: &mut Formatter<'_>, node: &Option<Box<Ast>>) -> FmtResult {
    match node {
        Some(node) => write!(f, " {}", node),
        None => write!(f, " _"),
    }
}

impl Display for LiteralExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.value {
            LiteralValue::Int(value) => write!(f, "{}", value)?,
            LiteralValue::F32(value) => write!(f, "{:?}", value)?,
            LiteralValue::F64(value) => write!(f, "{:?}", value)?,
            LiteralValue::Bool(value) => write!(f, "{}", value)?,
            LiteralValue::Str(value) => write!(f, "{:?}", value)?,
        }

        match self.suffix {
            LiteralSuffix::None => Ok(()),
            LiteralSuffix::Unsigned => write!(f, "u"),
            LiteralSuffix::Float => write!(f, "f"),
        }
    }
}

impl Display for BlockStmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if let Some(kind) = self.expected_error {
            write!(f, "__error({}) ", kind)?;
        }

        write!(f, "{{")?;
        for statement in &self.statements {
            write!(f, " {}", statement)?;
        }
        write!(f, " }}")
    }
}

impl Display for DeclarationStmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "(decl {}", self.name)?;
        write_optional(f, &self.specified_type)?;
        write_optional(f, &self.init_expression)?;
        write!(f, ")")
    }
}

impl Display for SignatureType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "(signature (")?;
        for (i, parameter) in self.parameters.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", parameter)?;
        }
        if self.is_vararg {
            write!(f, " ...")?;
        }
        write!(f, ")")?;
        write_optional(f, &self.return_type)?;
        write!(f, ")")
    }
}

impl Display for Ast {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Ast::Literal(literal) => write!(f, "{}", literal),
            Ast::Identifier(identifier) => write!(f, "{}", identifier.name),
            Ast::BinaryOperator(binary) => {
                write!(f, "({} {} {})", binary.operator, binary.left, binary.right)
            }
            Ast::ProcedureCall(call) => {
                write!(f, "(call {}", call.callee)?;
                for argument in &call.arguments {
                    write!(f, " {}", argument)?;
                }
                write!(f, ")")
            }
            Ast::Procedure(procedure) => match &procedure.body {
                Some(body) => write!(f, "(proc {} {})", procedure.signature, body),
                None => write!(f, "(proc {} external)", procedure.signature),
            },
            Ast::ProcedureSignature(signature) => write!(f, "{}", signature),
            Ast::Block(block) => write!(f, "{}", block),
            Ast::Declaration(declaration) => write!(f, "{}", declaration),
            Ast::If(yf) => {
                write!(f, "(if {} {}", yf.condition, yf.then_block)?;
                if let Some(else_block) = &yf.else_block {
                    write!(f, " {}", else_block)?;
                }
                write!(f, ")")
            }
            Ast::While(whyle) => write!(f, "(while {} {})", whyle.condition, whyle.block),
            Ast::For(foa) => {
                write!(f, "(for {}", foa.iterator)?;
                write_optional(f, &foa.begin)?;
                write!(f, " {} {}", foa.comparison, foa.end)?;
                write_optional(f, &foa.step)?;
                write!(f, " {})", foa.block)
            }
            Ast::Break(_) => write!(f, "(break)"),
            Ast::Continue(_) => write!(f, "(continue)"),
            Ast::Return(retyrn) => match &retyrn.expression {
                Some(expression) => write!(f, "(return {})", expression),
                None => write!(f, "(return)"),
            },
            Ast::Label(label) => write!(f, "(label {})", label.name),
            Ast::Goto(goto) => write!(f, "(goto {})", goto.label),
            Ast::TypeIdentifier(identifier) => write!(f, "{}", identifier.name),
            Ast::PointerType(pointer) => write!(f, "*{}", pointer.target),
            Ast::ArrayType(array) => write!(f, "[{}]{}", array.length, array.element),
        }
    }
}
