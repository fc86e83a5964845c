use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    /// Declaration errors are the ones an `__error("declaration")` fixture
    /// expects: names that clash or cannot be found.
    pub fn is_declaration_error(&self) -> bool {
        matches!(
            self.internal_error,
            ErrorImpl::DuplicateDeclaration { .. }
                | ErrorImpl::UnresolvedIdentifier { .. }
                | ErrorImpl::DuplicateLabel { .. }
                | ErrorImpl::UnknownLabel { .. }
        )
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnterminatedComment => "UnterminatedComment",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::ParseFailure { .. } => "ParseFailure",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::InvalidEscapeSequence { .. } => "InvalidEscapeSequence",
            ErrorImpl::InvalidErrorBlockMode { .. } => "InvalidErrorBlockMode",
            ErrorImpl::UnknownType { .. } => "UnknownType",
            ErrorImpl::DuplicateDeclaration { .. } => "DuplicateDeclaration",
            ErrorImpl::UnresolvedIdentifier { .. } => "UnresolvedIdentifier",
            ErrorImpl::UsedBeforeTyped { .. } => "UsedBeforeTyped",
            ErrorImpl::MissingDeclarationType { .. } => "MissingDeclarationType",
            ErrorImpl::InvalidOperandKind { .. } => "InvalidOperandKind",
            ErrorImpl::NonNumericOperands { .. } => "NonNumericOperands",
            ErrorImpl::MixedSignedness { .. } => "MixedSignedness",
            ErrorImpl::NonUnsignedBitwiseOperands { .. } => "NonUnsignedBitwiseOperands",
            ErrorImpl::NonBooleanOperand { .. } => "NonBooleanOperand",
            ErrorImpl::ComparisonMismatch { .. } => "ComparisonMismatch",
            ErrorImpl::AssignmentMismatch { .. } => "AssignmentMismatch",
            ErrorImpl::DeclarationTypeMismatch { .. } => "DeclarationTypeMismatch",
            ErrorImpl::MainSignatureMismatch { .. } => "MainSignatureMismatch",
            ErrorImpl::NotCallable { .. } => "NotCallable",
            ErrorImpl::ArgumentCountMismatch { .. } => "ArgumentCountMismatch",
            ErrorImpl::ArgumentTypeMismatch { .. } => "ArgumentTypeMismatch",
            ErrorImpl::ReturnTypeMismatch { .. } => "ReturnTypeMismatch",
            ErrorImpl::ReturnOutsideProcedure => "ReturnOutsideProcedure",
            ErrorImpl::BreakOutsideLoop { .. } => "BreakOutsideLoop",
            ErrorImpl::DuplicateLabel { .. } => "DuplicateLabel",
            ErrorImpl::UnknownLabel { .. } => "UnknownLabel",
            ErrorImpl::LoopBoundMismatch { .. } => "LoopBoundMismatch",
            ErrorImpl::InvalidCast { .. } => "InvalidCast",
            ErrorImpl::ExpectedCompilerError { .. } => "ExpectedCompilerError",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnterminatedComment => {
                ErrorTip::Suggestion(String::from("Multi-line comment is never closed with `*/`"))
            }
            ErrorImpl::UnexpectedToken { expected, received } => ErrorTip::Suggestion(format!(
                "Expected {}, received `{}`",
                expected, received
            )),
            ErrorImpl::ParseFailure { context, message } => {
                ErrorTip::Suggestion(format!("{} (while {})", message, context))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::InvalidEscapeSequence { sequence } => {
                ErrorTip::Suggestion(format!("Unknown escape sequence `\\{}`", sequence))
            }
            ErrorImpl::InvalidErrorBlockMode { mode } => ErrorTip::Suggestion(format!(
                "Expected the mode to be either `declaration` or `typecheck`, got `{}`",
                mode
            )),
            ErrorImpl::UnknownType { type_ } => ErrorTip::Suggestion(format!(
                "Type `{}` not found (custom type names are not implemented yet)",
                type_
            )),
            ErrorImpl::DuplicateDeclaration { name } => {
                ErrorTip::Suggestion(format!("`{}` is already declared in this block", name))
            }
            ErrorImpl::UnresolvedIdentifier { name } => {
                ErrorTip::Suggestion(format!("Could not find the declaration of `{}`", name))
            }
            ErrorImpl::UsedBeforeTyped { name } => ErrorTip::Suggestion(format!(
                "`{}` is used inside its own initializer",
                name
            )),
            ErrorImpl::MissingDeclarationType { name } => ErrorTip::Suggestion(format!(
                "Declaration of `{}` needs a type or an init expression",
                name
            )),
            ErrorImpl::InvalidOperandKind { side, received } => ErrorTip::Suggestion(format!(
                "Invalid kind of type for {} operand: `{}`",
                side, received
            )),
            ErrorImpl::NonNumericOperands { left, right } => ErrorTip::Suggestion(format!(
                "Arithmetic operators require numerical operands, received `{}` and `{}`",
                left, right
            )),
            ErrorImpl::MixedSignedness { left, right } => ErrorTip::Suggestion(format!(
                "Arithmetic on `{}` and `{}` mixes signedness, cast the operands to the same type",
                left, right
            )),
            ErrorImpl::NonUnsignedBitwiseOperands { left, right } => ErrorTip::Suggestion(format!(
                "Bitwise operators require unsigned integer operands, received `{}` and `{}`",
                left, right
            )),
            ErrorImpl::NonBooleanOperand { side, received } => ErrorTip::Suggestion(format!(
                "The {} side is `{}`, not a boolean expression",
                side, received
            )),
            ErrorImpl::ComparisonMismatch { left, right } => ErrorTip::Suggestion(format!(
                "Only expressions of the same type can be compared (`{}` vs. `{}`)",
                left, right
            )),
            ErrorImpl::AssignmentMismatch { left, right } => ErrorTip::Suggestion(format!(
                "Assignment type mismatch (left side `{}` vs. right side `{}`)",
                left, right
            )),
            ErrorImpl::DeclarationTypeMismatch { specified, inferred } => {
                ErrorTip::Suggestion(format!(
                    "Specified type `{}` does not match the inferred type `{}`",
                    specified, inferred
                ))
            }
            ErrorImpl::MainSignatureMismatch { expected, received } => {
                ErrorTip::Suggestion(format!(
                    "The main procedure must be of type `{}`, received `{}`",
                    expected, received
                ))
            }
            ErrorImpl::NotCallable { received } => {
                ErrorTip::Suggestion(format!("Expression of type `{}` is not callable", received))
            }
            ErrorImpl::ArgumentCountMismatch { expected, received } => {
                ErrorTip::Suggestion(format!(
                    "Expected {} arguments, received {}",
                    expected, received
                ))
            }
            ErrorImpl::ArgumentTypeMismatch {
                argument,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "Wrong type passed for argument `{}` (expected `{}`, received `{}`)",
                argument, expected, received
            )),
            ErrorImpl::ReturnTypeMismatch { expected, received } => ErrorTip::Suggestion(format!(
                "Expected return type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::ReturnOutsideProcedure => {
                ErrorTip::Suggestion(String::from("`return` can only be used inside a procedure"))
            }
            ErrorImpl::BreakOutsideLoop { keyword } => {
                ErrorTip::Suggestion(format!("`{}` can only be used inside a loop", keyword))
            }
            ErrorImpl::DuplicateLabel { label } => {
                ErrorTip::Suggestion(format!("Label `{}` is already defined in this procedure", label))
            }
            ErrorImpl::UnknownLabel { label } => {
                ErrorTip::Suggestion(format!("No label `{}` in this procedure", label))
            }
            ErrorImpl::LoopBoundMismatch { iterator, received } => ErrorTip::Suggestion(format!(
                "Loop bound of type `{}` does not match the iterator type `{}`",
                received, iterator
            )),
            ErrorImpl::InvalidCast { from, to } => ErrorTip::Suggestion(format!(
                "Cannot cast `{}` to `{}`, only casts between numerical types are implemented",
                from, to
            )),
            ErrorImpl::ExpectedCompilerError { kind } => ErrorTip::Suggestion(format!(
                "This block was expected to fail with a {} error",
                kind
            )),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.internal_error)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Lexing
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unterminated multi-line comment")]
    UnterminatedComment,

    // Parsing
    #[error("expected {expected}, received {received:?}")]
    UnexpectedToken { expected: String, received: String },
    #[error("{message} ({context})")]
    ParseFailure { context: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("invalid escape sequence: \\{sequence}")]
    InvalidEscapeSequence { sequence: char },
    #[error("invalid compiler error block mode {mode:?}")]
    InvalidErrorBlockMode { mode: String },

    // Lowering
    #[error("unknown type {type_} found")]
    UnknownType { type_: String },

    // Type checking
    #[error("duplicate declaration of {name:?}")]
    DuplicateDeclaration { name: String },
    #[error("could not find the declaration of identifier {name:?}")]
    UnresolvedIdentifier { name: String },
    #[error("identifier {name:?} used before its type is known")]
    UsedBeforeTyped { name: String },
    #[error("declaration of {name:?} has neither a type nor an init expression")]
    MissingDeclarationType { name: String },
    #[error("invalid kind of type for {side} operand: {received}")]
    InvalidOperandKind { side: String, received: String },
    #[error("arithmetic operands must be numerical: {left} and {right}")]
    NonNumericOperands { left: String, right: String },
    #[error("arithmetic on different signedness: {left} and {right}")]
    MixedSignedness { left: String, right: String },
    #[error("bitwise operands must be unsigned integers: {left} and {right}")]
    NonUnsignedBitwiseOperands { left: String, right: String },
    #[error("{side} side is not a boolean expression: {received}")]
    NonBooleanOperand { side: String, received: String },
    #[error("cannot compare {left} with {right}")]
    ComparisonMismatch { left: String, right: String },
    #[error("assignment type mismatch (left side {left} vs. right side {right})")]
    AssignmentMismatch { left: String, right: String },
    #[error("declared type {specified} does not match inferred type {inferred}")]
    DeclarationTypeMismatch { specified: String, inferred: String },
    #[error("main must be of type {expected}, received {received}")]
    MainSignatureMismatch { expected: String, received: String },
    #[error("expression of type {received} is not callable")]
    NotCallable { received: String },
    #[error("wrong argument count: expected {expected:?}, received {received:?}")]
    ArgumentCountMismatch { expected: usize, received: usize },
    #[error("wrong type for argument {argument:?}: expected {expected}, received {received}")]
    ArgumentTypeMismatch {
        argument: String,
        expected: String,
        received: String,
    },
    #[error("return type mismatch: expected {expected}, received {received}")]
    ReturnTypeMismatch { expected: String, received: String },
    #[error("return statement outside of a procedure")]
    ReturnOutsideProcedure,
    #[error("{keyword} outside of a loop")]
    BreakOutsideLoop { keyword: String },
    #[error("duplicate label {label:?}")]
    DuplicateLabel { label: String },
    #[error("goto to unknown label {label:?}")]
    UnknownLabel { label: String },
    #[error("loop bound of type {received} does not match iterator type {iterator}")]
    LoopBoundMismatch { iterator: String, received: String },
    #[error("invalid cast from {from} to {to}")]
    InvalidCast { from: String, to: String },
    #[error("expected a {kind} error inside compiler error block")]
    ExpectedCompilerError { kind: String },
}

/// Aborts on a broken front-end invariant. These are defects in the compiler
/// itself, never in user source, so they are not reported as `Error`s.
#[track_caller]
pub fn internal_error(message: &str) -> ! {
    panic!("internal compiler error: {}", message)
}
