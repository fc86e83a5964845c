use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::{ast::expressions::BinaryOperator, lexer::tokens::TokenKind};

/// Binding strength of a binary operator; higher binds tighter.
pub type Precedence = u8;

lazy_static! {
    pub static ref BINARY_OPERATOR_LOOKUP: HashMap<TokenKind, (BinaryOperator, Precedence)> = {
        let mut map = HashMap::new();

        // Multiplicative
        map.insert(TokenKind::Star, (BinaryOperator::Multiply, 11));
        map.insert(TokenKind::Slash, (BinaryOperator::Divide, 11));
        map.insert(TokenKind::Percent, (BinaryOperator::Modulo, 11));

        // Additive
        map.insert(TokenKind::Plus, (BinaryOperator::Add, 10));
        map.insert(TokenKind::Dash, (BinaryOperator::Subtract, 10));

        // Shifts
        map.insert(TokenKind::ShiftLeft, (BinaryOperator::ShiftLeft, 9));
        map.insert(TokenKind::ShiftRight, (BinaryOperator::ShiftRight, 9));

        // Relational
        map.insert(TokenKind::Less, (BinaryOperator::Less, 8));
        map.insert(TokenKind::Greater, (BinaryOperator::Greater, 8));
        map.insert(TokenKind::LessEquals, (BinaryOperator::LessEquals, 8));
        map.insert(TokenKind::GreaterEquals, (BinaryOperator::GreaterEquals, 8));
        map.insert(TokenKind::Equals, (BinaryOperator::Equals, 7));
        map.insert(TokenKind::NotEquals, (BinaryOperator::NotEquals, 7));

        // Bitwise
        map.insert(TokenKind::BitAnd, (BinaryOperator::BitAnd, 6));
        map.insert(TokenKind::BitXor, (BinaryOperator::BitXor, 5));
        map.insert(TokenKind::BitOr, (BinaryOperator::BitOr, 4));

        // Logical
        map.insert(TokenKind::And, (BinaryOperator::And, 3));
        map.insert(TokenKind::Or, (BinaryOperator::Or, 2));

        map.insert(TokenKind::Assignment, (BinaryOperator::Assign, 1));
        map
    };
}

pub fn binary_operator(kind: TokenKind) -> Option<(BinaryOperator, Precedence)> {
    BINARY_OPERATOR_LOOKUP.get(&kind).copied()
}

/// Operators allowed between the bounds of a `for` loop.
pub fn range_operator(kind: TokenKind) -> Option<BinaryOperator> {
    match kind {
        TokenKind::Less => Some(BinaryOperator::Less),
        TokenKind::LessEquals => Some(BinaryOperator::LessEquals),
        TokenKind::Greater => Some(BinaryOperator::Greater),
        TokenKind::GreaterEquals => Some(BinaryOperator::GreaterEquals),
        _ => None,
    }
}
