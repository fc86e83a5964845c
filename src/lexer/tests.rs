//! Unit tests for the lexer module.
//!
//! This module contains tests for tokenization including:
//! - Keywords and identifiers
//! - Numeric literals (decimal, hexadecimal, suffixed)
//! - String literals
//! - Operators and punctuation
//! - Comments
//! - Error cases

use super::{cursor::Cursor, lexer::tokenize, tokens::TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source, Some("test.jang".to_string()))
        .unwrap()
        .iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn test_tokenize_keywords() {
    let tokens = kinds("if else while for break continue return goto proc external true false");

    assert_eq!(
        tokens,
        vec![
            TokenKind::If,
            TokenKind::Else,
            TokenKind::While,
            TokenKind::For,
            TokenKind::Break,
            TokenKind::Continue,
            TokenKind::Return,
            TokenKind::Goto,
            TokenKind::Proc,
            TokenKind::External,
            TokenKind::True,
            TokenKind::False,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_identifiers() {
    let tokens = tokenize("foo baz_123 __error procedure", None).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value, "foo");
    assert_eq!(tokens[1].value, "baz_123");
    assert_eq!(tokens[2].kind, TokenKind::Identifier);
    assert_eq!(tokens[2].value, "__error");
    // Keywords only match whole words.
    assert_eq!(tokens[3].kind, TokenKind::Identifier);
    assert_eq!(tokens[4].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_numbers_keep_suffix_and_garbage() {
    let tokens = tokenize("42 3.14 0xAFFED00F 1u 2.5f 12abc", None).unwrap();

    let values: Vec<&str> = tokens.iter().map(|token| token.text()).collect();
    assert_eq!(values, vec!["42", "3.14", "0xAFFED00F", "1u", "2.5f", "12abc", "EOF"]);
    assert!(tokens[..6].iter().all(|token| token.kind == TokenKind::Number));
}

#[test]
fn test_tokenize_strings_keep_quotes_and_escapes() {
    let tokens = tokenize(r#""hello" "say \"hi\"\n""#, None).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, "\"hello\"");
    assert_eq!(tokens[1].kind, TokenKind::String);
    assert_eq!(tokens[1].value, r#""say \"hi\"\n""#);
}

#[test]
fn test_tokenize_operators() {
    let tokens = kinds("= == != < <= > >= << >> & && | || ^ + - * / % : , ... ( ) { } [ ]");

    assert_eq!(
        tokens,
        vec![
            TokenKind::Assignment,
            TokenKind::Equals,
            TokenKind::NotEquals,
            TokenKind::Less,
            TokenKind::LessEquals,
            TokenKind::Greater,
            TokenKind::GreaterEquals,
            TokenKind::ShiftLeft,
            TokenKind::ShiftRight,
            TokenKind::BitAnd,
            TokenKind::And,
            TokenKind::BitOr,
            TokenKind::Or,
            TokenKind::BitXor,
            TokenKind::Plus,
            TokenKind::Dash,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::Colon,
            TokenKind::Comma,
            TokenKind::Ellipsis,
            TokenKind::OpenParen,
            TokenKind::CloseParen,
            TokenKind::OpenCurly,
            TokenKind::CloseCurly,
            TokenKind::OpenBracket,
            TokenKind::CloseBracket,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_comments_are_tokens() {
    let tokens = tokenize("a // line\n/* outer /* inner */ still comment */ b", None).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[1].kind, TokenKind::Comment);
    assert_eq!(tokens[1].value, "// line");
    assert_eq!(tokens[2].kind, TokenKind::Comment);
    assert_eq!(tokens[2].value, "/* outer /* inner */ still comment */");
    assert_eq!(tokens[3].value, "b");
}

#[test]
fn test_unterminated_comment_is_an_error() {
    let error = tokenize("/* /* */", None).unwrap_err();
    assert_eq!(error.get_error_name(), "UnterminatedComment");
}

#[test]
fn test_unrecognised_character() {
    let error = tokenize("a := $", None).unwrap_err();
    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_position().0, 5);
}

#[test]
fn test_token_spans() {
    let tokens = tokenize("ab := 10", None).unwrap();

    assert_eq!(tokens[0].span.start.0, 0);
    assert_eq!(tokens[0].span.end.0, 2);
    assert_eq!(tokens[3].span.start.0, 6);
    assert_eq!(tokens[3].span.end.0, 8);
}

#[test]
fn test_cursor_snapshots() {
    let tokens = tokenize("a b", None).unwrap();
    let mut cursor = Cursor::new(&tokens);
    let snapshot = cursor;

    assert_eq!(cursor.advance().value, "a");
    assert_eq!(cursor.peek().value, "b");
    assert_eq!(snapshot.peek().value, "a");

    cursor.advance();
    assert_eq!(cursor.advance().kind, TokenKind::EOF);
    assert_eq!(cursor.advance().kind, TokenKind::EOF);
    assert_eq!(cursor.position(), 2);
}
