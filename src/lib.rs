#![allow(clippy::module_inception)]

use std::rc::Rc;

use crate::{
    errors::errors::{Error, ErrorTip},
    nodes::nodes::{Graph, NodeId},
};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod lowering;
pub mod macros;
pub mod nodes;
pub mod parser;
pub mod type_checker;

extern crate regex;

#[derive(Debug, Clone)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }
}

#[derive(Debug, Clone)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Runs the whole front end over `source`.
///
/// # Returns
///
/// The type checked graph and the id of its module node, or the first error.
pub fn compile(
    source: &str,
    file: Option<String>,
    emit_diagnostics: bool,
) -> Result<(Graph, NodeId), Error> {
    let tokens = lexer::lexer::tokenize(source, file)?;
    let module = parser::parser::parse(&tokens)?;
    let (mut graph, root) = lowering::lowering::lower(&module)?;

    type_checker::type_checker::type_check(&mut graph, root, emit_diagnostics)?;

    Ok((graph, root))
}

/// Finds the line containing byte offset `position`.
///
/// # Returns
///
/// The 1-based line number, the line itself and the offset inside the line.
/// Offsets past the end point just behind the last line.
pub fn get_line_at_position(source: &str, position: u32) -> (usize, String, usize) {
    let pos = position as usize;

    let mut start = 0;
    let mut line_number = 1;

    for line in source.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            let line_pos = pos - start;
            return (line_number, line.to_string(), line_pos);
        }

        start = end;
        line_number += 1;
    }

    match source.split_inclusive('\n').last() {
        Some(line) if !line.ends_with('\n') => (line_number - 1, line.to_string(), line.len()),
        _ => (line_number, String::new(), 0),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    const SOURCE: &str = "Hello, world!\n\nmain := proc() {\n    Testing { }\n}";

    #[test]
    fn test_get_line_at_position() {
        let (line_number, line, line_pos) = super::get_line_at_position(SOURCE, 10);
        assert_eq!(line_number, 1);
        assert_eq!(line, "Hello, world!\n");
        assert_eq!(line_pos, 10);

        let (line_number, line, line_pos) = super::get_line_at_position(SOURCE, 40);
        assert_eq!(line_number, 4);
        assert_eq!(line, "    Testing { }\n");
        assert_eq!(line_pos, 8);
    }

    #[test]
    fn test_position_at_end_of_input() {
        let (line_number, line, line_pos) = super::get_line_at_position(SOURCE, 49);
        assert_eq!(line_number, 5);
        assert_eq!(line, "}");
        assert_eq!(line_pos, 1);

        let (line_number, line, line_pos) = super::get_line_at_position("a := 1\n", 7);
        assert_eq!(line_number, 2);
        assert_eq!(line, "");
        assert_eq!(line_pos, 0);

        assert_eq!(super::get_line_at_position("", 0), (1, String::new(), 0));
    }

    #[test]
    fn test_compile() {
        assert!(super::compile("main := proc() { a := 1 }", None, false).is_ok());

        let error = super::compile("main := proc() { a := 1u + 1 }", None, false).unwrap_err();
        assert_eq!(error.get_error_name(), "MixedSignedness");

        let error = super::compile("main := proc() { a := $ }", None, false).unwrap_err();
        assert_eq!(error.get_error_name(), "UnrecognisedToken");
    }
}

pub fn display_error(error: &Error, source: &str, file: &str) {
    /*
        Error: name (tip)
        -> main.jang
           |
        20 | a := 1u + 1
           | -----^
    */

    let position = error.get_position();
    let (line, line_text, line_pos) = get_line_at_position(source, position.0);

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    if let ErrorTip::None = error.get_tip() {
        println!("Error: {}", error.get_error_name());
    } else {
        println!("Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    println!("-> {}", file);
    println!("{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    println!("{} | {}", line_string, line_text_removed.trim_end());

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;

    println!("{:>padding$} {:->arrows$}", "|", "^");
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let start = string
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .count();

    (String::from(&string[start..]), start)
}
