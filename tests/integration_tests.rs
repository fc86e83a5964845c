//! Integration tests for the whole front end.
//!
//! These run source text through tokenizing, parsing, lowering and type
//! checking via the public `compile` entry point.

use std::rc::Rc;

use jangc::{
    compile, display_error,
    errors::errors::{Error, ErrorImpl},
    get_line_at_position,
    nodes::nodes::{Graph, NodeId, NodeKind},
    Position,
};
use pretty_assertions::assert_eq;

fn error_of(source: &str) -> ErrorImpl {
    compile(source, Some("test.jang".to_string()), false)
        .unwrap_err()
        .get_impl()
        .clone()
}

fn main_body(graph: &Graph, root: NodeId) -> NodeId {
    let NodeKind::Module { block } = graph.kind(root) else {
        panic!("expected a module");
    };
    let main = graph
        .find_declaration(Some(*block), "main")
        .expect("main is declared");
    let NodeKind::Declaration {
        init_expression, ..
    } = graph.kind(main)
    else {
        panic!("expected a declaration");
    };
    let NodeKind::Procedure {
        body: Some(body), ..
    } = graph.kind(*init_expression)
    else {
        panic!("expected a procedure with a body");
    };
    *body
}

#[test]
fn test_compile_simple_program() {
    let (graph, root) = compile("main := proc() { a := 1 }", None, false).unwrap();

    let body = main_body(&graph, root);
    let a = graph.find_declaration(Some(body), "a").unwrap();
    let ty = graph.declaration_type(a).unwrap();
    assert_eq!(graph.type_to_string(ty), "i64");
}

#[test]
fn test_declaration_errors() {
    assert_eq!(
        error_of("main := proc() { x := 1  x := 2 }"),
        ErrorImpl::DuplicateDeclaration {
            name: "x".to_string()
        }
    );
    assert_eq!(
        error_of("main := proc() { x: i8 = true }"),
        ErrorImpl::DeclarationTypeMismatch {
            specified: "i8".to_string(),
            inferred: "bool".to_string(),
        }
    );
}

#[test]
fn test_calls() {
    let add = "add := proc(a: i64, b: i64) i64 { return a + b }\n";

    assert!(compile(&format!("{}main := proc() {{ c := add(1, 2) }}", add), None, false).is_ok());
    assert_eq!(
        error_of(&format!("{}main := proc() {{ add(1) }}", add)),
        ErrorImpl::ArgumentCountMismatch {
            expected: 2,
            received: 1,
        }
    );
    assert_eq!(
        error_of(&format!("{}main := proc() {{ add(1, true) }}", add)),
        ErrorImpl::ArgumentTypeMismatch {
            argument: "b".to_string(),
            expected: "i64".to_string(),
            received: "bool".to_string(),
        }
    );
}

#[test]
fn test_compiler_error_blocks() {
    let source = r#"main := proc() {
        __error("typecheck") { y: i8 = true }
        __error("declaration") { x := 2  x := 3 }
    }"#;
    assert!(compile(source, None, false).is_ok());

    assert_eq!(
        error_of(r#"main := proc() { __error("typecheck") { x := 1 } }"#),
        ErrorImpl::ExpectedCompilerError {
            kind: "typecheck".to_string()
        }
    );
}

#[test]
fn test_control_flow() {
    let source = "fact := proc(n: i64) i64 {
        if n < 2 return 1
        return n * fact(n - 1)
    }
    main := proc() {
        for i : 0 : < 10 {
            if i == 5 break
            while false { continue }
        }
        goto end
        :end
    }";
    assert!(compile(source, None, false).is_ok());

    assert_eq!(
        error_of("main := proc() { break }"),
        ErrorImpl::BreakOutsideLoop {
            keyword: "break".to_string()
        }
    );
    assert_eq!(
        error_of("main := proc() { goto nowhere }"),
        ErrorImpl::UnknownLabel {
            label: "nowhere".to_string()
        }
    );
}

#[test]
fn test_front_end_errors() {
    let error = compile("main := proc() { if { } }", None, false).unwrap_err();
    assert_eq!(error.get_error_name(), "ParseFailure");
    assert_eq!(error.get_position().0, 20);

    assert_eq!(
        error_of("main := proc() { a: str = 1 }"),
        ErrorImpl::UnknownType {
            type_: "str".to_string()
        }
    );
}

#[test]
fn test_display_error_at_end_of_input() {
    let source = "main := proc() {\n    a := 1u + 1\n}\n";
    let error = compile(source, Some("test.jang".to_string()), false).unwrap_err();
    assert_eq!(get_line_at_position(source, error.get_position().0).0, 2);
    display_error(&error, source, "test.jang");

    let past_end = Error::new(
        ErrorImpl::UnterminatedComment,
        Position(source.len() as u32 + 5, Rc::new("test.jang".to_string())),
    );
    assert_eq!(
        get_line_at_position(source, past_end.get_position().0),
        (3, String::new(), 0)
    );
    display_error(&past_end, source, "test.jang");
}

#[test]
fn test_driver_prints_one_diagnostic_for_a_type_error() {
    let path = std::env::temp_dir().join(format!("jangc_duplicate_{}.jang", std::process::id()));
    std::fs::write(&path, "main := proc() {\n    x := 1\n    x := 2\n}\n").unwrap();

    let output = std::process::Command::new(env!("CARGO_BIN_EXE_jangc"))
        .arg(&path)
        .env_remove("RUST_LOG")
        .env_remove("JANGC_QUIET")
        .output()
        .unwrap();
    let _ = std::fs::remove_file(&path);

    assert!(!output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let combined = format!("{}{}", stdout, stderr);

    let headers: Vec<&str> = combined
        .lines()
        .filter(|line| line.starts_with("Error: "))
        .collect();
    assert_eq!(headers.len(), 1);
    assert!(headers[0].starts_with("Error: DuplicateDeclaration"));
    assert_eq!(combined.matches("duplicate declaration").count(), 0);
    assert!(!combined.contains("ERROR"));
}
