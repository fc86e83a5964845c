//! Unit tests for the type checker.
//!
//! Most tests go through the whole front end and look at the resulting
//! types or at the error that stopped the pass.

use std::collections::HashMap;

use pretty_assertions::assert_eq;

use crate::{
    ast::expressions::{LiteralSuffix, LiteralValue},
    errors::errors::{Error, ErrorImpl},
    lexer::lexer::tokenize,
    lowering::lowering::lower,
    nodes::nodes::{Graph, NodeId, NodeKind},
    parser::parser::parse,
    Position, Span,
};

use super::type_checker::{type_check, TypeChecker};

fn check_source(source: &str) -> Result<(Graph, NodeId), Error> {
    let tokens = tokenize(source, Some("test.jang".to_string())).unwrap();
    let module = parse(&tokens).unwrap();
    let (mut graph, root) = lower(&module).unwrap();

    type_check(&mut graph, root, false)?;
    Ok((graph, root))
}

fn error_of(source: &str) -> ErrorImpl {
    check_source(source).unwrap_err().get_impl().clone()
}

fn statements(graph: &Graph, block: NodeId) -> Vec<NodeId> {
    match graph.kind(block) {
        NodeKind::Block { statements, .. } => statements.clone(),
        other => panic!("expected a block, got {:?}", other),
    }
}

fn top_level(graph: &Graph, root: NodeId) -> Vec<NodeId> {
    match graph.kind(root) {
        NodeKind::Module { block } => statements(graph, *block),
        other => panic!("expected a module, got {:?}", other),
    }
}

fn init_of(graph: &Graph, declaration: NodeId) -> NodeId {
    match graph.kind(declaration) {
        NodeKind::Declaration {
            init_expression, ..
        } => *init_expression,
        other => panic!("expected a declaration, got {:?}", other),
    }
}

fn body_of(graph: &Graph, declaration: NodeId) -> NodeId {
    match graph.kind(init_of(graph, declaration)) {
        NodeKind::Procedure {
            body: Some(body), ..
        } => *body,
        other => panic!("expected a procedure with a body, got {:?}", other),
    }
}

/// Type of `expression` used as the initializer of a top-level declaration.
fn type_of(expression: &str) -> Result<String, Error> {
    let (graph, root) = check_source(&format!("x := {}", expression))?;
    let init = init_of(&graph, top_level(&graph, root)[0]);
    Ok(graph.type_to_string(graph.expect_ty(init)))
}

fn span() -> Span {
    Span {
        start: Position::null(),
        end: Position::null(),
    }
}

fn literal(graph: &mut Graph, value: LiteralValue, scope: NodeId) -> NodeId {
    graph.add(
        NodeKind::Literal {
            value,
            suffix: LiteralSuffix::None,
        },
        Some(scope),
        span(),
    )
}

fn empty_block(graph: &mut Graph) -> NodeId {
    graph.add(
        NodeKind::Block {
            statements: vec![],
            declarations: HashMap::new(),
            expected_error: None,
        },
        None,
        span(),
    )
}

#[test]
fn test_literals() {
    assert_eq!(type_of("1").unwrap(), "i64");
    assert_eq!(type_of("1u").unwrap(), "u64");
    assert_eq!(type_of("1.5f").unwrap(), "f32");
    assert_eq!(type_of("1.5").unwrap(), "f64");
    assert_eq!(type_of("false").unwrap(), "bool");
    assert_eq!(type_of(r#""hello""#).unwrap(), "*u8");
}

#[test]
fn test_arithmetic() {
    for operator in ["+", "-", "*", "/", "%"] {
        assert_eq!(type_of(&format!("1 {} 2", operator)).unwrap(), "i64");
        assert_eq!(type_of(&format!("1u {} 2u", operator)).unwrap(), "u64");
        assert_eq!(type_of(&format!("1f {} 2f", operator)).unwrap(), "f32");
        assert_eq!(type_of(&format!("1.0 {} 2.0", operator)).unwrap(), "f64");
    }
}

#[test]
fn test_arithmetic_coercion() {
    assert_eq!(type_of("1f + 2").unwrap(), "f64");
    assert_eq!(type_of("1 + 2f").unwrap(), "f64");
    assert_eq!(type_of("1.5 * 2").unwrap(), "f64");
    assert_eq!(type_of("1u - 2f").unwrap(), "f64");
}

#[test]
fn test_coercion_splices_casts() {
    let (graph, root) = check_source("x := 1 + 2f").unwrap();
    let addition = init_of(&graph, top_level(&graph, root)[0]);

    let NodeKind::BinaryOperator { left, right, .. } = graph.kind(addition).clone() else {
        panic!("expected a binary operator");
    };

    let f64_type = graph.builtin("f64");
    for operand in [left, right] {
        let NodeKind::TypeCast { expression, target } = graph.kind(operand).clone() else {
            panic!("expected a cast, got {:?}", graph.kind(operand));
        };
        assert_eq!(target, f64_type);
        assert_eq!(graph.expect_ty(operand), f64_type);
        assert!(matches!(graph.kind(expression), NodeKind::Literal { .. }));
    }
}

#[test]
fn test_integer_widening() {
    let (graph, root) = check_source("f := proc(a: i8, b: i64) i64 { return a + b }").unwrap();
    let body = body_of(&graph, top_level(&graph, root)[0]);

    let NodeKind::Return { expression } = graph.kind(statements(&graph, body)[0]).clone() else {
        panic!("expected a return");
    };
    let NodeKind::BinaryOperator { left, right, .. } = graph.kind(expression).clone() else {
        panic!("expected a binary operator");
    };

    assert!(matches!(graph.kind(left), NodeKind::TypeCast { .. }));
    assert!(matches!(graph.kind(right), NodeKind::Identifier { .. }));
    assert_eq!(graph.type_to_string(graph.expect_ty(expression)), "i64");
}

#[test]
fn test_mixed_signedness_is_rejected() {
    for expression in ["1u + 2", "1 - 2u", "1 * 2u", "1 / 2u", "1u % 2"] {
        assert_eq!(
            type_of(expression).unwrap_err().get_error_name(),
            "MixedSignedness",
            "{}",
            expression
        );
    }
}

#[test]
fn test_arithmetic_on_non_numbers() {
    assert_eq!(
        type_of("true + 1").unwrap_err().get_impl(),
        &ErrorImpl::NonNumericOperands {
            left: "bool".to_string(),
            right: "i64".to_string(),
        }
    );
    assert_eq!(
        error_of("f := proc() { }\nx := f + 1"),
        ErrorImpl::InvalidOperandKind {
            side: "left".to_string(),
            received: "proc() void".to_string(),
        }
    );
}

#[test]
fn test_bitwise() {
    for operator in ["<<", ">>", "&", "^", "|"] {
        assert_eq!(type_of(&format!("1u {} 2u", operator)).unwrap(), "u64");
    }

    for expression in ["1u << 2", "1 >> 2u", "1u & 2", "1 ^ 2", "1 | 2", "1f | 2f"] {
        assert_eq!(
            type_of(expression).unwrap_err().get_error_name(),
            "NonUnsignedBitwiseOperands",
            "{}",
            expression
        );
    }
}

#[test]
fn test_short_circuit() {
    assert_eq!(type_of("true || false").unwrap(), "bool");
    assert_eq!(type_of("1 < 2 && 2 < 3").unwrap(), "bool");

    assert_eq!(
        type_of("1 || 2").unwrap_err().get_impl(),
        &ErrorImpl::NonBooleanOperand {
            side: "left".to_string(),
            received: "i64".to_string(),
        }
    );
    assert_eq!(
        type_of("false && 1").unwrap_err().get_impl(),
        &ErrorImpl::NonBooleanOperand {
            side: "right".to_string(),
            received: "i64".to_string(),
        }
    );
}

#[test]
fn test_comparison() {
    for operator in ["<", ">", "<=", ">=", "==", "!="] {
        assert_eq!(type_of(&format!("1 {} 2", operator)).unwrap(), "bool");
    }

    assert_eq!(
        type_of("1 == 1u").unwrap_err().get_impl(),
        &ErrorImpl::ComparisonMismatch {
            left: "i64".to_string(),
            right: "u64".to_string(),
        }
    );
}

#[test]
fn test_assignment() {
    let (graph, root) = check_source("main := proc() { a := 1  a = 2 }").unwrap();
    let body = body_of(&graph, top_level(&graph, root)[0]);
    let assignment = statements(&graph, body)[1];
    assert_eq!(graph.type_to_string(graph.expect_ty(assignment)), "i64");

    assert_eq!(
        error_of("main := proc() { b := true  b = 1 }"),
        ErrorImpl::AssignmentMismatch {
            left: "bool".to_string(),
            right: "i64".to_string(),
        }
    );
}

#[test]
fn test_declarations() {
    let (graph, root) = check_source("a: i64\nb: i64 = 2\nc := 3").unwrap();

    for declaration in top_level(&graph, root) {
        let ty = graph.declaration_type(declaration).unwrap();
        assert_eq!(graph.type_to_string(ty), "i64");
    }

    assert_eq!(
        error_of("a:"),
        ErrorImpl::MissingDeclarationType {
            name: "a".to_string()
        }
    );
}

#[test]
fn test_declared_and_inferred_type_mismatch() {
    assert_eq!(
        error_of("main := proc() { x: i8 = true }"),
        ErrorImpl::DeclarationTypeMismatch {
            specified: "i8".to_string(),
            inferred: "bool".to_string(),
        }
    );
}

#[test]
fn test_duplicate_declaration() {
    let error = check_source("main := proc() { x := 1  x := 2 }").unwrap_err();

    assert_eq!(
        error.get_impl(),
        &ErrorImpl::DuplicateDeclaration {
            name: "x".to_string()
        }
    );
    // The second `x`
    assert_eq!(error.get_position().0, 25);
}

#[test]
fn test_shadowing_in_inner_block() {
    let (graph, root) = check_source("main := proc() { x := 1 { x := true  y := x } }").unwrap();
    let body = body_of(&graph, top_level(&graph, root)[0]);
    let inner = statements(&graph, body)[1];

    let y = statements(&graph, inner)[1];
    let ty = graph.declaration_type(y).unwrap();
    assert_eq!(graph.type_to_string(ty), "bool");
}

#[test]
fn test_identifier_resolution() {
    assert_eq!(
        error_of("main := proc() { y = 1 }"),
        ErrorImpl::UnresolvedIdentifier {
            name: "y".to_string()
        }
    );
    assert_eq!(
        error_of("x := x"),
        ErrorImpl::UsedBeforeTyped {
            name: "x".to_string()
        }
    );
    assert!(check_source("g := 1.5\nmain := proc() { a := g * 2.0 }").is_ok());
}

#[test]
fn test_parameters_are_scoped_to_their_procedure() {
    assert!(check_source("f := proc(x: i64) { }\ng := proc(x: bool) { y := x }").is_ok());
    assert_eq!(
        error_of("f := proc(x: i64) { }\ng := proc() { y := x }"),
        ErrorImpl::UnresolvedIdentifier {
            name: "x".to_string()
        }
    );
}

#[test]
fn test_calls() {
    let add = "add := proc(a: i64, b: i64) i64 { return a + b }\n";

    let (graph, root) = check_source(&format!("{}main := proc() {{ c := add(1, 2) }}", add)).unwrap();
    let body = body_of(&graph, top_level(&graph, root)[1]);
    let c = statements(&graph, body)[0];
    assert_eq!(graph.type_to_string(graph.declaration_type(c).unwrap()), "i64");

    assert_eq!(
        error_of(&format!("{}main := proc() {{ add(1) }}", add)),
        ErrorImpl::ArgumentCountMismatch {
            expected: 2,
            received: 1
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
fn test_vararg_calls() {
    let printf = "printf := proc(format: *u8, ...) i32 external\n";

    assert!(check_source(&format!(r#"{}main := proc() {{ printf("%d %d", 1, 2u) }}"#, printf)).is_ok());
    assert_eq!(
        error_of(&format!("{}main := proc() {{ printf() }}", printf)),
        ErrorImpl::ArgumentCountMismatch {
            expected: 1,
            received: 0
        }
    );
}

#[test]
fn test_not_callable() {
    assert_eq!(
        error_of("main := proc() { a := 1  a() }"),
        ErrorImpl::NotCallable {
            received: "i64".to_string()
        }
    );
}

#[test]
fn test_recursion() {
    let source = "fact := proc(n: i64) i64 {
        if n < 2 return 1
        return n * fact(n - 1)
    }";

    assert!(check_source(source).is_ok());
}

#[test]
fn test_main_signature() {
    assert!(check_source("main := proc() { }").is_ok());

    assert_eq!(
        error_of("main := proc(argc: i64) { }"),
        ErrorImpl::MainSignatureMismatch {
            expected: "proc() void".to_string(),
            received: "proc(i64) void".to_string(),
        }
    );
    assert_eq!(
        error_of("main := proc() i64 { return 0 }"),
        ErrorImpl::MainSignatureMismatch {
            expected: "proc() void".to_string(),
            received: "proc() i64".to_string(),
        }
    );

    // Only the procedure a `main` declaration is initialised with
    assert!(check_source("main := proc() { helper := proc(x: i64) { } }").is_ok());
}

#[test]
fn test_returns() {
    assert!(check_source("f := proc() i64 { return 1 }").is_ok());
    assert!(check_source("f := proc() i64 { return }").is_ok());
    assert_eq!(
        error_of("f := proc() i64 { return true }"),
        ErrorImpl::ReturnTypeMismatch {
            expected: "i64".to_string(),
            received: "bool".to_string(),
        }
    );
}

#[test]
fn test_return_outside_procedure() {
    let mut graph = Graph::new();
    let block = empty_block(&mut graph);
    let value = literal(&mut graph, LiteralValue::Int(1), block);
    let retyrn = graph.add(NodeKind::Return { expression: value }, Some(block), span());

    let error = TypeChecker::new(&mut graph, false).check(retyrn).unwrap_err();
    assert_eq!(error.get_impl(), &ErrorImpl::ReturnOutsideProcedure);
}

#[test]
fn test_loops() {
    assert!(check_source(
        "main := proc() {
            for i : 0 : < 10 { j := i + 1  break }
            for k : : >= 10 : 1 continue
            for u : 0u : < 10u : 2u { }
            while true { continue }
        }"
    )
    .is_ok());

    assert_eq!(
        error_of("main := proc() { for i : 0 : < 10u { } }"),
        ErrorImpl::LoopBoundMismatch {
            iterator: "i64".to_string(),
            received: "u64".to_string(),
        }
    );
    assert_eq!(
        error_of("main := proc() { for i : 0 : < 10 : 1f { } }"),
        ErrorImpl::LoopBoundMismatch {
            iterator: "i64".to_string(),
            received: "f32".to_string(),
        }
    );
}

#[test]
fn test_break_outside_loop() {
    assert_eq!(
        error_of("main := proc() { break }"),
        ErrorImpl::BreakOutsideLoop {
            keyword: "break".to_string()
        }
    );
    // A nested procedure does not inherit the loop
    assert_eq!(
        error_of("main := proc() { while true { f := proc() { continue } } }"),
        ErrorImpl::BreakOutsideLoop {
            keyword: "continue".to_string()
        }
    );
}

#[test]
fn test_labels() {
    assert!(check_source("main := proc() { goto end  :end }").is_ok());
    assert!(check_source("main := proc() { :top  goto top }").is_ok());

    assert_eq!(
        error_of("main := proc() { :a  :a }"),
        ErrorImpl::DuplicateLabel {
            label: "a".to_string()
        }
    );
    assert_eq!(
        error_of("main := proc() { goto nowhere }"),
        ErrorImpl::UnknownLabel {
            label: "nowhere".to_string()
        }
    );
    // Labels belong to one procedure
    assert_eq!(
        error_of("f := proc() { :a }\nmain := proc() { goto a }"),
        ErrorImpl::UnknownLabel {
            label: "a".to_string()
        }
    );
}

#[test]
fn test_compiler_error_blocks() {
    assert!(check_source(
        r#"main := proc() {
            x := 1
            __error("typecheck") { y: i8 = true }
            __error("declaration") { z = 1 }
            __error("declaration") { x := 2  x := 3 }
            __error("typecheck") { goto missing  a := 1u + 1 }
            y := x
        }"#
    )
    .is_ok());

    assert_eq!(
        error_of(r#"main := proc() { __error("typecheck") { x := 1 } }"#),
        ErrorImpl::ExpectedCompilerError {
            kind: "typecheck".to_string()
        }
    );
    // Labels of a failed block are dropped with the rest of it
    assert!(check_source(
        r#"main := proc() {
            __error("typecheck") { :x  a := 1u + 1 }
            :x
        }"#
    )
    .is_ok());
    assert_eq!(
        error_of(
            r#"main := proc() {
                __error("typecheck") { :y  a := 1u + 1 }
                goto y
            }"#
        ),
        ErrorImpl::UnknownLabel {
            label: "y".to_string()
        }
    );
    // A type error does not satisfy a declaration fixture
    assert_eq!(
        error_of(r#"main := proc() { __error("declaration") { x: i8 = true } }"#),
        ErrorImpl::DeclarationTypeMismatch {
            specified: "i8".to_string(),
            inferred: "bool".to_string(),
        }
    );
}

#[test]
fn test_structural_equality() {
    assert!(check_source("a: [4]i64\nb: [4]i64 = a").is_ok());
    assert!(check_source(r#"p: *u8 = "text""#).is_ok());
    assert!(check_source("f := proc(a: i64) i64 { return a }\ng: proc(b: i64) i64 = f").is_ok());

    assert_eq!(
        error_of("a: [4]i64\nb: [5]i64 = a"),
        ErrorImpl::DeclarationTypeMismatch {
            specified: "[5]i64".to_string(),
            inferred: "[4]i64".to_string(),
        }
    );
    assert_eq!(
        error_of(r#"p: *i8 = "text""#),
        ErrorImpl::DeclarationTypeMismatch {
            specified: "*i8".to_string(),
            inferred: "*u8".to_string(),
        }
    );
    assert_eq!(
        error_of("f := proc(a: i64) i64 { return a }\ng: proc(b: u64) i64 = f"),
        ErrorImpl::DeclarationTypeMismatch {
            specified: "proc(u64) i64".to_string(),
            inferred: "proc(i64) i64".to_string(),
        }
    );
}

#[test]
#[should_panic(expected = "internal compiler error")]
fn test_non_literal_array_length_is_fatal() {
    let _ = check_source("n := 4\na: [n]i64\nb: [n]i64 = a");
}

#[test]
fn test_statements_are_stamped_in_order() {
    let (graph, root) = check_source("main := proc() { a := 1 { b := 2 } c := 3 }").unwrap();

    let main = top_level(&graph, root)[0];
    assert_eq!(graph[main].time, None);

    let body = body_of(&graph, main);
    let body_statements = statements(&graph, body);
    let times: Vec<Option<u32>> = body_statements
        .iter()
        .map(|statement| graph[*statement].time)
        .collect();
    assert_eq!(times, vec![Some(0), Some(1), Some(3)]);

    let b = statements(&graph, body_statements[1])[0];
    assert_eq!(graph[b].time, Some(2));
}

#[test]
fn test_invalid_cast() {
    let mut graph = Graph::new();
    let block = empty_block(&mut graph);
    let value = literal(&mut graph, LiteralValue::Bool(true), block);
    let i64_type = graph.builtin("i64");
    let cast = graph.add(
        NodeKind::TypeCast {
            expression: value,
            target: i64_type,
        },
        Some(block),
        span(),
    );

    let mut checker = TypeChecker::new(&mut graph, false);
    checker.check(value).unwrap();
    assert_eq!(
        checker.check(cast).unwrap_err().get_impl(),
        &ErrorImpl::InvalidCast {
            from: "bool".to_string(),
            to: "i64".to_string(),
        }
    );
}

#[test]
#[should_panic(expected = "internal compiler error")]
fn test_checking_a_typed_node_twice_panics() {
    let mut graph = Graph::new();
    let block = empty_block(&mut graph);
    let value = literal(&mut graph, LiteralValue::Int(7), block);

    let mut checker = TypeChecker::new(&mut graph, false);
    checker.check(value).unwrap();
    let _ = checker.check(value);
}

#[test]
fn test_diagnostics_do_not_change_the_outcome() {
    for source in ["main := proc() { a := 1 }", "main := proc() { x := 1  x := 2 }"] {
        let tokens = tokenize(source, None).unwrap();
        let module = parse(&tokens).unwrap();

        let (mut quiet_graph, quiet_root) = lower(&module).unwrap();
        let (mut loud_graph, loud_root) = lower(&module).unwrap();

        let quiet = type_check(&mut quiet_graph, quiet_root, false);
        let loud = type_check(&mut loud_graph, loud_root, true);

        assert_eq!(
            quiet.map_err(|error| error.get_impl().clone()),
            loud.map_err(|error| error.get_impl().clone())
        );
    }
}
