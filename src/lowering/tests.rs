use pretty_assertions::assert_eq;

use crate::{
    ast::{
        expressions::{LiteralSuffix, LiteralValue},
        statements::CompilerErrorKind,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::lexer::tokenize,
    nodes::nodes::{Graph, NodeId, NodeKind},
    parser::parser::parse,
};

use super::lowering::lower;

fn lower_source(source: &str) -> Result<(Graph, NodeId), Error> {
    let tokens = tokenize(source, Some("test.jang".to_string())).unwrap();
    let module = parse(&tokens).unwrap();
    lower(&module)
}

fn statements(graph: &Graph, block: NodeId) -> Vec<NodeId> {
    match graph.kind(block) {
        NodeKind::Block { statements, .. } => statements.clone(),
        other => panic!("expected a block, got {:?}", other),
    }
}

fn module_block(graph: &Graph, root: NodeId) -> NodeId {
    match graph.kind(root) {
        NodeKind::Module { block } => *block,
        other => panic!("expected a module, got {:?}", other),
    }
}

fn declaration_parts(graph: &Graph, declaration: NodeId) -> (String, NodeId, NodeId) {
    match graph.kind(declaration) {
        NodeKind::Declaration {
            name,
            specified_type,
            init_expression,
        } => (name.clone(), *specified_type, *init_expression),
        other => panic!("expected a declaration, got {:?}", other),
    }
}

/// Body block of the procedure `declaration` is initialised with.
fn procedure_body(graph: &Graph, declaration: NodeId) -> (NodeId, NodeId) {
    let (_, _, init) = declaration_parts(graph, declaration);
    match graph.kind(init) {
        NodeKind::Procedure {
            signature,
            body: Some(body),
        } => (*signature, *body),
        other => panic!("expected a procedure with a body, got {:?}", other),
    }
}

#[test]
fn test_module_structure() {
    let (graph, root) = lower_source("main := proc() { a := 1 }").unwrap();

    let block = module_block(&graph, root);
    assert_eq!(graph[root].containing_block, None);
    assert_eq!(graph[block].containing_block, None);

    let declarations = statements(&graph, block);
    assert_eq!(declarations.len(), 1);

    let main = declarations[0];
    assert_eq!(declaration_parts(&graph, main).0, "main");
    assert_eq!(graph[main].containing_block, Some(block));

    let (signature, body) = procedure_body(&graph, main);
    let NodeKind::ProcedureSignature {
        scope,
        parameters,
        return_type,
        is_vararg,
    } = graph.kind(signature).clone()
    else {
        panic!("expected a signature");
    };

    assert!(parameters.is_empty());
    assert!(!is_vararg);
    assert_eq!(return_type, graph.builtin("void"));
    assert_eq!(graph[scope].containing_block, Some(block));
    assert_eq!(graph[body].containing_block, Some(scope));

    let body_statements = statements(&graph, body);
    assert_eq!(body_statements.len(), 1);
    assert_eq!(graph[body_statements[0]].containing_block, Some(body));
}

#[test]
fn test_nothing_is_typed_after_lowering() {
    let (graph, _) = lower_source("main := proc() { a := 1 + 2 }").unwrap();

    for index in 0..graph.len() {
        assert_eq!(graph[NodeId(index)].ty, None);
        assert_eq!(graph[NodeId(index)].time, None);
    }
}

#[test]
fn test_omitted_declaration_parts_become_nop() {
    let (graph, root) = lower_source("a: i64\nb := 2").unwrap();
    let declarations = statements(&graph, module_block(&graph, root));

    let (_, specified, init) = declaration_parts(&graph, declarations[0]);
    assert_eq!(specified, graph.builtin("i64"));
    assert!(matches!(graph.kind(init), NodeKind::Nop));

    let (_, specified, init) = declaration_parts(&graph, declarations[1]);
    assert!(matches!(graph.kind(specified), NodeKind::Nop));
    assert!(matches!(
        graph.kind(init),
        NodeKind::Literal {
            value: LiteralValue::Int(2),
            suffix: LiteralSuffix::None
        }
    ));
}

#[test]
fn test_builtin_types_are_shared() {
    let (graph, root) = lower_source("a: u8\nb: u8\nc: *u8\nd: *u8").unwrap();
    let declarations = statements(&graph, module_block(&graph, root));

    let types: Vec<NodeId> = declarations
        .iter()
        .map(|declaration| declaration_parts(&graph, *declaration).1)
        .collect();

    assert_eq!(types[0], types[1]);
    // Compound types are created per occurrence
    assert_ne!(types[2], types[3]);

    for pointer in &types[2..] {
        match graph.kind(*pointer) {
            NodeKind::PointerType { target } => assert_eq!(*target, graph.builtin("u8")),
            other => panic!("expected a pointer type, got {:?}", other),
        }
    }
}

#[test]
fn test_unknown_type() {
    let error = lower_source("a: foo").unwrap_err();

    assert_eq!(
        error.get_impl(),
        &ErrorImpl::UnknownType {
            type_: "foo".to_string()
        }
    );
    assert_eq!(error.get_position().0, 3);
}

#[test]
fn test_unknown_type_inside_procedure() {
    let error = lower_source("f := proc(x: string) { }").unwrap_err();
    assert_eq!(error.get_error_name(), "UnknownType");
}

#[test]
fn test_parameters_live_in_signature_scope() {
    let (graph, root) = lower_source("f := proc(x: i64, y: f32, ...) i64 { return x }").unwrap();
    let declarations = statements(&graph, module_block(&graph, root));
    let (signature, body) = procedure_body(&graph, declarations[0]);

    let NodeKind::ProcedureSignature {
        scope,
        parameters,
        return_type,
        is_vararg,
    } = graph.kind(signature).clone()
    else {
        panic!("expected a signature");
    };

    assert!(is_vararg);
    assert_eq!(return_type, graph.builtin("i64"));
    assert_eq!(parameters.len(), 2);
    for parameter in parameters {
        assert_eq!(graph[parameter].containing_block, Some(scope));
    }

    let body_statements = statements(&graph, body);
    let NodeKind::Return { expression } = graph.kind(body_statements[0]) else {
        panic!("expected a return");
    };
    assert!(matches!(graph.kind(*expression), NodeKind::Identifier { .. }));
}

#[test]
fn test_external_procedure_has_no_body() {
    let (graph, root) = lower_source("puts := proc(s: *u8) i32 external").unwrap();
    let declarations = statements(&graph, module_block(&graph, root));
    let (_, _, init) = declaration_parts(&graph, declarations[0]);

    assert!(matches!(graph.kind(init), NodeKind::Procedure { body: None, .. }));
}

#[test]
fn test_for_loop_scope() {
    let (graph, root) = lower_source("main := proc() { for i : : < 10 { } }").unwrap();
    let declarations = statements(&graph, module_block(&graph, root));
    let (_, body) = procedure_body(&graph, declarations[0]);

    let for_loop = statements(&graph, body)[0];
    let NodeKind::For {
        scope,
        iterator,
        end,
        step,
        block,
        ..
    } = graph.kind(for_loop).clone()
    else {
        panic!("expected a for loop");
    };

    assert_eq!(graph[scope].containing_block, Some(body));
    assert_eq!(graph[iterator].containing_block, Some(scope));
    assert_eq!(graph[end].containing_block, Some(scope));
    assert_eq!(graph[block].containing_block, Some(scope));
    assert!(matches!(graph.kind(step), NodeKind::Nop));

    let (name, _, begin) = declaration_parts(&graph, iterator);
    assert_eq!(name, "i");
    assert!(matches!(
        graph.kind(begin),
        NodeKind::Literal {
            value: LiteralValue::Int(0),
            ..
        }
    ));
}

#[test]
fn test_nested_blocks_and_fixtures() {
    let (graph, root) =
        lower_source(r#"main := proc() { { x := 1 } __error("declaration") { y } return }"#)
            .unwrap();
    let declarations = statements(&graph, module_block(&graph, root));
    let (_, body) = procedure_body(&graph, declarations[0]);

    let body_statements = statements(&graph, body);
    assert_eq!(body_statements.len(), 3);

    let inner = body_statements[0];
    assert_eq!(graph[inner].containing_block, Some(body));
    assert_eq!(graph[statements(&graph, inner)[0]].containing_block, Some(inner));

    match graph.kind(body_statements[1]) {
        NodeKind::Block { expected_error, .. } => {
            assert_eq!(*expected_error, Some(CompilerErrorKind::Declaration))
        }
        other => panic!("expected a block, got {:?}", other),
    }

    let NodeKind::Return { expression } = graph.kind(body_statements[2]) else {
        panic!("expected a return");
    };
    assert!(matches!(graph.kind(*expression), NodeKind::Nop));
}
