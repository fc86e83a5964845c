use std::collections::HashMap;

use crate::{
    ast::{
        ast::Ast,
        expressions::{LiteralSuffix, LiteralValue},
        statements::{BlockStmt, CompilerErrorKind, DeclarationStmt, Module},
        types::SignatureType,
    },
    errors::errors::{internal_error, Error, ErrorImpl},
    nodes::nodes::{Graph, NodeId, NodeKind},
    Span,
};

/// Lowers a parsed module into a fresh semantic graph.
///
/// # Returns
///
/// The graph together with the id of its `Module` node.
pub fn lower(module: &Module) -> Result<(Graph, NodeId), Error> {
    let mut graph = Graph::new();

    let block = new_block(&mut graph, None, None, module.span.clone());

    let mut statements = vec![];
    for declaration in &module.declarations {
        statements.push(build_declaration(&mut graph, Some(block), declaration)?);
    }
    set_statements(&mut graph, block, statements);

    let root = graph.add(NodeKind::Module { block }, None, module.span.clone());

    tracing::debug!(nodes = graph.len(), "lowered module");
    Ok((graph, root))
}

/// Converts one AST node (and its children) into graph nodes whose
/// `containing_block` is `enclosing`.
pub fn build(graph: &mut Graph, enclosing: Option<NodeId>, ast: &Ast) -> Result<NodeId, Error> {
    let span = ast.get_span().clone();

    let kind = match ast {
        Ast::Literal(literal) => NodeKind::Literal {
            value: literal.value.clone(),
            suffix: literal.suffix,
        },
        Ast::Identifier(identifier) => NodeKind::Identifier {
            name: identifier.name.clone(),
        },
        Ast::BinaryOperator(binary) => NodeKind::BinaryOperator {
            operator: binary.operator,
            left: build(graph, enclosing, &binary.left)?,
            right: build(graph, enclosing, &binary.right)?,
        },
        Ast::ProcedureCall(call) => {
            let callee = build(graph, enclosing, &call.callee)?;
            let mut arguments = vec![];
            for argument in &call.arguments {
                arguments.push(build(graph, enclosing, argument)?);
            }
            NodeKind::ProcedureCall { callee, arguments }
        }
        Ast::Procedure(procedure) => {
            let signature = build_signature(graph, enclosing, &procedure.signature)?;

            // Parameters are visible inside the body through the signature's scope
            let scope = signature_scope(graph, signature);
            let body = match &procedure.body {
                Some(body) => Some(build_block(graph, Some(scope), body)?),
                None => None,
            };

            NodeKind::Procedure { signature, body }
        }
        Ast::ProcedureSignature(signature) => return build_signature(graph, enclosing, signature),
        Ast::Block(block) => return build_block(graph, enclosing, block),
        Ast::Declaration(declaration) => return build_declaration(graph, enclosing, declaration),
        Ast::If(yf) => NodeKind::If {
            condition: build(graph, enclosing, &yf.condition)?,
            then_block: build_block(graph, enclosing, &yf.then_block)?,
            else_block: match &yf.else_block {
                Some(block) => Some(build_block(graph, enclosing, block)?),
                None => None,
            },
        },
        Ast::While(whyle) => NodeKind::While {
            condition: build(graph, enclosing, &whyle.condition)?,
            block: build_block(graph, enclosing, &whyle.block)?,
        },
        Ast::For(foa) => {
            let scope = new_block(graph, enclosing, None, span.clone());

            // for i : : < n  starts counting at 0
            let begin = match &foa.begin {
                Some(begin) => build(graph, Some(scope), begin)?,
                None => graph.add(
                    NodeKind::Literal {
                        value: LiteralValue::Int(0),
                        suffix: LiteralSuffix::None,
                    },
                    Some(scope),
                    span.clone(),
                ),
            };
            let specified_type = nop(graph, Some(scope), &span);
            let iterator = graph.add(
                NodeKind::Declaration {
                    name: foa.iterator.clone(),
                    specified_type,
                    init_expression: begin,
                },
                Some(scope),
                span.clone(),
            );
            set_statements(graph, scope, vec![iterator]);

            let end = build(graph, Some(scope), &foa.end)?;
            let step = build_optional(graph, Some(scope), foa.step.as_deref(), &span)?;
            let block = build_block(graph, Some(scope), &foa.block)?;

            NodeKind::For {
                scope,
                iterator,
                comparison: foa.comparison,
                end,
                step,
                block,
            }
        }
        Ast::Break(_) => NodeKind::Break,
        Ast::Continue(_) => NodeKind::Continue,
        Ast::Return(retyrn) => NodeKind::Return {
            expression: build_optional(graph, enclosing, retyrn.expression.as_deref(), &span)?,
        },
        Ast::Label(label) => NodeKind::Label {
            name: label.name.clone(),
        },
        Ast::Goto(goto) => NodeKind::Goto {
            label: goto.label.clone(),
        },
        Ast::TypeIdentifier(identifier) => {
            // Built-in types are shared, every use resolves to the same node
            return graph.find_builtin(&identifier.name).ok_or_else(|| {
                Error::new(
                    ErrorImpl::UnknownType {
                        type_: identifier.name.clone(),
                    },
                    identifier.span.start.clone(),
                )
            });
        }
        Ast::PointerType(pointer) => NodeKind::PointerType {
            target: build(graph, enclosing, &pointer.target)?,
        },
        Ast::ArrayType(array) => NodeKind::ArrayType {
            length: build(graph, enclosing, &array.length)?,
            element: build(graph, enclosing, &array.element)?,
        },
    };

    Ok(graph.add(kind, enclosing, span))
}

/// Lowers a block, which becomes the enclosing scope of its statements.
pub fn build_block(
    graph: &mut Graph,
    enclosing: Option<NodeId>,
    block: &BlockStmt,
) -> Result<NodeId, Error> {
    let id = new_block(graph, enclosing, block.expected_error, block.span.clone());

    let mut statements = vec![];
    for statement in &block.statements {
        statements.push(build(graph, Some(id), statement)?);
    }
    set_statements(graph, id, statements);

    Ok(id)
}

fn build_declaration(
    graph: &mut Graph,
    enclosing: Option<NodeId>,
    declaration: &DeclarationStmt,
) -> Result<NodeId, Error> {
    let span = &declaration.span;

    let specified_type =
        build_optional(graph, enclosing, declaration.specified_type.as_deref(), span)?;
    let init_expression =
        build_optional(graph, enclosing, declaration.init_expression.as_deref(), span)?;

    Ok(graph.add(
        NodeKind::Declaration {
            name: declaration.name.clone(),
            specified_type,
            init_expression,
        },
        enclosing,
        span.clone(),
    ))
}

// Parameters live in their own hidden block so that every procedure gets a
// fresh namespace for them.
fn build_signature(
    graph: &mut Graph,
    enclosing: Option<NodeId>,
    signature: &SignatureType,
) -> Result<NodeId, Error> {
    let scope = new_block(graph, enclosing, None, signature.span.clone());

    let mut parameters = vec![];
    for parameter in &signature.parameters {
        parameters.push(build_declaration(graph, Some(scope), parameter)?);
    }

    let return_type = match &signature.return_type {
        Some(return_type) => build(graph, enclosing, return_type)?,
        None => graph.builtin("void"),
    };

    Ok(graph.add(
        NodeKind::ProcedureSignature {
            scope,
            parameters,
            return_type,
            is_vararg: signature.is_vararg,
        },
        enclosing,
        signature.span.clone(),
    ))
}

fn signature_scope(graph: &Graph, signature: NodeId) -> NodeId {
    match graph.kind(signature) {
        NodeKind::ProcedureSignature { scope, .. } => *scope,
        _ => internal_error("procedure signature lowered to a different node"),
    }
}

fn build_optional(
    graph: &mut Graph,
    enclosing: Option<NodeId>,
    ast: Option<&Ast>,
    span: &Span,
) -> Result<NodeId, Error> {
    match ast {
        Some(ast) => build(graph, enclosing, ast),
        None => Ok(nop(graph, enclosing, span)),
    }
}

fn nop(graph: &mut Graph, enclosing: Option<NodeId>, span: &Span) -> NodeId {
    graph.add(NodeKind::Nop, enclosing, span.clone())
}

fn new_block(
    graph: &mut Graph,
    enclosing: Option<NodeId>,
    expected_error: Option<CompilerErrorKind>,
    span: Span,
) -> NodeId {
    graph.add(
        NodeKind::Block {
            statements: vec![],
            declarations: HashMap::new(),
            expected_error,
        },
        enclosing,
        span,
    )
}

fn set_statements(graph: &mut Graph, block: NodeId, new_statements: Vec<NodeId>) {
    match &mut graph.node_mut(block).kind {
        NodeKind::Block { statements, .. } => *statements = new_statements,
        _ => internal_error("statements attached to a node that is not a block"),
    }
}
