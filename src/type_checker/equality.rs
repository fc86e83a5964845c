use crate::{
    ast::expressions::LiteralValue,
    errors::errors::internal_error,
    nodes::nodes::{Graph, NodeId, NodeKind},
};

/// Structural equality of two type nodes.
///
/// Basic types compare by category and size, pointers by pointee, arrays by
/// literal length and element type, signatures by return type and parameter
/// types in order. Parameter names never matter.
pub fn types_equal(graph: &Graph, a: NodeId, b: NodeId) -> bool {
    match (graph.kind(a), graph.kind(b)) {
        (
            NodeKind::BasicType {
                category: category_a,
                size: size_a,
                ..
            },
            NodeKind::BasicType {
                category: category_b,
                size: size_b,
                ..
            },
        ) => category_a == category_b && size_a == size_b,
        (NodeKind::PointerType { target: target_a }, NodeKind::PointerType { target: target_b }) => {
            types_equal(graph, *target_a, *target_b)
        }
        (
            NodeKind::ArrayType {
                length: length_a,
                element: element_a,
            },
            NodeKind::ArrayType {
                length: length_b,
                element: element_b,
            },
        ) => {
            literal_length(graph, *length_a) == literal_length(graph, *length_b)
                && types_equal(graph, *element_a, *element_b)
        }
        (
            NodeKind::ProcedureSignature {
                parameters: parameters_a,
                return_type: return_a,
                ..
            },
            NodeKind::ProcedureSignature {
                parameters: parameters_b,
                return_type: return_b,
                ..
            },
        ) => {
            types_equal(graph, *return_a, *return_b)
                && parameters_a.len() == parameters_b.len()
                && parameters_a.iter().zip(parameters_b).all(|(a, b)| {
                    match (graph.declaration_type(*a), graph.declaration_type(*b)) {
                        (Some(a), Some(b)) => types_equal(graph, a, b),
                        _ => false,
                    }
                })
        }
        (NodeKind::StructType, _) | (_, NodeKind::StructType) => {
            internal_error("struct types cannot be compared yet")
        }
        (kind_a, kind_b) if kind_a.is_type() && kind_b.is_type() => false,
        _ => internal_error("type equality requested for a node that is not a type"),
    }
}

// Array lengths have to be integer literals until constant evaluation exists.
fn literal_length(graph: &Graph, length: NodeId) -> u64 {
    match graph.kind(length) {
        NodeKind::Literal {
            value: LiteralValue::Int(length),
            ..
        } => *length,
        _ => internal_error("array length is not an integer literal"),
    }
}
