use std::{
    collections::HashMap,
    ops::{Index, IndexMut},
};

use crate::{
    ast::{
        expressions::{BinaryOperator, LiteralSuffix, LiteralValue},
        statements::CompilerErrorKind,
    },
    errors::errors::internal_error,
    Position, Span,
};

use super::builtins::{TypeCategory, BUILTIN_TYPES};

/// Handle of a node inside a `Graph`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    /// Set exactly once by the type checker, and only for nodes that
    /// denote a value.
    pub ty: Option<NodeId>,
    /// Lexically enclosing block. `None` for the module block and built-ins.
    pub containing_block: Option<NodeId>,
    /// Position of the statement inside its procedure body.
    pub time: Option<u32>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    BinaryOperator {
        operator: BinaryOperator,
        left: NodeId,
        right: NodeId,
    },
    Block {
        statements: Vec<NodeId>,
        declarations: HashMap<String, NodeId>,
        expected_error: Option<CompilerErrorKind>,
    },
    Declaration {
        name: String,
        specified_type: NodeId,
        init_expression: NodeId,
    },
    Identifier {
        name: String,
    },
    If {
        condition: NodeId,
        then_block: NodeId,
        else_block: Option<NodeId>,
    },
    While {
        condition: NodeId,
        block: NodeId,
    },
    For {
        /// Hidden block holding the iterator declaration.
        scope: NodeId,
        iterator: NodeId,
        comparison: BinaryOperator,
        end: NodeId,
        step: NodeId,
        block: NodeId,
    },
    Break,
    Continue,
    Label {
        name: String,
    },
    Goto {
        label: String,
    },
    Literal {
        value: LiteralValue,
        suffix: LiteralSuffix,
    },
    Procedure {
        signature: NodeId,
        /// `None` for `external` procedures.
        body: Option<NodeId>,
    },
    ProcedureCall {
        callee: NodeId,
        arguments: Vec<NodeId>,
    },
    ProcedureSignature {
        /// Hidden block holding the parameter declarations.
        scope: NodeId,
        parameters: Vec<NodeId>,
        return_type: NodeId,
        is_vararg: bool,
    },
    Return {
        expression: NodeId,
    },
    /// Only ever created by the type checker.
    TypeCast {
        expression: NodeId,
        target: NodeId,
    },
    Module {
        block: NodeId,
    },
    BasicType {
        name: &'static str,
        category: TypeCategory,
        size: Option<u32>,
    },
    PointerType {
        target: NodeId,
    },
    ArrayType {
        length: NodeId,
        element: NodeId,
    },
    /// Reserved for user defined types.
    StructType,
    /// Stands in for an omitted child.
    Nop,
}

impl NodeKind {
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            NodeKind::BasicType { .. }
                | NodeKind::PointerType { .. }
                | NodeKind::ArrayType { .. }
                | NodeKind::ProcedureSignature { .. }
                | NodeKind::StructType
        )
    }
}

/// Arena holding every semantic node of one compile unit.
///
/// Nodes are never removed. The built-in types and the signature `main` must
/// match are seeded on construction.
#[derive(Debug)]
pub struct Graph {
    nodes: Vec<Node>,
    builtins: HashMap<&'static str, NodeId>,
    main_signature: NodeId,
}

impl Graph {
    pub fn new() -> Self {
        let mut graph = Graph {
            nodes: vec![],
            builtins: HashMap::new(),
            main_signature: NodeId(0),
        };

        for builtin in BUILTIN_TYPES.iter() {
            let id = graph.add(
                NodeKind::BasicType {
                    name: builtin.name,
                    category: builtin.category,
                    size: builtin.size,
                },
                None,
                null_span(),
            );
            graph.builtins.insert(builtin.name, id);
        }

        let scope = graph.add(
            NodeKind::Block {
                statements: vec![],
                declarations: HashMap::new(),
                expected_error: None,
            },
            None,
            null_span(),
        );
        let void = graph.builtin("void");
        graph.main_signature = graph.add(
            NodeKind::ProcedureSignature {
                scope,
                parameters: vec![],
                return_type: void,
                is_vararg: false,
            },
            None,
            null_span(),
        );

        graph
    }

    pub fn add(&mut self, kind: NodeKind, containing_block: Option<NodeId>, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            ty: None,
            containing_block,
            time: None,
            span,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn ty(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].ty
    }

    /// Type slot of a node that has already been checked.
    pub fn expect_ty(&self, id: NodeId) -> NodeId {
        match self.nodes[id.0].ty {
            Some(ty) => ty,
            None => internal_error("node used before it was type checked"),
        }
    }

    /// Fills the type slot. It can only be set once.
    pub fn set_type(&mut self, id: NodeId, ty: NodeId) {
        let node = &mut self.nodes[id.0];
        if node.ty.is_some() {
            internal_error("type of a node assigned twice");
        }
        node.ty = Some(ty);
    }

    pub fn find_builtin(&self, name: &str) -> Option<NodeId> {
        self.builtins.get(name).copied()
    }

    /// Node of a built-in type known to exist.
    pub fn builtin(&self, name: &str) -> NodeId {
        match self.find_builtin(name) {
            Some(id) => id,
            None => internal_error("unknown built-in type"),
        }
    }

    /// Built-in type with the given category and size, if there is one.
    pub fn builtin_matching(&self, category: TypeCategory, size: Option<u32>) -> Option<NodeId> {
        BUILTIN_TYPES
            .iter()
            .find(|builtin| builtin.category == category && builtin.size == size)
            .map(|builtin| self.builtin(builtin.name))
    }

    pub fn main_signature(&self) -> NodeId {
        self.main_signature
    }

    /// Looks `name` up in `block` and then in every enclosing block.
    pub fn find_declaration(&self, block: Option<NodeId>, name: &str) -> Option<NodeId> {
        let mut current = block;

        while let Some(id) = current {
            if let NodeKind::Block { declarations, .. } = self.kind(id) {
                if let Some(declaration) = declarations.get(name) {
                    return Some(*declaration);
                }
            }
            current = self.node(id).containing_block;
        }

        None
    }

    /// Type of a declared name: its initializer's type, or the specified
    /// type when there is no initializer yet.
    pub fn declaration_type(&self, declaration: NodeId) -> Option<NodeId> {
        let NodeKind::Declaration {
            specified_type,
            init_expression,
            ..
        } = self.kind(declaration)
        else {
            internal_error("declaration type requested for a non-declaration");
        };

        self.ty(*init_expression).or_else(|| match self.kind(*specified_type) {
            NodeKind::Nop => None,
            _ => Some(*specified_type),
        })
    }

    /// Category of a basic type, `None` for every other kind of node.
    pub fn basic_category(&self, ty: NodeId) -> Option<(TypeCategory, Option<u32>)> {
        match self.kind(ty) {
            NodeKind::BasicType { category, size, .. } => Some((*category, *size)),
            _ => None,
        }
    }

    /// Renders a type node the way it is written in source.
    pub fn type_to_string(&self, ty: NodeId) -> String {
        match self.kind(ty) {
            NodeKind::BasicType { name, .. } => name.to_string(),
            NodeKind::PointerType { target } => format!("*{}", self.type_to_string(*target)),
            NodeKind::ArrayType { length, element } => {
                let length = match self.kind(*length) {
                    NodeKind::Literal {
                        value: LiteralValue::Int(length),
                        ..
                    } => length.to_string(),
                    _ => String::from("..."),
                };
                format!("[{}]{}", length, self.type_to_string(*element))
            }
            NodeKind::ProcedureSignature {
                parameters,
                return_type,
                is_vararg,
                ..
            } => {
                let mut rendered: Vec<String> = parameters
                    .iter()
                    .map(|parameter| match self.declaration_type(*parameter) {
                        Some(ty) => self.type_to_string(ty),
                        None => String::from("?"),
                    })
                    .collect();
                if *is_vararg {
                    rendered.push(String::from("..."));
                }
                format!("proc({}) {}", rendered.join(", "), self.type_to_string(*return_type))
            }
            NodeKind::StructType => String::from("struct"),
            NodeKind::Nop => String::from("nop"),
            _ => String::from("<expression>"),
        }
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<NodeId> for Graph {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        self.node(id)
    }
}

impl IndexMut<NodeId> for Graph {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        self.node_mut(id)
    }
}

fn null_span() -> Span {
    Span {
        start: Position::null(),
        end: Position::null(),
    }
}
