//! Lowering from the AST to the semantic graph.
//!
//! Every AST node becomes one graph node, except type identifiers which
//! resolve to the shared built-in type nodes. Omitted optional children are
//! replaced by `Nop` nodes so the type checker never deals with `Option`s.

pub mod lowering;

#[cfg(test)]
mod tests;
