//! Semantic graph produced by lowering and annotated by the type checker.
//!
//! Nodes live in a `Graph` arena and refer to each other through `NodeId`
//! handles, so scope back-references and spliced casts need no shared
//! ownership.

pub mod builtins;
pub mod nodes;
