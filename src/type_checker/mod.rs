//! Type checking and semantic analysis module.
//!
//! This module annotates the semantic graph with types in a single
//! bottom-up pass. It:
//!
//! - Infers expression types and splices implicit numeric casts
//! - Resolves identifiers through the enclosing blocks
//! - Checks procedure signatures, calls and returns
//! - Validates loops, labels and `__error(...)` fixture blocks
//!
//! The first violation aborts the pass. Context such as the current
//! procedure is kept on an explicit stack whose entries are popped by
//! guards, so it is restored on every exit path.

pub mod context;
pub mod equality;
pub mod type_checker;

#[cfg(test)]
mod tests;
