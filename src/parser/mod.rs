//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the backtracking parser that transforms a stream of
//! tokens into an Abstract Syntax Tree. It handles:
//!
//! - Statement parsing (declarations, control flow, labels, fixture blocks)
//! - Expression parsing (precedence climbing, calls, literals)
//! - Type parsing for declarations and signatures
//! - Arm/quiet error reporting
//!
//! Every rule works on its own copy of the `Parser`, so alternatives can be
//! tried without any explicit rewinding.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;
