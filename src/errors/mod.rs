//! Error types and error handling for the compiler.
//!
//! This module defines the error types used throughout the front end.
//! It includes:
//!
//! - Error structures with source position information
//! - Specific error variants for lexing, parsing, lowering and type checking
//! - Error names and suggestions used by the driver when rendering
//! - `internal_error` for broken front-end invariants

pub mod errors;
