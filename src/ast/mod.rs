/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The closed `Ast` sum type and its rendering
/// - expressions: Literals, identifiers, operators, calls and procedures
/// - statements: Blocks, declarations, control flow and the module root
/// - types: Type identifiers, pointer, array and signature types
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
