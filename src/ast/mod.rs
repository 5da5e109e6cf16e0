/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Program, declarations, blocks and node ids
/// - expressions: Expression nodes and operators
/// - statements: Statement nodes
/// - types: Type annotations as written in source
/// - printer: Indented text dump used by `knox --ast`
pub mod ast;
pub mod expressions;
pub mod printer;
pub mod statements;
pub mod types;
