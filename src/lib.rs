// TINY Language Interpreter Library
//
// Core pipeline for the TINY language: a line-buffered source cursor, a
// pull-based scanner, a recursive-descent parser, a combined symbol-table
// and type-checking pass, and a tree-walking evaluator over slot-indexed
// program memory.

// Public modules
pub mod analyzer;
pub mod ast;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod runner;
pub mod source;
pub mod symbol_table;

// Re-export commonly used items
pub use analyzer::{analyze, Analysis};
pub use ast::{BinaryOp, Expr, ExprType, Program, Stmt};
pub use error::{ErrorKind, Span, TinyError};
pub use evaluator::Evaluator;
pub use lexer::{Lexer, Token, TokenType};
pub use parser::Parser;
pub use source::SourceCursor;
pub use symbol_table::{SymbolTable, VariableRecord};

// Re-export main functions
pub use repl::start as start_repl;
pub use runner::{run, run_with_options, RunOptions};
