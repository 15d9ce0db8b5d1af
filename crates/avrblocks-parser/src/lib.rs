//! AVR Blocks parser: lowers a serialized workspace into a typed block tree.

mod parse_expr;
mod parse_field;
mod parse_stmt;
mod parser;

pub use parser::{ParseResult, Parser, MAX_NESTING_DEPTH};
