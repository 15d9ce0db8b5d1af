//! AVR Blocks code generator: renders a typed block tree to AVR C.
//!
//! # Architecture
//!
//! - [`expr`] and [`stmt`] render one block into a [`Fragment`]: a
//!   statement, or an expression tagged with its C precedence ([`Order`]).
//!   Rendering records the peripherals a block needs in the
//!   [`RenderContext`]'s [`RequirementSet`].
//! - [`assembler`] renders the start and loop chains independently,
//!   merges their requirements and lays out the compilation unit:
//!
//! ```text
//! #define ...            (fixed table order, each at most once)
//! #include ...
//! int main(void)
//! {
//!     // init ...       initializers
//!     ...               start chain
//!     while (1)
//!     {
//!         ...           loop chain
//!     }
//! }
//! ```
//!
//! - [`format`] re-indents the result.

pub mod assembler;
pub mod context;
pub mod error;
pub mod expr;
pub mod format;
pub mod fragment;
pub mod requirements;
pub mod stmt;

pub use assembler::{generate, GeneratedProgram};
pub use context::RenderContext;
pub use error::{CodegenError, CodegenResult};
pub use expr::emit_expr;
pub use format::FormatOptions;
pub use fragment::{Fragment, Order};
pub use requirements::{Requirement, RequirementSet};
pub use stmt::{emit_stmt, emit_stmts};
