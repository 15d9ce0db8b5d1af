//! Codegen error types.

use thiserror::Error;

/// Errors that can occur while rendering a block tree to C.
///
/// Trees produced by the parser never trigger these; they guard trees
/// built by hand.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// An internal consistency check failed.
    #[error("internal codegen error: {0}")]
    Internal(String),

    /// Nesting depth or a numeric value exceeded what the generator emits.
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),
}

/// Codegen result type alias.
pub type CodegenResult<T> = Result<T, CodegenError>;
