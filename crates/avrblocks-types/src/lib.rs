//! Shared types for AVR Blocks.
//!
//! This crate defines the typed block tree, the serialized workspace model
//! exchanged with the host editor, the block registry, and the structured
//! error types used across all stages.

mod error;
pub mod block;
pub mod registry;
pub mod workspace;

pub use error::{BlockError, CompileErrors, ErrorCategory, ErrorCode, Severity, MAX_ERRORS};
pub use registry::{describe, BlockShape, BlockType};
pub use workspace::{Connection, FieldValue, SerializedBlock, Workspace, WorkspaceError};
