use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of errors reported before fail-fast.
pub const MAX_ERRORS: usize = 20;

/// Error severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Error category, determined by error code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Syntax,
    Type,
    Field,
    Structure,
}

/// Numeric error code (E100–E699).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // ── Syntax errors (E100–E199) ──
    pub const INVALID_JSON: Self = Self(100);
    pub const MISSING_FIELD: Self = Self(101);

    // ── Type errors (E200–E299) ──
    pub const UNKNOWN_BLOCK_TYPE: Self = Self(200);
    pub const MISPLACED_BLOCK: Self = Self(201);
    pub const SOCKET_TYPE_MISMATCH: Self = Self(202);

    // ── Field errors (E300–E399) ──
    pub const INVALID_FIELD_OPTION: Self = Self(300);
    pub const INVALID_DELAY_UNIT: Self = Self(301);
    pub const FIELD_OUT_OF_RANGE: Self = Self(302);
    pub const FIELD_NOT_INTEGER: Self = Self(303);
    pub const FIELD_WRONG_KIND: Self = Self(304);

    // ── Structure errors (E600–E699) ──
    pub const MISSING_ENTRY_MARKER: Self = Self(600);
    pub const DUPLICATE_ENTRY_MARKER: Self = Self(601);
    pub const NESTING_LIMIT_EXCEEDED: Self = Self(602);
    pub const GENERATION_FAILED: Self = Self(603);
    pub const ORPHAN_BLOCK: Self = Self(610);

    /// Get the category for this error code.
    pub fn category(self) -> ErrorCategory {
        match self.0 {
            100..=199 => ErrorCategory::Syntax,
            200..=299 => ErrorCategory::Type,
            300..=399 => ErrorCategory::Field,
            600..=699 => ErrorCategory::Structure,
            _ => ErrorCategory::Syntax, // fallback
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// A structured diagnostic attached to a block of the workspace.
///
/// Hosts highlight `block_id` in the editor; they must not parse `message`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockError {
    /// Error code (e.g., E300).
    pub code: ErrorCode,
    /// Error severity.
    pub severity: Severity,
    /// Error category (derived from code).
    pub category: ErrorCategory,
    /// Human-readable error message.
    pub message: String,
    /// Id of the offending block, when one can be named.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,
    /// Type identifier of the offending block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_type: Option<String>,
    /// Optional fix suggestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl BlockError {
    /// Create a new error that is not tied to a particular block.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: Severity::Error,
            category: code.category(),
            message: message.into(),
            block_id: None,
            block_type: None,
            suggestion: None,
        }
    }

    /// Create a new error located at a block.
    pub fn at_block(
        code: ErrorCode,
        message: impl Into<String>,
        block_id: impl Into<String>,
        block_type: impl Into<String>,
    ) -> Self {
        Self {
            block_id: Some(block_id.into()),
            block_type: Some(block_type.into()),
            ..Self::new(code, message)
        }
    }

    /// Downgrade to a warning.
    pub fn warning(mut self) -> Self {
        self.severity = Severity::Warning;
        self
    }

    /// Attach a fix suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for BlockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(id) = &self.block_id {
            write!(f, "[{id}] ")?;
        }
        write!(f, "{} [{}] {}", self.code, self.category, self.message)
    }
}

impl std::error::Error for BlockError {}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => write!(f, "syntax"),
            Self::Type => write!(f, "type"),
            Self::Field => write!(f, "field"),
            Self::Structure => write!(f, "structure"),
        }
    }
}

/// The structured JSON output for compilation results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompileErrors {
    pub errors: Vec<BlockError>,
    pub warnings: Vec<BlockError>,
    pub total_errors: usize,
    pub total_warnings: usize,
}

impl CompileErrors {
    /// Create an empty result (no errors).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    /// Add an error, respecting the MAX_ERRORS limit.
    pub fn push_error(&mut self, error: BlockError) {
        if self.errors.len() < MAX_ERRORS {
            self.errors.push(error);
        }
        self.total_errors += 1;
    }

    /// Add a warning.
    pub fn push_warning(&mut self, warning: BlockError) {
        self.warnings.push(warning.warning());
        self.total_warnings += 1;
    }
}
