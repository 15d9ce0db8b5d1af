//! Core parser infrastructure: entry-marker resolution, error reporting, helpers.

use avrblocks_types::block::{Chain, Program};
use avrblocks_types::{
    describe, BlockError, BlockShape, BlockType, CompileErrors, ErrorCode, SerializedBlock,
    Workspace,
};

/// Maximum nesting of value and statement sockets below a chain.
pub const MAX_NESTING_DEPTH: u32 = 32;

/// The workspace parser.
///
/// Walks the serialized block tree from the two entry markers and builds a
/// typed [`Program`]. Collects every error it can find instead of stopping
/// at the first one.
pub struct Parser<'ws> {
    workspace: &'ws Workspace,
    /// Collected errors and warnings.
    errors: CompileErrors,
    /// Current socket nesting depth.
    pub(crate) depth: u32,
}

/// Result of parsing.
pub struct ParseResult {
    /// `None` when any error was reported.
    pub program: Option<Program>,
    pub errors: CompileErrors,
}

impl<'ws> Parser<'ws> {
    /// Create a new parser over a decoded workspace.
    pub fn new(workspace: &'ws Workspace) -> Self {
        Self {
            workspace,
            errors: CompileErrors::empty(),
            depth: 0,
        }
    }

    // ── Block resolution ──────────────────────────────────────────────────────

    /// Resolve a serialized block's type against the registry.
    pub(crate) fn resolve(&mut self, block: &SerializedBlock) -> Option<(BlockType, BlockShape)> {
        match BlockType::from_name(&block.block_type) {
            Some(block_type) => Some((block_type, describe(block_type))),
            None => {
                self.error_at(
                    block,
                    ErrorCode::UNKNOWN_BLOCK_TYPE,
                    format!("unknown block type '{}'", block.block_type),
                );
                None
            }
        }
    }

    /// Enter one socket level. Returns `false` (and reports) past the limit.
    pub(crate) fn enter(&mut self, block: &SerializedBlock) -> bool {
        if self.depth >= MAX_NESTING_DEPTH {
            self.error_at(
                block,
                ErrorCode::NESTING_LIMIT_EXCEEDED,
                format!("blocks are nested deeper than {MAX_NESTING_DEPTH} levels"),
            );
            return false;
        }
        self.depth += 1;
        true
    }

    pub(crate) fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    // ── Error Reporting ───────────────────────────────────────────────────────

    /// Report an error located at a block.
    pub(crate) fn error_at(
        &mut self,
        block: &SerializedBlock,
        code: ErrorCode,
        message: impl Into<String>,
    ) {
        let error = BlockError::at_block(code, message, &block.id, &block.block_type);
        self.errors.push_error(error);
    }

    /// Report an error with a fix suggestion.
    pub(crate) fn error_with_hint(
        &mut self,
        block: &SerializedBlock,
        code: ErrorCode,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) {
        let error = BlockError::at_block(code, message, &block.id, &block.block_type)
            .with_suggestion(suggestion);
        self.errors.push_error(error);
    }

    /// Returns `true` if we've hit the error limit and should stop.
    pub(crate) fn too_many_errors(&self) -> bool {
        self.errors.has_errors() && self.errors.total_errors >= avrblocks_types::MAX_ERRORS
    }

    // ── Entry markers ─────────────────────────────────────────────────────────

    /// Find the unique top-level block of a marker type.
    fn find_marker(&mut self, marker: BlockType) -> Option<&'ws SerializedBlock> {
        let workspace = self.workspace;
        let mut found: Option<&'ws SerializedBlock> = None;
        for block in workspace.top_blocks() {
            if block.block_type != marker.name() {
                continue;
            }
            if found.is_some() {
                self.error_with_hint(
                    block,
                    ErrorCode::DUPLICATE_ENTRY_MARKER,
                    format!("more than one '{marker}' block"),
                    "delete the extra block; each program has exactly one Start and one Loop",
                );
            } else {
                found = Some(block);
            }
        }
        if found.is_none() {
            self.errors.push_error(
                BlockError::new(
                    ErrorCode::MISSING_ENTRY_MARKER,
                    format!("workspace has no '{marker}' block"),
                )
                .with_suggestion(format!("add a '{marker}' block at the top level")),
            );
        }
        found
    }

    /// Warn about top-level blocks hanging off neither marker.
    fn report_orphans(&mut self) {
        let workspace = self.workspace;
        for block in workspace.top_blocks() {
            let is_marker = BlockType::from_name(&block.block_type)
                .is_some_and(BlockType::is_entry_marker);
            if is_marker {
                continue;
            }
            let warning = BlockError::at_block(
                ErrorCode::ORPHAN_BLOCK,
                format!(
                    "'{}' is not attached to Start or Loop and is ignored",
                    block.block_type
                ),
                &block.id,
                &block.block_type,
            );
            self.errors.push_warning(warning);
        }
    }

    // ── Public API ────────────────────────────────────────────────────────────

    /// Lower the workspace into a [`Program`].
    pub fn parse(mut self) -> ParseResult {
        let start = self.find_marker(BlockType::EventsStart);
        let main_loop = self.find_marker(BlockType::EventsLoop);
        self.report_orphans();

        let start = start.map(|marker| Chain::new(&marker.id, self.parse_chain(marker.next_block())));
        let main_loop =
            main_loop.map(|marker| Chain::new(&marker.id, self.parse_chain(marker.next_block())));

        let program = match (start, main_loop) {
            (Some(start), Some(main_loop)) if !self.errors.has_errors() => {
                Some(Program { start, main_loop })
            }
            _ => None,
        };
        ParseResult {
            program,
            errors: self.errors,
        }
    }
}
