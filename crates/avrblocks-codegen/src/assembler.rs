//! Program assembler: composes the complete C compilation unit.

use avrblocks_types::block::Program;
use tracing::debug;

use crate::context::RenderContext;
use crate::error::CodegenResult;
use crate::format::{format, FormatOptions};
use crate::requirements::RequirementSet;
use crate::stmt::emit_stmts;

/// A generated program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedProgram {
    /// The formatted C source.
    pub text: String,
    /// Merged requirements of both chains.
    pub requirements: RequirementSet,
    /// Unformatted statements of the start chain.
    pub start_body: String,
    /// Unformatted statements of the loop chain.
    pub loop_body: String,
}

/// Generate the C program for a block tree.
///
/// Each chain renders from its own entry marker into its own context; the
/// requirement sets are merged afterwards. Generation is pure: the same
/// tree and options always give the same text.
pub fn generate(program: &Program, options: &FormatOptions) -> CodegenResult<GeneratedProgram> {
    let mut start_ctx = RenderContext::new();
    let start_body = emit_stmts(&program.start.stmts, &mut start_ctx)?;

    let mut loop_ctx = RenderContext::new();
    let loop_body = emit_stmts(&program.main_loop.stmts, &mut loop_ctx)?;

    let mut requirements = start_ctx.requirements;
    requirements.merge(&loop_ctx.requirements);

    let raw = compose(&requirements, &start_body, &loop_body);
    let text = format(&raw, options);
    debug!(
        start_stmts = program.start.stmts.len(),
        loop_stmts = program.main_loop.stmts.len(),
        bytes = text.len(),
        "generated program"
    );

    Ok(GeneratedProgram {
        text,
        requirements,
        start_body,
        loop_body,
    })
}

/// Lay out defines, includes, `main` with initializers, the start body
/// and the endless loop.
fn compose(requirements: &RequirementSet, start_body: &str, loop_body: &str) -> String {
    let mut out = String::new();

    for line in requirements.define_lines() {
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');

    for line in requirements.include_lines() {
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');

    out.push_str("int main(void)\n{\n");
    for init in requirements.init_blocks() {
        out.push_str(init.comment);
        out.push('\n');
        out.push_str(init.call);
        out.push_str("\n\n");
    }
    out.push_str(start_body);
    out.push_str("\nwhile (1)\n{\n");
    out.push_str(loop_body);
    out.push_str("}\n}\n");
    out
}
