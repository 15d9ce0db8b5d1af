//! AVR Blocks compiler: orchestrates the full generation pipeline.
//!
//! ```text
//! Workspace JSON → decode → Parser (lower + validate) → Emitter → Assembler → formatted C
//! ```
//!
//! Every entry point is pure: the same workspace and configuration give
//! byte-identical output.

pub mod config;
pub mod reference;
pub mod session;

use avrblocks_codegen::{generate, CodegenError, GeneratedProgram};
use avrblocks_parser::Parser;
use avrblocks_types::block::Program;
use avrblocks_types::{BlockError, CompileErrors, ErrorCode, Workspace};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

pub use config::{ConfigError, GeneratorConfig};
pub use session::{ChangeEvent, EditorSession, EventKind, SessionUpdate};

/// The structured result of a generation pass, serialized for hosts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileResult {
    /// Whether C code was produced.
    pub success: bool,
    /// Generated C source (only when `success` is true).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// SHA-256 of `code`, hex encoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_hash: Option<String>,
    /// Errors and warnings.
    pub errors: CompileErrors,
}

// ══════════════════════════════════════════════════════════════════════════════
// Pipeline
// ══════════════════════════════════════════════════════════════════════════════

/// Generate C from a serialized workspace with the default configuration.
pub fn compile(json: &str) -> Result<String, CompileErrors> {
    compile_with_config(json, &GeneratorConfig::default()).map(|program| program.text)
}

/// Generate C from a serialized workspace.
///
/// Warnings alone never fail the pass; use [`compile_to_result`] to keep
/// them alongside the code.
pub fn compile_with_config(
    json: &str,
    config: &GeneratorConfig,
) -> Result<GeneratedProgram, CompileErrors> {
    let (generated, errors) = run(json, config);
    generated.ok_or(errors)
}

/// Full pipeline returning a serializable [`CompileResult`].
pub fn compile_to_result(json: &str) -> CompileResult {
    compile_to_result_with_config(json, &GeneratorConfig::default())
}

pub fn compile_to_result_with_config(json: &str, config: &GeneratorConfig) -> CompileResult {
    let (generated, errors) = run(json, config);
    match generated {
        Some(program) => CompileResult {
            success: true,
            code_hash: Some(code_hash(&program.text)),
            code: Some(program.text),
            errors,
        },
        None => CompileResult {
            success: false,
            code: None,
            code_hash: None,
            errors,
        },
    }
}

/// Validate a workspace without generating code.
pub fn check(json: &str) -> CompileErrors {
    lower(json).1
}

/// Hex-encoded SHA-256 of generated code.
pub fn code_hash(code: &str) -> String {
    format!("{:x}", Sha256::digest(code.as_bytes()))
}

/// Decode and lower a workspace.
fn lower(json: &str) -> (Option<Program>, CompileErrors) {
    let workspace = match Workspace::from_json(json) {
        Ok(ws) => ws,
        Err(e) => {
            let mut errors = CompileErrors::empty();
            errors.push_error(
                BlockError::new(ErrorCode::INVALID_JSON, e.to_string())
                    .with_suggestion("pass the editor's JSON block serialization"),
            );
            return (None, errors);
        }
    };

    let result = Parser::new(&workspace).parse();
    for warning in &result.errors.warnings {
        warn!(code = %warning.code, block = ?warning.block_id, "{}", warning.message);
    }
    debug!(
        blocks = workspace.block_count(),
        errors = result.errors.total_errors,
        warnings = result.errors.total_warnings,
        "lowered workspace"
    );
    (result.program, result.errors)
}

fn run(json: &str, config: &GeneratorConfig) -> (Option<GeneratedProgram>, CompileErrors) {
    let (program, mut errors) = lower(json);
    let Some(program) = program else {
        return (None, errors);
    };
    match generate(&program, &config.format) {
        Ok(generated) => (Some(generated), errors),
        Err(e) => {
            errors.push_error(generation_error(&e));
            (None, errors)
        }
    }
}

fn generation_error(error: &CodegenError) -> BlockError {
    BlockError::new(ErrorCode::GENERATION_FAILED, error.to_string())
}
