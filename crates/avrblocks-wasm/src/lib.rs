//! AVR Blocks code generator as a WASM module for the browser editor.
//!
//! This crate exposes the generation pipeline via `wasm-bindgen`, suitable
//! for running on the editor page or in a Web Worker. Every function takes
//! and returns JSON strings.
//!
//! # Usage (JavaScript)
//!
//! ```js
//! import init, { generate, get_toolbox, Session } from 'avrblocks-wasm';
//!
//! await init();
//!
//! const session = new Session();
//! workspace.addChangeListener((event) => {
//!   const state = Blockly.serialization.workspaces.save(workspace);
//!   const update = JSON.parse(session.handle_event(
//!     JSON.stringify(event.toJson()), workspace.isDragging(), JSON.stringify(state)));
//!   if (update.status === "generated" && update.changed) {
//!     codeView.textContent = update.result.code ?? "";
//!   }
//! });
//! ```

use avrblocks_compiler::{
    ChangeEvent, CompileResult, EditorSession, EventKind, GeneratorConfig,
};
use avrblocks_types::{BlockError, CompileErrors, ErrorCode};
use serde::Serialize;
use wasm_bindgen::prelude::*;

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        format!(
            r#"{{"success":false,"errors":{{"errors":[{{"message":"Serialization error: {}"}}],"warnings":[],"total_errors":1,"total_warnings":0}}}}"#,
            e
        )
    })
}

/// A failed result for options the host sent in a bad shape.
fn options_failure(message: String) -> CompileResult {
    let mut errors = CompileErrors::empty();
    errors.push_error(
        BlockError::new(ErrorCode::INVALID_JSON, message)
            .with_suggestion("options look like {\"format\": {\"indent_size\": 4}}"),
    );
    CompileResult {
        success: false,
        code: None,
        code_hash: None,
        errors,
    }
}

/// Generate C from a serialized workspace.
///
/// Returns a JSON string containing a `CompileResult`:
/// ```json
/// {
///   "success": true,
///   "code": "int main(void)\n{ ... }\n",
///   "code_hash": "9f86d0...",
///   "errors": { "errors": [], "warnings": [], "total_errors": 0, "total_warnings": 0 }
/// }
/// ```
///
/// On failure, `success` is `false`, `code` is absent, and `errors` contains
/// structured diagnostics with the offending block ids.
#[wasm_bindgen]
pub fn generate(workspace_json: &str) -> String {
    to_json(&avrblocks_compiler::compile_to_result(workspace_json))
}

/// Generate C with formatting options given as JSON.
#[wasm_bindgen]
pub fn generate_with_options(workspace_json: &str, options_json: &str) -> String {
    let result = match GeneratorConfig::from_json_str(options_json) {
        Ok(config) => avrblocks_compiler::compile_to_result_with_config(workspace_json, &config),
        Err(e) => options_failure(e.to_string()),
    };
    to_json(&result)
}

/// Validate a workspace without generating code.
///
/// Returns a JSON string containing structured errors and warnings.
#[wasm_bindgen]
pub fn check(workspace_json: &str) -> String {
    to_json(&avrblocks_compiler::check(workspace_json))
}

/// Return the generator version string.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Return the editor toolbox as JSON.
#[wasm_bindgen]
pub fn get_toolbox() -> String {
    avrblocks_compiler::reference::generate_toolbox()
}

/// Return the editor theme as JSON.
#[wasm_bindgen]
pub fn get_theme() -> String {
    avrblocks_compiler::reference::generate_theme()
}

/// Return the JSON definitions of every block.
///
/// Generated from the same registry the generator validates against, so the
/// editor and the generator cannot drift apart.
#[wasm_bindgen]
pub fn get_block_definitions() -> String {
    avrblocks_compiler::reference::generate_block_definitions()
}

/// One open editor. Keeps the hash of the last generated program.
#[wasm_bindgen]
pub struct Session {
    inner: EditorSession,
}

#[wasm_bindgen]
impl Session {
    #[wasm_bindgen(constructor)]
    #[allow(clippy::new_without_default)]
    pub fn new() -> Session {
        Session {
            inner: EditorSession::default(),
        }
    }

    /// Replace the formatting options. Returns `""` on success, otherwise
    /// the error message; the previous options stay in effect.
    pub fn set_options(&mut self, options_json: &str) -> String {
        match GeneratorConfig::from_json_str(options_json) {
            Ok(config) => {
                self.inner.set_config(config);
                String::new()
            }
            Err(e) => e.to_string(),
        }
    }

    /// Handle one workspace change notification.
    ///
    /// Returns a JSON `SessionUpdate`: `{"status":"skipped","reason":...}` or
    /// `{"status":"generated","changed":...,"result":{...}}`. Events that do
    /// not decode are treated as unsupported.
    pub fn handle_event(&mut self, event_json: &str, is_dragging: bool, workspace_json: &str) -> String {
        let event = ChangeEvent::from_json(event_json).unwrap_or_else(|_| ChangeEvent::new(EventKind::Other));
        to_json(&self.inner.handle(&event, is_dragging, workspace_json))
    }

    /// Number of generation passes run so far.
    pub fn passes(&self) -> u64 {
        self.inner.passes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const EMPTY: &str = r#"{"blocks":{"languageVersion":0,"blocks":[
        {"type":"events_start","id":"s"},{"type":"events_loop","id":"l"}]}}"#;

    fn parse(text: &str) -> Value {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn test_generate_returns_result_json() {
        let result = parse(&generate(EMPTY));
        assert_eq!(result["success"], true);
        assert!(result["code"].as_str().unwrap().starts_with("int main(void)"));
    }

    #[test]
    fn test_generate_failure() {
        let result = parse(&generate("not json"));
        assert_eq!(result["success"], false);
        assert_eq!(result["errors"]["errors"][0]["code"], 100);
    }

    #[test]
    fn test_generate_with_options() {
        let result = parse(&generate_with_options(EMPTY, r#"{"format":{"indent_with_tabs":true}}"#));
        assert!(result["code"].as_str().unwrap().contains("\n\twhile (1)\n"));

        let bad = parse(&generate_with_options(EMPTY, r#"{"format":{"indent_size":0}}"#));
        assert_eq!(bad["success"], false);
        assert!(bad["errors"]["errors"][0]["message"]
            .as_str()
            .unwrap()
            .contains("indent_size"));
    }

    #[test]
    fn test_check_returns_errors_json() {
        let errors = parse(&check(r#"{"blocks":{"blocks":[]}}"#));
        assert_eq!(errors["total_errors"], 2);
    }

    #[test]
    fn test_version() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_artifacts() {
        assert_eq!(parse(&get_toolbox())["kind"], "categoryToolbox");
        assert_eq!(parse(&get_theme())["base"], "classic");
        assert!(parse(&get_block_definitions()).as_array().unwrap().len() > 20);
    }

    #[test]
    fn test_session_events() {
        let mut session = Session::new();
        let skipped = parse(&session.handle_event(r#"{"type":"move"}"#, true, EMPTY));
        assert_eq!(skipped["status"], "skipped");
        assert_eq!(skipped["reason"], "dragging");

        let garbled = parse(&session.handle_event("{", false, EMPTY));
        assert_eq!(garbled["reason"], "unsupported_event");

        let update = parse(&session.handle_event(r#"{"type":"create","blockId":"x"}"#, false, EMPTY));
        assert_eq!(update["status"], "generated");
        assert_eq!(update["changed"], true);
        assert_eq!(session.passes(), 1);
    }

    #[test]
    fn test_session_options_keep_history() {
        let mut session = Session::new();
        session.handle_event(r#"{"type":"create"}"#, false, EMPTY);
        assert_eq!(session.set_options(r#"{"format":{"max_blank_lines":1}}"#), "");
        assert_eq!(session.passes(), 1);
        let update = parse(&session.handle_event(r#"{"type":"change"}"#, false, EMPTY));
        assert_eq!(update["changed"], false);
    }

    #[test]
    fn test_session_options() {
        let mut session = Session::new();
        assert!(session.set_options(r#"{"format":{"indent_size":99}}"#).contains("99"));
        assert_eq!(session.set_options(r#"{"format":{"indent_size":2}}"#), "");
        let update = parse(&session.handle_event(r#"{"type":"change"}"#, false, EMPTY));
        assert!(update["result"]["code"].as_str().unwrap().contains("\n  while (1)\n"));
    }
}
