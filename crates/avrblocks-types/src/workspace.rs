//! Serialized workspace as produced by the host editor.
//!
//! Mirrors the host's JSON block serialization:
//!
//! ```json
//! { "blocks": { "languageVersion": 0, "blocks": [
//!     { "type": "events_start", "id": "s", "x": 20, "y": 30,
//!       "next": { "block": { "type": "utils_delay", "id": "d",
//!                            "fields": { "num_time": 5, "set_time": "opt_s" } } } }
//! ] } }
//! ```
//!
//! Unknown keys (`movable`, `collapsed`, `extraState`, …) are ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure to decode a serialized workspace.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("invalid workspace JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The serialized workspace root.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    #[serde(default)]
    pub blocks: TopBlocks,
}

/// Top-level block list. Position in this list carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopBlocks {
    #[serde(default)]
    pub language_version: u32,
    #[serde(default)]
    pub blocks: Vec<SerializedBlock>,
}

/// One block instance with its field values and connections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, FieldValue>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub inputs: BTreeMap<String, Connection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<Connection>,
    #[serde(default = "enabled_default", skip_serializing_if = "is_enabled_default")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disabled_reasons: Vec<String>,
}

fn enabled_default() -> bool {
    true
}

fn is_enabled_default(enabled: &bool) -> bool {
    *enabled
}

impl SerializedBlock {
    /// A bare block with no fields or connections.
    pub fn new(block_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            block_type: block_type.into(),
            id: id.into(),
            x: None,
            y: None,
            fields: BTreeMap::new(),
            inputs: BTreeMap::new(),
            next: None,
            enabled: true,
            disabled_reasons: Vec::new(),
        }
    }

    /// Disabled blocks are skipped by code generation.
    pub fn is_enabled(&self) -> bool {
        self.enabled && self.disabled_reasons.is_empty()
    }

    /// Look up a field value.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// The block plugged into the named input socket, if any.
    pub fn input(&self, name: &str) -> Option<&SerializedBlock> {
        self.inputs.get(name).and_then(Connection::target)
    }

    /// The block attached below this one, if any.
    pub fn next_block(&self) -> Option<&SerializedBlock> {
        self.next.as_ref().and_then(Connection::target)
    }

    /// Total number of blocks in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        let mut len = 0;
        let mut cursor = Some(self);
        while let Some(block) = cursor {
            len += 1 + block
                .inputs
                .values()
                .filter_map(Connection::target)
                .map(SerializedBlock::subtree_len)
                .sum::<usize>();
            cursor = block.next_block();
        }
        len
    }
}

/// A socket or `next` connection. A real block wins over a shadow block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<Box<SerializedBlock>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Box<SerializedBlock>>,
}

impl Connection {
    pub fn to(block: SerializedBlock) -> Self {
        Self {
            block: Some(Box::new(block)),
            shadow: None,
        }
    }

    /// The block that generates code for this connection.
    pub fn target(&self) -> Option<&SerializedBlock> {
        self.block.as_deref().or(self.shadow.as_deref())
    }
}

/// A literal field value: free text, dropdown tag, number or checkbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of the value. Numeric text is accepted, since the host
    /// serializes some number fields as strings.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Bool(_) => None,
        }
    }

    /// Short kind name used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
        }
    }
}

impl Workspace {
    /// Decode a workspace from the host's JSON serialization.
    ///
    /// Every chained block nests two levels deeper than the one above it,
    /// so the decoder runs without a depth limit on a growable stack.
    /// Nesting of sockets is bounded later, by the parser.
    pub fn from_json(json: &str) -> Result<Self, WorkspaceError> {
        let mut de = serde_json::Deserializer::from_str(json);
        de.disable_recursion_limit();
        let workspace = Self::deserialize(serde_stacker::Deserializer::new(&mut de))?;
        de.end()?;
        Ok(workspace)
    }

    /// Encode back to JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Top-level blocks in serialization order.
    pub fn top_blocks(&self) -> &[SerializedBlock] {
        &self.blocks.blocks
    }

    /// Total number of blocks in the workspace.
    pub fn block_count(&self) -> usize {
        self.top_blocks()
            .iter()
            .map(SerializedBlock::subtree_len)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "blocks": {
            "languageVersion": 0,
            "blocks": [
                {
                    "type": "events_start", "id": "start", "x": 20, "y": 30,
                    "deletable": false, "editable": false,
                    "next": { "block": {
                        "type": "sevseg_print_number", "id": "print",
                        "inputs": { "number": { "block": {
                            "type": "input_int", "id": "lit", "fields": { "value": 42 }
                        } } }
                    } }
                },
                { "type": "events_loop", "id": "loop", "x": 320, "y": 30 }
            ]
        }
    }"#;

    #[test]
    fn decodes_host_serialization() {
        let ws = Workspace::from_json(SAMPLE).unwrap();
        assert_eq!(ws.top_blocks().len(), 2);
        let start = &ws.top_blocks()[0];
        assert_eq!(start.block_type, "events_start");
        let print = start.next_block().unwrap();
        assert_eq!(print.id, "print");
        let lit = print.input("number").unwrap();
        assert_eq!(lit.field("value"), Some(&FieldValue::Number(42.0)));
        assert_eq!(ws.block_count(), 4);
    }

    #[test]
    fn empty_object_is_empty_workspace() {
        let ws = Workspace::from_json("{}").unwrap();
        assert!(ws.top_blocks().is_empty());
    }

    /// `events_loop` followed by `len` clear blocks, each nested in the
    /// `next` of the one above.
    fn long_chain(len: usize) -> String {
        let mut json = String::from(r#"{"blocks":{"blocks":[{"type":"events_loop","id":"loop""#);
        for i in 0..len {
            json.push_str(&format!(r#","next":{{"block":{{"type":"sevseg_clear","id":"c{i}""#));
        }
        json.push_str(&"}}".repeat(len));
        json.push_str("}]}}");
        json
    }

    #[test]
    fn long_chains_decode() {
        let ws = Workspace::from_json(&long_chain(500)).unwrap();
        assert_eq!(ws.block_count(), 501);
    }

    #[test]
    fn trailing_input_is_rejected() {
        assert!(Workspace::from_json("{} {}").is_err());
    }

    #[test]
    fn invalid_json_is_reported() {
        let err = Workspace::from_json("{ not json").unwrap_err();
        assert!(err.to_string().starts_with("invalid workspace JSON"));
    }

    #[test]
    fn shadow_block_is_used_when_no_real_block() {
        let mut conn = Connection::default();
        conn.shadow = Some(Box::new(SerializedBlock::new("input_int", "sh")));
        assert_eq!(conn.target().unwrap().id, "sh");
        conn.block = Some(Box::new(SerializedBlock::new("input_int", "real")));
        assert_eq!(conn.target().unwrap().id, "real");
    }

    #[test]
    fn disabled_flags() {
        let json = r#"{ "type": "sevseg_clear", "id": "c", "enabled": false }"#;
        let block: SerializedBlock = serde_json::from_str(json).unwrap();
        assert!(!block.is_enabled());

        let json = r#"{ "type": "sevseg_clear", "id": "c", "disabledReasons": ["ORPHANED_BLOCK"] }"#;
        let block: SerializedBlock = serde_json::from_str(json).unwrap();
        assert!(!block.is_enabled());

        assert!(SerializedBlock::new("sevseg_clear", "c").is_enabled());
    }

    #[test]
    fn field_value_views() {
        assert_eq!(FieldValue::Text("12".into()).as_number(), Some(12.0));
        assert_eq!(FieldValue::Number(3.0).as_str(), None);
        assert_eq!(FieldValue::Bool(true).kind_name(), "bool");
    }

    #[test]
    fn reserializes_without_defaults() {
        let ws = Workspace::from_json(SAMPLE).unwrap();
        let json: serde_json::Value = serde_json::from_str(&ws.to_json()).unwrap();
        let start = &json["blocks"]["blocks"][0];
        assert!(start.get("enabled").is_none());
        assert!(start.get("fields").is_none());
        assert_eq!(start["next"]["block"]["id"], "print");
    }
}
