//! Editor session: turns host change notifications into generation passes.
//!
//! The host calls [`EditorSession::handle`] for every workspace event. A
//! pass runs only for block change, create, delete and move events, and
//! never while the user is dragging; skipped passes are dropped, not
//! queued. Each pass is a fresh, independent generation.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{compile_to_result_with_config, CompileResult, GeneratorConfig};

/// Kind of a workspace event, as named by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Change,
    Create,
    Delete,
    Move,
    /// UI, variable, comment and any other event.
    #[serde(other)]
    Other,
}

impl EventKind {
    /// Whether this event can change the generated program.
    pub fn triggers_pass(self) -> bool {
        !matches!(self, Self::Other)
    }
}

/// A workspace change notification: `{"type": "move", "blockId": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(rename = "blockId", default, skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,
}

impl ChangeEvent {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            block_id: None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Why a notification did not run a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Dragging,
    UnsupportedEvent,
}

/// Outcome of one notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionUpdate {
    Skipped {
        reason: SkipReason,
    },
    Generated {
        /// False when the code is identical to the previous pass.
        changed: bool,
        result: CompileResult,
    },
}

/// Generation state of one open editor.
#[derive(Debug, Default)]
pub struct EditorSession {
    config: GeneratorConfig,
    last_hash: Option<String>,
    passes: u64,
}

impl EditorSession {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            last_hash: None,
            passes: 0,
        }
    }

    /// Replace the configuration. Pass count and last hash are kept, so
    /// an options change that leaves the code identical reports no change.
    pub fn set_config(&mut self, config: GeneratorConfig) {
        self.config = config;
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Number of passes run so far.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Hash of the code produced by the last successful pass.
    pub fn last_hash(&self) -> Option<&str> {
        self.last_hash.as_deref()
    }

    /// Handle one change notification.
    pub fn handle(
        &mut self,
        event: &ChangeEvent,
        is_dragging: bool,
        workspace_json: &str,
    ) -> SessionUpdate {
        if is_dragging {
            trace!(kind = ?event.kind, "drag in progress, pass dropped");
            return SessionUpdate::Skipped {
                reason: SkipReason::Dragging,
            };
        }
        if !event.kind.triggers_pass() {
            trace!(kind = ?event.kind, "event does not affect code");
            return SessionUpdate::Skipped {
                reason: SkipReason::UnsupportedEvent,
            };
        }

        let result = compile_to_result_with_config(workspace_json, &self.config);
        self.passes += 1;
        let changed = result.code_hash != self.last_hash;
        if result.success {
            self.last_hash = result.code_hash.clone();
        }
        debug!(
            pass = self.passes,
            kind = ?event.kind,
            block = ?event.block_id,
            success = result.success,
            changed,
            "generation pass"
        );
        SessionUpdate::Generated { changed, result }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY: &str = r#"{"blocks":{"languageVersion":0,"blocks":[
        {"type":"events_start","id":"s"},{"type":"events_loop","id":"l"}]}}"#;

    #[test]
    fn test_event_kinds_from_json() {
        let ev = ChangeEvent::from_json(r#"{"type":"move","blockId":"abc"}"#).unwrap();
        assert_eq!(ev.kind, EventKind::Move);
        assert_eq!(ev.block_id.as_deref(), Some("abc"));
        let ev = ChangeEvent::from_json(r#"{"type":"selected"}"#).unwrap();
        assert_eq!(ev.kind, EventKind::Other);
        assert!(!ev.kind.triggers_pass());
    }

    #[test]
    fn test_drag_drops_pass() {
        let mut session = EditorSession::default();
        let update = session.handle(&ChangeEvent::new(EventKind::Move), true, EMPTY);
        assert!(matches!(
            update,
            SessionUpdate::Skipped {
                reason: SkipReason::Dragging
            }
        ));
        assert_eq!(session.passes(), 0);
    }

    #[test]
    fn test_unsupported_event_is_ignored() {
        let mut session = EditorSession::default();
        let update = session.handle(&ChangeEvent::new(EventKind::Other), false, EMPTY);
        assert!(matches!(
            update,
            SessionUpdate::Skipped {
                reason: SkipReason::UnsupportedEvent
            }
        ));
    }

    #[test]
    fn test_repeated_pass_is_unchanged() {
        let mut session = EditorSession::default();
        let first = session.handle(&ChangeEvent::new(EventKind::Create), false, EMPTY);
        assert!(matches!(first, SessionUpdate::Generated { changed: true, .. }));
        let second = session.handle(&ChangeEvent::new(EventKind::Change), false, EMPTY);
        assert!(matches!(second, SessionUpdate::Generated { changed: false, .. }));
        assert_eq!(session.passes(), 2);
        assert!(session.last_hash().is_some());
    }

    #[test]
    fn test_set_config_keeps_history() {
        let mut session = EditorSession::default();
        session.handle(&ChangeEvent::new(EventKind::Create), false, EMPTY);
        let hash = session.last_hash().map(str::to_string);

        // Same width, different source: output is unchanged.
        let same = GeneratorConfig::from_json_str(r#"{"format":{"indent_size":4}}"#).unwrap();
        session.set_config(same);
        assert_eq!(session.passes(), 1);
        assert_eq!(session.last_hash().map(str::to_string), hash);
        let update = session.handle(&ChangeEvent::new(EventKind::Change), false, EMPTY);
        assert!(matches!(update, SessionUpdate::Generated { changed: false, .. }));

        let tabs = GeneratorConfig::from_json_str(r#"{"format":{"indent_with_tabs":true}}"#).unwrap();
        session.set_config(tabs);
        assert!(session.config().format.indent_with_tabs);
        let update = session.handle(&ChangeEvent::new(EventKind::Change), false, EMPTY);
        assert!(matches!(update, SessionUpdate::Generated { changed: true, .. }));
        assert_eq!(session.passes(), 3);
    }

    #[test]
    fn test_update_json_shape() {
        let update = SessionUpdate::Skipped {
            reason: SkipReason::Dragging,
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["status"], "skipped");
        assert_eq!(json["reason"], "dragging");
    }
}
