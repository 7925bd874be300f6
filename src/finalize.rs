//! Finalize Module
//!
//! Scope events handed to downstream tooling, and the serializable result of
//! processing one stylesheet.

use serde::{Deserialize, Serialize};

use crate::scope::NameMap;
use crate::validate::Warning;

/// Identity attached to every message this transform emits.
pub const PLUGIN_NAME: &str = "icss-keyframes";

/// Message type for a local → scoped keyframes mapping.
pub const SCOPED_MESSAGE_TYPE: &str = "icss-scoped";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeEvent {
    pub plugin: String,
    #[serde(rename = "type")]
    pub message_type: String,
    /// Local keyframes name.
    pub name: String,
    /// Scoped keyframes name.
    pub value: String,
}

impl ScopeEvent {
    pub fn new(name: &str, value: &str) -> Self {
        ScopeEvent {
            plugin: PLUGIN_NAME.to_string(),
            message_type: SCOPED_MESSAGE_TYPE.to_string(),
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// Appends events to the compilation's message list in encounter order.
pub fn notify(messages: &mut Vec<ScopeEvent>, events: Vec<ScopeEvent>) {
    messages.extend(events);
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeOutput {
    pub css: String,
    /// Names scoped in this stylesheet (also merged into its `:export`).
    pub exports: NameMap,
    pub warnings: Vec<Warning>,
    pub messages: Vec<ScopeEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_format() {
        let event = ScopeEvent::new("foo", "__file_css__foo");
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            serde_json::json!({
                "plugin": "icss-keyframes",
                "type": "icss-scoped",
                "name": "foo",
                "value": "__file_css__foo",
            })
        );
    }

    #[test]
    fn test_notify_appends_after_existing_messages() {
        let mut messages = vec![ScopeEvent::new("earlier", "x")];
        notify(
            &mut messages,
            vec![ScopeEvent::new("a", "1"), ScopeEvent::new("b", "2")],
        );
        let names: Vec<&str> = messages.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["earlier", "a", "b"]);
    }
}
