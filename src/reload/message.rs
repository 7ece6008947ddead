//! Hot Reload Message Protocol
//!
//! JSON messages sent over WebSocket from the dev server to the browser.
//!
//! - `reload`: Trigger full page reload
//! - `connected`: Sent once after the handshake

use serde::{Deserialize, Serialize};

/// Hot reload message sent over WebSocket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HotReloadMessage {
    /// Full page reload
    Reload {
        /// Reaction that produced the change
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },

    /// Connection established
    Connected {
        /// Server version for compatibility check
        version: String,
    },
}

impl HotReloadMessage {
    /// Create a reload message with reason
    pub fn reload(reason: impl Into<String>) -> Self {
        Self::Reload {
            reason: Some(reason.into()),
        }
    }

    /// Create a connected message
    pub fn connected() -> Self {
        Self::Connected {
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"type":"reload"}"#.to_string())
    }

    /// Parse from JSON string
    pub fn from_json(s: &str) -> Option<Self> {
        serde_json::from_str(s).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reload_message() {
        let json = HotReloadMessage::reload("compile-scss (src/scss/index.scss)").to_json();
        assert_eq!(
            json,
            r#"{"type":"reload","reason":"compile-scss (src/scss/index.scss)"}"#
        );
    }

    #[test]
    fn test_connected_message() {
        let json = HotReloadMessage::connected().to_json();
        assert!(json.starts_with(r#"{"type":"connected","version":""#));
        assert!(json.contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_parse_bare_reload() {
        assert_eq!(
            HotReloadMessage::from_json(r#"{"type":"reload"}"#),
            Some(HotReloadMessage::Reload { reason: None })
        );
        assert_eq!(HotReloadMessage::from_json(r#"{"type":"patch"}"#), None);
    }
}
