// SPDX-FileCopyrightText: 2026 Ndira Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Ndira workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A validated, protocol-native WhatsApp chat handle (serialized JID),
/// e.g. `263775123456@c.us`. Produced only by the recipient resolver.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatHandle(pub String);

impl std::fmt::Display for ChatHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Discriminant for the two canonical notification shapes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotifyMode {
    Message,
    Receipt,
}

/// Generate a short uppercase token: the first hyphen-segment of a fresh
/// v4 UUID, uppercased (8 hex characters).
///
/// Used for generated sale numbers and log correlation identifiers.
pub fn short_uid() -> String {
    let id = uuid::Uuid::new_v4().to_string();
    id.split('-')
        .next()
        .unwrap_or(&id)
        .to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn short_uid_is_eight_uppercase_hex_chars() {
        let token = short_uid();
        assert_eq!(token.len(), 8);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(token, token.to_ascii_uppercase());
    }

    #[test]
    fn short_uid_values_differ() {
        assert_ne!(short_uid(), short_uid());
    }

    #[test]
    fn notify_mode_display_round_trip() {
        for mode in [NotifyMode::Message, NotifyMode::Receipt] {
            let s = mode.to_string();
            let parsed = NotifyMode::from_str(&s).expect("should parse back");
            assert_eq!(mode, parsed);
        }
    }

    #[test]
    fn notify_mode_serializes_lowercase() {
        let json = serde_json::to_string(&NotifyMode::Receipt).unwrap();
        assert_eq!(json, "\"receipt\"");
    }

    #[test]
    fn chat_handle_displays_inner_value() {
        let handle = ChatHandle("263775123456@c.us".into());
        assert_eq!(handle.to_string(), "263775123456@c.us");
    }
}
