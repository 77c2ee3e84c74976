//! Notification payload construction.
//!
//! A payload is a transient value object built fresh per trigger invocation.
//! The two alert shapes carry fixed strings that existing client apps parse,
//! so the exact wording and the stringly-typed `data` values are load-bearing.

// Rust guideline compliant 2026-02

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A push notification payload: visible notification plus an optional
/// machine-readable `data` block for client-side branching.
///
/// `data` values are always strings, even for numeric counts - clients
/// parse them as strings and that wire shape is kept.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationPayload {
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub body: String,
    /// Optional key/value data delivered alongside the notification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<HashMap<String, String>>,
}

impl NotificationPayload {
    /// Alert sent when the lock state flips to unlocked.
    pub fn door_unlocked() -> Self {
        Self {
            title: "Door Unlocked".to_string(),
            body: "The door was unlocked!".to_string(),
            data: None,
        }
    }

    /// Alert sent when `count` failed access attempts were seen within the
    /// trailing window of `window_ms` milliseconds.
    pub fn failed_attempts(count: u64, window_ms: u64) -> Self {
        let minutes = window_ms / 60_000;
        let mut data = HashMap::new();
        data.insert(
            "click_action".to_string(),
            "FLUTTER_NOTIFICATION_CLICK".to_string(),
        );
        data.insert("status".to_string(), "failed_attempts".to_string());
        data.insert("count".to_string(), count.to_string());

        Self {
            title: "Warning: Multiple Failed Access Attempts".to_string(),
            body: format!(
                "There have been {count} failed access attempts in the last {minutes} minutes."
            ),
            data: Some(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_door_unlocked_payload() {
        let payload = NotificationPayload::door_unlocked();
        assert_eq!(payload.title, "Door Unlocked");
        assert_eq!(payload.body, "The door was unlocked!");
        assert!(payload.data.is_none());
    }

    #[test]
    fn test_failed_attempts_payload() {
        let payload = NotificationPayload::failed_attempts(3, 300_000);
        assert_eq!(payload.title, "Warning: Multiple Failed Access Attempts");
        assert_eq!(
            payload.body,
            "There have been 3 failed access attempts in the last 5 minutes."
        );

        let data = payload.data.expect("data block");
        assert_eq!(
            data.get("click_action").map(String::as_str),
            Some("FLUTTER_NOTIFICATION_CLICK")
        );
        assert_eq!(data.get("status").map(String::as_str), Some("failed_attempts"));
        // Count is transmitted as a string for client parser compatibility
        assert_eq!(data.get("count").map(String::as_str), Some("3"));
    }

    #[test]
    fn test_failed_attempts_body_tracks_window() {
        let payload = NotificationPayload::failed_attempts(4, 120_000);
        assert_eq!(
            payload.body,
            "There have been 4 failed access attempts in the last 2 minutes."
        );
    }

    #[test]
    fn test_serialization_omits_empty_data() {
        let json =
            serde_json::to_value(NotificationPayload::door_unlocked()).expect("serialize");
        assert!(json.get("data").is_none());
    }
}
