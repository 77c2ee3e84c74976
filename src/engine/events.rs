//! Inbound trigger events.
//!
//! The host observes the shared store and delivers one [`TriggerEvent`] per
//! mutation through [`FanoutEngine::handle_event`]. Delivery is
//! at-least-once: the same logical event may arrive more than once, and
//! nothing downstream assumes "fires exactly once".
//!
//! [`FanoutEngine::handle_event`]: super::FanoutEngine::handle_event

// Rust guideline compliant 2026-02

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A failed access attempt record, as appended to the store by the lock
/// hardware. Append-only; this crate only ever counts these.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FailedAttempt {
    /// Store-assigned id of the record.
    pub id: String,
    /// When the attempt happened, epoch milliseconds.
    pub timestamp: i64,
}

/// A store mutation delivered by the host.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TriggerEvent {
    /// The lock-state field changed.
    ///
    /// The field is externally owned and untyped, so both values arrive as
    /// raw JSON. Only an `after` of exactly `false` means "unlocked";
    /// anything else is a non-unlock change and produces no notification.
    LockStateChanged {
        /// Value before the change, as stored.
        before: Value,
        /// Value after the change, as stored.
        after: Value,
    },

    /// A failed access attempt record was created.
    ///
    /// The record is already persisted when this event arrives, which is
    /// why the window query counts the triggering attempt itself.
    FailedAttemptCreated {
        /// The newly created record.
        attempt: FailedAttempt,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_shape() {
        let event = TriggerEvent::FailedAttemptCreated {
            attempt: FailedAttempt {
                id: "-NxA3f".to_string(),
                timestamp: 250_000,
            },
        };
        let json = serde_json::to_value(&event).expect("serialize");
        assert_eq!(json["type"], "failed_attempt_created");
        assert_eq!(json["attempt"]["timestamp"], 250_000);
    }

    #[test]
    fn test_lock_event_preserves_raw_values() {
        let json = serde_json::json!({
            "type": "lock_state_changed",
            "before": true,
            "after": "jammed",
        });
        let event: TriggerEvent = serde_json::from_value(json).expect("deserialize");
        match event {
            TriggerEvent::LockStateChanged { before, after } => {
                assert_eq!(before, Value::Bool(true));
                assert_eq!(after, Value::String("jammed".to_string()));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
