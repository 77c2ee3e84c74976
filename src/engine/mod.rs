//! Notification fanout engine.
//!
//! The engine composes the store and push capabilities into the two trigger
//! handlers. Each inbound event is one stateless invocation: evaluate the
//! condition, build a payload, multicast it, prune permanently-invalid
//! tokens. Invocations run concurrently with no mutual exclusion - every
//! I/O point suspends without holding a lock, and correctness under
//! overlap relies on the store's idempotent deletes.
//!
//! Nothing here propagates errors to the host: notification delivery is
//! best-effort backend infrastructure with no synchronous caller, so every
//! failure mode is diagnostic-log only. A transient store failure simply
//! ends the invocation; the host's at-least-once redelivery is the retry.

// Rust guideline compliant 2026-02

pub mod events;
mod fanout;
mod triggers;

pub use events::{FailedAttempt, TriggerEvent};

use std::sync::Arc;

use crate::config::FanoutConfig;
use crate::push::PushTransport;
use crate::store::DeviceStore;

/// The notification fanout engine.
///
/// Holds the injected store and transport capabilities plus the rate
/// tunables. Cheap to share: wrap in an `Arc` and hand a clone to every
/// host task that delivers events.
pub struct FanoutEngine<S, P> {
    store: Arc<S>,
    push: Arc<P>,
    config: FanoutConfig,
}

impl<S: DeviceStore, P: PushTransport> FanoutEngine<S, P> {
    /// Creates an engine over the given capabilities.
    pub fn new(store: Arc<S>, push: Arc<P>, config: FanoutConfig) -> Self {
        Self {
            store,
            push,
            config,
        }
    }

    /// Dispatch one inbound store event to its handler.
    ///
    /// Delivery is at-least-once and possibly duplicated; handlers are
    /// idempotent, so redelivering the same logical event is safe.
    pub async fn handle_event(&self, event: TriggerEvent) {
        match event {
            TriggerEvent::LockStateChanged { before, after } => {
                self.on_lock_state_changed(&before, &after).await;
            }
            TriggerEvent::FailedAttemptCreated { attempt } => {
                self.on_failed_attempt(&attempt).await;
            }
        }
    }
}

/// Short random id correlating the log lines of one invocation.
///
/// Invocations overlap freely, so a bare module prefix is not enough to
/// read interleaved logs.
pub(crate) fn invocation_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_ids_are_short_and_distinct() {
        let a = invocation_id();
        let b = invocation_id();
        assert_eq!(a.len(), 8);
        assert_ne!(a, b);
    }
}
