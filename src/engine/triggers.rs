//! Trigger handlers: lock-state changes and failed-attempt records.
//!
//! Each handler is one stateless pass: observe the change, decide whether
//! the notification condition holds, build the payload, and hand it to the
//! fanout path. Neither handler returns an error - see the module docs on
//! [`super`] for the propagation policy.

use chrono::{TimeZone, Utc};
use serde_json::Value;

use super::events::FailedAttempt;
use super::{invocation_id, FanoutEngine};
use crate::payload::NotificationPayload;
use crate::push::PushTransport;
use crate::store::{DeviceStore, StoreError};

impl<S: DeviceStore, P: PushTransport> FanoutEngine<S, P> {
    /// Handle a lock-state change.
    ///
    /// Notifies iff the new value is exactly JSON `false` (unlocked). A
    /// re-engaged lock or any non-boolean value transitions straight back
    /// to idle with no dispatch.
    pub async fn on_lock_state_changed(&self, before: &Value, after: &Value) {
        let inv = invocation_id();
        if *after != Value::Bool(false) {
            log::debug!("[Trigger {inv}] Lock state {before} -> {after} is not an unlock, ignoring");
            return;
        }

        log::info!("[Trigger {inv}] Door unlocked (was {before}), notifying all devices");
        self.notify_all_devices(&inv, &NotificationPayload::door_unlocked())
            .await;
    }

    /// Handle a newly created failed access attempt.
    ///
    /// Counts attempts in the trailing window ending at the attempt's own
    /// timestamp and notifies when the count reaches the configured
    /// threshold. The dispatched payload carries the live count.
    pub async fn on_failed_attempt(&self, attempt: &FailedAttempt) {
        let inv = invocation_id();
        let count = match self.recent_attempt_count(attempt.timestamp).await {
            Ok(count) => count,
            Err(err) => {
                // Transient store failure: end the invocation, the host's
                // at-least-once redelivery is the retry mechanism.
                log::warn!(
                    "[Trigger {inv}] Could not count recent failed attempts for {}: {err}",
                    attempt.id
                );
                return;
            }
        };

        if count < self.config.attempt_threshold {
            log::debug!(
                "[Trigger {inv}] {count} failed attempts in window, below threshold {}",
                self.config.attempt_threshold
            );
            return;
        }

        log::info!(
            "[Trigger {inv}] {count} failed attempts within the last {}ms, notifying all devices",
            self.config.attempt_window_ms
        );
        let payload = NotificationPayload::failed_attempts(count, self.config.attempt_window_ms);
        self.notify_all_devices(&inv, &payload).await;
    }

    /// Count failed attempts in the closed window ending at `reference_ms`.
    ///
    /// Both bounds are inclusive. The triggering record is already
    /// persisted when the query runs, so it counts toward its own
    /// threshold - changing that would shift the effective threshold by
    /// one event.
    async fn recent_attempt_count(&self, reference_ms: i64) -> Result<u64, StoreError> {
        let window = i64::try_from(self.config.attempt_window_ms).unwrap_or(i64::MAX);
        let lower_ms = reference_ms.saturating_sub(window);
        log::debug!(
            "Counting failed attempts in [{} .. {}]",
            fmt_ms(lower_ms),
            fmt_ms(reference_ms)
        );
        self.store.count_failed_attempts(lower_ms, reference_ms).await
    }
}

fn fmt_ms(ms: i64) -> String {
    Utc.timestamp_millis_opt(ms)
        .single()
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| format!("{ms}ms"))
}
