//! Multicast dispatch and registry cleanup.
//!
//! One dispatch addresses the de-duplicated union of every token resolved
//! from the registry at call time. Per-recipient failures split two ways:
//! permanently-invalid tokens are deleted from the registry, everything
//! else is logged and kept. A whole-batch transport failure means every
//! outcome is uncertain, so no token is deleted for that batch.
//!
//! Cleanup deletions run concurrently and are all awaited before the
//! invocation completes; a deletion failure is logged, never escalated.

use futures_util::future::join_all;

use super::FanoutEngine;
use crate::payload::NotificationPayload;
use crate::push::{DeliveryOutcome, PushTransport};
use crate::store::{DeviceStore, DeviceToken};

impl<S: DeviceStore, P: PushTransport> FanoutEngine<S, P> {
    /// Resolve every registered device token and multicast `payload`.
    ///
    /// Returns after the dispatch and all resulting cleanup deletions have
    /// settled. Never surfaces an error: registry hygiene and delivery are
    /// both best-effort.
    pub(crate) async fn notify_all_devices(&self, inv: &str, payload: &NotificationPayload) {
        let tokens = match self.store.all_device_tokens().await {
            Ok(tokens) => tokens,
            Err(err) => {
                log::warn!("[Fanout {inv}] Could not resolve device tokens: {err}");
                return;
            }
        };

        if tokens.is_empty() {
            log::info!("[Fanout {inv}] No registered device tokens, nothing to send");
            return;
        }

        let outcomes = match self.push.send_multicast(&tokens, payload).await {
            Ok(outcomes) => outcomes,
            Err(err) => {
                // The whole batch failed, so per-token outcomes are
                // uncertain: keep every token.
                log::warn!("[Fanout {inv}] Multicast dispatch failed, skipping cleanup: {err}");
                return;
            }
        };

        let delivered = outcomes.iter().filter(|o| o.succeeded()).count();
        log::info!(
            "[Fanout {inv}] Notifications sent: {delivered} of {} recipients",
            outcomes.len()
        );

        self.prune_invalid_tokens(inv, &outcomes).await;
    }

    /// Delete every token whose outcome reports a permanently-invalid kind.
    ///
    /// Deletions are issued concurrently and joined; each is idempotent on
    /// the store side, so overlapping invocations pruning the same token
    /// are harmless.
    async fn prune_invalid_tokens(&self, inv: &str, outcomes: &[DeliveryOutcome]) {
        let mut stale: Vec<&DeviceToken> = Vec::new();
        for outcome in outcomes {
            let Some(kind) = &outcome.error else {
                continue;
            };
            if kind.is_permanent() {
                log::warn!(
                    "[Fanout {inv}] Token {} is permanently undeliverable ({kind}), removing",
                    outcome.token
                );
                if !stale.contains(&&outcome.token) {
                    stale.push(&outcome.token);
                }
            } else {
                log::warn!(
                    "[Fanout {inv}] Delivery to {} failed ({kind}), keeping token",
                    outcome.token
                );
            }
        }

        if stale.is_empty() {
            return;
        }

        let deletions = stale
            .iter()
            .map(|token| async move { (*token, self.store.remove_token(token).await) });

        let mut removed = 0usize;
        for (token, result) in join_all(deletions).await {
            match result {
                Ok(()) => removed += 1,
                Err(err) => {
                    log::warn!("[Fanout {inv}] Failed to remove token {token}: {err}");
                }
            }
        }
        log::info!(
            "[Fanout {inv}] Registry cleanup done: removed {removed} of {}",
            stale.len()
        );
    }
}
