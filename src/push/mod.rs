//! Push transport seam.
//!
//! The transport is a multicast primitive: send one payload to N recipients,
//! get back one outcome per recipient, positionally aligned with the input.
//! The engine never retries individual recipients - a per-recipient failure
//! is either permanent (the token is pruned from the registry) or transient
//! (logged, the token stays). A whole-batch failure means the outcome of
//! every send is unknown, so no cleanup happens for that batch.
//!
//! [`PushTransport`] is the injected capability; [`fcm`] is the production
//! adapter speaking the FCM legacy multicast protocol.

// Rust guideline compliant 2026-02

pub mod fcm;

use async_trait::async_trait;

use crate::payload::NotificationPayload;
use crate::store::DeviceToken;

/// Per-recipient delivery error classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryErrorKind {
    /// The token is malformed and will never be deliverable.
    InvalidToken,
    /// The token was valid once but its registration is gone
    /// (app uninstalled, credential revoked).
    TokenNotRegistered,
    /// The push service is temporarily unavailable.
    Unavailable,
    /// The push service reported an internal error.
    Internal,
    /// Any other per-recipient error, carried verbatim.
    Other(String),
}

impl DeliveryErrorKind {
    /// Whether this recipient will never be deliverable again.
    ///
    /// Only permanently-invalid kinds trigger registry cleanup; every
    /// other failure leaves the token registered.
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::InvalidToken | Self::TokenNotRegistered)
    }
}

impl std::fmt::Display for DeliveryErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidToken => write!(f, "invalid token"),
            Self::TokenNotRegistered => write!(f, "token not registered"),
            Self::Unavailable => write!(f, "service unavailable"),
            Self::Internal => write!(f, "service internal error"),
            Self::Other(code) => write!(f, "{code}"),
        }
    }
}

/// The result of delivering one payload to one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOutcome {
    /// The recipient token this outcome belongs to.
    pub token: DeviceToken,
    /// `None` on success, otherwise the classified failure.
    pub error: Option<DeliveryErrorKind>,
}

impl DeliveryOutcome {
    /// Whether the payload reached the push service for this token.
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Errors that fail an entire multicast call.
///
/// When one of these surfaces, no per-recipient outcome exists and the
/// engine must not prune any token (outcomes are uncertain).
#[derive(Debug)]
pub enum PushError {
    /// The request never completed (connect, timeout, TLS).
    Transport(String),
    /// The push service rejected the batch outright.
    Status(u16, String),
    /// The service response could not be decoded.
    Decode(String),
}

impl std::fmt::Display for PushError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(msg) => write!(f, "push transport failed: {msg}"),
            Self::Status(code, body) => write!(f, "push service returned HTTP {code}: {body}"),
            Self::Decode(msg) => write!(f, "push response decode failed: {msg}"),
        }
    }
}

impl std::error::Error for PushError {}

impl From<reqwest::Error> for PushError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// A multicast push delivery capability.
#[async_trait]
pub trait PushTransport: Send + Sync {
    /// Send `payload` to every token in `tokens` in one batch.
    ///
    /// Callers never pass an empty slice - the engine checks for an empty
    /// registry first and skips the dispatch entirely.
    ///
    /// # Errors
    ///
    /// Returns a [`PushError`] only when the whole batch failed. Individual
    /// recipient failures are reported through the outcomes, which are
    /// positionally aligned with `tokens`.
    async fn send_multicast(
        &self,
        tokens: &[DeviceToken],
        payload: &NotificationPayload,
    ) -> Result<Vec<DeliveryOutcome>, PushError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_two_kinds_are_permanent() {
        assert!(DeliveryErrorKind::InvalidToken.is_permanent());
        assert!(DeliveryErrorKind::TokenNotRegistered.is_permanent());
        assert!(!DeliveryErrorKind::Unavailable.is_permanent());
        assert!(!DeliveryErrorKind::Internal.is_permanent());
        assert!(!DeliveryErrorKind::Other("MismatchSenderId".to_string()).is_permanent());
    }

    #[test]
    fn test_outcome_succeeded() {
        let ok = DeliveryOutcome {
            token: DeviceToken::from("tok-1"),
            error: None,
        };
        let failed = DeliveryOutcome {
            token: DeviceToken::from("tok-2"),
            error: Some(DeliveryErrorKind::Unavailable),
        };
        assert!(ok.succeeded());
        assert!(!failed.succeeded());
    }
}
