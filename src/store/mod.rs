//! Device/event store seam.
//!
//! The shared store owns the lock state, the append-only failed-attempt log,
//! and the per-user device token registry. This crate never writes anything
//! except single-token deletions during registry cleanup; everything else is
//! read-only. The store is externally synchronized - no client-side locking,
//! correctness under concurrent invocations relies on idempotent deletes.
//!
//! [`DeviceStore`] is the injected capability; [`rtdb`] is the production
//! adapter speaking the Realtime Database REST protocol. Tests substitute
//! in-process fakes.

// Rust guideline compliant 2026-02

pub mod rtdb;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A device registration token (push credential).
///
/// Tokens are credentials, so `Display` truncates them for log output.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceToken(pub String);

impl std::fmt::Display for DeviceToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Truncate for display
        if self.0.len() > 12 {
            write!(f, "{}...", &self.0[..12])
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl From<String> for DeviceToken {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DeviceToken {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for DeviceToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Errors surfaced by store operations.
///
/// All of these are transient from the engine's point of view: the
/// invocation logs and ends, and the host's at-least-once redelivery is
/// the retry mechanism.
#[derive(Debug)]
pub enum StoreError {
    /// Store unreachable or the request failed in transit.
    Unreachable(String),
    /// Store replied with a non-success HTTP status.
    Status(u16),
    /// Response body could not be decoded.
    Decode(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unreachable(msg) => write!(f, "store unreachable: {msg}"),
            Self::Status(code) => write!(f, "store returned HTTP {code}"),
            Self::Decode(msg) => write!(f, "store response decode failed: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Unreachable(err.to_string())
        }
    }
}

/// Read and cleanup access to the shared device-status store.
///
/// Operations are not transactional with each other: tokens may be added
/// or removed by external actors between resolution and a later removal.
/// That race is benign - at worst one extra failed send to an already-dead
/// token, which self-heals on the next cleanup pass.
#[async_trait]
pub trait DeviceStore: Send + Sync {
    /// Count failed access attempts whose timestamp lies in the closed
    /// interval `[lower_ms, upper_ms]` (both bounds inclusive, epoch
    /// milliseconds).
    async fn count_failed_attempts(&self, lower_ms: i64, upper_ms: i64)
        -> Result<u64, StoreError>;

    /// Resolve every registered device token across all users.
    ///
    /// Flattens each user's token collection; users without a collection
    /// are skipped. Implementations return each token at most once.
    async fn all_device_tokens(&self) -> Result<Vec<DeviceToken>, StoreError>;

    /// Delete a single token entry from the registry.
    ///
    /// Removing a token that is already gone is success: deletion is
    /// idempotent, which is what makes duplicate trigger delivery and
    /// concurrent cleanup passes safe.
    async fn remove_token(&self, token: &DeviceToken) -> Result<(), StoreError>;
}
