//! Rate-condition tunables.
//!
//! The failed-attempt trigger fires when the number of attempts inside a
//! trailing window reaches a threshold. Both knobs live here so deployments
//! can adjust them without code changes; the defaults are the reference
//! behavior (3 attempts in 5 minutes).

use serde::{Deserialize, Serialize};

/// Tunables for the failed-attempt rate condition.
///
/// Passed to [`FanoutEngine::new`](crate::engine::FanoutEngine::new) at
/// construction. There is no file or environment loading: the host owns
/// where these values come from.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct FanoutConfig {
    /// Sliding window over failed access attempts, in milliseconds.
    #[serde(default = "default_attempt_window_ms")]
    pub attempt_window_ms: u64,
    /// Number of attempts within the window at which the alert fires.
    #[serde(default = "default_attempt_threshold")]
    pub attempt_threshold: u64,
}

impl Default for FanoutConfig {
    fn default() -> Self {
        Self {
            attempt_window_ms: default_attempt_window_ms(),
            attempt_threshold: default_attempt_threshold(),
        }
    }
}

fn default_attempt_window_ms() -> u64 {
    // 5 minutes
    5 * 60 * 1000
}

fn default_attempt_threshold() -> u64 {
    3
}
