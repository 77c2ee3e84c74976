//! Lockwatch - security notification fanout engine.
//!
//! This crate reacts to state changes in a shared device-status store and
//! dispatches push notifications to a fleet of registered client devices.
//! Two triggers matter: the lock-state field flipping to "unlocked", and a
//! failed-access-attempt record being appended.
//!
//! # Architecture
//!
//! ```text
//! Store mutation (lock state / failed attempt)
//!     ↓
//! TriggerEvent delivered by the host (at-least-once, possibly duplicated)
//!     ↓
//! FanoutEngine handler evaluates the notification condition
//!     ↓  (failed-attempt path: sliding-window count via the store)
//! Multicast push to every registered device token
//!     ↓
//! Per-token outcomes → permanently-invalid tokens pruned from the registry
//! ```
//!
//! The store and push transport are injected capabilities ([`DeviceStore`]
//! and [`PushTransport`]), so tests substitute in-process fakes. Concrete
//! adapters for a Firebase Realtime-Database-style store and the FCM legacy
//! multicast API ship in [`store::rtdb`] and [`push::fcm`].
//!
//! # Modules
//!
//! - [`engine`] - Trigger handlers, fanout dispatch, registry cleanup
//! - [`store`] - Device/event store seam and the RTDB REST adapter
//! - [`push`] - Push transport seam and the FCM multicast adapter
//! - [`payload`] - Notification payload construction
//! - [`config`] - Rate-condition tunables

// Library modules
pub mod config;
pub mod constants;
pub mod engine;
pub mod payload;
pub mod push;
pub mod store;

// Re-export commonly used types
pub use config::FanoutConfig;
pub use engine::{FailedAttempt, FanoutEngine, TriggerEvent};
pub use payload::NotificationPayload;
pub use push::fcm::FcmTransport;
pub use push::{DeliveryErrorKind, DeliveryOutcome, PushError, PushTransport};
pub use store::rtdb::RtdbStore;
pub use store::{DeviceStore, DeviceToken, StoreError};
