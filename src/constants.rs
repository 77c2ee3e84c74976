//! Shared constants.

use std::time::Duration;

/// Timeout applied to every store and push HTTP request.
pub const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// FCM legacy HTTP multicast endpoint.
pub const FCM_SEND_URL: &str = "https://fcm.googleapis.com/fcm/send";
