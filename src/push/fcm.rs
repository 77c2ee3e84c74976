//! FCM legacy multicast adapter for the push seam.
//!
//! Sends one `registration_ids` batch POST per dispatch and maps the
//! positionally aligned `results` array into [`DeliveryOutcome`]s. The two
//! registration error strings `InvalidRegistration` and `NotRegistered`
//! classify as permanently invalid; everything else stays transient.
//!
//! The caller should reuse a single [`FcmTransport`] across dispatches for
//! connection pooling.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{DeliveryErrorKind, DeliveryOutcome, PushError, PushTransport};
use crate::constants;
use crate::payload::NotificationPayload;
use crate::store::DeviceToken;

/// Push transport backed by the FCM legacy HTTP multicast endpoint.
#[derive(Debug, Clone)]
pub struct FcmTransport {
    client: reqwest::Client,
    send_url: String,
    server_key: String,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    registration_ids: &'a [DeviceToken],
    notification: WireNotification<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a HashMap<String, String>>,
}

#[derive(Serialize)]
struct WireNotification<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Deserialize)]
struct SendResponse {
    #[serde(default)]
    success: u64,
    #[serde(default)]
    failure: u64,
    results: Vec<SendResult>,
}

#[derive(Deserialize)]
struct SendResult {
    #[serde(default)]
    error: Option<String>,
}

impl FcmTransport {
    /// Creates a transport authenticated with the given FCM server key.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(server_key: impl Into<String>) -> Result<Self, PushError> {
        let client = reqwest::Client::builder()
            .timeout(constants::HTTP_REQUEST_TIMEOUT)
            .build()?;
        Ok(Self::with_client(client, constants::FCM_SEND_URL, server_key))
    }

    /// Creates a transport with a pre-configured HTTP client and endpoint.
    ///
    /// Useful for testing or when custom client configuration is needed.
    pub fn with_client(
        client: reqwest::Client,
        send_url: impl Into<String>,
        server_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            send_url: send_url.into(),
            server_key: server_key.into(),
        }
    }
}

#[async_trait]
impl PushTransport for FcmTransport {
    async fn send_multicast(
        &self,
        tokens: &[DeviceToken],
        payload: &NotificationPayload,
    ) -> Result<Vec<DeliveryOutcome>, PushError> {
        let request = SendRequest {
            registration_ids: tokens,
            notification: WireNotification {
                title: &payload.title,
                body: &payload.body,
            },
            data: payload.data.as_ref(),
        };

        let response = self
            .client
            .post(&self.send_url)
            .header("Authorization", format!("key={}", self.server_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PushError::Status(status.as_u16(), body));
        }

        let parsed: SendResponse = response.json().await?;
        if parsed.results.len() != tokens.len() {
            return Err(PushError::Decode(format!(
                "result count {} does not match batch size {}",
                parsed.results.len(),
                tokens.len()
            )));
        }

        log::info!(
            "[Fcm] Multicast done: {} delivered, {} failed",
            parsed.success,
            parsed.failure
        );

        let outcomes = tokens
            .iter()
            .zip(parsed.results)
            .map(|(token, result)| DeliveryOutcome {
                token: token.clone(),
                error: result.error.as_deref().map(kind_from_code),
            })
            .collect();
        Ok(outcomes)
    }
}

/// Map an FCM result error string to its classification.
fn kind_from_code(code: &str) -> DeliveryErrorKind {
    match code {
        "InvalidRegistration" => DeliveryErrorKind::InvalidToken,
        "NotRegistered" => DeliveryErrorKind::TokenNotRegistered,
        "Unavailable" => DeliveryErrorKind::Unavailable,
        "InternalServerError" => DeliveryErrorKind::Internal,
        other => DeliveryErrorKind::Other(other.to_string()),
    }
}
