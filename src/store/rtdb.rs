//! Realtime Database REST adapter for the store seam.
//!
//! Speaks the Firebase Realtime-Database-style JSON REST protocol:
//!
//! - failed-attempt counting is an ordered range query over the
//!   `failedAttempts` node (`orderBy="timestamp"` with inclusive
//!   `startAt`/`endAt` bounds),
//! - token resolution reads the whole `users` node and flattens each
//!   user's `fcmTokens` collection,
//! - cleanup is a single-key `DELETE` under `users/{token}`, which the
//!   database treats as success even when the path is already gone.
//!
//! The caller should reuse one [`RtdbStore`] (one pooled `reqwest::Client`)
//! across invocations.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};

use super::{DeviceStore, DeviceToken, StoreError};
use crate::constants;

/// Store adapter backed by a Realtime Database REST endpoint.
#[derive(Debug, Clone)]
pub struct RtdbStore {
    client: reqwest::Client,
    base_url: String,
    auth: Option<String>,
}

/// One user's registry entry. Only the token collection matters here;
/// any other per-user fields are ignored.
#[derive(Debug, Deserialize)]
struct UserRecord {
    #[serde(default, rename = "fcmTokens")]
    fcm_tokens: Option<BTreeMap<String, serde_json::Value>>,
}

impl RtdbStore {
    /// Creates a store adapter for the given database base URL
    /// (e.g. `https://my-project.firebaseio.com`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(base_url: impl Into<String>) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(constants::HTTP_REQUEST_TIMEOUT)
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Creates a store adapter with a pre-configured HTTP client.
    ///
    /// Useful for testing or when custom client configuration is needed.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            auth: None,
        }
    }

    /// Attach a database auth credential, sent as the `auth` query
    /// parameter on every request.
    pub fn with_auth(mut self, secret: impl Into<String>) -> Self {
        self.auth = Some(secret.into());
        self
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Some(secret) => request.query(&[("auth", secret.as_str())]),
            None => request,
        }
    }
}

#[async_trait]
impl DeviceStore for RtdbStore {
    async fn count_failed_attempts(
        &self,
        lower_ms: i64,
        upper_ms: i64,
    ) -> Result<u64, StoreError> {
        let url = format!("{}/failedAttempts.json", self.base_url);
        let request = self.client.get(&url).query(&[
            // RTDB requires the indexed child name to be a quoted JSON string
            ("orderBy", "\"timestamp\"".to_string()),
            ("startAt", lower_ms.to_string()),
            ("endAt", upper_ms.to_string()),
        ]);

        let response = self.authed(request).send().await?;
        if !response.status().is_success() {
            return Err(StoreError::Status(response.status().as_u16()));
        }

        // The node is `null` when no records match the range
        let body: serde_json::Value = response.json().await?;
        match body {
            serde_json::Value::Null => Ok(0),
            serde_json::Value::Object(records) => Ok(records.len() as u64),
            other => Err(StoreError::Decode(format!(
                "expected object or null for failedAttempts, got {other}"
            ))),
        }
    }

    async fn all_device_tokens(&self) -> Result<Vec<DeviceToken>, StoreError> {
        let url = format!("{}/users.json", self.base_url);
        let response = self.authed(self.client.get(&url)).send().await?;
        if !response.status().is_success() {
            return Err(StoreError::Status(response.status().as_u16()));
        }

        let users: Option<BTreeMap<String, UserRecord>> = response.json().await?;
        Ok(flatten_registry(users.unwrap_or_default()))
    }

    async fn remove_token(&self, token: &DeviceToken) -> Result<(), StoreError> {
        let url = format!("{}/users/{}.json", self.base_url, token.as_ref());
        let response = self.authed(self.client.delete(&url)).send().await?;
        let status = response.status();

        // 404 means the entry is already gone - the deletion is satisfied
        if status.is_success() || status.as_u16() == 404 {
            log::debug!("[Rtdb] Removed registry entry for token {token}");
            Ok(())
        } else {
            Err(StoreError::Status(status.as_u16()))
        }
    }
}

/// Flatten every user's token collection into one de-duplicated list.
///
/// Users without an `fcmTokens` collection are skipped. A token registered
/// under more than one user appears once.
fn flatten_registry(users: BTreeMap<String, UserRecord>) -> Vec<DeviceToken> {
    let mut seen = HashSet::new();
    let mut tokens = Vec::new();
    for record in users.into_values() {
        let Some(fcm_tokens) = record.fcm_tokens else {
            continue;
        };
        for token in fcm_tokens.into_keys() {
            if seen.insert(token.clone()) {
                tokens.push(DeviceToken(token));
            }
        }
    }
    tokens
}
