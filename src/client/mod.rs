// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP client for the Bemfa cloud API.
//!
//! The client is stateless: one GET fetches the account's device list, one
//! POST sends a control message. Failures on these paths never surface as
//! errors. A failed fetch reads as an empty device list and a failed control
//! request as `false`; both are warn-logged. Callers (the coordinator above
//! all) decide what the sentinel means.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::command::Command;
use crate::credentials::PrivateKey;
use crate::device::DeviceRecord;
use crate::error::ProtocolError;

// ============================================================================
// CloudConfig - Configuration for the cloud client
// ============================================================================

/// Configuration for a [`CloudClient`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use behome_lib::client::CloudConfig;
/// use behome_lib::credentials::PrivateKey;
///
/// let key = PrivateKey::new("d6a3f8c2e917b0a4").unwrap();
/// let client = CloudConfig::new(key)
///     .with_timeout(Duration::from_secs(5))
///     .into_client()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct CloudConfig {
    private_key: PrivateKey,
    base_url: String,
    timeout: Duration,
}

impl CloudConfig {
    /// Default API base URL.
    pub const DEFAULT_BASE_URL: &'static str = "https://apis.bemfa.com/vb/ha/v1";
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration for the given account key.
    #[must_use]
    pub fn new(private_key: PrivateKey) -> Self {
        Self {
            private_key,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the API base URL (mainly for tests against a mock server).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Creates a `CloudClient` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty or the HTTP client cannot
    /// be created.
    pub fn into_client(self) -> Result<CloudClient, ProtocolError> {
        if self.base_url.is_empty() {
            return Err(ProtocolError::InvalidAddress(self.base_url));
        }
        let base_url = self.base_url.trim_end_matches('/').to_string();

        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(CloudClient {
            base_url,
            client,
            private_key: self.private_key,
        })
    }
}

// ============================================================================
// CloudClient - Stateless HTTP API client
// ============================================================================

/// Stateless client for the cloud's device-list and control endpoints.
#[derive(Debug, Clone)]
pub struct CloudClient {
    base_url: String,
    client: Client,
    private_key: PrivateKey,
}

/// Device-list response envelope.
#[derive(Debug, Deserialize)]
struct ListEnvelope {
    code: i64,
    #[serde(default)]
    data: Option<ListData>,
}

#[derive(Debug, Deserialize)]
struct ListData {
    #[serde(default)]
    array: Vec<DeviceRecord>,
}

/// Control response envelope; only the status code matters.
#[derive(Debug, Deserialize)]
struct ControlEnvelope {
    code: i64,
}

impl CloudClient {
    /// Fetches the account's device list.
    ///
    /// Returns an empty vec on any transport error, HTTP error status,
    /// malformed body, or non-zero response code.
    pub async fn fetch_devices(&self) -> Vec<DeviceRecord> {
        let url = format!("{}/device", self.base_url);

        tracing::debug!(url = %url, "Fetching device list");

        let response = match self
            .client
            .get(&url)
            .query(&[("openID", self.private_key.open_id())])
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(error = %err, "Device list request failed");
                return Vec::new();
            }
        };

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "Device list returned error status");
            return Vec::new();
        }

        let envelope: ListEnvelope = match response.json().await {
            Ok(envelope) => envelope,
            Err(err) => {
                tracing::warn!(error = %err, "Device list body did not parse");
                return Vec::new();
            }
        };

        if envelope.code != 0 {
            tracing::warn!(code = envelope.code, "Device list rejected by the cloud");
            return Vec::new();
        }

        let devices = envelope.data.map(|data| data.array).unwrap_or_default();
        tracing::debug!(count = devices.len(), "Device list fetched");
        devices
    }

    /// Sends a control command to the device behind `topic`.
    ///
    /// `type_code` is the numeric category code from the device record,
    /// echoed back verbatim. Returns `true` iff the cloud acknowledged with
    /// code 0; every failure collapses to `false`.
    pub async fn send_command(&self, topic: &str, command: &Command, type_code: u32) -> bool {
        // Endpoint path spelled exactly as the service spells it.
        let url = format!("{}/postMassage", self.base_url);
        let message = command.payload();

        tracing::debug!(url = %url, topic = %topic, message = %message, "Sending control command");

        let body = json!({
            "openID": self.private_key.open_id(),
            "topicID": topic,
            "type": type_code,
            "message": message,
        });

        let response = match self.client.post(&url).json(&body).send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(topic = %topic, error = %err, "Control request failed");
                return false;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(topic = %topic, status = %response.status(), "Control returned error status");
            return false;
        }

        match response.json::<ControlEnvelope>().await {
            Ok(envelope) if envelope.code == 0 => true,
            Ok(envelope) => {
                tracing::warn!(topic = %topic, code = envelope.code, "Control rejected by the cloud");
                false
            }
            Err(err) => {
                tracing::warn!(topic = %topic, error = %err, "Control response did not parse");
                false
            }
        }
    }

    /// Returns the base URL the client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let key = PrivateKey::new("k").unwrap();
        let config = CloudConfig::new(key);
        assert_eq!(config.base_url(), CloudConfig::DEFAULT_BASE_URL);
    }

    #[test]
    fn into_client_strips_trailing_slash() {
        let key = PrivateKey::new("k").unwrap();
        let client = CloudConfig::new(key)
            .with_base_url("http://localhost:9000/")
            .into_client()
            .unwrap();
        assert_eq!(client.base_url(), "http://localhost:9000");
    }

    #[test]
    fn empty_base_url_is_rejected() {
        let key = PrivateKey::new("k").unwrap();
        let result = CloudConfig::new(key).with_base_url("").into_client();
        assert!(matches!(result, Err(ProtocolError::InvalidAddress(_))));
    }

    #[test]
    fn list_envelope_parses() {
        let envelope: ListEnvelope = serde_json::from_str(
            r#"{"code": 0, "data": {"array": [
                {"deviceID": "d1", "topic": "light002", "id": "light", "type": 2}
            ]}}"#,
        )
        .unwrap();
        assert_eq!(envelope.code, 0);
        assert_eq!(envelope.data.unwrap().array.len(), 1);
    }

    #[test]
    fn envelope_without_data_parses() {
        let envelope: ListEnvelope = serde_json::from_str(r#"{"code": 40001}"#).unwrap();
        assert_eq!(envelope.code, 40001);
        assert!(envelope.data.is_none());
    }
}
