//! Typed identify configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Client metadata sent in the `IDENTIFY` body.
///
/// Every field is optional and left out of the JSON when unset, so the
/// daemon applies its own defaults. Keys the daemon understands but this
/// struct does not name go in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentifyConfig {
    /// Identifier reported in daemon stats.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// Hostname reported in daemon stats.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,

    /// Library name and version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// Ask the daemon to answer `IDENTIFY` with its negotiated settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_negotiation: Option<bool>,

    /// Heartbeat interval in milliseconds; `-1` disables heartbeats.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heartbeat_interval: Option<i64>,

    /// Daemon-side output buffer size in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_buffer_size: Option<i64>,

    /// Daemon-side output buffer flush timeout in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_buffer_timeout: Option<i64>,

    /// Upgrade the connection to TLS after `IDENTIFY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_v1: Option<bool>,

    /// Enable snappy compression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snappy: Option<bool>,

    /// Enable deflate compression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deflate: Option<bool>,

    /// Deflate level (1-9).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deflate_level: Option<u8>,

    /// Percentage of messages to receive (0-99).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u8>,

    /// Per-client message timeout in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg_timeout: Option<i64>,

    /// Ask for extension blocks on delivered messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extend_support: Option<bool>,

    /// Additional keys, passed through as-is.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl IdentifyConfig {
    /// Creates an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set client_id.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Builder: set hostname.
    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// Builder: set user_agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Builder: set feature_negotiation.
    pub fn feature_negotiation(mut self, enabled: bool) -> Self {
        self.feature_negotiation = Some(enabled);
        self
    }

    /// Builder: set heartbeat_interval.
    pub fn heartbeat_interval(mut self, millis: i64) -> Self {
        self.heartbeat_interval = Some(millis);
        self
    }

    /// Builder: set extend_support.
    pub fn extend_support(mut self, enabled: bool) -> Self {
        self.extend_support = Some(enabled);
        self
    }

    /// Builder: add an extra key.
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Checks value ranges the daemon would reject.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(level) = self.deflate_level {
            if !(1..=9).contains(&level) {
                return Err(format!("deflate_level must be 1-9, got {level}"));
            }
        }
        if let Some(rate) = self.sample_rate {
            if rate > 99 {
                return Err(format!("sample_rate must be 0-99, got {rate}"));
            }
        }
        if self.snappy == Some(true) && self.deflate == Some(true) {
            return Err("snappy and deflate cannot both be enabled".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::identify;

    #[test]
    fn empty_config_is_empty_object() {
        let json = serde_json::to_string(&IdentifyConfig::new()).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn set_fields_and_extras_are_flat() {
        let config = IdentifyConfig::new()
            .client_id("worker-1")
            .hostname("host-a.internal")
            .user_agent("nsqwire/0.1")
            .feature_negotiation(true)
            .heartbeat_interval(30_000)
            .extend_support(true)
            .extra("desired_tag", "blue");

        let cmd = identify(&config).unwrap();
        let body: serde_json::Value = serde_json::from_slice(cmd.body().unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "client_id": "worker-1",
                "hostname": "host-a.internal",
                "user_agent": "nsqwire/0.1",
                "feature_negotiation": true,
                "heartbeat_interval": 30000,
                "extend_support": true,
                "desired_tag": "blue",
            })
        );
    }

    #[test]
    fn unknown_keys_land_in_extra() {
        let config: IdentifyConfig =
            serde_json::from_str(r#"{"client_id":"c","long_id":"host.example"}"#).unwrap();
        assert_eq!(config.client_id.as_deref(), Some("c"));
        assert_eq!(
            config.extra.get("long_id"),
            Some(&serde_json::json!("host.example"))
        );
    }

    #[test]
    fn validate_ranges() {
        assert!(IdentifyConfig::new().validate().is_ok());

        let bad_level = IdentifyConfig {
            deflate_level: Some(10),
            ..Default::default()
        };
        assert!(bad_level.validate().is_err());

        let both = IdentifyConfig {
            snappy: Some(true),
            deflate: Some(true),
            ..Default::default()
        };
        assert!(both.validate().unwrap_err().contains("snappy"));
    }
}
