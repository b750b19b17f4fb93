//! Per-message JSON extension blocks.
//!
//! Extension-bearing publish commands (`PUB_EXT`, `MPUB_EXT`) carry a small
//! JSON object next to each message body. The daemon reserves keys prefixed
//! with `##` for its own use; everything else is application metadata.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Reserved key holding the decimal trace id.
pub const TRACE_ID_EXT_KEY: &str = "##trace_id";

/// Reserved key holding the client dispatch tag.
pub const DISPATCH_TAG_EXT_KEY: &str = "##client_dispatch_tag";

/// Anything that can render itself as an extension JSON block.
pub trait ExtJson {
    /// Encodes the extension as JSON bytes.
    fn to_json(&self) -> Result<Vec<u8>, serde_json::Error>;
}

/// Standard message extension.
///
/// Serializes to a flat JSON object. Reserved keys win over custom keys with
/// the same name, and keys are emitted in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgExt {
    /// Trace id; omitted from the JSON block when zero.
    #[serde(default)]
    pub trace_id: u64,

    /// Dispatch tag used by the daemon to route to tagged consumers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dispatch_tag: Option<String>,

    /// Application key/value pairs.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom: BTreeMap<String, String>,
}

impl MsgExt {
    /// Creates an empty extension.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the trace id.
    pub fn with_trace_id(mut self, trace_id: u64) -> Self {
        self.trace_id = trace_id;
        self
    }

    /// Builder: set the dispatch tag.
    pub fn with_dispatch_tag(mut self, tag: impl Into<String>) -> Self {
        self.dispatch_tag = Some(tag.into());
        self
    }

    /// Builder: add a custom key.
    pub fn with_custom(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom.insert(key.into(), value.into());
        self
    }

    /// Returns the flat key/value view written on the wire.
    pub fn to_wire_map(&self) -> BTreeMap<String, String> {
        let mut map = self.custom.clone();
        if self.trace_id > 0 {
            map.insert(TRACE_ID_EXT_KEY.to_string(), self.trace_id.to_string());
        }
        if let Some(tag) = self.dispatch_tag.as_deref().filter(|t| !t.is_empty()) {
            map.insert(DISPATCH_TAG_EXT_KEY.to_string(), tag.to_string());
        }
        map
    }
}

impl ExtJson for MsgExt {
    fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&self.to_wire_map())
    }
}

/// Pre-encoded JSON passes through untouched.
impl ExtJson for [u8] {
    fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        Ok(self.to_vec())
    }
}

impl ExtJson for Vec<u8> {
    fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        Ok(self.clone())
    }
}

impl ExtJson for serde_json::Value {
    fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

impl<T: ExtJson + ?Sized> ExtJson for &T {
    fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        (**self).to_json()
    }
}
