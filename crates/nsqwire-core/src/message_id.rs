//! Fixed-width message identifier.
//!
//! The daemon assigns every delivered message a 16-byte id. Clients echo it
//! back verbatim in `FIN`, `REQ` and `TOUCH`, so the wire form is the raw
//! bytes; hex is only used for display and parsing from text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Width of a message id on the wire.
pub const MESSAGE_ID_LEN: usize = 16;

/// A daemon-assigned message identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MessageId([u8; MESSAGE_ID_LEN]);

impl MessageId {
    /// Creates an id from its raw bytes.
    pub const fn new(bytes: [u8; MESSAGE_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Creates an id from a slice, which must be exactly 16 bytes.
    pub fn from_slice(bytes: &[u8]) -> CoreResult<Self> {
        let raw: [u8; MESSAGE_ID_LEN] =
            bytes.try_into().map_err(|_| CoreError::InvalidLength {
                expected: MESSAGE_ID_LEN,
                actual: bytes.len(),
            })?;
        Ok(Self(raw))
    }

    /// Returns the wire bytes.
    pub fn as_bytes(&self) -> &[u8; MESSAGE_ID_LEN] {
        &self.0
    }
}

impl From<[u8; MESSAGE_ID_LEN]> for MessageId {
    fn from(bytes: [u8; MESSAGE_ID_LEN]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for MessageId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for MessageId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s.trim())?;
        Self::from_slice(&bytes)
    }
}

impl TryFrom<String> for MessageId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MessageId> for String {
    fn from(id: MessageId) -> Self {
        id.to_string()
    }
}
