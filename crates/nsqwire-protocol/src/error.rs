//! Protocol error types.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors that can occur while building, writing or reading commands.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Extension JSON block does not fit its 2-byte length field.
    #[error("extension block too large: {size} bytes (max: {max})")]
    ExtTooLarge { size: usize, max: usize },

    /// Per-message list does not line up with the message list.
    #[error("argument list mismatch: {messages} messages but {items} {what}")]
    LengthMismatch {
        messages: usize,
        items: usize,
        what: &'static str,
    },

    /// A single record does not fit its 4-byte length field.
    #[error("message too large: {size} bytes")]
    MessageTooLarge { size: usize },

    /// Failed to serialize a JSON payload.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The sink failed part-way through a command.
    #[error("write failed after {written} bytes: {source}")]
    Write {
        written: u64,
        #[source]
        source: std::io::Error,
    },

    /// IO error while reading.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Header line names a verb this crate does not know.
    #[error("unknown verb: {0}")]
    UnknownVerb(String),

    /// Header line is empty or not terminated.
    #[error("malformed header: {0}")]
    MalformedHeader(String),

    /// Stream ended in the middle of a command.
    #[error("incomplete message: expected {expected} bytes, got {received}")]
    IncompleteMessage { expected: usize, received: usize },

    /// Consume offset text is not `<kind>:<value>`.
    #[error("invalid consume offset: {0}")]
    InvalidOffset(String),

    /// Declared body length exceeds what the reader accepts.
    #[error("body too large: {size} bytes (max: {max})")]
    BodyTooLarge { size: usize, max: usize },
}

impl ProtocolError {
    /// Returns true for errors caused by caller-supplied arguments.
    ///
    /// These are detected before any encoding work, so no partial output
    /// exists when they are returned.
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            Self::ExtTooLarge { .. } | Self::LengthMismatch { .. } | Self::MessageTooLarge { .. }
        )
    }

    /// Bytes already handed to the sink when a write failed.
    pub fn bytes_written(&self) -> Option<u64> {
        match self {
            Self::Write { written, .. } => Some(*written),
            _ => None,
        }
    }
}
