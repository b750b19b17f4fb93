//! Single-message publish commands.
//!
//! All variants send the message in the body; they differ in what precedes
//! it:
//!
//! ```text
//! PUB        | message                                     |
//! PUB_TRACE  | trace id (8 BE) | message                   |
//! PUB_EXT    | ext len (2 BE)  | ext JSON | message        |
//! ```
//!
//! The partition argument is passed through to the header untouched.

use bytes::{BufMut, Bytes, BytesMut};

use crate::command::{Command, param};
use crate::error::{ProtocolError, ProtocolResult};
use crate::verb::Verb;

/// Largest extension block the 2-byte length field can describe.
pub const MAX_EXT_LEN: usize = u16::MAX as usize;

/// Creates a `PUB` command for `topic`, letting the daemon pick the partition.
pub fn publish(topic: &str, body: impl Into<Bytes>) -> Command {
    Command::new(Verb::Publish, vec![param(topic)], Some(body.into()))
}

/// Creates a `PUB` command for a specific partition.
pub fn publish_with_part(topic: &str, partition: &str, body: impl Into<Bytes>) -> Command {
    Command::new(
        Verb::Publish,
        vec![param(topic), param(partition)],
        Some(body.into()),
    )
}

/// Creates a `PUB_TRACE` command, prefixing the message with its trace id.
pub fn publish_trace(topic: &str, partition: &str, trace_id: u64, body: &[u8]) -> Command {
    let mut buf = BytesMut::with_capacity(8 + body.len());
    buf.put_u64(trace_id);
    buf.put_slice(body);
    Command::new(
        Verb::PublishTrace,
        vec![param(topic), param(partition)],
        Some(buf.freeze()),
    )
}

/// Creates a `PUB_EXT` command carrying a pre-encoded JSON extension block.
///
/// Fails if the block is longer than [`MAX_EXT_LEN`].
pub fn publish_with_json_ext(
    topic: &str,
    partition: &str,
    body: &[u8],
    json_ext: &[u8],
) -> ProtocolResult<Command> {
    let ext_len = ext_len(json_ext)?;

    let mut buf = BytesMut::with_capacity(2 + json_ext.len() + body.len());
    buf.put_u16(ext_len);
    buf.put_slice(json_ext);
    buf.put_slice(body);
    Ok(Command::new(
        Verb::PublishExt,
        vec![param(topic), param(partition)],
        Some(buf.freeze()),
    ))
}

/// Checks that an extension block fits its 2-byte length field.
pub(crate) fn ext_len(json_ext: &[u8]) -> ProtocolResult<u16> {
    u16::try_from(json_ext.len()).map_err(|_| ProtocolError::ExtTooLarge {
        size: json_ext.len(),
        max: MAX_EXT_LEN,
    })
}
