//! Multi-message publish commands.
//!
//! Every variant shares one envelope: a message count followed by one
//! length-prefixed record per message. The record length covers everything
//! after the length field, so a reader can skip records it does not parse.
//!
//! ```text
//! +-------------+---------------------------------------------+
//! | count (4 BE)| record * count                              |
//! +-------------+---------------------------------------------+
//!
//! MPUB        | len (4 BE) | message                                   |
//! MPUB_TRACE  | len (4 BE) | trace id (8 BE) | message                 |
//! MPUB_EXT    | len (4 BE) | ext len (2 BE)  | ext JSON | message      |
//! ```
//!
//! All arguments are validated before the buffer is allocated, so a failed
//! call never produces a partial body.

use bytes::{BufMut, Bytes, BytesMut};
use nsqwire_core::ExtJson;

use crate::command::{Command, param};
use crate::error::{ProtocolError, ProtocolResult};
use crate::publish::ext_len;
use crate::verb::Verb;

/// Width of the count and record length fields.
const LEN_FIELD: usize = 4;

/// Width of a trace id.
const TRACE_ID_LEN: usize = 8;

/// Width of the extension length field.
const EXT_LEN_FIELD: usize = 2;

/// Creates an `MPUB` command for `topic`.
pub fn multi_publish<B: AsRef<[u8]>>(topic: &str, bodies: &[B]) -> ProtocolResult<Command> {
    let body = encode_plain(bodies)?;
    Ok(Command::new(Verb::MultiPublish, vec![param(topic)], Some(body)))
}

/// Creates an `MPUB` command for a specific partition.
pub fn multi_publish_with_part<B: AsRef<[u8]>>(
    topic: &str,
    partition: &str,
    bodies: &[B],
) -> ProtocolResult<Command> {
    let body = encode_plain(bodies)?;
    Ok(Command::new(
        Verb::MultiPublish,
        vec![param(topic), param(partition)],
        Some(body),
    ))
}

/// Creates an `MPUB` command from buffers that already hold message content.
///
/// Produces the same bytes as [`multi_publish`] with the same contents.
pub fn multi_publish_buffers(topic: &str, buffers: &[BytesMut]) -> ProtocolResult<Command> {
    multi_publish(topic, buffers)
}

/// Creates a partitioned `MPUB` command from message buffers.
pub fn multi_publish_buffers_with_part(
    topic: &str,
    partition: &str,
    buffers: &[BytesMut],
) -> ProtocolResult<Command> {
    multi_publish_with_part(topic, partition, buffers)
}

/// Creates an `MPUB_TRACE` command; `trace_ids[i]` tags `bodies[i]`.
pub fn multi_publish_trace<B: AsRef<[u8]>>(
    topic: &str,
    partition: &str,
    trace_ids: &[u64],
    bodies: &[B],
) -> ProtocolResult<Command> {
    check_lengths(bodies.len(), trace_ids.len(), "trace ids")?;

    let records = trace_ids
        .iter()
        .zip(bodies)
        .map(|(trace_id, body)| Record::new(Prefix::Trace(*trace_id), body.as_ref()))
        .collect::<ProtocolResult<Vec<_>>>()?;

    Ok(Command::new(
        Verb::MultiPublishTrace,
        vec![param(topic), param(partition)],
        Some(encode_records(&records)?),
    ))
}

/// Creates an `MPUB_EXT` command; `exts[i]` is the extension for `bodies[i]`.
///
/// Each extension is encoded once, up front. Fails if any block exceeds the
/// 2-byte length field.
pub fn multi_publish_with_json_ext<E: ExtJson, B: AsRef<[u8]>>(
    topic: &str,
    partition: &str,
    exts: &[E],
    bodies: &[B],
) -> ProtocolResult<Command> {
    check_lengths(bodies.len(), exts.len(), "extensions")?;

    let records = exts
        .iter()
        .zip(bodies)
        .map(|(ext, body)| {
            let json = ext.to_json()?;
            Record::new(Prefix::Ext(json), body.as_ref())
        })
        .collect::<ProtocolResult<Vec<_>>>()?;

    Ok(Command::new(
        Verb::MultiPublishExt,
        vec![param(topic), param(partition)],
        Some(encode_records(&records)?),
    ))
}

fn check_lengths(messages: usize, items: usize, what: &'static str) -> ProtocolResult<()> {
    if messages != items {
        return Err(ProtocolError::LengthMismatch {
            messages,
            items,
            what,
        });
    }
    Ok(())
}

fn encode_plain<B: AsRef<[u8]>>(bodies: &[B]) -> ProtocolResult<Bytes> {
    let records = bodies
        .iter()
        .map(|body| Record::new(Prefix::Plain, body.as_ref()))
        .collect::<ProtocolResult<Vec<_>>>()?;
    encode_records(&records)
}

/// What sits between a record's length field and its message.
enum Prefix {
    Plain,
    Trace(u64),
    Ext(Vec<u8>),
}

/// A validated record: its length field is known to fit.
struct Record<'a> {
    prefix: Prefix,
    message: &'a [u8],
    len: u32,
}

impl<'a> Record<'a> {
    fn new(prefix: Prefix, message: &'a [u8]) -> ProtocolResult<Self> {
        let prefix_len = match prefix {
            Prefix::Plain => 0,
            Prefix::Trace(_) => TRACE_ID_LEN,
            Prefix::Ext(ref json) => {
                ext_len(json)?;
                EXT_LEN_FIELD + json.len()
            }
        };
        let size = prefix_len + message.len();
        let len = u32::try_from(size).map_err(|_| ProtocolError::MessageTooLarge { size })?;
        Ok(Self {
            prefix,
            message,
            len,
        })
    }

    fn put(&self, buf: &mut BytesMut) {
        buf.put_u32(self.len);
        match self.prefix {
            Prefix::Plain => {}
            Prefix::Trace(trace_id) => buf.put_u64(trace_id),
            Prefix::Ext(ref json) => {
                buf.put_u16(json.len() as u16);
                buf.put_slice(json);
            }
        }
        buf.put_slice(self.message);
    }
}

/// Writes the count-prefixed envelope for already-validated records.
fn encode_records(records: &[Record<'_>]) -> ProtocolResult<Bytes> {
    let count = u32::try_from(records.len()).map_err(|_| ProtocolError::MessageTooLarge {
        size: records.len(),
    })?;
    let capacity = LEN_FIELD
        + records
            .iter()
            .map(|r| LEN_FIELD + r.len as usize)
            .sum::<usize>();

    let mut buf = BytesMut::with_capacity(capacity);
    buf.put_u32(count);
    for record in records {
        record.put(&mut buf);
    }
    Ok(buf.freeze())
}
