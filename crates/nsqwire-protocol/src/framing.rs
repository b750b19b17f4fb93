//! Reading commands back off a byte stream.
//!
//! This is the inverse of [`Command::write_to`]: it is what a daemon (or a
//! test double standing in for one) does with the bytes a client sends.
//! Daemon responses are a different format and are not handled here.

use std::io::{BufRead, ErrorKind, Read};

use bytes::{Buf, Bytes};

use crate::command::Command;
use crate::error::{ProtocolError, ProtocolResult};
use crate::verb::Verb;

/// Maximum body size accepted by [`CommandReader`] (64 MiB).
pub const MAX_BODY_SIZE: usize = 64 * 1024 * 1024;

/// Maximum header line length accepted by [`CommandReader`], newline included.
pub const MAX_HEADER_SIZE: usize = 64 * 1024;

/// Reads commands from a buffered byte stream.
pub struct CommandReader<R> {
    reader: R,
}

impl<R: BufRead> CommandReader<R> {
    /// Creates a new CommandReader wrapping the given reader.
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Reads a single command.
    ///
    /// Returns `Ok(None)` at a clean end of stream (no bytes of a new
    /// command read). Anything cut short after that is an error.
    pub fn read_command(&mut self) -> ProtocolResult<Option<Command>> {
        let mut line = Vec::new();
        let n = (&mut self.reader)
            .take(MAX_HEADER_SIZE as u64)
            .read_until(b'\n', &mut line)?;
        if n == 0 {
            return Ok(None);
        }
        if line.last() != Some(&b'\n') && line.len() == MAX_HEADER_SIZE {
            return Err(ProtocolError::MalformedHeader(format!(
                "header longer than {MAX_HEADER_SIZE} bytes"
            )));
        }
        if line.pop() != Some(b'\n') {
            return Err(ProtocolError::MalformedHeader(format!(
                "header not terminated: {:?}",
                String::from_utf8_lossy(&line)
            )));
        }

        let mut parts = line.split(|b| *b == b' ');
        let verb_text = parts.next().unwrap_or_default();
        if verb_text.is_empty() {
            return Err(ProtocolError::MalformedHeader("empty verb".to_string()));
        }
        let verb: Verb = std::str::from_utf8(verb_text)
            .map_err(|_| ProtocolError::MalformedHeader("verb is not ASCII".to_string()))?
            .parse()?;
        let params = parts.map(Bytes::copy_from_slice).collect();

        let body = if verb.carries_body() {
            Some(self.read_body()?)
        } else {
            None
        };

        Ok(Some(Command::new(verb, params, body)))
    }

    fn read_body(&mut self) -> ProtocolResult<Bytes> {
        let mut len_buf = [0u8; 4];
        read_exact_or_incomplete(&mut self.reader, &mut len_buf)?;

        let len = u32::from_be_bytes(len_buf) as usize;
        if len > MAX_BODY_SIZE {
            return Err(ProtocolError::BodyTooLarge {
                size: len,
                max: MAX_BODY_SIZE,
            });
        }

        let mut body = vec![0u8; len];
        read_exact_or_incomplete(&mut self.reader, &mut body)?;
        Ok(Bytes::from(body))
    }

    /// Unwraps this CommandReader, returning the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

fn read_exact_or_incomplete<R: Read>(reader: &mut R, buf: &mut [u8]) -> ProtocolResult<()> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(ProtocolError::IncompleteMessage {
                    expected: buf.len(),
                    received: filled,
                });
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Splits a multi-publish body into its records.
///
/// Each returned record is everything after its 4-byte length field; use
/// [`split_trace_record`] or [`split_ext_record`] to take the prefix apart.
pub fn decode_multi_body(body: &Bytes) -> ProtocolResult<Vec<Bytes>> {
    let mut cursor = body.clone();
    let count = take_u32(&mut cursor)? as usize;

    // Every record needs at least its length field.
    let mut records = Vec::with_capacity(count.min(cursor.remaining() / 4));
    for _ in 0..count {
        let len = take_u32(&mut cursor)? as usize;
        if cursor.remaining() < len {
            return Err(ProtocolError::IncompleteMessage {
                expected: len,
                received: cursor.remaining(),
            });
        }
        records.push(cursor.split_to(len));
    }
    Ok(records)
}

/// Splits an `MPUB_TRACE` record into trace id and message.
pub fn split_trace_record(record: &[u8]) -> ProtocolResult<(u64, &[u8])> {
    if record.len() < 8 {
        return Err(ProtocolError::IncompleteMessage {
            expected: 8,
            received: record.len(),
        });
    }
    let (id, message) = record.split_at(8);
    let mut id_bytes = [0u8; 8];
    id_bytes.copy_from_slice(id);
    Ok((u64::from_be_bytes(id_bytes), message))
}

/// Splits an `MPUB_EXT` record (or a `PUB_EXT` body) into extension JSON
/// and message.
pub fn split_ext_record(record: &[u8]) -> ProtocolResult<(&[u8], &[u8])> {
    if record.len() < 2 {
        return Err(ProtocolError::IncompleteMessage {
            expected: 2,
            received: record.len(),
        });
    }
    let ext_len = u16::from_be_bytes([record[0], record[1]]) as usize;
    let rest = &record[2..];
    if rest.len() < ext_len {
        return Err(ProtocolError::IncompleteMessage {
            expected: ext_len,
            received: rest.len(),
        });
    }
    Ok(rest.split_at(ext_len))
}

fn take_u32(cursor: &mut Bytes) -> ProtocolResult<u32> {
    if cursor.remaining() < 4 {
        return Err(ProtocolError::IncompleteMessage {
            expected: 4,
            received: cursor.remaining(),
        });
    }
    Ok(cursor.get_u32())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::{lifecycle, multi_publish, publish, subscribe};

    fn reader(bytes: Vec<u8>) -> CommandReader<Cursor<Vec<u8>>> {
        CommandReader::new(Cursor::new(bytes))
    }

    #[test]
    fn read_back_stream_of_commands() {
        let commands = vec![
            lifecycle::identify(&serde_json::json!({"client_id": "c1"})).unwrap(),
            subscribe::subscribe("orders", "billing"),
            lifecycle::ready(10),
            publish::publish_with_part("orders", "1", b"payload".to_vec()),
            multi_publish::multi_publish("orders", &[b"a".to_vec(), b"b".to_vec()]).unwrap(),
            lifecycle::start_close(),
        ];

        let mut stream = Vec::new();
        for cmd in &commands {
            cmd.write_to(&mut stream).unwrap();
        }

        let mut reader = reader(stream);
        for expected in &commands {
            let actual = reader.read_command().unwrap().unwrap();
            assert_eq!(&actual, expected);
        }
        assert!(reader.read_command().unwrap().is_none());
    }

    #[test]
    fn empty_stream_is_eof() {
        assert!(reader(Vec::new()).read_command().unwrap().is_none());
    }

    #[test]
    fn unterminated_header_rejected() {
        let err = reader(b"PING".to_vec()).read_command().unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedHeader(_)));
    }

    #[test]
    fn endless_header_is_capped() {
        let err = reader(vec![b'A'; MAX_HEADER_SIZE + 10])
            .read_command()
            .unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedHeader(m) if m.contains("longer than")));
    }

    #[test]
    fn header_at_limit_is_accepted() {
        let topic = "t".repeat(MAX_HEADER_SIZE - "SUB  c\n".len());
        let cmd = subscribe::subscribe(&topic, "c");
        assert_eq!(cmd.encoded_len(), MAX_HEADER_SIZE);

        let mut reader = reader(cmd.to_bytes().unwrap());
        assert_eq!(reader.read_command().unwrap().unwrap(), cmd);
    }

    #[test]
    fn reader_stops_at_command_boundary() {
        let mut stream = lifecycle::nop().to_bytes().unwrap();
        stream.extend_from_slice(b"trailing");

        let mut reader = reader(stream);
        assert_eq!(reader.read_command().unwrap().unwrap(), lifecycle::nop());

        let rest = reader.into_inner();
        let pos = rest.position() as usize;
        assert_eq!(&rest.get_ref()[pos..], b"trailing");
    }

    #[test]
    fn unknown_verb_rejected() {
        let err = reader(b"HELLO world\n".to_vec()).read_command().unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownVerb(v) if v == "HELLO"));
    }

    #[test]
    fn truncated_body_rejected() {
        let mut bytes = b"PUB t\n".to_vec();
        bytes.extend_from_slice(&10u32.to_be_bytes());
        bytes.extend_from_slice(b"short");

        let err = reader(bytes).read_command().unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::IncompleteMessage {
                expected: 10,
                received: 5
            }
        ));
    }

    #[test]
    fn oversized_body_rejected() {
        let mut bytes = b"AUTH\n".to_vec();
        bytes.extend_from_slice(&(MAX_BODY_SIZE as u32 + 1).to_be_bytes());

        let err = reader(bytes).read_command().unwrap_err();
        assert!(matches!(err, ProtocolError::BodyTooLarge { .. }));
    }

    #[test]
    fn decode_multi_body_rejects_truncation() {
        let mut body = 2u32.to_be_bytes().to_vec();
        body.extend_from_slice(&3u32.to_be_bytes());
        body.extend_from_slice(b"abc");

        let err = decode_multi_body(&Bytes::from(body)).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::IncompleteMessage { expected: 4, .. }
        ));
    }

    #[test]
    fn split_ext_record_on_pub_ext_body() {
        let cmd = publish::publish_with_json_ext("t", "0", b"msg", b"{}").unwrap();
        let (json, message) = split_ext_record(cmd.body().unwrap()).unwrap();
        assert_eq!(json, b"{}");
        assert_eq!(message, b"msg");
    }

    #[test]
    fn split_trace_record_needs_eight_bytes() {
        assert!(split_trace_record(&[0u8; 7]).is_err());
    }
}
