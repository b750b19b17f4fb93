//! The command value and its wire serialization.
//!
//! Every command is written as an ASCII header line followed, for
//! body-bearing verbs, by a length-prefixed binary body:
//!
//! ```text
//! +------+-----------------------+----+----------------+-----------+
//! | VERB | (" " param)*          | \n | length (4 BE)  |   body    |
//! +------+-----------------------+----+----------------+-----------+
//!                                     |<---- only if body present ->|
//! ```

use std::fmt;
use std::io::{self, Write};

use bytes::Bytes;

use crate::error::{ProtocolError, ProtocolResult};
use crate::verb::Verb;

const SPACE: &[u8] = b" ";
const NEWLINE: &[u8] = b"\n";

/// One protocol command, ready to be written to a connection.
///
/// Commands are immutable once built. Builders in this crate validate their
/// arguments; [`Command::write_to`] trusts what it is given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    verb: Verb,
    params: Vec<Bytes>,
    body: Option<Bytes>,
}

impl Command {
    /// Assembles a command from its parts.
    pub fn new(verb: Verb, params: Vec<Bytes>, body: Option<Bytes>) -> Self {
        Self { verb, params, body }
    }

    /// Returns the verb.
    pub fn verb(&self) -> Verb {
        self.verb
    }

    /// Returns the header parameters in wire order.
    pub fn params(&self) -> &[Bytes] {
        &self.params
    }

    /// Returns the body, if this command carries one.
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Number of bytes [`Command::write_to`] produces.
    pub fn encoded_len(&self) -> usize {
        let header = self.verb.as_str().len()
            + self.params.iter().map(|p| 1 + p.len()).sum::<usize>()
            + 1;
        header + self.body.as_ref().map_or(0, |b| 4 + b.len())
    }

    /// Serializes the command into a fresh buffer.
    pub fn to_bytes(&self) -> ProtocolResult<Vec<u8>> {
        let mut buffer = Vec::with_capacity(self.encoded_len());
        self.write_to(&mut buffer)?;
        Ok(buffer)
    }

    /// Writes the command to `writer` and returns the number of bytes written.
    ///
    /// Each piece is handed to the writer as it is produced, so wrap raw
    /// sockets in a `BufWriter`. On failure the error carries the count of
    /// bytes that already reached the writer; nothing is retried or undone.
    /// Callers sharing one writer between threads must hold exclusive access
    /// for the whole call.
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> ProtocolResult<u64> {
        let length_prefix = match self.body {
            Some(ref body) => Some(
                u32::try_from(body.len())
                    .map_err(|_| ProtocolError::Write {
                        written: 0,
                        source: io::Error::new(
                            io::ErrorKind::InvalidInput,
                            format!("body of {} bytes exceeds the length field", body.len()),
                        ),
                    })?
                    .to_be_bytes(),
            ),
            None => None,
        };

        let mut sink = CountingWriter::new(writer);
        sink.put(self.verb.as_str().as_bytes())?;
        for param in &self.params {
            sink.put(SPACE)?;
            sink.put(param)?;
        }
        sink.put(NEWLINE)?;

        if let (Some(prefix), Some(body)) = (length_prefix, self.body.as_ref()) {
            sink.put(&prefix)?;
            sink.put(body)?;
        }

        Ok(sink.written)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb.as_str())?;
        for param in &self.params {
            write!(f, " {}", String::from_utf8_lossy(param))?;
        }
        Ok(())
    }
}

/// Copies a builder argument into an owned header parameter.
pub(crate) fn param(value: impl AsRef<[u8]>) -> Bytes {
    Bytes::copy_from_slice(value.as_ref())
}

/// Tracks how many bytes reached the writer so failures can report it.
struct CountingWriter<'a, W: ?Sized> {
    inner: &'a mut W,
    written: u64,
}

impl<'a, W: Write + ?Sized> CountingWriter<'a, W> {
    fn new(inner: &'a mut W) -> Self {
        Self { inner, written: 0 }
    }

    fn put(&mut self, mut buf: &[u8]) -> ProtocolResult<()> {
        while !buf.is_empty() {
            match self.inner.write(buf) {
                Ok(0) => {
                    return Err(self.fail(io::Error::new(
                        io::ErrorKind::WriteZero,
                        "failed to write whole command",
                    )));
                }
                Ok(n) => {
                    self.written += n as u64;
                    buf = &buf[n..];
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(self.fail(e)),
            }
        }
        Ok(())
    }

    fn fail(&self, source: io::Error) -> ProtocolError {
        ProtocolError::Write {
            written: self.written,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts `limit` bytes, then fails every write.
    struct FailingWriter {
        accepted: Vec<u8>,
        limit: usize,
    }

    impl Write for FailingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let room = self.limit - self.accepted.len();
            if room == 0 {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "peer gone"));
            }
            let n = room.min(buf.len());
            self.accepted.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn params(items: &[&str]) -> Vec<Bytes> {
        items
            .iter()
            .map(|p| Bytes::copy_from_slice(p.as_bytes()))
            .collect()
    }

    #[test]
    fn header_only_command() {
        let cmd = Command::new(Verb::Ping, Vec::new(), None);
        assert_eq!(cmd.to_bytes().unwrap(), b"PING\n");
    }

    #[test]
    fn params_are_space_separated() {
        let cmd = Command::new(Verb::Subscribe, params(&["orders", "billing", "3"]), None);
        assert_eq!(cmd.to_bytes().unwrap(), b"SUB orders billing 3\n");
    }

    #[test]
    fn body_gets_length_prefix() {
        let cmd = Command::new(
            Verb::Publish,
            params(&["t"]),
            Some(Bytes::from_static(b"hello")),
        );
        let bytes = cmd.to_bytes().unwrap();
        assert_eq!(&bytes[..6], b"PUB t\n");
        assert_eq!(&bytes[6..10], &5u32.to_be_bytes());
        assert_eq!(&bytes[10..], b"hello");
    }

    #[test]
    fn empty_body_still_prefixed() {
        let cmd = Command::new(Verb::Auth, Vec::new(), Some(Bytes::new()));
        assert_eq!(cmd.to_bytes().unwrap(), b"AUTH\n\0\0\0\0");
    }

    #[test]
    fn write_to_reports_total() {
        let cmd = Command::new(
            Verb::Publish,
            params(&["topic", "0"]),
            Some(Bytes::from_static(b"payload")),
        );
        let mut out = Vec::new();
        let written = cmd.write_to(&mut out).unwrap();
        assert_eq!(written as usize, out.len());
        assert_eq!(written as usize, cmd.encoded_len());
    }

    #[test]
    fn encoded_len_matches_formula() {
        let cases = [
            Command::new(Verb::Nop, Vec::new(), None),
            Command::new(Verb::Register, params(&["t", "0", "ch"]), None),
            Command::new(Verb::Identify, Vec::new(), Some(Bytes::from_static(b"{}"))),
            Command::new(
                Verb::MultiPublish,
                params(&["t", "1"]),
                Some(Bytes::from(vec![0u8; 300])),
            ),
        ];
        for cmd in cases {
            let expected = cmd.verb().as_str().len()
                + cmd.params().iter().map(|p| 1 + p.len()).sum::<usize>()
                + 1
                + cmd.body().map_or(0, |b| 4 + b.len());
            assert_eq!(cmd.to_bytes().unwrap().len(), expected);
        }
    }

    #[test]
    fn partial_write_reports_progress() {
        let cmd = Command::new(
            Verb::Publish,
            params(&["topic"]),
            Some(Bytes::from_static(b"0123456789")),
        );
        let mut sink = FailingWriter {
            accepted: Vec::new(),
            limit: 13,
        };

        let err = cmd.write_to(&mut sink).unwrap_err();
        assert_eq!(err.bytes_written(), Some(13));
        assert!(matches!(
            err,
            ProtocolError::Write { ref source, .. } if source.kind() == io::ErrorKind::BrokenPipe
        ));
        assert_eq!(sink.accepted, b"PUB topic\n\0\0\0");
    }

    #[test]
    fn failure_before_anything_written() {
        let cmd = Command::new(Verb::Nop, Vec::new(), None);
        let mut sink = FailingWriter {
            accepted: Vec::new(),
            limit: 0,
        };
        let err = cmd.write_to(&mut sink).unwrap_err();
        assert_eq!(err.bytes_written(), Some(0));
    }

    #[test]
    fn display_matches_header() {
        let cmd = Command::new(Verb::Register, params(&["t", "0", "ch"]), None);
        assert_eq!(cmd.to_string(), "REGISTER t 0 ch");

        let bare = Command::new(Verb::StartClose, Vec::new(), None);
        assert_eq!(bare.to_string(), "CLS");
    }
}
