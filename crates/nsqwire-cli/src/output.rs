//! Frame output.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use nsqwire_protocol::Command;
use tracing::debug;

use crate::error::CliResult;

/// How frames are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Wire bytes, unchanged.
    #[default]
    Raw,
    /// Lowercase hex of the wire bytes, newline-terminated.
    Hex,
}

/// Opens the output sink: a file when a path is given, stdout otherwise.
pub fn open_sink(path: Option<&Path>) -> CliResult<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

/// Writes `command` to `sink` and returns the number of frame bytes.
pub fn emit(command: &Command, format: OutputFormat, sink: &mut dyn Write) -> CliResult<u64> {
    debug!(
        verb = %command.verb(),
        header = %command,
        encoded_len = command.encoded_len(),
        "encoding command"
    );

    let written = match format {
        OutputFormat::Raw => command.write_to(sink)?,
        OutputFormat::Hex => {
            let bytes = command.to_bytes()?;
            writeln!(sink, "{}", hex::encode(&bytes))?;
            bytes.len() as u64
        }
    };
    sink.flush()?;

    debug!(written, "frame written");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use nsqwire_protocol::{ping, publish};

    /// Accepts three bytes, then reports a closed pipe.
    struct ClosedAfterThree(Vec<u8>);

    impl Write for ClosedAfterThree {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let room = 3 - self.0.len();
            if room == 0 {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
            }
            let n = room.min(buf.len());
            self.0.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn partial_write_carries_byte_count() {
        let mut sink = ClosedAfterThree(Vec::new());
        let err = emit(&ping(), OutputFormat::Raw, &mut sink).unwrap_err();

        let CliError::Protocol(inner) = err else {
            panic!("expected protocol error");
        };
        assert_eq!(inner.bytes_written(), Some(3));
        assert!(inner.to_string().contains("after 3 bytes"));
        assert_eq!(sink.0, b"PIN");
    }

    #[test]
    fn raw_output_is_wire_bytes() {
        let mut out = Vec::new();
        let written = emit(&ping(), OutputFormat::Raw, &mut out).unwrap();
        assert_eq!(written, 5);
        assert_eq!(out, b"PING\n");
    }

    #[test]
    fn hex_output_is_one_line() {
        let mut out = Vec::new();
        let written = emit(&publish("t", b"a".to_vec()), OutputFormat::Hex, &mut out).unwrap();
        assert_eq!(written, 11);
        assert_eq!(String::from_utf8(out).unwrap(), "50554220740a0000000161\n");
    }

    #[test]
    fn file_sink_receives_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.bin");
        {
            let mut sink = open_sink(Some(&path)).unwrap();
            emit(&ping(), OutputFormat::Raw, &mut sink).unwrap();
        }
        assert_eq!(std::fs::read(&path).unwrap(), b"PING\n");
    }
}
