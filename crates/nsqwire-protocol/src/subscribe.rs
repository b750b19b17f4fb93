//! Subscription commands and consume offsets.

use std::fmt;
use std::str::FromStr;

use crate::command::{Command, param};
use crate::error::ProtocolError;
use crate::verb::Verb;

/// How a [`ConsumeOffset`] value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OffsetKind {
    /// Seconds since the Unix epoch.
    Timestamp,
    /// Position in the partition's virtual queue.
    VirtualQueue,
    /// Sentinel positions; `-1` is the end of the queue.
    Special,
}

impl OffsetKind {
    /// Wire tag of the kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Timestamp => "timestamp",
            Self::VirtualQueue => "virtual_queue",
            Self::Special => "special",
        }
    }
}

impl fmt::Display for OffsetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sentinel value for [`OffsetKind::Special`] meaning "start at the end".
pub const OFFSET_END: i64 = -1;

/// Where an advanced subscription starts consuming.
///
/// The default value is unset, which renders as an empty string and adds no
/// parameter to `SUB_ADVANCED`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumeOffset {
    position: Option<(OffsetKind, i64)>,
}

impl ConsumeOffset {
    /// Creates an unset offset.
    pub const fn unset() -> Self {
        Self { position: None }
    }

    /// Offset at the end of the queue.
    pub const fn end() -> Self {
        Self {
            position: Some((OffsetKind::Special, OFFSET_END)),
        }
    }

    /// Offset at a wall-clock time, in seconds since the epoch.
    pub const fn timestamp(secs: i64) -> Self {
        Self {
            position: Some((OffsetKind::Timestamp, secs)),
        }
    }

    /// Offset at a virtual queue position.
    pub const fn virtual_queue(position: i64) -> Self {
        Self {
            position: Some((OffsetKind::VirtualQueue, position)),
        }
    }

    /// Moves the offset to the end of the queue.
    pub fn set_to_end(&mut self) {
        *self = Self::end();
    }

    /// Moves the offset to a virtual queue position.
    pub fn set_virtual_queue_offset(&mut self, position: i64) {
        *self = Self::virtual_queue(position);
    }

    /// Moves the offset to a time, in seconds since the epoch.
    pub fn set_time(&mut self, secs: i64) {
        *self = Self::timestamp(secs);
    }

    /// Clears the offset.
    pub fn clear(&mut self) {
        self.position = None;
    }

    /// Whether an offset has been chosen.
    pub fn is_set(&self) -> bool {
        self.position.is_some()
    }

    /// The kind, if set.
    pub fn kind(&self) -> Option<OffsetKind> {
        self.position.map(|(kind, _)| kind)
    }

    /// The raw value, if set.
    pub fn value(&self) -> Option<i64> {
        self.position.map(|(_, value)| value)
    }
}

impl fmt::Display for ConsumeOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some((kind, value)) => write!(f, "{kind}:{value}"),
            None => Ok(()),
        }
    }
}

impl FromStr for ConsumeOffset {
    type Err = ProtocolError;

    /// Parses `"<kind>:<value>"`; an empty string is unset.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::unset());
        }
        let invalid = || ProtocolError::InvalidOffset(s.to_string());

        let (kind, value) = s.split_once(':').ok_or_else(invalid)?;
        let kind = match kind {
            "timestamp" => OffsetKind::Timestamp,
            "virtual_queue" => OffsetKind::VirtualQueue,
            "special" => OffsetKind::Special,
            _ => return Err(invalid()),
        };
        let value = value.parse::<i64>().map_err(|_| invalid())?;
        Ok(Self {
            position: Some((kind, value)),
        })
    }
}

/// Creates a `SUB` command.
pub fn subscribe(topic: &str, channel: &str) -> Command {
    Command::new(Verb::Subscribe, vec![param(topic), param(channel)], None)
}

/// Creates a `SUB` command bound to one partition.
pub fn subscribe_with_part(topic: &str, channel: &str, partition: &str) -> Command {
    Command::new(
        Verb::Subscribe,
        vec![param(topic), param(channel), param(partition)],
        None,
    )
}

/// Creates a `SUB_ADVANCED` command with no start offset, asking the daemon
/// to attach trace data to delivered messages.
pub fn subscribe_and_trace(topic: &str, channel: &str) -> Command {
    Command::new(
        Verb::SubscribeAdvanced,
        vec![param(topic), param(channel)],
        None,
    )
}

/// Partitioned form of [`subscribe_and_trace`].
pub fn subscribe_with_part_and_trace(topic: &str, channel: &str, partition: &str) -> Command {
    Command::new(
        Verb::SubscribeAdvanced,
        vec![param(topic), param(channel), param(partition)],
        None,
    )
}

/// Creates a `SUB_ADVANCED` command starting at `offset`.
///
/// An unset offset adds no parameter, which makes this the same as
/// [`subscribe_with_part_and_trace`].
pub fn subscribe_advanced(
    topic: &str,
    channel: &str,
    partition: &str,
    offset: &ConsumeOffset,
) -> Command {
    let mut params = vec![param(topic), param(channel), param(partition)];
    if offset.is_set() {
        params.push(param(offset.to_string()));
    }
    Command::new(Verb::SubscribeAdvanced, params, None)
}

/// Creates a `SUB_ORDERED` command for one partition.
pub fn subscribe_ordered(topic: &str, channel: &str, partition: &str) -> Command {
    Command::new(
        Verb::SubscribeOrdered,
        vec![param(topic), param(channel), param(partition)],
        None,
    )
}
