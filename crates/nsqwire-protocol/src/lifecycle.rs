//! Connection lifecycle and flow-control commands.

use std::time::Duration;

use bytes::Bytes;
use nsqwire_core::MessageId;
use serde::Serialize;

use crate::command::{Command, param};
use crate::error::ProtocolResult;
use crate::verb::Verb;

/// Creates an `IDENTIFY` command describing the client.
///
/// The configuration is marshaled to JSON so the set of keys can evolve
/// without changing this function; pass an [`IdentifyConfig`](crate::IdentifyConfig),
/// a map, or any other serializable value.
pub fn identify<T: Serialize + ?Sized>(config: &T) -> ProtocolResult<Command> {
    let body = serde_json::to_vec(config)?;
    Ok(Command::new(Verb::Identify, Vec::new(), Some(Bytes::from(body))))
}

/// Creates an `AUTH` command carrying the raw secret.
pub fn auth(secret: impl AsRef<[u8]>) -> Command {
    Command::new(Verb::Auth, Vec::new(), Some(param(secret)))
}

/// Creates a `REGISTER` command announcing a topic partition (and channel).
///
/// An empty channel is left out of the header rather than sent empty.
pub fn register(topic: &str, partition: &str, channel: &str) -> Command {
    Command::new(
        Verb::Register,
        registration_params(topic, partition, channel),
        None,
    )
}

/// Creates an `UNREGISTER` command withdrawing a topic partition (and channel).
pub fn unregister(topic: &str, partition: &str, channel: &str) -> Command {
    Command::new(
        Verb::Unregister,
        registration_params(topic, partition, channel),
        None,
    )
}

fn registration_params(topic: &str, partition: &str, channel: &str) -> Vec<Bytes> {
    let mut params = vec![param(topic), param(partition)];
    if !channel.is_empty() {
        params.push(param(channel));
    }
    params
}

/// Creates a `PING` command.
pub fn ping() -> Command {
    Command::new(Verb::Ping, Vec::new(), None)
}

/// Creates a `NOP` command, the usual answer to a heartbeat.
pub fn nop() -> Command {
    Command::new(Verb::Nop, Vec::new(), None)
}

/// Creates a `CLS` command.
///
/// The daemon stops sending messages and expects the client to finish what
/// is in flight before closing.
pub fn start_close() -> Command {
    Command::new(Verb::StartClose, Vec::new(), None)
}

/// Creates a `RDY` command advertising how many messages the client accepts.
pub fn ready(count: u32) -> Command {
    Command::new(Verb::Ready, vec![param(count.to_string())], None)
}

/// Creates a `FIN` command for a processed message.
pub fn finish(id: &MessageId) -> Command {
    Command::new(Verb::Finish, vec![param(id)], None)
}

/// Creates a `REQ` command asking for redelivery after `delay`.
///
/// The delay is truncated to whole milliseconds; zero requeues immediately.
pub fn requeue(id: &MessageId, delay: Duration) -> Command {
    Command::new(
        Verb::Requeue,
        vec![param(id), param(delay.as_millis().to_string())],
        None,
    )
}

/// Creates a `TOUCH` command resetting a message's timeout.
pub fn touch(id: &MessageId) -> Command {
    Command::new(Verb::Touch, vec![param(id)], None)
}

/// Creates an `INTERNAL_CREATE_TOPIC` command for a plain topic.
pub fn create_topic(topic: &str, partition: u32) -> Command {
    create_topic_inner(topic, partition, false)
}

/// Creates an `INTERNAL_CREATE_TOPIC` command for a topic whose messages
/// carry extension blocks.
pub fn create_topic_with_ext(topic: &str, partition: u32) -> Command {
    create_topic_inner(topic, partition, true)
}

fn create_topic_inner(topic: &str, partition: u32, ext: bool) -> Command {
    Command::new(
        Verb::CreateTopic,
        vec![
            param(topic),
            param(partition.to_string()),
            param(ext.to_string()),
        ],
        None,
    )
}
