//! Builds protocol commands from command-line arguments.
//!
//! Each function resolves missing topic, partition and channel values from
//! the `[defaults]` config section, then calls the matching builder.

use std::io::Read;
use std::path::Path;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use nsqwire_protocol::{self as protocol, Command, ExtJson, MessageId, MsgExt};

use crate::cli::{MpubArgs, PubArgs, SubArgs, TargetArgs};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};

/// Encodes `IDENTIFY` from the config, with optional overrides.
pub fn identify(
    config: &CliConfig,
    client_id: Option<String>,
    hostname: Option<String>,
) -> CliResult<Command> {
    let mut identify = config.identify.clone();
    if let Some(client_id) = client_id {
        identify.client_id = Some(client_id);
    }
    if let Some(hostname) = hostname {
        identify.hostname = Some(hostname);
    }
    identify.validate().map_err(CliError::Argument)?;
    Ok(protocol::identify(&identify)?)
}

/// Encodes `REGISTER` or `UNREGISTER`.
pub fn registration(
    config: &CliConfig,
    target: &TargetArgs,
    channel: Option<&str>,
    register: bool,
) -> CliResult<Command> {
    let topic = topic(config, target.topic.as_deref())?;
    let partition = partition(config, target.partition.as_deref())?;
    let channel = channel
        .or(config.defaults.channel.as_deref())
        .unwrap_or_default();

    Ok(if register {
        protocol::register(&topic, &partition, channel)
    } else {
        protocol::unregister(&topic, &partition, channel)
    })
}

/// Encodes `FIN`.
pub fn finish(id: &str) -> CliResult<Command> {
    Ok(protocol::finish(&id.parse::<MessageId>()?))
}

/// Encodes `REQ`.
pub fn requeue(id: &str, delay_ms: u64) -> CliResult<Command> {
    let id = id.parse::<MessageId>()?;
    Ok(protocol::requeue(&id, Duration::from_millis(delay_ms)))
}

/// Encodes `TOUCH`.
pub fn touch(id: &str) -> CliResult<Command> {
    Ok(protocol::touch(&id.parse::<MessageId>()?))
}

/// Encodes `INTERNAL_CREATE_TOPIC`.
pub fn create_topic(
    config: &CliConfig,
    topic_arg: Option<&str>,
    partition: u32,
    ext: bool,
) -> CliResult<Command> {
    let topic = topic(config, topic_arg)?;
    Ok(if ext {
        protocol::create_topic_with_ext(&topic, partition)
    } else {
        protocol::create_topic(&topic, partition)
    })
}

/// Encodes `PUB`, `PUB_TRACE` or `PUB_EXT`.
///
/// The body comes from the positional message, `--file`, or `stdin`.
pub fn publish(config: &CliConfig, args: &PubArgs, stdin: &mut dyn Read) -> CliResult<Command> {
    let topic = topic(config, args.target.topic.as_deref())?;
    let body = match (&args.message, &args.file) {
        (Some(message), _) => Bytes::copy_from_slice(message.as_bytes()),
        (None, Some(path)) => Bytes::from(read_file(path)?),
        (None, None) => {
            let mut buf = Vec::new();
            stdin.read_to_end(&mut buf)?;
            Bytes::from(buf)
        }
    };

    if let Some(ref raw) = args.ext_json {
        let partition = partition(config, args.target.partition.as_deref())?;
        let json = checked_json(raw)?;
        return Ok(protocol::publish_with_json_ext(
            &topic, &partition, &body, &json,
        )?);
    }

    if let Some(ref tag) = args.dispatch_tag {
        let partition = partition(config, args.target.partition.as_deref())?;
        let ext = MsgExt::new()
            .with_trace_id(args.trace_id.unwrap_or(0))
            .with_dispatch_tag(tag.clone())
            .to_json()?;
        return Ok(protocol::publish_with_json_ext(
            &topic, &partition, &body, &ext,
        )?);
    }

    if let Some(trace_id) = args.trace_id {
        let partition = partition(config, args.target.partition.as_deref())?;
        return Ok(protocol::publish_trace(&topic, &partition, trace_id, &body));
    }

    Ok(match optional_partition(config, args.target.partition.as_deref()) {
        Some(partition) => protocol::publish_with_part(&topic, partition, body),
        None => protocol::publish(&topic, body),
    })
}

/// Encodes `MPUB`, `MPUB_TRACE` or `MPUB_EXT`.
///
/// Messages come from the positional arguments or, one per line, from
/// `--file`.
pub fn multi_publish(config: &CliConfig, args: &MpubArgs) -> CliResult<Command> {
    let topic = topic(config, args.target.topic.as_deref())?;
    let buffers = match args.file {
        Some(ref path) => split_lines(&read_file(path)?),
        None => args
            .messages
            .iter()
            .map(|m| BytesMut::from(m.as_bytes()))
            .collect(),
    };
    if buffers.is_empty() {
        return Err(CliError::Argument("no messages to publish".to_string()));
    }

    if !args.ext.is_empty() {
        let partition = partition(config, args.target.partition.as_deref())?;
        let exts = args
            .ext
            .iter()
            .map(|raw| checked_json(raw))
            .collect::<CliResult<Vec<_>>>()?;
        return Ok(protocol::multi_publish_with_json_ext(
            &topic, &partition, &exts, &buffers,
        )?);
    }

    if !args.trace_id.is_empty() {
        let partition = partition(config, args.target.partition.as_deref())?;
        return Ok(protocol::multi_publish_trace(
            &topic,
            &partition,
            &args.trace_id,
            &buffers,
        )?);
    }

    Ok(match optional_partition(config, args.target.partition.as_deref()) {
        Some(partition) => protocol::multi_publish_buffers_with_part(&topic, partition, &buffers)?,
        None => protocol::multi_publish_buffers(&topic, &buffers)?,
    })
}

/// Encodes `SUB`, `SUB_ADVANCED` or `SUB_ORDERED`.
pub fn subscribe(config: &CliConfig, args: &SubArgs) -> CliResult<Command> {
    let topic = topic(config, args.target.topic.as_deref())?;
    let channel = args
        .channel
        .as_deref()
        .or(config.defaults.channel.as_deref())
        .ok_or_else(|| missing("channel"))?;

    if args.ordered {
        let partition = partition(config, args.target.partition.as_deref())?;
        return Ok(protocol::subscribe_ordered(&topic, channel, &partition));
    }

    if let Some(ref offset) = args.offset {
        let partition = partition(config, args.target.partition.as_deref())?;
        return Ok(protocol::subscribe_advanced(
            &topic, channel, &partition, offset,
        ));
    }

    let partition = optional_partition(config, args.target.partition.as_deref());
    Ok(match (partition, args.trace) {
        (Some(p), true) => protocol::subscribe_with_part_and_trace(&topic, channel, p),
        (Some(p), false) => protocol::subscribe_with_part(&topic, channel, p),
        (None, true) => protocol::subscribe_and_trace(&topic, channel),
        (None, false) => protocol::subscribe(&topic, channel),
    })
}

fn topic(config: &CliConfig, arg: Option<&str>) -> CliResult<String> {
    arg.or(config.defaults.topic.as_deref())
        .map(str::to_string)
        .ok_or_else(|| missing("topic"))
}

fn partition(config: &CliConfig, arg: Option<&str>) -> CliResult<String> {
    optional_partition(config, arg)
        .map(str::to_string)
        .ok_or_else(|| missing("partition"))
}

fn optional_partition<'a>(config: &'a CliConfig, arg: Option<&'a str>) -> Option<&'a str> {
    arg.or(config.defaults.partition.as_deref())
}

fn missing(name: &str) -> CliError {
    CliError::Argument(format!(
        "missing --{name} and no [defaults] {name} in the config"
    ))
}

/// Rejects extension text that is not a JSON object.
fn checked_json(raw: &str) -> CliResult<Vec<u8>> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    if !value.is_object() {
        return Err(CliError::Argument(format!(
            "extension must be a JSON object: {raw}"
        )));
    }
    Ok(raw.as_bytes().to_vec())
}

fn read_file(path: &Path) -> CliResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        CliError::Argument(format!("failed to read {}: {}", path.display(), e))
    })
}

/// One buffer per line; a trailing newline does not add an empty message.
fn split_lines(data: &[u8]) -> Vec<BytesMut> {
    let data = data.strip_suffix(b"\n").unwrap_or(data);
    if data.is_empty() {
        return Vec::new();
    }
    data.split(|b| *b == b'\n')
        .map(|line| BytesMut::from(line.strip_suffix(b"\r").unwrap_or(line)))
        .collect()
}
