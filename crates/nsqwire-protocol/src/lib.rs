//! Command framing and frame builders for the queue wire protocol.
//!
//! Clients talk to the queue daemon with text-headed commands, some of which
//! carry a binary body.
//!
//! # Wire Format
//!
//! ```text
//! <VERB>[ <param1>[ <param2>...]]\n[<u32 BE body length><body bytes>]
//! ```
//!
//! Builders (`publish`, `subscribe`, `ready`, ...) validate their arguments
//! and return an immutable [`Command`]; [`Command::write_to`] writes it to any
//! `std::io::Write`. Builders touch no shared state, so they can run on any
//! thread. A writer shared between threads must be locked around each
//! `write_to` call so commands do not interleave.
//!
//! # Example
//!
//! ```rust
//! use nsqwire_protocol::{ConsumeOffset, publish_with_part, subscribe_advanced};
//!
//! let cmd = publish_with_part("orders", "0", b"hello".to_vec());
//! let mut wire = Vec::new();
//! cmd.write_to(&mut wire).unwrap();
//! assert_eq!(&wire[..11], b"PUB orders ");
//!
//! let sub = subscribe_advanced("orders", "billing", "0", &ConsumeOffset::end());
//! assert_eq!(sub.to_string(), "SUB_ADVANCED orders billing 0 special:-1");
//! ```

mod command;
mod error;
mod framing;
mod lifecycle;
mod multi_publish;
mod publish;
mod subscribe;
mod types;
mod verb;


pub use command::Command;
pub use error::{ProtocolError, ProtocolResult};
pub use framing::{
    CommandReader, MAX_BODY_SIZE, MAX_HEADER_SIZE, decode_multi_body, split_ext_record,
    split_trace_record,
};
pub use lifecycle::{
    auth, create_topic, create_topic_with_ext, finish, identify, nop, ping, ready, register,
    requeue, start_close, touch, unregister,
};
pub use multi_publish::{
    multi_publish, multi_publish_buffers, multi_publish_buffers_with_part, multi_publish_trace,
    multi_publish_with_json_ext, multi_publish_with_part,
};
pub use publish::{MAX_EXT_LEN, publish, publish_trace, publish_with_json_ext, publish_with_part};
pub use subscribe::{
    ConsumeOffset, OFFSET_END, OffsetKind, subscribe, subscribe_advanced, subscribe_and_trace,
    subscribe_ordered, subscribe_with_part, subscribe_with_part_and_trace,
};
pub use types::IdentifyConfig;
pub use verb::Verb;

pub use nsqwire_core::{ExtJson, MessageId, MsgExt};
