//! Core types: message ids, message extensions, tracing setup

pub mod error;
pub mod ext;
pub mod message_id;
pub mod tracing;

pub use error::{CoreError, CoreResult};
pub use ext::{DISPATCH_TAG_EXT_KEY, ExtJson, MsgExt, TRACE_ID_EXT_KEY};
pub use message_id::{MESSAGE_ID_LEN, MessageId};
pub use self::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
