//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use nsqwire_core::TracingOutputFormat;
use nsqwire_protocol::ConsumeOffset;

/// nsqwire - encode queue protocol commands
#[derive(Debug, Parser)]
#[command(name = "nsqwire")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "NSQWIRE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Log line format on stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    /// Write frames as hex text instead of raw bytes
    #[arg(long)]
    pub hex: bool,

    /// Write frames to this file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl From<LogFormat> for TracingOutputFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Compact => TracingOutputFormat::Compact,
            LogFormat::Pretty => TracingOutputFormat::Pretty,
            LogFormat::Json => TracingOutputFormat::Json,
        }
    }
}

/// Topic and partition shared by most commands.
#[derive(Debug, Clone, Default, Args)]
pub struct TargetArgs {
    /// Topic name (falls back to `[defaults] topic`)
    #[arg(long, short)]
    pub topic: Option<String>,

    /// Partition (falls back to `[defaults] partition`)
    #[arg(long, short)]
    pub partition: Option<String>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Encode an IDENTIFY command from the `[identify]` config section
    Identify {
        /// Override the client id
        #[arg(long)]
        client_id: Option<String>,

        /// Override the hostname
        #[arg(long)]
        hostname: Option<String>,
    },

    /// Encode an AUTH command
    Auth {
        /// Secret sent as the body
        secret: String,
    },

    /// Encode a REGISTER command
    Register {
        #[command(flatten)]
        target: TargetArgs,

        /// Channel (omitted when empty)
        #[arg(long)]
        channel: Option<String>,
    },

    /// Encode an UNREGISTER command
    Unregister {
        #[command(flatten)]
        target: TargetArgs,

        /// Channel (omitted when empty)
        #[arg(long)]
        channel: Option<String>,
    },

    /// Encode a PING command
    Ping,

    /// Encode a NOP command
    Nop,

    /// Encode a CLS command
    Cls,

    /// Encode an RDY command
    Rdy {
        /// Number of in-flight messages to allow
        count: u32,
    },

    /// Encode a FIN command
    Fin {
        /// Message id (32 hex digits)
        id: String,
    },

    /// Encode a REQ command
    Req {
        /// Message id (32 hex digits)
        id: String,

        /// Requeue delay in milliseconds
        #[arg(long, default_value_t = 0)]
        delay_ms: u64,
    },

    /// Encode a TOUCH command
    Touch {
        /// Message id (32 hex digits)
        id: String,
    },

    /// Encode an INTERNAL_CREATE_TOPIC command
    CreateTopic {
        /// Topic name (falls back to `[defaults] topic`)
        #[arg(long, short)]
        topic: Option<String>,

        /// Partition number
        #[arg(long, default_value_t = 0)]
        partition_num: u32,

        /// Create the topic with extension support
        #[arg(long)]
        ext: bool,
    },

    /// Encode a PUB, PUB_TRACE or PUB_EXT command
    Pub(PubArgs),

    /// Encode an MPUB, MPUB_TRACE or MPUB_EXT command
    Mpub(MpubArgs),

    /// Encode a SUB, SUB_ADVANCED or SUB_ORDERED command
    Sub(SubArgs),

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Options for `pub`.
#[derive(Debug, Clone, Default, Args)]
pub struct PubArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Trace id (selects PUB_TRACE unless an extension is given)
    #[arg(long)]
    pub trace_id: Option<u64>,

    /// Raw JSON extension object (selects PUB_EXT)
    #[arg(long, conflicts_with_all = ["dispatch_tag", "trace_id"])]
    pub ext_json: Option<String>,

    /// Dispatch tag (selects PUB_EXT)
    #[arg(long)]
    pub dispatch_tag: Option<String>,

    /// Read the message body from a file
    #[arg(long, short, conflicts_with = "message")]
    pub file: Option<PathBuf>,

    /// Message body; read from stdin when neither this nor --file is given
    pub message: Option<String>,
}

/// Options for `mpub`.
#[derive(Debug, Clone, Default, Args)]
pub struct MpubArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Trace id per message (can be repeated; selects MPUB_TRACE)
    #[arg(long, action = clap::ArgAction::Append)]
    pub trace_id: Vec<u64>,

    /// JSON extension per message (can be repeated; selects MPUB_EXT)
    #[arg(long, action = clap::ArgAction::Append, conflicts_with = "trace_id")]
    pub ext: Vec<String>,

    /// Read newline-delimited messages from a file
    #[arg(long, short, conflicts_with = "messages")]
    pub file: Option<PathBuf>,

    /// Message bodies
    pub messages: Vec<String>,
}

/// Options for `sub`.
#[derive(Debug, Clone, Default, Args)]
pub struct SubArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Channel (falls back to `[defaults] channel`)
    #[arg(long)]
    pub channel: Option<String>,

    /// Subscribe in order (SUB_ORDERED)
    #[arg(long, conflicts_with_all = ["offset", "trace"])]
    pub ordered: bool,

    /// Request trace data with each message
    #[arg(long, conflicts_with = "offset")]
    pub trace: bool,

    /// Start offset as `kind:value`, e.g. `special:-1` (SUB_ADVANCED)
    #[arg(long)]
    pub offset: Option<ConsumeOffset>,
}

/// Configuration subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,
    /// Validate configuration
    Validate,
    /// Show configuration file path
    Path,
}
