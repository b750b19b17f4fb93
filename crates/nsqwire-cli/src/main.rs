//! nsqwire CLI entry point.

use std::io;
use std::process::ExitCode;

use clap::Parser;

use nsqwire_cli::cli::{Cli, Command, ConfigAction};
use nsqwire_cli::commands::{config as config_cmd, encode};
use nsqwire_cli::config::CliConfig;
use nsqwire_cli::error::{CliError, CliResult};
use nsqwire_cli::output::{self, OutputFormat};
use nsqwire_core::{TracingConfig, init_tracing};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_config = if cli.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::default()
    }
    .with_format(cli.log_format.into());
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: failed to initialize logging: {}", e);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let config_path = cli.config.clone().unwrap_or_else(CliConfig::default_path);
    let config = if cli.config.is_some() {
        CliConfig::load_from(&config_path).map_err(CliError::Config)?
    } else {
        CliConfig::load().map_err(CliError::Config)?
    };

    let frame = match cli.command {
        Command::Config { action } => {
            return match action {
                ConfigAction::Dump => config_cmd::dump(&config, &config_path),
                ConfigAction::Validate => config_cmd::validate(&config),
                ConfigAction::Path => config_cmd::path(&config_path),
            };
        }
        Command::Identify {
            client_id,
            hostname,
        } => encode::identify(&config, client_id, hostname)?,
        Command::Auth { secret } => nsqwire_protocol::auth(secret),
        Command::Register { target, channel } => {
            encode::registration(&config, &target, channel.as_deref(), true)?
        }
        Command::Unregister { target, channel } => {
            encode::registration(&config, &target, channel.as_deref(), false)?
        }
        Command::Ping => nsqwire_protocol::ping(),
        Command::Nop => nsqwire_protocol::nop(),
        Command::Cls => nsqwire_protocol::start_close(),
        Command::Rdy { count } => nsqwire_protocol::ready(count),
        Command::Fin { id } => encode::finish(&id)?,
        Command::Req { id, delay_ms } => encode::requeue(&id, delay_ms)?,
        Command::Touch { id } => encode::touch(&id)?,
        Command::CreateTopic {
            topic,
            partition_num,
            ext,
        } => encode::create_topic(&config, topic.as_deref(), partition_num, ext)?,
        Command::Pub(args) => encode::publish(&config, &args, &mut io::stdin().lock())?,
        Command::Mpub(args) => encode::multi_publish(&config, &args)?,
        Command::Sub(args) => encode::subscribe(&config, &args)?,
    };

    let format = if cli.hex || config.output.hex {
        OutputFormat::Hex
    } else {
        OutputFormat::Raw
    };
    let mut sink = output::open_sink(cli.output.as_deref())?;
    output::emit(&frame, format, &mut sink)?;
    Ok(())
}
