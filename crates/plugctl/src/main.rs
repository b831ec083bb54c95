// # plugctl - smart plug CLI
//
// Thin integration layer: argument parsing, runtime setup, and exit-code
// mapping. All resolution and control logic lives in plugctl-core and the
// protocol crates.
//
// ## Usage
//
// ```bash
// plugctl lamp            # exit 0 if the plug is on, 1 if off
// plugctl lamp on
// plugctl lamp off
// plugctl lamp --attempts 3
// ```
//
// ## Exit Codes
//
// - 0: plug is on / action succeeded
// - 1: plug is off
// - 2: error (alias not found, network failure, bad configuration)

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::{Level, debug, error};
use tracing_subscriber::FmtSubscriber;

use anyhow::Context;
use plugctl_core::{CacheConfig, DeviceLocator, LocatorConfig, cache};
use plugctl_ifaces::PnetBroadcastSource;
use plugctl_kasa::{KasaConnector, KasaProbe};

const CLI_NAME: &str = "plugctl";

/// Exit codes for the shell contract
///
/// `status` doubles as a predicate for scripting, so "off" is a distinct
/// code rather than an error.
#[derive(Debug, Clone, Copy)]
enum PlugExitCode {
    /// Plug is on, or the requested action succeeded
    Success = 0,
    /// Plug is off
    PlugOff = 1,
    /// Any failure
    Error = 2,
}

impl From<PlugExitCode> for ExitCode {
    fn from(code: PlugExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Control a Kasa smart plug by alias.
#[derive(Parser)]
#[command(name = CLI_NAME, version)]
struct Cli {
    /// Alias of the plug to control
    alias: String,

    /// The action to perform on the plug
    #[arg(value_enum, default_value_t = Action::Status)]
    action: Action,

    /// The number of discovery attempts to make
    #[arg(long, default_value_t = 1)]
    attempts: usize,

    /// Cache file for last-known addresses (defaults to the platform
    /// cache directory)
    #[arg(long)]
    cache_file: Option<PathBuf>,

    /// Log verbosity: trace, debug, info, warn, error
    #[arg(long, env = "PLUGCTL_LOG_LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Action {
    /// Report whether the plug is on via the exit code
    Status,
    /// Switch the plug on
    On,
    /// Switch the plug off
    Off,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        other => {
            eprintln!("invalid log level: {}", other);
            return PlugExitCode::Error.into();
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to set tracing subscriber: {}", e);
        return PlugExitCode::Error.into();
    }

    let rt = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("failed to create tokio runtime: {}", e);
            return PlugExitCode::Error.into();
        }
    };

    match rt.block_on(run(cli)) {
        Ok(code) => code.into(),
        Err(e) => {
            eprintln!("{}: {:#}", CLI_NAME, e);
            PlugExitCode::Error.into()
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<PlugExitCode> {
    let cache_path = match cli.cache_file {
        Some(path) => path,
        None => default_cache_file()?,
    };
    debug!(path = %cache_path.display(), "using address cache");

    let cache_config = CacheConfig::File {
        path: cache_path.to_string_lossy().into_owned(),
    };
    let cache = cache::from_config(&cache_config)
        .await
        .context("failed to open the address cache")?;

    let locator = DeviceLocator::new(
        cache,
        Box::new(KasaConnector::new()),
        Box::new(KasaProbe::new()),
        Box::new(PnetBroadcastSource::new()),
        LocatorConfig::with_attempts(cli.attempts),
    )?;

    let mut plug = locator.resolve(&cli.alias).await?;

    match cli.action {
        Action::Status => {
            if plug.is_on().await? {
                println!("on");
                Ok(PlugExitCode::Success)
            } else {
                println!("off");
                Ok(PlugExitCode::PlugOff)
            }
        }
        Action::On => {
            plug.turn_on().await?;
            Ok(PlugExitCode::Success)
        }
        Action::Off => {
            plug.turn_off().await?;
            Ok(PlugExitCode::Success)
        }
    }
}

/// Per-user cache file under the platform cache directory
fn default_cache_file() -> anyhow::Result<PathBuf> {
    dirs::cache_dir()
        .map(|dir| dir.join(CLI_NAME).join("addresses.json"))
        .context("could not determine the platform cache directory")
}
