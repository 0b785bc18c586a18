//! specbus CLI - drive the mediator from the command line.
//!
//! # Configuration
//!
//! Configuration is loaded from multiple sources with priority:
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`SPECBUS_*`)
//! 3. Project config (`.specbus/config.toml` in the project root)
//! 4. Global config (`~/.specbus/config.toml`)
//! 5. Default values (lowest priority)
//!
//! # Commands
//!
//! | Command | Effect |
//! |---------|--------|
//! | `demo` | Mount Toolbar and Grid, publish `system:start` and `ui:windowSizeChange` |
//! | `inspect` | Print the merged specs of the mounted demo components as JSON |
//! | `publish <channel> <event>` | Publish one event to the demo components |
//! | `key <channel> <event>` | Print the dispatch key and handler method name |
//!
//! Logs go to stderr; command output goes to stdout.

mod demo;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use specbus_runtime::{BusConfig, ConfigLoader, Mediator};
use specbus_types::{build_dispatch_key, build_handler_method_name};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Name and code the CLI publishes under.
const SOURCE_NAME: &str = "App";
const SOURCE_CODE: &str = "APP1";

/// specbus CLI - mediator demo and inspection
#[derive(Parser, Debug)]
#[command(name = "specbus")]
#[command(version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Project root directory (defaults to current directory)
    #[arg(short = 'C', long, global = true)]
    project: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mount the demo components and publish a start and a resize event
    Demo {
        /// Extension spec file (JSON), may be repeated
        #[arg(short, long = "extension", value_name = "FILE")]
        extensions: Vec<PathBuf>,
    },

    /// Print the merged component specs as JSON
    Inspect {
        /// Extension spec file (JSON), may be repeated
        #[arg(short, long = "extension", value_name = "FILE")]
        extensions: Vec<PathBuf>,
    },

    /// Publish a single event to the demo components
    Publish {
        channel: String,
        event: String,

        /// Event payload (JSON)
        #[arg(long, default_value = "{}")]
        data: String,

        /// Extension spec file (JSON), may be repeated
        #[arg(short, long = "extension", value_name = "FILE")]
        extensions: Vec<PathBuf>,
    },

    /// Print the dispatch key and handler method name for a pair
    Key { channel: String, event: String },
}

fn load_config(args: &Args) -> Result<BusConfig> {
    let project_root = match &args.project {
        Some(path) => path.clone(),
        None => std::env::current_dir().context("failed to get current directory")?,
    };

    let mut config = ConfigLoader::new()
        .with_project_root(&project_root)
        .load()
        .context("config error")?;

    if args.debug {
        config.debug = true;
    }
    Ok(config)
}

/// Terminal filter: --debug > --verbose > RUST_LOG env > config level.
fn init_tracing(args: &Args, config: &BusConfig) {
    let filter = if args.debug {
        EnvFilter::new("debug")
    } else if args.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_filter()))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn run_demo(config: &BusConfig, extensions: &[PathBuf]) -> Result<()> {
    let extensions = demo::load_extensions(extensions)?;
    let mediator = Mediator::new(config.dispatch.clone());
    let scopes = demo::mount(&mediator.handle(), &extensions)?;

    println!("Mounted: {}", mediator.names().join(", "));

    let now = chrono::Utc::now();
    let events = [
        ("system", "start", json!({ "timestamp": now.to_rfc3339() })),
        ("ui", "windowSizeChange", json!({ "width": 1280, "height": 720 })),
    ];

    for (channel, event, data) in events {
        println!("publish {channel}:{event}");
        let report = mediator.publish(
            SOURCE_NAME,
            SOURCE_CODE,
            channel,
            event,
            data,
            now.timestamp_millis(),
        )?;
        println!("  -> {report}");
    }

    for scope in scopes {
        scope.exit()?;
    }
    mediator.shutdown();
    info!("Demo finished");
    Ok(())
}

fn run_inspect(config: &BusConfig, extensions: &[PathBuf]) -> Result<()> {
    let extensions = demo::load_extensions(extensions)?;
    let mediator = Mediator::new(config.dispatch.clone());
    let _scopes = demo::mount(&mediator.handle(), &extensions)?;

    let specs = serde_json::to_string_pretty(&mediator.full_specs())?;
    println!("{specs}");
    Ok(())
}

fn run_publish(
    config: &BusConfig,
    channel: &str,
    event: &str,
    data: &str,
    extensions: &[PathBuf],
) -> Result<()> {
    let data: Value = serde_json::from_str(data).context("--data is not valid JSON")?;
    let extensions = demo::load_extensions(extensions)?;
    let mediator = Mediator::new(config.dispatch.clone());
    let _scopes = demo::mount(&mediator.handle(), &extensions)?;

    let report = mediator.publish(SOURCE_NAME, SOURCE_CODE, channel, event, data, now_millis())?;
    println!("{report}");
    Ok(())
}

fn run_key(channel: &str, event: &str) -> Result<()> {
    let key = build_dispatch_key(channel, event)?;
    let method = build_handler_method_name(channel, event)?;
    println!("dispatch key:   {key}");
    println!("handler method: {method}");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;
    init_tracing(&args, &config);

    info!(
        catch_panics = config.dispatch.catch_panics,
        slow_handler_warn_ms = config.dispatch.slow_handler_warn_ms,
        "Config loaded"
    );

    match &args.command {
        Command::Demo { extensions } => run_demo(&config, extensions),
        Command::Inspect { extensions } => run_inspect(&config, extensions),
        Command::Publish {
            channel,
            event,
            data,
            extensions,
        } => run_publish(&config, channel, event, data, extensions),
        Command::Key { channel, event } => run_key(channel, event),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_parse_global_flags_after_subcommand() {
        let args = Args::try_parse_from(["specbus", "key", "system", "start", "-d"])
            .expect("parse");
        assert!(args.debug);
        assert!(matches!(args.command, Command::Key { .. }));
    }

    #[test]
    fn args_parse_repeated_extensions() {
        let args = Args::try_parse_from([
            "specbus",
            "inspect",
            "--extension",
            "a.json",
            "-e",
            "b.json",
        ])
        .expect("parse");

        match args.command {
            Command::Inspect { extensions } => assert_eq!(extensions.len(), 2),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn clap_definition_is_valid() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
