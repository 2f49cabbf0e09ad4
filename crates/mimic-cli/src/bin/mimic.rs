//! Mimic CLI Binary
//!
//! # Usage
//!
//! ```bash
//! # Copy the shape of Src onto Dst and print the updated model
//! mimic apply model.json --source Src --destination Dst
//!
//! # Several pairs, applied in order
//! mimic apply model.json -s Src -d Dst -s Dst -d Copy
//!
//! # Mimic every pair listed in mimic.toml and write the model to a file
//! mimic apply model.json --output mimicked.json
//!
//! # Print a class as source text
//! mimic show model.json Dst
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use mimic_cli::{
    commands::{self, ApplyArgs, ShowArgs},
    config::MimicConfig,
    Result,
};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(
    name = "mimic",
    version = env!("CARGO_PKG_VERSION"),
    about = "Copy interfaces, fields, constructors and methods from one class onto another"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (use multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Set log level (overrides --verbose/--quiet)
    #[arg(long, global = true, value_enum)]
    log: Option<LogLevel>,

    /// Set log output format
    #[arg(long, global = true, value_enum, default_value = "pretty")]
    log_format: LogFormat,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Mimic source classes onto destination classes
    Apply(ApplyArgs),

    /// Print classes of a model as source text
    Show(ShowArgs),
}

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet, cli.log, cli.log_format);

    if let Err(e) = run(cli.command, cli.config) {
        error!("{}", e);
        if cli.verbose > 0 {
            error!(?e, "detailed error context");
        }
        std::process::exit(1);
    }
}

fn run(command: Commands, config: Option<PathBuf>) -> Result<()> {
    let config = MimicConfig::load(config.as_deref())?;

    match command {
        Commands::Apply(args) => {
            let reports = commands::apply_command(args, &config)?;
            info!("Mimicked {} pair(s)", reports.len());
        }
        Commands::Show(args) => commands::show_command(args, &config)?,
    }
    Ok(())
}

fn setup_logging(verbose: u8, quiet: bool, log_level: Option<LogLevel>, log_format: LogFormat) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if let Some(level) = log_level {
        EnvFilter::new(match level {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        })
    } else if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // stdout carries the model, logs go to stderr
    let formatter = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_level(true);

    match log_format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(formatter)
                .with(filter)
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(formatter.json())
                .with(filter)
                .init();
        }
    }
}
