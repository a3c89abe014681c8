//! vcdgen CLI: turns trace description files into VCD waveforms.
//!
//! Provides `vcdgen render` to emit a VCD document from a JSON or TOML trace
//! description, and `vcdgen inspect` to show the module tree and the
//! identifier codes each signal would receive.

#![warn(missing_docs)]

mod inspect;
mod render;
mod trace;

use std::io::IsTerminal;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// vcdgen: Value Change Dump generator.
#[derive(Parser, Debug)]
#[command(name = "vcdgen", version, about = "Value Change Dump generator")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a custom `vcdgen.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a VCD document for a trace description.
    Render(RenderArgs),
    /// Show the module tree, identifier codes, and value counts of a trace.
    Inspect(InspectArgs),
}

/// Arguments for the `vcdgen render` subcommand.
#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Trace description file (`.json` or `.toml`).
    pub trace: String,

    /// Output path for the VCD file.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Write the document to standard output instead of a file.
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,

    /// Override the timescale (e.g., "1ps", "10ns").
    #[arg(long)]
    pub timescale: Option<String>,
}

/// Arguments for the `vcdgen inspect` subcommand.
#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Trace description file (`.json` or `.toml`).
    pub trace: String,

    /// Output format for the summary.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Summary output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable tree.
    Text,
    /// Machine-readable JSON.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

/// Installs the stderr log subscriber.
///
/// `--quiet` and `--verbose` pick the level; otherwise `RUST_LOG` applies,
/// defaulting to warnings only.
fn init_logging(global: &GlobalArgs) {
    let filter = if global.quiet {
        EnvFilter::new("error")
    } else if global.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(global.color)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };
    init_logging(&global);

    let result = match cli.command {
        Command::Render(ref args) => render::run(args, &global),
        Command::Inspect(ref args) => inspect::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
