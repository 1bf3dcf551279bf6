//! `firc`, the command-line front end of the FIR toolkit.
//!
//! Provides `firc check` for structural validation, `firc fmt` for printing a
//! circuit in canonical form, `firc wire` for running the wiring pass with an
//! annotation file, and `firc build` for the whole pipeline driven by
//! `fir.toml`.

#![warn(missing_docs)]

mod build;
mod check;
mod fmt;
mod pipeline;
mod wire;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// FIR circuit toolkit.
#[derive(Parser, Debug)]
#[command(name = "firc", version, about = "FIR circuit toolkit")]
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

    /// Path to a custom `fir.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse and validate a circuit.
    Check(CheckArgs),
    /// Print a circuit in canonical form.
    Fmt(FmtArgs),
    /// Run the wiring pass over a circuit.
    Wire(WireArgs),
    /// Run the pipeline described by `fir.toml`.
    Build,
}

/// Arguments for `firc check`.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// The circuit file.
    pub file: String,

    /// Rule names or codes to suppress (e.g., `--allow unknown-type`).
    #[arg(long, num_args = 1..)]
    pub allow: Vec<String>,

    /// Rule names or codes to promote to errors (e.g., `--deny W102`).
    #[arg(long, num_args = 1..)]
    pub deny: Vec<String>,

    /// Output format for diagnostics.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for `firc fmt`.
#[derive(Parser, Debug)]
pub struct FmtArgs {
    /// The circuit file.
    pub file: String,

    /// Write here instead of standard output.
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Arguments for `firc wire`.
#[derive(Parser, Debug)]
pub struct WireArgs {
    /// The circuit file.
    pub file: String,

    /// A `.json` or `.toml` annotation file.
    #[arg(short, long)]
    pub annotations: Option<String>,

    /// An extra source directive, `PIN=Module>component`.
    #[arg(long)]
    pub source: Vec<String>,

    /// An extra sink directive, `PIN=Module` or `PIN=Module>component`.
    #[arg(long)]
    pub sink: Vec<String>,

    /// Write here instead of standard output.
    #[arg(short, long)]
    pub output: Option<String>,
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

/// Diagnostic output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// One JSON object per line.
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

impl GlobalArgs {
    /// The log level implied by `--quiet` and `--verbose`.
    pub fn log_level(&self) -> log::LevelFilter {
        if self.quiet {
            log::LevelFilter::Error
        } else if self.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::env::var("TERM").is_ok_and(|t| t != "dumb"),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    env_logger::Builder::new()
        .format_timestamp(None)
        .filter_level(global.log_level())
        .write_style(if color {
            env_logger::WriteStyle::Always
        } else {
            env_logger::WriteStyle::Never
        })
        .target(env_logger::Target::Stderr)
        .init();

    let result = match cli.command {
        Command::Check(ref args) => check::run(args, &global),
        Command::Fmt(ref args) => fmt::run(args, &global),
        Command::Wire(ref args) => wire::run(args, &global),
        Command::Build => build::run(&global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
