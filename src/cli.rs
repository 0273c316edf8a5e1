// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `syncgraph`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "syncgraph",
    version,
    about = "Create or tear down a manifest of dependent resources in dependency order.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the resource manifest (TOML).
    ///
    /// Default: `Resources.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Resources.toml")]
    pub manifest: String,

    /// Tear resources down in reverse dependency order instead of building them.
    #[arg(long)]
    pub delete: bool,

    /// Validate the manifest and print the execution order without touching
    /// any resource.
    #[arg(long)]
    pub dry_run: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SYNCGRAPH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
