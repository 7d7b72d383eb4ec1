//! CLI definitions for turtle
//!
//! The clap structures live here, separate from main.rs, so tests can
//! parse argument lists without spawning the binary.

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Styles for help output.
///
/// - Green: headers, usage, command names
/// - White: placeholders and valid values
pub fn build_cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Green.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::White.on_default())
        .valid(AnsiColor::White.on_default())
        .invalid(AnsiColor::Red.on_default())
        .error(AnsiColor::Red.on_default() | Effects::BOLD)
}

#[derive(Debug, Parser)]
#[command(name = "turtle")]
#[command(about = "Telnet client with ANSI colour decoding")]
#[command(
    long_about = "turtle - a small telnet client for text servers such as MUDs.

Server output is split into text and telnet control codes, and inline
ANSI colour sequences are interpreted into styled runs.

QUICK START:
    turtle connect example.org 4000     Talk to a server
    turtle decode capture.bin           Show how a captured stream decodes
    turtle config init                  Write the default config file

Set TURTLE_LOG (e.g. TURTLE_LOG=debug) to see protocol traffic on stderr."
)]
#[command(version, styles = build_cli_styles())]
pub struct Cli {
    /// Use this config file instead of ~/.config/turtle/config.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Connect to a telnet server
    #[command(long_about = "Connect to a telnet server.

Server text is printed to stdout and every line typed on stdin is sent to
the server. Option negotiation requests are refused.

EXAMPLES:
    turtle connect localhost 4000
    turtle connect mud.example.org 23 --plain")]
    Connect {
        /// Server host name or address
        host: String,
        /// Server port
        #[arg(value_parser = clap::value_parser!(u16).range(1..))]
        port: u16,
        /// Print text exactly as decoded, escape sequences included
        #[arg(long)]
        plain: bool,
    },

    /// Decode a captured byte stream and list its tokens
    #[command(long_about = "Decode a captured byte stream and list its tokens.

Each styled text run is printed as
    text <run> <foreground> <background> <attributes> \"<text>\"
and each control code as
    telnet <code>

Use --chunk to feed the decoder a few bytes at a time, as a slow network
would.")]
    Decode {
        /// File holding the raw bytes
        file: PathBuf,
        /// Bytes handed to the decoder per read (default: whole file)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        chunk: Option<u64>,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration as TOML
    Show,
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
