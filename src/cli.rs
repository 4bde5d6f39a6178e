//! CLI - Command Line Interface for podview
//!
//! Run with a podcast id to open the interactive preview, or use `show` to
//! print a podcast for scripting.
//!
//! # Examples
//!
//! ```bash
//! # Interactive preview
//! podview 10716
//!
//! # Print a podcast as JSON
//! podview show 10716 --json
//! ```

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    Error = 1,
    InvalidArgs = 2,
    NetworkError = 3,
    NotFound = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// podview - preview a podcast's seasons and episodes in the terminal
#[derive(Parser, Debug)]
#[command(
    name = "podview",
    version,
    about = "Preview a podcast's seasons and episodes in the terminal",
    args_conflicts_with_subcommands = true,
    after_help = "EXAMPLES:\n\
                  podview 10716                 Open the interactive preview\n\
                  podview show 10716 --json     Print the podcast as JSON"
)]
pub struct Cli {
    /// Podcast id to open in the interactive preview
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    pub podcast_id: Option<u64>,

    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Catalog base URL (overrides config and PODVIEW_CATALOG_URL)
    #[arg(long, global = true)]
    pub catalog_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Check if running in CLI mode (has subcommand)
    pub fn is_cli_mode(&self) -> bool {
        self.command.is_some()
    }

    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print a podcast with its seasons and episodes
    #[command(visible_alias = "s")]
    Show(ShowCmd),
}

/// Fetch one podcast and print it
#[derive(Args, Debug)]
pub struct ShowCmd {
    /// Podcast id
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    pub podcast_id: u64,

    /// Include episode lists in text output
    #[arg(long, short = 'e')]
    pub episodes: bool,
}

// =============================================================================
// JSON Output Format
// =============================================================================

/// Envelope for all JSON output
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data as a JSON envelope
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(&JsonOutput::success(data))?);
        Ok(())
    }

    /// Print a line of human-readable output
    pub fn line(&self, text: impl std::fmt::Display) {
        println!("{}", text);
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
