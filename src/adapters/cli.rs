//! Command-line interface definition.
//!
//! clap derive types; parsed in main and dispatched to the use cases.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "tg-stats",
    about = "Fetch Telegram channel messages and compute view/forward statistics",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the most recent messages of a channel as JSON
    Messages {
        /// Channel URL, @handle, or bare handle
        channel: String,
        /// How many of the most recent messages to fetch
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
        /// Write the JSON result to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Aggregate view/forward statistics over recent messages
    Stats {
        /// Channel URL, @handle, or bare handle
        channel: String,
        /// Maximum number of messages to include in the report
        #[arg(short, long, default_value_t = 100)]
        limit: usize,
        /// Only count messages posted on or before this date (YYYY-MM-DD, UTC)
        #[arg(short = 'd', long)]
        max_date: Option<String>,
        /// Only count messages that have text
        #[arg(short = 't', long)]
        only_text: bool,
        /// Write the JSON result to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Inspect a single message by its t.me URL
    Message {
        /// Message URL, e.g. https://t.me/channel/123
        url: String,
        /// Write the JSON result to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export channel history to CSV, newest first
    Export {
        /// Channel URL, @handle, or bare handle
        channel: String,
        /// Cap the export at this many most recent messages
        #[arg(short, long)]
        limit: Option<usize>,
        /// Write CSV to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
