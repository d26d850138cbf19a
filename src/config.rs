//! Configuration and CLI argument handling

use std::{path::PathBuf, sync::Arc, time::Duration};
use clap::Parser;

use crate::services::{AlertPlayer, BellAlert, CommandAlert, SilentAlert};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "session-clock")]
#[command(about = "A 25+5 session/break countdown clock served over HTTP")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20525")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Milliseconds between two countdown ticks
    #[arg(long, default_value = "1000", value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_millis: u64,

    /// Sound file played when an interval ends (terminal bell if omitted)
    #[arg(short, long)]
    pub sound: Option<PathBuf>,

    /// Audio player used for --sound (paplay on Linux, afplay on macOS)
    #[arg(long)]
    pub player: Option<String>,

    /// Disable the audible alert
    #[arg(short, long, conflicts_with = "sound")]
    pub mute: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }

    /// Build the alert player selected by the flags
    pub fn alert_player(&self) -> Arc<dyn AlertPlayer> {
        if self.mute {
            return Arc::new(SilentAlert);
        }
        match &self.sound {
            Some(sound) => {
                let player = self.player.as_deref().unwrap_or(CommandAlert::default_player());
                Arc::new(CommandAlert::new(player, sound.clone()))
            }
            None => Arc::new(BellAlert),
        }
    }
}
