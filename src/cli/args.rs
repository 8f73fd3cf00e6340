//! CLI argument definitions using clap
//!
//! Commands:
//! - recordhub serve [--config <path>]
//! - recordhub check <students|notes> [--file <path>]

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// recordhub - validated record APIs for students and notes
#[derive(Parser, Debug)]
#[command(name = "recordhub")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open the document store and serve the HTTP API
    Serve {
        /// Path to a JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check a field set offline, as a client would before sending it
    Check {
        /// Record kind
        #[arg(value_enum)]
        resource: ResourceKind,

        /// JSON file holding the field set (default: stdin)
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceKind {
    Students,
    Notes,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["recordhub", "serve", "--config", "hub.json"]).unwrap();
        match cli.command {
            Command::Serve { config } => assert_eq!(config, Some(PathBuf::from("hub.json"))),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_check() {
        let cli = Cli::try_parse_from(["recordhub", "check", "notes"]).unwrap();
        match cli.command {
            Command::Check { resource, file } => {
                assert_eq!(resource, ResourceKind::Notes);
                assert!(file.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(Cli::try_parse_from(["recordhub", "check", "courses"]).is_err());
    }
}
