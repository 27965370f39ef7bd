//! Command-line interface for petstore.
//!
//! This module provides the CLI structure for the `petctl` binary.

mod commands;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, GenderArg, InsertCommand, OutputFormat, QueryCommand, StatusCommand,
    UpdateCommand,
};
pub use output::render_cursor;

use crate::address::Address;
use crate::logging::Verbosity;

/// petctl - Manage a local pet record store
///
/// Inserts, queries, updates and deletes pet records addressed by
/// `content://<authority>/pets[/<id>]`.
#[derive(Debug, Parser)]
#[command(name = "petctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Insert a pet and print its address
    Insert(InsertCommand),

    /// Query the collection or a single pet
    Query(QueryCommand),

    /// Update the given fields of one or all pets
    Update(UpdateCommand),

    /// Delete one or all pets
    Delete {
        /// Collection or item address
        address: Address,
    },

    /// Print the MIME type of an address
    Type {
        /// Collection or item address
        address: Address,
    },

    /// Show store status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.verbose, self.quiet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn status_cli(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Status(StatusCommand { json: false }),
        }
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "petctl");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity() {
        assert_eq!(status_cli(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(status_cli(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(status_cli(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(status_cli(3, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_insert() {
        let args = vec!["petctl", "insert", "--name", "Rex", "--weight", "20", "--gender", "male"];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Insert(cmd) = cli.command else {
            panic!("expected insert");
        };
        assert_eq!(cmd.name, "Rex");
        assert_eq!(cmd.weight, Some(20));
        assert_eq!(cmd.gender, GenderArg::Male);
        assert_eq!(cmd.breed, None);
    }

    #[test]
    fn test_parse_insert_default_gender() {
        let cli = Cli::try_parse_from(["petctl", "insert", "-n", "Tom"]).unwrap();
        let Command::Insert(cmd) = cli.command else {
            panic!("expected insert");
        };
        assert_eq!(cmd.gender, GenderArg::Unknown);
    }

    #[test]
    fn test_parse_insert_requires_name() {
        assert!(Cli::try_parse_from(["petctl", "insert"]).is_err());
    }

    #[test]
    fn test_parse_query() {
        let args = vec![
            "petctl",
            "query",
            "content://com.example.android.pets/pets/3",
            "--columns",
            "name,gender",
            "--format",
            "json",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Query(cmd) = cli.command else {
            panic!("expected query");
        };
        assert_eq!(cmd.address.and_then(|a| a.id()), Some(3));
        assert_eq!(
            cmd.columns,
            Some(vec!["name".to_string(), "gender".to_string()])
        );
        assert_eq!(cmd.format, OutputFormat::Json);
    }

    #[test]
    fn test_parse_query_defaults() {
        let cli = Cli::try_parse_from(["petctl", "query"]).unwrap();
        let Command::Query(cmd) = cli.command else {
            panic!("expected query");
        };
        assert!(cmd.address.is_none());
        assert!(cmd.columns.is_none());
        assert_eq!(cmd.format, OutputFormat::Table);
    }

    #[test]
    fn test_parse_rejects_bad_address() {
        assert!(Cli::try_parse_from(["petctl", "delete", "content://x/dogs/1"]).is_err());
    }

    #[test]
    fn test_parse_type() {
        let cli = Cli::try_parse_from(["petctl", "type", "com.example.android.pets/pets"]).unwrap();
        let Command::Type { address } = cli.command else {
            panic!("expected type");
        };
        assert!(!address.is_item());
    }

    #[test]
    fn test_parse_update() {
        let args = vec![
            "petctl",
            "update",
            "content://com.example.android.pets/pets/1",
            "--gender",
            "female",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Update(cmd) = cli.command else {
            panic!("expected update");
        };
        assert_eq!(cmd.gender, Some(GenderArg::Female));
        assert!(cmd.name.is_none());
    }

    #[test]
    fn test_parse_with_config() {
        let args = vec!["petctl", "-c", "/custom/config.toml", "status"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_config_validate() {
        let cli =
            Cli::try_parse_from(["petctl", "config", "validate", "--file", "a.toml"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: Some(_) })
        ));
    }
}
