use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cuecard")]
#[command(about = "Live keyword checklist for presenters", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Show saved keyword lists
    Lists,
    /// Create an empty keyword list
    Create {
        /// Name of the new list
        name: String,
    },
    /// Show the keywords of a list
    Show {
        /// List id or name
        list: String,
    },
    /// Add a keyword or phrase to a list
    Add {
        /// List id or name
        list: String,
        /// Keyword text, e.g. "climate change"
        text: String,
    },
    /// Remove a keyword from a list
    Remove {
        /// List id or name
        list: String,
        /// Keyword id as printed by `show`
        keyword_id: String,
    },
    /// Rename a list
    Rename {
        /// List id or name
        list: String,
        /// New name
        name: String,
    },
    /// Delete a list and its keywords
    Delete {
        /// List id or name
        list: String,
    },
    /// Match a transcript against a list without saving anything
    Check {
        /// List id or name
        list: String,
        /// Transcript text to evaluate
        transcript: String,
    },
    /// Run a live presentation session
    Present(PresentCliArgs),
    /// Inspect or change configuration
    Config(ConfigCliArgs),
    /// Print version information
    Version,
}

#[derive(ClapArgs, Debug)]
pub struct PresentCliArgs {
    /// List id or name
    pub list: String,
    /// Read the transcript from this file instead of stdin
    #[arg(short, long)]
    pub input: Option<PathBuf>,
    /// Pause between transcript lines, in milliseconds
    #[arg(long, default_value = "0")]
    pub line_delay_ms: u64,
    /// Serve the HTTP control API while presenting
    #[arg(long)]
    pub serve: bool,
    /// Rehearse without writing flags back to the saved list
    #[arg(long)]
    pub no_save: bool,
}

#[derive(ClapArgs, Debug)]
pub struct ConfigCliArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the current configuration
    Show,
    /// Set the speech model (tiny, base, small, medium)
    Model {
        /// Model name
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_present() {
        let cli = Cli::parse_from([
            "cuecard",
            "present",
            "Keynote",
            "--input",
            "talk.txt",
            "--serve",
            "-v",
        ]);
        assert!(cli.verbose);
        match cli.command {
            CliCommand::Present(args) => {
                assert_eq!(args.list, "Keynote");
                assert_eq!(args.input, Some(PathBuf::from("talk.txt")));
                assert!(args.serve);
                assert!(!args.no_save);
                assert_eq!(args.line_delay_ms, 0);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_check_and_config() {
        let cli = Cli::parse_from(["cuecard", "check", "Keynote", "hello world"]);
        assert!(matches!(
            cli.command,
            CliCommand::Check { ref transcript, .. } if transcript == "hello world"
        ));

        let cli = Cli::parse_from(["cuecard", "config", "model", "base"]);
        match cli.command {
            CliCommand::Config(ConfigCliArgs {
                command: ConfigCommand::Model { name },
            }) => assert_eq!(name, "base"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_command_is_required() {
        assert!(Cli::try_parse_from(["cuecard"]).is_err());
    }
}
