//! CLI argument parsing using clap derive macros

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands::{build::BuildCommand, describe::DescribeCommand};

/// playerbuild - player build pipeline for game engine editors
///
/// Resolves name=value build arguments into engine settings, runs the
/// platform builder and the configured processors, and invokes the engine's
/// native player build.
#[derive(Parser, Debug)]
#[command(name = "playerbuild")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output (same as the `verbose` build argument)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to PlayerBuild.toml (default: search from the current directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a player
    Build(BuildCommand),

    /// Print every recognized build argument
    Describe(DescribeCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        if self.no_color {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        }

        let config = self.config.as_deref();
        match self.command {
            Commands::Build(cmd) => cmd.execute(self.verbose, config),
            Commands::Describe(cmd) => cmd.execute(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_tokens_and_global_flags() {
        let cli = Cli::try_parse_from([
            "playerbuild",
            "build",
            "buildTarget=Android",
            "debug",
            "-v",
            "--config",
            "game/PlayerBuild.toml",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("game/PlayerBuild.toml")));
        match cli.command {
            Commands::Build(cmd) => {
                assert_eq!(cmd.tokens, vec!["buildTarget=Android", "debug"]);
                assert!(!cmd.dry_run);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_describe_takes_no_arguments() {
        assert!(Cli::try_parse_from(["playerbuild", "describe"]).is_ok());
        assert!(Cli::try_parse_from(["playerbuild", "describe", "extra"]).is_err());
    }
}
