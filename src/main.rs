//! playerbuild - command-line player build orchestration
//!
//! ## Architecture
//!
//! ```text
//! CLI tokens → ArgumentBag → BuildConfiguration
//!            → processors / platform builder → native engine → BuildReport
//! ```

mod args;
mod build;
mod cli;
mod commands;
mod config;
mod error;
mod exec;
mod utils;
mod version;

use std::process::ExitCode;

use clap::Parser;

use cli::Cli;
use error::BuildError;
use utils::terminal::print_error;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<BuildError>() {
                Some(build_error) => build_error.display_with_hints(),
                None => print_error(&format!("{:#}", err)),
            }
            ExitCode::FAILURE
        }
    }
}
