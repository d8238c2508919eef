//! Build command implementation

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Args;

use super::Project;
use crate::args::names::common;
use crate::args::ArgumentBag;
use crate::build::native::{DryRunEngine, NativePlayerBuild};
use crate::utils::terminal::{print_info, print_success};

/// Build a player from name=value arguments
#[derive(Args, Debug)]
pub struct BuildCommand {
    /// Build arguments: name=value, or a bare name for flags
    /// (e.g. buildTarget=Android buildVersion=1.2 buildNumber=7 out=Builds/game.apk)
    #[arg(value_name = "ARGS")]
    pub tokens: Vec<String>,

    /// Skip the configured engine and only run the pipeline
    #[arg(long)]
    pub dry_run: bool,
}

impl BuildCommand {
    pub fn execute(self, verbose: bool, config: Option<&Path>) -> Result<()> {
        let project = Project::load(config)?;

        let mut tokens = project.config().merge_tokens(&self.tokens);
        if verbose {
            tokens.push(common::VERBOSE.to_string());
        }
        let args = ArgumentBag::parse(&tokens)?;
        let verbose = args.is_verbose();

        if args.contains(common::HELP) {
            let orchestrator = project.orchestrator(Box::new(DryRunEngine))?;
            print!("{}", orchestrator.help());
            return Ok(());
        }

        let engine: Box<dyn NativePlayerBuild> = if self.dry_run {
            Box::new(DryRunEngine)
        } else {
            project.engine(verbose)?
        };

        let mut orchestrator = project.orchestrator(engine)?;
        let report = orchestrator.build_from_args(Arc::new(args))?;

        if let Some(path) = project.settings_path() {
            let settings = orchestrator.settings();
            settings.save(&path)?;
            if verbose {
                print_info(&format!(
                    "{} setting(s) saved to {} ({} written by this build)",
                    settings.len(),
                    path.display(),
                    settings.writes().len()
                ));
            }
        }

        if !report.succeeded() {
            bail!("Build {}: {}", report.outcome, report.summary);
        }

        print_success(&format!(
            "Player built at {} ({:.2}s)",
            report.output_path.display(),
            report.duration.as_secs_f64()
        ));
        Ok(())
    }
}
