//! Describe command implementation

use std::path::Path;

use anyhow::Result;
use clap::Args;

use super::Project;
use crate::build::native::DryRunEngine;

/// Print every recognized argument, per platform and processor
#[derive(Args, Debug)]
pub struct DescribeCommand {}

impl DescribeCommand {
    pub fn execute(self, config: Option<&Path>) -> Result<()> {
        let project = Project::load(config)?;
        let orchestrator = project.orchestrator(Box::new(DryRunEngine))?;
        print!("{}", orchestrator.help());
        Ok(())
    }
}
