//! Command implementations
//!
//! Each command module provides a clap-derived struct and execute method.
//! [`Project`] wires PlayerBuild.toml into a ready-to-run orchestrator.

pub mod build;
pub mod describe;

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::build::native::{DryRunEngine, ExternalEngine, NativePlayerBuild};
use crate::build::orchestrator::BuildOrchestrator;
use crate::build::platforms::PlatformBuilders;
use crate::build::processors::build_info::BuildInfoProcessor;
use crate::build::processors::ProcessorRegistry;
use crate::build::settings::MemorySettings;
use crate::config::PlayerBuildConfig;
use crate::utils::terminal::ConsoleLog;

/// Loaded project configuration and the directory it lives in
pub struct Project {
    root: PathBuf,
    config: PlayerBuildConfig,
}

impl Project {
    /// Load `--config`, or discover PlayerBuild.toml, or use the defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let (root, config) = PlayerBuildConfig::discover(explicit)?;
        Ok(Self { root, config })
    }

    pub fn config(&self) -> &PlayerBuildConfig {
        &self.config
    }

    /// Builders for the enabled targets
    pub fn builders(&self) -> Result<PlatformBuilders> {
        Ok(match self.config.enabled_targets()? {
            Some(targets) => PlatformBuilders::only(targets),
            None => PlatformBuilders::with_defaults(),
        })
    }

    /// Processors configured under [processors]
    pub fn processors(&self) -> Result<ProcessorRegistry> {
        let mut registry = ProcessorRegistry::new();

        if let Some(build_info) = &self.config.processors.build_info {
            if build_info.enabled {
                let processor = Box::new(BuildInfoProcessor::new(self.config.project.name.clone()));
                match build_info.platforms()? {
                    Some(platforms) => registry.register_for(processor, platforms),
                    None => registry.register(processor),
                }
            }
        }

        Ok(registry)
    }

    /// Configured engine, or a dry run when there is none
    pub fn engine(&self, verbose: bool) -> Result<Box<dyn NativePlayerBuild>> {
        match &self.config.engine {
            Some(engine) => Ok(Box::new(ExternalEngine::new(
                &engine.program,
                engine.args.clone(),
                verbose,
            )?)),
            None => Ok(Box::new(DryRunEngine)),
        }
    }

    /// Path of the settings store file, if one is configured
    pub fn settings_path(&self) -> Option<PathBuf> {
        self.config.settings_path(&self.root)
    }

    /// Settings store, loaded from its file when that exists
    pub fn settings(&self) -> Result<MemorySettings> {
        match self.settings_path() {
            Some(path) if path.is_file() => MemorySettings::load(&path),
            _ => Ok(MemorySettings::new()),
        }
    }

    /// Scenes matched by the configured patterns
    pub fn scenes(&self) -> Result<Vec<String>> {
        self.config.resolve_scenes(&self.root)
    }

    /// Orchestrator wired with everything the project configures
    pub fn orchestrator(
        &self,
        engine: Box<dyn NativePlayerBuild>,
    ) -> Result<BuildOrchestrator<MemorySettings>> {
        let mut orchestrator =
            BuildOrchestrator::new(Box::new(self.builders()?), engine, self.settings()?)
                .with_processors(self.processors()?)
                .with_log(Box::new(ConsoleLog))
                .with_scenes(self.scenes()?);

        if let Some(text) = &self.config.project.additional_help {
            orchestrator = orchestrator.with_additional_help(text.as_str());
        }

        Ok(orchestrator)
    }
}
