//! Cross-cutting build processors
//!
//! Processors are notified at the four pipeline checkpoints, in registration
//! order. A processor registered for a set of targets is skipped entirely for
//! every other target. The first failing processor aborts the checkpoint and
//! the rest of the build.

pub mod build_info;

use anyhow::Result;

use super::log::BuildLog;
use super::settings::SettingsStore;
use super::{BuildConfiguration, BuildReport, BuildTarget};
use crate::args::schema::ArgumentSchema;

/// Hooks invoked around the platform builder
pub trait BuilderProcessor {
    /// Name shown as the help heading
    fn name(&self) -> &str;

    /// Arguments this processor reads
    fn schema(&self) -> ArgumentSchema {
        ArgumentSchema::empty()
    }

    /// Self-description; processors with empty help are left out of the
    /// help output
    fn help(&self) -> String {
        self.schema().describe(0).trim_end().to_string()
    }

    /// After the configuration is built, before the platform pre-build
    fn on_configuration(
        &self,
        _config: &BuildConfiguration,
        _settings: &mut dyn SettingsStore,
        _log: &dyn BuildLog,
    ) -> Result<()> {
        Ok(())
    }

    /// After the platform pre-build, right before the native build
    fn on_before_build(
        &self,
        _config: &BuildConfiguration,
        _settings: &mut dyn SettingsStore,
        _log: &dyn BuildLog,
    ) -> Result<()> {
        Ok(())
    }

    /// Right after the native build
    fn on_after_build(
        &self,
        _config: &BuildConfiguration,
        _report: &BuildReport,
        _log: &dyn BuildLog,
    ) -> Result<()> {
        Ok(())
    }

    /// After the platform post-build, last step of the pipeline
    fn on_finalize(
        &self,
        _config: &BuildConfiguration,
        _report: &BuildReport,
        _log: &dyn BuildLog,
    ) -> Result<()> {
        Ok(())
    }
}

struct Registration {
    processor: Box<dyn BuilderProcessor>,
    /// `None` applies to every target
    platforms: Option<Vec<BuildTarget>>,
}

impl Registration {
    fn applies_to(&self, target: BuildTarget) -> bool {
        self.platforms
            .as_ref()
            .map_or(true, |platforms| platforms.contains(&target))
    }
}

/// Ordered list of processors with their applicable targets
#[derive(Default)]
pub struct ProcessorRegistry {
    entries: Vec<Registration>,
}

impl ProcessorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a processor for every target
    pub fn register(&mut self, processor: Box<dyn BuilderProcessor>) {
        self.entries.push(Registration {
            processor,
            platforms: None,
        });
    }

    /// Register a processor for the listed targets only
    pub fn register_for(
        &mut self,
        processor: Box<dyn BuilderProcessor>,
        platforms: impl IntoIterator<Item = BuildTarget>,
    ) {
        self.entries.push(Registration {
            processor,
            platforms: Some(platforms.into_iter().collect()),
        });
    }

    /// Every registered processor, in registration order
    pub fn processors(&self) -> impl Iterator<Item = &dyn BuilderProcessor> {
        self.entries.iter().map(|e| e.processor.as_ref())
    }

    /// Processors applicable to `target`, in registration order
    pub fn for_platform(&self, target: BuildTarget) -> Vec<&dyn BuilderProcessor> {
        self.entries
            .iter()
            .filter(|e| e.applies_to(target))
            .map(|e| e.processor.as_ref())
            .collect()
    }

    pub fn on_configuration(
        &self,
        config: &BuildConfiguration,
        settings: &mut dyn SettingsStore,
        log: &dyn BuildLog,
    ) -> Result<()> {
        for processor in self.for_platform(config.target()) {
            processor.on_configuration(config, settings, log)?;
        }
        Ok(())
    }

    pub fn on_before_build(
        &self,
        config: &BuildConfiguration,
        settings: &mut dyn SettingsStore,
        log: &dyn BuildLog,
    ) -> Result<()> {
        for processor in self.for_platform(config.target()) {
            processor.on_before_build(config, settings, log)?;
        }
        Ok(())
    }

    pub fn on_after_build(
        &self,
        config: &BuildConfiguration,
        report: &BuildReport,
        log: &dyn BuildLog,
    ) -> Result<()> {
        for processor in self.for_platform(config.target()) {
            processor.on_after_build(config, report, log)?;
        }
        Ok(())
    }

    pub fn on_finalize(
        &self,
        config: &BuildConfiguration,
        report: &BuildReport,
        log: &dyn BuildLog,
    ) -> Result<()> {
        for processor in self.for_platform(config.target()) {
            processor.on_finalize(config, report, log)?;
        }
        Ok(())
    }
}
