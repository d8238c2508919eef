//! Build information file written at the end of every build

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::BuilderProcessor;
use crate::args::schema::{ArgumentDescriptor, ArgumentSchema};
use crate::build::log::BuildLog;
use crate::build::{BuildConfiguration, BuildOutcome, BuildReport};
use crate::utils::paths::output_dir;

/// Default file name, placed next to the player
pub const BUILD_INFO_FILE: &str = "build_info.json";

/// Overrides where the file is written
pub const BUILD_INFO_PATH: &str = "buildInfoPath";

const SCHEMA: ArgumentSchema = ArgumentSchema::new(&[ArgumentDescriptor::optional(
    BUILD_INFO_PATH,
    "where to write build_info.json (default: next to the player)",
)]);

/// Contents of `build_info.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    pub target: String,
    pub version: String,
    pub build_number: u32,
    pub defines: Vec<String>,
    pub development: bool,
    pub embed_bundles: bool,
    pub outcome: BuildOutcome,
    pub summary: String,
    pub output_path: String,
    /// Build timestamp (RFC 3339, local time)
    pub build_time: String,
    /// Build host OS
    pub build_host: String,
    pub generator: String,
}

impl BuildInfo {
    pub fn new(project: Option<&str>, config: &BuildConfiguration, report: &BuildReport) -> Self {
        Self {
            project: project.map(str::to_string),
            target: config.target().to_string(),
            version: config.version().to_string(),
            build_number: config.build_number(),
            defines: config.defines().iter().map(str::to_string).collect(),
            development: config.is_development(),
            embed_bundles: config.embed_bundles(),
            outcome: report.outcome,
            summary: report.summary.clone(),
            output_path: report.output_path.display().to_string(),
            build_time: chrono::Local::now().to_rfc3339(),
            build_host: std::env::consts::OS.to_string(),
            generator: format!("playerbuild {}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Writes [`BuildInfo`] on finalize
#[derive(Debug, Clone, Default)]
pub struct BuildInfoProcessor {
    project: Option<String>,
}

impl BuildInfoProcessor {
    pub fn new(project: Option<String>) -> Self {
        Self { project }
    }

    /// Where the file goes for this build
    pub fn info_path(config: &BuildConfiguration) -> PathBuf {
        match config.args().value(BUILD_INFO_PATH) {
            Some(path) => PathBuf::from(path),
            None => output_dir(config.output_path()).join(BUILD_INFO_FILE),
        }
    }

    fn write(&self, info: &BuildInfo, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        let json = serde_json::to_string_pretty(info).context("Failed to serialize build info")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write build info to {}", path.display()))
    }
}

impl BuilderProcessor for BuildInfoProcessor {
    fn name(&self) -> &str {
        "BuildInfo"
    }

    fn schema(&self) -> ArgumentSchema {
        SCHEMA
    }

    fn on_finalize(
        &self,
        config: &BuildConfiguration,
        report: &BuildReport,
        log: &dyn BuildLog,
    ) -> Result<()> {
        let info = BuildInfo::new(self.project.as_deref(), config, report);
        let path = Self::info_path(config);
        self.write(&info, &path)?;

        if config.is_verbose() {
            log.log(&format!("Build info written to {}", path.display()));
        }
        Ok(())
    }
}
