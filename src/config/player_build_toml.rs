//! PlayerBuild.toml configuration parsing
//!
//! Every section is optional; an empty file (or no file at all) means
//! "all built-in builders, no engine, no defaults".
//!
//! ```toml
//! [project]
//! name = "my-game"
//! scenes = ["Assets/Scenes/*.unity"]
//! settings = "ProjectSettings/player_settings.json"
//!
//! [engine]
//! program = "unity-editor"
//! args = ["-batchmode", "-quit"]
//!
//! [targets]
//! enabled = ["Windows64", "Android"]
//!
//! [defaults]
//! buildNumber = "0"
//!
//! [processors.build_info]
//! platforms = ["Android"]
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use super::validation::validate_config;
use crate::build::BuildTarget;
use crate::error::{hints, BuildError};
use crate::utils::paths::find_config_from;

/// Root configuration from PlayerBuild.toml
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerBuildConfig {
    #[serde(default)]
    pub project: ProjectConfig,

    /// Engine executable; absent means dry run
    pub engine: Option<EngineConfig>,

    #[serde(default)]
    pub targets: TargetsConfig,

    /// Default argument values, overridden by the command line
    #[serde(default)]
    pub defaults: BTreeMap<String, String>,

    #[serde(default)]
    pub processors: ProcessorsConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectConfig {
    pub name: Option<String>,

    /// Scene glob patterns, relative to the config file
    #[serde(default)]
    pub scenes: Vec<String>,

    /// Text appended to the help output
    pub additional_help: Option<String>,

    /// JSON file backing the engine settings store
    pub settings: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    pub program: String,

    /// Arguments placed before the generated build arguments
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TargetsConfig {
    /// Targets with a builder; absent means all
    pub enabled: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProcessorsConfig {
    pub build_info: Option<ProcessorConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProcessorConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Targets the processor runs for; absent means all
    pub platforms: Option<Vec<String>>,
}

fn default_true() -> bool {
    true
}

impl ProcessorConfig {
    pub fn platforms(&self) -> Result<Option<Vec<BuildTarget>>> {
        self.platforms
            .as_ref()
            .map(|names| parse_targets(names))
            .transpose()
    }
}

impl PlayerBuildConfig {
    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(BuildError::config_error_with_hint(
                format!("{} not found", path.display()),
                hints::player_build_toml_not_found(),
            )
            .into());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| {
            BuildError::config_error_with_hint(
                format!("Failed to parse PlayerBuild.toml: {}", e.message()),
                hints::invalid_player_build_toml(),
            )
        })?;

        validate_config(&config)?;
        Ok(config)
    }

    /// Find PlayerBuild.toml by searching up from the current directory
    pub fn find_config() -> Result<Option<PathBuf>> {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Ok(find_config_from(&current_dir))
    }

    /// Load the explicit config, or the discovered one, or the defaults
    ///
    /// Returns the directory relative paths in the config resolve against.
    pub fn discover(explicit: Option<&Path>) -> Result<(PathBuf, Self)> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::find_config()?,
        };

        match path {
            Some(path) => {
                let config = Self::load_from_path(&path)?;
                let root = path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_default();
                Ok((root, config))
            }
            None => {
                let root = std::env::current_dir().context("Failed to get current directory")?;
                Ok((root, Self::default()))
            }
        }
    }

    /// Enabled targets, or `None` for all
    pub fn enabled_targets(&self) -> Result<Option<Vec<BuildTarget>>> {
        self.targets
            .enabled
            .as_ref()
            .map(|names| parse_targets(names))
            .transpose()
    }

    /// Expand the scene patterns against `root`
    ///
    /// Results are relative to `root`, `/`-separated, sorted and unique.
    pub fn resolve_scenes(&self, root: &Path) -> Result<Vec<String>> {
        let mut scenes = Vec::new();
        // The root is matched literally; only the configured pattern globs
        let escaped_root = PathBuf::from(glob::Pattern::escape(&root.to_string_lossy()));
        for pattern in &self.project.scenes {
            let full = escaped_root.join(pattern);
            let entries = glob::glob(&full.to_string_lossy()).map_err(|e| {
                BuildError::config_error(format!("Invalid scene pattern '{}': {}", pattern, e))
            })?;

            for entry in entries.flatten() {
                if !entry.is_file() {
                    continue;
                }
                let relative = entry.strip_prefix(root).unwrap_or(&entry);
                let scene = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                scenes.push(scene);
            }
        }
        scenes.sort();
        scenes.dedup();
        Ok(scenes)
    }

    /// Default tokens followed by the command-line tokens
    ///
    /// A later token wins over an earlier one with the same name, so the
    /// command line always overrides the defaults.
    pub fn merge_tokens(&self, cli_tokens: &[String]) -> Vec<String> {
        self.defaults
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .chain(cli_tokens.iter().cloned())
            .collect()
    }

    /// Settings file, resolved against `root`
    pub fn settings_path(&self, root: &Path) -> Option<PathBuf> {
        self.project.settings.as_ref().map(|p| root.join(p))
    }
}

/// Parse build target names from the config
pub(crate) fn parse_targets(names: &[String]) -> Result<Vec<BuildTarget>> {
    names
        .iter()
        .map(|name| {
            BuildTarget::from_arg(name).map_err(|_| {
                anyhow::Error::from(BuildError::config_error_with_hint(
                    format!("Unknown build target '{}'", name),
                    hints::build_targets(),
                ))
            })
        })
        .collect()
}
