//! Player build orchestration
//!
//! A build runs exactly once per process, linearly through a fixed set of
//! phases:
//!
//! ```text
//! tokens → ArgumentBag → BuildConfiguration
//!        → processors.on_configuration → builder.pre_build
//!        → processors.on_before_build  → builder.build (native engine)
//!        → processors.on_after_build   → builder.post_build
//!        → processors.on_finalize      → BuildReport
//! ```
//!
//! ## Modules
//!
//! - `configure` - turns validated arguments into a [`BuildConfiguration`]
//! - `platforms` - per-platform builders and the provider that resolves them
//! - `processors` - cross-cutting hooks invoked at the four checkpoints
//! - `orchestrator` - the pipeline driver
//! - `settings` - the engine settings store the phases write into
//! - `native` - the native player build backends
//! - `defines` - scripting define symbol sets
//! - `log` - the logging sink handed to every phase

pub mod configure;
pub mod defines;
pub mod log;
pub mod native;
pub mod orchestrator;
pub mod platforms;
pub mod processors;
pub mod settings;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::args::schema::ArgumentSchema;
use crate::args::ArgumentBag;
use crate::error::BuildError;
use crate::version::BundleVersion;
use defines::ScriptingDefines;
use log::BuildLog;
use native::NativePlayerBuild;
use settings::SettingsStore;

/// Target platform of a player build
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum)]
pub enum BuildTarget {
    /// 32-bit Windows standalone player
    #[value(name = "Windows")]
    Windows,
    /// 64-bit Windows standalone player
    #[value(name = "Windows64")]
    Windows64,
    /// macOS standalone player
    #[value(name = "OSX", alias = "macOS")]
    Osx,
    /// 64-bit Linux standalone player
    #[value(name = "Linux64")]
    Linux64,
    /// Android player (APK/AAB)
    #[value(name = "Android")]
    Android,
    /// iOS Xcode project
    #[value(name = "iOS")]
    Ios,
    /// WebGL player
    #[value(name = "WebGL")]
    WebGl,
}

impl BuildTarget {
    /// Parse the raw `buildTarget` value (case-insensitive)
    pub fn from_arg(raw: &str) -> Result<Self> {
        <Self as ValueEnum>::from_str(raw.trim(), true)
            .map_err(|_| BuildError::UnknownBuildTarget { raw: raw.to_string() }.into())
    }

    /// Settings group the target belongs to
    pub fn group(&self) -> TargetGroup {
        match self {
            BuildTarget::Windows
            | BuildTarget::Windows64
            | BuildTarget::Osx
            | BuildTarget::Linux64 => TargetGroup::Standalone,
            BuildTarget::Android => TargetGroup::Android,
            BuildTarget::Ios => TargetGroup::Ios,
            BuildTarget::WebGl => TargetGroup::WebGl,
        }
    }

    pub fn all() -> &'static [BuildTarget] {
        Self::value_variants()
    }
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::args::enum_name(self))
    }
}

/// Settings group shared by related targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetGroup {
    Standalone,
    Android,
    Ios,
    WebGl,
}

impl fmt::Display for TargetGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetGroup::Standalone => write!(f, "Standalone"),
            TargetGroup::Android => write!(f, "Android"),
            TargetGroup::Ios => write!(f, "iOS"),
            TargetGroup::WebGl => write!(f, "WebGL"),
        }
    }
}

/// Scripting backend override
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScriptingBackend {
    #[value(name = "Mono2x", alias = "Mono")]
    Mono2x,
    #[value(name = "IL2CPP")]
    Il2Cpp,
}

/// Options handed to the native player build
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerBuildOptions {
    /// Target platform
    pub target: BuildTarget,
    /// Scenes included in the player, in build order
    pub scenes: Vec<String>,
    /// Output location (file or directory, platform-dependent)
    pub location: PathBuf,
    /// Development build
    pub development: bool,
}

/// Immutable snapshot of every resolved build input
///
/// Created once per build by [`configure::configure`] and only read
/// afterwards by builders and processors.
#[derive(Debug, Clone)]
pub struct BuildConfiguration {
    args: Arc<ArgumentBag>,
    target: BuildTarget,
    version: BundleVersion,
    build_number: u32,
    defines: ScriptingDefines,
    options: PlayerBuildOptions,
    embed_bundles: bool,
    scripting_backend: Option<ScriptingBackend>,
    show_splash: Option<bool>,
}

impl BuildConfiguration {
    /// Original command-line arguments
    pub fn args(&self) -> &ArgumentBag {
        &self.args
    }

    pub fn target(&self) -> BuildTarget {
        self.target
    }

    /// Resolved version, build component replaced by the build number
    pub fn version(&self) -> &BundleVersion {
        &self.version
    }

    pub fn build_number(&self) -> u32 {
        self.build_number
    }

    pub fn defines(&self) -> &ScriptingDefines {
        &self.defines
    }

    pub fn options(&self) -> &PlayerBuildOptions {
        &self.options
    }

    pub fn output_path(&self) -> &Path {
        &self.options.location
    }

    pub fn is_development(&self) -> bool {
        self.options.development
    }

    pub fn embed_bundles(&self) -> bool {
        self.embed_bundles
    }

    pub fn scripting_backend(&self) -> Option<ScriptingBackend> {
        self.scripting_backend
    }

    pub fn show_splash(&self) -> Option<bool> {
        self.show_splash
    }

    pub fn is_verbose(&self) -> bool {
        self.args.is_verbose()
    }
}

/// Outcome of the native build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildOutcome {
    Succeeded,
    Failed,
    Cancelled,
}

impl fmt::Display for BuildOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildOutcome::Succeeded => write!(f, "Succeeded"),
            BuildOutcome::Failed => write!(f, "Failed"),
            BuildOutcome::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// Result of the native build, passed through the pipeline unmodified
#[derive(Debug, Clone, PartialEq)]
pub struct BuildReport {
    pub outcome: BuildOutcome,
    /// Human-readable summary from the engine
    pub summary: String,
    /// Where the player was written
    pub output_path: PathBuf,
    /// Time spent in the native build
    pub duration: Duration,
}

impl BuildReport {
    pub fn succeeded(&self) -> bool {
        self.outcome == BuildOutcome::Succeeded
    }
}

/// Platform-specific builder
///
/// One instance per target, resolved through
/// [`platforms::BuilderProvider`]. Builders hold no mutable state; anything
/// they need (such as a sub-platform) is fixed at construction.
pub trait PlatformBuilder {
    /// Name shown in help output
    fn display_name(&self) -> &str;

    /// Platform-specific arguments
    fn schema(&self) -> ArgumentSchema {
        ArgumentSchema::empty()
    }

    /// Validate platform arguments and apply every present setting
    fn pre_build(
        &self,
        _config: &BuildConfiguration,
        _settings: &mut dyn SettingsStore,
        _log: &dyn BuildLog,
    ) -> Result<()> {
        Ok(())
    }

    /// Run the native build and return its report verbatim
    fn build(
        &self,
        config: &BuildConfiguration,
        engine: &dyn NativePlayerBuild,
        settings: &dyn SettingsStore,
        log: &dyn BuildLog,
    ) -> Result<BuildReport> {
        engine.build_player(config.options(), settings, log)
    }

    /// Inspect the report after the build
    fn post_build(
        &self,
        _report: &BuildReport,
        _config: &BuildConfiguration,
        _log: &dyn BuildLog,
    ) -> Result<()> {
        Ok(())
    }

    /// Display name followed by the schema description
    fn help(&self) -> String {
        let schema = self.schema();
        if schema.is_empty() {
            self.display_name().to_string()
        } else {
            format!("{}\n{}", self.display_name(), schema.describe(2).trim_end())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_target_parse() {
        assert_eq!(BuildTarget::from_arg("android").unwrap(), BuildTarget::Android);
        assert_eq!(BuildTarget::from_arg("WINDOWS64").unwrap(), BuildTarget::Windows64);
        assert_eq!(BuildTarget::from_arg("macos").unwrap(), BuildTarget::Osx);
        assert_eq!(BuildTarget::from_arg("ios").unwrap(), BuildTarget::Ios);

        let err = BuildTarget::from_arg("Amiga").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BuildError>(),
            Some(BuildError::UnknownBuildTarget { raw }) if raw == "Amiga"
        ));
    }

    #[test]
    fn test_build_target_display_round_trips() {
        for target in BuildTarget::all() {
            assert_eq!(BuildTarget::from_arg(&target.to_string()).unwrap(), *target);
        }
    }

    #[test]
    fn test_target_groups() {
        assert_eq!(BuildTarget::Windows.group(), TargetGroup::Standalone);
        assert_eq!(BuildTarget::Linux64.group(), TargetGroup::Standalone);
        assert_eq!(BuildTarget::Android.group(), TargetGroup::Android);
        assert_eq!(TargetGroup::WebGl.to_string(), "WebGL");
    }
}
