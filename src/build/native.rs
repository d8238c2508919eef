//! Native player build backends
//!
//! The pipeline never builds a player itself. It hands the resolved
//! [`PlayerBuildOptions`] and the settings store to a [`NativePlayerBuild`]
//! and passes the returned [`BuildReport`] through unmodified.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use anyhow::Result;

use super::log::BuildLog;
use super::settings::{write_settings_json, SettingsStore};
use super::{BuildOutcome, BuildReport, PlayerBuildOptions};
use crate::error::{hints, BuildError};
use crate::exec::subprocess::{resolve_program, run_command};
use crate::utils::terminal::create_spinner;

/// Lines of engine output kept in a failure summary
const SUMMARY_LINES: usize = 20;

/// Distinguishes settings exports of builds within one process
static EXPORT_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// The engine's player build routine
pub trait NativePlayerBuild {
    fn build_player(
        &self,
        options: &PlayerBuildOptions,
        settings: &dyn SettingsStore,
        log: &dyn BuildLog,
    ) -> Result<BuildReport>;
}

/// Backend used when no engine is configured: runs nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunEngine;

impl NativePlayerBuild for DryRunEngine {
    fn build_player(
        &self,
        options: &PlayerBuildOptions,
        settings: &dyn SettingsStore,
        log: &dyn BuildLog,
    ) -> Result<BuildReport> {
        log.log(&format!(
            "dry run: would build {} player to {} ({} scene(s), {} setting(s))",
            options.target,
            options.location.display(),
            options.scenes.len(),
            settings.snapshot().len()
        ));

        Ok(BuildReport {
            outcome: BuildOutcome::Succeeded,
            summary: "dry run, no engine configured".to_string(),
            output_path: options.location.clone(),
            duration: Duration::ZERO,
        })
    }
}

/// Backend that runs the engine executable in batch mode
#[derive(Debug, Clone)]
pub struct ExternalEngine {
    program: PathBuf,
    args: Vec<String>,
    verbose: bool,
}

impl ExternalEngine {
    /// Resolve `program` (a path or a name on PATH)
    pub fn new(program: &str, args: Vec<String>, verbose: bool) -> Result<Self> {
        let program = resolve_program(program).ok_or_else(|| {
            BuildError::config_error_with_hint(
                format!("Engine program '{}' not found", program),
                hints::engine_program(),
            )
        })?;

        Ok(Self {
            program,
            args,
            verbose,
        })
    }

    /// Full argument list for one build
    fn command_args(&self, options: &PlayerBuildOptions, settings_path: &Path) -> Vec<String> {
        let mut args = self.args.clone();
        args.push("-buildTarget".to_string());
        args.push(options.target.to_string());
        args.push("-locationPathName".to_string());
        args.push(options.location.display().to_string());
        args.push("-playerSettings".to_string());
        args.push(settings_path.display().to_string());
        if !options.scenes.is_empty() {
            args.push("-scenes".to_string());
            args.push(options.scenes.join(";"));
        }
        if options.development {
            args.push("-development".to_string());
        }
        args
    }
}

impl NativePlayerBuild for ExternalEngine {
    fn build_player(
        &self,
        options: &PlayerBuildOptions,
        settings: &dyn SettingsStore,
        log: &dyn BuildLog,
    ) -> Result<BuildReport> {
        let settings_path = std::env::temp_dir().join(format!(
            "playerbuild-{}-{}-settings.json",
            std::process::id(),
            EXPORT_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        write_settings_json(&settings.snapshot(), &settings_path)?;

        let args = self.command_args(options, &settings_path);
        if self.verbose {
            log.log(&format!("{} {}", self.program.display(), args.join(" ")));
        }

        let start = Instant::now();
        let spinner = (!self.verbose)
            .then(|| create_spinner(&format!("Building {} player...", options.target)));
        let result = run_command(&self.program, &args, self.verbose);
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
        if let Err(e) = std::fs::remove_file(&settings_path) {
            if self.verbose {
                log.warn(&format!(
                    "Failed to remove {}: {}",
                    settings_path.display(),
                    e
                ));
            }
        }

        let result = result.map_err(|e| {
            BuildError::native_failure(
                options.target.to_string(),
                "not started",
                format!("{:#}", e),
            )
        })?;

        let (outcome, summary) = match result.exit_code {
            _ if result.success => (
                BuildOutcome::Succeeded,
                format!("engine finished in {:.2}s", start.elapsed().as_secs_f64()),
            ),
            Some(code) => (
                BuildOutcome::Failed,
                format!("engine exited with code {}\n{}", code, result.tail(SUMMARY_LINES)),
            ),
            None => (
                BuildOutcome::Cancelled,
                "engine was terminated before finishing".to_string(),
            ),
        };

        Ok(BuildReport {
            outcome,
            summary: summary.trim_end().to_string(),
            output_path: options.location.clone(),
            duration: result.duration,
        })
    }
}
