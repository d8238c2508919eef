//! PlayerBuild.toml validation with actionable hints

use anyhow::Result;

use super::player_build_toml::{parse_targets, PlayerBuildConfig};
use crate::error::{hints, BuildError};

/// Validate the entire configuration
pub fn validate_config(config: &PlayerBuildConfig) -> Result<()> {
    if let Some(engine) = &config.engine {
        if engine.program.trim().is_empty() {
            return Err(BuildError::config_error_with_hint(
                "[engine] program is empty",
                hints::engine_program(),
            )
            .into());
        }
    }

    if let Some(enabled) = &config.targets.enabled {
        if enabled.is_empty() {
            return Err(BuildError::config_error_with_hint(
                "[targets] enabled is empty, no target could be built",
                "Remove [targets] enabled to allow every built-in target.",
            )
            .into());
        }
        parse_targets(enabled)?;
    }

    for name in config.defaults.keys() {
        validate_default_name(name)?;
    }

    if let Some(build_info) = &config.processors.build_info {
        build_info.platforms()?;
    }

    for pattern in &config.project.scenes {
        glob::Pattern::new(pattern).map_err(|e| {
            BuildError::config_error(format!("Invalid scene pattern '{}': {}", pattern, e))
        })?;
    }

    Ok(())
}

/// Default names become `name=value` tokens, so they must parse back
fn validate_default_name(name: &str) -> Result<()> {
    if name.trim().is_empty() || name.contains('=') || name.contains(char::is_whitespace) {
        return Err(BuildError::config_error_with_hint(
            format!("Invalid argument name '{}' in [defaults]", name),
            hints::argument_syntax(),
        )
        .into());
    }
    Ok(())
}
