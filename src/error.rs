//! Error types and helpers for user-friendly error messages
//!
//! Every validation failure in the pipeline is raised as a [`BuildError`]
//! wrapped in `anyhow::Error`, so callers can either bubble it up with `?`
//! or recover the typed variant with `downcast_ref`.

use thiserror::Error;

/// Build pipeline errors with helpful context
#[derive(Error, Debug)]
pub enum BuildError {
    /// A token could not be split into a name and a value
    #[error("Malformed argument '{token}'")]
    MalformedArgument { token: String },

    /// An argument was read without checking that it is present
    #[error("Missing argument '{name}'")]
    MissingArgument { name: String },

    /// One or more required arguments are absent (always the full set)
    #[error("Missing required argument(s): {}", names.join(", "))]
    MissingRequiredArgument {
        names: Vec<String>,
        usage: Option<String>,
    },

    /// An argument is present but its value cannot be interpreted
    #[error("Invalid value '{raw}' for argument '{name}': expected {expected}")]
    InvalidArgumentValue {
        name: String,
        raw: String,
        expected: String,
    },

    /// The build target string does not name a known platform
    #[error("Unknown build target '{raw}'")]
    UnknownBuildTarget { raw: String },

    /// The build target is known but no builder is registered for it
    #[error("No builder registered for build target {target}")]
    UnsupportedBuildTarget { target: String },

    /// The native build step itself could not run
    #[error("Native build failed for {platform} ({status}): {message}")]
    NativeBuildFailure {
        platform: String,
        status: String,
        message: String,
    },

    /// Project configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        hint: Option<String>,
    },
}

impl BuildError {
    /// Create a malformed argument error
    pub fn malformed(token: impl Into<String>) -> Self {
        Self::MalformedArgument {
            token: token.into(),
        }
    }

    /// Create a missing argument error
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingArgument { name: name.into() }
    }

    /// Create a batched missing-required error
    pub fn missing_required(names: Vec<String>, usage: Option<String>) -> Self {
        Self::MissingRequiredArgument { names, usage }
    }

    /// Create an invalid value error
    pub fn invalid_value(
        name: impl Into<String>,
        raw: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidArgumentValue {
            name: name.into(),
            raw: raw.into(),
            expected: expected.into(),
        }
    }

    /// Create a native build failure
    pub fn native_failure(
        platform: impl Into<String>,
        status: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::NativeBuildFailure {
            platform: platform.into(),
            status: status.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            hint: None,
        }
    }

    /// Create a configuration error with a hint
    pub fn config_error_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Hint shown below the error, if any
    pub fn hint(&self) -> Option<String> {
        match self {
            BuildError::MalformedArgument { .. } => Some(hints::argument_syntax().to_string()),
            BuildError::MissingRequiredArgument { usage, .. } => usage.clone(),
            BuildError::UnknownBuildTarget { .. } | BuildError::UnsupportedBuildTarget { .. } => {
                Some(hints::build_targets().to_string())
            }
            BuildError::Config { hint, .. } => hint.clone(),
            BuildError::MissingArgument { .. }
            | BuildError::InvalidArgumentValue { .. }
            | BuildError::NativeBuildFailure { .. } => None,
        }
    }

    /// Display error with formatting and hints
    pub fn display_with_hints(&self) {
        use console::style;

        eprintln!("\n{} {}", style("ERROR:").red().bold(), self);

        if let BuildError::MissingRequiredArgument { names, .. } = self {
            eprintln!("\n{}", style("MISSING:").cyan().bold());
            for name in names {
                eprintln!("  • {}", name);
            }
        }

        if let Some(hint) = self.hint() {
            eprintln!("\n{}\n{}", style("HINT:").yellow().bold(), hint);
        }

        eprintln!();
    }
}

/// Common error hints
pub mod hints {
    /// Hint for token syntax problems
    pub fn argument_syntax() -> &'static str {
        "Arguments are passed as name=value or as a bare name for flags:\n\
         • buildTarget=Android\n\
         • buildVersion=1.2.0\n\
         • debug"
    }

    /// Hint for build target problems
    pub fn build_targets() -> &'static str {
        "Known build targets: Windows, Windows64, OSX, Linux64, Android, iOS, WebGL.\n\
         Builders can be restricted with [targets] enabled = [...] in PlayerBuild.toml.\n\
         Run: playerbuild describe to list the available builders."
    }

    /// Hint for a missing PlayerBuild.toml
    pub fn player_build_toml_not_found() -> &'static str {
        "The file given with --config does not exist.\n\
         Without --config, PlayerBuild.toml is looked up in the current directory\n\
         and its parents; when none is found the built-in defaults are used."
    }

    /// Hint for an invalid PlayerBuild.toml
    pub fn invalid_player_build_toml() -> &'static str {
        "PlayerBuild.toml is invalid. Common issues:\n\
         • Invalid TOML syntax (check quotes, brackets, commas)\n\
         • [defaults] values must be strings\n\
         • Unknown build target names in [targets] or [processors.*]"
    }

    /// Hint for a missing engine executable
    pub fn engine_program() -> &'static str {
        "Set [engine] program in PlayerBuild.toml to the editor executable,\n\
         either as an absolute path or as a name found on PATH.\n\
         Remove the [engine] section to run the pipeline as a dry run."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_required_lists_every_name() {
        let err = BuildError::missing_required(vec!["B".into(), "C".into()], None);
        assert_eq!(err.to_string(), "Missing required argument(s): B, C");
    }

    #[test]
    fn test_invalid_value_message() {
        let err = BuildError::invalid_value("buildNumber", "abc", "an integer");
        assert_eq!(
            err.to_string(),
            "Invalid value 'abc' for argument 'buildNumber': expected an integer"
        );
    }

    #[test]
    fn test_hint_selection() {
        assert!(BuildError::malformed("=x").hint().is_some());
        assert!(BuildError::missing("out").hint().is_none());
        let err = BuildError::missing_required(vec!["out".into()], Some("usage".into()));
        assert_eq!(err.hint().as_deref(), Some("usage"));
    }

    #[test]
    fn test_downcast_through_anyhow() {
        let err: anyhow::Error = BuildError::UnknownBuildTarget { raw: "Amiga".into() }.into();
        assert!(matches!(
            err.downcast_ref::<BuildError>(),
            Some(BuildError::UnknownBuildTarget { raw }) if raw == "Amiga"
        ));
    }
}
