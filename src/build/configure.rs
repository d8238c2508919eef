//! Build configuration construction
//!
//! Each step fails fast with an error naming the offending argument:
//!
//! 1. required common arguments (all missing names reported together)
//! 2. build target
//! 3. version, with its build component replaced by `buildNumber`
//! 4. define set: current symbols, `addDefines`/`removeDefines`, then
//!    exactly one of DEBUG/RELEASE
//! 5. optional overrides, only when their argument is present
//! 6. the immutable [`BuildConfiguration`]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use super::defines::ScriptingDefines;
use super::settings::{keys, SettingValue, SettingsStore};
use super::{BuildConfiguration, BuildTarget, PlayerBuildOptions, ScriptingBackend};
use crate::args::names::common;
use crate::args::{enum_name, ArgumentBag};
use crate::error::BuildError;
use crate::version::BundleVersion;

/// Resolve a [`BuildConfiguration`] from validated arguments
///
/// `settings` is only read here (for the current define symbols); nothing is
/// written until [`apply_common_settings`].
pub fn configure(
    args: Arc<ArgumentBag>,
    scenes: &[String],
    settings: &dyn SettingsStore,
) -> Result<BuildConfiguration> {
    args.assert_required(&common::SCHEMA, true)?;

    let target = BuildTarget::from_arg(args.get(common::BUILD_TARGET)?)?;

    let raw_version = args.get(common::BUILD_VERSION)?;
    let version = BundleVersion::parse(raw_version).map_err(|_| {
        BuildError::invalid_value(
            common::BUILD_VERSION,
            raw_version,
            "a version like major.minor[.patch]",
        )
    })?;

    let build_number = parse_build_number(&args)?;
    let version = version.with_build(build_number);

    let raw_out = args.get(common::OUT)?;
    if raw_out.trim().is_empty() {
        return Err(BuildError::invalid_value(common::OUT, raw_out, "a non-empty path").into());
    }

    let debug = args.contains(common::DEBUG);
    let mut defines = ScriptingDefines::from_store(settings, target.group());
    if args.contains(common::ADD_DEFINES) {
        for symbol in args.get_as_list(common::ADD_DEFINES)? {
            defines.add(&symbol);
        }
    }
    if args.contains(common::REMOVE_DEFINES) {
        for symbol in args.get_as_list(common::REMOVE_DEFINES)? {
            defines.remove(&symbol);
        }
    }
    defines.set_debug(debug);

    let scripting_backend = if args.contains(common::SCRIPTING_BACKEND) {
        Some(args.get_as_enum::<ScriptingBackend>(common::SCRIPTING_BACKEND)?)
    } else {
        None
    };

    let show_splash = if args.contains(common::SHOW_SPLASH) {
        Some(args.get_as_bool(common::SHOW_SPLASH)?)
    } else {
        None
    };

    let embed_bundles = args.contains(common::EMBED_BUNDLES);

    let options = PlayerBuildOptions {
        target,
        scenes: scenes.to_vec(),
        location: PathBuf::from(raw_out),
        development: debug,
    };

    Ok(BuildConfiguration {
        args,
        target,
        version,
        build_number,
        defines,
        options,
        embed_bundles,
        scripting_backend,
        show_splash,
    })
}

fn parse_build_number(args: &ArgumentBag) -> Result<u32> {
    let value = args.get_as_int(common::BUILD_NUMBER)?;
    u32::try_from(value).map_err(|_| {
        let raw = args.value(common::BUILD_NUMBER).unwrap_or_default();
        BuildError::invalid_value(common::BUILD_NUMBER, raw, "a non-negative integer").into()
    })
}

/// Write the pipeline-wide settings of `config` into the store
pub fn apply_common_settings(config: &BuildConfiguration, settings: &mut dyn SettingsStore) {
    let group = config.target().group();

    settings.set(
        keys::BUNDLE_VERSION,
        SettingValue::Text(config.version().to_string()),
    );
    config.defines().write_to(settings, group);

    if let Some(backend) = config.scripting_backend() {
        settings.set(
            &keys::scripting_backend(group),
            SettingValue::Text(enum_name(&backend)),
        );
    }

    if let Some(show) = config.show_splash() {
        settings.set(keys::SPLASH_SCREEN_SHOW, SettingValue::Bool(show));
    }
}
