//! Android platform builder
//!
//! Every Android setting is applied independently and only when its
//! argument is present, with two exceptions:
//! - `useCustomKeystore=true` makes the four signing arguments required and
//!   applies them together; without it they are ignored even if given.
//! - target architectures default to `ARMv7|ARM64` when not specified.
//!
//! The bundle version code always follows the build number.

use anyhow::Result;
use clap::ValueEnum;

use crate::args::names::android;
use crate::args::schema::ArgumentSchema;
use crate::args::{enum_name, FlagEnum, FlagSet};
use crate::build::log::BuildLog;
use crate::build::settings::{keys, SettingValue, SettingsStore};
use crate::build::{BuildConfiguration, PlatformBuilder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PreferredInstallLocation {
    #[value(name = "Auto")]
    Auto,
    #[value(name = "PreferExternal")]
    PreferExternal,
    #[value(name = "ForceInternal")]
    ForceInternal,
}

/// Texture compression subtarget
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TextureSubtarget {
    #[value(name = "Generic")]
    Generic,
    #[value(name = "DXT")]
    Dxt,
    #[value(name = "PVRTC")]
    Pvrtc,
    #[value(name = "ETC")]
    Etc,
    #[value(name = "ETC2")]
    Etc2,
    #[value(name = "ASTC")]
    Astc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BlitType {
    #[value(name = "Always")]
    Always,
    #[value(name = "Never")]
    Never,
    #[value(name = "Auto")]
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SdkVersion {
    #[value(name = "AndroidApiLevelAuto")]
    Auto,
    #[value(name = "AndroidApiLevel22")]
    Api22,
    #[value(name = "AndroidApiLevel23")]
    Api23,
    #[value(name = "AndroidApiLevel24")]
    Api24,
    #[value(name = "AndroidApiLevel25")]
    Api25,
    #[value(name = "AndroidApiLevel26")]
    Api26,
    #[value(name = "AndroidApiLevel27")]
    Api27,
    #[value(name = "AndroidApiLevel28")]
    Api28,
    #[value(name = "AndroidApiLevel29")]
    Api29,
    #[value(name = "AndroidApiLevel30")]
    Api30,
    #[value(name = "AndroidApiLevel31")]
    Api31,
    #[value(name = "AndroidApiLevel32")]
    Api32,
    #[value(name = "AndroidApiLevel33")]
    Api33,
    #[value(name = "AndroidApiLevel34")]
    Api34,
}

/// CPU architectures, combinable with `|`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Architecture {
    #[value(name = "None")]
    None,
    #[value(name = "ARMv7")]
    ArmV7,
    #[value(name = "ARM64")]
    Arm64,
    #[value(name = "X86")]
    X86,
    #[value(name = "X86_64")]
    X86_64,
    #[value(name = "All")]
    All,
}

impl FlagEnum for Architecture {
    fn bits(self) -> u32 {
        match self {
            Architecture::None => 0,
            Architecture::ArmV7 => 1,
            Architecture::Arm64 => 2,
            Architecture::X86 => 4,
            Architecture::X86_64 => 8,
            Architecture::All => 0xFFFF_FFFF,
        }
    }
}

/// Architectures used when `targetArchitectures` is absent
pub fn default_architectures() -> FlagSet<Architecture> {
    FlagSet::from_members(&[Architecture::ArmV7, Architecture::Arm64])
}

/// Boolean switches: argument name → setting key
const BOOLEAN_SETTINGS: &[(&str, &str)] = &[
    (
        android::BUILD_APK_PER_CPU_ARCHITECTURE,
        keys::android::BUILD_APK_PER_CPU_ARCHITECTURE,
    ),
    (
        android::DISABLE_DEPTH_AND_STENCIL_BUFFERS,
        keys::android::DISABLE_DEPTH_AND_STENCIL_BUFFERS,
    ),
    (
        android::FORCE_SD_CARD_PERMISSION,
        keys::android::FORCE_SD_CARD_PERMISSION,
    ),
    (
        android::FORCE_INTERNET_PERMISSION,
        keys::android::FORCE_INTERNET_PERMISSION,
    ),
    (android::IS_GAME, keys::android::IS_GAME),
    (
        android::USE_APK_EXPANSION_FILES,
        keys::android::USE_APK_EXPANSION_FILES,
    ),
];

/// Android platform builder
#[derive(Debug, Clone, Default)]
pub struct AndroidBuilder;

impl AndroidBuilder {
    pub fn new() -> Self {
        Self
    }

    fn apply_keystore(
        &self,
        config: &BuildConfiguration,
        settings: &mut dyn SettingsStore,
        log: &dyn BuildLog,
    ) -> Result<()> {
        let args = config.args();
        if !args.contains(android::USE_CUSTOM_KEYSTORE)
            || !args.get_as_bool(android::USE_CUSTOM_KEYSTORE)?
        {
            if args.contains(android::KEYSTORE_NAME) {
                log.warn("keystore credentials ignored without useCustomKeystore=true");
            }
            return Ok(());
        }

        args.assert_keys(&[
            android::KEYSTORE_NAME,
            android::KEYSTORE_PASS,
            android::KEYALIAS_NAME,
            android::KEYALIAS_PASS,
        ])?;

        settings.set(keys::android::USE_CUSTOM_KEYSTORE, SettingValue::Bool(true));
        for (arg, key) in [
            (android::KEYSTORE_NAME, keys::android::KEYSTORE_NAME),
            (android::KEYSTORE_PASS, keys::android::KEYSTORE_PASS),
            (android::KEYALIAS_NAME, keys::android::KEYALIAS_NAME),
            (android::KEYALIAS_PASS, keys::android::KEYALIAS_PASS),
        ] {
            settings.set(key, SettingValue::Text(args.get(arg)?.to_string()));
        }
        Ok(())
    }

    fn apply_enum<E: ValueEnum>(
        &self,
        config: &BuildConfiguration,
        settings: &mut dyn SettingsStore,
        arg: &str,
        key: &str,
    ) -> Result<()> {
        let args = config.args();
        if args.contains(arg) {
            let value = args.get_as_enum::<E>(arg)?;
            settings.set(key, SettingValue::Text(enum_name(&value)));
        }
        Ok(())
    }
}

impl PlatformBuilder for AndroidBuilder {
    fn display_name(&self) -> &str {
        "Android"
    }

    fn schema(&self) -> ArgumentSchema {
        android::SCHEMA
    }

    fn pre_build(
        &self,
        config: &BuildConfiguration,
        settings: &mut dyn SettingsStore,
        log: &dyn BuildLog,
    ) -> Result<()> {
        let args = config.args();
        args.assert_required(&android::SCHEMA, true)?;

        self.apply_keystore(config, settings, log)?;

        self.apply_enum::<PreferredInstallLocation>(
            config,
            settings,
            android::PREFERRED_INSTALL_LOCATION,
            keys::android::PREFERRED_INSTALL_LOCATION,
        )?;
        self.apply_enum::<TextureSubtarget>(
            config,
            settings,
            android::BUILD_SUBTARGET,
            keys::android::BUILD_SUBTARGET,
        )?;
        self.apply_enum::<BlitType>(
            config,
            settings,
            android::BLIT_TYPE,
            keys::android::BLIT_TYPE,
        )?;
        self.apply_enum::<SdkVersion>(
            config,
            settings,
            android::TARGET_SDK_VERSION,
            keys::android::TARGET_SDK_VERSION,
        )?;
        self.apply_enum::<SdkVersion>(
            config,
            settings,
            android::MIN_SDK_VERSION,
            keys::android::MIN_SDK_VERSION,
        )?;

        if args.contains(android::MAX_ASPECT_RATIO) {
            let ratio = args.get_as_float(android::MAX_ASPECT_RATIO)?;
            settings.set(keys::android::MAX_ASPECT_RATIO, SettingValue::Float(ratio));
        }

        let architectures = if args.contains(android::TARGET_ARCHITECTURES) {
            args.get_as_flags::<Architecture>(android::TARGET_ARCHITECTURES)?
        } else {
            default_architectures()
        };
        settings.set(
            keys::android::TARGET_ARCHITECTURES,
            SettingValue::Text(architectures.to_string()),
        );

        for (arg, key) in BOOLEAN_SETTINGS {
            if args.contains(arg) {
                settings.set(key, SettingValue::Bool(args.get_as_bool(arg)?));
            }
        }

        settings.set(
            keys::android::BUNDLE_VERSION_CODE,
            SettingValue::Int(i64::from(config.build_number())),
        );

        if config.is_verbose() {
            log.log(&format!(
                "Android player settings applied (architectures: {})",
                architectures
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::ArgumentBag;
    use crate::build::configure::configure;
    use crate::build::log::MemoryLog;
    use crate::build::settings::MemorySettings;
    use crate::error::BuildError;
    use std::sync::Arc;

    fn config(extra: &[&str]) -> BuildConfiguration {
        let mut tokens = vec![
            "buildTarget=Android",
            "buildVersion=2.3.0",
            "buildNumber=57",
            "out=out/game.apk",
        ];
        tokens.extend_from_slice(extra);
        let args = Arc::new(ArgumentBag::parse(tokens).unwrap());
        configure(args, &[], &MemorySettings::new()).unwrap()
    }

    fn pre_build(extra: &[&str]) -> Result<MemorySettings> {
        let mut store = MemorySettings::new();
        AndroidBuilder::new().pre_build(&config(extra), &mut store, &MemoryLog::new())?;
        Ok(store)
    }

    #[test]
    fn test_defaults_only() {
        let store = pre_build(&[]).unwrap();
        assert_eq!(
            store.writes(),
            [
                keys::android::TARGET_ARCHITECTURES,
                keys::android::BUNDLE_VERSION_CODE
            ]
        );
        assert_eq!(
            store.get(keys::android::TARGET_ARCHITECTURES),
            Some(SettingValue::Text("ARMv7|ARM64".into()))
        );
        assert_eq!(
            store.get(keys::android::BUNDLE_VERSION_CODE),
            Some(SettingValue::Int(57))
        );
    }

    #[test]
    fn test_keystore_applied_together() {
        let store = pre_build(&[
            "useCustomKeystore",
            "keystoreName=user.keystore",
            "keystorePass=secret",
            "keyaliasName=release",
            "keyaliasPass=secret2",
        ])
        .unwrap();
        assert_eq!(
            store.get(keys::android::USE_CUSTOM_KEYSTORE),
            Some(SettingValue::Bool(true))
        );
        assert_eq!(
            store.get(keys::android::KEYSTORE_NAME),
            Some(SettingValue::Text("user.keystore".into()))
        );
        assert_eq!(
            store.get(keys::android::KEYALIAS_PASS),
            Some(SettingValue::Text("secret2".into()))
        );
    }

    #[test]
    fn test_keystore_requires_all_credentials() {
        let err = pre_build(&["useCustomKeystore=true", "keystoreName=user.keystore"]).unwrap_err();
        match err.downcast_ref::<BuildError>() {
            Some(BuildError::MissingRequiredArgument { names, .. }) => {
                assert_eq!(names, &vec!["keystorePass", "keyaliasName", "keyaliasPass"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_keystore_credentials_ignored_without_toggle() {
        let store = pre_build(&["useCustomKeystore=false", "keystoreName=user.keystore"]).unwrap();
        assert!(store.get(keys::android::KEYSTORE_NAME).is_none());
        assert!(store.get(keys::android::USE_CUSTOM_KEYSTORE).is_none());

        let log = MemoryLog::new();
        let mut store = MemorySettings::new();
        AndroidBuilder::new()
            .pre_build(&config(&["keystoreName=user.keystore"]), &mut store, &log)
            .unwrap();
        assert!(store.get(keys::android::KEYSTORE_NAME).is_none());
        assert_eq!(
            log.lines(),
            vec!["warning: keystore credentials ignored without useCustomKeystore=true"]
        );
    }

    #[test]
    fn test_enum_float_and_flag_settings() {
        let store = pre_build(&[
            "preferredInstallLocation=preferexternal",
            "androidBuildSubtarget=ASTC",
            "blitType=Never",
            "targetSdkVersion=AndroidApiLevel33",
            "minSdkVersion=androidapilevel24",
            "maxAspectRatio=2.1",
            "targetArchitectures=ARM64|X86_64",
            "androidIsGame=false",
            "forceInternetPermission",
        ])
        .unwrap();

        assert_eq!(
            store.get(keys::android::PREFERRED_INSTALL_LOCATION),
            Some(SettingValue::Text("PreferExternal".into()))
        );
        assert_eq!(
            store.get(keys::android::BUILD_SUBTARGET),
            Some(SettingValue::Text("ASTC".into()))
        );
        assert_eq!(
            store.get(keys::android::BLIT_TYPE),
            Some(SettingValue::Text("Never".into()))
        );
        assert_eq!(
            store.get(keys::android::MIN_SDK_VERSION),
            Some(SettingValue::Text("AndroidApiLevel24".into()))
        );
        assert_eq!(
            store.get(keys::android::MAX_ASPECT_RATIO),
            Some(SettingValue::Float(2.1))
        );
        assert_eq!(
            store.get(keys::android::TARGET_ARCHITECTURES),
            Some(SettingValue::Text("ARM64|X86_64".into()))
        );
        assert_eq!(store.get(keys::android::IS_GAME), Some(SettingValue::Bool(false)));
        assert_eq!(
            store.get(keys::android::FORCE_INTERNET_PERMISSION),
            Some(SettingValue::Bool(true))
        );
        assert!(store.get(keys::android::USE_APK_EXPANSION_FILES).is_none());
    }

    #[test]
    fn test_all_architectures() {
        let store = pre_build(&["targetArchitectures=All"]).unwrap();
        assert_eq!(
            store.get(keys::android::TARGET_ARCHITECTURES),
            Some(SettingValue::Text("ARMv7|ARM64|X86|X86_64".into()))
        );
    }

    #[test]
    fn test_unknown_architecture_fails() {
        let err = pre_build(&["targetArchitectures=ARM64|MIPS"]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BuildError>(),
            Some(BuildError::InvalidArgumentValue { name, .. }) if name == "targetArchitectures"
        ));
    }
}
