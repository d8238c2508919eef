//! Engine settings store
//!
//! Builders and processors never touch engine state directly; they write
//! named values into a [`SettingsStore`]. The store is the only shared
//! mutable resource of a build and is exported to the native engine when
//! the player is built.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One engine setting value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<String>),
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(v) => write!(f, "{}", v),
            SettingValue::Int(v) => write!(f, "{}", v),
            SettingValue::Float(v) => write!(f, "{}", v),
            SettingValue::Text(v) => write!(f, "{}", v),
            SettingValue::List(v) => write!(f, "{}", v.join(";")),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(v: bool) -> Self {
        SettingValue::Bool(v)
    }
}

impl From<i64> for SettingValue {
    fn from(v: i64) -> Self {
        SettingValue::Int(v)
    }
}

impl From<f64> for SettingValue {
    fn from(v: f64) -> Self {
        SettingValue::Float(v)
    }
}

impl From<&str> for SettingValue {
    fn from(v: &str) -> Self {
        SettingValue::Text(v.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(v: String) -> Self {
        SettingValue::Text(v)
    }
}

/// Read/write access to engine settings
pub trait SettingsStore {
    /// Current value of `key`, if set
    fn get(&self, key: &str) -> Option<SettingValue>;

    /// Overwrite `key`
    fn set(&mut self, key: &str, value: SettingValue);

    /// Every setting, for export to the native build
    fn snapshot(&self) -> BTreeMap<String, SettingValue>;
}

/// In-memory settings store, optionally backed by a JSON file
///
/// Every write is also recorded in order, so callers can see exactly which
/// settings a build touched.
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    values: BTreeMap<String, SettingValue>,
    writes: Vec<String>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a JSON object file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        let values: BTreeMap<String, SettingValue> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))?;
        Ok(Self {
            values,
            writes: Vec::new(),
        })
    }

    /// Save every setting as a pretty-printed JSON object
    pub fn save(&self, path: &Path) -> Result<()> {
        write_settings_json(&self.values, path)
    }

    /// Keys written since the store was created, in write order
    pub fn writes(&self) -> &[String] {
        &self.writes
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<SettingValue> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: SettingValue) {
        self.writes.push(key.to_string());
        self.values.insert(key.to_string(), value);
    }

    fn snapshot(&self) -> BTreeMap<String, SettingValue> {
        self.values.clone()
    }
}

/// Write a settings map to `path`, creating parent directories
pub fn write_settings_json(values: &BTreeMap<String, SettingValue>, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(values).context("Failed to serialize settings")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write settings to {}", path.display()))
}

/// Setting keys written by the pipeline
pub mod keys {
    use crate::build::TargetGroup;

    pub const BUNDLE_VERSION: &str = "PlayerSettings.bundleVersion";
    pub const SPLASH_SCREEN_SHOW: &str = "PlayerSettings.SplashScreen.show";

    pub fn scripting_defines(group: TargetGroup) -> String {
        format!("PlayerSettings.scriptingDefineSymbols.{}", group)
    }

    pub fn scripting_backend(group: TargetGroup) -> String {
        format!("PlayerSettings.scriptingBackend.{}", group)
    }

    pub mod standalone {
        pub const FULL_SCREEN_MODE: &str = "PlayerSettings.fullScreenMode";
        pub const DEFAULT_SCREEN_WIDTH: &str = "PlayerSettings.defaultScreenWidth";
        pub const DEFAULT_SCREEN_HEIGHT: &str = "PlayerSettings.defaultScreenHeight";
    }

    pub mod android {
        pub const USE_CUSTOM_KEYSTORE: &str = "PlayerSettings.Android.useCustomKeystore";
        pub const KEYSTORE_NAME: &str = "PlayerSettings.Android.keystoreName";
        pub const KEYSTORE_PASS: &str = "PlayerSettings.Android.keystorePass";
        pub const KEYALIAS_NAME: &str = "PlayerSettings.Android.keyaliasName";
        pub const KEYALIAS_PASS: &str = "PlayerSettings.Android.keyaliasPass";
        pub const PREFERRED_INSTALL_LOCATION: &str =
            "PlayerSettings.Android.preferredInstallLocation";
        pub const BUILD_SUBTARGET: &str = "EditorUserBuildSettings.androidBuildSubtarget";
        pub const BLIT_TYPE: &str = "PlayerSettings.Android.blitType";
        pub const TARGET_SDK_VERSION: &str = "PlayerSettings.Android.targetSdkVersion";
        pub const MIN_SDK_VERSION: &str = "PlayerSettings.Android.minSdkVersion";
        pub const MAX_ASPECT_RATIO: &str = "PlayerSettings.Android.maxAspectRatio";
        pub const TARGET_ARCHITECTURES: &str = "PlayerSettings.Android.targetArchitectures";
        pub const BUILD_APK_PER_CPU_ARCHITECTURE: &str =
            "PlayerSettings.Android.buildApkPerCpuArchitecture";
        pub const DISABLE_DEPTH_AND_STENCIL_BUFFERS: &str =
            "PlayerSettings.Android.disableDepthAndStencilBuffers";
        pub const FORCE_SD_CARD_PERMISSION: &str = "PlayerSettings.Android.forceSDCardPermission";
        pub const FORCE_INTERNET_PERMISSION: &str =
            "PlayerSettings.Android.forceInternetPermission";
        pub const IS_GAME: &str = "PlayerSettings.Android.androidIsGame";
        pub const USE_APK_EXPANSION_FILES: &str = "PlayerSettings.Android.useAPKExpansionFiles";
        pub const BUNDLE_VERSION_CODE: &str = "PlayerSettings.Android.bundleVersionCode";
    }
}
