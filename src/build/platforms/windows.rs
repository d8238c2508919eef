//! Windows platform builder
//!
//! Applies the standalone window settings for 32-bit and 64-bit Windows
//! players. The variant is fixed at construction.

use anyhow::Result;
use clap::ValueEnum;

use crate::args::enum_name;
use crate::args::names::standalone;
use crate::args::schema::ArgumentSchema;
use crate::build::log::BuildLog;
use crate::build::settings::{keys, SettingValue, SettingsStore};
use crate::build::{BuildConfiguration, BuildTarget, PlatformBuilder};

/// Standalone window mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FullScreenMode {
    #[value(name = "ExclusiveFullScreen")]
    ExclusiveFullScreen,
    #[value(name = "FullScreenWindow")]
    FullScreenWindow,
    #[value(name = "MaximizedWindow")]
    MaximizedWindow,
    #[value(name = "Windowed")]
    Windowed,
}

/// Windows platform builder
#[derive(Debug, Clone)]
pub struct WindowsBuilder {
    target: BuildTarget,
}

impl WindowsBuilder {
    pub fn new(target: BuildTarget) -> Self {
        Self { target }
    }
}

impl PlatformBuilder for WindowsBuilder {
    fn display_name(&self) -> &str {
        match self.target {
            BuildTarget::Windows64 => "Windows64",
            _ => "Windows",
        }
    }

    fn schema(&self) -> ArgumentSchema {
        standalone::SCHEMA
    }

    fn pre_build(
        &self,
        config: &BuildConfiguration,
        settings: &mut dyn SettingsStore,
        log: &dyn BuildLog,
    ) -> Result<()> {
        let args = config.args();
        args.assert_required(&standalone::SCHEMA, true)?;

        if args.contains(standalone::FULL_SCREEN_MODE) {
            let mode = args.get_as_enum::<FullScreenMode>(standalone::FULL_SCREEN_MODE)?;
            settings.set(
                keys::standalone::FULL_SCREEN_MODE,
                SettingValue::Text(enum_name(&mode)),
            );
        }

        if args.contains(standalone::DEFAULT_SCREEN_WIDTH) {
            let width = args.get_as_int(standalone::DEFAULT_SCREEN_WIDTH)?;
            settings.set(keys::standalone::DEFAULT_SCREEN_WIDTH, SettingValue::Int(width));
        }

        if args.contains(standalone::DEFAULT_SCREEN_HEIGHT) {
            let height = args.get_as_int(standalone::DEFAULT_SCREEN_HEIGHT)?;
            settings.set(keys::standalone::DEFAULT_SCREEN_HEIGHT, SettingValue::Int(height));
        }

        if config.is_verbose() {
            log.log(&format!("{} player settings applied", self.display_name()));
        }

        Ok(())
    }
}
