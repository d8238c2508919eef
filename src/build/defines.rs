//! Scripting define symbol sets

use std::collections::BTreeSet;
use std::fmt;

use super::settings::{keys, SettingValue, SettingsStore};
use super::TargetGroup;

pub const DEBUG: &str = "DEBUG";
pub const RELEASE: &str = "RELEASE";

/// Set of compiler define symbols for one target group
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptingDefines {
    symbols: BTreeSet<String>,
}

impl ScriptingDefines {
    /// Parse a `;`-separated symbol string as stored by the engine
    pub fn parse(symbols: &str) -> Self {
        Self {
            symbols: symbols
                .split(';')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Current symbols of `group` in the settings store
    pub fn from_store(store: &dyn SettingsStore, group: TargetGroup) -> Self {
        match store.get(&keys::scripting_defines(group)) {
            Some(SettingValue::Text(symbols)) => Self::parse(&symbols),
            Some(SettingValue::List(symbols)) => Self {
                symbols: symbols.into_iter().collect(),
            },
            _ => Self::default(),
        }
    }

    /// Write the symbols back as the define string of `group`
    pub fn write_to(&self, store: &mut dyn SettingsStore, group: TargetGroup) {
        store.set(
            &keys::scripting_defines(group),
            SettingValue::Text(self.to_string()),
        );
    }

    pub fn add(&mut self, symbol: &str) {
        self.symbols.insert(symbol.to_string());
    }

    pub fn remove(&mut self, symbol: &str) {
        self.symbols.remove(symbol);
    }

    /// Leave exactly one of DEBUG / RELEASE in the set
    pub fn set_debug(&mut self, debug: bool) {
        if debug {
            self.remove(RELEASE);
            self.add(DEBUG);
        } else {
            self.remove(DEBUG);
            self.add(RELEASE);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(String::as_str)
    }
}

impl fmt::Display for ScriptingDefines {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbols: Vec<&str> = self.iter().collect();
        write!(f, "{}", symbols.join(";"))
    }
}
