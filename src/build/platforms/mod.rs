//! Platform-specific builders
//!
//! Each supported target maps to exactly one builder implementing
//! [`PlatformBuilder`]:
//!
//! - **Windows / Windows64**: `WindowsBuilder`, standalone window settings
//! - **Android**: `AndroidBuilder`, signing, SDK levels, architectures
//! - **OSX, Linux64, iOS, WebGL**: `DefaultBuilder`, native build only
//!
//! Builders are looked up through a [`BuilderProvider`], so the set of
//! available targets can be narrowed per project.

pub mod android;
pub mod windows;

use std::collections::BTreeMap;

use anyhow::Result;

use super::{BuildTarget, PlatformBuilder};
use crate::error::BuildError;

/// Resolves the builder for a target
pub trait BuilderProvider {
    /// Builder for `target`, or `UnsupportedBuildTarget`
    fn get(&self, target: BuildTarget) -> Result<&dyn PlatformBuilder>;

    /// Targets that resolve, in a stable order
    fn available_targets(&self) -> Vec<BuildTarget>;
}

/// Get the built-in builder for the target
pub fn get_builder(target: BuildTarget) -> Box<dyn PlatformBuilder> {
    match target {
        BuildTarget::Windows | BuildTarget::Windows64 => {
            Box::new(windows::WindowsBuilder::new(target))
        }
        BuildTarget::Android => Box::new(android::AndroidBuilder::new()),
        BuildTarget::Osx => Box::new(DefaultBuilder::new("OSX")),
        BuildTarget::Linux64 => Box::new(DefaultBuilder::new("Linux64")),
        BuildTarget::Ios => Box::new(DefaultBuilder::new("iOS")),
        BuildTarget::WebGl => Box::new(DefaultBuilder::new("WebGL")),
    }
}

/// Provider backed by a target → builder map
#[derive(Default)]
pub struct PlatformBuilders {
    builders: BTreeMap<BuildTarget, Box<dyn PlatformBuilder>>,
}

impl PlatformBuilders {
    /// Provider with no builders
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider with the built-in builder of every target
    pub fn with_defaults() -> Self {
        Self::only(BuildTarget::all().iter().copied())
    }

    /// Provider with the built-in builders of `targets` only
    pub fn only(targets: impl IntoIterator<Item = BuildTarget>) -> Self {
        let mut provider = Self::new();
        for target in targets {
            provider.insert(target, get_builder(target));
        }
        provider
    }

    /// Register (or replace) the builder of `target`
    pub fn insert(&mut self, target: BuildTarget, builder: Box<dyn PlatformBuilder>) {
        self.builders.insert(target, builder);
    }
}

impl BuilderProvider for PlatformBuilders {
    fn get(&self, target: BuildTarget) -> Result<&dyn PlatformBuilder> {
        self.builders
            .get(&target)
            .map(|b| b.as_ref())
            .ok_or_else(|| {
                BuildError::UnsupportedBuildTarget {
                    target: target.to_string(),
                }
                .into()
            })
    }

    fn available_targets(&self) -> Vec<BuildTarget> {
        self.builders.keys().copied().collect()
    }
}

/// Builder for targets without platform settings
#[derive(Debug, Clone)]
pub struct DefaultBuilder {
    name: &'static str,
}

impl DefaultBuilder {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl PlatformBuilder for DefaultBuilder {
    fn display_name(&self) -> &str {
        self.name
    }
}
