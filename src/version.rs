//! Player bundle version parsing
//!
//! Accepts the four-part scheme used by player settings:
//! - "1.2" (major.minor)
//! - "1.2.3" (major.minor.build)
//! - "1.2.3.4" (major.minor.build.revision)
//!
//! The build component is normally overwritten with the CI build number,
//! see [`BundleVersion::with_build`].

use anyhow::{bail, Context, Result};
use std::fmt;

/// A bundle version (major.minor[.build[.revision]])
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundleVersion {
    pub major: u32,
    pub minor: u32,
    pub build: Option<u32>,
    pub revision: Option<u32>,
}

impl BundleVersion {
    /// Parse a version string like "1.2.3"
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() < 2 || parts.len() > 4 {
            bail!(
                "Invalid version format: '{}'. Expected 'major.minor[.build[.revision]]'",
                s
            );
        }

        let component = |idx: usize, label: &str| -> Result<u32> {
            parts[idx]
                .parse::<u32>()
                .with_context(|| format!("Invalid {} version: '{}'", label, parts[idx]))
        };

        let major = component(0, "major")?;
        let minor = component(1, "minor")?;
        let build = if parts.len() > 2 {
            Some(component(2, "build")?)
        } else {
            None
        };
        let revision = if parts.len() > 3 {
            Some(component(3, "revision")?)
        } else {
            None
        };

        Ok(BundleVersion {
            major,
            minor,
            build,
            revision,
        })
    }

    /// Keep major.minor and replace everything after with `build`
    pub fn with_build(&self, build: u32) -> Self {
        BundleVersion {
            major: self.major,
            minor: self.minor,
            build: Some(build),
            revision: None,
        }
    }
}

impl fmt::Display for BundleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if let Some(build) = self.build {
            write!(f, ".{}", build)?;
            if let Some(revision) = self.revision {
                write!(f, ".{}", revision)?;
            }
        }
        Ok(())
    }
}
