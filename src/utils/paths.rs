//! Path utilities

use std::path::{Path, PathBuf};

/// Project configuration file name
pub const CONFIG_FILE_NAME: &str = "PlayerBuild.toml";

/// Find the nearest PlayerBuild.toml, starting at `start` and walking up
pub fn find_config_from(start: &Path) -> Option<PathBuf> {
    let mut dir = start;
    loop {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }

        dir = dir.parent()?;
    }
}

/// Directory the build info file goes into for a player output location
///
/// Locations with an extension (`game.exe`, `game.apk`) are files, so their
/// parent directory is used; anything else is treated as a directory.
pub fn output_dir(location: &Path) -> PathBuf {
    if location.extension().is_some() {
        location
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    } else {
        location.to_path_buf()
    }
}
