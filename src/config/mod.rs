//! Project configuration (PlayerBuild.toml)

mod player_build_toml;
mod validation;

pub use player_build_toml::PlayerBuildConfig;
