//! Runtime configuration, read once from the environment at startup.

use std::env;
use std::path::PathBuf;

pub const HIGHSCORE_ENV: &str = "SPACE_INVADER_HIGHSCORE";
pub const ASSETS_ENV: &str = "SPACE_INVADER_ASSETS";
pub const LOG_ENV: &str = "SPACE_INVADER_LOG";

const DEFAULT_HIGHSCORE_FILE: &str = ".space_invader_highscore";
const DEFAULT_LOG_FILE: &str = ".space_invader.log";
const DEFAULT_ASSET_DIR: &str = "assets";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub high_score_path: PathBuf,
    pub asset_dir: PathBuf,
    pub log_path: PathBuf,
}

impl GameConfig {
    pub fn from_env() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            high_score_path: read_env_path(HIGHSCORE_ENV)
                .unwrap_or_else(|| home.join(DEFAULT_HIGHSCORE_FILE)),
            asset_dir: read_env_path(ASSETS_ENV).unwrap_or_else(|| PathBuf::from(DEFAULT_ASSET_DIR)),
            log_path: read_env_path(LOG_ENV).unwrap_or_else(|| home.join(DEFAULT_LOG_FILE)),
        }
    }
}

/// Unset and empty variables both mean "use the default".
fn read_env_path(name: &str) -> Option<PathBuf> {
    env::var_os(name)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
