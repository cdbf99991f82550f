//! Configuration for the goban trainer
//!
//! Handles data directory configuration with the following precedence:
//! 1. GOBAN_TRAINER_DATA_DIR environment variable
//! 2. ~/.config/goban-trainer/data (production default)
//! 3. ./data (fallback for development)
//!
//! The player focus of the repertoire comes from GOBAN_TRAINER_PLAYER_FOCUS
//! (`black`, `white` or `both`) and defaults to both colors.

use std::path::{Path, PathBuf};

use goban::{BoardError, Sign};

use crate::repertoire::RepertoireConfig;

pub const DATA_DIR_ENV: &str = "GOBAN_TRAINER_DATA_DIR";
pub const PLAYER_FOCUS_ENV: &str = "GOBAN_TRAINER_PLAYER_FOCUS";

const DEFAULT_CONFIG_DIR: &str = ".config/goban-trainer/data";
const DEV_DATA_DIR: &str = "./data";
const DATABASE_FILE: &str = "repertoire.db";

/// Get the data directory for persistence.
pub fn get_data_dir() -> PathBuf {
    data_dir_from(|key| std::env::var(key).ok())
}

fn data_dir_from(var: impl Fn(&str) -> Option<String>) -> PathBuf {
    if let Some(dir) = var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = var("HOME") {
        return PathBuf::from(home).join(DEFAULT_CONFIG_DIR);
    }

    PathBuf::from(DEV_DATA_DIR)
}

/// The repertoire database inside `data_dir`.
pub fn database_path(data_dir: &Path) -> PathBuf {
    data_dir.join(DATABASE_FILE)
}

/// Repertoire settings from the environment. An unset focus trains both colors.
pub fn repertoire_config_from_env() -> Result<RepertoireConfig, BoardError> {
    repertoire_config_from(std::env::var(PLAYER_FOCUS_ENV).ok().as_deref())
}

fn repertoire_config_from(focus: Option<&str>) -> Result<RepertoireConfig, BoardError> {
    let player_focus = match focus {
        Some(value) => value.trim().parse()?,
        None => Sign::Empty,
    };
    Ok(RepertoireConfig { player_focus })
}
