use async_once_cell::OnceCell;
use directories::ProjectDirs;
use lazy_static::lazy_static;
use serde_derive::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use super::{util, CLI_NAME};

lazy_static! {
    pub static ref SETTINGS: Arc<OnceCell<Settings>> = Arc::new(OnceCell::new());
}

static DEFAULT_DB_FILE: &str = "marquee.db";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Settings global store is uninitialized")]
    Uninitialized,

    #[error("Could not locate program directories")]
    NoProjectDirs,

    #[error("Could not represent path as a string: {0}")]
    Path(PathBuf),

    #[error("Could not parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub db: String,
}

fn project_dirs() -> Result<ProjectDirs, SettingsError> {
    ProjectDirs::from("com", "github", CLI_NAME).ok_or(SettingsError::NoProjectDirs)
}

pub fn load(path: Option<PathBuf>) -> Result<Settings, SettingsError> {
    let path = match path {
        Some(path) => path,
        None => project_dirs()?.config_dir().join("config.toml"),
    };
    tracing::info! {?path, "Loading config file"};
    let content = fs::read_to_string(path).unwrap_or_else(|_| "".to_string());
    let mut set: Settings = toml::from_str(content.as_str())?;
    set = generate_default(set)?;
    tracing::trace! {settings = ?set, "Loaded settings"};
    Ok(set)
}

pub fn generate_default(mut set: Settings) -> Result<Settings, SettingsError> {
    if set.db == String::default() {
        let file = project_dirs()?.data_dir().join(DEFAULT_DB_FILE);
        let path = util::path_to_str(&file).ok_or_else(|| SettingsError::Path(file.clone()))?;
        set.db = format!("sqlite://{}?mode=rwc", path);
    }
    Ok(set)
}

pub fn get_settings() -> Result<&'static Settings, SettingsError> {
    SETTINGS.get().ok_or(SettingsError::Uninitialized)
}
