use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::drag::{DEFAULT_GRID_COLUMNS, DEFAULT_KEYBOARD_STEP};
use crate::editor::EditorOptions;
use crate::ingest::{ImageRef, DEFAULT_PLACEHOLDER};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigPathError {
    #[error("neither XDG_CONFIG_HOME nor HOME is set")]
    MissingHomeDirectory,
}

const APP_DIR: &str = "profile-board";
const APP_CONFIG_FILE: &str = "config.json";

/// Editor settings from `config.json`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub placeholder_image: Option<String>,
    #[serde(default)]
    pub keyboard_step: Option<f32>,
    #[serde(default)]
    pub pointer_activation_distance: Option<f32>,
    #[serde(default)]
    pub grid_columns: Option<usize>,
}

impl AppConfig {
    pub fn placeholder(&self) -> ImageRef {
        ImageRef::placeholder(
            self.placeholder_image
                .as_deref()
                .filter(|token| !token.is_empty())
                .unwrap_or(DEFAULT_PLACEHOLDER),
        )
    }

    pub fn grid_columns(&self) -> usize {
        self.grid_columns
            .filter(|columns| *columns > 0)
            .unwrap_or(DEFAULT_GRID_COLUMNS)
    }

    pub fn editor_options(&self) -> EditorOptions {
        EditorOptions {
            placeholder: self.placeholder(),
            keyboard_step: self
                .keyboard_step
                .filter(|step| step.is_finite() && *step > 0.0)
                .unwrap_or(DEFAULT_KEYBOARD_STEP),
            pointer_activation_distance: self
                .pointer_activation_distance
                .filter(|distance| distance.is_finite())
                .unwrap_or(0.0),
            ..EditorOptions::default()
        }
    }
}

pub fn load_app_config() -> AppConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_app_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_app_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> AppConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(_) => return AppConfig::default(),
    };
    if !path.exists() {
        return AppConfig::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
            AppConfig::default()
        }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            AppConfig::default()
        }
    }
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}
