use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use serde::Deserialize;

const APP_DIR: &str = "squarecrop";
const APP_CONFIG_FILE: &str = "config.json";

pub(crate) const DEFAULT_MAX_PIXEL_AREA: u64 = 300_000;
pub(crate) const DEFAULT_INPUT_DIR: &str = "input";
pub(crate) const DEFAULT_STAGING_DIR: &str = "staging";
pub(crate) const DEFAULT_OUTPUT_DIR: &str = "output";

/// Application-level settings from `config.json`. Every field is optional;
/// missing or unparsable files fall back to the defaults above.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct AppConfig {
    #[serde(default)]
    pub(crate) max_pixel_area: Option<u64>,
    #[serde(default)]
    pub(crate) resize_filter: Option<ResizeFilter>,
    #[serde(default)]
    pub(crate) input_dir: Option<String>,
    #[serde(default)]
    pub(crate) staging_dir: Option<String>,
    #[serde(default)]
    pub(crate) output_dir: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ResizeFilter {
    Nearest,
    #[default]
    Triangle,
    Catmullrom,
    Lanczos3,
}

impl ResizeFilter {
    pub(crate) fn to_filter_type(self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Triangle => FilterType::Triangle,
            Self::Catmullrom => FilterType::CatmullRom,
            Self::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

pub(crate) fn load_app_config() -> AppConfig {
    let xdg_config_home = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from);
    let home = std::env::var_os("HOME").map(PathBuf::from);
    load_app_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_app_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> AppConfig {
    let Some(path) = app_config_path(xdg_config_home, home) else {
        return AppConfig::default();
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

/// `$XDG_CONFIG_HOME/squarecrop/config.json`, falling back to
/// `~/.config/squarecrop/config.json`. `None` when neither root resolves.
fn app_config_path(xdg_config_home: Option<&Path>, home: Option<&Path>) -> Option<PathBuf> {
    let root = match xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        Some(xdg) => xdg.to_path_buf(),
        None => home?.join(".config"),
    };
    Some(root.join(APP_DIR).join(APP_CONFIG_FILE))
}
