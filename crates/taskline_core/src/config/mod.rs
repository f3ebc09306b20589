use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const APP_DIR_NAME: &str = "taskline";
const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "TASKLINE_CONFIG_PATH";
const RESET: &str = "\x1b[0m";

/// Colour scheme for command output. `Plain` writes no escape codes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Plain,
    Noir,
    Solarized,
}

impl Theme {
    /// Resolves a user-supplied theme name, accepting a few synonyms.
    pub fn named(raw: &str) -> Option<Self> {
        match canonical_key(raw).as_str() {
            "" | "default" | "plain" | "light" => Some(Self::Plain),
            "noir" | "dark" | "dark_mode" => Some(Self::Noir),
            "solarized" => Some(Self::Solarized),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Plain => "default",
            Self::Noir => "noir",
            Self::Solarized => "solarized",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Self::Plain => Palette::default(),
            Self::Noir => Palette {
                accent: Some("\x1b[38;5;208m"),
                muted: Some("\x1b[38;5;250m"),
            },
            Self::Solarized => Palette {
                accent: Some("\x1b[38;5;37m"),
                muted: Some("\x1b[38;5;245m"),
            },
        }
    }
}

/// Escape codes for the two kinds of output: command results (accent) and
/// listings or help (muted).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Palette {
    accent: Option<&'static str>,
    muted: Option<&'static str>,
}

impl Palette {
    pub fn accent(&self, text: &str) -> String {
        paint(self.accent, text)
    }

    pub fn muted(&self, text: &str) -> String {
        paint(self.muted, text)
    }
}

fn paint(code: Option<&str>, text: &str) -> String {
    match code {
        Some(code) => format!("{code}{text}{RESET}"),
        None => text.to_string(),
    }
}

/// Lowercases and collapses every run of non-alphanumerics to one `_`.
pub fn canonical_key(raw: &str) -> String {
    raw.split(|ch: char| !ch.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding `tasks.json`. Rewritten after a relocation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    /// Keyword substitutions applied to the first word of each command.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub aliases: HashMap<String, String>,
}

impl Config {
    /// The configured theme; unknown names fall back to `Theme::Plain`.
    pub fn theme(&self) -> Theme {
        self.theme
            .as_deref()
            .and_then(Theme::named)
            .unwrap_or_default()
    }

    /// Applies command-line overrides on top of this config.
    pub fn with_overrides(&self, overrides: &ConfigOverrides) -> Self {
        let mut merged = self.clone();
        if let Some(theme) = overrides.theme.as_deref() {
            merged.theme = Some(normalize_theme(theme));
        }
        if let Some(store_dir) = overrides.store_dir.as_ref() {
            merged.store_dir = Some(store_dir.clone());
        }
        merged.aliases.extend(
            overrides
                .aliases
                .iter()
                .map(|(alias, value)| (alias.to_lowercase(), value.clone())),
        );
        merged
    }

    fn normalized(mut self) -> Self {
        self.theme = self.theme.as_deref().map(normalize_theme);
        self.aliases = self
            .aliases
            .into_iter()
            .map(|(alias, value)| (alias.to_lowercase(), value))
            .collect();
        self
    }
}

fn normalize_theme(raw: &str) -> String {
    match Theme::named(raw) {
        Some(theme) => theme.name().to_string(),
        None => {
            warn!(theme = raw, "unknown theme, using default colours");
            canonical_key(raw)
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub store_dir: Option<PathBuf>,
    pub theme: Option<String>,
    pub aliases: HashMap<String, String>,
}

/// Result of reading the config at startup. A broken file still yields a
/// usable default config, with the problem kept in `error` for reporting.
#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub path: Option<PathBuf>,
    pub error: Option<AppError>,
}

/// Per-user directory for the config file and the default store.
pub fn app_dir() -> Result<PathBuf, AppError> {
    let root = if cfg!(windows) {
        env_dir("APPDATA")?
    } else {
        env_dir("HOME")?.join(".config")
    };
    Ok(root.join(APP_DIR_NAME))
}

fn env_dir(var: &str) -> Result<PathBuf, AppError> {
    std::env::var(var)
        .map(PathBuf::from)
        .map_err(|_| AppError::invalid_data(format!("{var} is not set")))
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    Ok(app_dir()?.join(CONFIG_FILE_NAME))
}

pub fn load_config() -> ConfigLoad {
    match config_path() {
        Ok(path) => load_config_at(path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            path: None,
            error: Some(err),
        },
    }
}

fn load_config_at(path: PathBuf) -> ConfigLoad {
    let (config, error) = match read_config(&path) {
        Ok(Some(config)) => (config, None),
        Ok(None) => {
            debug!(path = %path.display(), "no config file, using defaults");
            (Config::default(), None)
        }
        Err(err) => (Config::default(), Some(err)),
    };
    ConfigLoad {
        config,
        path: Some(path),
        error,
    }
}

/// Reads and normalizes the config at `path`. `Ok(None)` when there is no file.
pub fn read_config(path: &Path) -> Result<Option<Config>, AppError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let config: Config = serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })?;
    Ok(Some(config.normalized()))
}

pub fn write_config(path: &Path, config: &Config) -> Result<(), AppError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .map_err(|err| AppError::io(format!("{}: {}", parent.display(), err)))?;
    }

    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))
}
