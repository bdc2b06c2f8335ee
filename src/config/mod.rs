//! Layered configuration
//!
//! Later layers win: built-in defaults, the per-user file, the repository's
//! `.gitvis.toml`, `GITVIS_*` environment variables, then command-line flags
//! (applied by the binary).

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::alias::AliasScope;
use crate::convention::DEFAULT_SUBJECT_MAX_LEN;
use crate::graph::{RenderOptions, DEFAULT_AUTHOR_WIDTH, DEFAULT_SUBJECT_WIDTH};
use crate::workflow::WorkflowSettings;

/// File name looked up in the repository directory
pub const REPO_CONFIG_FILE: &str = ".gitvis.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    pub fn code(&self) -> u16 {
        use crate::error::ErrorCode;
        match self {
            Self::Read { .. } => ErrorCode::CONFIG_READ_FAILED,
            Self::Parse { .. } => ErrorCode::CONFIG_PARSE_ERROR,
            Self::InvalidValue { .. } => ErrorCode::CONFIG_INVALID_VALUE,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// `Auto` colors only an interactive stdout, and honors `NO_COLOR`
    pub fn enabled(self) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => {
                std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
            }
        }
    }
}

impl std::str::FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(ColorMode::Auto),
            "always" => Ok(ColorMode::Always),
            "never" => Ok(ColorMode::Never),
            _ => Err("expected one of: auto, always, never".to_string()),
        }
    }
}

/// One configuration layer as written on disk; every key optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub remote: Option<String>,
    pub graph_lines: Option<i64>,
    pub subject_max_len: Option<usize>,
    pub author_width: Option<usize>,
    pub subject_width: Option<usize>,
    pub color: Option<ColorMode>,
    pub alias_scope: Option<AliasScope>,
    pub command_timeout_secs: Option<u64>,
}

impl ConfigFile {
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read `path` if it exists
    pub fn read(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded config layer {}", path.display());
        Self::parse(&content, path).map(Some)
    }
}

/// Fully resolved configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    pub remote: String,
    pub graph_lines: i64,
    pub subject_max_len: usize,
    pub author_width: usize,
    pub subject_width: usize,
    pub color: ColorMode,
    pub alias_scope: AliasScope,
    pub command_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            graph_lines: 20,
            subject_max_len: DEFAULT_SUBJECT_MAX_LEN,
            author_width: DEFAULT_AUTHOR_WIDTH,
            subject_width: DEFAULT_SUBJECT_WIDTH,
            color: ColorMode::Auto,
            alias_scope: AliasScope::Global,
            command_timeout_secs: None,
        }
    }
}

/// Per-user config file, if the platform has a config directory
pub fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "gitvis").map(|dirs| dirs.config_dir().join("config.toml"))
}

impl Config {
    /// Defaults, then user file, then `<repo>/.gitvis.toml`, then environment.
    pub fn load(repo: &Path) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(path) = user_config_path() {
            if let Some(layer) = ConfigFile::read(&path)? {
                config.merge(layer);
            }
        }
        if let Some(layer) = ConfigFile::read(&repo.join(REPO_CONFIG_FILE))? {
            config.merge(layer);
        }

        config.merge_env_vars(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn merge(&mut self, layer: ConfigFile) {
        if let Some(remote) = layer.remote {
            self.remote = remote;
        }
        if let Some(lines) = layer.graph_lines {
            self.graph_lines = lines;
        }
        if let Some(len) = layer.subject_max_len {
            self.subject_max_len = len;
        }
        if let Some(width) = layer.author_width {
            self.author_width = width;
        }
        if let Some(width) = layer.subject_width {
            self.subject_width = width;
        }
        if let Some(color) = layer.color {
            self.color = color;
        }
        if let Some(scope) = layer.alias_scope {
            self.alias_scope = scope;
        }
        if let Some(secs) = layer.command_timeout_secs {
            self.command_timeout_secs = Some(secs);
        }
    }

    /// Apply `GITVIS_*` overrides read through `lookup`
    pub fn merge_env_vars<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(remote) = lookup("GITVIS_REMOTE").filter(|r| !r.trim().is_empty()) {
            self.remote = remote.trim().to_string();
        }

        if let Some(lines) = lookup("GITVIS_GRAPH_LINES") {
            self.graph_lines = lines.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "GITVIS_GRAPH_LINES".to_string(),
                value: lines.clone(),
                reason: "expected an integer".to_string(),
            })?;
        }

        if let Some(color) = lookup("GITVIS_COLOR") {
            self.color = color
                .trim()
                .parse()
                .map_err(|reason| ConfigError::InvalidValue {
                    key: "GITVIS_COLOR".to_string(),
                    value: color.clone(),
                    reason,
                })?;
        }

        if let Some(secs) = lookup("GITVIS_TIMEOUT_SECS") {
            let parsed: u64 = secs.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "GITVIS_TIMEOUT_SECS".to_string(),
                value: secs.clone(),
                reason: "expected a whole number of seconds".to_string(),
            })?;
            self.command_timeout_secs = (parsed > 0).then_some(parsed);
        }

        Ok(())
    }

    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_secs.map(Duration::from_secs)
    }

    pub fn workflow_settings(&self) -> WorkflowSettings {
        WorkflowSettings {
            remote: self.remote.clone(),
            graph_lines: self.graph_lines,
            subject_max_len: self.subject_max_len,
            render: RenderOptions {
                author_width: self.author_width,
                subject_width: self.subject_width,
                color: self.color.enabled(),
            },
        }
    }
}
