//! CLI configuration.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// How command results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

/// Top-level roster configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Output format when `--format` is not given.
    #[serde(default = "default_format")]
    pub default_format: OutputFormat,
    /// Keep running a script after an op fails.
    #[serde(default = "default_true")]
    pub continue_on_error: bool,
    /// Print the final roster table after `apply` (text format only).
    #[serde(default = "default_true")]
    pub show_summary: bool,
    /// Scripts to use when `--script` is not given.
    #[serde(default = "default_script_dir")]
    pub script_dir: PathBuf,
}

fn default_format() -> OutputFormat {
    OutputFormat::Text
}
fn default_true() -> bool {
    true
}
fn default_script_dir() -> PathBuf {
    PathBuf::from("./scripts")
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            default_format: default_format(),
            continue_on_error: true,
            show_summary: true,
            script_dir: default_script_dir(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + len];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + len + 1..];
    }
    result.push_str(rest);
    result
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `roster.toml` in the current directory
/// 2. `~/.config/roster/config.toml`
///
/// `ROSTER_FORMAT` overrides `default_format`.
pub fn load_config_from(path: Option<&Path>) -> Result<RosterConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("roster.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => RosterConfig::default(),
    };

    if let Ok(format) = std::env::var("ROSTER_FORMAT") {
        config.default_format = format
            .parse()
            .map_err(|e: String| anyhow::anyhow!("ROSTER_FORMAT: {}", e))?;
    }

    Ok(config)
}

/// Parse a config document and resolve `${VAR}` references in paths.
pub fn parse_config_str(content: &str) -> Result<RosterConfig> {
    let mut config: RosterConfig = toml::from_str(content)?;
    config.script_dir = PathBuf::from(resolve_env_vars(&config.script_dir.to_string_lossy()));
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("roster"))
}
