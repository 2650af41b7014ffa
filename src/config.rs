//! Configuration for badge and classification defaults.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (SEQSTATUS_DECIMALS, SEQSTATUS_FILL, SEQSTATUS_STAGE)
//! 2. Config file (.seqstatus/config.yaml, else the user config directory)
//! 3. Defaults (whole-number scores, no fill, no stage filter)
//!
//! Config file discovery:
//! - Searches current directory and parents for .seqstatus/config.yaml
//! - Falls back to <config_dir>/seqstatus/config.yaml

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::score::DEFAULT_DECIMALS;
use crate::core::{BadgeStateBuilder, FillState};

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

pub const ENV_DECIMALS: &str = "SEQSTATUS_DECIMALS";
pub const ENV_FILL: &str = "SEQSTATUS_FILL";
pub const ENV_STAGE: &str = "SEQSTATUS_STAGE";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub badge: BadgeConfig,
    #[serde(default)]
    pub classify: ClassifyConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BadgeConfig {
    /// Decimal places kept when truncating scores
    pub score_decimals: Option<u32>,
    /// Fill variant used when the caller does not choose one
    pub fill_state: Option<FillState>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassifyConfig {
    /// Stage filter applied to tree classifiers
    pub stage: Option<String>,
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub score_decimals: u32,
    pub fill_state: FillState,
    pub stage: Option<String>,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            score_decimals: DEFAULT_DECIMALS,
            fill_state: FillState::None,
            stage: None,
            config_file: None,
        }
    }
}

impl ResolvedConfig {
    /// Badge builder using the configured precision
    pub fn badge_builder(&self) -> BadgeStateBuilder {
        BadgeStateBuilder::new().with_decimals(self.score_decimals)
    }
}

/// Parse a fill variant case-insensitively ("fill", "BORDER", ...)
pub fn parse_fill_state(value: &str) -> Result<FillState> {
    match value.trim().to_ascii_uppercase().as_str() {
        "FILL" => Ok(FillState::Fill),
        "BORDER" => Ok(FillState::Border),
        "NONE" => Ok(FillState::None),
        other => anyhow::bail!("Unknown fill state '{}' (expected fill, border or none)", other),
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".seqstatus").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    let user_config = dirs::config_dir()?.join("seqstatus").join("config.yaml");
    user_config.exists().then_some(user_config)
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Merge file values and environment over the defaults
fn resolve<F>(file: Option<&ConfigFile>, config_file: Option<PathBuf>, env: F) -> Result<ResolvedConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = ResolvedConfig::default();

    let score_decimals = match env(ENV_DECIMALS) {
        Some(value) => value
            .trim()
            .parse::<u32>()
            .with_context(|| format!("Invalid {}: {}", ENV_DECIMALS, value))?,
        None => file
            .and_then(|f| f.badge.score_decimals)
            .unwrap_or(defaults.score_decimals),
    };

    let fill_state = match env(ENV_FILL) {
        Some(value) => parse_fill_state(&value)?,
        None => file
            .and_then(|f| f.badge.fill_state)
            .unwrap_or(defaults.fill_state),
    };

    let stage = env(ENV_STAGE)
        .or_else(|| file.and_then(|f| f.classify.stage.clone()))
        .filter(|s| !s.is_empty());

    Ok(ResolvedConfig {
        score_decimals,
        fill_state,
        stage,
        config_file,
    })
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let config_file = find_config_file();

    let file = match config_file {
        Some(ref path) => Some(load_config_file(path)?),
        None => None,
    };

    resolve(file.as_ref(), config_file, |key| std::env::var(key).ok())
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}
