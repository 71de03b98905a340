//! TOML settings for the `reschedule` CLI.
//!
//! ```toml
//! data_dir = "calendars"
//! timezone = "Europe/Stockholm"
//! strategy = "adjacent-sweep"
//! user_id = 1
//!
//! [priorities]
//! work_related = 500
//! social = 400
//!
//! [users.7]
//! exercise = 450
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono_tz::Tz;
use consolidation_engine::{ActivityType, PriorityTable, ResolutionStrategy, UserPriorities};
use serde::Deserialize;

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "reschedule.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Directory holding the three calendar JSON files.
    pub data_dir: PathBuf,
    /// IANA timezone used for timestamps written without an offset.
    pub timezone: String,
    pub strategy: ResolutionStrategy,
    /// User whose schedule is built when `--user` is not given.
    pub user_id: u64,
    /// Overrides applied on top of the default priority table.
    pub priorities: BTreeMap<String, u32>,
    /// Per-user overrides, keyed by user id.
    pub users: BTreeMap<String, BTreeMap<String, u32>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            timezone: "UTC".to_string(),
            strategy: ResolutionStrategy::default(),
            user_id: 1,
            priorities: BTreeMap::new(),
            users: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Load from `path`, else from [`DEFAULT_CONFIG_FILE`] if present, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fallback.exists() {
            tracing::info!("Loading config from: {}", fallback.display());
            return Self::from_file(fallback);
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Settings::default())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Parse and validate settings from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content).context("Failed to parse TOML")?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        self.tz()?;
        self.priority_provider()?;
        Ok(())
    }

    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid timezone: {}", self.timezone))
    }

    /// Default table with the `[priorities]` overrides, plus every `[users.N]` table.
    pub fn priority_provider(&self) -> Result<UserPriorities> {
        let base = PriorityTable::default().merged_with(&table_from(&self.priorities)?);
        let mut provider = UserPriorities::new(base);

        for (user, weights) in &self.users {
            let user_id: u64 = user
                .parse()
                .with_context(|| format!("Invalid user id in [users]: '{}'", user))?;
            provider = provider.with_override(user_id, table_from(weights)?);
        }

        Ok(provider)
    }
}

fn table_from(weights: &BTreeMap<String, u32>) -> Result<PriorityTable> {
    let mut table = PriorityTable::empty();
    for (name, weight) in weights {
        let activity: ActivityType = name.parse()?;
        table.set(activity, *weight);
    }
    Ok(table)
}
