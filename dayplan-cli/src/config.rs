use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::ensure_dayplan_home;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// IANA timezone used to parse due dates and pick "today".
    pub timezone: String,
    pub storage: StorageSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSection {
    /// Task file path; defaults to ~/.dayplan/tasks.json when unset.
    pub tasks_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: "America/Chicago".to_string(),
            storage: StorageSection { tasks_file: None },
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_dayplan_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(toml::from_str(&s).context("parse config.toml")?)
}

pub fn tasks_file(cfg: &Config) -> Result<PathBuf> {
    match &cfg.storage.tasks_file {
        Some(path) => Ok(path.clone()),
        None => Ok(ensure_dayplan_home()?.join("tasks.json")),
    }
}
