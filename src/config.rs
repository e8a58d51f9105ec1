// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::EngineConfig;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Edupulse", "edupulse"));

/// Contents of `config.toml`. Every key is optional.
///
/// ```toml
/// base_url = "http://localhost:8080"
/// window_months = 6
/// feed_limit = 10
///
/// [thresholds]
/// near_limit = 75
/// over_budget = 90
///
/// [[category_rules]]
/// pattern = "(?i)salar|payroll"
/// category = "Salaries"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    pub base_url: Option<String>,
    pub data_dir: Option<PathBuf>,
    #[serde(flatten)]
    pub engine: EngineConfig,
}

pub fn config_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific config dir")?;
    Ok(proj.config_dir().join("config.toml"))
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Loading configuration from {}", path_ref.display());
    let contents = fs::read_to_string(path_ref)
        .with_context(|| format!("Failed to read config file {}", path_ref.display()))?;
    let cfg: AppConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse TOML from {}", path_ref.display()))?;
    Ok(cfg)
}

// An explicit path must exist; the platform default is optional.
pub fn load_or_default(explicit: Option<&Path>) -> Result<AppConfig> {
    if let Some(p) = explicit {
        return load_config(p);
    }
    let path = config_path()?;
    if path.exists() {
        load_config(&path)
    } else {
        tracing::debug!("No config at {}; using defaults", path.display());
        Ok(AppConfig::default())
    }
}
