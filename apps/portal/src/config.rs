use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use client_core::transport::{normalize_base_url, DEFAULT_API_BASE_URL};

pub const SETTINGS_FILE: &str = "portal.toml";
const TOKEN_FILE: &str = "session.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub data_dir: PathBuf,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            data_dir: default_data_dir(),
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    pub fn token_path(&self) -> PathBuf {
        self.data_dir.join(TOKEN_FILE)
    }

    /// Applies command-line overrides, which win over file and environment.
    pub fn with_overrides(
        mut self,
        api_base_url: Option<String>,
        data_dir: Option<PathBuf>,
    ) -> anyhow::Result<Self> {
        if let Some(v) = api_base_url {
            self.api_base_url = v;
        }
        if let Some(v) = data_dir {
            self.data_dir = v;
        }
        self.api_base_url = normalize_base_url(&self.api_base_url)
            .with_context(|| format!("invalid api base url '{}'", self.api_base_url))?;
        Ok(self)
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("carolina_portal")
}

/// Defaults, then `portal.toml` (or the explicit `config_path`), then environment.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match config_path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file '{}'", path.display()))?;
            apply_file(&mut settings, &raw)
                .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
        }
        None => {
            if let Ok(raw) = fs::read_to_string(SETTINGS_FILE) {
                apply_file(&mut settings, &raw)
                    .with_context(|| format!("failed to parse {SETTINGS_FILE}"))?;
            }
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());

    settings.api_base_url = normalize_base_url(&settings.api_base_url)
        .with_context(|| format!("invalid api base url '{}'", settings.api_base_url))?;
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg = toml::from_str::<HashMap<String, String>>(raw)?;
    if let Some(v) = file_cfg.get("api_base_url") {
        settings.api_base_url = v.clone();
    }
    if let Some(v) = file_cfg.get("data_dir") {
        settings.data_dir = PathBuf::from(v);
    }
    if let Some(v) = file_cfg.get("log_filter") {
        settings.log_filter = v.clone();
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("BACKEND_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = lookup("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = lookup("APP__DATA_DIR") {
        settings.data_dir = PathBuf::from(v);
    }

    if let Some(v) = lookup("RUST_LOG") {
        settings.log_filter = v;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
