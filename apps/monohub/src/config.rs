use std::{collections::HashMap, fs, path::Path, time::Duration};

use anyhow::Context;
use client_core::{
    heatmap::DEFAULT_HEATMAP_BASE_URL, ClientOptions, DEFAULT_API_BASE_URL, DEFAULT_USER_AGENT,
};

pub const DEFAULT_CONFIG_FILE: &str = "monohub.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub heatmap_base_url: String,
    pub heatmap_enabled: bool,
    pub user_agent: String,
    pub request_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            heatmap_base_url: DEFAULT_HEATMAP_BASE_URL.into(),
            heatmap_enabled: true,
            user_agent: DEFAULT_USER_AGENT.into(),
            request_timeout_secs: None,
        }
    }
}

impl Settings {
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            user_agent: self.user_agent.clone(),
            timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Defaults, then the config file, then environment overrides.
///
/// An explicit `config_path` must exist; the default `monohub.toml` is optional.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match config_path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file '{}'", path.display()))?;
            apply_file(&mut settings, &raw)
                .with_context(|| format!("invalid config file '{}'", path.display()))?;
        }
        None => {
            if let Ok(raw) = fs::read_to_string(DEFAULT_CONFIG_FILE) {
                apply_file(&mut settings, &raw)
                    .with_context(|| format!("invalid config file '{DEFAULT_CONFIG_FILE}'"))?;
            }
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg = toml::from_str::<HashMap<String, String>>(raw)
        .context("expected a table of string values")?;

    if let Some(v) = file_cfg.get("api_base_url") {
        settings.api_base_url = v.clone();
    }
    if let Some(v) = file_cfg.get("heatmap_base_url") {
        settings.heatmap_base_url = v.clone();
    }
    if let Some(v) = file_cfg.get("heatmap_enabled") {
        settings.heatmap_enabled =
            parse_flag(v).with_context(|| format!("heatmap_enabled: '{v}' is not a boolean"))?;
    }
    if let Some(v) = file_cfg.get("user_agent") {
        settings.user_agent = v.clone();
    }
    if let Some(v) = file_cfg.get("request_timeout_secs") {
        settings.request_timeout_secs = parse_timeout(v)
            .with_context(|| format!("request_timeout_secs: '{v}' is not a number"))?;
    }

    Ok(())
}

fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("MONOHUB_API_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = var("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = var("MONOHUB_HEATMAP_URL") {
        settings.heatmap_base_url = v;
    }
    if let Some(v) = var("APP__HEATMAP_BASE_URL") {
        settings.heatmap_base_url = v;
    }

    if let Some(v) = var("APP__HEATMAP_ENABLED") {
        if let Some(enabled) = parse_flag(&v) {
            settings.heatmap_enabled = enabled;
        }
    }

    if let Some(v) = var("MONOHUB_USER_AGENT") {
        settings.user_agent = v;
    }
    if let Some(v) = var("APP__USER_AGENT") {
        settings.user_agent = v;
    }

    if let Some(v) = var("APP__REQUEST_TIMEOUT_SECS") {
        if let Some(parsed) = parse_timeout(&v) {
            settings.request_timeout_secs = parsed;
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// `0` or an empty value disables the timeout.
fn parse_timeout(raw: &str) -> Option<Option<u64>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(None);
    }
    let secs = raw.parse::<u64>().ok()?;
    Some((secs > 0).then_some(secs))
}
