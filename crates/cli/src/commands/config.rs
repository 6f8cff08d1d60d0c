use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use quotedesk_core::config::{AppConfig, LoadOptions};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let entries = [
        (
            "store.url",
            config.store.url.clone(),
            source("store.url", &["QUOTEDESK_STORE_URL"]),
        ),
        (
            "store.max_connections",
            config.store.max_connections.to_string(),
            source("store.max_connections", &["QUOTEDESK_STORE_MAX_CONNECTIONS"]),
        ),
        (
            "store.timeout_secs",
            config.store.timeout_secs.to_string(),
            source("store.timeout_secs", &["QUOTEDESK_STORE_TIMEOUT_SECS"]),
        ),
        (
            "planning.demand_horizon_days",
            config.planning.demand_horizon_days.to_string(),
            source("planning.demand_horizon_days", &["QUOTEDESK_PLANNING_DEMAND_HORIZON_DAYS"]),
        ),
        (
            "planning.follow_up_days",
            config.planning.follow_up_days.to_string(),
            source("planning.follow_up_days", &["QUOTEDESK_PLANNING_FOLLOW_UP_DAYS"]),
        ),
        (
            "planning.default_layout",
            format!("{:?}", config.planning.default_layout),
            source("planning.default_layout", &["QUOTEDESK_PLANNING_DEFAULT_LAYOUT"]),
        ),
        (
            "logging.level",
            config.logging.level.clone(),
            source("logging.level", &["QUOTEDESK_LOGGING_LEVEL", "QUOTEDESK_LOG_LEVEL"]),
        ),
        (
            "logging.format",
            format!("{:?}", config.logging.format),
            source("logging.format", &["QUOTEDESK_LOGGING_FORMAT", "QUOTEDESK_LOG_FORMAT"]),
        ),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    lines.extend(entries.iter().map(|(key, value, source)| render_line(key, value, source)));
    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    ["quotedesk.toml", "config/quotedesk.toml"]
        .into_iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: &str) -> String {
    format!("- {key} = {value} (source: {source})")
}
