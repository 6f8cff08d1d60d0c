use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pricing::calendar::DEFAULT_FOLLOW_UP_DAYS;
use crate::pricing::print::PrintLayout;
use crate::stock::DEFAULT_HORIZON_DAYS;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub planning: PlanningConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

impl StoreConfig {
    pub fn is_in_memory(&self) -> bool {
        self.url.trim() == MEMORY_STORE_URL
    }
}

#[derive(Clone, Debug)]
pub struct PlanningConfig {
    pub demand_horizon_days: u64,
    pub follow_up_days: u64,
    pub default_layout: PrintLayout,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

pub const MEMORY_STORE_URL: &str = "memory://";

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub store_url: Option<String>,
    pub log_level: Option<String>,
    pub demand_horizon_days: Option<u64>,
    pub default_layout: Option<PrintLayout>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig {
                url: "sqlite://quotedesk.db".to_string(),
                max_connections: 5,
                timeout_secs: 30,
            },
            planning: PlanningConfig {
                demand_horizon_days: DEFAULT_HORIZON_DAYS,
                follow_up_days: DEFAULT_FOLLOW_UP_DAYS,
                default_layout: PrintLayout::Standard,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("quotedesk.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(store) = patch.store {
            if let Some(url) = store.url {
                self.store.url = url;
            }
            if let Some(max_connections) = store.max_connections {
                self.store.max_connections = max_connections;
            }
            if let Some(timeout_secs) = store.timeout_secs {
                self.store.timeout_secs = timeout_secs;
            }
        }

        if let Some(planning) = patch.planning {
            if let Some(demand_horizon_days) = planning.demand_horizon_days {
                self.planning.demand_horizon_days = demand_horizon_days;
            }
            if let Some(follow_up_days) = planning.follow_up_days {
                self.planning.follow_up_days = follow_up_days;
            }
            if let Some(default_layout) = planning.default_layout {
                self.planning.default_layout = default_layout;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("QUOTEDESK_STORE_URL") {
            self.store.url = value;
        }
        if let Some(value) = read_env("QUOTEDESK_STORE_MAX_CONNECTIONS") {
            self.store.max_connections = parse_u32("QUOTEDESK_STORE_MAX_CONNECTIONS", &value)?;
        }
        if let Some(value) = read_env("QUOTEDESK_STORE_TIMEOUT_SECS") {
            self.store.timeout_secs = parse_u64("QUOTEDESK_STORE_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("QUOTEDESK_PLANNING_DEMAND_HORIZON_DAYS") {
            self.planning.demand_horizon_days =
                parse_u64("QUOTEDESK_PLANNING_DEMAND_HORIZON_DAYS", &value)?;
        }
        if let Some(value) = read_env("QUOTEDESK_PLANNING_FOLLOW_UP_DAYS") {
            self.planning.follow_up_days = parse_u64("QUOTEDESK_PLANNING_FOLLOW_UP_DAYS", &value)?;
        }
        if let Some(value) = read_env("QUOTEDESK_PLANNING_DEFAULT_LAYOUT") {
            self.planning.default_layout =
                value.parse().map_err(|_| ConfigError::InvalidEnvOverride {
                    key: "QUOTEDESK_PLANNING_DEFAULT_LAYOUT".to_string(),
                    value: value.clone(),
                })?;
        }

        let log_level =
            read_env("QUOTEDESK_LOGGING_LEVEL").or_else(|| read_env("QUOTEDESK_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("QUOTEDESK_LOGGING_FORMAT").or_else(|| read_env("QUOTEDESK_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(store_url) = overrides.store_url {
            self.store.url = store_url;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(demand_horizon_days) = overrides.demand_horizon_days {
            self.planning.demand_horizon_days = demand_horizon_days;
        }
        if let Some(default_layout) = overrides.default_layout {
            self.planning.default_layout = default_layout;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_store(&self.store)?;
        validate_planning(&self.planning)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("quotedesk.toml"), PathBuf::from("config/quotedesk.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_store(store: &StoreConfig) -> Result<(), ConfigError> {
    let url = store.url.trim();
    let supported = url == MEMORY_STORE_URL
        || url.starts_with("sqlite://")
        || url.starts_with("sqlite::")
        || url == ":memory:";
    if !supported {
        return Err(ConfigError::Validation(
            "store.url must be `memory://` or a sqlite URL (`sqlite://...`, `sqlite::...`, or `:memory:`)"
                .to_string(),
        ));
    }

    if store.max_connections == 0 {
        return Err(ConfigError::Validation(
            "store.max_connections must be greater than zero".to_string(),
        ));
    }

    if store.timeout_secs == 0 || store.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "store.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_planning(planning: &PlanningConfig) -> Result<(), ConfigError> {
    if planning.demand_horizon_days == 0 || planning.demand_horizon_days > 366 {
        return Err(ConfigError::Validation(
            "planning.demand_horizon_days must be in range 1..=366".to_string(),
        ));
    }

    if planning.follow_up_days > 90 {
        return Err(ConfigError::Validation(
            "planning.follow_up_days must be at most 90".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    store: Option<StorePatch>,
    planning: Option<PlanningPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct StorePatch {
    url: Option<String>,
    max_connections: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct PlanningPatch {
    demand_horizon_days: Option<u64>,
    follow_up_days: Option<u64>,
    default_layout: Option<PrintLayout>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::sync::{Mutex, OnceLock};

    use tempfile::TempDir;

    use super::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
    use crate::pricing::print::PrintLayout;

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    #[test]
    fn defaults_validate_without_any_file() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let config = AppConfig::load(LoadOptions::default())
            .map_err(|err| format!("config load failed: {err}"))?;

        ensure(config.planning.demand_horizon_days == 30, "default horizon is thirty days")?;
        ensure(config.planning.follow_up_days == 5, "default follow-up is five days")?;
        ensure(
            matches!(config.logging.format, LogFormat::Compact),
            "default logging format should be compact",
        )
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TEST_QUOTEDESK_DB", "sqlite://from-env-interpolation.db");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("quotedesk.toml");
            fs::write(
                &path,
                r#"
[store]
url = "${TEST_QUOTEDESK_DB}"

[planning]
demand_horizon_days = 45
default_layout = "with_airfreight"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.store.url == "sqlite://from-env-interpolation.db",
                "store url should be interpolated from environment",
            )?;
            ensure(config.planning.demand_horizon_days == 45, "horizon should come from file")?;
            ensure(
                config.planning.default_layout == PrintLayout::WithAirfreight,
                "layout should come from file",
            )
        })();

        clear_vars(&["TEST_QUOTEDESK_DB"]);
        result
    }

    #[test]
    fn logging_env_aliases_are_supported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("QUOTEDESK_LOG_LEVEL", "warn");
        env::set_var("QUOTEDESK_LOG_FORMAT", "pretty");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.logging.level == "warn", "warning log level should be set from env var")?;
            ensure(
                matches!(config.logging.format, LogFormat::Pretty),
                "pretty logging format should be set from env var",
            )
        })();

        clear_vars(&["QUOTEDESK_LOG_LEVEL", "QUOTEDESK_LOG_FORMAT"]);
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("QUOTEDESK_STORE_URL", "sqlite://from-env.db");
        env::set_var("QUOTEDESK_PLANNING_FOLLOW_UP_DAYS", "7");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("quotedesk.toml");
            fs::write(
                &path,
                r#"
[store]
url = "sqlite://from-file.db"

[planning]
follow_up_days = 3
demand_horizon_days = 14

[logging]
level = "warn"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    store_url: Some("memory://".to_string()),
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.store.url == "memory://", "override store url should win")?;
            ensure(config.store.is_in_memory(), "memory url should select the in-memory store")?;
            ensure(config.logging.level == "debug", "overridden log level should be debug")?;
            ensure(config.planning.follow_up_days == 7, "env follow-up should win over file")?;
            ensure(config.planning.demand_horizon_days == 14, "file horizon should win over default")
        })();

        clear_vars(&["QUOTEDESK_STORE_URL", "QUOTEDESK_PLANNING_FOLLOW_UP_DAYS"]);
        result
    }

    #[test]
    fn validation_fails_fast_with_actionable_error() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("QUOTEDESK_STORE_URL", "postgres://elsewhere");

        let result = (|| -> Result<(), String> {
            let error = match AppConfig::load(LoadOptions::default()) {
                Ok(_) => {
                    return Err("expected validation failure but config load succeeded".to_string())
                }
                Err(error) => error,
            };
            let has_message = matches!(
                error,
                ConfigError::Validation(ref message) if message.contains("store.url")
            );
            ensure(has_message, "validation failure should mention store.url")
        })();

        clear_vars(&["QUOTEDESK_STORE_URL"]);
        result
    }

    #[test]
    fn malformed_numeric_env_override_is_reported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("QUOTEDESK_PLANNING_DEMAND_HORIZON_DAYS", "thirty");

        let result = (|| -> Result<(), String> {
            let error = AppConfig::load(LoadOptions::default()).err();
            ensure(
                matches!(
                    error,
                    Some(ConfigError::InvalidEnvOverride { ref key, .. })
                        if key == "QUOTEDESK_PLANNING_DEMAND_HORIZON_DAYS"
                ),
                "invalid horizon should name the offending variable",
            )
        })();

        clear_vars(&["QUOTEDESK_PLANNING_DEMAND_HORIZON_DAYS"]);
        result
    }

    #[test]
    fn zero_horizon_is_rejected() {
        let mut config = AppConfig::default();
        config.planning.demand_horizon_days = 0;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(ref message)) if message.contains("demand_horizon_days")
        ));
    }
}
