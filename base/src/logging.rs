//! Logging setup shared by tools embedding the action codec.
//!
//! # Environment Variables
//! - `LOG_LEVEL`: filter directives in `EnvFilter` syntax (default: `info`)
//! - `LOG_USE_JSON`: emit JSON lines instead of human readable text (default: false)
//! - `LOG_WITH_ANSI`: colorize text output (default: true)

use crate::error::ActionSpecError;
use anyhow::Result;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: Option<String>,
    #[serde(default)]
    pub use_json: bool,
    #[serde(default = "default_with_ansi")]
    pub with_ansi: bool,
}

fn default_with_ansi() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: None,
            use_json: false,
            with_ansi: true,
        }
    }
}

impl LoggingConfig {
    pub fn level_or_default(&self) -> &str {
        self.level.as_deref().unwrap_or("info")
    }
}

pub fn load_logging_config_from_env() -> Result<LoggingConfig> {
    envy::prefixed("LOG_")
        .from_env::<LoggingConfig>()
        .map_err(|e| ActionSpecError::from(e).into())
}

/// Install the global tracing subscriber.
/// Fails if the filter directives cannot be parsed or a subscriber is already set.
pub fn tracing_init(conf: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_new(conf.level_or_default()).map_err(|e| {
        ActionSpecError::ConfigError(format!("invalid log level {:?}: {}", conf.level, e))
    })?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(conf.with_ansi);
    let res = if conf.use_json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    res.map_err(|e| anyhow::anyhow!("cannot initialize tracing subscriber: {:?}", e))?;
    tracing::debug!("{} tracing initialized: {:?}", crate::APP_NAME, conf);
    Ok(())
}
