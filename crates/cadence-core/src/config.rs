use anyhow::Result;
use config::Config;
use serde::Deserialize;

use crate::constants::{
    CONFIG_FILE_NAME, DEFAULT_END_COUNT, DEFAULT_EXPANSION_LIMIT, DEFAULT_LOG_LEVEL,
};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub recurrence: RecurrenceConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// End condition assumed for rule strings that carry neither `COUNT` nor `UNTIL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultEnd {
    After,
    Never,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecurrenceConfig {
    pub default_end: DefaultEnd,
    pub default_count: u32,
    pub expansion_limit: u16,
}

impl Default for RecurrenceConfig {
    fn default() -> Self {
        Self {
            default_end: DefaultEnd::After,
            default_count: DEFAULT_END_COUNT,
            expansion_limit: DEFAULT_EXPANSION_LIMIT,
        }
    }
}

impl RecurrenceConfig {
    /// ## Summary
    /// Checks the recurrence defaults are usable by the parser and the expander.
    ///
    /// ## Errors
    /// Returns `CoreError::ConfigError` if the default count or the expansion limit is zero.
    pub fn validate(&self) -> CoreResult<()> {
        if self.default_count == 0 {
            return Err(CoreError::ConfigError(
                "recurrence.default_count must be at least 1".to_string(),
            ));
        }
        if self.expansion_limit == 0 {
            return Err(CoreError::ConfigError(
                "recurrence.expansion_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Settings {
    /// ## Summary
    /// Loads configuration from environment variables and an optional `config.toml`.
    /// Environment variables (`CADENCE_` prefix, `__` between sections) take precedence
    /// over file values.
    ///
    /// ## Errors
    /// Returns an error if building, deserializing or validating the configuration fails.
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .set_default("logging.level", DEFAULT_LOG_LEVEL)?
            .set_default("recurrence.default_end", "after")?
            .set_default("recurrence.default_count", i64::from(DEFAULT_END_COUNT))?
            .set_default(
                "recurrence.expansion_limit",
                i64::from(DEFAULT_EXPANSION_LIMIT),
            )?
            // TOML file
            .add_source(config::File::with_name(CONFIG_FILE_NAME).required(false))
            // Env
            .add_source(
                config::Environment::with_prefix("CADENCE")
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?;

        settings.recurrence.validate()?;
        tracing::debug!(settings = ?settings, "Settings loaded");

        Ok(settings)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
