/// Config file read from the working directory when present.
pub const CONFIG_FILE_NAME: &str = "config.toml";

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Occurrence count used when a rule string carries no end condition.
pub const DEFAULT_END_COUNT: u32 = 7;

/// Upper bound on dates produced by one series expansion.
pub const DEFAULT_EXPANSION_LIMIT: u16 = 52;
