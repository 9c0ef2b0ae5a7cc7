use crate::logging::LogFormat;

/// Configuration file looked up in the working directory when no explicit
/// path is given.
pub const DEFAULT_CONFIG_FILE: &str = "refract.toml";

/// Default log filter expression used by the binary.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Records read and processed together.
pub const DEFAULT_BATCH_SIZE: usize = 256;

/// Record field holding the identifier.
pub const DEFAULT_ID_FIELD: &str = "id";

/// Record field holding the source text.
pub const DEFAULT_CODE_FIELD: &str = "input";

/// Default log filter expression used by the binary.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Default logging format for the binary.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}
