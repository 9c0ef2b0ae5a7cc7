//! Shared configuration for the refract transformation pipeline.
//!
//! Settings are layered by `ortho_config` from lowest to highest precedence:
//! built-in defaults, a TOML file (`--config`, or `refract.toml` in the
//! working directory), `REFRACT_*` environment variables, then command-line
//! flags. The merged result is validated once, before any input is read.

mod args;
mod config;
mod defaults;
mod error;
mod logging;
mod policy;
mod settings;

pub use args::ConfigArgs;
pub use config::Config;
pub use defaults::{
    DEFAULT_BATCH_SIZE, DEFAULT_CODE_FIELD, DEFAULT_CONFIG_FILE, DEFAULT_ID_FIELD,
    DEFAULT_LOG_FILTER, default_log_filter, default_log_format,
};
pub use error::ConfigError;
pub use logging::{LogFormat, LogFormatParseError};
pub use policy::{MalformedInputPolicy, NoMatchPolicy, OutputLayout};
pub use settings::Settings;
