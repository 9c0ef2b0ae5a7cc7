//! Raw settings as layered by `ortho_config`.
//!
//! Defaults, the TOML file named by `--config-path` (or
//! `REFRACT_CONFIG_PATH`), `REFRACT_*` environment variables and
//! command-line flags are merged in that order of precedence. Every field is
//! optional here; [`crate::Config::from_settings`] fills the gaps and
//! validates the result.

use ortho_config::OrthoConfig;
use refract_syntax::SupportedLanguage;
use serde::{Deserialize, Serialize};

use crate::logging::LogFormat;
use crate::policy::{MalformedInputPolicy, NoMatchPolicy, OutputLayout};

/// Settings merged from every configuration source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "REFRACT")]
pub struct Settings {
    /// Source language.
    pub language: Option<SupportedLanguage>,
    /// Ordered transformation names.
    pub transformations: Option<Vec<String>>,
    /// What to emit when nothing matches.
    pub no_match: Option<NoMatchPolicy>,
    /// Treatment of sources with syntax errors.
    pub malformed_input: Option<MalformedInputPolicy>,
    /// Whether transformations compose per record.
    pub chain: Option<bool>,
    /// Record field holding the identifier.
    pub id_field: Option<String>,
    /// Record field holding the source text.
    pub code_field: Option<String>,
    /// Output destination layout.
    pub output_layout: Option<OutputLayout>,
    /// Worker threads.
    pub jobs: Option<usize>,
    /// Records per chunk.
    pub batch_size: Option<usize>,
    /// Tracing filter directive.
    pub log_filter: Option<String>,
    /// Log line format.
    pub log_format: Option<LogFormat>,
}
