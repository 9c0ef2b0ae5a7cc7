//! The resolved, validated configuration of a run.

use std::collections::HashSet;
use std::ffi::OsString;

use ortho_config::OrthoConfig;
use refract_syntax::SupportedLanguage;

use crate::args::ConfigArgs;
use crate::defaults::{
    DEFAULT_BATCH_SIZE, DEFAULT_CODE_FIELD, DEFAULT_ID_FIELD, default_log_filter,
    default_log_format,
};
use crate::error::ConfigError;
use crate::logging::LogFormat;
use crate::policy::{MalformedInputPolicy, NoMatchPolicy, OutputLayout};
use crate::settings::Settings;

/// Fully resolved configuration.
///
/// Values are immutable once loaded; the pipeline receives the whole struct
/// at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    language: SupportedLanguage,
    transformations: Vec<String>,
    no_match: NoMatchPolicy,
    malformed_input: MalformedInputPolicy,
    chain: bool,
    id_field: String,
    code_field: String,
    output_layout: OutputLayout,
    jobs: Option<usize>,
    batch_size: usize,
    log_filter: String,
    log_format: LogFormat,
}

impl Config {
    /// Creates a configuration with every optional setting at its default.
    #[must_use]
    pub fn new<I, S>(transformations: I, no_match: NoMatchPolicy) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            language: SupportedLanguage::default(),
            transformations: transformations.into_iter().map(Into::into).collect(),
            no_match,
            malformed_input: MalformedInputPolicy::default(),
            chain: false,
            id_field: DEFAULT_ID_FIELD.to_owned(),
            code_field: DEFAULT_CODE_FIELD.to_owned(),
            output_layout: OutputLayout::default(),
            jobs: None,
            batch_size: DEFAULT_BATCH_SIZE,
            log_filter: default_log_filter().to_owned(),
            log_format: default_log_format(),
        }
    }

    /// Loads configuration from parsed command-line flags, the file they
    /// point at (or `./refract.toml`) and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingFile`] when `--config` names a file that
    /// does not exist, otherwise as [`Config::load_from_iter`].
    pub fn load(args: &ConfigArgs) -> Result<Self, ConfigError> {
        if let Some(path) = &args.config_path
            && !path.is_file()
        {
            return Err(ConfigError::MissingFile { path: path.clone() });
        }
        Self::load_from_iter(args.to_arguments())
    }

    /// Layers defaults, the configuration file, `REFRACT_*` environment
    /// variables and `args` (including the binary name), then validates the
    /// result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] when a source cannot be read or parsed,
    /// otherwise as [`Config::from_settings`].
    pub fn load_from_iter<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let settings = Settings::load_from_iter(args).map_err(ConfigError::Load)?;
        Self::from_settings(settings)
    }

    /// Fills unset settings with defaults and validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an empty or repeated transformation list,
    /// a missing no-match policy, zero counts, or unusable field names.
    pub fn from_settings(settings: Settings) -> Result<Self, ConfigError> {
        let transformations = settings.transformations.unwrap_or_default();
        if transformations.is_empty() {
            return Err(ConfigError::NoTransformations);
        }
        let mut seen = HashSet::new();
        if let Some(repeated) = transformations.iter().find(|name| !seen.insert(name.as_str())) {
            return Err(ConfigError::DuplicateTransformation {
                name: repeated.clone(),
            });
        }

        let no_match = settings.no_match.ok_or(ConfigError::MissingNoMatchPolicy)?;

        if settings.jobs == Some(0) {
            return Err(ConfigError::Zero { field: "jobs" });
        }
        let batch_size = settings.batch_size.unwrap_or(DEFAULT_BATCH_SIZE);
        if batch_size == 0 {
            return Err(ConfigError::Zero {
                field: "batch_size",
            });
        }

        let id_field = settings
            .id_field
            .unwrap_or_else(|| DEFAULT_ID_FIELD.to_owned());
        let code_field = settings
            .code_field
            .unwrap_or_else(|| DEFAULT_CODE_FIELD.to_owned());
        if id_field.is_empty() {
            return Err(ConfigError::EmptyField { field: "id_field" });
        }
        if code_field.is_empty() {
            return Err(ConfigError::EmptyField {
                field: "code_field",
            });
        }
        if id_field == code_field {
            return Err(ConfigError::FieldClash { name: id_field });
        }

        Ok(Self {
            language: settings.language.unwrap_or_default(),
            transformations,
            no_match,
            malformed_input: settings.malformed_input.unwrap_or_default(),
            chain: settings.chain.unwrap_or(false),
            id_field,
            code_field,
            output_layout: settings.output_layout.unwrap_or_default(),
            jobs: settings.jobs,
            batch_size,
            log_filter: settings
                .log_filter
                .unwrap_or_else(|| default_log_filter().to_owned()),
            log_format: settings.log_format.unwrap_or_else(default_log_format),
        })
    }

    /// Sets the source language.
    #[must_use]
    pub const fn with_language(mut self, language: SupportedLanguage) -> Self {
        self.language = language;
        self
    }

    /// Sets the malformed-input policy.
    #[must_use]
    pub const fn with_malformed_input(mut self, policy: MalformedInputPolicy) -> Self {
        self.malformed_input = policy;
        self
    }

    /// Enables or disables chaining.
    #[must_use]
    pub const fn with_chain(mut self, chain: bool) -> Self {
        self.chain = chain;
        self
    }

    /// Sets the identifier and source field names.
    #[must_use]
    pub fn with_fields(mut self, id_field: impl Into<String>, code_field: impl Into<String>) -> Self {
        self.id_field = id_field.into();
        self.code_field = code_field.into();
        self
    }

    /// Sets the output layout.
    #[must_use]
    pub const fn with_output_layout(mut self, layout: OutputLayout) -> Self {
        self.output_layout = layout;
        self
    }

    /// Sets the worker count; `None` uses every CPU.
    #[must_use]
    pub const fn with_jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    /// Sets the chunk size.
    #[must_use]
    pub const fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Sets the tracing filter directive.
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Source language of every record.
    #[must_use]
    pub const fn language(&self) -> SupportedLanguage {
        self.language
    }

    /// Enabled transformation names, in order.
    #[must_use]
    pub fn transformations(&self) -> &[String] {
        &self.transformations
    }

    /// What to emit when a transformation finds nothing to rewrite.
    #[must_use]
    pub const fn no_match(&self) -> NoMatchPolicy {
        self.no_match
    }

    /// Treatment of sources that already contain syntax errors.
    #[must_use]
    pub const fn malformed_input(&self) -> MalformedInputPolicy {
        self.malformed_input
    }

    /// Whether each transformation sees the previous successful output.
    #[must_use]
    pub const fn chain(&self) -> bool {
        self.chain
    }

    /// Record field holding the identifier.
    #[must_use]
    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    /// Record field holding the source text.
    #[must_use]
    pub fn code_field(&self) -> &str {
        &self.code_field
    }

    /// Output destination layout.
    #[must_use]
    pub const fn output_layout(&self) -> OutputLayout {
        self.output_layout
    }

    /// Worker threads; `None` means one per CPU.
    #[must_use]
    pub const fn jobs(&self) -> Option<usize> {
        self.jobs
    }

    /// Records read and processed together.
    #[must_use]
    pub const fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Tracing filter directive.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Log line format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}
