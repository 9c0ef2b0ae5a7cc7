//! Error types for the CLI runtime.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use refract_config::ConfigError;
use refract_pipeline::PipelineError;
use refract_pipeline::telemetry::TelemetryError;
use refract_rules::{RegistryError, TransformError};
use refract_syntax::SyntaxError;
use thiserror::Error;

/// Failures that end a CLI invocation with a non-zero status.
#[derive(Debug, Error)]
pub(crate) enum AppError {
    /// Configuration sources could not be read or merged.
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    /// The merged configuration failed validation.
    #[error("invalid configuration: {0}")]
    Configuration(ConfigError),
    /// The tracing subscriber could not be installed.
    #[error("failed to initialise telemetry: {0}")]
    Telemetry(#[from] TelemetryError),
    /// The batch could not be started or its I/O failed.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    /// A transformation name was not recognised for the language.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// The parser could not be set up or the language was not recognised.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    /// The source file for `apply` could not be read.
    #[error("failed to read source '{}': {source}", path.display())]
    ReadSource {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },
    /// `apply` found nothing to rewrite.
    #[error("transformation '{name}' found no match")]
    NoMatch {
        /// Transformation that was applied.
        name: String,
    },
    /// `apply` matched but could not produce valid output.
    #[error("transformation '{name}' failed: {source}")]
    Transform {
        /// Transformation that was applied.
        name: String,
        /// Why the rewrite was rejected.
        source: Box<TransformError>,
    },
    /// Writing to the output stream failed.
    #[error("failed to write output: {0}")]
    WriteOutput(io::Error),
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        match error {
            ConfigError::Load(source) => Self::LoadConfiguration(source),
            other => Self::Configuration(other),
        }
    }
}
