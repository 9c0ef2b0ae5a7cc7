use std::path::PathBuf;
use std::sync::Arc;

use ortho_config::OrthoError;
use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Merging the configuration sources failed.
    #[error("failed to load configuration: {0}")]
    Load(#[source] Arc<OrthoError>),

    /// An explicitly named configuration file does not exist.
    #[error("configuration file '{}' does not exist", path.display())]
    MissingFile {
        /// The path given with `--config`.
        path: PathBuf,
    },

    /// No transformation names were configured.
    #[error("no transformations configured; set `transformations` or pass --transformation")]
    NoTransformations,

    /// A transformation name appears more than once.
    #[error("transformation '{name}' is listed more than once")]
    DuplicateTransformation {
        /// The repeated name.
        name: String,
    },

    /// The no-match policy was not configured.
    #[error("no_match policy must be set explicitly to 'skip' or 'pass_through'")]
    MissingNoMatchPolicy,

    /// A count that must be positive was zero.
    #[error("{field} must be greater than zero")]
    Zero {
        /// The offending setting.
        field: &'static str,
    },

    /// A record field name was empty.
    #[error("{field} must not be empty")]
    EmptyField {
        /// The offending setting.
        field: &'static str,
    },

    /// The identifier and source fields name the same record field.
    #[error("id_field and code_field must differ (both are '{name}')")]
    FieldClash {
        /// The shared field name.
        name: String,
    },
}
