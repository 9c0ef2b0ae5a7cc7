use std::io;
use std::path::PathBuf;

use refract_rules::RegistryError;
use thiserror::Error;

/// Fatal errors that stop a run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PipelineError {
    /// The input file could not be opened.
    #[error("failed to open input '{}': {source}", path.display())]
    OpenInput {
        /// Input path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// Reading from the input failed part way through.
    #[error("failed to read input: {0}")]
    ReadInput(#[source] io::Error),

    /// The output file or directory could not be created.
    #[error("failed to create output '{}': {source}", path.display())]
    CreateOutput {
        /// Output path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The output rejected a write.
    #[error("failed to write output: {0}")]
    SinkWrite(#[source] io::Error),

    /// The configured transformations cannot be enabled.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The worker pool could not be started.
    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Why a single input line could not be read as a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RecordError {
    /// The line is not valid UTF-8.
    #[error("line is not valid UTF-8: {message}")]
    InvalidUtf8 {
        /// Decoder diagnostic.
        message: String,
    },

    /// The line is not valid JSON.
    #[error("invalid JSON: {message}")]
    InvalidJson {
        /// Parser diagnostic.
        message: String,
    },

    /// The line is JSON but not an object.
    #[error("record is not a JSON object")]
    NotAnObject,

    /// A required field is absent.
    #[error("record has no '{field}' field")]
    MissingField {
        /// The missing field.
        field: String,
    },

    /// The identifier is neither a string nor a number.
    #[error("record field '{field}' must be a string or a number")]
    InvalidId {
        /// The identifier field.
        field: String,
    },

    /// The source field is not a string.
    #[error("record field '{field}' must be a string")]
    NotAString {
        /// The source field.
        field: String,
    },
}
