//! Error types for matching, rewriting and registry construction.

use refract_syntax::{EditError, EditorError, Span, SupportedLanguage, SyntaxError, SyntaxErrorInfo};
use thiserror::Error;

/// A rewrite rule could not produce an edit for a match.
///
/// Matchers and rules ship together, so these indicate an implementation
/// bug rather than bad input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RewriteError {
    /// The match lacks a role the rule reads.
    #[error("match has no binding for role '{role}'")]
    MissingBinding {
        /// The role that was expected.
        role: &'static str,
    },

    /// The bound nodes do not have the shape the rule expects.
    #[error("unexpected match shape: {message}")]
    UnexpectedShape {
        /// Description of the problem.
        message: String,
    },
}

impl RewriteError {
    /// Creates a missing binding error.
    #[must_use]
    pub const fn missing_binding(role: &'static str) -> Self {
        Self::MissingBinding { role }
    }

    /// Creates an unexpected shape error.
    #[must_use]
    pub fn unexpected_shape(message: impl Into<String>) -> Self {
        Self::UnexpectedShape {
            message: message.into(),
        }
    }
}

/// Why a transformation failed for one record.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum TransformError {
    /// The source text could not be parsed at all.
    #[error(transparent)]
    Parse(SyntaxError),

    /// The source already contains syntax errors and the run rejects such
    /// input.
    #[error("input contains {count} syntax error(s); first at {first}")]
    MalformedInput {
        /// Number of error nodes in the input.
        count: usize,
        /// The first error in document order.
        first: SyntaxErrorInfo,
    },

    /// The rule produced intersecting edits.
    #[error("rule produced overlapping edits {first} and {second}")]
    OverlappingEdits {
        /// Span of the earlier edit.
        first: Span,
        /// Span of the later edit.
        second: Span,
    },

    /// The rule produced an edit that does not address the source.
    #[error("rule produced an invalid edit: {0}")]
    InvalidEdit(EditError),

    /// The rewritten text has syntax errors the original did not.
    #[error("rewrite introduced syntax errors: {}", summarise(.introduced))]
    InvalidResult {
        /// Errors present only in the rewritten text.
        introduced: Vec<SyntaxErrorInfo>,
    },

    /// The rewritten text could not be re-parsed.
    #[error("rewritten source could not be parsed: {0}")]
    Reparse(SyntaxError),

    /// The rule could not produce an edit for one of its matches.
    #[error(transparent)]
    Rewrite(#[from] RewriteError),
}

impl TransformError {
    /// Returns a stable identifier for the failure class, used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Parse(_) => "parse_error",
            Self::MalformedInput { .. } => "malformed_input",
            Self::OverlappingEdits { .. } => "overlapping_edits",
            Self::InvalidEdit(_) => "invalid_edit",
            Self::InvalidResult { .. } => "invalid_result",
            Self::Reparse(_) => "reparse_error",
            Self::Rewrite(_) => "rewrite_error",
        }
    }

    /// Returns true when the failure points at a defect in a rule rather
    /// than at the input.
    #[must_use]
    pub const fn is_rule_defect(&self) -> bool {
        matches!(
            self,
            Self::OverlappingEdits { .. } | Self::InvalidEdit(_) | Self::Rewrite(_)
        )
    }
}

impl From<EditorError> for TransformError {
    fn from(error: EditorError) -> Self {
        match error {
            EditorError::Edit(EditError::Overlapping { first, second }) => {
                Self::OverlappingEdits { first, second }
            }
            EditorError::Edit(other) => Self::InvalidEdit(other),
            EditorError::Reparse(source) => Self::Reparse(source),
            EditorError::InvalidResult { introduced } => Self::InvalidResult { introduced },
            // `EditorError` is non-exhaustive; future variants surface as
            // invalid results carrying no detail.
            _ => Self::InvalidResult {
                introduced: Vec::new(),
            },
        }
    }
}

/// Errors raised while building a [`crate::Registry`] from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// No transformations were requested.
    #[error("no transformations enabled")]
    Empty,

    /// A requested name is not in the catalogue.
    #[error("unknown transformation '{name}'")]
    Unknown {
        /// The requested name.
        name: String,
    },

    /// A name was requested more than once.
    #[error("transformation '{name}' is enabled more than once")]
    Duplicate {
        /// The repeated name.
        name: String,
    },

    /// A transformation does not apply to the configured language.
    #[error("transformation '{name}' does not support {language}")]
    UnsupportedLanguage {
        /// The transformation name.
        name: String,
        /// The configured language.
        language: SupportedLanguage,
    },
}

fn summarise(errors: &[SyntaxErrorInfo]) -> String {
    if errors.is_empty() {
        return "unknown".to_owned();
    }
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
