//! Error types for parsing and tree editing.
//!
//! This module provides structured error types for all operations in the
//! `refract-syntax` crate: parser set-up, parsing, edit application and
//! post-edit validation.

use std::path::PathBuf;

use thiserror::Error;

use crate::edit::Span;
use crate::language::SupportedLanguage;
use crate::tree::SyntaxErrorInfo;

/// Errors from parser set-up and parsing.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum SyntaxError {
    /// Failed to initialise the Tree-sitter parser for a language.
    #[error("failed to initialise parser for {language}: {message}")]
    ParserInitError {
        /// The language that failed to initialise.
        language: SupportedLanguage,
        /// Description of the failure.
        message: String,
    },

    /// Failed to determine language from file path.
    #[error("could not determine language for path: {}", path.display())]
    UnknownLanguage {
        /// The path that could not be mapped to a language.
        path: PathBuf,
    },

    /// The source could not be tokenised by the grammar at all.
    #[error("failed to parse {language}: {message}")]
    ParseError {
        /// The language that failed to parse.
        language: SupportedLanguage,
        /// Description of the failure.
        message: String,
    },
}

impl SyntaxError {
    /// Creates a parser initialisation error.
    #[must_use]
    pub fn parser_init(language: SupportedLanguage, message: impl Into<String>) -> Self {
        Self::ParserInitError {
            language,
            message: message.into(),
        }
    }

    /// Creates an unknown language error.
    #[must_use]
    pub const fn unknown_language(path: PathBuf) -> Self {
        Self::UnknownLanguage { path }
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse(language: SupportedLanguage, message: impl Into<String>) -> Self {
        Self::ParseError {
            language,
            message: message.into(),
        }
    }
}

/// Errors raised while applying a set of edits to a source buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum EditError {
    /// Two edits target intersecting spans.
    #[error("overlapping edits: {first} intersects {second}")]
    Overlapping {
        /// Span of the earlier edit in the submitted list.
        first: Span,
        /// Span of the later edit in the submitted list.
        second: Span,
    },

    /// An edit addresses bytes beyond the end of the buffer, or its start
    /// lies after its end.
    #[error("edit span {span} is outside the source buffer of {len} bytes")]
    OutOfBounds {
        /// The offending span.
        span: Span,
        /// Length of the source buffer.
        len: usize,
    },

    /// An edit boundary falls inside a multi-byte UTF-8 character.
    #[error("edit span {span} does not fall on UTF-8 character boundaries")]
    CharBoundary {
        /// The offending span.
        span: Span,
    },
}

/// Errors from the tree editor's apply-and-validate cycle.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum EditorError {
    /// The edits could not be applied.
    #[error(transparent)]
    Edit(#[from] EditError),

    /// The candidate text could not be re-parsed.
    #[error("failed to re-parse edited source: {0}")]
    Reparse(#[source] SyntaxError),

    /// The edited source contains syntax errors that the original did not.
    #[error("edit introduced {count} syntax error(s): {summary}", count = .introduced.len(), summary = summarise(.introduced))]
    InvalidResult {
        /// Errors present in the edited source but not in the original.
        introduced: Vec<SyntaxErrorInfo>,
    },
}

fn summarise(errors: &[SyntaxErrorInfo]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
