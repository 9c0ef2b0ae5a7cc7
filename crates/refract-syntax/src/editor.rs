//! Apply-and-validate cycle for planned edits.
//!
//! The [`TreeEditor`] is the correctness gate of the engine: a rewritten
//! buffer is only handed back once it has been re-parsed and shown to contain
//! no syntax errors beyond those already present in the original.

use std::collections::HashMap;

use crate::edit::{Edit, apply_edits};
use crate::error::EditorError;
use crate::parser::Parser;
use crate::tree::{SyntaxErrorInfo, SyntaxTree};

/// Applies edits to a parsed tree's source and validates the outcome.
pub struct TreeEditor<'p> {
    parser: &'p mut Parser,
}

impl<'p> TreeEditor<'p> {
    /// Creates an editor that re-parses with `parser`.
    ///
    /// The parser must be configured for the language of the trees passed to
    /// [`TreeEditor::apply`].
    #[must_use]
    pub const fn new(parser: &'p mut Parser) -> Self {
        Self { parser }
    }

    /// Applies `edits` to the source of `original` and re-parses the result.
    ///
    /// Returns the validated tree of the rewritten source.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Edit`] when the edits are out of bounds or
    /// overlap, [`EditorError::Reparse`] when the rewritten text cannot be
    /// parsed, and [`EditorError::InvalidResult`] when the rewritten text has
    /// syntax errors the original did not.
    pub fn apply(&mut self, original: &SyntaxTree, edits: &[Edit]) -> Result<SyntaxTree, EditorError> {
        let candidate = apply_edits(original.source(), edits)?;
        let rewritten = self.parser.parse(candidate).map_err(EditorError::Reparse)?;

        let introduced = introduced_errors(original, &rewritten);
        if introduced.is_empty() {
            Ok(rewritten)
        } else {
            Err(EditorError::InvalidResult { introduced })
        }
    }
}

/// Returns the errors of `rewritten` that have no counterpart in `original`.
///
/// Errors are matched as a multiset on [`SyntaxErrorInfo::signature`], so an
/// original error that merely moved is not reported, while a second copy of
/// an existing error is.
#[must_use]
pub fn introduced_errors(original: &SyntaxTree, rewritten: &SyntaxTree) -> Vec<SyntaxErrorInfo> {
    if !rewritten.has_errors() {
        return Vec::new();
    }

    let baseline = original.errors();
    let mut remaining: HashMap<(&str, &str), usize> = HashMap::new();
    for error in &baseline {
        let count = remaining.entry(error.signature()).or_default();
        *count = count.saturating_add(1);
    }

    let found = rewritten.errors();
    found
        .iter()
        .filter(|error| match remaining.get_mut(&error.signature()) {
            Some(count) if *count > 0 => {
                *count = count.saturating_sub(1);
                false
            }
            _ => true,
        })
        .cloned()
        .collect()
}
