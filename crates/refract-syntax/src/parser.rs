//! Tree-sitter parser wrapper.
//!
//! [`Parser`] binds a Tree-sitter parser to one [`SupportedLanguage`] and
//! turns source text into an owned [`SyntaxTree`].

use crate::error::SyntaxError;
use crate::language::SupportedLanguage;
use crate::tree::SyntaxTree;

/// Tree-sitter parser wrapper for a specific language.
///
/// Parsers hold mutable state and are not shareable between threads; create
/// one per worker.
pub struct Parser {
    inner: tree_sitter::Parser,
    language: SupportedLanguage,
}

impl Parser {
    /// Creates a new parser for the given language.
    ///
    /// # Errors
    ///
    /// Returns an error if the Tree-sitter parser cannot be initialised
    /// with the language grammar.
    pub fn new(language: SupportedLanguage) -> Result<Self, SyntaxError> {
        let mut inner = tree_sitter::Parser::new();
        inner
            .set_language(&language.tree_sitter_language())
            .map_err(|e| SyntaxError::parser_init(language, e.to_string()))?;

        Ok(Self { inner, language })
    }

    /// Returns the language this parser is configured for.
    #[must_use]
    pub const fn language(&self) -> SupportedLanguage {
        self.language
    }

    /// Parses source code into a syntax tree.
    ///
    /// Recoverable syntax errors do not fail the parse; they surface as error
    /// nodes reported by [`SyntaxTree::has_errors`]. Parsing the same text
    /// twice yields structurally identical trees.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::ParseError`] when Tree-sitter produces no tree
    /// or when the whole input is a single error node, meaning nothing in it
    /// could be tokenised by the grammar.
    pub fn parse(&mut self, text: impl Into<String>) -> Result<SyntaxTree, SyntaxError> {
        let source = text.into();
        let tree = self
            .inner
            .parse(&source, None)
            .ok_or_else(|| SyntaxError::parse(self.language, "parsing failed"))?;

        if tree.root_node().is_error() {
            return Err(SyntaxError::parse(
                self.language,
                "input could not be tokenised by the grammar",
            ));
        }

        Ok(SyntaxTree::new(tree, source, self.language))
    }
}
