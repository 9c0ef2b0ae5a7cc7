//! Matcher and rewrite-rule seams, and the transformation that joins them.

use std::fmt;
use std::sync::Arc;

use refract_syntax::{Edit, Node, Parser, SupportedLanguage, SyntaxTree, TreeEditor};

use crate::capture::Match;
use crate::error::{RewriteError, TransformError};

/// Recognises one transformation's trigger shape.
pub trait PatternMatcher: Send + Sync {
    /// Tests a single node and returns a match when its local shape fits.
    fn match_node<'tree>(&self, tree: &'tree SyntaxTree, node: Node<'tree>) -> Option<Match<'tree>>;

    /// Lazily yields every match in `tree`, depth-first, pre-order, left to
    /// right.
    fn find_matches<'a, 'tree: 'a>(
        &'a self,
        tree: &'tree SyntaxTree,
    ) -> Box<dyn Iterator<Item = Match<'tree>> + 'a> {
        Box::new(
            tree.preorder()
                .filter_map(move |node| self.match_node(tree, node)),
        )
    }
}

/// Turns a match into the edit that rewrites it. Implementations are pure.
pub trait RewriteRule: Send + Sync {
    /// Produces the replacement for the matched span.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError`] when the match lacks the bindings the rule
    /// reads.
    fn rewrite(&self, tree: &SyntaxTree, found: &Match<'_>) -> Result<Edit, RewriteError>;
}

/// Outcome of applying one transformation to one source text.
#[derive(Debug, Clone)]
pub enum TransformationResult {
    /// The rewritten source text.
    Success(String),
    /// The trigger pattern does not occur.
    NoMatch,
    /// The transformation failed; the input must not be emitted as
    /// transformed.
    Failure(TransformError),
}

impl TransformationResult {
    /// Returns the rewritten text on success.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Success(text) => Some(text),
            Self::NoMatch | Self::Failure(_) => None,
        }
    }
}

/// A named pairing of a matcher and a rewrite rule.
#[derive(Clone)]
pub struct Transformation {
    name: String,
    description: String,
    languages: &'static [SupportedLanguage],
    matcher: Arc<dyn PatternMatcher>,
    rewriter: Arc<dyn RewriteRule>,
}

impl Transformation {
    /// Creates a transformation from a type that both matches and rewrites.
    #[must_use]
    pub fn new<R>(
        name: impl Into<String>,
        description: impl Into<String>,
        languages: &'static [SupportedLanguage],
        rule: R,
    ) -> Self
    where
        R: PatternMatcher + RewriteRule + 'static,
    {
        let shared = Arc::new(rule);
        let matcher: Arc<dyn PatternMatcher> = Arc::clone(&shared) as Arc<dyn PatternMatcher>;
        let rewriter: Arc<dyn RewriteRule> = shared;
        Self::from_parts(name, description, languages, matcher, rewriter)
    }

    /// Creates a transformation from a separate matcher and rule.
    #[must_use]
    pub fn from_parts(
        name: impl Into<String>,
        description: impl Into<String>,
        languages: &'static [SupportedLanguage],
        matcher: Arc<dyn PatternMatcher>,
        rewriter: Arc<dyn RewriteRule>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            languages,
            matcher,
            rewriter,
        }
    }

    /// Stable name used in configuration, output records and logs.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// One-line description of the rewrite.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Languages this transformation applies to.
    #[must_use]
    pub const fn languages(&self) -> &'static [SupportedLanguage] {
        self.languages
    }

    /// Returns true when the transformation applies to `language`.
    #[must_use]
    pub fn supports(&self, language: SupportedLanguage) -> bool {
        self.languages.contains(&language)
    }

    /// Lazily yields the matches of this transformation in `tree`.
    pub fn find_matches<'a, 'tree: 'a>(
        &'a self,
        tree: &'tree SyntaxTree,
    ) -> impl Iterator<Item = Match<'tree>> + 'a {
        self.matcher.find_matches(tree)
    }

    /// Applies the transformation to `tree`.
    ///
    /// Every match is rewritten, the edits are applied together and the
    /// result is re-parsed with `parser`, which must be configured for the
    /// tree's language. The tree itself is never modified.
    pub fn apply(&self, tree: &SyntaxTree, parser: &mut Parser) -> TransformationResult {
        let matches: Vec<Match<'_>> = self.find_matches(tree).collect();
        if matches.is_empty() {
            return TransformationResult::NoMatch;
        }

        let edits = match matches
            .iter()
            .map(|found| self.rewriter.rewrite(tree, found))
            .collect::<Result<Vec<_>, _>>()
        {
            Ok(edits) => edits,
            Err(error) => return TransformationResult::Failure(error.into()),
        };

        match TreeEditor::new(parser).apply(tree, &edits) {
            Ok(rewritten) => TransformationResult::Success(rewritten.into_source()),
            Err(error) => TransformationResult::Failure(error.into()),
        }
    }
}

impl fmt::Debug for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transformation")
            .field("name", &self.name)
            .field("languages", &self.languages)
            .finish_non_exhaustive()
    }
}
