//! Concrete syntax tree adapter.
//!
//! [`SyntaxTree`] owns a parsed Tree-sitter tree together with the source
//! buffer it was parsed from, so every node can be resolved back to its exact
//! text. The traversal helpers here are the only way the rest of the engine
//! navigates a tree; none of them mutate it.

use std::fmt;

use tree_sitter::{Node, TreeCursor};

use crate::edit::Span;
use crate::language::SupportedLanguage;

const CONTEXT_LIMIT: usize = 50;

/// An immutable parse of one source buffer.
///
/// Tree-sitter is error-tolerant: a tree may contain `ERROR` and `MISSING`
/// nodes for regions it could not parse. Use [`SyntaxTree::has_errors`] to
/// decide whether such input is acceptable.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    tree: tree_sitter::Tree,
    source: String,
    language: SupportedLanguage,
}

impl SyntaxTree {
    pub(crate) const fn new(
        tree: tree_sitter::Tree,
        source: String,
        language: SupportedLanguage,
    ) -> Self {
        Self {
            tree,
            source,
            language,
        }
    }

    /// Returns the source text the tree was parsed from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Consumes the tree, returning its source text.
    #[must_use]
    pub fn into_source(self) -> String {
        self.source
    }

    /// Returns the language of the parsed code.
    #[must_use]
    pub const fn language(&self) -> SupportedLanguage {
        self.language
    }

    /// Returns the root node of the syntax tree.
    #[must_use]
    pub fn root_node(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Returns whether the tree contains any `ERROR` or `MISSING` nodes.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Collects every syntax error in document order.
    #[must_use]
    pub fn errors(&self) -> Vec<SyntaxErrorInfo> {
        self.preorder()
            .filter(|node| node.is_error() || node.is_missing())
            .map(|node| SyntaxErrorInfo::from_node(node, &self.source))
            .collect()
    }

    /// Returns the exact source text covered by `node`.
    ///
    /// Nodes always come from this tree, so their spans are in bounds; an
    /// empty string is returned if a foreign node is passed in.
    #[must_use]
    pub fn text(&self, node: Node<'_>) -> &str {
        self.source.get(node.byte_range()).unwrap_or_default()
    }

    /// Returns the text covered by an arbitrary span of the source.
    #[must_use]
    pub fn slice(&self, span: Span) -> &str {
        self.source.get(span.range()).unwrap_or_default()
    }

    /// Returns the byte span of `node`.
    #[must_use]
    pub fn span(&self, node: Node<'_>) -> Span {
        Span::from(node.byte_range())
    }

    /// Returns all children of `node`, named and anonymous, in order.
    #[must_use]
    pub fn children<'tree>(&self, node: Node<'tree>) -> Vec<Node<'tree>> {
        let mut cursor = node.walk();
        node.children(&mut cursor).collect()
    }

    /// Returns the named children of `node` in order, skipping comments.
    #[must_use]
    pub fn named_children<'tree>(&self, node: Node<'tree>) -> Vec<Node<'tree>> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|child| child.kind() != "comment")
            .collect()
    }

    /// Returns the parent of `node`, or `None` for the root.
    #[must_use]
    pub fn parent<'tree>(&self, node: Node<'tree>) -> Option<Node<'tree>> {
        node.parent()
    }

    /// Returns the sibling immediately before `node`.
    #[must_use]
    pub fn prev_sibling<'tree>(&self, node: Node<'tree>) -> Option<Node<'tree>> {
        node.prev_sibling()
    }

    /// Returns the sibling immediately after `node`.
    #[must_use]
    pub fn next_sibling<'tree>(&self, node: Node<'tree>) -> Option<Node<'tree>> {
        node.next_sibling()
    }

    /// Returns the child of `node` stored under the grammar field `field`.
    #[must_use]
    pub fn field<'tree>(&self, node: Node<'tree>, field: &str) -> Option<Node<'tree>> {
        node.child_by_field_name(field)
    }

    /// Returns the leaf tokens of `node` in order.
    ///
    /// Two expressions with equal token sequences are textually identical
    /// regardless of the whitespace or comments between their tokens.
    #[must_use]
    pub fn tokens(&self, node: Node<'_>) -> Vec<&str> {
        Preorder::new(node)
            .filter(|descendant| descendant.child_count() == 0 && descendant.kind() != "comment")
            .map(|leaf| self.text(leaf))
            .collect()
    }

    /// Walks every node of the tree depth-first, pre-order, left to right.
    #[must_use]
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder::new(self.tree.root_node())
    }
}

/// Lazy depth-first, pre-order, left-to-right walk over a subtree.
///
/// The walk is driven by a [`TreeCursor`], so it allocates nothing per node
/// and never leaves the subtree it started from.
pub struct Preorder<'tree> {
    cursor: TreeCursor<'tree>,
    exhausted: bool,
}

impl<'tree> Preorder<'tree> {
    /// Starts a walk rooted at `node`.
    #[must_use]
    pub fn new(node: Node<'tree>) -> Self {
        Self {
            cursor: node.walk(),
            exhausted: false,
        }
    }
}

impl<'tree> Iterator for Preorder<'tree> {
    type Item = Node<'tree>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let current = self.cursor.node();
        if self.cursor.goto_first_child() {
            return Some(current);
        }
        loop {
            if self.cursor.goto_next_sibling() {
                return Some(current);
            }
            if !self.cursor.goto_parent() {
                self.exhausted = true;
                return Some(current);
            }
        }
    }
}

/// Information about a syntax error found during parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxErrorInfo {
    /// Byte span of the error in the source.
    pub span: Span,
    /// Line number (one-based) where the error starts.
    pub line: u32,
    /// Column number (one-based) where the error starts.
    pub column: u32,
    /// A snippet of the problematic source text.
    pub context: String,
    /// Human-readable description of the error.
    pub message: String,
}

impl SyntaxErrorInfo {
    fn from_node(node: Node<'_>, source: &str) -> Self {
        let span = Span::from(node.byte_range());
        let context = source
            .get(span.range())
            .map(|text| {
                if text.len() > CONTEXT_LIMIT {
                    let truncated: String = text.chars().take(CONTEXT_LIMIT - 3).collect();
                    format!("{truncated}...")
                } else {
                    text.to_owned()
                }
            })
            .unwrap_or_default();

        let message = if node.is_missing() {
            format!("missing {}", node.kind())
        } else {
            "syntax error".to_owned()
        };

        let start = node.start_position();
        Self {
            span,
            line: one_based(start.row),
            column: one_based(start.column),
            context,
            message,
        }
    }

    /// Returns the position-independent identity of this error.
    ///
    /// Edits shift offsets, so errors are compared across an edit by message
    /// and context only.
    #[must_use]
    pub fn signature(&self) -> (&str, &str) {
        (&self.message, &self.context)
    }
}

impl fmt::Display for SyntaxErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)?;
        if !self.context.is_empty() {
            write!(f, " near `{}`", self.context)?;
        }
        Ok(())
    }
}

// Line and column numbers will realistically never exceed u32::MAX.
fn one_based(zero_based: usize) -> u32 {
    u32::try_from(zero_based.saturating_add(1)).unwrap_or(u32::MAX)
}
