//! Matches and their role bindings.
//!
//! A matcher binds the parts of a located pattern that its rewrite rule needs
//! under fixed role names, so rules never re-scan source text.

use std::collections::BTreeMap;

use refract_syntax::{Node, Span, SyntaxTree};

use crate::error::RewriteError;

/// Role names shared by the bundled matchers and rewrite rules.
pub mod role {
    /// The lvalue being updated or assigned.
    pub const OPERAND: &str = "operand";
    /// The operator token carrying the polarity of an increment-family match.
    pub const OPERATOR: &str = "operator";
    /// The right-hand side of an assignment.
    pub const VALUE: &str = "value";
    /// The declared return type of a function definition.
    pub const RETURN_TYPE: &str = "return_type";
    /// The concrete type deduced for a placeholder return type.
    pub const DEDUCED: &str = "deduced";
    /// The condition of a loop.
    pub const CONDITION: &str = "condition";
    /// The parenthesised head of a loop.
    pub const HEAD: &str = "head";
}

/// A single captured syntax node with its source text.
#[derive(Debug, Clone, Copy)]
pub struct CapturedNode<'tree> {
    node: Node<'tree>,
    text: &'tree str,
}

impl<'tree> CapturedNode<'tree> {
    /// Captures `node` from `tree`.
    #[must_use]
    pub fn new(tree: &'tree SyntaxTree, node: Node<'tree>) -> Self {
        Self {
            node,
            text: tree.text(node),
        }
    }

    /// Returns the captured node.
    #[must_use]
    pub const fn node(&self) -> Node<'tree> {
        self.node
    }

    /// Returns the text of the captured node.
    #[must_use]
    pub const fn text(&self) -> &'tree str {
        self.text
    }

    /// Returns the byte span of the captured node.
    #[must_use]
    pub fn span(&self) -> Span {
        Span::from(self.node.byte_range())
    }
}

/// A value bound to a role.
#[derive(Debug, Clone)]
pub enum Binding<'tree> {
    /// A sub-node of the match.
    Node(CapturedNode<'tree>),
    /// A value derived while matching, such as a deduced type name.
    Value(String),
}

impl Binding<'_> {
    /// Returns the bound text: the node's source text or the derived value.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Node(captured) => captured.text(),
            Self::Value(value) => value,
        }
    }
}

/// A located occurrence of a transformation's trigger pattern.
#[derive(Debug, Clone)]
pub struct Match<'tree> {
    node: CapturedNode<'tree>,
    bindings: BTreeMap<&'static str, Binding<'tree>>,
}

impl<'tree> Match<'tree> {
    /// Creates a match rooted at `node` with no bindings.
    #[must_use]
    pub fn new(tree: &'tree SyntaxTree, node: Node<'tree>) -> Self {
        Self {
            node: CapturedNode::new(tree, node),
            bindings: BTreeMap::new(),
        }
    }

    /// Binds a sub-node under `role`.
    #[must_use]
    pub fn bind_node(mut self, tree: &'tree SyntaxTree, role: &'static str, node: Node<'tree>) -> Self {
        self.bindings
            .insert(role, Binding::Node(CapturedNode::new(tree, node)));
        self
    }

    /// Binds a derived value under `role`.
    #[must_use]
    pub fn bind_value(mut self, role: &'static str, value: impl Into<String>) -> Self {
        self.bindings.insert(role, Binding::Value(value.into()));
        self
    }

    /// Returns the matched node.
    #[must_use]
    pub const fn node(&self) -> CapturedNode<'tree> {
        self.node
    }

    /// Returns the span of the matched node.
    #[must_use]
    pub fn span(&self) -> Span {
        self.node.span()
    }

    /// Returns the binding for `role`, if any.
    #[must_use]
    pub fn binding(&self, role: &str) -> Option<&Binding<'tree>> {
        self.bindings.get(role)
    }

    /// Returns the node bound to `role`.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::MissingBinding`] when the role is unbound or
    /// bound to a derived value.
    pub fn require_node(&self, role: &'static str) -> Result<CapturedNode<'tree>, RewriteError> {
        match self.bindings.get(role) {
            Some(Binding::Node(captured)) => Ok(*captured),
            _ => Err(RewriteError::missing_binding(role)),
        }
    }

    /// Returns the text bound to `role`.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::MissingBinding`] when the role is unbound.
    pub fn require_text(&self, role: &'static str) -> Result<&str, RewriteError> {
        self.bindings
            .get(role)
            .map(Binding::text)
            .ok_or_else(|| RewriteError::missing_binding(role))
    }
}
