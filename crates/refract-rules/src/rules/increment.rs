//! Increment and decrement statements and their expanded assignment form.
//!
//! `x++`, `++x`, `x--` and `--x` in statement position rewrite to
//! `x = x + 1` / `x = x - 1`, and back. Polarity is preserved both ways.

use refract_syntax::{Edit, Node, SyntaxTree};

use crate::capture::{Match, role};
use crate::error::RewriteError;
use crate::shape;
use crate::transformation::{PatternMatcher, RewriteRule};

/// Whether an increment-family operation adds or subtracts one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// `++` / `+ 1`.
    Increment,
    /// `--` / `- 1`.
    Decrement,
}

impl Polarity {
    /// Reads the polarity of an update operator token.
    #[must_use]
    pub fn from_update_operator(token: &str) -> Option<Self> {
        match token {
            "++" => Some(Self::Increment),
            "--" => Some(Self::Decrement),
            _ => None,
        }
    }

    /// Reads the polarity of an additive binary operator token.
    #[must_use]
    pub fn from_binary_operator(token: &str) -> Option<Self> {
        match token {
            "+" => Some(Self::Increment),
            "-" => Some(Self::Decrement),
            _ => None,
        }
    }

    /// The update operator for this polarity.
    #[must_use]
    pub const fn update_operator(self) -> &'static str {
        match self {
            Self::Increment => "++",
            Self::Decrement => "--",
        }
    }

    /// The additive binary operator for this polarity.
    #[must_use]
    pub const fn binary_operator(self) -> &'static str {
        match self {
            Self::Increment => "+",
            Self::Decrement => "-",
        }
    }
}

fn polarity_of(found: &Match<'_>) -> Result<Polarity, RewriteError> {
    let operator = found.require_text(role::OPERATOR)?;
    Polarity::from_update_operator(operator)
        .or_else(|| Polarity::from_binary_operator(operator))
        .ok_or_else(|| RewriteError::unexpected_shape(format!("'{operator}' has no polarity")))
}

/// Matches `x++;`, `++x;`, `x--;` and `--x;`.
#[derive(Debug, Default, Clone, Copy)]
pub struct IncrementToAssignment;

impl PatternMatcher for IncrementToAssignment {
    fn match_node<'tree>(&self, tree: &'tree SyntaxTree, node: Node<'tree>) -> Option<Match<'tree>> {
        if node.kind() != "update_expression" {
            return None;
        }
        let operand = tree.field(node, "argument")?;
        let operator = tree.field(node, "operator")?;
        Polarity::from_update_operator(tree.text(operator))?;

        if !shape::in_statement_context(tree, node) || !shape::is_simple_operand(tree, operand) {
            return None;
        }

        Some(
            Match::new(tree, node)
                .bind_node(tree, role::OPERAND, operand)
                .bind_node(tree, role::OPERATOR, operator),
        )
    }
}

impl RewriteRule for IncrementToAssignment {
    fn rewrite(&self, _tree: &SyntaxTree, found: &Match<'_>) -> Result<Edit, RewriteError> {
        let operand = found.require_text(role::OPERAND)?;
        let polarity = polarity_of(found)?;
        Ok(Edit::new(
            found.span(),
            format!("{operand} = {operand} {} 1", polarity.binary_operator()),
        ))
    }
}

/// Matches `x = x + 1;` and `x = x - 1;` with a verbatim repeated target and
/// a literal `1`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssignmentToIncrement;

impl PatternMatcher for AssignmentToIncrement {
    fn match_node<'tree>(&self, tree: &'tree SyntaxTree, node: Node<'tree>) -> Option<Match<'tree>> {
        if node.kind() != "assignment_expression" {
            return None;
        }
        let assign = tree.field(node, "operator")?;
        if tree.text(assign) != "=" {
            return None;
        }
        let target = tree.field(node, "left")?;
        let value = tree.field(node, "right")?;
        if value.kind() != "binary_expression" {
            return None;
        }

        let operator = tree.field(value, "operator")?;
        Polarity::from_binary_operator(tree.text(operator))?;
        let repeated = tree.field(value, "left")?;
        let step = tree.field(value, "right")?;
        if step.kind() != "number_literal" || tree.text(step) != "1" {
            return None;
        }

        if !shape::is_simple_operand(tree, target)
            || !shape::same_tokens(tree, target, repeated)
            || !shape::in_statement_context(tree, node)
        {
            return None;
        }

        Some(
            Match::new(tree, node)
                .bind_node(tree, role::OPERAND, target)
                .bind_node(tree, role::OPERATOR, operator),
        )
    }
}

impl RewriteRule for AssignmentToIncrement {
    fn rewrite(&self, _tree: &SyntaxTree, found: &Match<'_>) -> Result<Edit, RewriteError> {
        let operand = found.require_text(role::OPERAND)?;
        let polarity = polarity_of(found)?;
        Ok(Edit::new(
            found.span(),
            format!("{operand}{}", polarity.update_operator()),
        ))
    }
}
