//! Compound assignment operators and their expanded form.
//!
//! `x op= e` rewrites to `x = x op e` and back, for the ten arithmetic,
//! shift and bitwise operators.

use refract_syntax::{Edit, Node, SyntaxTree};

use crate::capture::{Match, role};
use crate::error::RewriteError;
use crate::shape;
use crate::transformation::{PatternMatcher, RewriteRule};

/// A binary operator with a compound assignment form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompoundOperator {
    /// `+=`
    Plus,
    /// `-=`
    Minus,
    /// `*=`
    Multiply,
    /// `/=`
    Divide,
    /// `%=`
    Modulo,
    /// `<<=`
    LeftShift,
    /// `>>=`
    RightShift,
    /// `&=`
    BitAnd,
    /// `|=`
    BitOr,
    /// `^=`
    BitXor,
}

impl CompoundOperator {
    /// Every operator, in catalogue order.
    pub const ALL: [Self; 10] = [
        Self::Plus,
        Self::Minus,
        Self::Multiply,
        Self::Divide,
        Self::Modulo,
        Self::LeftShift,
        Self::RightShift,
        Self::BitAnd,
        Self::BitOr,
        Self::BitXor,
    ];

    /// The binary operator token.
    #[must_use]
    pub const fn binary(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
        }
    }

    /// The compound assignment token.
    #[must_use]
    pub const fn compound(self) -> &'static str {
        match self {
            Self::Plus => "+=",
            Self::Minus => "-=",
            Self::Multiply => "*=",
            Self::Divide => "/=",
            Self::Modulo => "%=",
            Self::LeftShift => "<<=",
            Self::RightShift => ">>=",
            Self::BitAnd => "&=",
            Self::BitOr => "|=",
            Self::BitXor => "^=",
        }
    }

    /// The name stem used to build transformation names.
    #[must_use]
    pub const fn stem(self) -> &'static str {
        match self {
            Self::Plus => "plus_equal",
            Self::Minus => "minus_equal",
            Self::Multiply => "multiply_equal",
            Self::Divide => "divide_equal",
            Self::Modulo => "modulo_equal",
            Self::LeftShift => "left_shift_equal",
            Self::RightShift => "right_shift_equal",
            Self::BitAnd => "bitand_equal",
            Self::BitOr => "bitor_equal",
            Self::BitXor => "bitxor_equal",
        }
    }
}

/// Rewrites `x op= e` as `x = x op e`.
#[derive(Debug, Clone, Copy)]
pub struct ExpandCompound {
    operator: CompoundOperator,
}

impl ExpandCompound {
    /// Creates the expansion rule for `operator`.
    #[must_use]
    pub const fn new(operator: CompoundOperator) -> Self {
        Self { operator }
    }
}

impl PatternMatcher for ExpandCompound {
    fn match_node<'tree>(&self, tree: &'tree SyntaxTree, node: Node<'tree>) -> Option<Match<'tree>> {
        if node.kind() != "assignment_expression" {
            return None;
        }
        let assign = tree.field(node, "operator")?;
        if tree.text(assign) != self.operator.compound() {
            return None;
        }
        let target = tree.field(node, "left")?;
        let value = tree.field(node, "right")?;

        if !shape::is_simple_operand(tree, target)
            || shape::mutates(value)
            || !shape::in_statement_context(tree, node)
        {
            return None;
        }

        Some(
            Match::new(tree, node)
                .bind_node(tree, role::OPERAND, target)
                .bind_node(tree, role::VALUE, value),
        )
    }
}

impl RewriteRule for ExpandCompound {
    fn rewrite(&self, tree: &SyntaxTree, found: &Match<'_>) -> Result<Edit, RewriteError> {
        let target = found.require_text(role::OPERAND)?;
        let value = found.require_node(role::VALUE)?;
        let operand = if shape::needs_parentheses(tree, value.node()) {
            format!("({})", value.text())
        } else {
            value.text().to_owned()
        };
        Ok(Edit::new(
            found.span(),
            format!("{target} = {target} {} {operand}", self.operator.binary()),
        ))
    }
}

/// Rewrites `x = x op e` as `x op= e`.
#[derive(Debug, Clone, Copy)]
pub struct ContractCompound {
    operator: CompoundOperator,
}

impl ContractCompound {
    /// Creates the contraction rule for `operator`.
    #[must_use]
    pub const fn new(operator: CompoundOperator) -> Self {
        Self { operator }
    }
}

impl PatternMatcher for ContractCompound {
    fn match_node<'tree>(&self, tree: &'tree SyntaxTree, node: Node<'tree>) -> Option<Match<'tree>> {
        if node.kind() != "assignment_expression" {
            return None;
        }
        let assign = tree.field(node, "operator")?;
        if tree.text(assign) != "=" {
            return None;
        }
        let target = tree.field(node, "left")?;
        let binary = tree.field(node, "right")?;
        if binary.kind() != "binary_expression" {
            return None;
        }
        let operator = tree.field(binary, "operator")?;
        if tree.text(operator) != self.operator.binary() {
            return None;
        }
        // Binary expressions are left-associative, so only the outermost
        // left operand can be the repeated target.
        let repeated = tree.field(binary, "left")?;
        let value = tree.field(binary, "right")?;

        if !shape::is_simple_operand(tree, target)
            || !shape::same_tokens(tree, target, repeated)
            || shape::mutates(value)
            || !shape::in_statement_context(tree, node)
        {
            return None;
        }

        Some(
            Match::new(tree, node)
                .bind_node(tree, role::OPERAND, target)
                .bind_node(tree, role::VALUE, shape::unparenthesize(tree, value)),
        )
    }
}

impl RewriteRule for ContractCompound {
    fn rewrite(&self, _tree: &SyntaxTree, found: &Match<'_>) -> Result<Edit, RewriteError> {
        let target = found.require_text(role::OPERAND)?;
        let value = found.require_text(role::VALUE)?;
        Ok(Edit::new(
            found.span(),
            format!("{target} {} {value}", self.operator.compound()),
        ))
    }
}
