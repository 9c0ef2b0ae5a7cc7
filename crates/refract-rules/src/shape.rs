//! Structural predicates shared by the bundled matchers.

use refract_syntax::{Node, Preorder, SyntaxTree};

/// Node kinds whose evaluation may change program state.
const SIDE_EFFECT_KINDS: &[&str] = &[
    "call_expression",
    "update_expression",
    "assignment_expression",
    "new_expression",
    "delete_expression",
    "co_await_expression",
    "co_yield_statement",
    "throw_expression",
];

/// Returns true when the value of `expr` is discarded by its context.
///
/// That is the whole expression of an expression statement, the
/// initialiser or update clause of a `for` header, or an operand of a comma
/// expression found in one of those positions.
pub(crate) fn in_statement_context(tree: &SyntaxTree, expr: Node<'_>) -> bool {
    let mut current = expr;
    while let Some(parent) = tree.parent(current) {
        match parent.kind() {
            "expression_statement" => return true,
            "comma_expression" => current = parent,
            "for_statement" => {
                return is_field_of(tree, parent, "update", current)
                    || is_field_of(tree, parent, "initializer", current);
            }
            _ => return false,
        }
    }
    false
}

fn is_field_of(tree: &SyntaxTree, parent: Node<'_>, field: &str, child: Node<'_>) -> bool {
    tree.field(parent, field)
        .is_some_and(|candidate| candidate.id() == child.id())
}

/// Returns true for an lvalue that can be evaluated twice without changing
/// behaviour: a name, member access, subscript or dereference free of side
/// effects.
pub(crate) fn is_simple_operand(tree: &SyntaxTree, node: Node<'_>) -> bool {
    let shaped = match node.kind() {
        "identifier" | "qualified_identifier" | "field_expression" | "subscript_expression" => {
            true
        }
        "pointer_expression" => tree
            .field(node, "operator")
            .is_some_and(|operator| tree.text(operator) == "*"),
        _ => false,
    };
    shaped && !has_side_effects(node)
}

/// Returns true when evaluating `node` may change program state.
pub(crate) fn has_side_effects(node: Node<'_>) -> bool {
    Preorder::new(node).any(|descendant| SIDE_EFFECT_KINDS.contains(&descendant.kind()))
}

/// Returns true when `node` writes to a variable.
pub(crate) fn mutates(node: Node<'_>) -> bool {
    Preorder::new(node).any(|descendant| {
        matches!(
            descendant.kind(),
            "update_expression" | "assignment_expression"
        )
    })
}

/// Returns true when two expressions are made of the same tokens.
pub(crate) fn same_tokens(tree: &SyntaxTree, left: Node<'_>, right: Node<'_>) -> bool {
    tree.tokens(left) == tree.tokens(right)
}

/// Removes one level of parentheses unless they group a comma expression.
pub(crate) fn unparenthesize<'tree>(tree: &SyntaxTree, node: Node<'tree>) -> Node<'tree> {
    if node.kind() != "parenthesized_expression" {
        return node;
    }
    match tree.named_children(node).as_slice() {
        [inner] if inner.kind() != "comma_expression" => *inner,
        _ => node,
    }
}

/// Returns true when `node` must be parenthesised to stand as the right
/// operand of a binary operator.
pub(crate) fn needs_parentheses(tree: &SyntaxTree, node: Node<'_>) -> bool {
    matches!(
        node.kind(),
        "binary_expression" | "conditional_expression" | "assignment_expression" | "comma_expression"
    ) || tree.text(node).starts_with(['+', '-'])
}
