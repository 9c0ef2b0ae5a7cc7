//! `for` and `while` loop conversions.

use refract_syntax::{Edit, Node, Preorder, Span, SupportedLanguage, SyntaxTree, apply_edits};

use crate::capture::{Match, role};
use crate::error::RewriteError;
use crate::transformation::{PatternMatcher, RewriteRule};

/// Statements and expressions that start a new `continue` target or a new
/// function body.
const CONTINUE_BARRIERS: &[&str] = &[
    "for_statement",
    "for_range_loop",
    "while_statement",
    "do_statement",
    "lambda_expression",
    "class_specifier",
    "struct_specifier",
    "union_specifier",
];

/// The three clauses of a `for` header.
#[derive(Default)]
struct ForHeader<'tree> {
    initializer: Option<Node<'tree>>,
    condition: Option<Node<'tree>>,
    update: Option<Node<'tree>>,
}

fn is_declaration(node: Node<'_>) -> bool {
    node.kind().ends_with("declaration") || node.kind() == "type_definition"
}

/// Splits the header of a `for` statement on its `;` tokens.
///
/// A declaration initialiser owns its terminating `;`, so the split works
/// on the tokens between the parentheses rather than on field names.
fn for_header<'tree>(tree: &SyntaxTree, node: Node<'tree>) -> Option<ForHeader<'tree>> {
    let body = tree.field(node, "body")?;
    let mut header = ForHeader::default();
    let mut clause = 0_usize;
    let mut opened = false;

    for child in tree.children(node) {
        if child.start_byte() >= body.start_byte() {
            break;
        }
        match child.kind() {
            "(" if !opened => opened = true,
            ")" => break,
            ";" => clause = clause.saturating_add(1),
            "comment" => {}
            _ if !opened => {}
            _ => {
                let slot = match clause {
                    0 => &mut header.initializer,
                    1 => &mut header.condition,
                    2 => &mut header.update,
                    _ => return None,
                };
                if slot.replace(child).is_some() {
                    return None;
                }
                if clause == 0 && is_declaration(child) {
                    clause = 1;
                }
            }
        }
    }
    Some(header)
}

/// Returns true when a `continue` inside `body` would jump to the enclosing
/// loop's next iteration.
fn has_bound_continue(body: Node<'_>) -> bool {
    let mut pending = vec![body];
    while let Some(node) = pending.pop() {
        if node.kind() == "continue_statement" {
            return true;
        }
        if node.id() != body.id() && CONTINUE_BARRIERS.contains(&node.kind()) {
            continue;
        }
        let mut cursor = node.walk();
        pending.extend(node.children(&mut cursor));
    }
    false
}

/// Returns true when `node` is a `for` loop this rule can rewrite.
fn qualifies(tree: &SyntaxTree, node: Node<'_>) -> bool {
    if node.kind() != "for_statement" {
        return false;
    }
    let Some(header) = for_header(tree, node) else {
        return false;
    };
    if header.condition.is_some_and(is_declaration) {
        return false;
    }
    let nested_in_header = [header.initializer, header.condition, header.update]
        .into_iter()
        .flatten()
        .any(|clause| Preorder::new(clause).any(|inner| inner.kind() == "for_statement"));
    if nested_in_header {
        return false;
    }
    tree.field(node, "body")
        .is_some_and(|body| !has_bound_continue(body))
}

/// Finds the closest ancestor loop that qualifies for rewriting.
fn qualifying_ancestor<'tree>(tree: &SyntaxTree, node: Node<'tree>) -> Option<Node<'tree>> {
    let mut current = tree.parent(node);
    while let Some(candidate) = current {
        if qualifies(tree, candidate) {
            return Some(candidate);
        }
        current = tree.parent(candidate);
    }
    None
}

/// Rewrites `for (init; cond; update) body` as
/// `{ init while (cond) { body update; } }`.
///
/// A braced body stays a block of its own, so its declarations cannot
/// capture names in the update and a trailing line comment cannot swallow it.
///
/// Only outermost qualifying loops match; loops nested inside one are
/// rendered as part of its replacement so that edits never overlap.
#[derive(Debug, Default, Clone, Copy)]
pub struct ForToWhile;

impl ForToWhile {
    fn render(tree: &SyntaxTree, node: Node<'_>) -> Result<String, RewriteError> {
        let header = for_header(tree, node)
            .ok_or_else(|| RewriteError::unexpected_shape("unrecognised for header"))?;
        let body = tree
            .field(node, "body")
            .ok_or_else(|| RewriteError::unexpected_shape("for statement without body"))?;

        let rendered_body = Self::render_nested(tree, node, body)?;

        let mut text = String::from("{ ");
        if let Some(initializer) = header.initializer {
            text.push_str(tree.text(initializer));
            if !is_declaration(initializer) {
                text.push(';');
            }
            text.push(' ');
        }
        let condition = header.condition.map_or_else(
            || default_condition(tree.language()).to_owned(),
            |condition| tree.text(condition).to_owned(),
        );
        text.push_str(&format!("while ({condition}) {{ {}", rendered_body.trim_end()));
        if let Some(update) = header.update {
            text.push_str(&format!(" {};", tree.text(update)));
        }
        text.push_str(" } }");
        Ok(text)
    }

    /// Renders the source of `body` with every directly nested qualifying
    /// loop rewritten.
    fn render_nested(
        tree: &SyntaxTree,
        owner: Node<'_>,
        body: Node<'_>,
    ) -> Result<String, RewriteError> {
        let inner = tree.span(body);
        let mut edits = Vec::new();
        for nested in Preorder::new(body) {
            if !qualifies(tree, nested) {
                continue;
            }
            if qualifying_ancestor(tree, nested).is_none_or(|ancestor| ancestor.id() != owner.id()) {
                continue;
            }
            let span = Span::new(
                nested.start_byte().saturating_sub(inner.start()),
                nested.end_byte().saturating_sub(inner.start()),
            );
            edits.push(Edit::new(span, Self::render(tree, nested)?));
        }
        apply_edits(tree.slice(inner), &edits)
            .map_err(|error| RewriteError::unexpected_shape(error.to_string()))
    }
}

const fn default_condition(language: SupportedLanguage) -> &'static str {
    match language {
        SupportedLanguage::C => "1",
        SupportedLanguage::Cpp => "true",
    }
}

impl PatternMatcher for ForToWhile {
    fn match_node<'tree>(&self, tree: &'tree SyntaxTree, node: Node<'tree>) -> Option<Match<'tree>> {
        if !qualifies(tree, node) || qualifying_ancestor(tree, node).is_some() {
            return None;
        }
        let header = for_header(tree, node)?;
        Some(header.condition.map_or_else(
            || Match::new(tree, node),
            |condition| Match::new(tree, node).bind_node(tree, role::CONDITION, condition),
        ))
    }
}

impl RewriteRule for ForToWhile {
    fn rewrite(&self, tree: &SyntaxTree, found: &Match<'_>) -> Result<Edit, RewriteError> {
        let node = found.node().node();
        Ok(Edit::new(found.span(), Self::render(tree, node)?))
    }
}

/// Rewrites the head of `while (cond) body` as `for (; cond;)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct WhileToFor;

impl PatternMatcher for WhileToFor {
    fn match_node<'tree>(&self, tree: &'tree SyntaxTree, node: Node<'tree>) -> Option<Match<'tree>> {
        if node.kind() != "while_statement" {
            return None;
        }
        let clause = tree.field(node, "condition")?;
        let parts = tree.named_children(clause);
        let &[condition] = parts.as_slice() else {
            return None;
        };
        if is_declaration(condition) || condition.kind() == "init_statement" {
            return None;
        }
        Some(
            Match::new(tree, node)
                .bind_node(tree, role::CONDITION, condition)
                .bind_node(tree, role::HEAD, clause),
        )
    }
}

impl RewriteRule for WhileToFor {
    fn rewrite(&self, _tree: &SyntaxTree, found: &Match<'_>) -> Result<Edit, RewriteError> {
        let condition = found.require_text(role::CONDITION)?;
        let head = found.require_node(role::HEAD)?;
        Ok(Edit::new(
            Span::new(found.span().start(), head.span().end()),
            format!("for (; {condition};)"),
        ))
    }
}
