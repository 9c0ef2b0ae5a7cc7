//! Placeholder `auto` return types and concrete return types.

use refract_syntax::{Edit, Node, Preorder, SyntaxTree};

use crate::capture::{Match, role};
use crate::error::RewriteError;
use crate::rules::infer::{self, Scope};
use crate::transformation::{PatternMatcher, RewriteRule};

/// Return type kinds that can be spelled as a concrete name.
const CONCRETE_TYPE_KINDS: &[&str] = &[
    "primitive_type",
    "sized_type_specifier",
    "type_identifier",
    "qualified_identifier",
    "template_type",
];

/// The parts of a function definition both rules inspect.
struct FunctionParts<'tree> {
    return_type: Node<'tree>,
    name: &'tree str,
    body: Node<'tree>,
}

/// Splits a function definition whose declarator is a plain, unqualified
/// function declarator without a trailing return type. `main` is excluded.
fn function_parts<'tree>(tree: &'tree SyntaxTree, node: Node<'tree>) -> Option<FunctionParts<'tree>> {
    if node.kind() != "function_definition" {
        return None;
    }
    let return_type = tree.field(node, "type")?;
    let declarator = tree.field(node, "declarator")?;
    if declarator.kind() != "function_declarator" {
        return None;
    }
    if tree
        .children(declarator)
        .iter()
        .any(|child| child.kind() == "trailing_return_type")
    {
        return None;
    }
    let name_node = tree.field(declarator, "declarator")?;
    if !matches!(name_node.kind(), "identifier" | "field_identifier") {
        return None;
    }
    let name = tree.text(name_node);
    if name == "main" {
        return None;
    }
    let body = tree.field(node, "body")?;
    if body.kind() != "compound_statement" {
        return None;
    }
    Some(FunctionParts {
        return_type,
        name,
        body,
    })
}

fn is_auto_placeholder(tree: &SyntaxTree, node: Node<'_>) -> bool {
    matches!(node.kind(), "placeholder_type_specifier" | "auto") && tree.text(node) == "auto"
}

/// Replaces a placeholder `auto` return type with the single type every
/// `return` statement yields.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReturnTypeDeduction;

impl ReturnTypeDeduction {
    fn deduce(tree: &SyntaxTree, function: Node<'_>, body: Node<'_>) -> Option<String> {
        let returns = infer::own_returns(tree, body);
        if returns.is_empty() {
            return None;
        }
        let values: Vec<Option<Node<'_>>> = returns
            .iter()
            .map(|statement| infer::returned_value(tree, *statement))
            .collect();

        if values.iter().all(Option::is_none) {
            return Some("void".to_owned());
        }

        let scope = Scope::of_function(tree, function);
        let mut deduced: Option<String> = None;
        for value in values {
            let inferred = infer::infer(tree, &scope, value?)?;
            if deduced.as_ref().is_some_and(|previous| *previous != inferred) {
                return None;
            }
            deduced.get_or_insert(inferred);
        }
        deduced
    }
}

impl PatternMatcher for ReturnTypeDeduction {
    fn match_node<'tree>(&self, tree: &'tree SyntaxTree, node: Node<'tree>) -> Option<Match<'tree>> {
        let parts = function_parts(tree, node)?;
        if !is_auto_placeholder(tree, parts.return_type) {
            return None;
        }
        let deduced = Self::deduce(tree, node, parts.body)?;
        Some(
            Match::new(tree, node)
                .bind_node(tree, role::RETURN_TYPE, parts.return_type)
                .bind_value(role::DEDUCED, deduced),
        )
    }
}

impl RewriteRule for ReturnTypeDeduction {
    fn rewrite(&self, _tree: &SyntaxTree, found: &Match<'_>) -> Result<Edit, RewriteError> {
        let placeholder = found.require_node(role::RETURN_TYPE)?;
        let deduced = found.require_text(role::DEDUCED)?;
        Ok(Edit::new(placeholder.span(), deduced))
    }
}

/// Replaces a concrete return type with `auto`.
///
/// Virtual functions, functions returning `void`, functions that call
/// themselves and functions returning braced initialisers are left alone,
/// since deduction would change or break them.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReturnTypeToAuto;

impl ReturnTypeToAuto {
    fn deducible(tree: &SyntaxTree, name: &str, body: Node<'_>) -> bool {
        let values: Vec<Node<'_>> = infer::own_returns(tree, body)
            .into_iter()
            .filter_map(|statement| infer::returned_value(tree, statement))
            .collect();
        if values.is_empty()
            || values
                .iter()
                .any(|value| value.kind() == "initializer_list")
        {
            return false;
        }
        !Preorder::new(body).any(|node| {
            node.kind() == "call_expression"
                && tree
                    .field(node, "function")
                    .is_some_and(|callee| tree.text(callee) == name)
        })
    }
}

impl PatternMatcher for ReturnTypeToAuto {
    fn match_node<'tree>(&self, tree: &'tree SyntaxTree, node: Node<'tree>) -> Option<Match<'tree>> {
        let parts = function_parts(tree, node)?;
        if !CONCRETE_TYPE_KINDS.contains(&parts.return_type.kind())
            || infer::normalise_type(tree.text(parts.return_type)) == "void"
        {
            return None;
        }
        if tree
            .children(node)
            .iter()
            .any(|child| child.kind() == "virtual")
        {
            return None;
        }
        if !Self::deducible(tree, parts.name, parts.body) {
            return None;
        }
        Some(Match::new(tree, node).bind_node(tree, role::RETURN_TYPE, parts.return_type))
    }
}

impl RewriteRule for ReturnTypeToAuto {
    fn rewrite(&self, _tree: &SyntaxTree, found: &Match<'_>) -> Result<Edit, RewriteError> {
        let declared = found.require_node(role::RETURN_TYPE)?;
        Ok(Edit::new(declared.span(), "auto"))
    }
}
