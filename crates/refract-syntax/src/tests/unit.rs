//! Unit tests for the tree adapter and tree editor.

use rstest::{fixture, rstest};

use crate::{Edit, EditError, EditorError, Parser, Span, SupportedLanguage, SyntaxTree, TreeEditor};

#[fixture]
fn cpp_parser() -> Parser {
    Parser::new(SupportedLanguage::Cpp).expect("parser init")
}

fn first_of_kind<'tree>(tree: &'tree SyntaxTree, kind: &str) -> tree_sitter::Node<'tree> {
    tree.preorder()
        .find(|node| node.kind() == kind)
        .unwrap_or_else(|| panic!("no {kind} node in {:?}", tree.source()))
}

// =============================================================================
// Parser Tests
// =============================================================================

#[rstest]
#[case(SupportedLanguage::Cpp, "int main() { return 0; }", false)]
#[case(SupportedLanguage::Cpp, "int main() { return 0;", true)]
#[case(SupportedLanguage::Cpp, "auto f() { return 1; }", false)]
#[case(SupportedLanguage::C, "int main(void) { return 0; }", false)]
#[case(SupportedLanguage::C, "int main(void) { return 0", true)]
fn parser_detects_errors(
    #[case] language: SupportedLanguage,
    #[case] source: &str,
    #[case] has_errors: bool,
) {
    let mut parser = Parser::new(language).expect("parser init");
    let tree = parser.parse(source).expect("parse");
    assert_eq!(tree.has_errors(), has_errors);
    assert_eq!(tree.errors().is_empty(), !has_errors);
    assert_eq!(tree.language(), language);
}

#[rstest]
fn parse_is_deterministic(mut cpp_parser: Parser) {
    let source = "int f(int a) { if (a) { a--; } return a * 2; }";
    let first = cpp_parser.parse(source).expect("parse");
    let second = cpp_parser.parse(source).expect("parse");
    assert_eq!(
        first.root_node().to_sexp(),
        second.root_node().to_sexp()
    );
}

#[rstest]
fn errors_carry_one_based_positions(mut cpp_parser: Parser) {
    let tree = cpp_parser
        .parse("int main() {\n  int x = ;\n}")
        .expect("parse");
    let errors = tree.errors();
    let first = errors.first().expect("at least one error");
    assert_eq!(first.line, 2);
    assert!(first.column >= 1);
}

// =============================================================================
// Traversal Tests
// =============================================================================

#[rstest]
fn traversal_exposes_structure(mut cpp_parser: Parser) {
    let tree = cpp_parser.parse("int main() { counter++; }").expect("parse");
    let update = first_of_kind(&tree, "update_expression");

    assert_eq!(tree.text(update), "counter++");
    assert_eq!(tree.span(update), Span::new(13, 22));

    let kinds: Vec<_> = tree.children(update).iter().map(|n| n.kind()).collect();
    assert_eq!(kinds, ["identifier", "++"]);

    let statement = tree.parent(update).expect("parent");
    assert_eq!(statement.kind(), "expression_statement");
    assert_eq!(tree.next_sibling(update).map(|n| n.kind()), Some(";"));
    assert_eq!(tree.prev_sibling(statement).map(|n| n.kind()), Some("{"));
    assert_eq!(
        tree.field(update, "argument").map(|n| tree.text(n)),
        Some("counter")
    );
}

#[rstest]
fn preorder_visits_parents_before_children(mut cpp_parser: Parser) {
    let tree = cpp_parser.parse("int a; int b;").expect("parse");
    let identifiers: Vec<_> = tree
        .preorder()
        .filter(|n| n.kind() == "identifier")
        .map(|n| tree.text(n))
        .collect();
    assert_eq!(identifiers, ["a", "b"]);

    let first = tree.preorder().next().expect("root");
    assert_eq!(first.kind(), "translation_unit");
}

#[rstest]
fn tokens_ignore_whitespace_and_comments(mut cpp_parser: Parser) {
    let tree = cpp_parser
        .parse("void f() { a[ i ].b = a[i] /* same */ .b; }")
        .expect("parse");
    let assignment = first_of_kind(&tree, "assignment_expression");
    let left = tree.field(assignment, "left").expect("left");
    let right = tree.field(assignment, "right").expect("right");
    assert_eq!(tree.tokens(left), tree.tokens(right));
    assert_ne!(tree.text(left), tree.text(right));
}

// =============================================================================
// Tree Editor Tests
// =============================================================================

#[rstest]
fn editor_returns_revalidated_tree(mut cpp_parser: Parser) {
    let tree = cpp_parser.parse("int main() { counter++; }").expect("parse");
    let update = first_of_kind(&tree, "update_expression");
    let edits = [Edit::new(tree.span(update), "counter = counter + 1")];

    let rewritten = TreeEditor::new(&mut cpp_parser)
        .apply(&tree, &edits)
        .expect("apply");

    assert_eq!(rewritten.source(), "int main() { counter = counter + 1; }");
    assert!(!rewritten.has_errors());
}

#[rstest]
fn editor_rejects_edits_that_break_syntax(mut cpp_parser: Parser) {
    let tree = cpp_parser.parse("int main() { counter++; }").expect("parse");
    let update = first_of_kind(&tree, "update_expression");
    let edits = [Edit::new(tree.span(update), "counter +")];

    let error = TreeEditor::new(&mut cpp_parser)
        .apply(&tree, &edits)
        .expect_err("broken rewrite");

    match error {
        EditorError::InvalidResult { introduced } => assert!(!introduced.is_empty()),
        other => panic!("unexpected error: {other}"),
    }
}

#[rstest]
fn editor_tolerates_errors_already_present(mut cpp_parser: Parser) {
    let tree = cpp_parser
        .parse("int main() { counter++; }\n@@\n")
        .expect("parse");
    assert!(tree.has_errors());
    let update = first_of_kind(&tree, "update_expression");
    let edits = [Edit::new(tree.span(update), "counter = counter + 1")];

    let rewritten = TreeEditor::new(&mut cpp_parser)
        .apply(&tree, &edits)
        .expect("pre-existing errors are not attributed to the edit");
    assert!(rewritten.source().contains("counter = counter + 1;"));
}

#[rstest]
fn editor_reports_overlap_without_reparsing(mut cpp_parser: Parser) {
    let tree = cpp_parser.parse("int main() { counter++; }").expect("parse");
    let edits = [
        Edit::new(Span::new(13, 22), "a"),
        Edit::new(Span::new(20, 23), "b"),
    ];

    let error = TreeEditor::new(&mut cpp_parser)
        .apply(&tree, &edits)
        .expect_err("overlap");

    assert!(matches!(
        error,
        EditorError::Edit(EditError::Overlapping { .. })
    ));
}

#[rstest]
fn edits_preserve_bytes_outside_their_spans(mut cpp_parser: Parser) {
    let source = "int main() {\n    // keep me\n    counter++;\n    return  0 ;\n}\n";
    let tree = cpp_parser.parse(source).expect("parse");
    let update = first_of_kind(&tree, "update_expression");
    let span = tree.span(update);
    let edits = [Edit::new(span, "counter = counter + 1")];

    let rewritten = TreeEditor::new(&mut cpp_parser)
        .apply(&tree, &edits)
        .expect("apply");
    let output = rewritten.source();

    let prefix = source.get(..span.start()).expect("prefix");
    let suffix = source.get(span.end()..).expect("suffix");
    assert!(output.starts_with(prefix));
    assert!(output.ends_with(suffix));
}
