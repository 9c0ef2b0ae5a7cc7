//! Behaviour-driven development (BDD) step definitions for refract-syntax scenarios.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

use crate::{
    Edit, EditError, EditorError, Parser, Span, SupportedLanguage, SyntaxTree, TreeEditor,
};

/// State shared across BDD steps.
#[derive(Default)]
struct TestWorld {
    language: Option<SupportedLanguage>,
    tree: Option<SyntaxTree>,
    outcome: Option<Result<SyntaxTree, EditorError>>,
}

impl TestWorld {
    fn parse(&mut self, language: SupportedLanguage, code: &str) {
        let mut parser = Parser::new(language).expect("parser init");
        self.tree = Some(parser.parse(code).expect("parse"));
        self.language = Some(language);
    }

    fn apply(&mut self, edits: &[Edit]) {
        let language = self.language.expect("language should be set");
        let tree = self.tree.as_ref().expect("source should be parsed");
        let mut parser = Parser::new(language).expect("parser init");
        self.outcome = Some(TreeEditor::new(&mut parser).apply(tree, edits));
    }

    fn error(&self) -> &EditorError {
        match self.outcome.as_ref().expect("an edit should have been applied") {
            Ok(tree) => panic!("expected failure, got {:?}", tree.source()),
            Err(error) => error,
        }
    }
}

#[fixture]
fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::default())
}

/// Strips surrounding double quotes from a string if present.
fn strip_quotes(s: &str) -> &str {
    s.trim_matches('"')
}

#[given("cpp source {code}")]
fn given_cpp_source(world: &RefCell<TestWorld>, code: String) {
    world
        .borrow_mut()
        .parse(SupportedLanguage::Cpp, strip_quotes(&code));
}

#[given("c source {code}")]
fn given_c_source(world: &RefCell<TestWorld>, code: String) {
    world
        .borrow_mut()
        .parse(SupportedLanguage::C, strip_quotes(&code));
}

#[when("the first {kind} is replaced with {replacement}")]
fn when_first_kind_replaced(world: &RefCell<TestWorld>, kind: String, replacement: String) {
    let mut w = world.borrow_mut();
    let span = {
        let tree = w.tree.as_ref().expect("source should be parsed");
        let node = tree
            .preorder()
            .find(|n| n.kind() == strip_quotes(&kind))
            .expect("node of requested kind");
        tree.span(node)
    };
    w.apply(&[Edit::new(span, strip_quotes(&replacement))]);
}

#[when("bytes {a} to {b} and bytes {c} to {d} are both replaced")]
fn when_two_spans_replaced(world: &RefCell<TestWorld>, a: usize, b: usize, c: usize, d: usize) {
    world.borrow_mut().apply(&[
        Edit::new(Span::new(a, b), "first"),
        Edit::new(Span::new(c, d), "second"),
    ]);
}

#[then("the tree has no syntax errors")]
fn then_no_errors(world: &RefCell<TestWorld>) {
    let w = world.borrow();
    let tree = w.tree.as_ref().expect("source should be parsed");
    assert!(!tree.has_errors(), "errors: {:?}", tree.errors());
}

#[then("the tree has syntax errors")]
fn then_has_errors(world: &RefCell<TestWorld>) {
    let w = world.borrow();
    let tree = w.tree.as_ref().expect("source should be parsed");
    assert!(tree.has_errors());
}

#[then("the edited source is {expected}")]
fn then_edited_source(world: &RefCell<TestWorld>, expected: String) {
    let w = world.borrow();
    match w.outcome.as_ref().expect("an edit should have been applied") {
        Ok(tree) => assert_eq!(tree.source(), strip_quotes(&expected)),
        Err(error) => panic!("edit failed: {error}"),
    }
}

#[then("the edit fails because spans overlap")]
fn then_overlap(world: &RefCell<TestWorld>) {
    let w = world.borrow();
    assert!(matches!(
        w.error(),
        EditorError::Edit(EditError::Overlapping { .. })
    ));
}

#[then("the edit fails because it introduced syntax errors")]
fn then_invalid_result(world: &RefCell<TestWorld>) {
    let w = world.borrow();
    assert!(matches!(w.error(), EditorError::InvalidResult { .. }));
}

#[scenario(
    path = "tests/features/refract_syntax.feature",
    name = "Valid C++ source parses cleanly"
)]
fn valid_cpp_parses(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/refract_syntax.feature",
    name = "Unterminated function body is reported"
)]
fn unterminated_body_reported(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/refract_syntax.feature",
    name = "Valid C source parses cleanly"
)]
fn valid_c_parses(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/refract_syntax.feature",
    name = "Replacing a node rewrites only its span"
)]
fn replacing_node(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/refract_syntax.feature",
    name = "Overlapping edits are rejected"
)]
fn overlapping_rejected(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/refract_syntax.feature",
    name = "An edit that breaks the syntax is rejected"
)]
fn breaking_edit_rejected(world: RefCell<TestWorld>) {
    drop(world);
}
