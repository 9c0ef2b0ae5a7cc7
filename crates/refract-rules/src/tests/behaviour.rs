//! Behaviour-driven development (BDD) step definitions for refract-rules scenarios.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

use crate::{Registry, RegistryError, TransformationResult};
use refract_syntax::{Parser, SupportedLanguage};

/// State shared across BDD steps.
#[derive(Default)]
struct TestWorld {
    language: Option<SupportedLanguage>,
    source: Option<String>,
    result: Option<TransformationResult>,
    registry: Option<Result<Registry, RegistryError>>,
}

impl TestWorld {
    fn language(&self) -> SupportedLanguage {
        self.language.expect("language should be set")
    }

    fn run(&mut self, name: &str, source: &str) {
        let language = self.language();
        let registry = Registry::from_names(&[name], language).expect("registry");
        let transformation = registry.iter().next().expect("one transformation");
        let mut parser = Parser::new(language).expect("parser init");
        let tree = parser.parse(source).expect("parse");
        self.result = Some(transformation.apply(&tree, &mut parser));
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
    let mut w = world.borrow_mut();
    w.language = Some(SupportedLanguage::Cpp);
    w.source = Some(strip_quotes(&code).to_owned());
}

#[given("c source {code}")]
fn given_c_source(world: &RefCell<TestWorld>, code: String) {
    let mut w = world.borrow_mut();
    w.language = Some(SupportedLanguage::C);
    w.source = Some(strip_quotes(&code).to_owned());
}

#[when("the {name} transformation is applied")]
fn when_applied(world: &RefCell<TestWorld>, name: String) {
    let mut w = world.borrow_mut();
    let source = w.source.clone().expect("source should be set");
    w.run(strip_quotes(&name), &source);
}

#[when("the {name} transformation is applied to the result")]
fn when_applied_to_result(world: &RefCell<TestWorld>, name: String) {
    let mut w = world.borrow_mut();
    let previous = w
        .result
        .as_ref()
        .and_then(TransformationResult::text)
        .expect("previous transformation should have succeeded")
        .to_owned();
    w.run(strip_quotes(&name), &previous);
}

#[when("a registry is built with {name}")]
fn when_registry_built(world: &RefCell<TestWorld>, name: String) {
    let mut w = world.borrow_mut();
    let language = w.language();
    w.registry = Some(Registry::from_names(&[strip_quotes(&name)], language));
}

#[then("the result is {expected}")]
fn then_result(world: &RefCell<TestWorld>, expected: String) {
    let w = world.borrow();
    match w.result.as_ref().expect("a transformation should have run") {
        TransformationResult::Success(text) => assert_eq!(text, strip_quotes(&expected)),
        other => panic!("expected success, got {other:?}"),
    }
}

#[then("there is no match")]
fn then_no_match(world: &RefCell<TestWorld>) {
    let w = world.borrow();
    assert!(matches!(
        w.result.as_ref().expect("a transformation should have run"),
        TransformationResult::NoMatch
    ));
}

#[then("the registry rejects the language")]
fn then_registry_rejects_language(world: &RefCell<TestWorld>) {
    let w = world.borrow();
    assert!(matches!(
        w.registry.as_ref().expect("a registry should have been built"),
        Err(RegistryError::UnsupportedLanguage { .. })
    ));
}

#[scenario(
    path = "tests/features/refract_rules.feature",
    name = "Increment becomes an explicit assignment"
)]
fn increment_becomes_assignment(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/refract_rules.feature",
    name = "Increment rewrites are inverses"
)]
fn increment_round_trip(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/refract_rules.feature",
    name = "A non-literal step is not an increment"
)]
fn non_literal_step(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/refract_rules.feature",
    name = "An auto return type is made explicit"
)]
fn auto_return_type(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/refract_rules.feature",
    name = "A C for loop becomes a while loop"
)]
fn c_for_loop(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/refract_rules.feature",
    name = "Transformations limited to C++ are rejected for C"
)]
fn cpp_only_rejected(world: RefCell<TestWorld>) {
    drop(world);
}
