//! Pattern matchers, rewrite rules and the transformation registry.
//!
//! A [`Transformation`] pairs a [`PatternMatcher`], which locates trigger
//! shapes in a [`refract_syntax::SyntaxTree`] and binds their parts under
//! role names, with a [`RewriteRule`], which turns each [`Match`] into an
//! [`refract_syntax::Edit`]. Applying a transformation rewrites every match
//! at once and validates the result by re-parsing it.
//!
//! The [`catalogue`] lists every bundled transformation; a [`Registry`] is
//! the ordered subset enabled for one run.
//!
//! # Example
//!
//! ```
//! use refract_rules::{Registry, TransformationResult};
//! use refract_syntax::{Parser, SupportedLanguage};
//!
//! let registry = Registry::from_names(&["increment_to_assignment"], SupportedLanguage::Cpp)?;
//! let mut parser = Parser::new(SupportedLanguage::Cpp)?;
//! let tree = parser.parse("void f() { counter++; }")?;
//!
//! for transformation in &registry {
//!     let result = transformation.apply(&tree, &mut parser);
//!     assert_eq!(result.text(), Some("void f() { counter = counter + 1; }"));
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod capture;
mod error;
mod registry;
mod rules;
mod shape;
mod transformation;

pub use capture::{Binding, CapturedNode, Match, role};
pub use error::{RegistryError, RewriteError, TransformError};
pub use registry::{Registry, catalogue, lookup};
pub use rules::{
    AssignmentToIncrement, CompoundOperator, ContractCompound, ExpandCompound, ForToWhile,
    IncrementToAssignment, Polarity, ReturnTypeDeduction, ReturnTypeToAuto, WhileToFor,
};
pub use transformation::{PatternMatcher, RewriteRule, Transformation, TransformationResult};

#[cfg(test)]
mod tests;
