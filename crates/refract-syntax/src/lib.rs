//! Tree-sitter powered syntax layer for the refract transformation engine.
//!
//! This crate provides the two leaf components of the engine:
//!
//! - **Tree adapter** via [`Parser`] and [`SyntaxTree`]: parses C++ or C
//!   source into a concrete syntax tree whose nodes resolve to exact byte
//!   spans, with traversal helpers and error-node inspection
//! - **Tree editor** via [`apply_edits`] and [`TreeEditor`]: applies
//!   non-overlapping span replacements and re-parses the result so that a
//!   rewrite never introduces a syntax error
//!
//! # Supported Languages
//!
//! - C++ (`.cpp`, `.cc`, `.cxx`, `.hpp`, `.h`)
//! - C (`.c`)
//!
//! # Example
//!
//! ```
//! use refract_syntax::{Edit, Parser, SupportedLanguage, TreeEditor};
//!
//! let mut parser = Parser::new(SupportedLanguage::Cpp)?;
//! let tree = parser.parse("int main() { counter++; }")?;
//!
//! let update = tree
//!     .preorder()
//!     .find(|node| node.kind() == "update_expression")
//!     .expect("update expression");
//! let edit = Edit::new(tree.span(update), "counter = counter + 1");
//!
//! let rewritten = TreeEditor::new(&mut parser).apply(&tree, &[edit])?;
//! assert_eq!(rewritten.source(), "int main() { counter = counter + 1; }");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod edit;
mod editor;
mod error;
mod language;
mod parser;
mod tree;

pub use edit::{Edit, Span, apply_edits};
pub use editor::{TreeEditor, introduced_errors};
pub use error::{EditError, EditorError, SyntaxError};
pub use language::{LanguageParseError, SupportedLanguage};
pub use parser::Parser;
pub use tree::{Preorder, SyntaxErrorInfo, SyntaxTree};
pub use tree_sitter::Node;
