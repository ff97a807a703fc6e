//! cascara: a CSS compiler.
//!
//! The pipeline ingests one or more entry files, resolves their
//! `@import` graph, parses each source into a span-annotated syntax
//! tree, rewrites the tree under configurable transforms, and emits
//! minified CSS with optional embedded source maps.
//!
//! Accepted input is CSS Syntax Level 3 plus a set of extensions:
//! media query ranges and `@custom-media`, `:any-link` and functional
//! pseudo-classes, custom properties with `var()`, hex colors, and the
//! `calc()` family.
//!
//! # Example
//!
//! ```no_run
//! use cascara::{compile, Options};
//! use cascara::transform::{ImportRules, TransformOptions};
//!
//! let result = compile(Options {
//!     entries: vec!["styles/app.css".into()],
//!     transforms: TransformOptions {
//!         import_rules: ImportRules::Inline,
//!         ..Default::default()
//!     },
//!     ..Default::default()
//! });
//!
//! for (path, css) in &result.files {
//!     println!("{}: {} bytes", path.display(), css.len());
//! }
//! ```
//!
//! Compilation never fails as a whole: problems are delivered to the
//! configured [`Reporter`] and affected files are simply absent from
//! the result.

pub mod ast;
pub mod compiler;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod reporter;
pub mod resolver;
pub mod source;
pub mod transform;

pub use compiler::{compile, CompileResult, Options};
pub use error::{Diagnostic, Error, Result, Severity};
pub use reporter::{ConsoleReporter, MemoryReporter, Reporter};
pub use resolver::{NodeResolver, Resolver};
pub use source::{Source, Span};
pub use transform::TransformOptions;
