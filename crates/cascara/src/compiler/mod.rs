//! Compilation orchestration.
//!
//! [`compile`] drives a list of entry files through parse, import
//! graph traversal, transform, and print. Each in-flight file and each
//! output runs on its own scoped thread, with the scope join acting as
//! the stage barrier. Work is deduplicated by absolute path: a file
//! imported many times is read, parsed, and transformed once.
//!
//! Errors never abort the compilation; they accumulate in the
//! [`Reporter`] and the affected file simply produces no output.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::ast::{AtRuleId, Node, Stylesheet};
use crate::error::{Diagnostic, Error, Result};
use crate::parser;
use crate::printer;
use crate::reporter::{ConsoleReporter, Reporter};
use crate::resolver::{NodeResolver, Resolver};
use crate::source::{Source, Span};
use crate::transform::{self, ImportRules, TransformOptions};

/// The set of options for [`compile`].
#[derive(Default)]
pub struct Options {
    /// The files to start parsing from.
    pub entries: Vec<PathBuf>,
    /// Which transforms to run. By default, none.
    pub transforms: TransformOptions,
    /// Append an embedded source map to every output file.
    pub source_maps: bool,
    /// Error and warning sink. Defaults to [`ConsoleReporter`].
    pub reporter: Option<Arc<dyn Reporter>>,
    /// Import path resolver. Defaults to [`NodeResolver`].
    pub resolver: Option<Arc<dyn Resolver>>,
}

/// The result of a compilation. Errors are delivered through the
/// reporter instead; a failed file is absent from `files`.
#[derive(Debug, Default)]
pub struct CompileResult {
    /// Minified output text keyed by absolute source path.
    pub files: HashMap<PathBuf, String>,
}

/// Compile the entry files with the given options.
pub fn compile(options: Options) -> CompileResult {
    let Options {
        entries,
        transforms,
        source_maps,
        reporter,
        resolver,
    } = options;

    let compilation = Compilation {
        transforms,
        source_maps,
        reporter: reporter.unwrap_or_else(|| Arc::new(ConsoleReporter)),
        resolver: resolver.unwrap_or_else(|| Arc::new(NodeResolver::default())),
        table: RwLock::new(SourceTable::default()),
        asts_by_index: RwLock::new(HashMap::new()),
        outputs: Mutex::new(HashSet::new()),
        files: Mutex::new(HashMap::new()),
    };
    compilation.run(entries)
}

/// Interned sources. Indices are assigned monotonically under the
/// write lock; the per-index lockers provide the single-flight
/// guarantee for parsing.
#[derive(Default)]
struct SourceTable {
    by_path: HashMap<PathBuf, usize>,
    by_index: Vec<Arc<Source>>,
    lockers: Vec<Arc<Mutex<()>>>,
}

struct Compilation {
    transforms: TransformOptions,
    source_maps: bool,
    reporter: Arc<dyn Reporter>,
    resolver: Arc<dyn Resolver>,

    table: RwLock<SourceTable>,
    /// Memoized post-transform ASTs.
    asts_by_index: RwLock<HashMap<usize, Arc<Stylesheet>>>,
    /// Indices that must be emitted.
    outputs: Mutex<HashSet<usize>>,
    files: Mutex<HashMap<PathBuf, String>>,
}

impl Compilation {
    fn run(self, entries: Vec<PathBuf>) -> CompileResult {
        std::thread::scope(|scope| {
            for entry in &entries {
                let compilation = &self;
                scope.spawn(move || {
                    compilation.parse_file(entry, true, &[]);
                });
            }
        });

        let outputs: Vec<usize> = self.outputs.lock().iter().copied().collect();
        std::thread::scope(|scope| {
            for index in outputs {
                let compilation = &self;
                scope.spawn(move || compilation.emit_output(index));
            }
        });

        CompileResult {
            files: self.files.into_inner(),
        }
    }

    /// Read `path` and assign it a source index, or return the
    /// existing index if the path is already known.
    fn add_source(&self, path: &Path) -> Result<usize> {
        let abs = std::path::absolute(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        {
            let table = self.table.read();
            if let Some(&index) = table.by_path.get(&abs) {
                return Ok(index);
            }
        }

        let contents = std::fs::read_to_string(&abs).map_err(|source| Error::Io {
            path: abs.clone(),
            source,
        })?;

        let mut table = self.table.write();
        // Another thread may have read the same file while we did.
        if let Some(&index) = table.by_path.get(&abs) {
            return Ok(index);
        }
        let index = table.by_index.len();
        table.by_path.insert(abs.clone(), index);
        table.by_index.push(Arc::new(Source::new(abs, contents)));
        table.lockers.push(Arc::new(Mutex::new(())));
        Ok(index)
    }

    fn source(&self, index: usize) -> Arc<Source> {
        self.table.read().by_index[index].clone()
    }

    /// Parse, traverse imports, and transform one file, memoized by
    /// source index. `ancestry` is the chain of indices currently
    /// being parsed on this traversal path; an import that leads back
    /// into the chain is a cycle, reported as a warning and broken by
    /// leaving that `@import` as written.
    ///
    /// Returns the post-transform AST, or `None` when the file failed
    /// to load or parse.
    fn parse_file(&self, path: &Path, has_output: bool, ancestry: &[usize]) -> Option<Arc<Stylesheet>> {
        let index = match self.add_source(path) {
            Ok(index) => index,
            Err(error) => {
                self.reporter.add_error(error);
                return None;
            }
        };

        if has_output {
            self.outputs.lock().insert(index);
        }

        // Single flight per index: concurrent callers wait here and
        // then take the memoized fast path.
        let locker = self.table.read().lockers[index].clone();
        let _guard = locker.lock();

        if let Some(ast) = self.asts_by_index.read().get(&index) {
            return Some(ast.clone());
        }

        let source = self.source(index);
        let stylesheet = match parser::parse(&source) {
            Ok(stylesheet) => stylesheet,
            Err(error) => {
                self.reporter.add_error(error);
                return None;
            }
        };

        // Feed the imported files into the compilation concurrently,
        // collecting their ASTs keyed by the identity of the @import
        // rule that referenced them. Under follow, every imported file
        // becomes an output of its own.
        let parent_dir = source
            .path()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let mut chain = ancestry.to_vec();
        chain.push(index);
        let follow = self.transforms.import_rules == ImportRules::Follow;

        let replacements: Mutex<HashMap<AtRuleId, Arc<Stylesheet>>> = Mutex::new(HashMap::new());
        std::thread::scope(|scope| {
            for import in &stylesheet.imports {
                let source = &source;
                let stylesheet = &stylesheet;
                let parent_dir = &parent_dir;
                let chain = &chain;
                let replacements = &replacements;
                scope.spawn(move || {
                    let resolved = match self.resolver.resolve(&import.value, parent_dir) {
                        Ok(resolved) => resolved,
                        Err(error) => {
                            self.reporter.add_error(error);
                            return;
                        }
                    };

                    let resolved_index = match self.add_source(&resolved) {
                        Ok(resolved_index) => resolved_index,
                        Err(error) => {
                            self.reporter.add_error(error);
                            return;
                        }
                    };

                    // An import that leads back to a file still being
                    // parsed on this traversal path is a cycle; warn
                    // and leave the @import as written.
                    if chain.contains(&resolved_index) {
                        self.reporter.add_error(Error::Transform(Diagnostic::warning(
                            source,
                            at_rule_span(stylesheet, import.rule),
                            "import cycle detected; leaving @import as written",
                        )));
                        return;
                    }

                    if let Some(imported) = self.parse_file(&resolved, follow, chain) {
                        replacements.lock().insert(import.rule, imported);
                    }
                });
            }
        });
        let replacements = replacements.into_inner();

        let transformed = transform::transform(
            stylesheet,
            &self.transforms,
            &source,
            self.reporter.as_ref(),
            &replacements,
        );
        let ast = Arc::new(transformed);
        self.asts_by_index.write().insert(index, ast.clone());
        Some(ast)
    }

    fn emit_output(&self, index: usize) {
        // A file that failed to read or parse has no AST; skip it.
        let Some(ast) = self.asts_by_index.read().get(&index).cloned() else {
            return;
        };
        let source = self.source(index);

        let output = if self.source_maps {
            printer::print_with_source_map(&ast, &source)
        } else {
            printer::print(&ast)
        };

        self.files
            .lock()
            .insert(source.path().to_path_buf(), output);
    }
}

/// The span of the at-rule with the given identity, for anchoring
/// diagnostics about an import to the rule that wrote it.
fn at_rule_span(stylesheet: &Stylesheet, id: AtRuleId) -> Span {
    stylesheet
        .nodes
        .iter()
        .find_map(|node| match node {
            Node::AtRule(rule) if rule.id == id => Some(rule.span),
            _ => None,
        })
        .unwrap_or_default()
}
