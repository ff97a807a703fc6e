//! Multi-file compilation: import graph traversal, deduplication,
//! failure handling, and output determinism.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cascara::transform::{CustomProperties, ImportRules, TransformOptions};
use cascara::{compile, CompileResult, MemoryReporter, Options};

fn write_tree(files: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    for (name, contents) in files {
        let path = dir.path().join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }
    dir
}

fn compile_with(
    root: &Path,
    entries: &[&str],
    transforms: TransformOptions,
) -> (CompileResult, Arc<MemoryReporter>) {
    let reporter = Arc::new(MemoryReporter::new());
    let result = compile(Options {
        entries: entries.iter().map(|name| root.join(name)).collect(),
        transforms,
        source_maps: false,
        reporter: Some(reporter.clone()),
        resolver: None,
    });
    (result, reporter)
}

fn output_for<'r>(result: &'r CompileResult, root: &Path, name: &str) -> &'r str {
    let abs = std::path::absolute(root.join(name)).unwrap();
    result
        .files
        .get(&abs)
        .unwrap_or_else(|| panic!("missing output for {name}: have {:?}", result.files.keys()))
}

#[test]
fn import_inlining() {
    let dir = write_tree(&[
        ("a.css", "@import \"b.css\";\n.a{color:red}"),
        ("b.css", ".b{color:blue}"),
    ]);

    let transforms = TransformOptions {
        import_rules: ImportRules::Inline,
        ..Default::default()
    };
    let (result, reporter) = compile_with(dir.path(), &["a.css"], transforms);

    assert!(reporter.is_empty());
    assert_eq!(result.files.len(), 1);
    assert_eq!(
        output_for(&result, dir.path(), "a.css"),
        ".b{color:blue}.a{color:red}"
    );
}

#[test]
fn import_passthrough() {
    let dir = write_tree(&[
        ("a.css", "@import \"b.css\";\n.a{color:red}"),
        ("b.css", ".b{color:blue}"),
    ]);

    let (result, reporter) = compile_with(dir.path(), &["a.css"], TransformOptions::default());

    assert!(reporter.is_empty());
    assert_eq!(result.files.len(), 1);
    assert_eq!(
        output_for(&result, dir.path(), "a.css"),
        "@import \"b.css\";.a{color:red}"
    );
}

#[test]
fn import_follow_emits_every_file() {
    let dir = write_tree(&[
        ("index.css", "@import \"one.css\";\n@import \"two.css\";\n.i{}"),
        ("one.css", ".one{}"),
        ("two.css", ".two{}"),
    ]);

    let transforms = TransformOptions {
        import_rules: ImportRules::Follow,
        ..Default::default()
    };
    let (result, reporter) = compile_with(dir.path(), &["index.css"], transforms);

    assert!(reporter.is_empty());
    assert_eq!(result.files.len(), 3);
    // Under follow, @import rules stay as written.
    assert_eq!(
        output_for(&result, dir.path(), "index.css"),
        "@import \"one.css\";@import \"two.css\";.i{}"
    );
    assert_eq!(output_for(&result, dir.path(), "one.css"), ".one{}");
    assert_eq!(output_for(&result, dir.path(), "two.css"), ".two{}");
}

#[test]
fn diamond_imports_deduplicate() {
    let dir = write_tree(&[
        ("entry.css", "@import \"left.css\";\n@import \"right.css\";"),
        ("left.css", "@import \"shared.css\";\n.left{}"),
        ("right.css", "@import \"shared.css\";\n.right{}"),
        ("shared.css", ":root{}"),
    ]);

    let transforms = TransformOptions {
        import_rules: ImportRules::Inline,
        ..Default::default()
    };
    let (result, reporter) = compile_with(dir.path(), &["entry.css"], transforms);

    assert!(reporter.is_empty());
    assert_eq!(result.files.len(), 1);
    // The shared file's nodes are spliced at both import sites.
    assert_eq!(
        output_for(&result, dir.path(), "entry.css"),
        ":root{}.left{}:root{}.right{}"
    );
}

#[test]
fn shared_entries_compile_once_and_both_emit() {
    let dir = write_tree(&[
        ("a.css", "@import \"common.css\";\n.a{}"),
        ("b.css", "@import \"common.css\";\n.b{}"),
        ("common.css", ".common{}"),
    ]);

    let transforms = TransformOptions {
        import_rules: ImportRules::Inline,
        ..Default::default()
    };
    let (result, reporter) = compile_with(dir.path(), &["a.css", "b.css"], transforms);

    assert!(reporter.is_empty());
    assert_eq!(result.files.len(), 2);
    assert_eq!(
        output_for(&result, dir.path(), "a.css"),
        ".common{}.a{}"
    );
    assert_eq!(
        output_for(&result, dir.path(), "b.css"),
        ".common{}.b{}"
    );
}

#[test]
fn import_cycle_is_broken_with_the_rule_left_in_place() {
    let dir = write_tree(&[
        ("a.css", "@import \"b.css\";\n.a{color:red}"),
        ("b.css", "@import \"a.css\";\n.b{color:blue}"),
    ]);

    let transforms = TransformOptions {
        import_rules: ImportRules::Inline,
        ..Default::default()
    };
    let (result, reporter) = compile_with(dir.path(), &["a.css"], transforms);

    // The cycle is reported as a warning, not a hard error.
    assert_eq!(reporter.warning_count(), 1);
    assert_eq!(reporter.error_count(), 0);
    let mut message = String::new();
    reporter.for_each(|error| message.push_str(&error.to_string()));
    assert!(message.contains("import cycle detected"));

    assert_eq!(result.files.len(), 1);
    // b's import of a could not be inlined; it survives as written.
    assert_eq!(
        output_for(&result, dir.path(), "a.css"),
        "@import \"a.css\";.b{color:blue}.a{color:red}"
    );
}

#[test]
fn unresolvable_import_reports_and_keeps_the_rule() {
    let dir = write_tree(&[("a.css", "@import \"missing.css\";\n.a{color:red}")]);

    let transforms = TransformOptions {
        import_rules: ImportRules::Inline,
        ..Default::default()
    };
    let (result, reporter) = compile_with(dir.path(), &["a.css"], transforms);

    assert_eq!(reporter.error_count(), 1);
    assert_eq!(
        output_for(&result, dir.path(), "a.css"),
        "@import \"missing.css\";.a{color:red}"
    );
}

#[test]
fn parse_failure_skips_output_but_not_siblings() {
    let dir = write_tree(&[
        ("bad.css", ".a { content: \"unterminated }"),
        ("good.css", ".b{color:blue}"),
    ]);

    let (result, reporter) =
        compile_with(dir.path(), &["bad.css", "good.css"], TransformOptions::default());

    assert_eq!(reporter.error_count(), 1);
    assert_eq!(result.files.len(), 1);
    assert_eq!(output_for(&result, dir.path(), "good.css"), ".b{color:blue}");
}

#[test]
fn missing_entry_reports_io_error() {
    let dir = write_tree(&[]);
    let (result, reporter) =
        compile_with(dir.path(), &["nope.css"], TransformOptions::default());

    assert_eq!(reporter.error_count(), 1);
    assert!(result.files.is_empty());
    let mut saw_io = false;
    reporter.for_each(|error| {
        saw_io |= matches!(error, cascara::Error::Io { .. });
    });
    assert!(saw_io);
}

#[test]
fn variable_definitions_do_not_cross_import_boundaries() {
    // Every file is transformed independently before it is spliced, so
    // a :root definition in an imported file is harvested there and is
    // not visible to the importer's var() usages.
    let dir = write_tree(&[
        ("theme.css", ":root { --accent: #ff0066; }"),
        ("app.css", "@import \"theme.css\";\n.button { color: var(--accent) }"),
    ]);

    let transforms = TransformOptions {
        import_rules: ImportRules::Inline,
        custom_properties: CustomProperties::TransformRoot,
        ..Default::default()
    };
    let (result, reporter) = compile_with(dir.path(), &["app.css"], transforms);

    assert_eq!(reporter.warning_count(), 1);
    assert_eq!(
        output_for(&result, dir.path(), "app.css"),
        ".button{color:var(--accent)}"
    );
}

#[test]
fn outputs_are_deterministic_across_runs() {
    let dir = write_tree(&[
        ("a.css", "@import \"b.css\";\n.a{width:1px}\n.aa{height:2px}"),
        ("b.css", ".b{color:blue}"),
    ]);

    let run = || {
        let reporter = Arc::new(MemoryReporter::new());
        let result = compile(Options {
            entries: vec![dir.path().join("a.css")],
            transforms: TransformOptions {
                import_rules: ImportRules::Inline,
                ..Default::default()
            },
            source_maps: true,
            reporter: Some(reporter),
            resolver: None,
        });
        result.files
    };

    let first: HashMap<PathBuf, String> = run();
    let second = run();
    assert_eq!(first, second);
}

#[test]
fn source_maps_are_appended_when_enabled() {
    let dir = write_tree(&[("a.css", ".a{width:1px}")]);

    let reporter = Arc::new(MemoryReporter::new());
    let result = compile(Options {
        entries: vec![dir.path().join("a.css")],
        transforms: TransformOptions::default(),
        source_maps: true,
        reporter: Some(reporter.clone()),
        resolver: None,
    });

    assert!(reporter.is_empty());
    let out = output_for(&result, dir.path(), "a.css");
    assert!(out.starts_with(".a{width:1px}"));
    assert!(out.contains("sourceMappingURL=data:application/json;base64,"));
}

#[test]
fn nested_relative_imports_resolve_against_the_importing_file() {
    let dir = write_tree(&[
        ("app.css", "@import \"./nested/inner.css\";\n.app{}"),
        ("nested/inner.css", "@import \"./deep/leaf.css\";\n.inner{}"),
        ("nested/deep/leaf.css", ".leaf{}"),
    ]);

    let transforms = TransformOptions {
        import_rules: ImportRules::Inline,
        ..Default::default()
    };
    let (result, reporter) = compile_with(dir.path(), &["app.css"], transforms);

    assert!(reporter.is_empty());
    assert_eq!(
        output_for(&result, dir.path(), "app.css"),
        ".leaf{}.inner{}.app{}"
    );
}

#[test]
fn import_with_media_query_warns_when_inlined() {
    let dir = write_tree(&[
        ("a.css", "@import \"b.css\" screen;\n.a{}"),
        ("b.css", ".b{}"),
    ]);

    let transforms = TransformOptions {
        import_rules: ImportRules::Inline,
        ..Default::default()
    };
    let (result, reporter) = compile_with(dir.path(), &["a.css"], transforms);

    assert_eq!(reporter.warning_count(), 1);
    assert_eq!(output_for(&result, dir.path(), "a.css"), ".b{}.a{}");
}
