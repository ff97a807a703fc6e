//! End-to-end transform scenarios: parse, transform, print.

use std::collections::HashMap;

use cascara::parser::parse;
use cascara::printer::print;
use cascara::transform::{
    transform, AnyLink, CalcReduction, CustomMediaQueries, CustomProperties, MediaFeatureRanges,
    TransformOptions,
};
use cascara::{MemoryReporter, Severity, Source};

fn run(css: &str, options: &TransformOptions) -> (String, MemoryReporter) {
    let source = Source::new("test.css", css);
    let stylesheet = parse(&source).expect("parse");
    let reporter = MemoryReporter::new();
    let transformed = transform(stylesheet, options, &source, &reporter, &HashMap::new());
    (print(&transformed), reporter)
}

fn run_ok(css: &str, options: &TransformOptions) -> String {
    let (out, reporter) = run(css, options);
    assert!(reporter.is_empty(), "unexpected diagnostics");
    out
}

#[test]
fn minification_and_selector_normalization() {
    let out = run_ok(".class { width: 2rem }", &TransformOptions::default());
    assert_eq!(out, ".class{width:2rem}");
}

#[test]
fn any_link_expansion() {
    let options = TransformOptions {
        any_link: AnyLink::Transform,
        ..Default::default()
    };
    let out = run_ok("a:any-link, section { color: red }", &options);
    assert_eq!(out, "a:visited,a:link,section{color:red}");
}

#[test]
fn any_link_passthrough() {
    let out = run_ok("a:any-link { color: red }", &TransformOptions::default());
    assert_eq!(out, "a:any-link{color:red}");
}

#[test]
fn media_feature_range_two_sided() {
    let options = TransformOptions {
        media_feature_ranges: MediaFeatureRanges::Transform,
        ..Default::default()
    };
    let out = run_ok("@media (200px < width < 600px) {}", &options);
    assert_eq!(
        out,
        "@media (min-width:200.001px) and (max-width:599.999px){}"
    );
}

#[test]
fn media_feature_range_one_sided() {
    let options = TransformOptions {
        media_feature_ranges: MediaFeatureRanges::Transform,
        ..Default::default()
    };
    assert_eq!(
        run_ok("@media (width <= 600px) {}", &options),
        "@media (max-width:600px){}"
    );
    assert_eq!(
        run_ok("@media (width > 600px) {}", &options),
        "@media (min-width:600.001px){}"
    );
    assert_eq!(
        run_ok("@media (200px <= width) {}", &options),
        "@media (min-width:200px){}"
    );
}

#[test]
fn media_feature_range_passthrough() {
    let out = run_ok(
        "@media (200px < width < 600px) {}",
        &TransformOptions::default(),
    );
    assert_eq!(out, "@media (200px<width<600px){}");
}

#[test]
fn custom_properties_from_root() {
    let options = TransformOptions {
        custom_properties: CustomProperties::TransformRoot,
        ..Default::default()
    };
    let out = run_ok(
        ":root { --w: 1rem 3rem 5rem; }\n.c { margin: 0rem var(--w); }",
        &options,
    );
    assert_eq!(out, ".c{margin:0rem 1rem 3rem 5rem}");
}

#[test]
fn custom_properties_fallback() {
    let options = TransformOptions {
        custom_properties: CustomProperties::TransformRoot,
        ..Default::default()
    };
    let out = run_ok(".c { margin: var(--missing, 1rem 2rem); }", &options);
    assert_eq!(out, ".c{margin:1rem 2rem}");
}

#[test]
fn custom_properties_undefined_warns_and_keeps_var() {
    let options = TransformOptions {
        custom_properties: CustomProperties::TransformRoot,
        ..Default::default()
    };
    let (out, reporter) = run(".c { margin: var(--missing); }", &options);
    assert_eq!(out, ".c{margin:var(--missing)}");
    assert_eq!(reporter.warning_count(), 1);
    let mut message = String::new();
    reporter.for_each(|error| message.push_str(&error.to_string()));
    assert!(message.contains("use of undefined variable without fallback: --missing"));
}

#[test]
fn custom_properties_in_media_blocks() {
    let options = TransformOptions {
        custom_properties: CustomProperties::TransformRoot,
        ..Default::default()
    };
    let out = run_ok(
        ":root { --w: 5px; } @media screen { .a { width: var(--w) } }",
        &options,
    );
    assert_eq!(out, "@media screen{.a{width:5px}}");
}

#[test]
fn custom_media_substitution() {
    let options = TransformOptions {
        custom_media_queries: CustomMediaQueries::Transform,
        ..Default::default()
    };
    let out = run_ok(
        "@custom-media --narrow (max-width: 30em);\n@media (--narrow) { .a { color: red } }",
        &options,
    );
    assert_eq!(out, "@media (max-width:30em){.a{color:red}}");
}

#[test]
fn custom_media_passthrough_keeps_definition() {
    let out = run_ok(
        "@custom-media --narrow (max-width: 30em);",
        &TransformOptions::default(),
    );
    assert_eq!(out, "@custom-media --narrow (max-width:30em);");
}

#[test]
fn calc_reduction() {
    let options = TransformOptions {
        calc_reduction: CalcReduction::Reduce,
        ..Default::default()
    };
    assert_eq!(
        run_ok(".c { width: calc(1px + 4px / 2) }", &options),
        ".c{width:3px}"
    );
    assert_eq!(
        run_ok(".c { width: calc(2 * 3px) }", &options),
        ".c{width:6px}"
    );
    assert_eq!(
        run_ok(".c { width: calc(10% - 2.5%) }", &options),
        ".c{width:7.5%}"
    );
}

#[test]
fn calc_with_variables() {
    let options = TransformOptions {
        custom_properties: CustomProperties::TransformRoot,
        calc_reduction: CalcReduction::Reduce,
        ..Default::default()
    };
    let out = run_ok(
        ":root { --x: 4px; }\n.c { width: calc(var(--x) / 2) }",
        &options,
    );
    assert_eq!(out, ".c{width:2px}");
}

#[test]
fn calc_passthrough_keeps_expression() {
    let out = run_ok(
        ".c { width: calc(1px + 4px / 2) }",
        &TransformOptions::default(),
    );
    assert_eq!(out, ".c{width:calc(1px + 4px/2)}");
}

#[test]
fn calc_mixed_number_and_percentage_is_an_error() {
    let options = TransformOptions {
        calc_reduction: CalcReduction::Reduce,
        ..Default::default()
    };
    let (out, reporter) = run(".c { width: calc(2 + 25%) }", &options);
    assert_eq!(reporter.error_count(), 1);
    // The offending expression stays in the output.
    assert_eq!(out, ".c{width:calc(2 + 25%)}");
}

#[test]
fn calc_division_by_zero_is_an_error() {
    let options = TransformOptions {
        calc_reduction: CalcReduction::Reduce,
        ..Default::default()
    };
    let (_, reporter) = run(".c { width: calc(1px / 0) }", &options);
    assert_eq!(reporter.error_count(), 1);
    reporter.for_each(|error| assert_eq!(error.severity(), Severity::Error));
}

#[test]
fn empty_rule_blocks_survive() {
    // Rules that are empty in source print as written, they are not
    // dropped.
    assert_eq!(
        run_ok(":nth-child(0n+5) {}", &TransformOptions::default()),
        ":nth-child(5){}"
    );
    assert_eq!(
        run_ok(":nth-child(1n+0) {}", &TransformOptions::default()),
        ":nth-child(n){}"
    );
    assert_eq!(
        run_ok(":nth-child(-1n+6) {}", &TransformOptions::default()),
        ":nth-child(-n+6){}"
    );
}

#[test]
fn transforms_compose() {
    let options = TransformOptions {
        any_link: AnyLink::Transform,
        custom_properties: CustomProperties::TransformRoot,
        calc_reduction: CalcReduction::Reduce,
        media_feature_ranges: MediaFeatureRanges::Transform,
        custom_media_queries: CustomMediaQueries::Transform,
        ..Default::default()
    };
    let out = run_ok(
        ":root { --pad: 2px; }\n\
         @custom-media --wide (width >= 600px);\n\
         a:any-link { padding: calc(var(--pad) * 2) }\n\
         @media (--wide) { .b { color: red } }",
        &options,
    );
    assert_eq!(
        out,
        "a:visited,a:link{padding:4px}@media (min-width:600px){.b{color:red}}"
    );
}
