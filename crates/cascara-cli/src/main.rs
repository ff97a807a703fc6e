//! Command-line front-end for the cascara CSS compiler.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use cascara::transform::{
    AnyLink, CalcReduction, CustomMediaQueries, CustomProperties, ImportRules, MediaFeatureRanges,
    TransformOptions,
};
use cascara::{compile, MemoryReporter, NodeResolver, Options, Severity};

/// Compile CSS files: resolve imports, run transforms, minify.
#[derive(Debug, Parser)]
#[command(name = "cascara", version, about)]
struct Args {
    /// Entry files to compile.
    #[arg(required = true)]
    entries: Vec<PathBuf>,

    /// Inline imported stylesheets in place of their @import rules.
    #[arg(long, conflicts_with = "follow_imports")]
    inline_imports: bool,

    /// Keep @import rules but also emit every imported file.
    #[arg(long)]
    follow_imports: bool,

    /// Rewrite media query ranges into min-/max- features.
    #[arg(long)]
    media_ranges: bool,

    /// Expand :any-link into :link and :visited.
    #[arg(long)]
    any_link: bool,

    /// Substitute :root custom properties at var() usage sites.
    #[arg(long)]
    custom_properties: bool,

    /// Substitute @custom-media definitions into @media queries.
    #[arg(long)]
    custom_media: bool,

    /// Constant-fold calc() expressions.
    #[arg(long)]
    reduce_calc: bool,

    /// Append an embedded source map to each output.
    #[arg(long)]
    source_maps: bool,

    /// Base directory for resolving bare import specifiers.
    #[arg(long)]
    base_url: Option<PathBuf>,

    /// Directory to write outputs into. Without it, output goes to
    /// stdout.
    #[arg(long, short = 'o')]
    out_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let transforms = TransformOptions {
        import_rules: if args.inline_imports {
            ImportRules::Inline
        } else if args.follow_imports {
            ImportRules::Follow
        } else {
            ImportRules::Passthrough
        },
        media_feature_ranges: if args.media_ranges {
            MediaFeatureRanges::Transform
        } else {
            MediaFeatureRanges::Passthrough
        },
        any_link: if args.any_link {
            AnyLink::Transform
        } else {
            AnyLink::Passthrough
        },
        custom_properties: if args.custom_properties {
            CustomProperties::TransformRoot
        } else {
            CustomProperties::Passthrough
        },
        custom_media_queries: if args.custom_media {
            CustomMediaQueries::Transform
        } else {
            CustomMediaQueries::Passthrough
        },
        calc_reduction: if args.reduce_calc {
            CalcReduction::Reduce
        } else {
            CalcReduction::Passthrough
        },
    };

    let reporter = Arc::new(MemoryReporter::new());
    let result = compile(Options {
        entries: args.entries,
        transforms,
        source_maps: args.source_maps,
        reporter: Some(reporter.clone()),
        resolver: Some(Arc::new(NodeResolver {
            base_url: args.base_url,
        })),
    });

    let mut failed = false;
    reporter.for_each(|error| {
        match error.severity() {
            Severity::Warning => eprintln!("warning: {error}"),
            Severity::Error => {
                failed = true;
                eprintln!("error: {error}");
            }
        }
    });

    for (path, css) in &result.files {
        match &args.out_dir {
            Some(out_dir) => {
                let target = out_dir.join(path.file_name().expect("file name"));
                if let Err(error) = std::fs::create_dir_all(out_dir) {
                    eprintln!("error: failed to create {}: {error}", out_dir.display());
                    failed = true;
                    continue;
                }
                if let Err(error) = std::fs::write(&target, css) {
                    eprintln!("error: failed to write {}: {error}", target.display());
                    failed = true;
                    continue;
                }
                tracing::info!(from = %path.display(), to = %target.display(), "wrote output");
            }
            None => print!("{css}"),
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
