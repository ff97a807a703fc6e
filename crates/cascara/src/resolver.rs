//! Import path resolution.
//!
//! The compiler asks a [`Resolver`] to turn each `@import` specifier
//! into a filesystem path. The default [`NodeResolver`] follows
//! node-style rules: relative specifiers resolve against the importing
//! file's directory, bare specifiers against an optional base url and
//! then ancestor `node_modules` directories.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Resolves an import specifier (e.g. `@import "theme.css"`) into a
/// path on the filesystem.
pub trait Resolver: Send + Sync {
    /// Resolve `spec` relative to the directory of the importing file.
    fn resolve(&self, spec: &str, from_dir: &Path) -> Result<PathBuf>;
}

/// Node-style resolver.
///
/// For every base path tried, the candidates are, in order: the path
/// itself, the path with `.css` appended, `index.css` inside it, and
/// the `"style"` entry of a `package.json` inside it.
#[derive(Debug, Clone, Default)]
pub struct NodeResolver {
    /// Base directory tried first for bare (non-relative) specifiers.
    pub base_url: Option<PathBuf>,
}

impl Resolver for NodeResolver {
    fn resolve(&self, spec: &str, from_dir: &Path) -> Result<PathBuf> {
        let not_found = || Error::Resolve {
            spec: spec.to_string(),
            from_dir: from_dir.to_path_buf(),
        };

        if spec.starts_with("./") || spec.starts_with("../") || spec.starts_with('/') {
            let base = if spec.starts_with('/') {
                PathBuf::from(spec)
            } else {
                from_dir.join(spec)
            };
            return resolve_candidates(&base).ok_or_else(not_found);
        }

        if let Some(base_url) = &self.base_url {
            if let Some(found) = resolve_candidates(&base_url.join(spec)) {
                return Ok(found);
            }
        }

        for dir in from_dir.ancestors() {
            if let Some(found) = resolve_candidates(&dir.join("node_modules").join(spec)) {
                return Ok(found);
            }
        }

        Err(not_found())
    }
}

fn resolve_candidates(path: &Path) -> Option<PathBuf> {
    if path.is_file() {
        return Some(path.to_path_buf());
    }

    let with_css = append_css_extension(path);
    if with_css.is_file() {
        return Some(with_css);
    }

    let index = path.join("index.css");
    if index.is_file() {
        return Some(index);
    }

    if let Some(style) = package_style_entry(path) {
        let styled = path.join(style);
        if styled.is_file() {
            return Some(styled);
        }
    }

    None
}

/// The `"style"` field of `path/package.json`, if both exist.
fn package_style_entry(path: &Path) -> Option<String> {
    let contents = std::fs::read_to_string(path.join("package.json")).ok()?;
    let manifest: serde_json::Value = serde_json::from_str(&contents).ok()?;
    Some(manifest.get("style")?.as_str()?.to_string())
}

/// Append `.css` literally, even when the path already has an
/// extension (`a.min` becomes `a.min.css`).
fn append_css_extension(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".css");
    PathBuf::from(os)
}
