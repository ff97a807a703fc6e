//! Source files and byte spans.
//!
//! A [`Source`] pairs a file path with its contents and a table of
//! line-start offsets. The table is filled in by the lexer during its
//! single pass over the content; afterwards the source is immutable and
//! shared read-only by the parser, transformer, printer, and error
//! reporting.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// A half-open byte range `[start, end)` within a [`Source`].
///
/// Every AST node carries a span; spans are the only provenance link
/// from compiler output back to the input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Span {
    /// Create a span covering `[start, end)`.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// The number of bytes covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// A copy of this span with a new end offset.
    pub fn to(self, end: usize) -> Self {
        Self::new(self.start, end)
    }
}

/// A container for a file and its contents.
pub struct Source {
    path: PathBuf,
    content: String,
    /// Byte offset of the beginning of every line. Entry 0 is always 0;
    /// one further entry is recorded per `\n` consumed by the lexer.
    line_offsets: OnceLock<Vec<usize>>,
}

impl Source {
    /// Create a source from a path and its contents.
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            line_offsets: OnceLock::new(),
        }
    }

    /// The path this source was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The raw file contents.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Install the line-offset table computed by the lexer. Later calls
    /// are ignored; the first complete tokenization wins.
    pub(crate) fn install_line_offsets(&self, offsets: Vec<usize>) {
        let _ = self.line_offsets.set(offsets);
    }

    /// The line-start offsets, scanning the content directly if no lexer
    /// has run over this source yet.
    fn offsets(&self) -> &[usize] {
        self.line_offsets.get_or_init(|| {
            let mut offsets = vec![0];
            for (i, b) in self.content.bytes().enumerate() {
                if b == b'\n' {
                    offsets.push(i + 1);
                }
            }
            offsets
        })
    }

    /// Compute the 1-indexed line and column for the start of `span`.
    ///
    /// Lookup is O(log n) over the line-offset table.
    pub fn line_and_col(&self, span: Span) -> (u32, u32) {
        let offsets = self.offsets();
        let line = offsets.partition_point(|&offset| offset <= span.start);
        let col = span.start - offsets[line - 1] + 1;
        (line as u32, col as u32)
    }

    /// The span of the full line containing `span.start`, excluding the
    /// trailing newline.
    pub fn full_line(&self, span: Span) -> Span {
        let offsets = self.offsets();
        let line = offsets.partition_point(|&offset| offset <= span.start);
        let start = offsets[line - 1];
        let end = match offsets.get(line) {
            Some(&next) => next - 1,
            None => self.content.len(),
        };
        Span::new(start, end)
    }

    /// The text covered by `span`.
    pub fn slice(&self, span: Span) -> &str {
        &self.content[span.start..span.end]
    }
}

impl std::fmt::Debug for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Source")
            .field("path", &self.path)
            .field("len", &self.content.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_and_col_lookup() {
        let source = Source::new("test.css", "a{}\nbb{}\n\nc{}");

        assert_eq!(source.line_and_col(Span::new(0, 1)), (1, 1));
        assert_eq!(source.line_and_col(Span::new(2, 3)), (1, 3));
        assert_eq!(source.line_and_col(Span::new(4, 5)), (2, 1));
        assert_eq!(source.line_and_col(Span::new(9, 9)), (3, 1));
        assert_eq!(source.line_and_col(Span::new(10, 11)), (4, 1));
    }

    #[test]
    fn full_line_excludes_newline() {
        let source = Source::new("test.css", "a{}\nbb{}\nc{}");

        assert_eq!(source.slice(source.full_line(Span::new(5, 6))), "bb{}");
        assert_eq!(source.slice(source.full_line(Span::new(9, 10))), "c{}");
    }

    #[test]
    fn installed_offsets_take_precedence() {
        let source = Source::new("test.css", "a\nb");
        source.install_line_offsets(vec![0, 2]);
        assert_eq!(source.line_and_col(Span::new(2, 3)), (2, 1));
    }
}
