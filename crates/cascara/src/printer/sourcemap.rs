//! Source map v3 support: the base64 VLQ codec and the mappings
//! builder used by the printer.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Serialize;

use crate::source::{Source, Span};

const BASE64_CHARS: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Encode a signed integer as base64 VLQ sextets, appending to `out`.
///
/// The sign bit moves to the least significant bit and the magnitude is
/// treated as positive, so every sextet carries five data bits plus a
/// continuation bit. Per <https://sourcemaps.info/spec.html>, 32 bits
/// are enough for source mapping.
pub fn vlq_encode(value: i32, out: &mut String) {
    // u64 avoids overflow on i32::MIN, whose magnitude shifted left by
    // one does not fit in 32 bits.
    let mut rest = if value < 0 {
        (((value as i64).unsigned_abs()) << 1) | 1
    } else {
        (value as u64) << 1
    };

    loop {
        let mut sextet = (rest & 0b11111) as usize;
        rest >>= 5;
        if rest != 0 {
            sextet |= 0b100000;
        }
        out.push(BASE64_CHARS[sextet] as char);
        if rest == 0 {
            break;
        }
    }
}

/// Decode one VLQ value from the front of `input`, returning the value
/// and the number of bytes read. Returns `None` on invalid characters
/// or a truncated sequence.
pub fn vlq_decode(input: &[u8]) -> Option<(i32, usize)> {
    let mut value: u64 = 0;
    let mut shift = 0;
    let mut read = 0;

    for &byte in input {
        read += 1;
        let sextet = BASE64_CHARS.iter().position(|&c| c == byte)? as u64;
        value |= (sextet & 0b11111) << shift;
        shift += 5;

        if sextet & 0b100000 == 0 {
            let magnitude = (value >> 1) as i64;
            let signed = if value & 1 == 1 { -magnitude } else { magnitude };
            return Some((signed as i32, read));
        }
    }

    None
}

/// Accumulates the `mappings` string while the printer emits output.
///
/// The printer reports each span-carrying node it visits; the builder
/// catches up on the characters appended since the previous mapping,
/// emitting `;` per generated newline, then records a
/// (Δgenerated-column, source-index, Δoriginal-line, Δoriginal-column)
/// tuple.
pub(crate) struct SourceMapBuilder<'s> {
    source: &'s Source,
    mappings: String,
    last_written: usize,
    generated_column: i32,
    original_line: i32,
    original_column: i32,
}

impl<'s> SourceMapBuilder<'s> {
    pub(crate) fn new(source: &'s Source) -> Self {
        Self {
            source,
            mappings: String::new(),
            last_written: 0,
            generated_column: 0,
            original_line: 0,
            original_column: 0,
        }
    }

    /// Record a mapping from the current end of `output` back to the
    /// original location of `span`.
    pub(crate) fn add_mapping(&mut self, span: Span, output: &str) {
        let mut generated_column = self.generated_column;
        for ch in output[self.last_written..].chars() {
            if ch == '\n' {
                generated_column = 0;
                self.generated_column = 0;
                self.mappings.push(';');
            } else {
                generated_column += 1;
            }
        }

        let (line, col) = self.source.line_and_col(span);
        let original_line = line as i32 - 1;
        let original_column = col as i32 - 1;

        if !self.mappings.is_empty() && !self.mappings.ends_with(';') {
            self.mappings.push(',');
        }

        vlq_encode(generated_column - self.generated_column, &mut self.mappings);
        // Single-source maps always reference source index 0.
        vlq_encode(0, &mut self.mappings);
        vlq_encode(original_line - self.original_line, &mut self.mappings);
        vlq_encode(original_column - self.original_column, &mut self.mappings);

        self.generated_column = generated_column;
        self.original_line = original_line;
        self.original_column = original_column;
        self.last_written = output.len();
    }

    /// Append the base64 data-url trailer comment to `output`.
    pub(crate) fn finish(self, output: &mut String) {
        #[derive(Serialize)]
        struct SourceMap<'a> {
            version: u32,
            file: &'a str,
            #[serde(rename = "sourceRoot")]
            source_root: &'a str,
            sources: [&'a str; 1],
            #[serde(rename = "sourcesContent")]
            sources_content: [&'a str; 1],
            names: [&'a str; 0],
            mappings: &'a str,
        }

        let file = self.source.path().to_string_lossy();
        let map = SourceMap {
            version: 3,
            file: file.as_ref(),
            source_root: "",
            sources: ["source.css"],
            sources_content: [self.source.content()],
            names: [],
            mappings: &self.mappings,
        };

        let json = serde_json::to_string(&map).expect("source map serialization");
        output.push_str("\n/*# sourceMappingURL=data:application/json;base64,");
        output.push_str(&STANDARD.encode(json));
        output.push_str(" */\n");
    }
}
