//! Program image text format.
//!
//! An image is a comma-separated list of base-10 integers. Line breaks are
//! insignificant: input lines are concatenated before splitting, so an image
//! wrapped across several lines parses the same as the single-line form.
//!
//! ```text
//! 1,9,10,3,
//! 2,3,11,0,
//! 99,30,40,50
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::audit::{self, ActionCategory, AuditEntry};
use crate::core::{IntcodeError, IntcodeResult, Word};

/// Parse a program image.
///
/// Line terminators are dropped before splitting. Spaces and tabs around a
/// token are ignored, but not inside it: `"1 2"` is an error, not `12`.
/// A single trailing comma is tolerated. Any other empty token, or a token
/// that is not an optionally signed base-10 integer fitting in a [`Word`],
/// is rejected with [`IntcodeError::InvalidImageWord`].
pub fn parse_image(text: &str) -> IntcodeResult<Vec<Word>> {
    let joined: String = text.lines().collect();
    let body = joined.trim();
    if body.is_empty() {
        return Ok(Vec::new());
    }

    let body = body.strip_suffix(',').unwrap_or(body);
    body.split(',')
        .enumerate()
        .map(|(index, raw)| {
            // Padding around a token is fine; a gap inside one is not
            let token = raw.trim();
            token.parse::<Word>().map_err(|_| IntcodeError::InvalidImageWord {
                index,
                token: token.to_string(),
            })
        })
        .collect()
}

/// Read and parse an image from a buffered reader.
pub fn read_image(reader: impl BufRead) -> IntcodeResult<Vec<Word>> {
    read_named(reader, "<reader>")
}

/// Read and parse an image file.
pub fn load_image(path: impl AsRef<Path>) -> IntcodeResult<Vec<Word>> {
    let path = path.as_ref();
    let name = path.display().to_string();

    let result = File::open(path)
        .map_err(|e| io_error(&name, e))
        .and_then(|file| read_named(BufReader::new(file), &name));

    if audit::is_enabled() {
        match &result {
            Ok(words) => audit::audit(
                AuditEntry::new("LOAD", "Image", name.as_str(), format!("Loaded {} words", words.len()))
                    .with_category(ActionCategory::Load)
                    .with_meta("words", words.len().to_string()),
            ),
            Err(err) => audit::audit_failure(
                AuditEntry::new("LOAD", "Image", name.as_str(), err.to_string())
                    .with_category(ActionCategory::Load),
                err,
            ),
        }
    }

    result
}

fn read_named(mut reader: impl Read, name: &str) -> IntcodeResult<Vec<Word>> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| io_error(name, e))?;
    parse_image(&text)
}

fn io_error(path: &str, err: std::io::Error) -> IntcodeError {
    IntcodeError::Io {
        path: path.to_string(),
        message: err.to_string(),
    }
}

/// Render an image in its canonical single-line text form.
pub fn format_image(image: &[Word]) -> String {
    image
        .iter()
        .map(Word::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
