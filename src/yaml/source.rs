//! Line sources
//!
//!     The parser consumes lines that are already split on their terminators. Opening files,
//!     checking sizes or extensions is the caller's business; this module only adapts the
//!     two common shapes of input into line sequences:
//!
//!         - [lines]: an in-memory string
//!         - [ReaderLines]: any `BufRead`, decoding UTF-8 line by line
//!
//!     Both strip `\n` and `\r\n` and never invent a trailing empty line: `"a\n"` is one line,
//!     `"a\n\n"` is two.

use std::io::BufRead;

use crate::yaml::ast::Position;
use crate::yaml::error::{ErrorKind, ParseError};

/// Split in-memory source into lines.
pub fn lines(source: &str) -> std::str::Lines<'_> {
    source.lines()
}

/// Lines read from a `BufRead`, each decoded as UTF-8.
///
/// Undecodable bytes are reported as `InvalidCharacter` at the first bad column; read
/// failures become `Io` errors positioned at the line being read.
#[derive(Debug)]
pub struct ReaderLines<R> {
    reader: R,
    line_number: usize,
    buffer: Vec<u8>,
    failed: bool,
}

impl<R: BufRead> ReaderLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            buffer: Vec::new(),
            failed: false,
        }
    }

    fn decode(&self) -> Result<String, ParseError> {
        let mut bytes: &[u8] = &self.buffer;
        if let Some(stripped) = bytes.strip_suffix(b"\n") {
            bytes = stripped;
            if let Some(stripped) = bytes.strip_suffix(b"\r") {
                bytes = stripped;
            }
        }
        match std::str::from_utf8(bytes) {
            Ok(text) => Ok(text.to_string()),
            Err(err) => {
                let valid = std::str::from_utf8(&bytes[..err.valid_up_to()]).unwrap_or_default();
                Err(ParseError::new(
                    ErrorKind::InvalidCharacter,
                    Position::new(self.line_number, valid.chars().count() + 1),
                    "line is not valid UTF-8",
                ))
            }
        }
    }
}

impl<R: BufRead> Iterator for ReaderLines<R> {
    type Item = Result<String, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        self.buffer.clear();
        self.line_number += 1;
        match self.reader.read_until(b'\n', &mut self.buffer) {
            Ok(0) => None,
            Ok(_) => {
                let line = self.decode();
                self.failed = line.is_err();
                Some(line)
            }
            Err(err) => {
                self.failed = true;
                Some(Err(ParseError::new(
                    ErrorKind::Io,
                    Position::line_start(self.line_number),
                    err.to_string(),
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read_all(bytes: &[u8]) -> Vec<Result<String, ParseError>> {
        ReaderLines::new(Cursor::new(bytes.to_vec())).collect()
    }

    #[test]
    fn test_string_lines_strip_terminators() {
        let collected: Vec<&str> = lines("a: 1\r\nb: 2\n\nc").collect();
        assert_eq!(collected, vec!["a: 1", "b: 2", "", "c"]);
    }

    #[test]
    fn test_no_synthesized_trailing_line() {
        assert_eq!(lines("a\n").count(), 1);
        assert_eq!(lines("").count(), 0);
    }

    #[test]
    fn test_reader_lines() {
        let collected: Vec<String> = read_all(b"x: 1\r\n  y: 2\nz")
            .into_iter()
            .collect::<Result<_, _>>()
            .expect("valid utf-8");
        assert_eq!(collected, vec!["x: 1", "  y: 2", "z"]);
    }

    #[test]
    fn test_reader_rejects_invalid_utf8() {
        let results = read_all(b"ok\nab\xffc\nnever");
        assert_eq!(results.len(), 2);
        let err = results[1].clone().expect_err("invalid utf-8");
        assert_eq!(err.kind, ErrorKind::InvalidCharacter);
        assert_eq!(err.position(), Position::new(2, 3));
    }
}
