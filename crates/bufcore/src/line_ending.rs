//! Line terminator classification.
//!
//! The classifier answers "does this input look like CRLF, LF, or did it end
//! ambiguously". It does a single forward scan with one byte of lookahead and
//! stops at the first decisive signal, so a stray `\r` in the middle of a line
//! is skipped rather than reported.

use std::convert::Infallible;
use std::fmt;
use std::io::{self, BufReader, Read};

use serde::{Deserialize, Serialize};

#[cfg(target_os = "windows")]
pub const NATIVE_LINE_ENDING: LineEnding = LineEnding::Crlf;

#[cfg(not(target_os = "windows"))]
pub const NATIVE_LINE_ENDING: LineEnding = LineEnding::Lf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LineEnding {
    /// U+000A -- LineFeed
    Lf,
    /// CarriageReturn followed by LineFeed.
    Crlf,
    /// The input ended on a CarriageReturn.
    Invalid,
    /// Nothing to classify: the input was empty.
    #[default]
    Unknown,
    /// Bytes were read but no terminator was found.
    #[serde(rename = "None")]
    Unterminated,
}

impl LineEnding {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Lf => "LF",
            Self::Crlf => "CRLF",
            Self::Invalid => "INVALID",
            Self::Unknown => "UNKNOWN",
            Self::Unterminated => "NONE",
        }
    }

    /// The bytes new lines in a buffer of this mode should end with.
    ///
    /// Modes that carry no usable convention fall back to
    /// [`NATIVE_LINE_ENDING`].
    pub const fn terminator(&self) -> &'static [u8] {
        match self {
            Self::Crlf => b"\r\n",
            Self::Lf => b"\n",
            Self::Invalid | Self::Unknown | Self::Unterminated => {
                NATIVE_LINE_ENDING.terminator()
            }
        }
    }

    pub const fn is_terminated(&self) -> bool {
        matches!(self, Self::Lf | Self::Crlf)
    }

    /// Infers the mode from the terminator of a single line.
    ///
    /// Lines shorter than two bytes carry no reliable signal and yield `None`,
    /// as do lines without a trailing `\n`.
    pub fn from_first_line(line: &[u8]) -> Option<LineEnding> {
        if line.len() < 2 {
            return None;
        }
        if line.ends_with(b"\r\n") {
            Some(Self::Crlf)
        } else if line.ends_with(b"\n") {
            Some(Self::Lf)
        } else {
            None
        }
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies the line terminator convention of `reader`.
///
/// The reader is consumed up to the first decisive byte; its position
/// afterwards is unspecified. Callers that need the content again must rewind.
pub fn classify<R: Read>(reader: R) -> io::Result<LineEnding> {
    scan(BufReader::new(reader).bytes())
}

/// Classifies lines that are already in memory, as produced by the loader.
pub fn classify_lines<L: AsRef<[u8]>>(lines: &[L]) -> LineEnding {
    let bytes = lines
        .iter()
        .flat_map(|line| line.as_ref().iter().copied())
        .map(Ok::<u8, Infallible>);
    match scan(bytes) {
        Ok(line_ending) => line_ending,
        Err(never) => match never {},
    }
}

fn scan<E, I>(bytes: I) -> Result<LineEnding, E>
where
    I: Iterator<Item = Result<u8, E>>,
{
    let mut bytes = bytes.peekable();
    let mut consumed = false;

    while let Some(byte) = bytes.next() {
        consumed = true;
        match byte? {
            b'\r' => match bytes.peek() {
                None => return Ok(LineEnding::Invalid),
                Some(Ok(b'\n')) => return Ok(LineEnding::Crlf),
                Some(Ok(_)) => {}
                Some(Err(_)) => {
                    if let Some(Err(err)) = bytes.next() {
                        return Err(err);
                    }
                }
            },
            b'\n' => return Ok(LineEnding::Lf),
            _ => {}
        }
    }

    if consumed {
        Ok(LineEnding::Unterminated)
    } else {
        Ok(LineEnding::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_str(input: &str) -> LineEnding {
        classify(input.as_bytes()).unwrap()
    }

    #[test]
    fn test_empty_input_is_unknown() {
        assert_eq!(classify_str(""), LineEnding::Unknown);
        assert_eq!(classify_lines::<Vec<u8>>(&[]), LineEnding::Unknown);
    }

    #[test]
    fn test_lf_input() {
        assert_eq!(classify_str("a\nb\nc\nd\n"), LineEnding::Lf);
        assert_eq!(classify_str("\n"), LineEnding::Lf);
        assert_eq!(classify_str("line\n".repeat(50).as_str()), LineEnding::Lf);
    }

    #[test]
    fn test_crlf_input() {
        assert_eq!(classify_str("a\r\nb\r\nc\r\nd\r\ne\r\n"), LineEnding::Crlf);
        assert_eq!(classify_str("\r\n"), LineEnding::Crlf);
        assert_eq!(classify_str("line\r\n".repeat(50).as_str()), LineEnding::Crlf);
    }

    #[test]
    fn test_first_terminator_wins() {
        assert_eq!(classify_str("a\nb\r\n"), LineEnding::Lf);
        assert_eq!(classify_str("a\r\nb\n"), LineEnding::Crlf);
    }

    #[test]
    fn test_trailing_carriage_return_is_invalid() {
        assert_eq!(classify_str("abc\r"), LineEnding::Invalid);
        assert_eq!(classify_str("\r"), LineEnding::Invalid);
    }

    #[test]
    fn test_no_terminator_is_unterminated() {
        assert_eq!(classify_str("hello world"), LineEnding::Unterminated);
        assert_eq!(classify_str("x"), LineEnding::Unterminated);
    }

    #[test]
    fn test_bare_carriage_return_is_skipped() {
        // Only the byte right after a '\r' is inspected.
        assert_eq!(classify_str("a\rb"), LineEnding::Unterminated);
        assert_eq!(classify_str("a\rb\nc"), LineEnding::Lf);
        assert_eq!(classify_str("a\r\r\n"), LineEnding::Crlf);
        assert_eq!(classify_str("a\rb\r"), LineEnding::Invalid);
    }

    #[test]
    fn test_classify_lines_matches_stream() {
        let inputs = ["", "abc", "a\nb", "a\r\nb", "a\r", "a\rb", "a\rb\n", "\r\r"];
        for input in inputs {
            let lines: Vec<&[u8]> = input.as_bytes().split_inclusive(|b| *b == b'\n').collect();
            assert_eq!(classify_lines(&lines), classify_str(input), "input {:?}", input);
        }
    }

    #[test]
    fn test_read_error_is_propagated() {
        struct Failing;
        impl Read for Failing {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
            }
        }

        let err = classify(Failing).unwrap_err();
        assert_eq!(err.to_string(), "disk on fire");
    }

    #[test]
    fn test_from_first_line() {
        assert_eq!(LineEnding::from_first_line(b"abc\r\n"), Some(LineEnding::Crlf));
        assert_eq!(LineEnding::from_first_line(b"abc\n"), Some(LineEnding::Lf));
        assert_eq!(LineEnding::from_first_line(b"\r\n"), Some(LineEnding::Crlf));
        assert_eq!(LineEnding::from_first_line(b"\n"), None);
        assert_eq!(LineEnding::from_first_line(b"abc"), None);
    }

    #[test]
    fn test_labels_and_terminators() {
        assert_eq!(LineEnding::Lf.to_string(), "LF");
        assert_eq!(LineEnding::Unterminated.to_string(), "NONE");
        assert_eq!(LineEnding::Crlf.terminator(), b"\r\n");
        assert_eq!(LineEnding::Lf.terminator(), b"\n");
        assert_eq!(LineEnding::Unknown.terminator(), NATIVE_LINE_ENDING.terminator());
        assert!(LineEnding::Crlf.is_terminated());
        assert!(!LineEnding::Invalid.is_terminated());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&LineEnding::Unterminated).unwrap();
        assert_eq!(json, "\"None\"");
        let back: LineEnding = serde_json::from_str("\"Crlf\"").unwrap();
        assert_eq!(back, LineEnding::Crlf);
    }
}
