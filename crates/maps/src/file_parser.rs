//! Section/key/value tokenizer for map files
//!
//! Map files are line based:
//! ```text
//! # comment
//! [header]
//! width=20
//! location=3,4,S
//!
//! [layer]
//! type=background
//! data=
//! 1,2,3,...
//! ```
//! `[name]` opens a section and every following `key=value` line belongs to
//! it. Bulk data that does not follow the key/value shape is pulled with
//! [`FileParser::raw_line`].

use crate::error::{Diagnostic, MapError, Result, Severity};
use mapdef_core::pop_first_string;
use nom::bytes::complete::{take_till1, take_until};
use nom::character::complete::char;
use nom::combinator::{all_consuming, rest};
use nom::sequence::{delimited, separated_pair};
use nom::IResult;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// `[section]`
fn section_header(input: &str) -> IResult<&str, &str> {
    all_consuming(delimited(char('['), take_until("]"), char(']')))(input)
}

/// `key=value`, split at the first `=`
fn key_value(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(take_till1(|c| c == '='), char('='), rest)(input)
}

/// Token source over the lines of one map file
#[derive(Debug)]
pub struct FileParser {
    name: String,
    lines: Vec<String>,
    /// Index of the next unread line
    cursor: usize,
    /// 1-based number of the line the current token came from
    line_number: usize,
    /// Set when the current token is the first of a new section
    pub new_section: bool,
    section: String,
    key: String,
    val: String,
    diagnostics: Vec<Diagnostic>,
}

impl FileParser {
    /// Open a map file
    ///
    /// A missing file yields [`MapError::NotFound`] so callers can tell it
    /// apart from a file that exists but is malformed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => MapError::NotFound(path.display().to_string()),
            _ => MapError::Io(e),
        })?;

        Ok(Self::from_str(path.display().to_string(), &text))
    }

    /// Tokenize in-memory text; `name` is used in diagnostics
    pub fn from_str(name: impl Into<String>, text: &str) -> Self {
        Self {
            name: name.into(),
            lines: text.lines().map(str::to_string).collect(),
            cursor: 0,
            line_number: 0,
            new_section: false,
            section: String::new(),
            key: String::new(),
            val: String::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Advance to the next key/value token
    ///
    /// Returns `false` at end of input.
    pub fn next(&mut self) -> bool {
        self.new_section = false;

        while self.cursor < self.lines.len() {
            self.line_number = self.cursor + 1;
            let line = self.lines[self.cursor].trim().to_string();
            self.cursor += 1;

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Ok((_, name)) = section_header(&line) {
                self.section = name.trim().to_string();
                self.new_section = true;
                continue;
            }

            match key_value(&line) {
                Ok((_, (key, val))) => {
                    self.key = key.trim().to_string();
                    self.val = val.trim().to_string();
                    return true;
                }
                Err(_) => {
                    self.report(
                        Severity::Advisory,
                        format!("'{}' is not a key=value line, skipping", line),
                    );
                }
            }
        }

        false
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Unconsumed remainder of the current value
    pub fn val(&self) -> &str {
        &self.val
    }

    /// Pop the next comma-separated field of the current value
    ///
    /// Returns an empty string once the value is exhausted.
    pub fn next_value(&mut self) -> String {
        pop_first_string(&mut self.val, ',')
    }

    /// Read the next physical line verbatim (trimmed), bypassing
    /// tokenization, and advance the line counter past it
    pub fn raw_line(&mut self) -> Option<String> {
        let line = self.lines.get(self.cursor)?.trim().to_string();
        self.cursor += 1;
        self.line_number = self.cursor;
        Some(line)
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Record a non-fatal diagnostic against the current line
    pub fn report(&mut self, severity: Severity, message: impl Into<String>) {
        self.report_at(self.line_number, severity, message);
    }

    /// Record a non-fatal diagnostic that concerns the whole file
    pub fn report_file(&mut self, severity: Severity, message: impl Into<String>) {
        self.report_at(0, severity, message);
    }

    fn report_at(&mut self, line: usize, severity: Severity, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            severity,
            file: self.name.clone(),
            line,
            message: message.into(),
        };
        tracing::warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    /// Build a fatal format error for the current line
    pub fn error(&self, message: impl Into<String>) -> MapError {
        let message = message.into();
        tracing::error!("{}:{}: {}", self.name, self.line_number, message);
        MapError::Format {
            file: self.name.clone(),
            line: self.line_number,
            message,
        }
    }

    /// Hand over every diagnostic reported so far
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_and_keys() {
        let text = "# comment\n[header]\nwidth=20\n\n title = Cave \n[npc]\nfilename=npcs/a.txt\n";
        let mut parser = FileParser::from_str("test.txt", text);

        assert!(parser.next());
        assert!(parser.new_section);
        assert_eq!(parser.section(), "header");
        assert_eq!((parser.key(), parser.val()), ("width", "20"));
        assert_eq!(parser.line_number(), 3);

        assert!(parser.next());
        assert!(!parser.new_section);
        assert_eq!((parser.key(), parser.val()), ("title", "Cave"));

        assert!(parser.next());
        assert!(parser.new_section);
        assert_eq!(parser.section(), "npc");
        assert_eq!(parser.val(), "npcs/a.txt");

        assert!(!parser.next());
    }

    #[test]
    fn test_value_splits_at_first_equals() {
        let mut parser = FileParser::from_str("t", "[event]\nmsg=a=b\n");
        assert!(parser.next());
        assert_eq!(parser.key(), "msg");
        assert_eq!(parser.val(), "a=b");
    }

    #[test]
    fn test_next_value() {
        let mut parser = FileParser::from_str("t", "[enemy]\nwaypoints=1,2, 3,4\n");
        assert!(parser.next());
        assert_eq!(parser.next_value(), "1");
        assert_eq!(parser.next_value(), "2");
        assert_eq!(parser.next_value(), "3");
        assert_eq!(parser.next_value(), "4");
        assert_eq!(parser.next_value(), "");
    }

    #[test]
    fn test_raw_lines_bypass_tokenizer() {
        let text = "[layer]\ndata=\n1,2,\n[not a section]\nkey=after\n";
        let mut parser = FileParser::from_str("t", text);
        assert!(parser.next());
        assert_eq!(parser.key(), "data");

        assert_eq!(parser.raw_line().as_deref(), Some("1,2,"));
        assert_eq!(parser.line_number(), 3);
        assert_eq!(parser.raw_line().as_deref(), Some("[not a section]"));
        assert_eq!(parser.line_number(), 4);

        assert!(parser.next());
        assert_eq!(parser.section(), "layer");
        assert_eq!(parser.key(), "key");
        assert!(parser.raw_line().is_none());
    }

    #[test]
    fn test_malformed_line_is_advisory() {
        let mut parser = FileParser::from_str("t", "[header]\njunk\nwidth=2\n");
        assert!(parser.next());
        assert_eq!(parser.key(), "width");

        let diagnostics = parser.take_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Advisory);
        assert_eq!(diagnostics[0].line, 2);
    }

    #[test]
    fn test_open_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = FileParser::open(temp_dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, MapError::NotFound(_)));
    }

    #[test]
    fn test_error_carries_line() {
        let mut parser = FileParser::from_str("m.txt", "[layer]\n\nformat=hex\n");
        assert!(parser.next());
        match parser.error("bad format") {
            MapError::Format { file, line, .. } => {
                assert_eq!(file, "m.txt");
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
