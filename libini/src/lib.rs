//! Streaming INI reader.
//!
//! Converts INI text into an ordered sequence of [`Section`]s, each holding
//! an insertion-ordered map of property names to typed [`Value`]s.
//!
//! # Parsing Pipeline
//!
//! 1. **Scanner**: Decodes the byte stream one UTF-8 code point at a time,
//!    tracking line numbers and allowing a single rune of pushback.
//!
//! 2. **Lexer**: Character classes for whitespace, comments, quotes,
//!    property names and section delimiters.
//!
//! 3. **Parser**: A state machine that builds one section per advance and
//!    infers scalar types (null, boolean, integer, float, string) for
//!    unquoted values.
//!
//! Sections are pulled lazily through [`Reader`]; the helpers below drain
//! a whole document at once.

mod error;
mod lexer;
mod parser;
mod scanner;
mod section;
mod value;

use std::io::Read;

pub use error::{ErrorKind, ParseContext, ParseError, Result};
pub use parser::Reader;
pub use section::Section;
pub use value::Value;

/// Parse an INI document from a string.
///
/// # Example
///
/// ```
/// use libini::{parse, Value};
///
/// let sections = parse("[log]\nlevel = 2\n").unwrap();
/// assert_eq!(sections[0].name(), "log");
/// assert_eq!(sections[0].get("level"), Some(&Value::Integer(2)));
/// ```
pub fn parse(input: &str) -> Result<Vec<Section>> {
    parse_with_filename(input, None)
}

/// Parse an INI document from a string with a filename for error messages.
pub fn parse_with_filename(input: &str, filename: Option<&str>) -> Result<Vec<Section>> {
    Reader::with_filename(input.as_bytes(), filename).read_all()
}

/// Parse every section from a byte stream.
///
/// The stream is only read, never closed; pass `&mut file` to keep using it.
pub fn parse_reader<R: Read>(input: R) -> Result<Vec<Section>> {
    Reader::new(input).read_all()
}
