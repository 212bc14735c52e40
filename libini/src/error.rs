//! Error types for INI parsing.

use std::io;
use std::num::ParseIntError;
use std::str::Utf8Error;

use thiserror::Error;

/// Result type for INI parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Parse context carrying filename for error reporting.
#[derive(Clone, Debug, Default)]
pub struct ParseContext {
    pub filename: Option<String>,
}

impl ParseContext {
    /// Create a new parse context.
    pub fn new(filename: Option<&str>) -> Self {
        Self {
            filename: filename.map(String::from),
        }
    }

    /// Format a location suffix for error messages.
    pub fn loc_suffix(&self) -> String {
        match &self.filename {
            Some(name) => format!(" of <{}>", name),
            None => String::new(),
        }
    }
}

/// What went wrong while reading an INI document.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The input ended inside a construct that must be closed.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// A character appeared where the grammar forbids it.
    #[error("unexpected symbol {0:?}")]
    UnexpectedSymbol(char),

    /// The underlying reader failed.
    #[error("error reading input: {0}")]
    Io(#[from] io::Error),

    /// The input is not valid UTF-8.
    #[error("invalid UTF-8 sequence: {0}")]
    InvalidUtf8(#[source] Utf8Error),

    /// A value looked like an integer but did not fit in 64 bits.
    #[error("invalid integer value {value:?}: {source}")]
    InvalidInteger {
        value: String,
        #[source]
        source: ParseIntError,
    },

    /// A value looked like a float but did not convert to a finite `f64`.
    #[error("invalid float value {value:?}: {reason}")]
    InvalidFloat { value: String, reason: String },
}

/// A fatal parse error, tagged with the line the reader was on.
#[derive(Error, Debug)]
#[error("ini: line:{line} {kind}{suffix}")]
pub struct ParseError {
    line: usize,
    #[source]
    kind: ErrorKind,
    suffix: String,
}

impl ParseError {
    /// Create an error at `line` with location information from `ctx`.
    pub fn new(kind: ErrorKind, line: usize, ctx: &ParseContext) -> Self {
        Self {
            line,
            kind,
            suffix: ctx.loc_suffix(),
        }
    }

    /// One-based line number active when the fault occurred.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn into_kind(self) -> ErrorKind {
        self.kind
    }

    /// Returns `true` if the input ended before a construct was closed.
    pub fn is_unexpected_eof(&self) -> bool {
        matches!(self.kind, ErrorKind::UnexpectedEof)
    }
}
