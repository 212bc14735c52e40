//! Rune cursor over a buffered byte stream.
//!
//! The scanner decodes UTF-8 one code point at a time, keeps a one-rune
//! pushback slot, and counts lines as newlines are consumed. End of input is
//! reported as `None` and stays `None` on every later call.

use std::io::{self, BufRead, BufReader, Read};

use crate::error::ErrorKind;

type ScanResult<T> = std::result::Result<T, ErrorKind>;

pub struct Scanner<R> {
    input: BufReader<R>,
    /// One-based line of the next rune to be read.
    line: usize,
    /// Most recently returned rune, available for `backup`.
    last: Option<char>,
    /// Rune pushed back by `backup`, returned by the next `next`.
    unread: Option<char>,
    /// Set once the input has reported end of stream. Never cleared.
    eof: bool,
}

impl<R: Read> Scanner<R> {
    pub fn new(input: R) -> Self {
        Self {
            input: BufReader::new(input),
            line: 1,
            last: None,
            unread: None,
            eof: false,
        }
    }

    /// Current one-based line number.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Consume and return the next rune, or `None` at end of input.
    pub fn next(&mut self) -> ScanResult<Option<char>> {
        let rune = match self.unread.take() {
            Some(c) => Some(c),
            None => self.decode()?,
        };
        if rune == Some('\n') {
            self.line += 1;
        }
        self.last = rune;
        Ok(rune)
    }

    /// Un-consume the rune returned by the last `next`.
    ///
    /// Backing up over a newline restores the line count. Backing up at end
    /// of input, or twice in a row, does nothing.
    pub fn backup(&mut self) {
        if let Some(c) = self.last.take() {
            if c == '\n' {
                self.line -= 1;
            }
            self.unread = Some(c);
        }
    }

    /// Consume the next rune if it is one of `valid`.
    pub fn accept(&mut self, valid: &str) -> ScanResult<bool> {
        match self.next()? {
            Some(c) if valid.contains(c) => Ok(true),
            _ => {
                self.backup();
                Ok(false)
            }
        }
    }

    /// Consume everything up to and including the next newline.
    pub fn skip_line(&mut self) -> ScanResult<()> {
        loop {
            match self.next()? {
                None | Some('\n') => return Ok(()),
                Some(_) => {}
            }
        }
    }

    fn decode(&mut self) -> ScanResult<Option<char>> {
        if self.eof {
            return Ok(None);
        }
        let first = match self.peek_byte()? {
            Some(b) => b,
            None => {
                self.eof = true;
                return Ok(None);
            }
        };
        self.input.consume(1);

        if first.is_ascii() {
            return Ok(Some(char::from(first)));
        }

        let width = sequence_width(first);
        let mut buf = [first, 0, 0, 0];
        let mut len = 1;
        while len < width {
            match self.peek_byte()? {
                Some(b) if is_continuation(b) => {
                    self.input.consume(1);
                    buf[len] = b;
                    len += 1;
                }
                _ => break,
            }
        }

        match std::str::from_utf8(&buf[..len]) {
            Ok(s) => Ok(s.chars().next()),
            Err(e) => Err(ErrorKind::InvalidUtf8(e)),
        }
    }

    fn peek_byte(&mut self) -> io::Result<Option<u8>> {
        loop {
            match self.input.fill_buf() {
                Ok(buf) => return Ok(buf.first().copied()),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

/// Expected byte length of a UTF-8 sequence from its lead byte.
/// Returns 1 for bytes that cannot start a multi-byte sequence.
fn sequence_width(lead: u8) -> usize {
    match lead {
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 1,
    }
}

fn is_continuation(b: u8) -> bool {
    b & 0xC0 == 0x80
}
