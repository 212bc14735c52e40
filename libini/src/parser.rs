//! Section reader: the parsing state machine and its iterator API.
//!
//! Each call to advance starts in [`State::NextSection`] and runs states
//! until one of them reports that the current section is complete. States
//! are plain enum values returned from [`Reader::step`], so the driver is a
//! loop and input size never grows the stack.

use std::io::Read;

use crate::error::{ErrorKind, ParseContext, ParseError, Result};
use crate::lexer::{
    is_property_name, is_quote, is_whitespace, ASSIGN, COMMENT, SECTION_END, SECTION_START,
};
use crate::scanner::Scanner;
use crate::section::Section;
use crate::value::Value;

/// Parsing states.
#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    /// Skip blank lines and comments until a header or a property.
    NextSection,
    /// Inside `[...]`.
    SectionHeader,
    /// Between properties of the current section.
    Properties,
    /// Reading a property name up to `=`.
    PropertyName,
    /// After `=`, deciding between a quoted and a scalar value.
    PropertyValue(String),
    /// Inside a quoted value opened by the given quote.
    StringValue(String, char),
    /// Reading an unquoted value to the end of the line.
    ScalarValue(String),
}

/// Streaming INI reader.
///
/// Pulls one [`Section`] at a time from the underlying byte stream. Use it
/// as an iterator, or drive it with [`Reader::advance`] and read the result
/// through [`Reader::section`] and [`Reader::error`].
///
/// # Example
///
/// ```
/// use libini::Reader;
///
/// let mut reader = Reader::new("[General]\nCompiler=FreePascal\n".as_bytes());
/// assert!(reader.advance());
/// let section = reader.section().unwrap();
/// assert_eq!(section.name(), "General");
/// assert_eq!(section.get("Compiler").unwrap().as_str(), Some("FreePascal"));
/// assert!(!reader.advance());
/// assert!(reader.error().is_none());
/// ```
pub struct Reader<R> {
    scanner: Scanner<R>,
    ctx: ParseContext,
    /// Section being built by the state machine.
    pending: Option<Section>,
    /// Section yielded by the last successful `advance`.
    current: Option<Section>,
    error: Option<ParseError>,
    finished: bool,
}

impl<R: Read> Reader<R> {
    /// Create a reader over `input`.
    ///
    /// Pass `&mut file` to keep ownership of the stream; the reader never
    /// closes it.
    pub fn new(input: R) -> Self {
        Self::with_filename(input, None)
    }

    /// Create a reader that names `filename` in its error messages.
    pub fn with_filename(input: R, filename: Option<&str>) -> Self {
        Self {
            scanner: Scanner::new(input),
            ctx: ParseContext::new(filename),
            pending: None,
            current: None,
            error: None,
            finished: false,
        }
    }

    /// Move to the next section. Returns `false` once the input is exhausted
    /// or a fault occurred; check [`Reader::error`] to tell them apart.
    pub fn advance(&mut self) -> bool {
        match self.next() {
            Some(Ok(section)) => {
                self.current = Some(section);
                true
            }
            Some(Err(err)) => {
                self.current = None;
                self.error = Some(err);
                false
            }
            None => {
                self.current = None;
                false
            }
        }
    }

    /// Section produced by the last `advance` that returned `true`.
    pub fn section(&self) -> Option<&Section> {
        self.current.as_ref()
    }

    /// Take ownership of the current section.
    pub fn take_section(&mut self) -> Option<Section> {
        self.current.take()
    }

    /// Fault that ended iteration, if any.
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    /// One-based line the reader is on.
    pub fn line(&self) -> usize {
        self.scanner.line()
    }

    /// Read every remaining section. The first fault discards what was
    /// already read.
    pub fn read_all(self) -> Result<Vec<Section>> {
        self.collect()
    }

    /// Run the state machine until the current section is complete.
    fn read_section(&mut self) -> Result<Option<Section>> {
        let mut state = State::NextSection;
        while let Some(next) = self.step(state)? {
            state = next;
        }
        Ok(self.pending.take())
    }

    fn step(&mut self, state: State) -> Result<Option<State>> {
        match state {
            State::NextSection => self.next_section(),
            State::SectionHeader => self.section_header(),
            State::Properties => self.properties(),
            State::PropertyName => self.property_name(),
            State::PropertyValue(name) => self.property_value(name),
            State::StringValue(name, quote) => self.string_value(name, quote),
            State::ScalarValue(name) => self.scalar_value(name),
        }
    }

    // ========================================================================
    // States
    // ========================================================================

    fn next_section(&mut self) -> Result<Option<State>> {
        loop {
            match self.next_rune()? {
                None => return Ok(None),
                Some('\n') => {}
                Some(c) if is_whitespace(c) => {}
                Some(COMMENT) => self.skip_line()?,
                Some(SECTION_START) => return Ok(Some(State::SectionHeader)),
                Some(c) if is_property_name(c) => {
                    self.scanner.backup();
                    self.pending = Some(Section::default());
                    return Ok(Some(State::Properties));
                }
                // A stray `=` before any property is skipped.
                Some(_) => {}
            }
        }
    }

    fn section_header(&mut self) -> Result<Option<State>> {
        self.pending = Some(Section::default());

        let mut name = String::new();
        loop {
            match self.next_rune()? {
                None => return Err(self.fail(ErrorKind::UnexpectedEof)),
                Some(SECTION_END) => {
                    self.section_mut().set_name(name);
                    self.accept("\n")?;
                    return Ok(Some(State::Properties));
                }
                Some(c) => name.push(c),
            }
        }
    }

    fn properties(&mut self) -> Result<Option<State>> {
        loop {
            match self.next_rune()? {
                None | Some('\n') => return Ok(None),
                Some(c) if is_whitespace(c) => {}
                Some(COMMENT) => self.skip_line()?,
                Some(SECTION_START) => {
                    self.scanner.backup();
                    return Ok(None);
                }
                Some(c) if is_property_name(c) => {
                    self.scanner.backup();
                    return Ok(Some(State::PropertyName));
                }
                Some(c) => return Err(self.fail(ErrorKind::UnexpectedSymbol(c))),
            }
        }
    }

    fn property_name(&mut self) -> Result<Option<State>> {
        let mut name = String::new();
        loop {
            match self.next_rune()? {
                // A name without `=` at end of input is dropped.
                None => return Ok(None),
                Some(ASSIGN) => {
                    return Ok(Some(State::PropertyValue(name.trim().to_string())));
                }
                Some(c) if is_property_name(c) => name.push(c),
                Some(c) => return Err(self.fail(ErrorKind::UnexpectedSymbol(c))),
            }
        }
    }

    fn property_value(&mut self, name: String) -> Result<Option<State>> {
        self.section_mut().insert(name.clone(), Value::Null);

        loop {
            match self.next_rune()? {
                None => return Ok(None),
                Some(' ') => {}
                Some(c) if is_quote(c) => return Ok(Some(State::StringValue(name, c))),
                Some(_) => {
                    self.scanner.backup();
                    return Ok(Some(State::ScalarValue(name)));
                }
            }
        }
    }

    fn string_value(&mut self, name: String, quote: char) -> Result<Option<State>> {
        let mut value = String::new();
        loop {
            match self.next_rune()? {
                None => return Err(self.fail(ErrorKind::UnexpectedEof)),
                Some(c) if c == quote => {
                    self.section_mut().insert(name, Value::String(value));
                    self.accept("\n")?;
                    return Ok(Some(State::Properties));
                }
                Some(c) => value.push(c),
            }
        }
    }

    fn scalar_value(&mut self, name: String) -> Result<Option<State>> {
        let mut raw = String::new();
        let terminator = loop {
            match self.next_rune()? {
                end @ (None | Some('\n') | Some(COMMENT)) => break end,
                Some(c) => raw.push(c),
            }
        };

        let value = Value::infer(raw.trim()).map_err(|kind| self.fail(kind))?;
        self.section_mut().insert(name, value);

        if terminator == Some(COMMENT) {
            self.skip_line()?;
        }
        Ok(Some(State::Properties))
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn fail(&self, kind: ErrorKind) -> ParseError {
        ParseError::new(kind, self.scanner.line(), &self.ctx)
    }

    fn next_rune(&mut self) -> Result<Option<char>> {
        self.scanner.next().map_err(|kind| self.fail(kind))
    }

    fn accept(&mut self, valid: &str) -> Result<bool> {
        self.scanner.accept(valid).map_err(|kind| self.fail(kind))
    }

    fn skip_line(&mut self) -> Result<()> {
        self.scanner.skip_line().map_err(|kind| self.fail(kind))
    }

    fn section_mut(&mut self) -> &mut Section {
        self.pending.get_or_insert_with(Section::default)
    }
}

impl<R: Read> Iterator for Reader<R> {
    type Item = Result<Section>;

    /// Yields sections in file order. A fault is yielded once and ends the
    /// iteration.
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.read_section() {
            Ok(Some(section)) => Some(Ok(section)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err) => {
                self.finished = true;
                self.pending = None;
                Some(Err(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<Vec<Section>> {
        Reader::new(input.as_bytes()).read_all()
    }

    fn parse_ok(input: &str) -> Vec<Section> {
        parse(input).unwrap()
    }

    fn section(name: &str, props: &[(&str, Value)]) -> Section {
        let mut section = Section::new(name);
        for (k, v) in props {
            section.insert(*k, v.clone());
        }
        section
    }

    #[test]
    fn test_basic() {
        let sections = parse_ok("[General]\nCompiler=FreePascal\n");
        assert_eq!(
            sections,
            vec![section("General", &[("Compiler", Value::from("FreePascal"))])]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_ok("").is_empty());
        assert!(parse_ok("\n\n  \t\n; only a comment\n").is_empty());
    }

    #[test]
    fn test_implicit_section_with_comment_and_null() {
        let sections = parse_ok("😀   =   😃\n        ; comment\nprop=");
        assert_eq!(
            sections,
            vec![section(
                "",
                &[("😀", Value::from("😃")), ("prop", Value::Null)]
            )]
        );
    }

    #[test]
    fn test_bare_name_at_eof() {
        let sections = parse_ok("prop");
        assert_eq!(sections, vec![Section::default()]);
    }

    #[test]
    fn test_unterminated_quote() {
        let err = parse("prop=\"hello").unwrap_err();
        assert!(err.is_unexpected_eof());
        assert_eq!(err.line(), 1);
    }

    #[test]
    fn test_quoted_values_skip_inference() {
        let sections = parse_ok("a=\"123\"\nb='true'\nc=\"  padded ; not a comment  \"\n");
        assert_eq!(
            sections,
            vec![section(
                "",
                &[
                    ("a", Value::from("123")),
                    ("b", Value::from("true")),
                    ("c", Value::from("  padded ; not a comment  ")),
                ]
            )]
        );
    }

    #[test]
    fn test_quote_must_match() {
        let sections = parse_ok("a=\"it's\"\nb='say \"hi\"'\n");
        assert_eq!(
            sections,
            vec![section(
                "",
                &[("a", Value::from("it's")), ("b", Value::from("say \"hi\""))]
            )]
        );
    }

    #[test]
    fn test_trailing_comment_on_scalar() {
        let sections = parse_ok("[s]\nenabled=true ; note\nlevel = 2;x\n");
        assert_eq!(
            sections,
            vec![section(
                "s",
                &[("enabled", Value::Bool(true)), ("level", Value::Integer(2))]
            )]
        );
    }

    #[test]
    fn test_comment_between_properties() {
        let sections = parse_ok("[s]\na=1\n; comment\nb=2\n");
        assert_eq!(
            sections,
            vec![section("s", &[("a", Value::Integer(1)), ("b", Value::Integer(2))])]
        );
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let sections = parse_ok("[s]\nk=1\nk=two\n");
        assert_eq!(sections[0].len(), 1);
        assert_eq!(sections[0].get("k"), Some(&Value::from("two")));
    }

    #[test]
    fn test_sections_in_order() {
        let sections = parse_ok("top=1\n\n[a]\nx=1\n\n[b]\ny=2\n");
        let names: Vec<&str> = sections.iter().map(|s| s.name()).collect();
        assert_eq!(names, ["", "a", "b"]);
    }

    #[test]
    fn test_header_right_after_property() {
        let sections = parse_ok("[a]\nx=1\n[b]\ny=2");
        assert_eq!(
            sections,
            vec![
                section("a", &[("x", Value::Integer(1))]),
                section("b", &[("y", Value::Integer(2))]),
            ]
        );
    }

    #[test]
    fn test_blank_line_ends_section() {
        let sections = parse_ok("[a]\nx=1\n\ny=2\n");
        assert_eq!(
            sections,
            vec![
                section("a", &[("x", Value::Integer(1))]),
                section("", &[("y", Value::Integer(2))]),
            ]
        );
    }

    #[test]
    fn test_empty_sections() {
        let sections = parse_ok("[public_profile]\n\n[smtp]\n\n[log]\nlevel = 2\n");
        let names: Vec<&str> = sections.iter().map(|s| s.name()).collect();
        assert_eq!(names, ["public_profile", "smtp", "log"]);
        assert!(sections[0].is_empty());
        assert!(sections[1].is_empty());
    }

    #[test]
    fn test_last_section_is_emitted_once() {
        let sections = parse_ok("[a]\nx=1\n\n");
        assert_eq!(sections, vec![section("a", &[("x", Value::Integer(1))])]);
    }

    #[test]
    fn test_last_section_without_newline_is_emitted_once() {
        let sections = parse_ok("[a]\nx=1");
        assert_eq!(sections, vec![section("a", &[("x", Value::Integer(1))])]);
    }

    #[test]
    fn test_key_with_inner_spaces() {
        let sections = parse_ok("[DEVICE1]\n  DISC INPUTS  =  65535\nINPUT REG.=0\n");
        assert_eq!(
            sections,
            vec![section(
                "DEVICE1",
                &[
                    ("DISC INPUTS", Value::Integer(65535)),
                    ("INPUT REG.", Value::Integer(0)),
                ]
            )]
        );
    }

    #[test]
    fn test_header_with_trailing_comment() {
        let sections = parse_ok("[Version] ; required\nSignature=\"$CHICAGO$\"\n");
        assert_eq!(
            sections,
            vec![section("Version", &[("Signature", Value::from("$CHICAGO$"))])]
        );
    }

    #[test]
    fn test_unterminated_header() {
        let err = parse("[abc").unwrap_err();
        assert!(err.is_unexpected_eof());
    }

    #[test]
    fn test_stray_assign_in_properties() {
        let err = parse("[s]\n=value\n").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::UnexpectedSymbol('=')));
        assert_eq!(err.line(), 2);
    }

    #[test]
    fn test_stray_assign_before_any_section_is_skipped() {
        let sections = parse_ok("=\nk=v\n");
        assert_eq!(sections, vec![section("", &[("k", Value::from("v"))])]);
    }

    #[test]
    fn test_empty_value_before_newline() {
        let sections = parse_ok("[s]\na=\nb=   \n");
        assert_eq!(
            sections,
            vec![section("s", &[("a", Value::Null), ("b", Value::Null)])]
        );
    }

    #[test]
    fn test_value_types() {
        let sections = parse_ok("i=42\nz=0\nlz=07\nf=1.5\nip=192.0.2.62\nt=true\nn=\n");
        let s = &sections[0];
        assert_eq!(s.get("i"), Some(&Value::Integer(42)));
        assert_eq!(s.get("z"), Some(&Value::Integer(0)));
        assert_eq!(s.get("lz"), Some(&Value::from("07")));
        assert_eq!(s.get("f"), Some(&Value::Float(1.5)));
        assert_eq!(s.get("ip"), Some(&Value::from("192.0.2.62")));
        assert_eq!(s.get("t"), Some(&Value::Bool(true)));
        assert_eq!(s.get("n"), Some(&Value::Null));
    }

    #[test]
    fn test_tab_is_not_skipped_before_value() {
        // Only spaces are skipped after `=`; the tab is trimmed with the scalar.
        let sections = parse_ok("k=\t 5\n");
        assert_eq!(sections[0].get("k"), Some(&Value::Integer(5)));
    }

    #[test]
    fn test_error_line_after_backup_over_newline() {
        let err = parse("a=\nb=\"x").unwrap_err();
        assert!(err.is_unexpected_eof());
        assert_eq!(err.line(), 2);
    }

    #[test]
    fn test_integer_overflow_line() {
        let err = parse("[s]\nx=99999999999999999999\n").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidInteger { .. }));
        assert_eq!(err.line(), 3);

        let err = parse("[s]\nx=99999999999999999999").unwrap_err();
        assert_eq!(err.line(), 2);
    }

    #[test]
    fn test_stops_at_first_end_of_input() {
        struct Chunks(Vec<&'static [u8]>);
        impl Read for Chunks {
            fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
                if self.0.is_empty() {
                    return Ok(0);
                }
                let chunk = self.0.remove(0);
                buf[..chunk.len()].copy_from_slice(chunk);
                Ok(chunk.len())
            }
        }

        let mut reader = Reader::new(Chunks(vec![b"a=1", b"", b"b=2"]));
        assert!(reader.advance());
        assert_eq!(
            reader.take_section(),
            Some(section("", &[("a", Value::Integer(1))]))
        );
        assert!(!reader.advance());
        assert!(!reader.advance());
        assert!(reader.error().is_none());
    }

    #[test]
    fn test_float_overflow_faults() {
        let input = format!("x=1{}.0\n", "0".repeat(400));
        let err = parse(&input).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidFloat { .. }));
        assert_eq!(err.line(), 2);
    }

    #[test]
    fn test_invalid_utf8() {
        let input: &[u8] = b"[s]\nk=v\xFF\n";
        let err = Reader::new(input).read_all().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidUtf8(_)));
        assert_eq!(err.line(), 2);
    }

    #[test]
    fn test_advance_api() {
        let mut reader = Reader::new("[a]\nx=1\n\n[b]\n".as_bytes());
        assert_eq!(reader.line(), 1);
        assert!(reader.advance());
        assert_eq!(reader.section().map(Section::name), Some("a"));
        // The blank line that ended `a` has been consumed.
        assert_eq!(reader.line(), 4);
        assert!(reader.advance());
        assert_eq!(reader.section().map(Section::name), Some("b"));
        assert_eq!(reader.line(), 5);
        assert!(!reader.advance());
        assert!(reader.section().is_none());
        assert!(reader.error().is_none());
        assert!(!reader.advance());
    }

    #[test]
    fn test_advance_records_error() {
        let mut reader = Reader::with_filename("[a]\nx=1\n\n[b]\ny='open".as_bytes(), Some("t.ini"));
        assert!(reader.advance());
        assert!(!reader.advance());
        let err = reader.error().expect("error recorded");
        assert_eq!(err.to_string(), "ini: line:5 unexpected end of input of <t.ini>");
        assert!(!reader.advance());
    }

    #[test]
    fn test_iterator_yields_error_once() {
        let mut reader = Reader::new("k='open".as_bytes());
        assert!(matches!(reader.next(), Some(Err(_))));
        assert!(reader.next().is_none());
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_read_all_discards_sections_on_error() {
        let result = parse("[a]\nx=1\n\n[b\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_idempotent() {
        let input = "top=1\n\n[a]\nx=\"q\"\ny=2.5 ; c\n\n[b]\nz=true\n";
        assert_eq!(parse_ok(input), parse_ok(input));
    }

    #[test]
    fn test_many_tiny_sections() {
        let input = "[s]\n".repeat(10_000);
        assert_eq!(parse_ok(&input).len(), 10_000);
    }

    #[test]
    fn test_borrowed_stream() {
        let mut input: &[u8] = b"[a]\nk=v\n";
        let sections = Reader::new(&mut input).read_all().unwrap();
        assert_eq!(sections.len(), 1);
        assert!(input.is_empty());
    }
}
