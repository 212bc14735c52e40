//! Character classes for the INI grammar.
//!
//! Newline is deliberately absent from [`is_whitespace`]: it delimits
//! sections and values, so every state handles it explicitly.

/// Starts a comment that runs to the end of the line.
pub const COMMENT: char = ';';

/// Separates a property name from its value.
pub const ASSIGN: char = '=';

/// Opens a section header.
pub const SECTION_START: char = '[';

/// Closes a section header.
pub const SECTION_END: char = ']';

/// Space or tab.
pub fn is_whitespace(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Any rune that may appear in a property name.
pub fn is_property_name(c: char) -> bool {
    c != ASSIGN && c != COMMENT
}

/// Opening (and matching closing) quote of a string value.
pub fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}
