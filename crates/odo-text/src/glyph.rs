#![forbid(unsafe_code)]

//! Glyph tokens shown by rolling digit cells.

use std::fmt;

/// A single character cell's content: a decimal digit or a separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Glyph {
    /// A decimal digit, always in `0..=9`.
    Digit(u8),
    /// Any non-digit character, such as a grouping separator.
    Separator(char),
}

impl Glyph {
    /// A digit glyph, or `None` if `value > 9`.
    #[must_use]
    pub const fn digit(value: u8) -> Option<Self> {
        if value <= 9 {
            Some(Glyph::Digit(value))
        } else {
            None
        }
    }

    /// Classify a character. ASCII digits become [`Glyph::Digit`].
    #[must_use]
    pub const fn from_char(ch: char) -> Self {
        if ch.is_ascii_digit() {
            Glyph::Digit(ch as u8 - b'0')
        } else {
            Glyph::Separator(ch)
        }
    }

    /// Numeric value for digits, `None` for separators.
    #[must_use]
    pub const fn numeric(&self) -> Option<u8> {
        match self {
            Glyph::Digit(d) => Some(*d),
            Glyph::Separator(_) => None,
        }
    }

    /// The character to draw.
    #[must_use]
    pub const fn as_char(&self) -> char {
        match self {
            Glyph::Digit(d) => (b'0' + *d) as char,
            Glyph::Separator(c) => *c,
        }
    }
}

impl From<char> for Glyph {
    fn from(ch: char) -> Self {
        Glyph::from_char(ch)
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}
