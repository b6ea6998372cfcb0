#![forbid(unsafe_code)]

//! Grouped decimal formatting and parsing.
//!
//! Values are unsigned: a grouped field never shows a sign. Signed input is
//! rejected explicitly through [`RangeError`] and [`ParseError::Negative`]
//! instead of being silently mis-formatted.
//!
//! # Invariants
//!
//! 1. `format` never emits a leading or trailing separator.
//! 2. Every group except the most significant has exactly `group_size` digits.
//! 3. `parse(format(v)) == Ok(Some(v))` for every `v`.
//! 4. Parsing distinguishes empty input (`Ok(None)`) from invalid input (`Err`).

use std::fmt;

/// Default grouping separator.
pub const DEFAULT_SEPARATOR: char = ',';
/// Default number of digits per group.
pub const DEFAULT_GROUP_SIZE: usize = 3;

/// Why a piece of text is not a grouped non-negative integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// A character that is neither a digit nor the separator.
    InvalidDigit {
        /// The offending character.
        ch: char,
        /// Its character index in the input.
        index: usize,
    },
    /// The input starts with a minus sign.
    Negative,
    /// The digits do not fit in a `u64`.
    Overflow,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidDigit { ch, index } => {
                write!(f, "invalid character {ch:?} at position {index}")
            }
            ParseError::Negative => write!(f, "negative numbers are not supported"),
            ParseError::Overflow => write!(f, "number is too large"),
        }
    }
}

impl std::error::Error for ParseError {}

/// A signed value outside the representable (non-negative) range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeError {
    /// The rejected value.
    pub value: i64,
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is out of range for a grouped number", self.value)
    }
}

impl std::error::Error for RangeError {}

/// Formatting rules for grouped integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    separator: char,
    group_size: usize,
}

impl NumberFormat {
    /// Comma-separated groups of three.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            group_size: DEFAULT_GROUP_SIZE,
        }
    }

    /// Set the separator (builder).
    ///
    /// Digits and `-` would make parsing ambiguous and are ignored.
    #[must_use]
    pub fn with_separator(mut self, separator: char) -> Self {
        if !separator.is_ascii_digit() && separator != '-' {
            self.separator = separator;
        }
        self
    }

    /// Set the group size (builder). Clamped to at least 1.
    #[must_use]
    pub fn with_group_size(mut self, group_size: usize) -> Self {
        self.group_size = group_size.max(1);
        self
    }

    /// The separator character.
    #[must_use]
    pub const fn separator(&self) -> char {
        self.separator
    }

    /// Digits per group.
    #[must_use]
    pub const fn group_size(&self) -> usize {
        self.group_size
    }

    /// Format `value` as grouped decimal digits.
    #[must_use]
    pub fn format(&self, value: u64) -> String {
        let digits = value.to_string();
        let len = digits.len();
        let mut out = String::with_capacity(len + len / self.group_size);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (len - i) % self.group_size == 0 {
                out.push(self.separator);
            }
            out.push(ch);
        }
        out
    }

    /// Format an optional value; `None` renders as the empty string.
    #[must_use]
    pub fn format_opt(&self, value: Option<u64>) -> String {
        value.map(|v| self.format(v)).unwrap_or_default()
    }

    /// Format a signed value, rejecting negatives.
    pub fn try_format_signed(&self, value: i64) -> Result<String, RangeError> {
        u64::try_from(value)
            .map(|v| self.format(v))
            .map_err(|_| RangeError { value })
    }

    /// Parse grouped text back into a value.
    ///
    /// Separators are stripped wherever they appear. Input that is empty
    /// after stripping parses to `Ok(None)`. A `-` before the first digit is
    /// reported as [`ParseError::Negative`].
    pub fn parse(&self, text: &str) -> Result<Option<u64>, ParseError> {
        let mut value: Option<u64> = None;
        for (index, ch) in text.chars().enumerate() {
            if ch == self.separator {
                continue;
            }
            if ch == '-' && value.is_none() {
                tracing::trace!(input = text, "rejected negative input");
                return Err(ParseError::Negative);
            }
            let Some(digit) = ch.to_digit(10) else {
                tracing::trace!(input = text, index, "rejected non-digit input");
                return Err(ParseError::InvalidDigit { ch, index });
            };
            let next = value
                .unwrap_or(0)
                .checked_mul(10)
                .and_then(|v| v.checked_add(u64::from(digit)))
                .ok_or(ParseError::Overflow)?;
            value = Some(next);
        }
        Ok(value)
    }

    /// Remove separators, keeping every other character.
    #[must_use]
    pub fn strip_separators(&self, text: &str) -> String {
        text.chars().filter(|&c| c != self.separator).collect()
    }
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::new()
    }
}
