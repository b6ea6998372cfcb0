#![forbid(unsafe_code)]

//! Text handling for odo.
//!
//! - [`NumberFormat`] - grouped decimal formatting and tolerant parsing
//! - [`Glyph`] - the token a rolling digit cell displays
//! - [`GlyphMeasure`] - per-grapheme bounding boxes, injectable for tests
//!
//! # Example
//! ```
//! use odo_text::{GlyphMeasure, MonospaceMeasure, NumberFormat};
//!
//! let fmt = NumberFormat::new();
//! let text = fmt.format(1_234_567);
//! assert_eq!(text, "1,234,567");
//! assert_eq!(fmt.parse(&text), Ok(Some(1_234_567)));
//!
//! let boxes = MonospaceMeasure::new().character_boxes(&text);
//! assert_eq!(boxes.len(), 9);
//! ```

pub mod glyph;
pub mod measure;
pub mod number;

pub use glyph::Glyph;
pub use measure::{GlyphMeasure, MonospaceMeasure};
pub use number::{NumberFormat, ParseError, RangeError};

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width of `text` in terminal columns.
#[inline]
#[must_use]
pub fn display_width(text: &str) -> usize {
    text.width()
}

/// Number of extended grapheme clusters in `text`.
#[inline]
#[must_use]
pub fn grapheme_count(text: &str) -> usize {
    text.graphemes(true).count()
}
