#![forbid(unsafe_code)]

//! Glyph bounding boxes.
//!
//! The number field positions one roller over each rendered character, so it
//! needs a box per grapheme. Measurement sits behind [`GlyphMeasure`] so the
//! field can be driven by a real text shaper, the monospace terminal model
//! below, or a test double.

use odo_core::geometry::Rect;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Per-grapheme layout boxes for a single line of text.
pub trait GlyphMeasure {
    /// One box per grapheme of `text`, relative to the text origin.
    ///
    /// Implementations may return fewer boxes than graphemes when layout is
    /// not yet available; callers treat that as "try again later".
    fn character_boxes(&self, text: &str) -> Vec<Rect>;
}

impl<F> GlyphMeasure for F
where
    F: Fn(&str) -> Vec<Rect>,
{
    fn character_boxes(&self, text: &str) -> Vec<Rect> {
        self(text)
    }
}

/// Terminal measurement: each grapheme occupies its display width in columns.
///
/// `scale` widens every glyph so large-format digits can be drawn in wider
/// cells; `line_height` is the height of every box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonospaceMeasure {
    scale: u16,
    line_height: u16,
}

impl MonospaceMeasure {
    /// Unit scale, single-row boxes.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            scale: 1,
            line_height: 1,
        }
    }

    /// Horizontal scale per column (builder). Clamped to at least 1.
    #[must_use]
    pub fn with_scale(mut self, scale: u16) -> Self {
        self.scale = scale.max(1);
        self
    }

    /// Box height (builder). Clamped to at least 1.
    #[must_use]
    pub fn with_line_height(mut self, line_height: u16) -> Self {
        self.line_height = line_height.max(1);
        self
    }

    /// Total width of `text` in columns after scaling.
    #[must_use]
    pub fn text_width(&self, text: &str) -> u16 {
        let w = u16::try_from(text.width()).unwrap_or(u16::MAX);
        w.saturating_mul(self.scale)
    }
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self::new()
    }
}

impl GlyphMeasure for MonospaceMeasure {
    fn character_boxes(&self, text: &str) -> Vec<Rect> {
        let mut x: u16 = 0;
        text.graphemes(true)
            .map(|g| {
                let w = u16::try_from(g.width())
                    .unwrap_or(u16::MAX)
                    .saturating_mul(self.scale);
                let rect = Rect::new(x, 0, w, self.line_height);
                x = x.saturating_add(w);
                rect
            })
            .collect()
    }
}
