#![forbid(unsafe_code)]

//! Buffer grid storage.
//!
//! The `Buffer` is a 2D grid of [`Cell`]s. Widgets draw into it through
//! [`Buffer::set`], which honours a scissor (clipping) stack and an opacity
//! stack; rollers use both to slide glyphs through a clipped cell while
//! fading them.
//!
//! # Invariants
//!
//! 1. `cells.len() == width * height`
//! 2. Scissor stack intersection monotonically decreases on push
//! 3. Opacity stack product stays in `[0.0, 1.0]`
//! 4. Scissor/opacity stacks always have at least one element

use crate::cell::{Cell, CellAttrs, PackedRgba};
use odo_core::geometry::Rect;
use unicode_width::UnicodeWidthChar;

/// A 2D grid of terminal cells.
///
/// # Example
///
/// ```
/// use odo_render::buffer::Buffer;
/// use odo_render::cell::Cell;
///
/// let mut buffer = Buffer::new(8, 2);
/// buffer.set(0, 0, Cell::from_char('4'));
/// assert_eq!(buffer.row_text(0), "4");
/// ```
#[derive(Debug, Clone)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
    scissor_stack: Vec<Rect>,
    opacity_stack: Vec<f32>,
}

impl Buffer {
    /// Create a new buffer with the given dimensions.
    ///
    /// # Panics
    ///
    /// Panics if width or height is 0.
    pub fn new(width: u16, height: u16) -> Self {
        assert!(width > 0, "buffer width must be > 0");
        assert!(height > 0, "buffer height must be > 0");

        Self {
            width,
            height,
            cells: vec![Cell::EMPTY; width as usize * height as usize],
            scissor_stack: vec![Rect::from_size(width, height)],
            opacity_stack: vec![1.0],
        }
    }

    /// Buffer width in cells.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Buffer height in cells.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Bounding rect of the entire buffer.
    #[inline]
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Get a reference to the cell at (x, y).
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Set the cell at (x, y).
    ///
    /// - Skips cells outside the bounds or the current scissor region
    /// - Scales the foreground alpha by the current opacity
    /// - Skips fully transparent glyphs
    /// - A cell keeps the most opaque glyph written to it since the last
    ///   clear, so a fading glyph never hides one that is fading in
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        let Some(idx) = self.index(x, y) else {
            return;
        };
        if !self.current_scissor().contains(x, y) {
            return;
        }

        let opacity = self.current_opacity();
        let fg = if opacity < 1.0 {
            cell.fg.with_opacity(opacity)
        } else {
            cell.fg
        };
        if fg.a() == 0 {
            return;
        }

        let existing = &self.cells[idx];
        if !existing.is_blank() && existing.fg.a() > fg.a() {
            return;
        }

        self.cells[idx] = Cell { fg, ..cell };
    }

    /// Draw a string starting at (x, y), stopping before `max_x`.
    ///
    /// Returns the x position after the last drawn character. Zero-width
    /// characters are skipped and wide characters that would cross `max_x`
    /// end the run.
    pub fn draw_str(
        &mut self,
        mut x: u16,
        y: u16,
        text: &str,
        fg: PackedRgba,
        attrs: CellAttrs,
        max_x: u16,
    ) -> u16 {
        for ch in text.chars() {
            let w = ch.width().unwrap_or(0) as u16;
            if w == 0 {
                continue;
            }
            if x.saturating_add(w) > max_x {
                break;
            }
            self.set(x, y, Cell::from_char(ch).with_fg(fg).with_attrs(attrs));
            x = x.saturating_add(w);
        }
        x
    }

    /// Clear all cells.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Raw access to the cell slice, row-major.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Characters of row `y` with trailing blanks trimmed.
    ///
    /// Transparent cells read as spaces. Returns an empty string for rows
    /// outside the buffer.
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        let start = y as usize * self.width as usize;
        let row: String = self.cells[start..start + self.width as usize]
            .iter()
            .map(|c| if c.is_blank() { ' ' } else { c.ch })
            .collect();
        row.trim_end().to_string()
    }

    // ========== Scissor Stack ==========

    /// Push a scissor (clipping) region onto the stack.
    ///
    /// The effective scissor is the intersection of all pushed rects.
    pub fn push_scissor(&mut self, rect: Rect) {
        let intersected = self.current_scissor().intersection(&rect);
        self.scissor_stack.push(intersected);
    }

    /// Pop a scissor region. The base scissor is never popped.
    pub fn pop_scissor(&mut self) {
        if self.scissor_stack.len() > 1 {
            self.scissor_stack.pop();
        }
    }

    /// Current effective scissor region.
    #[inline]
    pub fn current_scissor(&self) -> Rect {
        self.scissor_stack
            .last()
            .copied()
            .unwrap_or_else(|| self.bounds())
    }

    // ========== Opacity Stack ==========

    /// Push an opacity multiplier onto the stack.
    ///
    /// The effective opacity is the product of all pushed values, each
    /// clamped to `[0.0, 1.0]`.
    pub fn push_opacity(&mut self, opacity: f32) {
        let clamped = if opacity.is_nan() {
            0.0
        } else {
            opacity.clamp(0.0, 1.0)
        };
        let current = self.current_opacity();
        self.opacity_stack.push(current * clamped);
    }

    /// Pop an opacity value. The base opacity is never popped.
    pub fn pop_opacity(&mut self) {
        if self.opacity_stack.len() > 1 {
            self.opacity_stack.pop();
        }
    }

    /// Current effective opacity.
    #[inline]
    pub fn current_opacity(&self) -> f32 {
        self.opacity_stack.last().copied().unwrap_or(1.0)
    }
}

impl Default for Buffer {
    /// A 1x1 buffer (minimum size).
    fn default() -> Self {
        Self::new(1, 1)
    }
}
