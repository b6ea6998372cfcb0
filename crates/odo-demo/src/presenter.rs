#![forbid(unsafe_code)]

//! Buffer presentation.
//!
//! [`Presenter`] writes a [`Buffer`] to a terminal writer, emitting only the
//! cells that differ from the previously presented frame. Foreground alpha is
//! flattened over the background colour since terminals have no per-glyph
//! opacity.

use std::io::{self, Write};

use crossterm::style::{Attribute, Color, Print, SetAttribute, SetForegroundColor};
use crossterm::{cursor::MoveTo, queue};
use odo_render::buffer::Buffer;
use odo_render::cell::{Cell, CellAttrs, PackedRgba};

/// Incremental buffer writer.
#[derive(Debug)]
pub struct Presenter {
    background: PackedRgba,
    previous: Option<Buffer>,
}

impl Presenter {
    /// A presenter that blends glyphs over `background`.
    pub fn new(background: PackedRgba) -> Self {
        Self {
            background,
            previous: None,
        }
    }

    /// Forget the last frame so the next one is written in full.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    /// Write the cells of `buf` that changed since the last call.
    ///
    /// Returns the number of cells written.
    pub fn present<W: Write>(&mut self, out: &mut W, buf: &Buffer) -> io::Result<usize> {
        let full = self
            .previous
            .as_ref()
            .is_none_or(|prev| prev.width() != buf.width() || prev.height() != buf.height());

        let mut written = 0;
        for y in 0..buf.height() {
            for x in 0..buf.width() {
                let Some(cell) = buf.get(x, y) else {
                    continue;
                };
                let unchanged = !full
                    && self
                        .previous
                        .as_ref()
                        .and_then(|prev| prev.get(x, y))
                        .is_some_and(|prev| prev == cell);
                if unchanged {
                    continue;
                }
                self.write_cell(out, x, y, cell)?;
                written += 1;
            }
        }
        queue!(out, SetAttribute(Attribute::Reset))?;
        out.flush()?;

        odo_core::trace!(written, full, "frame presented");
        self.previous = Some(buf.clone());
        Ok(written)
    }

    fn write_cell<W: Write>(&self, out: &mut W, x: u16, y: u16, cell: &Cell) -> io::Result<()> {
        let color = to_color(cell.fg.flatten_over(self.background));
        queue!(
            out,
            MoveTo(x, y),
            SetAttribute(Attribute::Reset),
            SetForegroundColor(color)
        )?;
        if cell.attrs.contains(CellAttrs::BOLD) {
            queue!(out, SetAttribute(Attribute::Bold))?;
        }
        if cell.attrs.contains(CellAttrs::DIM) {
            queue!(out, SetAttribute(Attribute::Dim))?;
        }
        if cell.attrs.contains(CellAttrs::UNDERLINE) {
            queue!(out, SetAttribute(Attribute::Underlined))?;
        }
        let ch = if cell.is_blank() { ' ' } else { cell.ch };
        queue!(out, Print(ch))
    }
}

fn to_color(c: PackedRgba) -> Color {
    Color::Rgb {
        r: c.r(),
        g: c.g(),
        b: c.b(),
    }
}
