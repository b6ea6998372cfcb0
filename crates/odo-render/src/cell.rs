#![forbid(unsafe_code)]

//! Cell and colour types.

use bitflags::bitflags;

/// A compact RGBA colour stored as straight (non-premultiplied) alpha.
///
/// Layout is `0xRRGGBBAA`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PackedRgba(pub u32);

impl PackedRgba {
    /// Fully transparent (alpha = 0).
    pub const TRANSPARENT: Self = Self(0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Create an opaque RGB colour (alpha = 255).
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Create an RGBA colour with explicit alpha.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | (a as u32))
    }

    /// Red channel.
    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Green channel.
    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Blue channel.
    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Alpha channel.
    #[inline]
    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    /// Scale alpha by `opacity` (clamped to [0, 1]).
    #[inline]
    #[must_use]
    pub fn with_opacity(self, opacity: f32) -> Self {
        let opacity = opacity.clamp(0.0, 1.0);
        let a = (f32::from(self.a()) * opacity).round() as u8;
        Self::rgba(self.r(), self.g(), self.b(), a)
    }

    /// Porter-Duff source-over onto an opaque `dst`, returning an opaque colour.
    ///
    /// Terminals cannot show translucency, so faded glyphs are flattened
    /// against the background before presentation.
    #[inline]
    #[must_use]
    pub fn flatten_over(self, dst: Self) -> Self {
        let a = u32::from(self.a());
        let inv = 255 - a;
        let mix = |s: u8, d: u8| ((u32::from(s) * a + u32::from(d) * inv + 127) / 255) as u8;
        Self::rgb(
            mix(self.r(), dst.r()),
            mix(self.g(), dst.g()),
            mix(self.b(), dst.b()),
        )
    }
}

impl core::fmt::Debug for PackedRgba {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{:08x}", self.0)
    }
}

bitflags! {
    /// Text attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CellAttrs: u8 {
        /// Bold weight.
        const BOLD = 0b0001;
        /// Dim/faint.
        const DIM = 0b0010;
        /// Underline.
        const UNDERLINE = 0b0100;
    }
}

/// A single terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Displayed character. A space is an empty cell.
    pub ch: char,
    /// Foreground colour.
    pub fg: PackedRgba,
    /// Background colour.
    pub bg: PackedRgba,
    /// Text attributes.
    pub attrs: CellAttrs,
}

impl Cell {
    /// An empty cell with transparent colours.
    pub const EMPTY: Self = Self {
        ch: ' ',
        fg: PackedRgba::TRANSPARENT,
        bg: PackedRgba::TRANSPARENT,
        attrs: CellAttrs::empty(),
    };

    /// Create a cell from a single character with default colours.
    #[inline]
    pub const fn from_char(ch: char) -> Self {
        Self {
            ch,
            fg: PackedRgba::WHITE,
            bg: PackedRgba::TRANSPARENT,
            attrs: CellAttrs::empty(),
        }
    }

    /// Set the foreground colour (builder).
    #[inline]
    #[must_use]
    pub const fn with_fg(mut self, fg: PackedRgba) -> Self {
        self.fg = fg;
        self
    }

    /// Set the attributes (builder).
    #[inline]
    #[must_use]
    pub const fn with_attrs(mut self, attrs: CellAttrs) -> Self {
        self.attrs = attrs;
        self
    }

    /// Whether the cell shows nothing.
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.ch == ' ' || self.fg.a() == 0
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}
