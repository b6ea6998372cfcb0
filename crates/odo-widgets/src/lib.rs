#![forbid(unsafe_code)]

//! Rolling digit widgets.
//!
//! - [`roller::DigitRoller`] animates one character cell between two glyphs.
//! - [`number_field::FormattedNumberField`] turns keystrokes into a grouped
//!   number and keeps one roller per rendered character.

pub mod number_field;
pub mod roller;

pub use number_field::{FormattedNumberField, Reconcile, RollPolicy};
pub use roller::{AnimatingBehavior, DigitRoller, Direction, RollerEvent, Slot, TransitionToken};

use odo_core::geometry::Rect;
use odo_render::buffer::Buffer;

/// A `Widget` is a renderable component.
///
/// Widgets render themselves into a `Buffer` within a given `Rect`.
pub trait Widget {
    /// Render the widget into the buffer at the given area.
    fn render(&self, area: Rect, buf: &mut Buffer);
}

/// Column at which content of display width `content` starts when centred in `area`.
pub(crate) fn centered_x(area: Rect, content: u16) -> u16 {
    area.x
        .saturating_add(area.width.saturating_sub(content) / 2)
}

/// Row at which a single line is vertically centred in `area`.
pub(crate) fn centered_y(area: Rect) -> u16 {
    area.y.saturating_add(area.height.saturating_sub(1) / 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centering_odd_and_even() {
        assert_eq!(centered_x(Rect::new(10, 0, 3, 1), 1), 11);
        assert_eq!(centered_x(Rect::new(10, 0, 4, 1), 1), 11);
        assert_eq!(centered_y(Rect::new(0, 4, 1, 3)), 5);
        assert_eq!(centered_y(Rect::new(0, 4, 1, 1)), 4);
    }

    #[test]
    fn centering_content_wider_than_area() {
        assert_eq!(centered_x(Rect::new(2, 0, 1, 1), 3), 2);
        assert_eq!(centered_y(Rect::new(0, 2, 1, 0)), 2);
    }
}
