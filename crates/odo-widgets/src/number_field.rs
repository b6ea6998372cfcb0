#![forbid(unsafe_code)]

//! Grouped number input with rolling digits.
//!
//! [`FormattedNumberField`] keeps an optional `u64`, renders it as grouped
//! text (`1234567` → `"1,234,567"`), and lays one [`DigitRoller`] over every
//! character of that text. The text itself is never drawn; what the user
//! sees are the rollers.
//!
//! # Reconciliation
//!
//! Whenever the displayed text changes, and on every layout pass, the roller
//! pool is aligned to the text:
//!
//! - roller `i` is placed on the box of grapheme `i` and told its glyph;
//! - missing rollers are appended;
//! - rollers past the end are detached, roll out, and are dropped once their
//!   exit settles.
//!
//! Rollers keep their identity by position: roller `i` stays roller `i` for
//! as long as the text has at least `i + 1` characters.
//!
//! # Failure Modes
//!
//! - Empty text: the pass is skipped and the pool is left as it was.
//! - Fewer (or more) glyph boxes than graphemes: the pass is skipped and the
//!   next layout pass tries again.
//! - Invalid keystrokes: the error is returned and the value is unchanged.

use std::time::Duration;

use odo_core::animation::Curve;
use odo_core::event::{Event, KeyCode, Modifiers};
use odo_core::geometry::Rect;
use odo_render::buffer::Buffer;
use odo_render::cell::{CellAttrs, PackedRgba};
use odo_text::{Glyph, GlyphMeasure, MonospaceMeasure, NumberFormat, ParseError};
use unicode_segmentation::UnicodeSegmentation;

use crate::roller::{
    AnimatingBehavior, DEFAULT_DURATION, DigitRoller, Direction, RollerEvent, TransitionToken,
};
use crate::{Widget, centered_y};

/// How the field picks the roll direction for in-place updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollPolicy {
    /// Every changed glyph rolls the same way.
    Fixed(Direction),
    /// Each roller applies its [`AnimatingBehavior`] to the old and new glyph.
    ByValue,
}

impl Default for RollPolicy {
    /// New glyphs drop in from above.
    fn default() -> Self {
        RollPolicy::Fixed(Direction::Descending)
    }
}

/// Result of a reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconcile {
    /// The displayed text is empty; the pool was not touched.
    Empty,
    /// Glyph measurement disagreed with the text; the pool was not touched.
    Stale {
        /// Graphemes in the displayed text.
        graphemes: usize,
        /// Boxes returned by the measurer.
        boxes: usize,
    },
    /// The pool now matches the text.
    Applied {
        /// Rollers appended to the pool.
        created: usize,
        /// Rollers detached for their exit animation.
        retired: usize,
    },
}

#[derive(Debug)]
struct Retiring {
    roller: DigitRoller,
    token: TransitionToken,
}

/// A numeric text field whose characters are drawn by rolling digit cells.
#[derive(Debug)]
pub struct FormattedNumberField<M = MonospaceMeasure> {
    format: NumberFormat,
    measure: M,
    area: Rect,
    raw_value: Option<u64>,
    displayed: String,
    pool: Vec<DigitRoller>,
    retiring: Vec<Retiring>,
    policy: RollPolicy,
    duration: Duration,
    behavior: AnimatingBehavior,
    curve: Curve,
    fg: PackedRgba,
    bleed: u16,
    placeholder: String,
    stale_passes: u64,
}

impl FormattedNumberField {
    /// A field measured with the monospace terminal model.
    pub fn new() -> Self {
        Self::with_measure(MonospaceMeasure::new())
    }
}

impl Default for FormattedNumberField {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: GlyphMeasure> FormattedNumberField<M> {
    /// A field that lays out rollers with `measure`.
    pub fn with_measure(measure: M) -> Self {
        Self {
            format: NumberFormat::new(),
            measure,
            area: Rect::default(),
            raw_value: None,
            displayed: String::new(),
            pool: Vec::new(),
            retiring: Vec::new(),
            policy: RollPolicy::default(),
            duration: DEFAULT_DURATION,
            behavior: AnimatingBehavior::default(),
            curve: Curve::default(),
            fg: PackedRgba::WHITE,
            bleed: 0,
            placeholder: String::new(),
            stale_passes: 0,
        }
    }

    // --- Builder methods ---

    /// Set the grouping rules (builder).
    #[must_use]
    pub fn with_format(mut self, format: NumberFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the roll direction policy (builder).
    #[must_use]
    pub fn with_policy(mut self, policy: RollPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the transition duration of new rollers (builder).
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the animating behaviour of new rollers (builder).
    #[must_use]
    pub fn with_behavior(mut self, behavior: AnimatingBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Set the timing curve of new rollers (builder).
    #[must_use]
    pub fn with_curve(mut self, curve: Curve) -> Self {
        self.curve = curve;
        self
    }

    /// Set the glyph colour of new rollers (builder).
    #[must_use]
    pub fn with_fg(mut self, fg: PackedRgba) -> Self {
        self.fg = fg;
        self
    }

    /// Widen every roller by `bleed` columns on each side (builder).
    #[must_use]
    pub fn with_bleed(mut self, bleed: u16) -> Self {
        self.bleed = bleed;
        self
    }

    /// Text shown while the field is empty (builder).
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    // --- Value access ---

    /// Parsed value.
    pub fn value(&self) -> Option<u64> {
        self.raw_value
    }

    /// Grouped text derived from the value.
    pub fn displayed(&self) -> &str {
        &self.displayed
    }

    /// Field area.
    pub fn area(&self) -> Rect {
        self.area
    }

    /// Rollers aligned to the displayed text.
    pub fn rollers(&self) -> &[DigitRoller] {
        &self.pool
    }

    /// Number of rollers still playing their exit animation.
    pub fn retiring_count(&self) -> usize {
        self.retiring.len()
    }

    /// Number of reconciliation passes skipped because measurement disagreed.
    pub fn stale_passes(&self) -> u64 {
        self.stale_passes
    }

    /// Whether any roller, pooled or retiring, is animating.
    pub fn is_animating(&self) -> bool {
        !self.retiring.is_empty() || self.pool.iter().any(DigitRoller::is_animating)
    }

    /// Set the value and reconcile if the displayed text changed.
    ///
    /// Returns whether the displayed text changed.
    pub fn set_value(&mut self, value: Option<u64>, animated: bool) -> bool {
        self.raw_value = value;
        let text = self.format.format_opt(value);
        if text == self.displayed {
            return false;
        }
        odo_core::debug!(from = %self.displayed, to = %text, "number field text changed");
        self.displayed = text;
        if self.displayed.is_empty() {
            self.blank_pool();
        } else {
            self.reconcile(animated);
        }
        true
    }

    /// Blank every pooled roller in place, keeping the pool length.
    ///
    /// The next non-empty text then rolls in from blank cells rather than
    /// from glyphs that were hidden behind the placeholder.
    fn blank_pool(&mut self) {
        for roller in &mut self.pool {
            roller.set_value_toward(None, Direction::Descending, false, None);
            roller.drain_events();
        }
    }

    /// Parse `text` and set the resulting value with animation.
    ///
    /// On error the field is left unchanged.
    pub fn set_text(&mut self, text: &str) -> Result<bool, ParseError> {
        let value = self.format.parse(text)?;
        Ok(self.set_value(value, true))
    }

    /// Append a typed character.
    ///
    /// The separator is accepted and ignored since grouping is recomputed.
    pub fn insert_char(&mut self, ch: char) -> Result<bool, ParseError> {
        if ch == self.format.separator() {
            return Ok(false);
        }
        let mut digits = self.format.strip_separators(&self.displayed);
        digits.push(ch);
        self.set_text(&digits)
    }

    /// Append pasted text.
    pub fn paste(&mut self, text: &str) -> Result<bool, ParseError> {
        let mut digits = self.format.strip_separators(&self.displayed);
        digits.push_str(text);
        self.set_text(&digits)
    }

    /// Remove the last digit.
    pub fn delete_backward(&mut self) -> bool {
        let mut digits = self.format.strip_separators(&self.displayed);
        if digits.pop().is_none() {
            return false;
        }
        match self.format.parse(&digits) {
            Ok(value) => self.set_value(value, true),
            Err(_) => false,
        }
    }

    /// Clear the value.
    pub fn clear(&mut self) -> bool {
        self.set_value(None, true)
    }

    /// Apply an input event.
    ///
    /// Returns whether the displayed text changed. Unhandled events return
    /// `Ok(false)`.
    pub fn handle_event(&mut self, event: &Event) -> Result<bool, ParseError> {
        match event {
            Event::Key(key) if key.is_down() => {
                if key.modifiers.intersects(Modifiers::CTRL | Modifiers::ALT) {
                    return Ok(false);
                }
                match key.code {
                    KeyCode::Char(ch) => self.insert_char(ch),
                    KeyCode::Backspace => Ok(self.delete_backward()),
                    KeyCode::Delete | KeyCode::Escape => Ok(self.clear()),
                    _ => Ok(false),
                }
            }
            Event::Paste(text) => self.paste(text),
            _ => Ok(false),
        }
    }

    // --- Layout and time ---

    /// Assign the field area and run an unanimated layout pass.
    pub fn set_area(&mut self, area: Rect) -> Reconcile {
        self.area = area;
        self.reconcile(false)
    }

    /// Align the roller pool with the displayed text.
    pub fn reconcile(&mut self, animated: bool) -> Reconcile {
        let _span = odo_core::debug_span!("reconcile", animated).entered();

        if self.displayed.is_empty() {
            return Reconcile::Empty;
        }

        let boxes = self.measure.character_boxes(&self.displayed);
        let graphemes: Vec<&str> = self.displayed.graphemes(true).collect();
        if boxes.len() != graphemes.len() {
            self.stale_passes += 1;
            odo_core::debug!(
                graphemes = graphemes.len(),
                boxes = boxes.len(),
                "glyph boxes disagree with text, skipping pass"
            );
            return Reconcile::Stale {
                graphemes: graphemes.len(),
                boxes: boxes.len(),
            };
        }

        let created = graphemes.len().saturating_sub(self.pool.len());
        while self.pool.len() < graphemes.len() {
            let roller = self.new_roller();
            self.pool.push(roller);
        }

        let policy = self.policy;
        for ((roller, grapheme), glyph_box) in self.pool.iter_mut().zip(&graphemes).zip(&boxes) {
            let rect = Rect::new(
                self.area.x.saturating_add(glyph_box.x),
                self.area.y,
                glyph_box.width,
                self.area.height,
            )
            .widen(self.bleed);
            roller.set_area(rect);

            let glyph = grapheme.chars().next().map(Glyph::from_char);
            match policy {
                RollPolicy::Fixed(direction) => {
                    roller.set_value_toward(glyph, direction, animated, None)
                }
                RollPolicy::ByValue => roller.set_value(glyph, animated, None),
            };
        }

        let surplus = self.pool.split_off(graphemes.len());
        let retired = surplus.len();
        for mut roller in surplus {
            if let Some(token) = roller.set_value_toward(None, Direction::Ascending, true, None) {
                self.retiring.push(Retiring { roller, token });
            }
        }

        odo_core::debug!(
            text = %self.displayed,
            pool = self.pool.len(),
            created,
            retired,
            "reconciled roller pool"
        );
        Reconcile::Applied { created, retired }
    }

    /// Advance every roller by `dt` and drop retirees whose exit settled.
    pub fn tick(&mut self, dt: Duration) {
        for roller in &mut self.pool {
            roller.tick(dt);
            roller.drain_events();
        }
        self.retiring.retain_mut(|retiring| {
            retiring.roller.tick(dt);
            let exited = retiring
                .roller
                .drain_events()
                .contains(&RollerEvent::Settled(retiring.token));
            !exited
        });
    }

    fn new_roller(&self) -> DigitRoller {
        DigitRoller::new()
            .with_duration(self.duration)
            .with_behavior(self.behavior)
            .with_curve(self.curve)
            .with_fg(self.fg)
    }
}

impl<M: GlyphMeasure> Widget for FormattedNumberField<M> {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }

        buf.push_scissor(area);
        if self.displayed.is_empty() {
            if !self.placeholder.is_empty() && self.retiring.is_empty() {
                buf.draw_str(
                    area.x,
                    centered_y(area),
                    &self.placeholder,
                    self.fg,
                    CellAttrs::DIM,
                    area.right(),
                );
            }
        } else {
            for roller in &self.pool {
                roller.render(roller.area(), buf);
            }
        }
        for retiring in &self.retiring {
            retiring.roller.render(retiring.roller.area(), buf);
        }
        buf.pop_scissor();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use odo_core::event::KeyEvent;

    const AREA: Rect = Rect::new(0, 0, 20, 3);

    fn field() -> FormattedNumberField {
        let mut field = FormattedNumberField::new();
        field.set_area(AREA);
        field
    }

    fn glyphs(field: &FormattedNumberField<impl GlyphMeasure>) -> String {
        field
            .rollers()
            .iter()
            .map(|r| r.current().map_or(' ', |g| g.as_char()))
            .collect()
    }

    fn settle(field: &mut FormattedNumberField<impl GlyphMeasure>) {
        for _ in 0..100 {
            if !field.is_animating() {
                return;
            }
            field.tick(Duration::from_millis(16));
        }
        panic!("field never settled");
    }

    #[test]
    fn value_formats_with_groups() {
        let mut field = field();
        assert!(field.set_value(Some(1_234_567), true));
        assert_eq!(field.displayed(), "1,234,567");
        assert_eq!(field.rollers().len(), 9);
        assert_eq!(glyphs(&field), "1,234,567");
    }

    #[test]
    fn unchanged_text_does_not_reconcile() {
        let mut field = field();
        field.set_value(Some(5), false);
        assert!(!field.set_value(Some(5), true));
        assert!(!field.is_animating());
    }

    #[test]
    fn rollers_sit_on_glyph_boxes() {
        let mut field = FormattedNumberField::new();
        field.set_area(Rect::new(4, 2, 20, 3));
        field.set_value(Some(1234), false);
        let areas: Vec<Rect> = field.rollers().iter().map(DigitRoller::area).collect();
        assert_eq!(areas[0], Rect::new(4, 2, 1, 3));
        assert_eq!(areas[1], Rect::new(5, 2, 1, 3));
        assert_eq!(areas[4], Rect::new(8, 2, 1, 3));
    }

    #[test]
    fn bleed_widens_rollers() {
        let mut field = FormattedNumberField::new().with_bleed(1);
        field.set_area(Rect::new(4, 0, 20, 1));
        field.set_value(Some(12), false);
        assert_eq!(field.rollers()[0].area(), Rect::new(3, 0, 3, 1));
    }

    #[test]
    fn growing_appends_and_keeps_positions() {
        let mut field = field();
        field.set_value(Some(99), false);
        assert_eq!(field.rollers().len(), 2);
        field.set_value(Some(100), true);
        assert_eq!(field.rollers().len(), 3);
        assert_eq!(glyphs(&field), "100");
    }

    #[test]
    fn growth_reports_created_rollers() {
        let mut field = field();
        field.set_value(Some(99), false);
        assert_eq!(
            field.reconcile(false),
            Reconcile::Applied {
                created: 0,
                retired: 0
            }
        );
        field.set_value(Some(1_000), false);
        assert_eq!(field.rollers().len(), 5);
    }

    #[test]
    fn shrinking_retires_trailing_rollers() {
        let mut field = field();
        field.set_value(Some(123), false);
        field.set_value(Some(12), true);
        assert_eq!(field.rollers().len(), 2);
        assert_eq!(field.retiring_count(), 1);
        assert_eq!(glyphs(&field), "12");

        settle(&mut field);
        assert_eq!(field.retiring_count(), 0);
        assert_eq!(field.rollers().len(), 2);
    }

    #[test]
    fn retiring_roller_exits_ascending_to_blank() {
        let mut field = field();
        field.set_value(Some(123), false);
        field.set_value(Some(12), true);
        let retiring = &field.retiring[0].roller;
        assert_eq!(retiring.current(), None);
        assert!(retiring.is_animating());
        field.tick(Duration::from_millis(100));
        let old = field.retiring[0].roller.slots()[1];
        assert!(old.offset < 0.0, "old glyph should travel up: {old:?}");
    }

    #[test]
    fn regrowth_during_retirement_creates_fresh_rollers() {
        let mut field = field();
        field.set_value(Some(123), false);
        field.set_value(Some(12), true);
        field.set_value(Some(124), true);
        assert_eq!(field.rollers().len(), 3);
        assert_eq!(field.retiring_count(), 1);
        assert_eq!(glyphs(&field), "124");
        settle(&mut field);
        assert_eq!(field.retiring_count(), 0);
        assert_eq!(glyphs(&field), "124");
    }

    #[test]
    fn in_place_updates_roll_down() {
        let mut field = field();
        field.set_value(Some(15), false);
        field.set_value(Some(18), true);
        field.tick(Duration::from_millis(100));
        let incoming = field.rollers()[1].slots()[0];
        assert_eq!(incoming.glyph, Glyph::digit(8));
        assert!(incoming.offset > -3.0, "new digit should drop from above");
    }

    #[test]
    fn by_value_policy_uses_roller_behavior() {
        let mut field = FormattedNumberField::new().with_policy(RollPolicy::ByValue);
        field.set_area(AREA);
        field.set_value(Some(15), false);
        field.set_value(Some(18), true);
        field.tick(Duration::from_millis(100));
        let incoming = field.rollers()[1].slots()[2];
        assert_eq!(incoming.glyph, Glyph::digit(8));
        assert!(incoming.offset < 3.0, "increase should ascend from below");
    }

    #[test]
    fn clearing_leaves_pool_untouched() {
        let mut field = field();
        field.set_value(Some(42), false);
        assert!(field.clear());
        assert_eq!(field.displayed(), "");
        assert_eq!(field.value(), None);
        assert_eq!(field.rollers().len(), 2);
        assert!(field.rollers().iter().all(|r| r.current().is_none()));
        assert_eq!(field.reconcile(true), Reconcile::Empty);
    }

    #[test]
    fn typing_after_clear_shows_no_cleared_digits() {
        let mut field = field();
        field.set_value(Some(42), false);
        field.clear();
        field.insert_char('5').unwrap();
        field.tick(Duration::from_millis(16));

        assert_eq!(field.rollers().len(), 1);
        assert_eq!(field.retiring_count(), 0);
        let mut buf = Buffer::new(20, 3);
        field.render(AREA, &mut buf);
        for y in 0..3 {
            let row = buf.row_text(y);
            assert!(!row.contains('4') && !row.contains('2'), "row {y}: {row:?}");
        }
        assert_eq!(field.rollers()[0].current(), Glyph::digit(5));
    }

    #[test]
    fn short_measurement_skips_pass() {
        let short = |text: &str| -> Vec<Rect> {
            let mut boxes = MonospaceMeasure::new().character_boxes(text);
            boxes.pop();
            boxes
        };
        let mut field = FormattedNumberField::with_measure(short);
        field.set_area(AREA);
        field.set_value(Some(12), true);
        assert!(field.rollers().is_empty());
        assert_eq!(field.stale_passes(), 1);
        assert_eq!(
            field.reconcile(false),
            Reconcile::Stale {
                graphemes: 2,
                boxes: 1
            }
        );
        assert_eq!(field.displayed(), "12");
    }

    #[test]
    fn resize_lays_out_again_without_animation() {
        let mut field = field();
        field.set_value(Some(7), true);
        assert!(field.is_animating());
        field.set_area(Rect::new(0, 0, 20, 5));
        assert!(!field.is_animating());
        assert_eq!(field.rollers()[0].area().height, 5);
    }

    // --- input ---

    #[test]
    fn typing_builds_grouped_value() {
        let mut field = field();
        for ch in "1234".chars() {
            field.insert_char(ch).unwrap();
        }
        assert_eq!(field.value(), Some(1234));
        assert_eq!(field.displayed(), "1,234");
    }

    #[test]
    fn separator_keystroke_is_ignored() {
        let mut field = field();
        field.insert_char('1').unwrap();
        assert_eq!(field.insert_char(','), Ok(false));
        assert_eq!(field.displayed(), "1");
    }

    #[test]
    fn invalid_keystroke_leaves_value() {
        let mut field = field();
        field.set_value(Some(12), false);
        assert_eq!(
            field.insert_char('x'),
            Err(ParseError::InvalidDigit { ch: 'x', index: 2 })
        );
        assert_eq!(field.value(), Some(12));
        assert_eq!(field.displayed(), "12");
    }

    #[test]
    fn overflow_is_rejected() {
        let mut field = field();
        field.set_value(Some(u64::MAX), false);
        assert_eq!(field.insert_char('0'), Err(ParseError::Overflow));
        assert_eq!(field.value(), Some(u64::MAX));
    }

    #[test]
    fn set_text_rejects_negative() {
        let mut field = field();
        assert_eq!(field.set_text("-5"), Err(ParseError::Negative));
        assert_eq!(field.value(), None);
    }

    #[test]
    fn leading_zero_collapses() {
        let mut field = field();
        field.insert_char('0').unwrap();
        field.insert_char('5').unwrap();
        assert_eq!(field.displayed(), "5");
    }

    #[test]
    fn backspace_regroups() {
        let mut field = field();
        field.set_value(Some(1234), false);
        assert!(field.delete_backward());
        assert_eq!(field.displayed(), "123");
        assert_eq!(field.retiring_count(), 2);
    }

    #[test]
    fn backspace_on_empty_is_noop() {
        let mut field = field();
        assert!(!field.delete_backward());
    }

    #[test]
    fn key_events_drive_the_field() {
        let mut field = field();
        let press = |code| Event::Key(KeyEvent::new(code));
        assert_eq!(field.handle_event(&press(KeyCode::Char('9'))), Ok(true));
        assert_eq!(field.handle_event(&press(KeyCode::Char('9'))), Ok(true));
        assert_eq!(field.handle_event(&press(KeyCode::Backspace)), Ok(true));
        assert_eq!(field.value(), Some(9));
        assert_eq!(field.handle_event(&press(KeyCode::Delete)), Ok(true));
        assert_eq!(field.value(), None);
        assert_eq!(field.handle_event(&press(KeyCode::Left)), Ok(false));
    }

    #[test]
    fn ctrl_keys_are_ignored() {
        let mut field = field();
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c')).with_modifiers(Modifiers::CTRL));
        assert_eq!(field.handle_event(&ctrl_c), Ok(false));
    }

    #[test]
    fn paste_appends_digits() {
        let mut field = field();
        field.set_value(Some(1), false);
        assert_eq!(field.handle_event(&Event::Paste("2,345".into())), Ok(true));
        assert_eq!(field.value(), Some(12_345));
    }

    // --- rendering ---

    #[test]
    fn renders_digits_on_center_row() {
        let mut field = field();
        field.set_value(Some(1234), false);
        let mut buf = Buffer::new(20, 3);
        field.render(AREA, &mut buf);
        assert_eq!(buf.row_text(1), "1,234");
        assert_eq!(buf.row_text(0), "");
    }

    #[test]
    fn renders_placeholder_when_empty() {
        let mut field = FormattedNumberField::new().with_placeholder("0");
        field.set_area(AREA);
        let mut buf = Buffer::new(20, 3);
        field.render(AREA, &mut buf);
        assert_eq!(buf.row_text(1), "0");
        assert!(buf.get(0, 1).is_some_and(|c| c.attrs.contains(CellAttrs::DIM)));
    }

    #[test]
    fn render_clips_to_field() {
        let mut field = FormattedNumberField::new();
        field.set_area(Rect::new(0, 0, 3, 1));
        field.set_value(Some(123_456), false);
        let mut buf = Buffer::new(10, 1);
        field.render(field.area(), &mut buf);
        assert_eq!(buf.row_text(0), "123");
    }
}
