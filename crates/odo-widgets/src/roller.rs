#![forbid(unsafe_code)]

//! Rolling digit cell.
//!
//! A [`DigitRoller`] shows one [`Glyph`] and animates to a new one by sliding
//! three stacked slots through its area: the new glyph enters from one edge
//! while the old glyph leaves through the other.
//!
//! # Slots
//!
//! Slots are indexed `[above, center, below]`. When a transition starts the
//! center slot holds the old glyph at offset 0, and both outer slots hold the
//! new glyph one cell height away, invisible. All three then move by
//! `direction.coefficient() * height`, so exactly one outer slot lands at
//! offset 0 while the old glyph leaves.
//!
//! # Invariants
//!
//! 1. Once no transition is in flight, the center slot shows `current()` at
//!    offset 0 with opacity 1 and the outer slots have opacity 0.
//! 2. Each started transition gets a fresh [`TransitionToken`]; starting a new
//!    one drops the previous completion callback unrun and its token never
//!    settles.
//! 3. Setting the value already displayed does not touch the slots.
//!
//! Time only advances through [`DigitRoller::tick`].

use std::fmt;
use std::time::Duration;

use odo_core::animation::{Animation, Curve, Tween, lerp};
use odo_core::geometry::Rect;
use odo_render::buffer::Buffer;
use odo_render::cell::{Cell, CellAttrs, PackedRgba};
use odo_text::Glyph;
use unicode_width::UnicodeWidthChar;

use crate::{Widget, centered_x, centered_y};

/// Default transition length.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(450);

/// Which way glyphs travel during a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// The new glyph enters from below; content moves up.
    Ascending,
    /// The new glyph enters from above; content moves down.
    Descending,
}

impl Direction {
    /// Sign of the vertical travel: -1 moves content up, +1 moves it down.
    pub const fn coefficient(self) -> f32 {
        match self {
            Direction::Ascending => -1.0,
            Direction::Descending => 1.0,
        }
    }
}

/// Policy mapping a value change to a [`Direction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnimatingBehavior {
    /// Ascend when the new value is greater, otherwise descend.
    #[default]
    AscendOnIncrease,
    /// Descend when the new value is greater, otherwise ascend.
    DescendOnIncrease,
    /// Always ascend.
    AlwaysAscend,
    /// Always descend.
    AlwaysDescend,
}

impl AnimatingBehavior {
    /// Direction for a change from `from` to `to`.
    ///
    /// Blanks and separators count as zero.
    pub fn direction(self, from: Option<Glyph>, to: Option<Glyph>) -> Direction {
        let numeric = |g: Option<Glyph>| g.and_then(|g| g.numeric()).unwrap_or(0);
        let increasing = numeric(to) > numeric(from);
        match self {
            AnimatingBehavior::AscendOnIncrease if increasing => Direction::Ascending,
            AnimatingBehavior::AscendOnIncrease => Direction::Descending,
            AnimatingBehavior::DescendOnIncrease if increasing => Direction::Descending,
            AnimatingBehavior::DescendOnIncrease => Direction::Ascending,
            AnimatingBehavior::AlwaysAscend => Direction::Ascending,
            AnimatingBehavior::AlwaysDescend => Direction::Descending,
        }
    }
}

/// Identifies one started transition of one roller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransitionToken(u64);

/// Events queued by a roller, drained with [`DigitRoller::drain_events`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollerEvent {
    /// The transition reached its resting state.
    Settled(TransitionToken),
}

/// Callback run when a transition settles.
pub type Completion = Box<dyn FnOnce()>;

/// One of the three display surfaces of a roller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    /// Glyph drawn by this slot, `None` for blank.
    pub glyph: Option<Glyph>,
    /// Vertical offset in rows from the resting position.
    pub offset: f32,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
}

impl Slot {
    const fn new(glyph: Option<Glyph>, offset: f32, opacity: f32) -> Self {
        Self {
            glyph,
            offset,
            opacity,
        }
    }

    /// Whether the slot would draw anything.
    pub fn is_visible(&self) -> bool {
        self.glyph.is_some() && self.opacity > 0.0
    }
}

struct Transition {
    token: TransitionToken,
    tween: Tween,
    travel: f32,
    on_complete: Option<Completion>,
}

/// An animated single-character cell.
pub struct DigitRoller {
    area: Rect,
    current: Option<Glyph>,
    duration: Duration,
    behavior: AnimatingBehavior,
    curve: Curve,
    fg: PackedRgba,
    attrs: CellAttrs,
    slots: [Slot; 3],
    transition: Option<Transition>,
    next_token: u64,
    events: Vec<RollerEvent>,
}

impl fmt::Debug for DigitRoller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigitRoller")
            .field("area", &self.area)
            .field("current", &self.current)
            .field("behavior", &self.behavior)
            .field("slots", &self.slots)
            .field("in_flight", &self.in_flight())
            .field("pending_events", &self.events.len())
            .finish()
    }
}

impl Default for DigitRoller {
    fn default() -> Self {
        Self::new()
    }
}

impl DigitRoller {
    /// A blank roller with no area.
    pub fn new() -> Self {
        Self {
            area: Rect::default(),
            current: None,
            duration: DEFAULT_DURATION,
            behavior: AnimatingBehavior::default(),
            curve: Curve::default(),
            fg: PackedRgba::WHITE,
            attrs: CellAttrs::BOLD,
            slots: resting_slots(None, 0.0),
            transition: None,
            next_token: 0,
            events: Vec::new(),
        }
    }

    /// Set the transition duration (builder).
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the direction policy used by [`set_value`](Self::set_value) (builder).
    #[must_use]
    pub fn with_behavior(mut self, behavior: AnimatingBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Set the timing curve (builder).
    #[must_use]
    pub fn with_curve(mut self, curve: Curve) -> Self {
        self.curve = curve;
        self
    }

    /// Set the glyph colour (builder).
    #[must_use]
    pub fn with_fg(mut self, fg: PackedRgba) -> Self {
        self.fg = fg;
        self
    }

    /// Set the glyph attributes (builder).
    #[must_use]
    pub fn with_attrs(mut self, attrs: CellAttrs) -> Self {
        self.attrs = attrs;
        self
    }

    /// Glyph currently displayed (or being rolled in).
    pub fn current(&self) -> Option<Glyph> {
        self.current
    }

    /// Area assigned by the owner.
    pub fn area(&self) -> Rect {
        self.area
    }

    /// Direction policy.
    pub fn behavior(&self) -> AnimatingBehavior {
        self.behavior
    }

    /// Change the direction policy.
    pub fn set_behavior(&mut self, behavior: AnimatingBehavior) {
        self.behavior = behavior;
    }

    /// Transition duration.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// The three slots, `[above, center, below]`.
    pub fn slots(&self) -> &[Slot; 3] {
        &self.slots
    }

    /// Token of the transition in flight, if any.
    pub fn in_flight(&self) -> Option<TransitionToken> {
        self.transition.as_ref().map(|t| t.token)
    }

    /// Whether a transition is in flight.
    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Drain queued events.
    pub fn drain_events(&mut self) -> Vec<RollerEvent> {
        std::mem::take(&mut self.events)
    }

    /// Assign the roller's area.
    ///
    /// A change of size re-stages the slots at the current glyph without
    /// animation, settling any transition in flight. Moving without resizing
    /// keeps the transition running.
    pub fn set_area(&mut self, area: Rect) {
        let resized = !self.area.same_size(&area);
        self.area = area;
        if resized {
            match self.transition.take() {
                Some(transition) => self.settle(transition),
                None => self.slots = resting_slots(self.current, self.cell_height()),
            }
        }
    }

    /// Roll to `value`, choosing the direction from the animating behaviour.
    ///
    /// See [`set_value_toward`](Self::set_value_toward).
    pub fn set_value(
        &mut self,
        value: Option<Glyph>,
        animated: bool,
        on_complete: Option<Completion>,
    ) -> Option<TransitionToken> {
        let direction = self.behavior.direction(self.current, value);
        self.set_value_toward(value, direction, animated, on_complete)
    }

    /// Roll to `value` in an explicit direction.
    ///
    /// Returns the token of the started transition, or `None` when `value`
    /// is already displayed. In that case nothing moves, no event is queued,
    /// and `on_complete` runs immediately.
    ///
    /// Without animation the transition settles before this returns:
    /// `on_complete` has run and the settle event is queued.
    pub fn set_value_toward(
        &mut self,
        value: Option<Glyph>,
        direction: Direction,
        animated: bool,
        on_complete: Option<Completion>,
    ) -> Option<TransitionToken> {
        if value == self.current {
            if let Some(callback) = on_complete {
                callback();
            }
            return None;
        }

        if self.transition.take().is_some() {
            odo_core::trace!("roller transition superseded");
        }

        let height = self.cell_height();
        let previous = self.current;
        self.slots = [
            Slot::new(value, -height, 0.0),
            Slot::new(previous, 0.0, 1.0),
            Slot::new(value, height, 0.0),
        ];
        self.current = value;

        let token = TransitionToken(self.next_token);
        self.next_token += 1;
        let transition = Transition {
            token,
            tween: Tween::new(self.duration).curve(self.curve),
            travel: direction.coefficient() * height,
            on_complete,
        };

        if animated {
            self.transition = Some(transition);
        } else {
            self.settle(transition);
        }
        Some(token)
    }

    /// Advance the transition in flight by `dt`.
    pub fn tick(&mut self, dt: Duration) {
        let Some(transition) = self.transition.as_mut() else {
            return;
        };
        transition.tween.tick(dt);
        if transition.tween.is_complete() {
            if let Some(done) = self.transition.take() {
                self.settle(done);
            }
            return;
        }

        let progress = transition.tween.value();
        let travel = transition.travel;
        let height = self.cell_height();
        let fade = progress.clamp(0.0, 1.0);
        let bases = [-height, 0.0, height];
        for (slot, base) in self.slots.iter_mut().zip(bases) {
            slot.offset = lerp(base, base + travel, progress);
        }
        self.slots[0].opacity = fade;
        self.slots[1].opacity = 1.0 - fade;
        self.slots[2].opacity = fade;
    }

    fn settle(&mut self, transition: Transition) {
        self.slots = resting_slots(self.current, self.cell_height());
        if let Some(callback) = transition.on_complete {
            callback();
        }
        self.events.push(RollerEvent::Settled(transition.token));
    }

    fn cell_height(&self) -> f32 {
        f32::from(self.area.height)
    }
}

fn resting_slots(glyph: Option<Glyph>, height: f32) -> [Slot; 3] {
    [
        Slot::new(glyph, -height, 0.0),
        Slot::new(glyph, 0.0, 1.0),
        Slot::new(glyph, height, 0.0),
    ]
}

impl Widget for DigitRoller {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }

        let row = i32::from(centered_y(area));
        buf.push_scissor(area);
        for slot in &self.slots {
            let Some(glyph) = slot.glyph.filter(|_| slot.is_visible()) else {
                continue;
            };
            let y = row + slot.offset.round() as i32;
            if y < i32::from(area.top()) || y >= i32::from(area.bottom()) {
                continue;
            }
            let ch = glyph.as_char();
            let width = ch.width().unwrap_or(1) as u16;
            let x = centered_x(area, width);

            buf.push_opacity(slot.opacity);
            buf.set(
                x,
                y as u16,
                Cell::from_char(ch).with_fg(self.fg).with_attrs(self.attrs),
            );
            buf.pop_opacity();
        }
        buf.pop_scissor();
    }
}
