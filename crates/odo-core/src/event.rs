#![forbid(unsafe_code)]

//! Canonical input events.
//!
//! Terminal input arrives as crossterm events and is mapped into these types
//! so widgets never depend on the backend directly. Events that have no
//! meaning for a numeric field (mouse input, media keys) are dropped during
//! mapping.

use bitflags::bitflags;
#[cfg(not(target_arch = "wasm32"))]
use crossterm::event as cte;

/// Canonical input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A keyboard event.
    Key(KeyEvent),

    /// Terminal was resized.
    Resize {
        /// New terminal width in columns.
        width: u16,
        /// New terminal height in rows.
        height: u16,
    },

    /// Bracketed paste.
    Paste(String),
}

impl Event {
    /// Convert a crossterm event into an [`Event`].
    ///
    /// Returns `None` for events with no canonical counterpart.
    #[must_use]
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_crossterm(event: cte::Event) -> Option<Self> {
        match event {
            cte::Event::Key(key) => map_key_event(key).map(Event::Key),
            cte::Event::Resize(width, height) => Some(Event::Resize { width, height }),
            cte::Event::Paste(text) => Some(Event::Paste(text)),
            cte::Event::FocusGained | cte::Event::FocusLost | cte::Event::Mouse(_) => None,
        }
    }
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,

    /// The type of key event (press, repeat, or release).
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Create a new key press with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        }
    }

    /// Set the modifiers (builder).
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Set the event kind (builder).
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Whether this is the given character without Ctrl/Alt.
    #[must_use]
    pub fn is_char(&self, c: char) -> bool {
        matches!(self.code, KeyCode::Char(ch) if ch == c)
            && !self.modifiers.intersects(Modifiers::CTRL | Modifiers::ALT)
    }

    /// Whether this is Ctrl plus the given character.
    #[must_use]
    pub fn is_ctrl(&self, c: char) -> bool {
        matches!(self.code, KeyCode::Char(ch) if ch.eq_ignore_ascii_case(&c))
            && self.modifiers.contains(Modifiers::CTRL)
    }

    /// Whether the key went down (press or auto-repeat).
    #[must_use]
    pub const fn is_down(&self) -> bool {
        !matches!(self.kind, KeyEventKind::Release)
    }
}

/// Key codes for keyboard events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A regular character key.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Escape key.
    Escape,
    /// Backspace key.
    Backspace,
    /// Delete key.
    Delete,
    /// Tab key.
    Tab,
    /// Up arrow key.
    Up,
    /// Down arrow key.
    Down,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Home key.
    Home,
    /// End key.
    End,
}

/// The type of key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// Key was pressed (default when not distinguishable).
    #[default]
    Press,
    /// Key is being held.
    Repeat,
    /// Key was released.
    Release,
}

bitflags! {
    /// Modifier keys that can be held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn map_key_event(event: cte::KeyEvent) -> Option<KeyEvent> {
    let code = map_key_code(event.code)?;
    let kind = match event.kind {
        cte::KeyEventKind::Press => KeyEventKind::Press,
        cte::KeyEventKind::Repeat => KeyEventKind::Repeat,
        cte::KeyEventKind::Release => KeyEventKind::Release,
    };
    Some(KeyEvent {
        code,
        modifiers: map_modifiers(event.modifiers),
        kind,
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn map_key_code(code: cte::KeyCode) -> Option<KeyCode> {
    match code {
        cte::KeyCode::Char(c) => Some(KeyCode::Char(c)),
        cte::KeyCode::Enter => Some(KeyCode::Enter),
        cte::KeyCode::Esc => Some(KeyCode::Escape),
        cte::KeyCode::Backspace => Some(KeyCode::Backspace),
        cte::KeyCode::Delete => Some(KeyCode::Delete),
        cte::KeyCode::Tab => Some(KeyCode::Tab),
        cte::KeyCode::Up => Some(KeyCode::Up),
        cte::KeyCode::Down => Some(KeyCode::Down),
        cte::KeyCode::Left => Some(KeyCode::Left),
        cte::KeyCode::Right => Some(KeyCode::Right),
        cte::KeyCode::Home => Some(KeyCode::Home),
        cte::KeyCode::End => Some(KeyCode::End),
        _ => None,
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn map_modifiers(modifiers: cte::KeyModifiers) -> Modifiers {
    let mut mapped = Modifiers::NONE;
    if modifiers.contains(cte::KeyModifiers::SHIFT) {
        mapped |= Modifiers::SHIFT;
    }
    if modifiers.contains(cte::KeyModifiers::ALT) {
        mapped |= Modifiers::ALT;
    }
    if modifiers.contains(cte::KeyModifiers::CONTROL) {
        mapped |= Modifiers::CTRL;
    }
    if modifiers.intersects(
        cte::KeyModifiers::SUPER | cte::KeyModifiers::HYPER | cte::KeyModifiers::META,
    ) {
        mapped |= Modifiers::SUPER;
    }
    mapped
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crossterm::event as ct_event;

    #[test]
    fn key_event_is_char() {
        let event = KeyEvent::new(KeyCode::Char('7'));
        assert!(event.is_char('7'));
        assert!(!event.is_char('8'));
    }

    #[test]
    fn ctrl_char_is_not_plain_char() {
        let event = KeyEvent::new(KeyCode::Char('c')).with_modifiers(Modifiers::CTRL);
        assert!(!event.is_char('c'));
        assert!(event.is_ctrl('c'));
        assert!(event.is_ctrl('C'));
    }

    #[test]
    fn release_is_not_down() {
        let event = KeyEvent::new(KeyCode::Backspace).with_kind(KeyEventKind::Release);
        assert!(!event.is_down());
        assert!(KeyEvent::new(KeyCode::Backspace).is_down());
    }

    #[test]
    fn map_crossterm_digit_with_shift() {
        let ct = ct_event::KeyEvent::new(ct_event::KeyCode::Char('4'), ct_event::KeyModifiers::SHIFT);
        let mapped = Event::from_crossterm(ct_event::Event::Key(ct));
        assert_eq!(
            mapped,
            Some(Event::Key(
                KeyEvent::new(KeyCode::Char('4')).with_modifiers(Modifiers::SHIFT)
            ))
        );
    }

    #[test]
    fn map_crossterm_escape_and_backspace() {
        let esc = ct_event::KeyEvent::new(ct_event::KeyCode::Esc, ct_event::KeyModifiers::NONE);
        let bs = ct_event::KeyEvent::new(ct_event::KeyCode::Backspace, ct_event::KeyModifiers::NONE);
        assert_eq!(
            Event::from_crossterm(ct_event::Event::Key(esc)),
            Some(Event::Key(KeyEvent::new(KeyCode::Escape)))
        );
        assert_eq!(
            Event::from_crossterm(ct_event::Event::Key(bs)),
            Some(Event::Key(KeyEvent::new(KeyCode::Backspace)))
        );
    }

    #[test]
    fn map_crossterm_unsupported_key_is_dropped() {
        let f5 = ct_event::KeyEvent::new(ct_event::KeyCode::F(5), ct_event::KeyModifiers::NONE);
        assert_eq!(Event::from_crossterm(ct_event::Event::Key(f5)), None);
    }

    #[test]
    fn map_crossterm_resize_and_paste() {
        assert_eq!(
            Event::from_crossterm(ct_event::Event::Resize(80, 24)),
            Some(Event::Resize {
                width: 80,
                height: 24
            })
        );
        assert_eq!(
            Event::from_crossterm(ct_event::Event::Paste("1,200".into())),
            Some(Event::Paste("1,200".into()))
        );
    }

    #[test]
    fn focus_changes_are_dropped() {
        assert_eq!(Event::from_crossterm(ct_event::Event::FocusGained), None);
        assert_eq!(Event::from_crossterm(ct_event::Event::FocusLost), None);
    }

    #[test]
    fn map_crossterm_control_modifier() {
        let ct = ct_event::KeyEvent::new(ct_event::KeyCode::Char('c'), ct_event::KeyModifiers::CONTROL);
        let Some(Event::Key(key)) = Event::from_crossterm(ct_event::Event::Key(ct)) else {
            panic!("expected key event");
        };
        assert!(key.modifiers.contains(Modifiers::CTRL));
    }
}
