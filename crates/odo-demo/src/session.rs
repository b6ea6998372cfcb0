#![forbid(unsafe_code)]

//! Terminal session lifecycle guard.
//!
//! [`TerminalSession`] enters raw mode and the alternate screen, enables
//! bracketed paste, and hides the cursor. Dropping it restores all of that
//! in reverse order. A panic hook performs the same cleanup so a panic never
//! leaves the terminal in raw mode.

use std::io::{self, Write};
use std::sync::OnceLock;
use std::time::Duration;

use crossterm::{cursor, event as ct_event, execute, terminal};
use odo_core::event::Event;

/// An active raw-mode, alternate-screen terminal.
#[derive(Debug)]
pub struct TerminalSession {
    alternate_screen: bool,
    bracketed_paste: bool,
}

impl TerminalSession {
    /// Enter raw mode and the alternate screen.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode cannot be enabled. Modes entered before
    /// the failure are restored when the partially built session drops.
    pub fn new() -> io::Result<Self> {
        install_panic_hook();

        terminal::enable_raw_mode()?;
        tracing::info!("terminal raw mode enabled");

        let mut session = Self {
            alternate_screen: false,
            bracketed_paste: false,
        };
        let mut stdout = io::stdout();

        execute!(stdout, terminal::EnterAlternateScreen)?;
        session.alternate_screen = true;

        execute!(stdout, ct_event::EnableBracketedPaste)?;
        session.bracketed_paste = true;

        execute!(stdout, cursor::Hide)?;
        Ok(session)
    }

    /// Current terminal size (columns, rows).
    pub fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    /// Wait up to `timeout` for an input event.
    ///
    /// Returns `Ok(None)` on timeout and for events the demo does not use.
    pub fn next_event(&self, timeout: Duration) -> io::Result<Option<Event>> {
        if !ct_event::poll(timeout)? {
            return Ok(None);
        }
        Ok(Event::from_crossterm(ct_event::read()?))
    }

    fn cleanup(&mut self) {
        let mut stdout = io::stdout();

        if self.bracketed_paste {
            let _ = execute!(stdout, ct_event::DisableBracketedPaste);
            self.bracketed_paste = false;
        }

        let _ = execute!(stdout, cursor::Show);

        if self.alternate_screen {
            let _ = execute!(stdout, terminal::LeaveAlternateScreen);
            self.alternate_screen = false;
        }

        let _ = terminal::disable_raw_mode();
        tracing::info!("terminal raw mode disabled");
        let _ = stdout.flush();
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            best_effort_cleanup();
            previous(info);
        }));
    });
}

fn best_effort_cleanup() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, ct_event::DisableBracketedPaste);
    let _ = execute!(stdout, cursor::Show);
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = stdout.flush();
}
