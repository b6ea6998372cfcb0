#![forbid(unsafe_code)]

//! Demo application state.
//!
//! The app owns one [`FormattedNumberField`], routes input to it, and lays
//! out a header, the field, and a status line.

use std::time::Duration;

use odo_core::event::{Event, KeyCode};
use odo_core::geometry::Rect;
use odo_render::buffer::Buffer;
use odo_render::cell::{CellAttrs, PackedRgba};
use odo_widgets::{FormattedNumberField, RollPolicy, Widget};

use crate::cli::Opts;

const MARGIN: u16 = 2;
const ACCENT: PackedRgba = PackedRgba::rgb(0xFF, 0xC8, 0x57);
const MUTED: PackedRgba = PackedRgba::rgb(0x80, 0x80, 0x80);
const ERROR: PackedRgba = PackedRgba::rgb(0xFF, 0x5F, 0x5F);
const FOOTER: &str = "0-9 type  Bksp del  q quit";

/// Top-level demo state.
#[derive(Debug)]
pub struct App {
    field: FormattedNumberField,
    height: u16,
    size: (u16, u16),
    status: Option<String>,
    quit: bool,
}

impl App {
    /// Build the app from parsed options for a terminal of `size`.
    pub fn new(opts: &Opts, size: (u16, u16)) -> Self {
        let policy = if opts.by_value {
            RollPolicy::ByValue
        } else {
            RollPolicy::default()
        };
        let field = FormattedNumberField::new()
            .with_policy(policy)
            .with_behavior(opts.behavior)
            .with_duration(opts.duration())
            .with_curve(opts.curve.curve())
            .with_fg(PackedRgba::WHITE)
            .with_placeholder("0");

        let mut app = Self {
            field,
            height: opts.height.max(1),
            size,
            status: None,
            quit: false,
        };
        app.layout();
        if let Some(value) = opts.value {
            app.field.set_value(Some(value), false);
        }
        app
    }

    /// Whether the user asked to quit.
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Whether a frame should be drawn on every tick.
    pub fn is_animating(&self) -> bool {
        self.field.is_animating()
    }

    /// The number field.
    pub fn field(&self) -> &FormattedNumberField {
        &self.field
    }

    /// Last input error, if any.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Area assigned to the field.
    pub fn field_area(&self) -> Rect {
        let (width, height) = self.size;
        let rows = self.height.min(height.saturating_sub(4));
        let y = height.saturating_sub(rows) / 2;
        Rect::new(MARGIN, y, width.saturating_sub(MARGIN * 2), rows)
    }

    fn layout(&mut self) {
        let area = self.field_area();
        self.field.set_area(area);
    }

    /// Apply one input event.
    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::Resize { width, height } => {
                tracing::debug!(width, height, "terminal resized");
                self.size = (*width, *height);
                self.layout();
                return;
            }
            Event::Key(key) if key.is_down() => {
                if key.is_ctrl('c') || key.is_char('q') {
                    self.quit = true;
                    return;
                }
                if key.code == KeyCode::Escape && self.field.value().is_none() {
                    self.quit = true;
                    return;
                }
            }
            _ => {}
        }

        match self.field.handle_event(event) {
            Ok(changed) => {
                if changed {
                    self.status = None;
                }
            }
            Err(err) => {
                tracing::info!(%err, "input rejected");
                self.status = Some(err.to_string());
            }
        }
    }

    /// Advance animations.
    pub fn tick(&mut self, dt: Duration) {
        self.field.tick(dt);
    }

    /// Draw the whole screen into `buf`.
    pub fn render(&self, buf: &mut Buffer) {
        buf.clear();
        let bounds = buf.bounds();
        let right = bounds.right().saturating_sub(MARGIN);

        buf.draw_str(MARGIN, 0, "odo", ACCENT, CellAttrs::BOLD, right);

        let area = self.field_area().intersection(&bounds);
        self.field.render(area, buf);

        let status_y = area.bottom().saturating_add(1);
        match &self.status {
            Some(message) => {
                buf.draw_str(MARGIN, status_y, message, ERROR, CellAttrs::empty(), right);
            }
            None => {
                let raw = self
                    .field
                    .value()
                    .map_or_else(|| "empty".to_string(), |v| v.to_string());
                buf.draw_str(MARGIN, status_y, &raw, MUTED, CellAttrs::DIM, right);
            }
        }

        if bounds.height > 1 {
            let footer_y = bounds.bottom() - 1;
            buf.draw_str(MARGIN, footer_y, FOOTER, MUTED, CellAttrs::DIM, right);
        }
    }
}
