#![forbid(unsafe_code)]

//! odo demo binary entry point.

use std::io;
use std::process;
use std::time::{Duration, Instant};

use odo_demo::app::App;
use odo_demo::cli::Opts;
use odo_demo::logging::init_file_logging;
use odo_demo::presenter::Presenter;
use odo_demo::session::TerminalSession;
use odo_render::buffer::Buffer;
use odo_render::cell::PackedRgba;

const FRAME: Duration = Duration::from_millis(16);
const IDLE_POLL: Duration = Duration::from_millis(250);

fn main() {
    let opts = Opts::parse();

    if let Some(path) = &opts.log_file
        && let Err(e) = init_file_logging(path)
    {
        eprintln!("Failed to open log file {}: {e}", path.display());
        process::exit(1);
    }

    if let Err(e) = run(&opts) {
        eprintln!("Runtime error: {e}");
        process::exit(1);
    }
}

fn run(opts: &Opts) -> io::Result<()> {
    let session = TerminalSession::new()?;
    let size = session.size()?;
    tracing::info!(width = size.0, height = size.1, ?opts, "demo started");

    let mut app = App::new(opts, size);
    let mut presenter = Presenter::new(PackedRgba::BLACK);
    let mut buf = Buffer::new(size.0.max(1), size.1.max(1));
    let mut stdout = io::stdout();
    let mut last = Instant::now();
    let mut dirty = true;

    while !app.should_quit() {
        if dirty {
            app.render(&mut buf);
            presenter.present(&mut stdout, &buf)?;
            dirty = false;
        }

        let timeout = if app.is_animating() { FRAME } else { IDLE_POLL };
        if let Some(event) = session.next_event(timeout)? {
            if let odo_core::event::Event::Resize { width, height } = event {
                buf = Buffer::new(width.max(1), height.max(1));
                presenter.invalidate();
            }
            app.handle_event(&event);
            dirty = true;
        }

        let now = Instant::now();
        if app.is_animating() {
            app.tick(now - last);
            dirty = true;
        }
        last = now;
    }

    tracing::info!("demo finished");
    Ok(())
}
