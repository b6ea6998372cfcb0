#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo.
//!
//! Parses args manually to keep the binary lean.
//! Supports environment variable overrides via the `ODO_DEMO_*` prefix.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use odo_core::animation::{Curve, Spring, ease_out, linear};
use odo_widgets::AnimatingBehavior;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const HELP_TEXT: &str = "\
odo demo: rolling digit counter

USAGE:
    odo-demo [OPTIONS]

OPTIONS:
    --by-value           Pick each digit's roll direction from --behavior
                         (default: every digit drops in from above)
    --behavior=MODE      Roll direction on increase: 'ascend' (default),
                         'descend', 'always-ascend', 'always-descend'
    --duration-ms=N      Transition duration in milliseconds (default: 450)
    --curve=CURVE        Timing curve: 'spring' (default), 'linear', 'ease-out'
    --height=N           Height of each roller in rows (default: 3)
    --value=N            Initial value (default: empty)
    --log-file=PATH      Write logs to PATH (default: no logging)
    --help, -h           Show this help message
    --version, -V        Show version

KEYBINDINGS:
    0-9             Append a digit
    Backspace       Remove the last digit
    Delete          Clear the value
    Esc             Clear, or quit when already empty
    q / Ctrl+C      Quit

ENVIRONMENT VARIABLES:
    ODO_DEMO_BY_VALUE      Set to 1 for --by-value
    ODO_DEMO_BEHAVIOR      Override --behavior
    ODO_DEMO_DURATION_MS   Override --duration-ms
    ODO_DEMO_CURVE         Override --curve
    ODO_DEMO_HEIGHT        Override --height
    ODO_DEMO_VALUE         Override --value
    ODO_DEMO_LOG_FILE      Override --log-file
    RUST_LOG               Log filter when logging is enabled (default: debug)";

/// Named timing curves selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurveKind {
    #[default]
    Spring,
    Linear,
    EaseOut,
}

impl CurveKind {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "spring" => Some(Self::Spring),
            "linear" => Some(Self::Linear),
            "ease-out" | "ease_out" => Some(Self::EaseOut),
            _ => None,
        }
    }

    /// The curve handed to the rollers.
    pub fn curve(self) -> Curve {
        match self {
            Self::Spring => Curve::Spring(Spring::default()),
            Self::Linear => Curve::Eased(linear),
            Self::EaseOut => Curve::Eased(ease_out),
        }
    }
}

fn parse_behavior(s: &str) -> Option<AnimatingBehavior> {
    match s {
        "ascend" | "ascend-on-increase" => Some(AnimatingBehavior::AscendOnIncrease),
        "descend" | "descend-on-increase" => Some(AnimatingBehavior::DescendOnIncrease),
        "always-ascend" => Some(AnimatingBehavior::AlwaysAscend),
        "always-descend" => Some(AnimatingBehavior::AlwaysDescend),
        _ => None,
    }
}

/// A rejected option value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    /// A flag or variable had a value that does not parse.
    InvalidValue { option: String, value: String },
    /// An argument that is not a known flag.
    UnknownArgument(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { option, value } => write!(f, "Invalid {option} value: {value}"),
            Self::UnknownArgument(arg) => write!(f, "Unknown argument: {arg}"),
        }
    }
}

impl std::error::Error for CliError {}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(Opts),
    Help,
    Version,
}

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq)]
pub struct Opts {
    /// Whether rollers choose their own direction.
    pub by_value: bool,
    /// Direction policy of each roller.
    pub behavior: AnimatingBehavior,
    /// Transition duration in milliseconds.
    pub duration_ms: u64,
    /// Timing curve.
    pub curve: CurveKind,
    /// Roller height in rows.
    pub height: u16,
    /// Initial value.
    pub value: Option<u64>,
    /// Log destination. Logging is off when unset.
    pub log_file: Option<PathBuf>,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            by_value: false,
            behavior: AnimatingBehavior::default(),
            duration_ms: 450,
            curve: CurveKind::default(),
            height: 3,
            value: None,
            log_file: None,
        }
    }
}

impl Opts {
    /// Parse command-line arguments and environment variables.
    ///
    /// Environment variables take precedence over defaults but are overridden
    /// by explicit command-line flags. Exits the process for `--help`,
    /// `--version`, and invalid input.
    pub fn parse() -> Self {
        let args: Vec<String> = env::args().skip(1).collect();
        match Self::parse_from(|key| env::var(key).ok(), &args) {
            Ok(Command::Run(opts)) => opts,
            Ok(Command::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Command::Version) => {
                println!("odo-demo {VERSION}");
                process::exit(0);
            }
            Err(err) => {
                eprintln!("{err}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    /// Parse from an environment lookup and an argument list.
    pub fn parse_from<E>(env: E, args: &[String]) -> Result<Command, CliError>
    where
        E: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        // Environment first; invalid variables are ignored.
        if env("ODO_DEMO_BY_VALUE").is_some_and(|v| v == "1" || v == "true") {
            opts.by_value = true;
        }
        if let Some(behavior) = env("ODO_DEMO_BEHAVIOR").and_then(|v| parse_behavior(&v)) {
            opts.behavior = behavior;
        }
        if let Some(n) = env("ODO_DEMO_DURATION_MS").and_then(|v| v.parse().ok()) {
            opts.duration_ms = n;
        }
        if let Some(curve) = env("ODO_DEMO_CURVE").and_then(|v| CurveKind::parse(&v)) {
            opts.curve = curve;
        }
        if let Some(n) = env("ODO_DEMO_HEIGHT").and_then(|v| v.parse().ok()) {
            opts.height = n;
        }
        if let Some(n) = env("ODO_DEMO_VALUE").and_then(|v| v.parse().ok()) {
            opts.value = Some(n);
        }
        if let Some(path) = env("ODO_DEMO_LOG_FILE").filter(|v| !v.is_empty()) {
            opts.log_file = Some(PathBuf::from(path));
        }

        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Command::Help),
                "--version" | "-V" => return Ok(Command::Version),
                "--by-value" => opts.by_value = true,
                other => {
                    if let Some(val) = other.strip_prefix("--behavior=") {
                        opts.behavior =
                            parse_behavior(val).ok_or_else(|| invalid("--behavior", val))?;
                    } else if let Some(val) = other.strip_prefix("--duration-ms=") {
                        opts.duration_ms =
                            val.parse().map_err(|_| invalid("--duration-ms", val))?;
                    } else if let Some(val) = other.strip_prefix("--curve=") {
                        opts.curve = CurveKind::parse(val).ok_or_else(|| invalid("--curve", val))?;
                    } else if let Some(val) = other.strip_prefix("--height=") {
                        opts.height = val
                            .parse()
                            .ok()
                            .filter(|&h: &u16| h > 0)
                            .ok_or_else(|| invalid("--height", val))?;
                    } else if let Some(val) = other.strip_prefix("--value=") {
                        opts.value = Some(val.parse().map_err(|_| invalid("--value", val))?);
                    } else if let Some(val) = other.strip_prefix("--log-file=") {
                        opts.log_file = Some(PathBuf::from(val));
                    } else {
                        return Err(CliError::UnknownArgument(other.to_string()));
                    }
                }
            }
        }

        opts.height = opts.height.max(1);
        Ok(Command::Run(opts))
    }

    /// Transition duration.
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

fn invalid(option: &str, value: &str) -> CliError {
    CliError::InvalidValue {
        option: option.to_string(),
        value: value.to_string(),
    }
}
