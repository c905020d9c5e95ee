use std::fmt::Display;
use std::sync::OnceLock;

use chrono::Local;

enum Level {
    Info,
    Warn,
    Error,
    Debug,
}

impl Level {
    fn as_str(&self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Debug => "DEBUG",
        }
    }
}

/// Debug lines are emitted only when `PEERSHARE_DEBUG` is set.
fn debug_enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| std::env::var_os("PEERSHARE_DEBUG").is_some())
}

/// Per-crate logger, declared once as a `static` per service.
///
/// `verbose` prints a timestamped line per message; `compact` is for the CLI,
/// where the service tag alone is enough.
pub struct Logger {
    service: &'static str,
    compact: bool,
}

impl Logger {
    pub const fn verbose(service: &'static str) -> Self {
        Self {
            service,
            compact: false,
        }
    }

    pub const fn compact(service: &'static str) -> Self {
        Self {
            service,
            compact: true,
        }
    }

    fn emit(&self, level: Level, msg: impl Display) {
        if matches!(level, Level::Debug) && !debug_enabled() {
            return;
        }

        let line = if self.compact {
            format!("[{}] {}", self.service, msg)
        } else {
            format!(
                "[{}] {} {}: {}",
                self.service,
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                level.as_str(),
                msg
            )
        };

        match level {
            Level::Error | Level::Warn => eprintln!("{}", line),
            _ => println!("{}", line),
        }
    }

    pub fn info(&self, msg: impl Display) {
        self.emit(Level::Info, msg);
    }

    pub fn warn(&self, msg: impl Display) {
        self.emit(Level::Warn, msg);
    }

    pub fn error(&self, msg: impl Display) {
        self.emit(Level::Error, msg);
    }

    pub fn debug(&self, msg: impl Display) {
        self.emit(Level::Debug, msg);
    }
}
