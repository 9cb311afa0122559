use std::env;
use std::io::Write;

use log::{LevelFilter, Metadata, Record};

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let target = record.target().rsplit("::").next().unwrap_or("");
            let _ = writeln!(
                std::io::stderr().lock(),
                "{:<5} [{}] {}",
                record.level(),
                target,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: StderrLogger = StderrLogger;

/// Level used when `BATTLESHIP_LOG` is unset or not a valid level name.
pub const DEFAULT_LEVEL: LevelFilter = LevelFilter::Info;

fn level_from_env(value: Option<String>) -> LevelFilter {
    value
        .and_then(|lvl| lvl.parse().ok())
        .unwrap_or(DEFAULT_LEVEL)
}

/// Initialize logging with a level taken from the `BATTLESHIP_LOG` environment
/// variable (`error`, `warn`, `info`, `debug`, `trace` or `off`).
/// Calling it more than once keeps the first logger.
pub fn init_logging() {
    let level = level_from_env(env::var("BATTLESHIP_LOG").ok());
    let _ = log::set_logger(&LOGGER).map(|()| log::set_max_level(level));
}
