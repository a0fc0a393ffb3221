use std::env;
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Metadata, Record};

/// Records from other crates are only shown at this level or above.
const DEPENDENCY_LEVEL: LevelFilter = LevelFilter::Warn;

static STARTED: OnceLock<Instant> = OnceLock::new();

struct MatchLogger {
    level: LevelFilter,
}

/// Whether a record from `target` at `level` passes when this crate logs at `ours`.
fn wants(target: &str, level: Level, ours: LevelFilter) -> bool {
    if target == "broadside" || target.starts_with("broadside::") {
        level <= ours
    } else {
        level <= ours.min(DEPENDENCY_LEVEL)
    }
}

/// `+  1.234s WARN  server: message`, with the crate prefix dropped.
fn format_line(elapsed_ms: u128, level: Level, target: &str, args: &std::fmt::Arguments) -> String {
    let module = target
        .strip_prefix("broadside::")
        .unwrap_or(target);
    format!(
        "+{:>4}.{:03}s {:<5} {}: {}",
        elapsed_ms / 1000,
        elapsed_ms % 1000,
        level,
        module,
        args
    )
}

impl log::Log for MatchLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        wants(metadata.target(), metadata.level(), self.level)
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let elapsed = STARTED.get_or_init(Instant::now).elapsed().as_millis();
        eprintln!(
            "{}",
            format_line(elapsed, record.level(), record.target(), record.args())
        );
    }

    fn flush(&self) {}
}

/// Initialize logging with a level taken from the `BROADSIDE_LOG` environment variable.
/// Defaults to `info` if the variable is not set or invalid. Output goes to
/// stderr so machine-readable stdout stays clean; lines carry the time since
/// start and the emitting module.
pub fn init_logging() {
    let level = env::var("BROADSIDE_LOG")
        .ok()
        .and_then(|lvl| lvl.parse().ok())
        .unwrap_or(LevelFilter::Info);
    STARTED.get_or_init(Instant::now);
    let logger = Box::new(MatchLogger { level });
    let _ = log::set_boxed_logger(logger).map(|()| log::set_max_level(level));
}
