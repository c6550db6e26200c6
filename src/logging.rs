// Minimal stderr backend for the `log` facade.
// Output goes to stderr so stdout stays clean for the JSON command stream.

use std::io::Write;

use log::{LevelFilter, Log, Metadata, Record};

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let _ = writeln!(
            std::io::stderr().lock(),
            "{} {:<5} {}",
            chrono::Local::now().format("%H:%M:%S%.3f"),
            record.level(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Unknown names fall back to `Info`.
pub fn parse_level(level: &str) -> LevelFilter {
    level.trim().parse().unwrap_or(LevelFilter::Info)
}

/// Installs the stderr logger. Returns false if a logger was already set.
pub fn init(level: &str) -> bool {
    match log::set_logger(&LOGGER) {
        Ok(()) => {
            log::set_max_level(parse_level(level));
            true
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("debug", LevelFilter::Debug)]
    #[case("WARN", LevelFilter::Warn)]
    #[case(" trace ", LevelFilter::Trace)]
    #[case("off", LevelFilter::Off)]
    #[case("loud", LevelFilter::Info)]
    fn test_parse_level(#[case] input: &str, #[case] expected: LevelFilter) {
        assert_eq!(parse_level(input), expected);
    }

    #[test]
    fn test_second_init_is_refused() {
        init("off");
        assert!(!init("trace"));
    }
}
