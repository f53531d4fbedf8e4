#![forbid(unsafe_code)]

//! `tracing` output for environments whose only log device is a console.
//!
//! [`ConsoleMakeWriter`] plugs into a `tracing-subscriber` fmt layer. Each
//! event is buffered by a [`ConsoleWriter`] and handed, as one line, to a
//! sink function together with the event's level, so the browser host can
//! route warnings to `console.warn` and errors to `console.error`.

use std::io;

use tracing::level_filters::LevelFilter;
use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;

/// Receives one formatted log line.
pub type ConsoleSink = fn(Level, &str);

/// Parse a configured level name; unknown names fall back to `INFO`.
#[must_use]
pub fn parse_level(name: &str) -> LevelFilter {
    name.trim().parse().unwrap_or(LevelFilter::INFO)
}

#[derive(Debug, Clone, Copy)]
pub struct ConsoleMakeWriter {
    sink: ConsoleSink,
}

impl ConsoleMakeWriter {
    #[must_use]
    pub const fn new(sink: ConsoleSink) -> Self {
        Self { sink }
    }
}

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO, self.sink)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level(), self.sink)
    }
}

/// Buffers one event and flushes it to the sink on drop.
#[derive(Debug)]
pub struct ConsoleWriter {
    level: Level,
    buf: Vec<u8>,
    sink: ConsoleSink,
}

impl ConsoleWriter {
    fn new(level: Level, sink: ConsoleSink) -> Self {
        Self {
            level,
            buf: Vec::new(),
            sink,
        }
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let text = String::from_utf8_lossy(&self.buf);
        let line = text.trim_end();
        if !line.is_empty() {
            (self.sink)(self.level, line);
        }
    }
}

/// A fmt subscriber without colors or timestamps, writing through `sink`.
pub fn console_subscriber(
    level: LevelFilter,
    sink: ConsoleSink,
) -> impl tracing::Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_ansi(false)
        .without_time()
        .with_target(true)
        .with_max_level(level)
        .with_writer(ConsoleMakeWriter::new(sink))
        .finish()
}

/// Install [`console_subscriber`] as the global default.
///
/// Returns `false` when a global subscriber was already set; the existing
/// one is kept.
pub fn install(level: LevelFilter, sink: ConsoleSink) -> bool {
    tracing::subscriber::set_global_default(console_subscriber(level, sink)).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use pretty_assertions::assert_eq;

    thread_local! {
        static LINES: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
    }

    fn capture(level: Level, line: &str) {
        LINES.with(|lines| lines.borrow_mut().push((level, line.to_owned())));
    }

    fn captured(level: LevelFilter, f: impl FnOnce()) -> Vec<(Level, String)> {
        LINES.with(|lines| lines.borrow_mut().clear());
        tracing::subscriber::with_default(console_subscriber(level, capture), f);
        LINES.with(|lines| lines.take())
    }

    #[test]
    fn level_names_parse() {
        assert_eq!(parse_level("debug"), LevelFilter::DEBUG);
        assert_eq!(parse_level(" WARN "), LevelFilter::WARN);
        assert_eq!(parse_level("chatty"), LevelFilter::INFO);
    }

    #[test]
    fn one_line_per_event_with_fields() {
        let lines = captured(LevelFilter::INFO, || {
            tracing::info!(rows = 3, "admin enhancements started");
        });
        assert_eq!(lines.len(), 1);
        let (level, line) = &lines[0];
        assert_eq!(*level, Level::INFO);
        assert!(line.contains("admin enhancements started"), "{line}");
        assert!(line.contains("rows=3"), "{line}");
        assert!(!line.contains('\u{1b}'), "ANSI escape in {line:?}");
        assert!(!line.ends_with('\n'));
    }

    #[test]
    fn levels_below_threshold_are_dropped() {
        let lines = captured(LevelFilter::WARN, || {
            tracing::debug!("noise");
            tracing::info!("still noise");
            tracing::warn!("kept");
            tracing::error!("kept too");
        });
        let levels: Vec<Level> = lines.iter().map(|(level, _)| *level).collect();
        assert_eq!(levels, vec![Level::WARN, Level::ERROR]);
    }
}
