//! `tracing` output routed to the browser console.
//!
//! Each event is formatted by a `tracing-subscriber` fmt layer into a
//! per-event buffer and handed to a sink on drop, at the console level that
//! matches the event's severity.

use std::io;
use std::sync::Once;

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;

/// Console method an event is written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleLevel {
    Debug,
    Log,
    Warn,
    Error,
}

impl ConsoleLevel {
    #[must_use]
    pub fn for_level(level: &Level) -> Self {
        match *level {
            Level::ERROR => Self::Error,
            Level::WARN => Self::Warn,
            Level::INFO => Self::Log,
            _ => Self::Debug,
        }
    }
}

/// Receives one formatted line.
pub type Sink = fn(ConsoleLevel, &str);

/// [`MakeWriter`] producing one [`ConsoleWriter`] per event.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleMakeWriter {
    sink: Sink,
}

impl ConsoleMakeWriter {
    #[must_use]
    pub const fn new(sink: Sink) -> Self {
        Self { sink }
    }
}

/// Buffers one event and flushes it to the sink when dropped.
pub struct ConsoleWriter {
    level: ConsoleLevel,
    buf: Vec<u8>,
    sink: Sink,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let text = String::from_utf8_lossy(&self.buf);
        let line = text.trim_end();
        if !line.is_empty() {
            (self.sink)(self.level, line);
        }
    }
}

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter {
            level: ConsoleLevel::Log,
            buf: Vec::new(),
            sink: self.sink,
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter {
            level: ConsoleLevel::for_level(meta.level()),
            buf: Vec::new(),
            sink: self.sink,
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn console_sink(level: ConsoleLevel, line: &str) {
    let value = wasm_bindgen::JsValue::from_str(line);
    match level {
        ConsoleLevel::Debug => web_sys::console::debug_1(&value),
        ConsoleLevel::Log => web_sys::console::log_1(&value),
        ConsoleLevel::Warn => web_sys::console::warn_1(&value),
        ConsoleLevel::Error => web_sys::console::error_1(&value),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn console_sink(level: ConsoleLevel, line: &str) {
    eprintln!("[{level:?}] {line}");
}

/// Install the global subscriber once. Later calls, or a subscriber already
/// set by the embedder, are left alone.
pub fn init(max_level: Level) {
    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_writer(ConsoleMakeWriter::new(console_sink))
            .with_max_level(max_level)
            .with_ansi(false)
            .without_time()
            .with_target(false)
            .try_init();
    });
}
