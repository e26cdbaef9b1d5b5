//! Routes `tracing` events to the browser console
//!
//! Each event is formatted into a buffer and handed to the `console`
//! method matching its level once the formatter drops the writer.

use std::io::{self, Write};
use tracing::{Level, Metadata};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wasm_bindgen::JsValue;

/// Install the console subscriber; later calls are no-ops
pub(crate) fn init() {
    let _ = tracing_subscriber::registry()
        .with(LevelFilter::WARN)
        .with(
            tracing_subscriber::fmt::layer()
                // wasm32-unknown-unknown has no system clock
                .without_time()
                .with_target(false)
                .with_writer(ConsoleMakeWriter),
        )
        .try_init();
}

pub(crate) struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level())
    }
}

/// Buffers one formatted event
pub(crate) struct ConsoleWriter {
    level: Level,
    buf: Vec<u8>,
}

impl ConsoleWriter {
    fn new(level: Level) -> Self {
        Self {
            level,
            buf: Vec::new(),
        }
    }

    fn message(&self) -> String {
        String::from_utf8_lossy(&self.buf).trim_end().to_string()
    }
}

impl Write for ConsoleWriter {
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
        let message = self.message();
        if message.is_empty() {
            return;
        }
        console_for(self.level)(&JsValue::from_str(&message));
    }
}

fn console_for(level: Level) -> fn(&JsValue) {
    if level == Level::ERROR {
        web_sys::console::error_1
    } else if level == Level::WARN {
        web_sys::console::warn_1
    } else if level == Level::INFO {
        web_sys::console::info_1
    } else {
        web_sys::console::debug_1
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_writer_buffers_one_event() {
        let mut writer = ConsoleWriter::new(Level::WARN);
        writer.write_all(b" WARN could not save results").unwrap();
        writer.write_all(b"\n").unwrap();
        assert_eq!(writer.message(), " WARN could not save results");
    }

    #[wasm_bindgen_test]
    fn test_init_twice_and_log() {
        init();
        init();
        tracing::warn!(backend = "Memory", "could not save results, keeping them in memory only");
    }
}
