#![forbid(unsafe_code)]

//! Log sink for in-process output routing.
//!
//! [`LogSink`] collects complete log lines into a bounded buffer that the
//! host drains (the browser runner exposes it as `takeLogs()`). It implements
//! [`std::io::Write`] and tracing-subscriber's [`MakeWriter`], so it can sit
//! behind a `fmt` layer:
//!
//! 1. Output is line-buffered (partial lines never show up in the buffer).
//! 2. The buffer is bounded; the oldest lines are dropped first.
//! 3. An optional echo function mirrors each line elsewhere (the browser
//!    console, for instance).
//!
//! # Usage
//!
//! ```
//! use folio_runtime::log_sink::LogSink;
//! use std::io::Write;
//!
//! let sink = LogSink::new(64);
//! let mut writer = sink.writer();
//! writeln!(writer, "portfolio loaded").unwrap();
//! drop(writer);
//! assert_eq!(sink.take_lines(), vec!["portfolio loaded".to_string()]);
//! ```

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

/// Function that mirrors each completed line.
pub type EchoFn = fn(&str);

#[derive(Debug)]
struct SinkInner {
    lines: VecDeque<String>,
    max_lines: usize,
    dropped: u64,
}

/// Bounded, shareable log line buffer.
///
/// Cloning shares the same buffer.
#[derive(Debug, Clone)]
pub struct LogSink {
    inner: Arc<Mutex<SinkInner>>,
    echo: Option<EchoFn>,
}

impl LogSink {
    /// Create a sink that keeps at most `max_lines` lines (at least one).
    #[must_use]
    pub fn new(max_lines: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SinkInner {
                lines: VecDeque::new(),
                max_lines: max_lines.max(1),
                dropped: 0,
            })),
            echo: None,
        }
    }

    /// Mirror every completed line through `echo`.
    #[must_use]
    pub fn with_echo(mut self, echo: EchoFn) -> Self {
        self.echo = Some(echo);
        self
    }

    /// Append one complete line.
    pub fn push_line(&self, line: &str) {
        let line = line.trim_end_matches(['\r', '\n']);
        if let Some(echo) = self.echo {
            echo(line);
        }
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if inner.lines.len() >= inner.max_lines {
            inner.lines.pop_front();
            inner.dropped += 1;
        }
        inner.lines.push_back(line.to_string());
    }

    /// Drain buffered lines, oldest first.
    pub fn take_lines(&self) -> Vec<String> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.lines.drain(..).collect()
    }

    /// Number of buffered lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lines discarded because the buffer was full.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).dropped
    }

    /// A line-buffering writer feeding this sink.
    #[must_use]
    pub fn writer(&self) -> LogSinkWriter {
        LogSinkWriter {
            sink: self.clone(),
            buffer: Vec::with_capacity(128),
        }
    }

    /// Install this sink as the global tracing subscriber.
    ///
    /// `directives` uses `EnvFilter` syntax (`"info"`, `"folio_web=debug"`).
    /// Returns `false` if a global subscriber was already set or the
    /// directives do not parse.
    pub fn install_global(&self, directives: &str) -> bool {
        let Ok(filter) = EnvFilter::try_new(directives) else {
            return false;
        };
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(self.clone())
            .with_ansi(false)
            .without_time()
            .with_target(true)
            .try_init()
            .is_ok()
    }
}

impl<'a> MakeWriter<'a> for LogSink {
    type Writer = LogSinkWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.writer()
    }
}

/// Write adapter produced by [`LogSink::writer`].
///
/// Buffers partial lines until a newline is written, `flush()` is called, or
/// the writer is dropped.
#[derive(Debug)]
pub struct LogSinkWriter {
    sink: LogSink,
    buffer: Vec<u8>,
}

impl Write for LogSinkWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for &byte in buf {
            if byte == b'\n' {
                let line = String::from_utf8_lossy(&self.buffer);
                self.sink.push_line(&line);
                self.buffer.clear();
            } else {
                self.buffer.push(byte);
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.buffer.is_empty() {
            let line = String::from_utf8_lossy(&self.buffer);
            self.sink.push_line(&line);
            self.buffer.clear();
        }
        Ok(())
    }
}

impl Drop for LogSinkWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_lines_wait_for_newline() {
        let sink = LogSink::new(8);
        let mut w = sink.writer();
        write!(w, "hello ").unwrap();
        assert!(sink.is_empty());
        writeln!(w, "world").unwrap();
        assert_eq!(sink.take_lines(), vec!["hello world".to_string()]);
    }

    #[test]
    fn drop_flushes_remainder() {
        let sink = LogSink::new(8);
        {
            let mut w = sink.writer();
            write!(w, "tail").unwrap();
        }
        assert_eq!(sink.take_lines(), vec!["tail".to_string()]);
    }

    #[test]
    fn bounded_buffer_drops_oldest() {
        let sink = LogSink::new(2);
        sink.push_line("one");
        sink.push_line("two");
        sink.push_line("three");
        assert_eq!(sink.dropped(), 1);
        assert_eq!(sink.take_lines(), vec!["two".to_string(), "three".to_string()]);
    }

    #[test]
    fn take_lines_drains() {
        let sink = LogSink::new(4);
        sink.push_line("x");
        assert_eq!(sink.take_lines().len(), 1);
        assert!(sink.take_lines().is_empty());
    }

    #[test]
    fn clones_share_buffer() {
        let sink = LogSink::new(4);
        let other = sink.clone();
        other.push_line("shared");
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn fmt_layer_writes_through_sink() {
        use tracing_subscriber::layer::SubscriberExt;

        let sink = LogSink::new(16);
        let subscriber = tracing_subscriber::registry().with(
            tracing_subscriber::fmt::layer()
                .with_writer(sink.clone())
                .with_ansi(false)
                .without_time(),
        );
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("portfolio loaded");
        });
        let lines = sink.take_lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("portfolio loaded"), "got {lines:?}");
    }
}
