#![forbid(unsafe_code)]

//! Platform-independent runner core wrapping [`Synchronizer`].
//!
//! Shared by the wasm-bindgen exports and the native tests. No JS types here:
//! the surface is a type parameter, so tests drive it with a `MemorySurface`.

use core::time::Duration;

use folio_core::element::ElementHandle;
use folio_core::event::Event;
use folio_runtime::log_sink::LogSink;
use folio_web::synchronizer::Dispatch;
use folio_web::{FolioConfig, FolioError, PageIndex, Synchronizer, ToastKind, ViewSurface};
use tracing::debug;

/// Lines kept before the host drains them with `take_logs`.
pub const LOG_CAPACITY: usize = 512;

/// Host-facing runner: config parsing, time conversion, encoded input.
#[derive(Debug)]
pub struct RunnerCore<S> {
    sync: Synchronizer<S>,
    logs: LogSink,
    initialized: bool,
    rejected_inputs: u64,
}

impl<S: ViewSurface + PageIndex> RunnerCore<S> {
    /// Build over `surface`. An empty or absent `config_json` means defaults.
    pub fn new(surface: S, config_json: Option<&str>, logs: LogSink) -> Result<Self, FolioError> {
        let config = match config_json.map(str::trim) {
            Some(json) if !json.is_empty() => FolioConfig::load_json(json)?,
            _ => FolioConfig::default(),
        };
        Ok(Self {
            sync: Synchronizer::new(surface, config)?,
            logs,
            initialized: false,
            rejected_inputs: 0,
        })
    }
}

impl<S: ViewSurface> RunnerCore<S> {
    /// Run the first scroll pass. Later calls do nothing.
    pub fn init(&mut self) {
        if self.initialized {
            return;
        }
        self.sync.init();
        self.initialized = true;
        debug!(page = %self.sync.page().summary(), "runner initialized");
    }

    #[cfg_attr(target_arch = "wasm32", allow(dead_code))]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Dispatch an already-translated event, initializing first if needed.
    pub fn handle(&mut self, event: Event) -> Dispatch {
        self.init();
        self.sync.handle(event)
    }

    /// Parse and dispatch one JSON-encoded input.
    ///
    /// Returns `true` if it mapped to an event. Rejections are logged.
    pub fn push_encoded_input(&mut self, json: &str) -> bool {
        self.init();
        match folio_web::parse_encoded_input(json) {
            Ok(Some(event)) => {
                self.sync.handle(event);
                true
            }
            Ok(None) => false,
            Err(err) => {
                self.rejected_inputs += 1;
                self.logs.push_line(&format!("runner_input_rejected: {err}"));
                false
            }
        }
    }

    /// Re-evaluate visibility with the built-in tracker.
    pub fn poll_visibility(&mut self) -> Dispatch {
        self.sync.poll_visibility()
    }

    /// Advance the clock by `dt_ms` milliseconds. Returns timers fired.
    pub fn advance_time_ms(&mut self, dt_ms: f64) -> usize {
        // Host timestamps can be noisy; anything not finite and positive is dropped.
        if !dt_ms.is_finite() || dt_ms <= 0.0 {
            return 0;
        }
        self.sync.advance_time(duration_from_ms(dt_ms))
    }

    /// Set the clock to `ts_ms` milliseconds since start. Going back is ignored.
    pub fn set_time_ms(&mut self, ts_ms: f64) -> usize {
        if !ts_ms.is_finite() || ts_ms <= 0.0 {
            return 0;
        }
        self.sync.set_time(duration_from_ms(ts_ms))
    }

    /// Milliseconds until the next timer, if any is pending.
    pub fn next_timer_delay_ms(&self) -> Option<f64> {
        self.sync.next_timer_delay().map(|d| d.as_secs_f64() * 1000.0)
    }

    #[cfg_attr(target_arch = "wasm32", allow(dead_code))]
    pub fn now_ms(&self) -> f64 {
        self.sync.now().as_secs_f64() * 1000.0
    }

    pub fn show_toast(&mut self, title: &str, message: &str, success: bool) -> bool {
        let kind = if success {
            ToastKind::Success
        } else {
            ToastKind::Failure
        };
        self.sync.show_toast(title, message, kind)
    }

    pub fn type_text(&mut self, target: ElementHandle, text: &str) {
        self.sync.type_text(target, text);
    }

    pub fn active_section(&self) -> Option<&str> {
        self.sync.active_section()
    }

    #[cfg_attr(target_arch = "wasm32", allow(dead_code))]
    pub fn rejected_inputs(&self) -> u64 {
        self.rejected_inputs
    }

    /// Drain buffered log lines.
    pub fn take_logs(&mut self) -> Vec<String> {
        self.logs.take_lines()
    }

    pub fn synchronizer(&self) -> &Synchronizer<S> {
        &self.sync
    }

    pub fn synchronizer_mut(&mut self) -> &mut Synchronizer<S> {
        &mut self.sync
    }
}

fn duration_from_ms(ms: f64) -> Duration {
    let max_secs = Duration::MAX.as_secs_f64();
    let secs = (ms / 1000.0).min(max_secs);
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}
