//! Tracing layer that feeds engine decisions to a chat UI status pane.
//!
//! [`StatusLogLayer`] captures every tracing event into a [`StatusLog`], a
//! shared buffer with its own mutex. A terminal frontend drains it once per
//! frame, so logging from the chat task never blocks on rendering.
//!
//! ```
//! use ocht_memory::logging::StatusLogLayer;
//! use tracing_subscriber::layer::SubscriberExt;
//!
//! let (layer, log) = StatusLogLayer::new();
//! let subscriber = tracing_subscriber::registry().with(layer);
//! tracing::subscriber::with_default(subscriber, || {
//!     tracing::info!("prepared context");
//! });
//! assert_eq!(log.drain()[0].message, "prepared context");
//! ```

use chrono::Local;
use std::sync::{Arc, Mutex};
use tracing::Subscriber;
use tracing_subscriber::layer::Layer;
use tracing_subscriber::registry::LookupSpan;

/// Cap on buffered lines between drains.
pub const MAX_STATUS_LINES: usize = 500;
/// Trim to this many when the cap is exceeded.
pub const STATUS_TRIM_TO: usize = 300;

/// Severity of a status line (mirrors tracing levels).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum StatusLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl StatusLevel {
    /// Short fixed-width label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO ",
            Self::Warn => "WARN ",
            Self::Error => "ERROR",
        }
    }
}

impl From<tracing::Level> for StatusLevel {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Self::Trace,
            tracing::Level::DEBUG => Self::Debug,
            tracing::Level::INFO => Self::Info,
            tracing::Level::WARN => Self::Warn,
            tracing::Level::ERROR => Self::Error,
        }
    }
}

/// One captured event.
#[derive(Clone, Debug)]
pub struct StatusLine {
    /// Local wall-clock time, `HH:MM:SS`.
    pub time: String,
    pub level: StatusLevel,
    pub message: String,
}

impl StatusLine {
    /// Render as `HH:MM:SS LEVEL message`.
    pub fn display(&self) -> String {
        format!("{} {} {}", self.time, self.level.label(), self.message)
    }
}

/// Shared buffer of pending status lines.
#[derive(Clone, Default)]
pub struct StatusLog(Arc<Mutex<Vec<StatusLine>>>);

impl StatusLog {
    /// Take all pending lines.
    pub fn drain(&self) -> Vec<StatusLine> {
        let mut buf = self.0.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *buf)
    }

    /// Number of pending lines.
    pub fn len(&self) -> usize {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&self, line: StatusLine) {
        let mut buf = self.0.lock().unwrap_or_else(|e| e.into_inner());
        buf.push(line);
        if buf.len() > MAX_STATUS_LINES {
            let excess = buf.len() - STATUS_TRIM_TO;
            buf.drain(..excess);
        }
    }
}

/// A [`tracing_subscriber::Layer`] that records events into a [`StatusLog`].
pub struct StatusLogLayer {
    log: StatusLog,
    min_level: StatusLevel,
}

impl StatusLogLayer {
    /// Create a layer capturing `DEBUG` and above, plus its [`StatusLog`].
    pub fn new() -> (Self, StatusLog) {
        Self::with_min_level(StatusLevel::Debug)
    }

    /// Create a layer capturing `min_level` and above.
    pub fn with_min_level(min_level: StatusLevel) -> (Self, StatusLog) {
        let log = StatusLog::default();
        (
            Self {
                log: log.clone(),
                min_level,
            },
            log,
        )
    }
}

impl<S: Subscriber + for<'a> LookupSpan<'a>> Layer<S> for StatusLogLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let level = StatusLevel::from(*event.metadata().level());
        if level < self.min_level {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let mut message = visitor.message;
        if !visitor.fields.is_empty() {
            let extras: Vec<String> = visitor
                .fields
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            if message.is_empty() {
                message = extras.join(" ");
            } else {
                message = format!("{message} {{{}}}", extras.join(", "));
            }
        }

        self.log.push(StatusLine {
            time: Local::now().format("%H:%M:%S").to_string(),
            level,
            message,
        });
    }
}

/// Extracts the message and extra fields from an event.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields
                .push((field.name().to_string(), format!("{value:?}")));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields
                .push((field.name().to_string(), value.to_string()));
        }
    }
}
