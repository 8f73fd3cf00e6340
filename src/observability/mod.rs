//! Observability subsystem
//!
//! Provides:
//! - Structured logging on top of `tracing`
//! - Typed lifecycle events
//!
//! # Usage
//!
//! ```ignore
//! use recordhub::observability::{log_event_with_fields, Event, Logger};
//!
//! log_event_with_fields(Event::RecordCreated, &[("collection", "notes")]);
//! Logger::warn("SLOW_REQUEST", &[("ms", "1200")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{init_logging, render_fields, LogFormat, Logger, LoggingError, Severity};

/// Log a lifecycle event
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    if event.is_fatal() {
        Logger::fatal(event.as_str(), fields);
    } else {
        Logger::info(event.as_str(), fields);
    }
}
