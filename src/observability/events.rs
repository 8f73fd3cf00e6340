//! Observable lifecycle events
//!
//! Events are explicit and typed; each renders to a stable upper-case name
//! used as the `event` field of the log line.

use std::fmt;

/// Observable events in recordhub
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & Lifecycle
    /// Startup begins
    BootStart,
    /// Startup complete, ready to serve
    BootComplete,
    /// Configuration could not be loaded (FATAL)
    BootFailed,
    /// Shutdown initiated
    ShutdownStart,
    /// Shutdown complete
    ShutdownComplete,

    // Configuration
    /// Configuration loaded
    ConfigLoaded,

    // Store
    /// Document store opened
    StoreOpened,
    /// Document store could not be opened (FATAL)
    StoreOpenFailed,
    /// Collection and its indexes are ready
    CollectionReady,

    // Server
    /// Listening for requests
    Serving,

    // Records
    /// Record created
    RecordCreated,
    /// Record updated
    RecordUpdated,
    /// Record deleted
    RecordDeleted,
    /// Write rejected by validation or uniqueness
    RecordRejected,
    /// Request failed unexpectedly
    RequestFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "RECORDHUB_STARTUP_BEGIN",
            Event::BootComplete => "RECORDHUB_STARTUP_COMPLETE",
            Event::BootFailed => "RECORDHUB_STARTUP_FAILED",
            Event::ShutdownStart => "SHUTDOWN_START",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",

            Event::ConfigLoaded => "CONFIG_LOADED",

            Event::StoreOpened => "STORE_OPENED",
            Event::StoreOpenFailed => "STORE_OPEN_FAILED",
            Event::CollectionReady => "COLLECTION_READY",

            Event::Serving => "RECORDHUB_SERVING",

            Event::RecordCreated => "RECORD_CREATED",
            Event::RecordUpdated => "RECORD_UPDATED",
            Event::RecordDeleted => "RECORD_DELETED",
            Event::RecordRejected => "RECORD_REJECTED",
            Event::RequestFailed => "REQUEST_FAILED",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::BootFailed | Event::StoreOpenFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(Event::BootStart.as_str(), "RECORDHUB_STARTUP_BEGIN");
        assert_eq!(Event::RecordCreated.to_string(), "RECORD_CREATED");
    }

    #[test]
    fn test_fatal_events() {
        assert!(Event::StoreOpenFailed.is_fatal());
        assert!(Event::BootFailed.is_fatal());
        assert!(!Event::RecordRejected.is_fatal());
    }
}
