use serde::{Deserialize, Serialize};

use crate::{EventMeta, EventSource};

pub mod verify;

pub use verify::*;

/// Top-level application event enum that aggregates all domain-specific events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// Verification run events
    Verify(VerifyEvent),
}

impl AppEvent {
    /// Identify the source domain for this event (used for metadata/logging).
    #[must_use]
    pub fn event_source(&self) -> EventSource {
        match self {
            Self::Verify(_) => EventSource::VERIFY,
        }
    }

    /// Determine the appropriate tracing log level for this event
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        use tracing::Level;

        match self {
            Self::Verify(VerifyEvent::ManifestRejected { .. }) => Level::ERROR,

            Self::Verify(VerifyEvent::TimedOut { .. }) => Level::WARN,

            Self::Verify(VerifyEvent::FileVerified { status, .. }) if !status.is_ok() => {
                Level::WARN
            }

            Self::Verify(VerifyEvent::Started { .. } | VerifyEvent::Completed { .. }) => {
                Level::INFO
            }

            Self::Verify(VerifyEvent::FileVerified { .. }) => Level::TRACE,
        }
    }
}

/// An event together with its metadata, as sent over the channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub meta: EventMeta,
    pub event: AppEvent,
}

impl EventMessage {
    #[must_use]
    pub fn new(meta: EventMeta, event: AppEvent) -> Self {
        Self { meta, event }
    }

    /// Wrap an event with metadata derived from its domain and level
    #[must_use]
    pub fn from_event(event: AppEvent) -> Self {
        let meta = EventMeta::new(event.log_level(), event.event_source());
        Self { meta, event }
    }
}
