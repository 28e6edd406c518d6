#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Event system for async communication in sigcheck
//!
//! Library crates never print. They emit [`AppEvent`]s through an
//! [`EventSender`] and the binary decides how to render them (usually
//! by forwarding them to `tracing`).
//!
//! Sending is fire-and-forget: a dropped receiver never fails the sender.

pub mod meta;
pub use meta::{EventLevel, EventMeta, EventSource};

pub mod events;
pub use events::{AppEvent, EventMessage, FileStatus, VerifyEvent};

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// Sending half of the event channel
pub type EventSender = UnboundedSender<EventMessage>;

/// Receiving half of the event channel
pub type EventReceiver = UnboundedReceiver<EventMessage>;

/// Create a new event channel
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// The unified trait for emitting events throughout sigcheck
///
/// Implemented for a raw [`EventSender`] and for anything that may or may
/// not carry one (an absent sender turns every emission into a no-op).
pub trait EventEmitter {
    /// Get the event sender for this emitter
    fn event_sender(&self) -> Option<&EventSender>;

    /// Correlation id stamped on every emitted event, if any
    fn correlation_id(&self) -> Option<&str> {
        None
    }

    /// Emit an event through this emitter
    fn emit(&self, event: AppEvent) {
        if let Some(sender) = self.event_sender() {
            let mut message = EventMessage::from_event(event);
            if let Some(id) = self.correlation_id() {
                message.meta = message.meta.with_correlation_id(id);
            }
            // receiver may be gone; events are best effort
            let _ = sender.send(message);
        }
    }

    /// Emit a verification event
    fn emit_verify(&self, event: VerifyEvent) {
        self.emit(AppEvent::Verify(event));
    }
}

impl EventEmitter for EventSender {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(self)
    }
}

impl EventEmitter for Option<EventSender> {
    fn event_sender(&self) -> Option<&EventSender> {
        self.as_ref()
    }
}
