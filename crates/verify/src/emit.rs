use sigcheck_events::{EventEmitter, EventSender};

/// Optional event sender scoped to one verification run
#[derive(Debug, Clone, Default)]
pub(crate) struct RunEvents {
    tx: Option<EventSender>,
    run_id: Option<String>,
}

impl RunEvents {
    pub(crate) fn new(tx: Option<EventSender>, run_id: impl Into<String>) -> Self {
        Self {
            tx,
            run_id: Some(run_id.into()),
        }
    }
}

impl EventEmitter for RunEvents {
    fn event_sender(&self) -> Option<&EventSender> {
        self.tx.as_ref()
    }

    fn correlation_id(&self) -> Option<&str> {
        self.run_id.as_deref()
    }
}
