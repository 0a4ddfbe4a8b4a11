//! Background execution of backend requests.
//!
//! Each question runs on its own short-lived thread; results come back to the
//! UI loop over a channel and are drained once per tick.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use crate::api::{HealthStatus, QueryAnswer, QueryClient};
use crate::chat::ConversationId;

/// Result delivered from a worker thread
#[derive(Debug)]
pub enum WorkerEvent {
    /// The backend answered a question
    Answered {
        conversation_id: ConversationId,
        answer: QueryAnswer,
    },
    /// Asking failed; `error` is ready for display
    Failed {
        conversation_id: ConversationId,
        error: String,
    },
    /// A health probe finished
    Health(Result<HealthStatus, String>),
}

/// Runs `QueryClient` calls off the UI thread.
pub struct QueryDispatcher {
    client: Arc<dyn QueryClient>,
    tx: Sender<WorkerEvent>,
    rx: Receiver<WorkerEvent>,
    /// Questions sent but not yet drained
    in_flight: usize,
}

impl QueryDispatcher {
    /// Create a dispatcher around `client`
    pub fn new(client: Arc<dyn QueryClient>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            client,
            tx,
            rx,
            in_flight: 0,
        }
    }

    /// Ask `question` on behalf of `conversation_id` in the background
    pub fn dispatch(&mut self, conversation_id: ConversationId, question: String) {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        self.in_flight += 1;

        thread::spawn(move || {
            let event = match client.ask(&question) {
                Ok(answer) => WorkerEvent::Answered {
                    conversation_id,
                    answer,
                },
                Err(e) => {
                    tracing::warn!(conversation = %conversation_id, error = %e, "query failed");
                    WorkerEvent::Failed {
                        conversation_id,
                        error: e.to_string(),
                    }
                }
            };
            // Receiver gone means the app is shutting down
            let _ = tx.send(event);
        });
    }

    /// Probe backend health in the background
    pub fn check_health(&self) {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();

        thread::spawn(move || {
            let report = client.health().map_err(|e| e.to_string());
            let _ = tx.send(WorkerEvent::Health(report));
        });
    }

    /// Collect every event that has arrived since the last call
    pub fn drain(&mut self) -> Vec<WorkerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            self.note_received(&event);
            events.push(event);
        }
        events
    }

    /// Number of questions still waiting for an answer
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Block until the next event arrives or `timeout` passes
    #[cfg(test)]
    pub fn wait(&mut self, timeout: std::time::Duration) -> Option<WorkerEvent> {
        let event = self.rx.recv_timeout(timeout).ok()?;
        self.note_received(&event);
        Some(event)
    }

    fn note_received(&mut self, event: &WorkerEvent) {
        if matches!(
            event,
            WorkerEvent::Answered { .. } | WorkerEvent::Failed { .. }
        ) {
            self.in_flight = self.in_flight.saturating_sub(1);
        }
    }
}
