//! Independent type definitions used by App.

use std::time::Instant;

use crate::api::HealthStatus;

/// Which UI pane currently has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// Conversation list has focus
    #[default]
    Sidebar,
    /// Question input has focus
    Input,
}

/// State for tracking multi-key chord sequences ("dd" to delete, "CC" to clear)
#[derive(Debug, Clone, Default)]
pub enum ChordState {
    #[default]
    None,
    /// First 'd' pressed, waiting for second 'd' to delete the conversation
    DeletePending { started_at: Instant },
    /// First 'C' pressed, waiting for second 'C' to clear the transcript
    ClearPending { started_at: Instant },
}

/// Chord state timeout duration (500ms)
const CHORD_TIMEOUT_MS: u128 = 500;

impl ChordState {
    /// Check if the chord has expired (timed out)
    pub fn is_expired(&self) -> bool {
        match self {
            ChordState::None => false,
            ChordState::DeletePending { started_at } | ChordState::ClearPending { started_at } => {
                started_at.elapsed().as_millis() > CHORD_TIMEOUT_MS
            }
        }
    }

    /// Pending key sequence for UI feedback (e.g., "d" for delete)
    pub fn pending_display(&self) -> Option<&'static str> {
        match self {
            ChordState::None => None,
            ChordState::DeletePending { .. } => Some("d"),
            ChordState::ClearPending { .. } => Some("C"),
        }
    }
}

/// Last known state of the backend, shown in the chat header
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BackendStatus {
    /// No health report yet
    #[default]
    Unknown,
    /// Backend and model are up
    Healthy { documents: u64 },
    /// Backend answered but reports a problem
    Degraded(String),
    /// Health request failed
    Unreachable(String),
}

impl BackendStatus {
    /// Classify a health report
    pub fn from_report(report: Result<HealthStatus, String>) -> Self {
        match report {
            Ok(status) if status.is_healthy() => BackendStatus::Healthy {
                documents: status.documents_count,
            },
            Ok(status) => BackendStatus::Degraded(format!(
                "status {}, model {}",
                status.status, status.ollama
            )),
            Err(message) => BackendStatus::Unreachable(message),
        }
    }

    /// Short text for the header
    pub fn label(&self) -> String {
        match self {
            BackendStatus::Unknown => "checking backend…".to_string(),
            BackendStatus::Healthy { documents } => {
                let noun = if *documents == 1 { "document" } else { "documents" };
                format!("● online · {documents} {noun}")
            }
            BackendStatus::Degraded(detail) => format!("● degraded · {detail}"),
            BackendStatus::Unreachable(_) => "● offline".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn report(status: &str, ollama: &str, documents: u64) -> Result<HealthStatus, String> {
        Ok(HealthStatus {
            status: status.to_string(),
            ollama: ollama.to_string(),
            vector_store: "healthy".to_string(),
            documents_count: documents,
        })
    }

    #[test]
    fn chord_expires_after_timeout() {
        let fresh = ChordState::DeletePending {
            started_at: Instant::now(),
        };
        assert!(!fresh.is_expired());

        let stale = ChordState::DeletePending {
            started_at: Instant::now() - Duration::from_millis(600),
        };
        assert!(stale.is_expired());
        assert!(!ChordState::None.is_expired());
    }

    #[test]
    fn pending_display_shows_first_key() {
        let chord = ChordState::DeletePending {
            started_at: Instant::now(),
        };
        assert_eq!(chord.pending_display(), Some("d"));
        let clear = ChordState::ClearPending {
            started_at: Instant::now(),
        };
        assert_eq!(clear.pending_display(), Some("C"));
        assert_eq!(ChordState::None.pending_display(), None);
    }

    #[test]
    fn backend_status_classifies_reports() {
        assert_eq!(
            BackendStatus::from_report(report("healthy", "healthy", 3)),
            BackendStatus::Healthy { documents: 3 }
        );
        assert_eq!(
            BackendStatus::from_report(report("healthy", "unhealthy", 3)),
            BackendStatus::Degraded("status healthy, model unhealthy".to_string())
        );
        assert_eq!(
            BackendStatus::from_report(Err("request failed".to_string())),
            BackendStatus::Unreachable("request failed".to_string())
        );
    }

    #[test]
    fn backend_status_label_pluralizes_documents() {
        assert_eq!(
            BackendStatus::Healthy { documents: 1 }.label(),
            "● online · 1 document"
        );
        assert_eq!(
            BackendStatus::Healthy { documents: 4 }.label(),
            "● online · 4 documents"
        );
    }
}
