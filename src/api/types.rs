//! Request and response bodies of the backend API.

use serde::{Deserialize, Serialize};

use crate::chat::SourceRef;

/// Body of `POST /query`
#[derive(Debug, Serialize)]
pub struct QueryRequest<'a> {
    pub question: &'a str,
}

/// Response of `POST /query`.
///
/// The backend also echoes the question and the raw context; only the
/// fields the client uses are kept.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QueryAnswer {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<SourceRef>,
}

/// Response of `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,
    /// Status of the model runtime ("healthy", "unhealthy", "unreachable")
    #[serde(default)]
    pub ollama: String,
    #[serde(default)]
    pub vector_store: String,
    #[serde(default)]
    pub documents_count: u64,
}

impl HealthStatus {
    /// True when the backend and its model runtime both report healthy
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy" && self.ollama == "healthy"
    }
}

/// Error body FastAPI-style backends send with non-2xx statuses
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: serde_json::Value,
}
