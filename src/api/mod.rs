//! Client for the question-answering backend.
//!
//! This module provides:
//! - `QueryClient` - The seam between the UI and whatever answers questions
//! - `HttpQueryClient` - Blocking HTTP implementation (`POST /query`, `GET /health`)
//! - Wire types for both endpoints

pub mod http;
pub mod types;

use thiserror::Error;

pub use http::HttpQueryClient;
pub use types::{HealthStatus, QueryAnswer};

/// Errors produced while asking the backend
#[derive(Debug, Error)]
pub enum QueryError {
    /// The question was blank after trimming
    #[error("question cannot be empty")]
    EmptyQuestion,
    /// Connection failure, timeout, or body read failure
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The backend answered with a non-success status
    #[error("server returned {code}: {message}")]
    Status { code: u16, message: String },
    /// The backend answered with something that is not the expected JSON
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Answers questions against a knowledge base.
///
/// Implementations block; callers run them off the UI thread.
pub trait QueryClient: Send + Sync {
    /// Ask a question and return the answer with its sources
    fn ask(&self, question: &str) -> Result<QueryAnswer, QueryError>;

    /// Report backend health
    fn health(&self) -> Result<HealthStatus, QueryError>;
}
