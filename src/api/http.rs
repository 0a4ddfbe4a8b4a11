//! Blocking HTTP implementation of `QueryClient`.

use std::time::Duration;

use reqwest::blocking::{Client, Response};

use super::types::{ErrorBody, HealthStatus, QueryAnswer, QueryRequest};
use super::{QueryClient, QueryError};

/// Health probes never wait as long as answers do.
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Longest error body kept in a `QueryError::Status` message.
const MAX_ERROR_CHARS: usize = 200;

/// HTTP client for the backend at `base_url`
pub struct HttpQueryClient {
    client: Client,
    base_url: String,
}

impl HttpQueryClient {
    /// Create a client. `timeout` bounds each answer request end to end.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, QueryError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl QueryClient for HttpQueryClient {
    fn ask(&self, question: &str) -> Result<QueryAnswer, QueryError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(QueryError::EmptyQuestion);
        }

        tracing::debug!(chars = question.chars().count(), "sending query");
        let response = self
            .client
            .post(self.endpoint("/query"))
            .json(&QueryRequest { question })
            .send()?;

        let body = check_status(response)?.text()?;
        let answer: QueryAnswer = serde_json::from_str(&body)?;
        tracing::debug!(sources = answer.sources.len(), "query answered");
        Ok(answer)
    }

    fn health(&self) -> Result<HealthStatus, QueryError> {
        let response = self
            .client
            .get(self.endpoint("/health"))
            .timeout(HEALTH_TIMEOUT)
            .send()?;

        let body = check_status(response)?.text()?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Turn a non-2xx response into `QueryError::Status`
fn check_status(response: Response) -> Result<Response, QueryError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    Err(QueryError::Status {
        code: status.as_u16(),
        message: error_message(&body),
    })
}

/// Extract a readable message from an error body.
///
/// Prefers the `detail` field; otherwise the raw body, shortened.
fn error_message(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return match parsed.detail {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "no response body".to_string();
    }
    if trimmed.chars().count() > MAX_ERROR_CHARS {
        let short: String = trimmed.chars().take(MAX_ERROR_CHARS).collect();
        format!("{short}...")
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve a single canned response and return the base URL plus the
    /// request line and body the client sent.
    fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, thread::JoinHandle<(String, String)>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();

            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
                let lower = line.to_ascii_lowercase();
                if let Some(value) = lower.strip_prefix("content-length:") {
                    content_length = value.trim().parse().unwrap();
                }
            }

            let mut request_body = vec![0u8; content_length];
            reader.read_exact(&mut request_body).unwrap();

            let mut stream = stream;
            write!(
                stream,
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();
            stream.flush().unwrap();

            (
                request_line.trim_end().to_string(),
                String::from_utf8(request_body).unwrap(),
            )
        });

        (format!("http://{addr}"), handle)
    }

    fn client(base_url: &str) -> HttpQueryClient {
        HttpQueryClient::new(base_url, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn new_strips_trailing_slashes() {
        let client = client("http://localhost:8000//");
        assert_eq!(client.endpoint("/query"), "http://localhost:8000/query");
    }

    #[test]
    fn ask_rejects_blank_question_without_sending() {
        let client = client("http://127.0.0.1:9");
        assert!(matches!(client.ask("   "), Err(QueryError::EmptyQuestion)));
    }

    #[test]
    fn ask_posts_trimmed_question_and_parses_answer() {
        let (base, server) = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"question":"q","answer":"Within 14 days.","context":[],"sources":[{"filename":"refunds.pdf"}],"sources_count":1}"#,
        );

        let answer = client(&base).ask("  refund window?  ").unwrap();
        let (request_line, request_body) = server.join().unwrap();

        assert_eq!(answer.answer, "Within 14 days.");
        assert_eq!(answer.sources[0].label(0), "refunds.pdf");
        assert!(request_line.starts_with("POST /query "));
        let sent: serde_json::Value = serde_json::from_str(&request_body).unwrap();
        assert_eq!(sent["question"], "refund window?");
    }

    #[test]
    fn ask_maps_error_status_to_detail_message() {
        let (base, server) = serve_once(
            "HTTP/1.1 500 Internal Server Error",
            r#"{"detail":"Error processing query: model not loaded"}"#,
        );

        let err = client(&base).ask("anything").unwrap_err();
        server.join().unwrap();

        match err {
            QueryError::Status { code, message } => {
                assert_eq!(code, 500);
                assert_eq!(message, "Error processing query: model not loaded");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[test]
    fn ask_reports_malformed_json_as_decode_error() {
        let (base, server) = serve_once("HTTP/1.1 200 OK", r#"{"unexpected":true}"#);

        let err = client(&base).ask("anything").unwrap_err();
        server.join().unwrap();

        assert!(matches!(err, QueryError::Decode(_)));
    }

    #[test]
    fn health_parses_status_body() {
        let (base, server) = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"status":"healthy","ollama":"healthy","vector_store":"healthy","documents_count":3}"#,
        );

        let health = client(&base).health().unwrap();
        let (request_line, _) = server.join().unwrap();

        assert!(health.is_healthy());
        assert_eq!(health.documents_count, 3);
        assert!(request_line.starts_with("GET /health "));
    }

    #[test]
    fn unreachable_backend_is_http_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{addr}")).ask("hello").unwrap_err();
        assert!(matches!(err, QueryError::Http(_)));
    }

    #[test]
    fn error_message_falls_back_to_shortened_body() {
        assert_eq!(error_message(""), "no response body");
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(error_message(r#"{"detail":[1,2]}"#), "[1,2]");

        let long = "x".repeat(MAX_ERROR_CHARS + 50);
        let message = error_message(&long);
        assert_eq!(message.chars().count(), MAX_ERROR_CHARS + 3);
        assert!(message.ends_with("..."));
    }
}
