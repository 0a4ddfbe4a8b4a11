//! Conversation and message records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a conversation.
pub type ConversationId = String;

/// Title given to a conversation before its first user message.
pub const DEFAULT_TITLE: &str = "New conversation";

/// Number of characters kept when deriving a title from the first message.
pub const TITLE_MAX_CHARS: usize = 30;

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Short label for rendering
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "Assistant",
        }
    }
}

/// A citation returned with an answer.
///
/// The structure belongs to the backend; only the display label is derived here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceRef(pub serde_json::Value);

impl SourceRef {
    /// Display label for the source at `index` (0-based) in its answer.
    ///
    /// Falls back through `filename`, `metadata.source`, `metadata.web_url`,
    /// then "Source N".
    pub fn label(&self, index: usize) -> String {
        let value = &self.0;
        let candidates = [
            value.get("filename"),
            value.pointer("/metadata/source"),
            value.pointer("/metadata/web_url"),
        ];

        candidates
            .into_iter()
            .flatten()
            .filter_map(serde_json::Value::as_str)
            .find(|s| !s.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Source {}", index + 1))
    }

    /// Number of retrieved chunks attached to this source, if the backend sent them
    pub fn chunk_count(&self) -> Option<usize> {
        self.0
            .get("chunks")
            .and_then(serde_json::Value::as_array)
            .map(Vec::len)
    }

    /// Text of each retrieved chunk, in backend order. Chunks without text are skipped.
    pub fn chunk_texts(&self) -> Vec<String> {
        self.0
            .get("chunks")
            .and_then(serde_json::Value::as_array)
            .map(|chunks| {
                chunks
                    .iter()
                    .filter_map(|chunk| chunk.get("content").and_then(serde_json::Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<SourceRef>>,
    pub timestamp: DateTime<Utc>,
}

/// An independent chat thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub title: String,
    pub messages: Vec<Message>,
    /// True while an answer is outstanding
    #[serde(default)]
    pub is_processing: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create an empty conversation with the placeholder title
    pub fn new(id: ConversationId) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: DEFAULT_TITLE.to_string(),
            messages: Vec::new(),
            is_processing: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// The most recent assistant reply, if any
    pub fn last_answer(&self) -> Option<&Message> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
    }
}

/// Derive a conversation title from its first user message.
pub fn derive_title(first_message: &str) -> String {
    if first_message.is_empty() {
        return DEFAULT_TITLE.to_string();
    }

    let preview: String = first_message.chars().take(TITLE_MAX_CHARS).collect();
    if preview.len() < first_message.len() {
        format!("{preview}...")
    } else {
        preview
    }
}

/// Generate a fresh conversation ID (`chat_<millis>_<suffix>`).
pub(crate) fn generate_id() -> ConversationId {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("chat_{}_{}", Utc::now().timestamp_millis(), &suffix[..9])
}
