use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Maximum number of toasts kept on screen at once
const MAX_VISIBLE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastType {
    Info,    // Cyan
    Success, // Green
    Warning, // Yellow
    Error,   // Red
}

impl ToastType {
    /// How long a toast of this kind stays visible; errors linger longer
    pub fn default_duration(&self) -> Duration {
        match self {
            ToastType::Info | ToastType::Success => Duration::from_secs(3),
            ToastType::Warning => Duration::from_secs(4),
            ToastType::Error => Duration::from_secs(6),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub toast_type: ToastType,
    pub created_at: Instant,
    pub duration: Duration,
}

impl Toast {
    pub fn new(id: u64, message: impl Into<String>, toast_type: ToastType) -> Self {
        Self {
            id,
            message: message.into(),
            toast_type,
            created_at: Instant::now(),
            duration: toast_type.default_duration(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.duration
    }
}

/// Queue of transient notifications, newest last.
pub struct ToastManager {
    queue: VecDeque<Toast>,
    next_id: u64,
}

impl ToastManager {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            next_id: 1,
        }
    }

    /// Show a message. Repeating the message on screen just restarts its timer.
    pub fn push(&mut self, message: impl Into<String>, toast_type: ToastType) {
        let message = message.into();
        if let Some(existing) = self
            .queue
            .iter_mut()
            .find(|t| t.message == message && t.toast_type == toast_type)
        {
            existing.created_at = Instant::now();
            return;
        }

        let toast = Toast::new(self.next_id, message, toast_type);
        self.next_id = self.next_id.wrapping_add(1);
        self.queue.push_back(toast);
        while self.queue.len() > MAX_VISIBLE {
            self.queue.pop_front();
        }
    }

    /// Drop expired toasts
    pub fn update(&mut self) {
        self.queue.retain(|t| !t.is_expired());
    }

    pub fn visible_toasts(&self) -> Vec<&Toast> {
        self.queue.iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Default for ToastManager {
    fn default() -> Self {
        Self::new()
    }
}
