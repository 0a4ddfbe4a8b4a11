//! Sidebar entry building: one two-line `ListItem` per conversation.

use chrono::{DateTime, Local, Utc};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::ListItem,
};

use crate::chat::Conversation;

/// Frames of the "answer pending" indicator
pub const SPINNER_FRAMES: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// Human-friendly age of `ts` relative to `now`.
pub fn format_relative(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let age = now.signed_duration_since(ts);
    let minutes = age.num_minutes();
    let hours = age.num_hours();
    let days = age.num_days();

    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{minutes} min ago")
    } else if hours < 24 {
        format!("{hours} h ago")
    } else if days < 7 {
        format!("{days} d ago")
    } else {
        ts.with_timezone(&Local).format("%-d %b").to_string()
    }
}

/// Build the list entries for `conversations`.
///
/// `title_width` is the number of columns available for the title; longer
/// titles are cut with an ellipsis.
pub fn build_list_items(
    conversations: &[Conversation],
    active_index: Option<usize>,
    spinner_tick: usize,
    now: DateTime<Utc>,
    title_width: usize,
) -> Vec<ListItem<'static>> {
    conversations
        .iter()
        .enumerate()
        .map(|(index, conv)| {
            let is_active = active_index == Some(index);

            let mut title_spans = Vec::with_capacity(2);
            if conv.is_processing {
                title_spans.push(Span::styled(
                    format!("{} ", SPINNER_FRAMES[spinner_tick % SPINNER_FRAMES.len()]),
                    Style::default().fg(Color::Yellow),
                ));
            }
            let budget = if conv.is_processing {
                title_width.saturating_sub(2)
            } else {
                title_width
            };
            let title_style = if is_active {
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            title_spans.push(Span::styled(fit(&conv.title, budget), title_style));

            let count = conv.messages.len();
            let noun = if count == 1 { "message" } else { "messages" };
            let details = Line::from(Span::styled(
                format!("{count} {noun} · {}", format_relative(conv.updated_at, now)),
                Style::default().fg(Color::DarkGray),
            ));

            ListItem::new(vec![Line::from(title_spans), details])
        })
        .collect()
}

/// Cut `text` to `width` columns, marking the cut with an ellipsis.
fn fit(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width <= 1 {
        return "…".repeat(width);
    }
    let kept: String = text.chars().take(width - 1).collect();
    format!("{kept}…")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ConversationManager;
    use chrono::{Duration, TimeZone};

    #[test]
    fn format_relative_buckets_by_age() {
        let now = Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap();

        assert_eq!(format_relative(now - Duration::seconds(20), now), "just now");
        assert_eq!(format_relative(now - Duration::minutes(5), now), "5 min ago");
        assert_eq!(format_relative(now - Duration::hours(3), now), "3 h ago");
        assert_eq!(format_relative(now - Duration::days(2), now), "2 d ago");
    }

    #[test]
    fn format_relative_shows_date_after_a_week() {
        let now = Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap();
        let old = Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();

        let label = format_relative(old, now);
        assert!(label.ends_with("Mar"), "got {label}");
        assert!(!label.contains("ago"));
    }

    #[test]
    fn fit_truncates_with_ellipsis() {
        assert_eq!(fit("Refund policy", 20), "Refund policy");
        assert_eq!(fit("Refund policy", 7), "Refund…");
        assert_eq!(fit("Refund policy", 0), "");
    }

    #[test]
    fn build_list_items_creates_one_entry_per_conversation() {
        let mut manager = ConversationManager::new();
        manager.create_conversation();
        manager.create_conversation();

        let items = build_list_items(
            manager.conversations(),
            manager.active_index(),
            0,
            Utc::now(),
            20,
        );

        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|item| item.height() == 2));
    }
}
