//! Context Summarizer
//!
//! Derives the digest carried from one chunk into the next chunk's prompt so the
//! model keeps narrative continuity without seeing the full history.

use crate::schema::DayRecord;
use std::collections::HashSet;
use std::fmt;

pub const FALLBACK_DIGEST: &str = "No data was generated for the previous period.";
pub const NO_EVENTS_MARKER: &str = "- No major events occurred.";
pub const NO_MESSAGES_MARKER: &str = "No messages in this period.";

/// Natural-language summary of the most recent chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextDigest(String);

impl ContextDigest {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Digest fed forward after a chunk produced no days.
    pub fn fallback() -> Self {
        Self(FALLBACK_DIGEST.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContextDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Summarize one chunk, truncating the last message to `preview_chars` characters.
pub fn summarize(days: &[DayRecord], preview_chars: usize) -> ContextDigest {
    let Some(last_day) = days.last() else {
        return ContextDigest::fallback();
    };

    let mut lines = vec![format!(
        "Summary of events up to {}:",
        last_day.date.format("%B %d, %Y")
    )];

    let titles = event_titles(days);
    if titles.is_empty() {
        lines.push(NO_EVENTS_MARKER.to_string());
    } else {
        lines.push(format!("- Key Events: {}", titles.join("; ")));
    }

    let last_message = days
        .iter()
        .rev()
        .find_map(|day| day.messages.last())
        .map(|message| preview(&message.text, preview_chars))
        .unwrap_or_else(|| NO_MESSAGES_MARKER.to_string());
    lines.push(format!(
        "- The last conversation was about: '{}...'",
        last_message
    ));

    ContextDigest(lines.join("\n"))
}

/// Distinct non-empty titles in first-seen order.
fn event_titles(days: &[DayRecord]) -> Vec<&str> {
    let mut seen = HashSet::new();
    days.iter()
        .flat_map(|day| day.events.iter())
        .map(|event| event.title.trim())
        .filter(|title| !title.is_empty() && seen.insert(*title))
        .collect()
}

fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
