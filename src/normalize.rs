//! Response Normalizer/Parser
//!
//! Model output is untrusted: it may arrive wrapped in a markdown code fence
//! despite instructions, or not be JSON at all. This module strips the fence when
//! one is clearly present and parses the remainder into the schema contract.

use crate::error::ParseError;
use crate::planner::TimeWindow;
use crate::schema::{DayRecord, JourneyDocument};
use serde_json::Value;

const FENCE: &str = "```";
const JOURNEY_FIELD: &str = "journey";

/// A chunk response that passed structural validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedChunk {
    pub days: Vec<DayRecord>,
    /// Whether the response carried a `journey` field at all.
    pub journey_present: bool,
}

impl ParsedChunk {
    /// Parsed, but nothing to accumulate.
    pub fn is_weak_success(&self) -> bool {
        self.days.is_empty()
    }
}

/// Remove an enclosing code fence and its optional language tag.
///
/// Only strips when the trimmed text both starts and ends with a fence delimiter;
/// anything else is returned untouched.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix(FENCE) else {
        return text;
    };
    let Some(inner) = inner.strip_suffix(FENCE) else {
        return text;
    };
    inner
        .trim_start_matches([' ', '\t'])
        .trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        .trim()
}

/// Normalize and parse a raw chunk response.
pub fn parse_chunk(raw: &str) -> Result<ParsedChunk, ParseError> {
    let body = strip_code_fence(raw);
    let mut value: Value = serde_json::from_str(body).map_err(ParseError::Malformed)?;

    // A null journey is treated like a missing one.
    if let Some(map) = value.as_object_mut() {
        if map.get(JOURNEY_FIELD).is_some_and(Value::is_null) {
            map.remove(JOURNEY_FIELD);
        }
    }
    let journey_present = value.get(JOURNEY_FIELD).is_some();

    let document: JourneyDocument = serde_json::from_value(value).map_err(ParseError::Schema)?;
    Ok(ParsedChunk {
        days: document.journey,
        journey_present,
    })
}

/// Reject days dated outside the window that produced them.
pub fn check_window(days: &[DayRecord], window: &TimeWindow) -> Result<(), ParseError> {
    match days.iter().find(|day| !window.contains(day.date)) {
        Some(day) => Err(ParseError::DateOutsideWindow {
            date: day.date,
            window: *window,
        }),
        None => Ok(()),
    }
}
