//! Schema Contract
//!
//! The shape every chunk response must satisfy. Field names follow the camelCase
//! keys the model is instructed to emit, and the same types are written back to
//! the persisted artifact.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Top-level object of a chunk response and of the persisted artifact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JourneyDocument {
    /// Absent in a response means the chunk produced no days.
    #[serde(default)]
    pub journey: Vec<DayRecord>,
}

/// One calendar day of the narrative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    pub date: NaiveDate,
    pub day_of_week: String,
    pub month: String,
    pub summary: String,
    #[serde(default)]
    pub events: Vec<EventRecord>,
    #[serde(default)]
    pub messages: Vec<MessageRecord>,
    /// Opaque coach/doctor hour counters; passed through unchanged.
    #[serde(default)]
    pub internal_metrics: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    #[serde(rename = "type")]
    pub event_type: String,
    pub title: String,
    #[serde(default)]
    pub details: String,
    /// Soft reference to a message id anywhere in the journey.
    #[serde(default)]
    pub triggered_by_message_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: String,
    pub timestamp: String,
    pub sender: String,
    pub text: String,
}
