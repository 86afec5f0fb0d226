//! Journey Accumulator
//!
//! Owns the growing sequence of days for the life of a pipeline run and writes
//! it out once, atomically, when every chunk has succeeded.

use crate::error::ApiError;
use crate::schema::{DayRecord, JourneyDocument};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

/// Ordered days across all chunks, in chunk-emission order.
#[derive(Debug, Default)]
pub struct Journey {
    days: Vec<DayRecord>,
}

impl Journey {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one chunk's days after everything accumulated so far.
    pub fn append(&mut self, chunk: Vec<DayRecord>) {
        self.days.extend(chunk);
    }

    pub fn days(&self) -> &[DayRecord] {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn audit(&self) -> JourneyAudit {
        JourneyAudit::of(&self.days)
    }

    /// Write `{"journey": [...]}` with two-space indentation.
    ///
    /// Uses temporary file + rename so a reader never sees a partial artifact.
    pub fn persist(&self, path: &Path) -> Result<(), ApiError> {
        #[derive(Serialize)]
        struct Artifact<'a> {
            journey: &'a [DayRecord],
        }

        let persist_err = |reason: String| ApiError::PersistFailed {
            path: path.display().to_string(),
            reason,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| persist_err(format!("failed to create {}: {}", parent.display(), e)))?;
        }

        let mut serialized = serde_json::to_string_pretty(&Artifact { journey: &self.days })?;
        serialized.push('\n');

        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, serialized)
            .map_err(|e| persist_err(format!("failed to write {}: {}", temp_path.display(), e)))?;

        fs::rename(&temp_path, path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            persist_err(format!("failed to rename temp file: {}", e))
        })?;

        Ok(())
    }
}

/// Load a previously persisted artifact.
pub fn load_artifact(path: &Path) -> Result<JourneyDocument, ApiError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// An event whose `triggeredByMessageId` matches no message in the journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingTrigger {
    pub date: String,
    pub title: String,
    pub message_id: String,
}

/// Cap on the missing dates an audit lists individually.
pub const MAX_MISSING_DATES: usize = 31;

/// Cross-chunk reference checks. Reported, never enforced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JourneyAudit {
    pub total_days: usize,
    pub total_messages: usize,
    pub total_events: usize,
    /// Ids appearing more than once, in first-seen order.
    pub duplicate_message_ids: Vec<String>,
    pub dangling_triggers: Vec<DanglingTrigger>,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    /// Number of calendar dates between first and last with no day record.
    pub missing_date_count: usize,
    /// The earliest missing dates, at most [`MAX_MISSING_DATES`] of them.
    pub missing_dates: Vec<NaiveDate>,
    /// Adjacent pairs whose dates go backwards.
    pub out_of_order: usize,
}

impl JourneyAudit {
    pub fn of(days: &[DayRecord]) -> Self {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut order = Vec::new();
        for message in days.iter().flat_map(|day| &day.messages) {
            let count = counts.entry(message.id.as_str()).or_insert(0);
            *count += 1;
            if *count == 2 {
                order.push(message.id.clone());
            }
        }

        let known: HashSet<&str> = counts.keys().copied().collect();
        let dangling_triggers = days
            .iter()
            .flat_map(|day| day.events.iter().map(move |event| (day, event)))
            .filter_map(|(day, event)| {
                let id = event.triggered_by_message_id.as_deref()?;
                (!known.contains(id)).then(|| DanglingTrigger {
                    date: day.date.to_string(),
                    title: event.title.clone(),
                    message_id: id.to_string(),
                })
            })
            .collect();

        let present: HashSet<NaiveDate> = days.iter().map(|day| day.date).collect();
        let first_date = present.iter().min().copied();
        let last_date = present.iter().max().copied();
        let (missing_date_count, missing_dates) = match (first_date, last_date) {
            (Some(first), Some(last)) => {
                let span = usize::try_from((last - first).num_days() + 1).unwrap_or(0);
                let count = span.saturating_sub(present.len());
                let listed = first
                    .iter_days()
                    .take_while(|date| *date <= last)
                    .filter(|date| !present.contains(date))
                    .take(count.min(MAX_MISSING_DATES))
                    .collect();
                (count, listed)
            }
            _ => (0, Vec::new()),
        };
        let out_of_order = days
            .windows(2)
            .filter(|pair| pair[1].date < pair[0].date)
            .count();

        Self {
            total_days: days.len(),
            total_messages: days.iter().map(|day| day.messages.len()).sum(),
            total_events: days.iter().map(|day| day.events.len()).sum(),
            duplicate_message_ids: order,
            dangling_triggers,
            first_date,
            last_date,
            missing_date_count,
            missing_dates,
            out_of_order,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.duplicate_message_ids.is_empty() && self.dangling_triggers.is_empty()
    }
}
