//! Chronological ordering and derived calendar time.

use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, Utc};
use tracing::warn;

use crate::error::{ChatError, Result};
use crate::model::message::{ChatMessage, IndexedMessage};

/// Time zone used to turn epoch timestamps into wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Zone {
    /// The system's local zone.
    #[default]
    Local,
    Utc,
    /// A fixed offset such as `-03:00`.
    Fixed(FixedOffset),
}

impl FromStr for Zone {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "local" => Ok(Self::Local),
            "utc" | "z" => Ok(Self::Utc),
            other => FixedOffset::from_str(other)
                .map(Self::Fixed)
                .map_err(|e| ChatError::InvalidConfig(format!("time zone '{s}': {e}"))),
        }
    }
}

impl Zone {
    /// Wall-clock time of an epoch timestamp in milliseconds.
    ///
    /// Timestamps outside chrono's range fall back to the Unix epoch.
    pub fn datetime_from_millis(self, timestamp_ms: i64) -> NaiveDateTime {
        let utc = DateTime::<Utc>::from_timestamp_millis(timestamp_ms).unwrap_or_else(|| {
            warn!(timestamp_ms, "Timestamp out of range, using Unix epoch");
            DateTime::<Utc>::default()
        });
        match self {
            Self::Local => utc.with_timezone(&Local).naive_local(),
            Self::Utc => utc.naive_utc(),
            Self::Fixed(offset) => utc.with_timezone(&offset).naive_local(),
        }
    }
}

/// Sort messages by timestamp (stable) and attach their calendar time.
pub fn index(mut messages: Vec<ChatMessage>, zone: Zone) -> Vec<IndexedMessage> {
    messages.sort_by_key(|m| m.timestamp_ms);
    messages
        .into_iter()
        .map(|m| {
            let datetime = zone.datetime_from_millis(m.timestamp_ms);
            IndexedMessage::new(m, datetime)
        })
        .collect()
}

/// Oldest and newest calendar date in the collection.
///
/// An empty collection is the one condition that stops the pipeline, so it
/// is reported as [`ChatError::EmptyArchive`] rather than a default range.
pub fn date_bounds(messages: &[IndexedMessage]) -> Result<(NaiveDate, NaiveDate)> {
    let min = messages.iter().map(IndexedMessage::date).min();
    let max = messages.iter().map(IndexedMessage::date).max();
    match (min, max) {
        (Some(min), Some(max)) => Ok((min, max)),
        _ => Err(ChatError::EmptyArchive),
    }
}
