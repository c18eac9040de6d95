//! Chat message types.

use chrono::{NaiveDate, NaiveDateTime};

use super::attachment::{AttachmentRef, MediaKind};

/// A single chat event as decoded from an export file.
///
/// Fields are populated opportunistically: anything missing from the JSON
/// record stays `None` rather than being defaulted.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ChatMessage {
    /// Display name of the sender.
    pub sender_name: Option<String>,

    /// Text body. Attachment-only messages usually have none.
    pub content: Option<String>,

    /// Milliseconds since the Unix epoch. Sort and filter key.
    pub timestamp_ms: i64,

    /// Photo attachments.
    pub photos: Option<Vec<AttachmentRef>>,

    /// Video attachments.
    pub videos: Option<Vec<AttachmentRef>>,

    /// Audio attachments (voice notes).
    #[serde(alias = "audio")]
    pub audio_files: Option<Vec<AttachmentRef>>,

    /// Emoji reactions left on the message.
    pub reactions: Option<Vec<Reaction>>,

    /// Shared link, post or reel.
    pub share: Option<Share>,
}

/// A reaction to a message.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Reaction {
    pub reaction: String,
    pub actor: Option<String>,
}

/// Shared content attached to a message.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Share {
    pub link: Option<String>,
    pub share_text: Option<String>,
}

impl ChatMessage {
    /// A text-only message, mostly useful for tests and benches.
    pub fn text(sender: &str, content: &str, timestamp_ms: i64) -> Self {
        Self {
            sender_name: Some(sender.to_string()),
            content: Some(content.to_string()),
            timestamp_ms,
            photos: None,
            videos: None,
            audio_files: None,
            reactions: None,
            share: None,
        }
    }

    /// Attachment sequence of the given kind, if the record carried one.
    pub fn attachments(&self, kind: MediaKind) -> Option<&[AttachmentRef]> {
        match kind {
            MediaKind::Photos => self.photos.as_deref(),
            MediaKind::Videos => self.videos.as_deref(),
            MediaKind::Audio => self.audio_files.as_deref(),
        }
    }

    /// `true` if the message carries at least one attachment of `kind`.
    pub fn has_attachments(&self, kind: MediaKind) -> bool {
        self.attachments(kind).is_some_and(|a| !a.is_empty())
    }

    /// Total number of attachments across all kinds.
    pub fn attachment_count(&self) -> usize {
        MediaKind::ALL
            .iter()
            .map(|&k| self.attachments(k).map_or(0, <[AttachmentRef]>::len))
            .sum()
    }

    /// Sender name, or `"Unknown"` when the record had none.
    pub fn sender_or_unknown(&self) -> &str {
        self.sender_name.as_deref().unwrap_or("Unknown")
    }
}

/// A message after chronological indexing.
///
/// `datetime` is computed once from `timestamp_ms` by the indexer and cannot
/// be set independently.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedMessage {
    message: ChatMessage,
    datetime: NaiveDateTime,
}

impl IndexedMessage {
    pub(crate) fn new(message: ChatMessage, datetime: NaiveDateTime) -> Self {
        Self { message, datetime }
    }

    /// The underlying message.
    pub fn message(&self) -> &ChatMessage {
        &self.message
    }

    /// Wall-clock date and time in the indexing time zone.
    pub fn datetime(&self) -> NaiveDateTime {
        self.datetime
    }

    /// Calendar date part of [`Self::datetime`].
    pub fn date(&self) -> NaiveDate {
        self.datetime.date()
    }
}

impl std::ops::Deref for IndexedMessage {
    type Target = ChatMessage;

    fn deref(&self) -> &ChatMessage {
        &self.message
    }
}
