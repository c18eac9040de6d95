//! Summary statistics over an indexed archive.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::model::attachment::MediaKind;
use crate::model::identity::Identity;
use crate::model::message::IndexedMessage;

/// Headline numbers for `chatshell stats`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveStats {
    pub message_count: usize,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub with_text: usize,
    pub photos: usize,
    pub videos: usize,
    pub audio: usize,
    pub top_senders: Vec<(String, usize)>,
}

/// Compute statistics; senders are grouped by canonical identity.
pub fn compute(messages: &[IndexedMessage], identity: &Identity, top_n: usize) -> ArchiveStats {
    ArchiveStats {
        message_count: messages.len(),
        date_range: super::indexer::date_bounds(messages).ok(),
        with_text: messages
            .iter()
            .filter(|m| m.content.as_deref().is_some_and(|c| !c.is_empty()))
            .count(),
        photos: count_attachments(messages, MediaKind::Photos),
        videos: count_attachments(messages, MediaKind::Videos),
        audio: count_attachments(messages, MediaKind::Audio),
        top_senders: top_senders(messages, identity, top_n),
    }
}

/// Total number of attachments of `kind`.
pub fn count_attachments(messages: &[IndexedMessage], kind: MediaKind) -> usize {
    messages
        .iter()
        .map(|m| m.attachments(kind).map_or(0, <[_]>::len))
        .sum()
}

/// Return the top N senders by message count.
pub fn top_senders(messages: &[IndexedMessage], identity: &Identity, n: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for message in messages {
        *counts
            .entry(identity.canonical(message.sender_or_unknown()))
            .or_default() += 1;
    }
    let mut sorted: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted.truncate(n);
    sorted
}
