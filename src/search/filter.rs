//! In-memory filtering of the indexed collection.
//!
//! Complexity: O(n) where n = number of messages. The date check runs
//! first since it is the cheapest.

use chrono::NaiveDate;

use crate::model::message::IndexedMessage;

use super::keyword::KeywordMatcher;
use super::Query;

/// Return the positions of every message matching `query`, in order.
pub fn filter(messages: &[IndexedMessage], query: &Query) -> Vec<usize> {
    let matcher = query.active_keyword().and_then(KeywordMatcher::new);
    messages
        .iter()
        .enumerate()
        .filter(|(_, message)| message_matches(message, query, matcher.as_ref()))
        .map(|(i, _)| i)
        .collect()
}

/// Borrow the messages at `positions`.
pub fn select<'a>(messages: &'a [IndexedMessage], positions: &[usize]) -> Vec<&'a IndexedMessage> {
    positions.iter().filter_map(|&i| messages.get(i)).collect()
}

/// Check whether a single message matches the query.
fn message_matches(
    message: &IndexedMessage,
    query: &Query,
    matcher: Option<&KeywordMatcher>,
) -> bool {
    // 1. Date range (inclusive on both ends)
    if !in_range(message.date(), query.start, query.end) {
        return false;
    }

    // 2. Keyword: messages without text never match
    match matcher {
        Some(m) => message.content.as_deref().is_some_and(|c| m.is_match(c)),
        None => true,
    }
}

fn in_range(date: NaiveDate, start: NaiveDate, end: NaiveDate) -> bool {
    date >= start && date <= end
}
