//! Feed model: what a page of the conversation looks like on screen.
//!
//! A page of messages becomes a flat list of day separators and chat
//! bubbles. Renderers (the TUI and `chatshell show`) only lay these out;
//! identity resolution and date labelling happen here.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::i18n::{self, Lang};
use crate::model::attachment::MediaKind;
use crate::model::identity::Identity;
use crate::model::message::IndexedMessage;

/// Which side of the conversation a bubble sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Everyone except the archive owner.
    Left,
    /// The archive owner.
    Right,
}

/// Attachment counts shown under a bubble.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AttachmentSummary {
    pub photos: usize,
    pub videos: usize,
    pub audio: usize,
}

impl AttachmentSummary {
    fn of(message: &IndexedMessage) -> Self {
        let count = |kind| message.attachments(kind).map_or(0, <[_]>::len);
        Self {
            photos: count(MediaKind::Photos),
            videos: count(MediaKind::Videos),
            audio: count(MediaKind::Audio),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.photos + self.videos + self.audio == 0
    }
}

/// One element of the rendered feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedItem {
    /// Day separator, e.g. `Monday, February 5, 2024`.
    DateLabel { date: NaiveDate, label: String },
    /// A single message.
    Bubble {
        side: Side,
        /// Canonical sender name.
        sender: String,
        /// Message text; empty when the message had none.
        content: String,
        time: NaiveDateTime,
        attachments: AttachmentSummary,
        /// `"❤ Ana"` style reaction summaries.
        reactions: Vec<String>,
        /// Shared link, if the message was a share.
        link: Option<String>,
    },
}

/// Build the feed for one page of messages.
///
/// A date label precedes the first message and every message whose
/// calendar date differs from the previous one.
pub fn build_feed(page: &[&IndexedMessage], identity: &Identity, lang: Lang) -> Vec<FeedItem> {
    let mut items = Vec::with_capacity(page.len() + 4);
    let mut current_date: Option<NaiveDate> = None;

    for message in page {
        let date = message.date();
        if current_date != Some(date) {
            items.push(FeedItem::DateLabel {
                date,
                label: i18n::format_date_label(date, lang),
            });
            current_date = Some(date);
        }

        let sender = identity.canonical(message.sender_or_unknown()).to_string();
        let side = if identity.is_owner(&sender) {
            Side::Right
        } else {
            Side::Left
        };

        items.push(FeedItem::Bubble {
            side,
            sender,
            content: message.content.clone().unwrap_or_default(),
            time: message.datetime(),
            attachments: AttachmentSummary::of(message),
            reactions: message
                .reactions
                .iter()
                .flatten()
                .map(|r| match r.actor.as_deref() {
                    Some(actor) => format!("{} {}", r.reaction, identity.canonical(actor)),
                    None => r.reaction.clone(),
                })
                .collect(),
            link: message.share.as_ref().and_then(|s| s.link.clone()),
        });
    }

    items
}

/// Word-wrap `text` to `width` display columns.
///
/// Explicit newlines are kept. Words wider than `width` are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        let mut line_width = 0;

        for word in paragraph.split_whitespace() {
            let word_width = UnicodeWidthStr::width(word);
            let gap = usize::from(line_width > 0);

            if line_width + gap + word_width <= width {
                if gap == 1 {
                    line.push(' ');
                }
                line.push_str(word);
                line_width += gap + word_width;
                continue;
            }

            if line_width > 0 {
                out.push(std::mem::take(&mut line));
                line_width = 0;
            }

            if word_width <= width {
                line.push_str(word);
                line_width = word_width;
                continue;
            }

            for ch in word.chars() {
                let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
                if line_width + ch_width > width && line_width > 0 {
                    out.push(std::mem::take(&mut line));
                    line_width = 0;
                }
                line.push(ch);
                line_width += ch_width;
            }
        }

        out.push(line);
    }

    out
}
