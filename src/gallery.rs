//! Media galleries: messages carrying photos, videos or voice notes.
//!
//! Galleries are built from the full indexed collection, not from the
//! date/keyword-filtered view. Attachment URIs are resolved by file name
//! against the local media folders; a file that is not on disk is reported
//! and skipped without stopping the gallery.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::debug;

use crate::config::ArchiveConfig;
use crate::error::{Loaded, Warning};
use crate::model::attachment::{AttachmentRef, MediaKind};
use crate::model::message::IndexedMessage;

/// Local folders holding each kind of media.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaDirs {
    pub photos: PathBuf,
    pub videos: PathBuf,
    pub audio: PathBuf,
}

impl MediaDirs {
    /// Standard layout: `photos/`, `videos/`, `audio/` inside the archive.
    pub fn under(archive_dir: &Path) -> Self {
        Self::from_config(archive_dir, &ArchiveConfig::default())
    }

    /// Folders from configuration; relative entries are joined to the archive.
    pub fn from_config(archive_dir: &Path, config: &ArchiveConfig) -> Self {
        Self {
            photos: archive_dir.join(&config.photos_dir),
            videos: archive_dir.join(&config.videos_dir),
            audio: archive_dir.join(&config.audio_dir),
        }
    }

    /// Folder for `kind`.
    pub fn dir(&self, kind: MediaKind) -> &Path {
        match kind {
            MediaKind::Photos => &self.photos,
            MediaKind::Videos => &self.videos,
            MediaKind::Audio => &self.audio,
        }
    }

    /// Local path for an attachment: media folder + file name of the URI.
    pub fn resolve(&self, kind: MediaKind, attachment: &AttachmentRef) -> PathBuf {
        self.dir(kind).join(attachment.file_name())
    }
}

/// One resolved media file.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryItem {
    pub kind: MediaKind,
    pub path: PathBuf,
    pub file_name: String,
    pub sender: String,
    pub datetime: NaiveDateTime,
    pub size_bytes: u64,
}

/// Messages that carry at least one attachment of `kind`, in collection order.
pub fn messages_with(messages: &[IndexedMessage], kind: MediaKind) -> Vec<&IndexedMessage> {
    messages
        .iter()
        .filter(|m| m.has_attachments(kind))
        .collect()
}

/// Resolve every attachment of `kind` to a file on disk.
pub fn collect_gallery(
    messages: &[IndexedMessage],
    kind: MediaKind,
    dirs: &MediaDirs,
) -> Loaded<Vec<GalleryItem>> {
    let mut items = Vec::new();
    let mut warnings = Vec::new();

    for message in messages_with(messages, kind) {
        for attachment in message.attachments(kind).unwrap_or_default() {
            let path = dirs.resolve(kind, attachment);
            let meta = match std::fs::metadata(&path) {
                Ok(meta) if attachment.has_file_name() && meta.is_file() => meta,
                _ => {
                    debug!(path = %path.display(), "Media file missing");
                    warnings.push(Warning::MissingMedia { path });
                    continue;
                }
            };
            items.push(GalleryItem {
                kind,
                file_name: attachment.file_name().to_string(),
                sender: message.sender_or_unknown().to_string(),
                datetime: message.datetime(),
                size_bytes: meta.len(),
                path,
            });
        }
    }

    Loaded {
        value: items,
        warnings,
    }
}
