//! Attachment references and media kinds.
//!
//! Exports store attachments as `{"uri": "<path>/<filename>"}`. The directory
//! part of the URI belongs to the exporting service and is never trusted;
//! only the file name is resolved against the local media folders.

use std::path::Path;

/// A reference to a media file, as found in the export.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AttachmentRef {
    /// Path-like string. Only the last component is meaningful.
    pub uri: String,
}

impl AttachmentRef {
    /// Final path component of the URI (`"a/b/c.jpg"` → `"c.jpg"`).
    ///
    /// Both `/` and `\` are treated as separators so Windows-style URIs
    /// resolve the same way on every platform.
    pub fn file_name(&self) -> &str {
        let trimmed = self.uri.trim_end_matches(['/', '\\']);
        trimmed
            .rsplit(['/', '\\'])
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or(trimmed)
    }

    /// Whether the resolved file name is usable as a path component.
    pub fn has_file_name(&self) -> bool {
        let name = self.file_name();
        !name.is_empty() && name != "." && name != ".." && Path::new(name).file_name().is_some()
    }
}

/// The three attachment sequences a message may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Photos,
    Videos,
    Audio,
}

impl MediaKind {
    /// All kinds, in gallery display order.
    pub const ALL: [MediaKind; 3] = [MediaKind::Photos, MediaKind::Videos, MediaKind::Audio];

    /// Parse a kind name as typed on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "photo" | "photos" => Some(Self::Photos),
            "video" | "videos" => Some(Self::Videos),
            "audio" | "audios" | "audio_files" => Some(Self::Audio),
            _ => None,
        }
    }

    /// Stable lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Photos => "photos",
            Self::Videos => "videos",
            Self::Audio => "audio",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
