//! Archive loading pipeline: read → repair → order.
//!
//! [`Archive::open`] is the single entry point used by the CLI and the TUI.
//! It goes through the on-disk [`cache`] when possible and always re-runs
//! the [`indexer`], since the configured time zone may have changed.

pub mod cache;
pub mod indexer;
pub mod loader;
pub mod stats;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::config::{self, Config};
use crate::error::{ChatError, Loaded, Result};
use crate::gallery::MediaDirs;
use crate::model::identity::Identity;
use crate::model::message::{ChatMessage, IndexedMessage};
use crate::text::repair;

use self::cache::CachedArchive;
use self::indexer::Zone;
use self::stats::ArchiveStats;

/// A loaded, normalized and chronologically ordered chat archive.
///
/// The message collection is immutable after construction; every view
/// (filters, pages, galleries) borrows from it.
#[derive(Debug, Clone)]
pub struct Archive {
    path: PathBuf,
    messages: Vec<IndexedMessage>,
    bounds: (NaiveDate, NaiveDate),
    media: MediaDirs,
}

impl Archive {
    /// Load the archive at `path` using `config`.
    ///
    /// `force` skips the snapshot cache. Returns
    /// [`ChatError::EmptyArchive`] when no message could be loaded.
    pub fn open(
        config: &Config,
        path: &Path,
        force: bool,
        progress: Option<&dyn Fn(u64, u64)>,
    ) -> Result<Loaded<Self>> {
        let mode = config.archive.repair_mode()?;
        let zone = config.general.zone()?;
        let cache_dir = config::cache_dir(config);

        // Taken before any file is read; see `cache::store`
        let fingerprint = match cache::fingerprint(path, mode) {
            Ok(fingerprint) => Some(fingerprint),
            Err(e) => {
                debug!(error = %e, "Cannot fingerprint archive; cache disabled");
                None
            }
        };

        let cached = match fingerprint.as_ref() {
            Some(expected) if !force => match cache::load(path, &cache_dir, expected) {
                Ok(cached) => cached,
                Err(e) => {
                    warn!(error = %e, "Ignoring unreadable archive cache");
                    None
                }
            },
            _ => None,
        };

        let CachedArchive { messages, warnings } = match cached {
            Some(cached) => {
                debug!(
                    path = %path.display(),
                    count = cached.messages.len(),
                    "Loaded archive from cache"
                );
                cached
            }
            None => {
                let Loaded {
                    value: mut messages,
                    mut warnings,
                } = loader::load_directory(path, progress)?;
                warnings.extend(repair::normalize_messages(&mut messages, mode));

                let fresh = CachedArchive { messages, warnings };
                if let Some(fingerprint) = fingerprint.filter(|_| !fresh.messages.is_empty()) {
                    if let Err(e) = cache::store(path, &cache_dir, fingerprint, &fresh) {
                        warn!(error = %e, "Could not write archive cache; continuing without it");
                    }
                }
                fresh
            }
        };

        if !warnings.is_empty() {
            warn!(
                path = %path.display(),
                count = warnings.len(),
                "Archive loaded with warnings"
            );
        }

        let media = MediaDirs::from_config(path, &config.archive);
        let archive = Self::from_messages(path, messages, zone, media)?;
        info!(
            path = %path.display(),
            count = archive.messages.len(),
            "Archive ready"
        );

        Ok(Loaded {
            value: archive,
            warnings,
        })
    }

    /// Build an archive from already normalized messages.
    pub fn from_messages(
        path: &Path,
        messages: Vec<ChatMessage>,
        zone: Zone,
        media: MediaDirs,
    ) -> Result<Self> {
        if messages.is_empty() {
            return Err(ChatError::EmptyArchive);
        }
        let messages = indexer::index(messages, zone);
        let bounds = indexer::date_bounds(&messages)?;
        Ok(Self {
            path: path.to_path_buf(),
            messages,
            bounds,
            media,
        })
    }

    /// Archive directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All messages, oldest first.
    pub fn messages(&self) -> &[IndexedMessage] {
        &self.messages
    }

    /// Oldest and newest message dates (the default filter range).
    pub fn date_bounds(&self) -> (NaiveDate, NaiveDate) {
        self.bounds
    }

    /// Local media folders.
    pub fn media_dirs(&self) -> &MediaDirs {
        &self.media
    }

    /// Display name of the archive (its directory name).
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.to_string_lossy().to_string())
    }

    /// Headline statistics, senders grouped by canonical identity.
    pub fn stats(&self, identity: &Identity, top_n: usize) -> ArchiveStats {
        stats::compute(&self.messages, identity, top_n)
    }

    /// Total size in bytes of the archive's export files.
    pub fn json_size(&self) -> u64 {
        loader::json_files(&self.path)
            .map(|files| {
                files
                    .value
                    .iter()
                    .filter_map(|p| std::fs::metadata(p).ok())
                    .map(|m| m.len())
                    .sum()
            })
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_cache(cache: &Path) -> Config {
        let mut config = Config::default();
        config.general.cache_dir = Some(cache.to_path_buf());
        config.general.timezone = "utc".to_string();
        config
    }

    #[test]
    fn test_open_repairs_sorts_and_caches() {
        let archive_dir = tempfile::tempdir().unwrap();
        let cache_dir = tempfile::tempdir().unwrap();
        std::fs::write(
            archive_dir.path().join("message_1.json"),
            r#"{"messages": [
                {"sender_name": "B", "content": "MaÃ±ana", "timestamp_ms": 2000},
                {"sender_name": "A", "content": "first", "timestamp_ms": 1000}
            ]}"#,
        )
        .unwrap();
        let config = config_with_cache(cache_dir.path());

        let opened = Archive::open(&config, archive_dir.path(), false, None).unwrap();
        let messages = opened.value.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content.as_deref(), Some("first"));
        assert_eq!(messages[1].content.as_deref(), Some("Mañana"));
        assert!(opened.warnings.is_empty());

        let cache_file = cache::cache_path_for(archive_dir.path(), cache_dir.path());
        assert!(cache_file.exists());

        let reopened = Archive::open(&config, archive_dir.path(), false, None).unwrap();
        assert_eq!(reopened.value.messages(), opened.value.messages());
    }

    #[test]
    fn test_edit_during_load_is_picked_up_next_time() {
        let archive_dir = tempfile::tempdir().unwrap();
        let cache_dir = tempfile::tempdir().unwrap();
        let export = archive_dir.path().join("message_1.json");
        std::fs::write(
            &export,
            r#"{"messages": [{"sender_name": "A", "timestamp_ms": 1000}]}"#,
        )
        .unwrap();
        let config = config_with_cache(cache_dir.path());

        // Simulate the export being rewritten right after it was read
        let rewrite: &dyn Fn(u64, u64) = &|done, total| {
            if done == total {
                std::fs::write(
                    &export,
                    r#"{"messages": [{"sender_name": "A", "timestamp_ms": 1000},
                                     {"sender_name": "B", "timestamp_ms": 2000}]}"#,
                )
                .unwrap();
            }
        };
        let first = Archive::open(&config, archive_dir.path(), false, Some(rewrite)).unwrap();
        assert_eq!(first.value.messages().len(), 1);

        let second = Archive::open(&config, archive_dir.path(), false, None).unwrap();
        assert_eq!(second.value.messages().len(), 2);
    }

    #[test]
    fn test_open_empty_archive_is_fatal() {
        let archive_dir = tempfile::tempdir().unwrap();
        let cache_dir = tempfile::tempdir().unwrap();
        std::fs::write(archive_dir.path().join("m.json"), r#"{"messages": []}"#).unwrap();
        std::fs::write(archive_dir.path().join("broken.json"), "nope").unwrap();

        let result = Archive::open(&config_with_cache(cache_dir.path()), archive_dir.path(), false, None);
        assert!(matches!(result, Err(ChatError::EmptyArchive)));
    }

    #[test]
    fn test_open_rejects_invalid_config() {
        let archive_dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.archive.repair_encoding = "klingon".to_string();
        let result = Archive::open(&config, archive_dir.path(), true, None);
        assert!(matches!(result, Err(ChatError::InvalidConfig(_))));
    }
}
