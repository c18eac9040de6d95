//! On-disk snapshot of a loaded archive.
//!
//! Re-reading and repairing every JSON file on each start is wasteful for
//! large exports, so the normalized messages (and the warnings found while
//! loading them) are persisted next to a fingerprint of the archive.
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ HEADER (64 bytes, fixed)             │
//! │  magic: [u8; 8] = b"CHATSHL\0"      │
//! │  version: u32                        │
//! │  message_count: u64                  │
//! │  fingerprint: [u8; 32]              │
//! │  (padding to 64 bytes)               │
//! ├──────────────────────────────────────┤
//! │ PAYLOAD (variable)                   │
//! │  bincode-serialized CachedArchive    │
//! └──────────────────────────────────────┘
//! ```
//!
//! The fingerprint covers the name, size and modification time of every
//! export file plus the text repair mode, so any change to the archive (or
//! to how it is normalized) invalidates the snapshot.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::archive::loader;
use crate::error::{ChatError, Result, Warning};
use crate::model::message::ChatMessage;
use crate::text::repair::RepairMode;

/// Magic bytes identifying a chatShell cache file.
pub const MAGIC: &[u8; 8] = b"CHATSHL\0";

/// Current cache format version.
pub const VERSION: u32 = 2;

/// Fixed header size in bytes.
pub const HEADER_SIZE: usize = 64;

/// Serializable cache header.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct CacheHeader {
    pub magic: [u8; 8],
    pub version: u32,
    pub message_count: u64,
    pub fingerprint: [u8; 32],
}

impl CacheHeader {
    /// Validate that the header is well-formed and matches the current format.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.magic != *MAGIC {
            return Err("Invalid magic bytes".into());
        }
        if self.version != VERSION {
            return Err(format!(
                "Incompatible version: expected {VERSION}, found {}",
                self.version
            ));
        }
        Ok(())
    }
}

/// What gets persisted: normalized messages plus load-time warnings.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CachedArchive {
    pub messages: Vec<ChatMessage>,
    pub warnings: Vec<Warning>,
}

/// Load a snapshot for `archive_dir` if one exists and was written for
/// `expected` (see [`fingerprint`]).
pub fn load(
    archive_dir: &Path,
    cache_dir: &Path,
    expected: &[u8; 32],
) -> Result<Option<CachedArchive>> {
    let path = cache_path_for(archive_dir, cache_dir);
    if !path.exists() {
        return Ok(None);
    }

    let data = std::fs::read(&path).map_err(|e| ChatError::io(&path, e))?;
    if data.len() < HEADER_SIZE {
        debug!("Cache file too small");
        return Ok(None);
    }

    let header: CacheHeader =
        bincode::deserialize(&data[..HEADER_SIZE]).map_err(|e| ChatError::InvalidCache {
            path: path.clone(),
            reason: format!("Header deserialization failed: {e}"),
        })?;

    if let Err(reason) = header.validate() {
        debug!(reason = %reason, "Cache header invalid");
        return Ok(None);
    }

    if header.fingerprint != *expected {
        debug!("Archive changed since the cache was written");
        return Ok(None);
    }

    let cached: CachedArchive =
        bincode::deserialize(&data[HEADER_SIZE..]).map_err(|e| ChatError::InvalidCache {
            path: path.clone(),
            reason: format!("Payload deserialization failed: {e}"),
        })?;

    if cached.messages.len() as u64 != header.message_count {
        debug!("Message count mismatch");
        return Ok(None);
    }

    Ok(Some(cached))
}

/// Write a snapshot for `archive_dir`.
///
/// `fingerprint` must be taken before the export files were read, so an
/// edit made while loading leaves a snapshot that no longer matches.
pub fn store(
    archive_dir: &Path,
    cache_dir: &Path,
    fingerprint: [u8; 32],
    cached: &CachedArchive,
) -> Result<()> {
    let header = CacheHeader {
        magic: *MAGIC,
        version: VERSION,
        message_count: cached.messages.len() as u64,
        fingerprint,
    };

    let path = cache_path_for(archive_dir, cache_dir);
    let encode_err = |e: bincode::Error| ChatError::InvalidCache {
        path: path.clone(),
        reason: e.to_string(),
    };
    let header_bytes = bincode::serialize(&header).map_err(encode_err)?;
    let payload = bincode::serialize(cached).map_err(encode_err)?;

    // Pad header to HEADER_SIZE
    let mut padded_header = vec![0u8; HEADER_SIZE];
    let copy_len = header_bytes.len().min(HEADER_SIZE);
    padded_header[..copy_len].copy_from_slice(&header_bytes[..copy_len]);

    std::fs::create_dir_all(cache_dir).map_err(|e| ChatError::io(cache_dir, e))?;
    let mut file = File::create(&path).map_err(|e| ChatError::io(&path, e))?;
    file.write_all(&padded_header)
        .map_err(|e| ChatError::io(&path, e))?;
    file.write_all(&payload).map_err(|e| ChatError::io(&path, e))?;
    file.flush().map_err(|e| ChatError::io(&path, e))?;

    info!(path = %path.display(), count = cached.messages.len(), "Cache written");
    Ok(())
}

/// SHA-256 over the identity of every export file and the repair mode.
pub fn fingerprint(archive_dir: &Path, mode: RepairMode) -> Result<[u8; 32]> {
    let files = loader::json_files(archive_dir)?.value;

    let mut hasher = Sha256::new();
    hasher.update(mode.name().as_bytes());
    for path in &files {
        let meta = std::fs::metadata(path).map_err(|e| ChatError::io(path, e))?;
        let mtime = meta
            .modified()
            .ok()
            .and_then(|t| t.duration_since(SystemTime::UNIX_EPOCH).ok())
            .map(|d| d.as_nanos())
            .unwrap_or(0);

        hasher.update(path.file_name().unwrap_or_default().as_encoded_bytes());
        hasher.update([0u8]);
        hasher.update(meta.len().to_le_bytes());
        hasher.update(mtime.to_le_bytes());
    }
    Ok(hasher.finalize().into())
}

/// Cache file location for an archive directory.
///
/// Example: `~/.cache/chatshell/<sha256_of_path>.idx`
pub fn cache_path_for(archive_dir: &Path, cache_dir: &Path) -> PathBuf {
    let absolute = std::fs::canonicalize(archive_dir).unwrap_or_else(|_| archive_dir.to_path_buf());

    let mut hasher = Sha256::new();
    hasher.update(absolute.to_string_lossy().as_bytes());
    let hash = format!("{:x}", hasher.finalize());

    cache_dir.join(format!("{hash}.idx"))
}
