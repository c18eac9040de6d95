//! Reading `*.json` export files into one message collection.
//!
//! Every file in the archive directory whose name ends in `.json` is parsed
//! and all of its `messages` arrays are concatenated. One unreadable or
//! malformed file never aborts the load; it becomes a [`Warning`] instead.
//!
//! Records are decoded field by field. Only `timestamp_ms` is required; a
//! sender, text, attachment list, reaction or share of an unexpected shape
//! is dropped on its own with a [`Warning::MalformedField`], and the rest of
//! the message is kept.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::error::{ChatError, Loaded, Result, Warning};
use crate::model::message::ChatMessage;

/// File name suffix of export documents.
const JSON_SUFFIX: &str = ".json";

/// Load and merge every export file in `dir`.
///
/// The `progress` callback receives `(files_done, files_total)`.
pub fn load_directory(
    dir: &Path,
    progress: Option<&dyn Fn(u64, u64)>,
) -> Result<Loaded<Vec<ChatMessage>>> {
    let Loaded {
        value: files,
        mut warnings,
    } = json_files(dir)?;
    let total = files.len() as u64;

    info!(path = %dir.display(), files = total, "Loading archive");

    let mut messages = Vec::new();
    for (i, path) in files.iter().enumerate() {
        if let Some(report) = progress {
            report(i as u64, total);
        }
        match load_file(path) {
            Ok(loaded) => {
                debug!(
                    path = %path.display(),
                    count = loaded.value.len(),
                    "Loaded export file"
                );
                messages.extend(loaded.value);
                warnings.extend(loaded.warnings);
            }
            Err(w) => {
                warn!(path = %path.display(), error = %w, "Skipping export file");
                warnings.push(w);
            }
        }
    }
    if let Some(report) = progress {
        report(total, total);
    }

    Ok(Loaded {
        value: messages,
        warnings,
    })
}

/// List the export files of an archive directory, sorted by name.
pub fn json_files(dir: &Path) -> Result<Loaded<Vec<PathBuf>>> {
    if !dir.exists() {
        return Err(ChatError::DirectoryNotFound(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(ChatError::NotADirectory(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    let mut warnings = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| ChatError::io(dir, e))? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warnings.push(Warning::FileAccess {
                    path: dir.to_path_buf(),
                    reason: e.to_string(),
                });
                continue;
            }
        };
        let path = entry.path();
        let is_json = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(JSON_SUFFIX));
        if is_json && path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    Ok(Loaded {
        value: files,
        warnings,
    })
}

/// Parse one export file.
///
/// The outer `Err` is a whole-file failure; record-level problems are
/// returned as warnings next to the messages that did decode.
pub fn load_file(path: &Path) -> std::result::Result<Loaded<Vec<ChatMessage>>, Warning> {
    let bytes = std::fs::read(path).map_err(|e| Warning::FileAccess {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    // Strip BOM if present
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(&bytes);

    let document: Value = serde_json::from_slice(bytes).map_err(|e| Warning::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let records = match document {
        Value::Object(mut map) => match map.remove("messages") {
            Some(Value::Array(records)) => records,
            _ => {
                debug!(path = %path.display(), "No messages array in document");
                Vec::new()
            }
        },
        _ => {
            debug!(path = %path.display(), "Document is not a JSON object");
            Vec::new()
        }
    };

    let mut messages = Vec::with_capacity(records.len());
    let mut warnings = Vec::new();
    for (index, record) in records.into_iter().enumerate() {
        match decode_record(path, index, record) {
            Ok(decoded) => {
                messages.push(decoded.value);
                warnings.extend(decoded.warnings);
            }
            Err(w) => {
                debug!(error = %w, "Skipping message record");
                warnings.push(w);
            }
        }
    }

    Ok(Loaded {
        value: messages,
        warnings,
    })
}

/// Decode a single element of a `messages` array.
///
/// `Err` drops the whole record; field-level problems come back as warnings
/// next to the message.
fn decode_record(
    path: &Path,
    index: usize,
    record: Value,
) -> std::result::Result<Loaded<ChatMessage>, Warning> {
    let Value::Object(mut fields) = record else {
        return Err(Warning::MalformedRecord {
            path: path.to_path_buf(),
            index,
            reason: "record is not a JSON object".to_string(),
        });
    };

    let timestamp_ms = match fields.get("timestamp_ms") {
        None | Some(Value::Null) => {
            return Err(Warning::MissingTimestamp {
                path: path.to_path_buf(),
                index,
            })
        }
        Some(value) => timestamp_from(value).ok_or_else(|| Warning::MalformedRecord {
            path: path.to_path_buf(),
            index,
            reason: format!("timestamp_ms is not a whole number: {value}"),
        })?,
    };

    let mut decoder = FieldDecoder {
        path,
        index,
        warnings: Vec::new(),
    };
    let message = ChatMessage {
        sender_name: decoder.single(&mut fields, "sender_name"),
        content: decoder.single(&mut fields, "content"),
        timestamp_ms,
        photos: decoder.list(&mut fields, &["photos"]),
        videos: decoder.list(&mut fields, &["videos"]),
        audio_files: decoder.list(&mut fields, &["audio_files", "audio"]),
        reactions: decoder.list(&mut fields, &["reactions"]),
        share: decoder.single(&mut fields, "share"),
    };

    Ok(Loaded {
        value: message,
        warnings: decoder.warnings,
    })
}

/// Integer milliseconds, or a float with no fractional part.
fn timestamp_from(value: &Value) -> Option<i64> {
    if let Some(ms) = value.as_i64() {
        return Some(ms);
    }
    let ms = value.as_f64()?;
    let in_range = ms >= i64::MIN as f64 && ms < i64::MAX as f64;
    (ms.is_finite() && ms.fract() == 0.0 && in_range).then_some(ms as i64)
}

/// Lenient decoding of the optional fields of one record.
struct FieldDecoder<'a> {
    path: &'a Path,
    index: usize,
    warnings: Vec<Warning>,
}

impl FieldDecoder<'_> {
    /// Decode `key` as one `T`. Absent, `null` and undecodable values are `None`.
    fn single<T: DeserializeOwned>(
        &mut self,
        fields: &mut Map<String, Value>,
        key: &str,
    ) -> Option<T> {
        match fields.remove(key)? {
            Value::Null => None,
            value => match serde_json::from_value(value) {
                Ok(decoded) => Some(decoded),
                Err(e) => {
                    self.reject(key, e.to_string());
                    None
                }
            },
        }
    }

    /// Decode the first of `keys` present as a list of `T`, skipping entries
    /// that do not decode. A value that is not an array is `None`.
    fn list<T: DeserializeOwned>(
        &mut self,
        fields: &mut Map<String, Value>,
        keys: &[&str],
    ) -> Option<Vec<T>> {
        let (key, value) = keys
            .iter()
            .find_map(|&key| fields.remove(key).map(|value| (key, value)))?;
        let entries = match value {
            Value::Null => return None,
            Value::Array(entries) => entries,
            _ => {
                self.reject(key, "expected an array".to_string());
                return None;
            }
        };

        let mut decoded = Vec::with_capacity(entries.len());
        for (i, entry) in entries.into_iter().enumerate() {
            match serde_json::from_value(entry) {
                Ok(item) => decoded.push(item),
                Err(e) => self.reject(&format!("{key}[{i}]"), e.to_string()),
            }
        }
        Some(decoded)
    }

    fn reject(&mut self, field: &str, reason: String) {
        let warning = Warning::MalformedField {
            path: self.path.to_path_buf(),
            index: self.index,
            field: field.to_string(),
            reason,
        };
        debug!(error = %warning, "Dropping message field");
        self.warnings.push(warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, contents: &str) {
        std::fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn test_merges_all_files() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "message_1.json",
            r#"{"messages": [{"sender_name": "A", "content": "x", "timestamp_ms": 2}]}"#,
        );
        write(
            tmp.path(),
            "message_2.json",
            r#"{"messages": [{"sender_name": "B", "timestamp_ms": 1},
                             {"sender_name": "A", "content": "y", "timestamp_ms": 3}]}"#,
        );
        write(tmp.path(), "notes.txt", "not an export");

        let loaded = load_directory(tmp.path(), None).unwrap();
        assert_eq!(loaded.value.len(), 3);
        assert!(loaded.warnings.is_empty());
    }

    #[test]
    fn test_corrupt_file_is_isolated() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "good.json",
            r#"{"messages": [{"sender_name": "A", "timestamp_ms": 1}]}"#,
        );
        write(tmp.path(), "bad.json", r#"{"messages": [ {"#);

        let loaded = load_directory(tmp.path(), None).unwrap();
        assert_eq!(loaded.value.len(), 1);
        assert_eq!(loaded.warnings.len(), 1);
        assert!(matches!(loaded.warnings[0], Warning::Parse { .. }));
    }

    #[test]
    fn test_document_without_messages_contributes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "participants.json", r#"{"participants": []}"#);
        write(tmp.path(), "list.json", r#"[1, 2, 3]"#);

        let loaded = load_directory(tmp.path(), None).unwrap();
        assert!(loaded.value.is_empty());
        assert!(loaded.warnings.is_empty());
    }

    #[test]
    fn test_record_without_timestamp_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "m.json",
            r#"{"messages": [{"sender_name": "A"}, {"sender_name": "B", "timestamp_ms": 5},
                             {"sender_name": "C", "timestamp_ms": "soon"}]}"#,
        );

        let loaded = load_directory(tmp.path(), None).unwrap();
        assert_eq!(loaded.value.len(), 1);
        assert_eq!(loaded.warnings.len(), 2);
        assert!(matches!(
            loaded.warnings[0],
            Warning::MissingTimestamp { index: 0, .. }
        ));
        assert!(matches!(
            loaded.warnings[1],
            Warning::MalformedRecord { index: 2, .. }
        ));
    }

    #[test]
    fn test_bad_optional_fields_keep_the_message() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "m.json",
            r#"{"messages": [
                {"sender_name": "A", "content": "one", "timestamp_ms": 1,
                 "reactions": [{"actor": "B"}, {"reaction": "\u2764", "actor": "B"}]},
                {"sender_name": "A", "content": "two", "timestamp_ms": 2,
                 "share": "https://example.com/reel"},
                {"sender_name": "A", "content": "three", "timestamp_ms": 3,
                 "photos": [{"creation_timestamp": 5}, {"uri": "photos/ok.jpg"}]},
                {"sender_name": "A", "content": "four", "timestamp_ms": 1707048000000.0}
            ]}"#,
        );

        let loaded = load_directory(tmp.path(), None).unwrap();
        let contents: Vec<&str> = loaded
            .value
            .iter()
            .filter_map(|m| m.content.as_deref())
            .collect();
        assert_eq!(contents, vec!["one", "two", "three", "four"]);

        let reactions = loaded.value[0].reactions.as_ref().unwrap();
        assert_eq!(reactions.len(), 1);
        assert_eq!(reactions[0].reaction, "\u{2764}");

        assert!(loaded.value[1].share.is_none());

        let photos = loaded.value[2].photos.as_ref().unwrap();
        assert_eq!(photos.len(), 1);
        assert_eq!(photos[0].file_name(), "ok.jpg");

        assert_eq!(loaded.value[3].timestamp_ms, 1_707_048_000_000);

        let fields: Vec<(usize, &str)> = loaded
            .warnings
            .iter()
            .map(|w| match w {
                Warning::MalformedField { index, field, .. } => (*index, field.as_str()),
                other => panic!("unexpected warning: {other}"),
            })
            .collect();
        assert_eq!(fields, vec![(0, "reactions[0]"), (1, "share"), (2, "photos[0]")]);
    }

    #[test]
    fn test_wrong_shapes_for_lists_and_text() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "m.json",
            r#"{"messages": [
                {"sender_name": 42, "content": ["x"], "timestamp_ms": 1,
                 "videos": {"uri": "v.mp4"}, "audio": [{"uri": "audio/a.m4a"}]}
            ]}"#,
        );

        let loaded = load_directory(tmp.path(), None).unwrap();
        assert_eq!(loaded.value.len(), 1);
        let message = &loaded.value[0];
        assert!(message.sender_name.is_none());
        assert!(message.content.is_none());
        assert!(message.videos.is_none());
        assert_eq!(message.audio_files.as_ref().map(Vec::len), Some(1));
        assert_eq!(loaded.warnings.len(), 3);
        assert!(loaded
            .warnings
            .iter()
            .all(|w| w.kind() == "malformed_field"));
    }

    #[test]
    fn test_fractional_or_non_object_records_are_dropped() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "m.json",
            r#"{"messages": [{"timestamp_ms": 1.5}, "hello", {"timestamp_ms": 2}]}"#,
        );

        let loaded = load_directory(tmp.path(), None).unwrap();
        assert_eq!(loaded.value.len(), 1);
        assert_eq!(loaded.value[0].timestamp_ms, 2);
        assert!(matches!(
            loaded.warnings[..],
            [
                Warning::MalformedRecord { index: 0, .. },
                Warning::MalformedRecord { index: 1, .. }
            ]
        ));
    }

    #[test]
    fn test_bom_is_accepted() {
        let tmp = tempfile::tempdir().unwrap();
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(br#"{"messages": [{"timestamp_ms": 1}]}"#);
        std::fs::write(tmp.path().join("bom.json"), bytes).unwrap();

        let loaded = load_directory(tmp.path(), None).unwrap();
        assert_eq!(loaded.value.len(), 1);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope");
        assert!(matches!(
            load_directory(&missing, None),
            Err(ChatError::DirectoryNotFound(_))
        ));
    }

    #[test]
    fn test_file_instead_of_directory_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "a.json", "{}");
        assert!(matches!(
            json_files(&tmp.path().join("a.json")),
            Err(ChatError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_json_directory_is_not_a_file() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("folder.json")).unwrap();
        let files = json_files(tmp.path()).unwrap();
        assert!(files.value.is_empty());
    }
}
