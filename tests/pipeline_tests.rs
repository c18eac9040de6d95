//! Integration tests for the load → repair → index → filter → page pipeline,
//! galleries and the feed model.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use assert_fs::prelude::*;
use chrono::NaiveDate;
use predicates::prelude::*;

use chatshell::archive::{loader, Archive};
use chatshell::config::Config;
use chatshell::error::{ChatError, Warning};
use chatshell::feed::{self, FeedItem, Side};
use chatshell::gallery;
use chatshell::i18n::Lang;
use chatshell::model::attachment::MediaKind;
use chatshell::model::message::IndexedMessage;
use chatshell::search::{filter, page, Query};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// UTC dates, a private cache folder and Felipe's known spellings.
fn test_config(cache: &Path) -> Config {
    let mut config = Config::default();
    config.general.cache_dir = Some(cache.to_path_buf());
    config.general.timezone = "utc".to_string();
    config.identity.owner = Some("Felipe".to_string());
    let mut aliases = BTreeMap::new();
    aliases.insert(
        "Felipe".to_string(),
        vec![
            "Felipe Canales H.".to_string(),
            "Felipe Canales H.\u{f0}".to_string(),
        ],
    );
    config.identity.aliases = aliases;
    config
}

fn open_fixture() -> (Archive, Vec<Warning>, tempfile::TempDir) {
    let cache = tempfile::tempdir().unwrap();
    let loaded = Archive::open(&test_config(cache.path()), &fixture("inbox"), false, None).unwrap();
    (loaded.value, loaded.warnings, cache)
}

fn contents<'a>(messages: &[&'a IndexedMessage]) -> Vec<&'a str> {
    messages
        .iter()
        .copied()
        .map(|m| m.content.as_deref().unwrap_or(""))
        .collect()
}

// ─── Loading ────────────────────────────────────────────────────────

#[test]
fn test_fixture_archive_loads_every_file() {
    let (archive, warnings, _cache) = open_fixture();
    assert_eq!(archive.messages().len(), 6);

    let mut kinds: Vec<&str> = warnings.iter().map(Warning::kind).collect();
    kinds.sort_unstable();
    assert_eq!(kinds, vec!["malformed_record", "missing_timestamp"]);
    assert_eq!(archive.date_bounds(), (day(2024, 2, 4), day(2024, 2, 6)));
}

#[test]
fn test_messages_are_chronological() {
    let (archive, _, _cache) = open_fixture();
    let stamps: Vec<i64> = archive.messages().iter().map(|m| m.timestamp_ms).collect();
    let mut sorted = stamps.clone();
    sorted.sort_unstable();
    assert_eq!(stamps, sorted);
    assert_eq!(archive.messages()[0].content.as_deref(), Some("Hola!"));
}

#[test]
fn test_double_encoded_text_is_repaired() {
    let (archive, _, _cache) = open_fixture();
    let last = archive.messages().last().unwrap();
    let text = last.content.as_deref().unwrap();
    assert!(predicate::str::contains("Mañana").eval(text));
    assert!(predicate::str::contains("Ã").not().eval(text));
}

#[test]
fn test_merge_is_complete() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("message_1.json")
        .write_str(
            r#"{"messages": [
                {"sender_name": "A", "content": "a1", "timestamp_ms": 1},
                {"sender_name": "A", "content": "a2", "timestamp_ms": 2}
            ]}"#,
        )
        .unwrap();
    dir.child("message_2.json")
        .write_str(
            r#"{"messages": [
                {"sender_name": "B", "content": "b1", "timestamp_ms": 3},
                {"sender_name": "B", "content": "b2", "timestamp_ms": 4},
                {"sender_name": "B", "content": "b3", "timestamp_ms": 5}
            ]}"#,
        )
        .unwrap();
    dir.child("message_3.json")
        .write_str(r#"{"messages": []}"#)
        .unwrap();

    let loaded = loader::load_directory(dir.path(), None).unwrap();
    assert_eq!(loaded.value.len(), 5);
    assert!(loaded.warnings.is_empty());
}

#[test]
fn test_one_corrupt_file_is_isolated() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("message_1.json")
        .write_str(r#"{"messages": [{"sender_name": "A", "content": "ok", "timestamp_ms": 1}]}"#)
        .unwrap();
    dir.child("message_2.json")
        .write_str(r#"{"messages": [{"sender_name": "B", "content": "ok", "timestamp_ms": 2}]}"#)
        .unwrap();
    dir.child("message_3.json")
        .write_str(r#"{"messages": [{"sender_name": "C", "#)
        .unwrap();

    let loaded = loader::load_directory(dir.path(), None).unwrap();
    assert_eq!(loaded.value.len(), 2);
    assert_eq!(loaded.warnings.len(), 1);
    match &loaded.warnings[0] {
        Warning::Parse { path, .. } => {
            assert!(predicate::str::ends_with("message_3.json").eval(&path.to_string_lossy()));
        }
        other => panic!("expected a parse warning, got {other:?}"),
    }
}

#[test]
fn test_empty_archive_halts() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("message_1.json")
        .write_str(r#"{"messages": []}"#)
        .unwrap();
    let cache = tempfile::tempdir().unwrap();

    let result = Archive::open(&test_config(cache.path()), dir.path(), false, None);
    assert!(matches!(result, Err(ChatError::EmptyArchive)));
}

#[test]
fn test_missing_directory_is_an_error() {
    let cache = tempfile::tempdir().unwrap();
    let missing = cache.path().join("no_such_inbox");
    let result = Archive::open(&test_config(cache.path()), &missing, false, None);
    assert!(matches!(result, Err(ChatError::DirectoryNotFound(_))));
}

#[test]
fn test_cache_follows_file_changes() {
    let dir = assert_fs::TempDir::new().unwrap();
    let file = dir.child("message_1.json");
    file.write_str(r#"{"messages": [{"sender_name": "A", "content": "one", "timestamp_ms": 1}]}"#)
        .unwrap();
    let cache = tempfile::tempdir().unwrap();
    let config = test_config(cache.path());

    let first = Archive::open(&config, dir.path(), false, None).unwrap();
    assert_eq!(first.value.messages().len(), 1);

    file.write_str(
        r#"{"messages": [
            {"sender_name": "A", "content": "one", "timestamp_ms": 1},
            {"sender_name": "A", "content": "two", "timestamp_ms": 2}
        ]}"#,
    )
    .unwrap();
    let second = Archive::open(&config, dir.path(), false, None).unwrap();
    assert_eq!(second.value.messages().len(), 2);

    let forced = Archive::open(&config, dir.path(), true, None).unwrap();
    assert_eq!(forced.value.messages(), second.value.messages());
}

// ─── Filtering and paging ───────────────────────────────────────────

#[test]
fn test_date_filter_includes_both_bounds() {
    let (archive, _, _cache) = open_fixture();
    let messages = archive.messages();

    let one_day = filter::filter(messages, &Query::between(day(2024, 2, 5), day(2024, 2, 5)));
    assert_eq!(
        contents(&filter::select(messages, &one_day)),
        vec!["I love catnip"]
    );

    let two_days = filter::filter(messages, &Query::between(day(2024, 2, 4), day(2024, 2, 5)));
    assert_eq!(two_days.len(), 3);

    let inverted = filter::filter(messages, &Query::between(day(2024, 2, 6), day(2024, 2, 4)));
    assert!(inverted.is_empty());
}

#[test]
fn test_keyword_matches_whole_words_only() {
    let (archive, _, _cache) = open_fixture();
    let messages = archive.messages();
    let (start, end) = archive.date_bounds();

    for keyword in ["cat", "CAT", " Cat "] {
        let query = Query::between(start, end).with_keyword(keyword);
        let hits = filter::select(messages, &filter::filter(messages, &query));
        assert_eq!(contents(&hits), vec!["I have a cat"], "keyword {keyword:?}");
    }

    let query = Query::between(start, end).with_keyword("mañana");
    assert_eq!(filter::filter(messages, &query).len(), 1);
}

#[test]
fn test_pages_over_filtered_results() {
    let (archive, _, _cache) = open_fixture();
    let (start, end) = archive.date_bounds();
    let positions = filter::filter(archive.messages(), &Query::between(start, end));

    let (first, total) = page::paginate(&positions, 4, 1);
    assert_eq!(total, 2);
    assert_eq!(first.len(), 4);
    let (second, _) = page::paginate(&positions, 4, 2);
    assert_eq!(second.len(), 2);
    let (third, _) = page::paginate(&positions, 4, 3);
    assert!(third.is_empty());
}

// ─── Feed ───────────────────────────────────────────────────────────

#[test]
fn test_feed_places_owner_on_the_right() {
    let cache = tempfile::tempdir().unwrap();
    let config = test_config(cache.path());
    let archive = Archive::open(&config, &fixture("inbox"), false, None)
        .unwrap()
        .value;
    let page: Vec<&IndexedMessage> = archive.messages().iter().collect();
    let items = feed::build_feed(&page, &config.identity.identity(), Lang::En);

    let labels: Vec<&str> = items
        .iter()
        .filter_map(|item| match item {
            FeedItem::DateLabel { label, .. } => Some(label.as_str()),
            FeedItem::Bubble { .. } => None,
        })
        .collect();
    assert_eq!(
        labels,
        vec![
            "Sunday, February 4, 2024",
            "Monday, February 5, 2024",
            "Tuesday, February 6, 2024",
        ]
    );

    for item in &items {
        if let FeedItem::Bubble { side, sender, .. } = item {
            match sender.as_str() {
                "Felipe" => assert_eq!(*side, Side::Right),
                "Camila" => assert_eq!(*side, Side::Left),
                other => panic!("unexpected sender {other}"),
            }
        }
    }
}

#[test]
fn test_reaction_actor_is_canonical() {
    let (archive, _, _cache) = open_fixture();
    let cache = tempfile::tempdir().unwrap();
    let identity = test_config(cache.path()).identity.identity();
    let catnip: Vec<&IndexedMessage> = archive
        .messages()
        .iter()
        .filter(|m| m.content.as_deref() == Some("I love catnip"))
        .collect();
    let items = feed::build_feed(&catnip, &identity, Lang::En);
    match &items[1] {
        FeedItem::Bubble { reactions, .. } => assert_eq!(reactions, &vec!["\u{2764} Felipe".to_string()]),
        other => panic!("expected bubble, got {other:?}"),
    }
}

// ─── Galleries and stats ────────────────────────────────────────────

#[test]
fn test_photo_gallery_skips_missing_files() {
    let (archive, _, _cache) = open_fixture();
    let photos = gallery::collect_gallery(archive.messages(), MediaKind::Photos, archive.media_dirs());

    assert_eq!(photos.value.len(), 1);
    assert_eq!(photos.value[0].file_name, "beach.jpg");
    assert_eq!(photos.value[0].sender, "Camila");
    assert!(photos.value[0].size_bytes > 0);

    assert_eq!(photos.warnings.len(), 1);
    match &photos.warnings[0] {
        Warning::MissingMedia { path } => {
            assert!(predicate::str::ends_with("lost.jpg").eval(&path.to_string_lossy()));
        }
        other => panic!("expected missing media, got {other:?}"),
    }
}

#[test]
fn test_audio_and_video_galleries() {
    let (archive, _, _cache) = open_fixture();
    let audio = gallery::collect_gallery(archive.messages(), MediaKind::Audio, archive.media_dirs());
    assert_eq!(audio.value.len(), 1);
    assert_eq!(audio.value[0].file_name, "voice_1.mp4");
    assert!(audio.warnings.is_empty());

    let videos = gallery::collect_gallery(archive.messages(), MediaKind::Videos, archive.media_dirs());
    assert!(videos.value.is_empty());
    assert!(videos.warnings.is_empty());
}

#[test]
fn test_stats_group_sender_aliases() {
    let cache = tempfile::tempdir().unwrap();
    let config = test_config(cache.path());
    let archive = Archive::open(&config, &fixture("inbox"), false, None)
        .unwrap()
        .value;
    let stats = archive.stats(&config.identity.identity(), 10);

    assert_eq!(stats.message_count, 6);
    assert_eq!(stats.with_text, 5);
    assert_eq!(stats.photos, 2);
    assert_eq!(stats.audio, 1);
    assert_eq!(stats.videos, 0);
    assert_eq!(
        stats.top_senders,
        vec![("Camila".to_string(), 3), ("Felipe".to_string(), 3)]
    );
    assert!(archive.json_size() > 0);
}
