//! Global application state for the TUI (the "Model" in Elm architecture).

use std::num::NonZeroUsize;
use std::time::Instant;

use chrono::NaiveDate;
use lru::LruCache;

use crate::archive::Archive;
use crate::config::Config;
use crate::error::{ChatError, Warning};
use crate::gallery::{self, GalleryItem};
use crate::i18n;
use crate::model::attachment::MediaKind;
use crate::model::identity::Identity;
use crate::model::message::IndexedMessage;
use crate::search::filter;
use crate::search::keyword::KeywordMatcher;
use crate::search::page;
use crate::search::{self, Query};
use crate::tui::theme::{Theme, ThemeName};

/// How many distinct queries keep their results around.
const QUERY_CACHE_SIZE: usize = 32;

/// Which field of the date popup is being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Start,
    End,
}

/// State of the date range popup.
#[derive(Debug, Clone)]
pub struct DateInput {
    pub start: String,
    pub end: String,
    pub field: DateField,
    pub error: Option<String>,
}

impl DateInput {
    /// The text of the field being edited.
    pub fn active_mut(&mut self) -> &mut String {
        match self.field {
            DateField::Start => &mut self.start,
            DateField::End => &mut self.end,
        }
    }
}

/// An open media gallery.
#[derive(Debug, Clone)]
pub struct GalleryView {
    pub kind: MediaKind,
    pub items: Vec<GalleryItem>,
    /// Attachments whose file is not in the media folder.
    pub missing: usize,
    pub selected: usize,
}

/// Complete TUI state.
pub struct App {
    // ── Data ──────────────────────────────────
    /// The loaded archive. Never modified after startup.
    pub archive: Archive,
    /// Alias table used to place bubbles.
    pub identity: Identity,
    /// Load and gallery warnings collected so far.
    pub warnings: Vec<Warning>,

    // ── Query ─────────────────────────────────
    /// Active date range and keyword.
    pub query: Query,
    /// Positions into `archive.messages()` matching `query`.
    pub filtered: Vec<usize>,
    /// Matcher for the active keyword, used for highlighting.
    pub matcher: Option<KeywordMatcher>,
    query_cache: LruCache<Query, Vec<usize>>,

    // ── Paging ────────────────────────────────
    /// Current page, 1-based.
    pub page: usize,
    pub page_size: usize,
    /// Scroll offset (in lines) inside the current page.
    pub feed_scroll: usize,
    /// Cached viewport height for the feed (set during render).
    pub feed_viewport_height: usize,
    /// `strftime` format for bubble times.
    pub time_format: String,

    // ── UI state ──────────────────────────────
    pub theme_name: ThemeName,
    pub show_help: bool,
    pub show_warnings: bool,
    pub warnings_scroll: usize,
    pub gallery: Option<GalleryView>,
    pub date_input: Option<DateInput>,
    /// Is the keyword bar active (accepting input)?
    pub search_active: bool,
    pub search_input: String,
    /// Page number being typed after `:`.
    pub page_input: Option<String>,

    // ── Lifecycle ─────────────────────────────
    pub should_quit: bool,
    /// Transient status message and the instant it was set.
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create the application state for a loaded archive.
    pub fn new(archive: Archive, warnings: Vec<Warning>, config: &Config) -> Self {
        let (start, end) = archive.date_bounds();
        let query = Query::between(start, end);
        let identity = config.identity.identity();
        let cache_size = NonZeroUsize::new(QUERY_CACHE_SIZE).unwrap_or(NonZeroUsize::MIN);

        let mut app = Self {
            archive,
            identity,
            warnings,
            query: query.clone(),
            filtered: Vec::new(),
            matcher: None,
            query_cache: LruCache::new(cache_size),
            page: 1,
            page_size: config.display.page_size.max(1),
            feed_scroll: 0,
            feed_viewport_height: 20,
            time_format: config.display.time_format.clone(),
            theme_name: ThemeName::from_config(&config.display.theme),
            show_help: false,
            show_warnings: false,
            warnings_scroll: 0,
            gallery: None,
            date_input: None,
            search_active: false,
            search_input: String::new(),
            page_input: None,
            should_quit: false,
            status_message: None,
        };
        app.apply_query(query);
        app
    }

    /// Palette for the active theme.
    pub fn theme(&self) -> Theme {
        Theme::named(self.theme_name)
    }

    /// Number of pages in the current result.
    pub fn total_pages(&self) -> usize {
        page::total_pages(self.filtered.len(), self.page_size)
    }

    /// Messages shown on the current page, oldest first.
    pub fn page_messages(&self) -> Vec<&IndexedMessage> {
        let (positions, _) = page::paginate(&self.filtered, self.page_size, self.page);
        filter::select(self.archive.messages(), positions)
    }

    /// Replace the active query and go back to the first page.
    pub fn apply_query(&mut self, query: Query) {
        self.filtered = match self.query_cache.get(&query) {
            Some(hit) => hit.clone(),
            None => {
                let positions = filter::filter(self.archive.messages(), &query);
                self.query_cache.put(query.clone(), positions.clone());
                positions
            }
        };
        self.matcher = query.active_keyword().and_then(KeywordMatcher::new);
        tracing::debug!(
            start = %query.start,
            end = %query.end,
            keyword = ?query.active_keyword(),
            results = self.filtered.len(),
            "Query applied"
        );
        self.query = query;
        self.page = 1;
        self.feed_scroll = 0;
    }

    /// Filter by a whole-word keyword; a blank keyword clears it.
    pub fn set_keyword(&mut self, keyword: &str) {
        let query = Query::between(self.query.start, self.query.end).with_keyword(keyword);
        self.apply_query(query);
        let count = self.filtered.len();
        self.set_status(&format!("{count} {}", i18n::msg_results()));
    }

    /// Restrict to `start..=end`, keeping the keyword.
    pub fn set_date_range(&mut self, start: NaiveDate, end: NaiveDate) {
        let mut query = Query::between(start, end);
        query.keyword = self.query.keyword.clone();
        self.apply_query(query);
        let count = self.filtered.len();
        self.set_status(&format!("{count} {}", i18n::msg_results()));
    }

    /// Back to the full archive range with no keyword.
    pub fn reset_filters(&mut self) {
        let (start, end) = self.archive.date_bounds();
        self.apply_query(Query::between(start, end));
        self.search_input.clear();
        self.set_status(i18n::tui_filters_reset());
    }

    /// Jump to `page`, clamped into range.
    pub fn go_to_page(&mut self, target: usize) {
        self.page = page::clamp_page(target, self.total_pages());
        self.feed_scroll = 0;
    }

    pub fn next_page(&mut self) {
        if self.page >= self.total_pages() {
            self.set_status(i18n::tui_last_page());
            return;
        }
        self.go_to_page(self.page + 1);
    }

    pub fn prev_page(&mut self) {
        if self.page <= 1 {
            self.set_status(i18n::tui_first_page());
            return;
        }
        self.go_to_page(self.page - 1);
    }

    pub fn first_page(&mut self) {
        self.go_to_page(1);
    }

    pub fn last_page(&mut self) {
        self.go_to_page(self.total_pages());
    }

    /// Jump to the page typed in the page prompt and close it.
    /// Out-of-range numbers are clamped; empty input does nothing.
    pub fn submit_page_input(&mut self) {
        let Some(input) = self.page_input.take() else {
            return;
        };
        if let Ok(target) = input.trim().parse::<usize>() {
            self.go_to_page(target);
        }
    }

    /// Open the date popup pre-filled with the active range.
    pub fn open_date_input(&mut self) {
        self.date_input = Some(DateInput {
            start: self.query.start.format("%Y-%m-%d").to_string(),
            end: self.query.end.format("%Y-%m-%d").to_string(),
            field: DateField::Start,
            error: None,
        });
    }

    /// Parse the date popup and apply it. Keeps the popup open on bad input.
    pub fn submit_date_input(&mut self) {
        let Some(input) = self.date_input.as_mut() else {
            return;
        };
        let parsed = search::parse_date(&input.start)
            .and_then(|start| search::parse_date(&input.end).map(|end| (start, end)));
        match parsed {
            Ok((start, end)) => {
                self.date_input = None;
                self.set_date_range(start, end);
            }
            Err(ChatError::InvalidDate(text)) => {
                input.error = Some(format!("{}: {text}", i18n::err_invalid_date()));
            }
            Err(e) => input.error = Some(e.to_string()),
        }
    }

    /// Open the gallery for `kind` over the whole archive.
    pub fn open_gallery(&mut self, kind: MediaKind) {
        let loaded = gallery::collect_gallery(
            self.archive.messages(),
            kind,
            self.archive.media_dirs(),
        );
        let missing = loaded.warnings.len();
        self.record_warnings(loaded.warnings);
        if loaded.value.is_empty() && missing == 0 {
            self.set_status(i18n::msg_no_media());
        }
        self.gallery = Some(GalleryView {
            kind,
            items: loaded.value,
            missing,
            selected: 0,
        });
    }

    /// Add warnings that are not already listed.
    fn record_warnings(&mut self, new: Vec<Warning>) {
        for warning in new {
            if !self.warnings.contains(&warning) {
                self.warnings.push(warning);
            }
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme_name = self.theme_name.toggled();
        self.set_status(i18n::tui_theme_changed());
    }

    /// Set a transient status message that auto-clears after a few seconds.
    pub fn set_status(&mut self, msg: &str) {
        self.status_message = Some((msg.to_string(), Instant::now()));
    }

    /// Called every tick: clears expired status messages.
    pub fn tick(&mut self) {
        if let Some((_, when)) = &self.status_message {
            if when.elapsed().as_secs() >= 5 {
                self.status_message = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::archive::indexer::Zone;
    use crate::gallery::MediaDirs;
    use crate::model::attachment::AttachmentRef;
    use crate::model::message::ChatMessage;

    const DAY: i64 = 86_400_000;
    /// 2024-02-05T12:00:00Z
    const START: i64 = 1_707_134_400_000;

    fn app_with(messages: Vec<ChatMessage>, media_root: &Path) -> App {
        let archive = Archive::from_messages(
            media_root,
            messages,
            Zone::Utc,
            MediaDirs::under(media_root),
        )
        .unwrap();
        let mut config = Config::default();
        config.display.page_size = 10;
        App::new(archive, Vec::new(), &config)
    }

    fn numbered(count: usize) -> Vec<ChatMessage> {
        (0..count)
            .map(|i| ChatMessage::text("Ana", &format!("message {i}"), START + i as i64 * 1000))
            .collect()
    }

    #[test]
    fn test_paging_through_results() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app_with(numbered(25), tmp.path());
        assert_eq!(app.total_pages(), 3);
        assert_eq!(app.page_messages().len(), 10);

        app.next_page();
        app.next_page();
        assert_eq!(app.page, 3);
        assert_eq!(app.page_messages().len(), 5);

        app.next_page();
        assert_eq!(app.page, 3);
        assert!(app.status_message.is_some());

        app.first_page();
        assert_eq!(app.page, 1);
        app.prev_page();
        assert_eq!(app.page, 1);
        app.last_page();
        assert_eq!(app.page, 3);
    }

    #[test]
    fn test_page_prompt_jumps_and_clamps() {
        use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

        use crate::tui::event::handle_key_event;

        let press = |app: &mut App, code: KeyCode| {
            handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE)).unwrap();
        };
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app_with(numbered(25), tmp.path());

        press(&mut app, KeyCode::Char(':'));
        assert_eq!(app.page_input.as_deref(), Some(""));
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.page_input.as_deref(), Some("2"));
        press(&mut app, KeyCode::Enter);
        assert!(app.page_input.is_none());
        assert_eq!(app.page, 2);

        press(&mut app, KeyCode::Char(':'));
        press(&mut app, KeyCode::Char('9'));
        press(&mut app, KeyCode::Char('9'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.page, 3);

        press(&mut app, KeyCode::Char(':'));
        press(&mut app, KeyCode::Char('0'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.page, 1);

        press(&mut app, KeyCode::Char(':'));
        press(&mut app, KeyCode::Char('3'));
        press(&mut app, KeyCode::Esc);
        assert!(app.page_input.is_none());
        assert_eq!(app.page, 1);

        // Empty input leaves the page alone
        app.go_to_page(2);
        press(&mut app, KeyCode::Char(':'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.page, 2);
    }

    #[test]
    fn test_keyword_resets_to_first_page() {
        let tmp = tempfile::tempdir().unwrap();
        let mut messages = numbered(25);
        messages.push(ChatMessage::text("Ana", "I have a cat", START + 100_000));
        messages.push(ChatMessage::text("Ana", "I love catnip", START + 200_000));
        let mut app = app_with(messages, tmp.path());
        app.last_page();

        app.set_keyword("CAT");
        assert_eq!(app.page, 1);
        assert_eq!(app.filtered.len(), 1);
        assert_eq!(
            app.page_messages()[0].content.as_deref(),
            Some("I have a cat")
        );
        assert!(app.matcher.is_some());

        app.set_keyword("   ");
        assert_eq!(app.filtered.len(), 27);
        assert!(app.matcher.is_none());
    }

    #[test]
    fn test_date_popup_applies_and_rejects() {
        let tmp = tempfile::tempdir().unwrap();
        let messages = vec![
            ChatMessage::text("Ana", "day one", START),
            ChatMessage::text("Ana", "day two", START + DAY),
            ChatMessage::text("Ana", "day three", START + 2 * DAY),
        ];
        let mut app = app_with(messages, tmp.path());

        app.open_date_input();
        let input = app.date_input.as_mut().unwrap();
        assert_eq!(input.start, "2024-02-05");
        assert_eq!(input.end, "2024-02-07");
        input.end = "2024-02-06".to_string();
        app.submit_date_input();
        assert!(app.date_input.is_none());
        assert_eq!(app.filtered.len(), 2);

        app.open_date_input();
        app.date_input.as_mut().unwrap().start = "yesterday".to_string();
        app.submit_date_input();
        let input = app.date_input.as_ref().unwrap();
        assert!(input.error.is_some());
        assert_eq!(app.filtered.len(), 2);

        app.date_input = None;
        app.reset_filters();
        assert_eq!(app.filtered.len(), 3);
    }

    #[test]
    fn test_repeated_query_hits_cache() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app_with(numbered(5), tmp.path());
        app.set_keyword("message");
        let first = app.filtered.clone();
        app.reset_filters();
        app.set_keyword("message");
        assert_eq!(app.filtered, first);
        assert_eq!(app.query_cache.len(), 2);
    }

    #[test]
    fn test_gallery_records_missing_media_once() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("photos")).unwrap();
        std::fs::write(tmp.path().join("photos/here.jpg"), b"jpeg").unwrap();

        let mut message = ChatMessage::text("Ana", "", START);
        message.photos = Some(vec![
            AttachmentRef {
                uri: "your_instagram_activity/messages/photos/here.jpg".to_string(),
            },
            AttachmentRef {
                uri: "your_instagram_activity/messages/photos/gone.jpg".to_string(),
            },
        ]);
        let mut app = app_with(vec![message], tmp.path());

        app.open_gallery(MediaKind::Photos);
        let view = app.gallery.as_ref().unwrap();
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].file_name, "here.jpg");
        assert_eq!(view.missing, 1);
        assert_eq!(app.warnings.len(), 1);

        app.open_gallery(MediaKind::Photos);
        assert_eq!(app.warnings.len(), 1);
    }

    #[test]
    fn test_toggle_theme() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app_with(numbered(1), tmp.path());
        assert_eq!(app.theme_name, ThemeName::Dark);
        app.toggle_theme();
        assert_eq!(app.theme_name, ThemeName::Light);
    }
}
