//! Keyboard and input event handling.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, DateField};
use crate::model::attachment::MediaKind;

/// Lines moved by PageUp / PageDown inside a popup list.
const POPUP_PAGE: usize = 10;

/// Process a key event and update the application state.
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> anyhow::Result<()> {
    // Ctrl+C always quits, whatever is open
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return Ok(());
    }

    // ── Input modes (capture all keys) ────────────────────
    if app.search_active {
        handle_search_input(app, key);
        return Ok(());
    }
    if app.date_input.is_some() {
        handle_date_input(app, key);
        return Ok(());
    }
    if app.page_input.is_some() {
        handle_page_input(app, key);
        return Ok(());
    }

    // ── Popups ────────────────────────────────────────────
    if app.show_help {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return Ok(());
    }
    if app.gallery.is_some() {
        handle_gallery_keys(app, key);
        return Ok(());
    }
    if app.show_warnings {
        handle_warnings_keys(app, key);
        return Ok(());
    }

    handle_feed_keys(app, key);
    Ok(())
}

/// Keys for the main conversation view.
fn handle_feed_keys(app: &mut App, key: KeyEvent) {
    match key.code {
        // ── Pages ────────────────────────────────────────────
        KeyCode::Char('n') | KeyCode::Right | KeyCode::Char(' ') => app.next_page(),
        KeyCode::Char('p') | KeyCode::Left => app.prev_page(),
        KeyCode::Char('g') | KeyCode::Home => app.first_page(),
        KeyCode::Char('G') | KeyCode::End => app.last_page(),
        KeyCode::Char(':') => app.page_input = Some(String::new()),

        // ── Scrolling inside the page ────────────────────────
        KeyCode::Char('j') | KeyCode::Down => app.feed_scroll += 1,
        KeyCode::Char('k') | KeyCode::Up => {
            app.feed_scroll = app.feed_scroll.saturating_sub(1);
        }
        KeyCode::PageDown => app.feed_scroll += app.feed_viewport_height.max(1),
        KeyCode::PageUp => {
            app.feed_scroll = app
                .feed_scroll
                .saturating_sub(app.feed_viewport_height.max(1));
        }

        // ── Filters ──────────────────────────────────────────
        KeyCode::Char('/') => {
            app.search_input = app.query.keyword.clone().unwrap_or_default();
            app.search_active = true;
        }
        KeyCode::Char('d') => app.open_date_input(),
        KeyCode::Char('r') => app.reset_filters(),

        // ── Media and popups ─────────────────────────────────
        KeyCode::Char('f') => app.open_gallery(MediaKind::Photos),
        KeyCode::Char('v') => app.open_gallery(MediaKind::Videos),
        KeyCode::Char('a') => app.open_gallery(MediaKind::Audio),
        KeyCode::Char('w') => {
            app.warnings_scroll = 0;
            app.show_warnings = true;
        }
        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Char('q') => app.should_quit = true,
        _ => {}
    }
}

/// Keyword bar: edit, apply with Enter, cancel with Esc.
fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            app.search_active = false;
            let keyword = std::mem::take(&mut app.search_input);
            app.set_keyword(&keyword);
            app.search_input = keyword;
        }
        KeyCode::Esc => {
            app.search_active = false;
            app.search_input.clear();
        }
        KeyCode::Backspace => {
            app.search_input.pop();
        }
        KeyCode::Char(c) => app.search_input.push(c),
        _ => {}
    }
}

/// Page prompt: digits only, Enter jumps, Esc cancels.
fn handle_page_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_page_input(),
        KeyCode::Esc => app.page_input = None,
        KeyCode::Backspace => {
            if let Some(input) = app.page_input.as_mut() {
                input.pop();
            }
        }
        KeyCode::Char(c) if c.is_ascii_digit() => {
            if let Some(input) = app.page_input.as_mut() {
                input.push(c);
            }
        }
        _ => {}
    }
}

/// Date popup: two text fields, Tab switches between them.
fn handle_date_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_date_input(),
        KeyCode::Esc => app.date_input = None,
        _ => {
            let Some(input) = app.date_input.as_mut() else {
                return;
            };
            match key.code {
                KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                    input.field = match input.field {
                        DateField::Start => DateField::End,
                        DateField::End => DateField::Start,
                    };
                }
                KeyCode::Backspace => {
                    input.active_mut().pop();
                    input.error = None;
                }
                KeyCode::Char(c) if c.is_ascii_digit() || c == '-' || c == '/' => {
                    input.active_mut().push(c);
                    input.error = None;
                }
                _ => {}
            }
        }
    }
}

fn handle_gallery_keys(app: &mut App, key: KeyEvent) {
    let Some(view) = app.gallery.as_mut() else {
        return;
    };
    let last = view.items.len().saturating_sub(1);
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => view.selected = (view.selected + 1).min(last),
        KeyCode::Char('k') | KeyCode::Up => view.selected = view.selected.saturating_sub(1),
        KeyCode::PageDown => view.selected = (view.selected + POPUP_PAGE).min(last),
        KeyCode::PageUp => view.selected = view.selected.saturating_sub(POPUP_PAGE),
        KeyCode::Char('g') | KeyCode::Home => view.selected = 0,
        KeyCode::Char('G') | KeyCode::End => view.selected = last,
        KeyCode::Enter => {
            if let Some(item) = view.items.get(view.selected) {
                let path = item.path.display().to_string();
                app.set_status(&path);
            }
        }
        KeyCode::Esc | KeyCode::Char('q') => app.gallery = None,
        KeyCode::Char('f') => app.open_gallery(MediaKind::Photos),
        KeyCode::Char('v') => app.open_gallery(MediaKind::Videos),
        KeyCode::Char('a') => app.open_gallery(MediaKind::Audio),
        _ => {}
    }
}

fn handle_warnings_keys(app: &mut App, key: KeyEvent) {
    let last = app.warnings.len().saturating_sub(1);
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            app.warnings_scroll = (app.warnings_scroll + 1).min(last);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.warnings_scroll = app.warnings_scroll.saturating_sub(1);
        }
        KeyCode::PageDown => app.warnings_scroll = (app.warnings_scroll + POPUP_PAGE).min(last),
        KeyCode::PageUp => app.warnings_scroll = app.warnings_scroll.saturating_sub(POPUP_PAGE),
        KeyCode::Esc | KeyCode::Char('w') | KeyCode::Char('q') => app.show_warnings = false,
        _ => {}
    }
}
