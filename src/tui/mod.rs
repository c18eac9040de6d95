//! Terminal UI — main entry point and event loop.

pub mod app;
pub mod event;
pub mod theme;
pub mod ui;
pub mod widgets;

use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::event::{poll as ct_poll, read as ct_read, Event, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use indicatif::{ProgressBar, ProgressStyle};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use self::app::App;
use crate::archive::Archive;
use crate::config::Config;
use crate::i18n;

/// Run the TUI application. Blocks until the user quits.
pub fn run_tui(config: &Config, archive_dir: &Path, force: bool) -> anyhow::Result<()> {
    // Show progress bar BEFORE entering alternate screen so the user sees it
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} {} [{{bar:40.cyan/blue}}] {{pos}}/{{len}} files ({{eta}})",
                i18n::msg_loading()
            ))?
            .progress_chars("#>-"),
    );

    let loaded = Archive::open(config, archive_dir, force, Some(&|current: u64, total: u64| {
        pb.set_length(total);
        pb.set_position(current);
    }));
    pb.finish_and_clear();
    let loaded = loaded?;

    let app = App::new(loaded.value, loaded.warnings, config);

    // Setup terminal (alternate screen)
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the event loop
    let result = run_event_loop(&mut terminal, app);

    // Restore terminal (always, even on error)
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Main event loop: render → poll → handle → repeat.
fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
) -> anyhow::Result<()> {
    let tick_rate = Duration::from_millis(100);

    loop {
        terminal.draw(|frame| {
            ui::render(frame, &mut app);
        })?;

        if ct_poll(tick_rate)? {
            // Windows reports both press and release
            if let Event::Key(key) = ct_read()? {
                if key.kind == KeyEventKind::Press {
                    event::handle_key_event(&mut app, key)?;
                }
            }
        }

        app.tick();

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
