//! CLI entry point for `chatShell`.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use unicode_width::UnicodeWidthStr;

use chatshell::archive::stats::ArchiveStats;
use chatshell::archive::Archive;
use chatshell::config::{self, Config};
use chatshell::error::{ChatError, Loaded, Warning};
use chatshell::feed::{self, FeedItem, Side};
use chatshell::gallery::{self, GalleryItem};
use chatshell::i18n;
use chatshell::model::attachment::MediaKind;
use chatshell::search::{self, filter, page, Query};

/// Columns used by `chatshell show` to lay out the conversation.
const SHOW_WIDTH: usize = 78;
/// How many senders `chatshell stats` lists.
const TOP_SENDERS: usize = 10;

#[derive(Parser)]
#[command(name = "chatshell", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Archive folder to open
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Ignore the archive cache and reload every JSON file
    #[arg(short, long, global = true)]
    force: bool,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Language (en, es). Defaults to the config, then the system locale.
    #[arg(long, value_name = "LANG", global = true)]
    lang: Option<String>,

    /// Archive owner; their messages are shown on the right
    #[arg(long, value_name = "NAME", env = "CHATSHELL_OWNER", global = true)]
    owner: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open an archive in the TUI
    Open {
        #[arg(value_name = "DIR")]
        dir: Option<PathBuf>,
    },
    /// Print one page of the conversation
    Show {
        #[arg(value_name = "DIR")]
        dir: Option<PathBuf>,
        /// First day to include (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        from: Option<String>,
        /// Last day to include (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        to: Option<String>,
        /// Whole-word keyword, case-insensitive
        #[arg(short, long)]
        keyword: Option<String>,
        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: usize,
        /// Messages per page (defaults to display.page_size)
        #[arg(long, value_name = "N")]
        page_size: Option<usize>,
        #[arg(long)]
        json: bool,
    },
    /// Show statistics
    Stats {
        #[arg(value_name = "DIR")]
        dir: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// List media files
    Gallery {
        #[arg(value_name = "DIR")]
        dir: Option<PathBuf>,
        /// photos, videos or audio
        #[arg(short, long, default_value = "photos")]
        kind: String,
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

/// Options of `chatshell show`.
struct ShowOptions {
    from: Option<String>,
    to: Option<String>,
    keyword: Option<String>,
    page: usize,
    page_size: Option<usize>,
    json: bool,
}

/// Find `--lang` in the raw args, before clap processes --help.
fn lang_from_args() -> Option<i18n::Lang> {
    let args: Vec<String> = std::env::args().collect();
    for (i, arg) in args.iter().enumerate() {
        if arg == "--lang" {
            if let Some(lang) = args.get(i + 1).and_then(|code| i18n::Lang::from_code(code)) {
                return Some(lang);
            }
        }
        if let Some(lang) = arg.strip_prefix("--lang=").and_then(i18n::Lang::from_code) {
            return Some(lang);
        }
    }
    None
}

/// Build a localized clap Command using i18n strings.
fn build_localized_command() -> clap::Command {
    let mut cmd = Cli::command()
        .about(i18n::app_about())
        .long_about(i18n::app_long_about())
        .after_help(i18n::app_after_help());

    let names: Vec<String> = cmd
        .get_subcommands()
        .map(|sub| sub.get_name().to_string())
        .collect();
    for name in names {
        let about = match name.as_str() {
            "open" => i18n::help_cmd_open(),
            "show" => i18n::help_cmd_show(),
            "stats" => i18n::help_cmd_stats(),
            "gallery" => i18n::help_cmd_gallery(),
            "completions" => i18n::help_cmd_completions(),
            "manpage" => i18n::help_cmd_manpage(),
            _ => continue,
        };
        cmd = cmd.mut_subcommand(name, |sub| sub.about(about));
    }

    cmd
}

fn main() -> anyhow::Result<()> {
    let mut config = config::load_config();

    // Language must be known BEFORE clap parsing so --help is localized
    let lang = lang_from_args()
        .or_else(|| {
            config
                .general
                .language
                .as_deref()
                .and_then(i18n::Lang::from_code)
        })
        .unwrap_or_else(i18n::detect_system_lang);
    i18n::set_lang(lang);

    let matches = build_localized_command().get_matches();
    let cli = Cli::from_arg_matches(&matches)?;

    let log_level = match cli.verbose {
        0 => config.general.log_level.clone(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    setup_logging(&log_level, &config);

    if let Some(owner) = cli.owner {
        config.identity.owner = Some(owner);
    }
    config.validate()?;

    let force = cli.force;
    let verbose = cli.verbose > 0;

    let result = match cli.command {
        None => cmd_open(&config, cli.dir, force),
        Some(Commands::Open { dir }) => cmd_open(&config, dir.or(cli.dir), force),
        Some(Commands::Show {
            dir,
            from,
            to,
            keyword,
            page,
            page_size,
            json,
        }) => {
            let options = ShowOptions {
                from,
                to,
                keyword,
                page,
                page_size,
                json,
            };
            cmd_show(&config, dir.or(cli.dir), force, verbose, &options)
        }
        Some(Commands::Stats { dir, json }) => {
            cmd_stats(&config, dir.or(cli.dir), force, verbose, json)
        }
        Some(Commands::Gallery { dir, kind, json }) => {
            cmd_gallery(&config, dir.or(cli.dir), force, verbose, &kind, json)
        }
        Some(Commands::Completions { shell }) => cmd_completions(shell),
        Some(Commands::Manpage) => cmd_manpage(),
    };

    if let Err(e) = &result {
        if matches!(e.downcast_ref::<ChatError>(), Some(ChatError::EmptyArchive)) {
            eprintln!("{}", i18n::err_no_messages());
            std::process::exit(1);
        }
    }
    result
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let log_file = config::log_file_path(config);
    let log_dir = config::cache_dir(config);
    if std::fs::create_dir_all(&log_dir).is_ok() {
        let file_name = log_file
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "chatshell.log".into());
        let file_appender = tracing_appender::rolling::never(&log_dir, file_name);
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        // Fall back to stderr only
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "chatshell", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let man = clap_mangen::Man::new(Cli::command());
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}

/// Pick the archive folder: argument, then `$CHATSHELL_ARCHIVE`, then config.
fn resolve_archive_dir(arg: Option<PathBuf>, config: &Config) -> anyhow::Result<PathBuf> {
    let dir = arg
        .or_else(|| std::env::var_os("CHATSHELL_ARCHIVE").map(PathBuf::from))
        .or_else(|| config.archive.path.clone())
        .ok_or_else(|| anyhow::anyhow!("{}", i18n::err_no_archive_given()))?;
    if !dir.exists() {
        anyhow::bail!("{}: {}", i18n::err_dir_not_found(), dir.display());
    }
    Ok(dir)
}

/// Load an archive with a progress bar on stderr.
fn load_with_progress(
    config: &Config,
    dir: &Path,
    force: bool,
) -> anyhow::Result<(Loaded<Archive>, Duration)> {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} {} [{{bar:40.cyan/blue}}] {{pos}}/{{len}}",
                i18n::msg_loading()
            ))?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let loaded = Archive::open(
        config,
        dir,
        force,
        Some(&|current: u64, total: u64| {
            pb.set_length(total);
            pb.set_position(current);
        }),
    );
    pb.finish_and_clear();

    Ok((loaded?, start.elapsed()))
}

/// Summarize warnings on stderr; list them all when verbose.
fn report_warnings(warnings: &[Warning], verbose: bool) {
    if warnings.is_empty() {
        return;
    }
    eprintln!("  {} {}", warnings.len(), i18n::msg_warnings());
    if verbose {
        for warning in warnings {
            eprintln!("    - [{}] {warning}", warning.kind());
        }
    }
}

fn cmd_open(config: &Config, dir: Option<PathBuf>, force: bool) -> anyhow::Result<()> {
    let dir = resolve_archive_dir(dir, config)?;
    chatshell::tui::run_tui(config, &dir, force)
}

/// Print one page of the filtered conversation.
fn cmd_show(
    config: &Config,
    dir: Option<PathBuf>,
    force: bool,
    verbose: bool,
    options: &ShowOptions,
) -> anyhow::Result<()> {
    let dir = resolve_archive_dir(dir, config)?;
    let (loaded, _) = load_with_progress(config, &dir, force)?;
    let archive = &loaded.value;

    let (min, max) = archive.date_bounds();
    let start = options
        .from
        .as_deref()
        .map(search::parse_date)
        .transpose()?
        .unwrap_or(min);
    let end = options
        .to
        .as_deref()
        .map(search::parse_date)
        .transpose()?
        .unwrap_or(max);
    let mut query = Query::between(start, end);
    if let Some(keyword) = &options.keyword {
        query = query.with_keyword(keyword.as_str());
    }

    let positions = filter::filter(archive.messages(), &query);
    let page_size = options.page_size.unwrap_or(config.display.page_size).max(1);
    let (slice, total_pages) = page::paginate(&positions, page_size, options.page);
    let messages = filter::select(archive.messages(), slice);
    let identity = config.identity.identity();
    let items = feed::build_feed(&messages, &identity, i18n::lang());

    if options.json {
        let output = serde_json::json!({
            "archive": archive.path().to_string_lossy(),
            "query": {
                "start": query.start,
                "end": query.end,
                "keyword": query.active_keyword(),
            },
            "page": options.page,
            "page_size": page_size,
            "total_pages": total_pages,
            "result_count": positions.len(),
            "items": items,
            "warnings": loaded.warnings,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    report_warnings(&loaded.warnings, verbose);
    println!(
        "  {} {} {} {}  ({} {})",
        i18n::msg_page(),
        options.page,
        i18n::msg_of(),
        total_pages,
        positions.len(),
        i18n::msg_results()
    );
    if items.is_empty() {
        println!();
        println!("  {}", i18n::msg_no_results());
        return Ok(());
    }
    print_feed(&items, &config.display.time_format);
    Ok(())
}

/// Lay out the feed as plain text: owner on the right, everyone else on the left.
fn print_feed(items: &[FeedItem], time_format: &str) {
    let bubble_width = SHOW_WIDTH * 7 / 10;

    for item in items {
        match item {
            FeedItem::DateLabel { label, .. } => {
                println!();
                let text = format!("\u{2500}\u{2500} {label} \u{2500}\u{2500}");
                let pad = SHOW_WIDTH.saturating_sub(text.width()) / 2;
                println!("{}{text}", " ".repeat(pad));
                println!();
            }
            FeedItem::Bubble {
                side,
                sender,
                content,
                time,
                attachments,
                reactions,
                link,
            } => {
                let mut rows = vec![format!("{sender}  {}", time.format(time_format))];
                if !content.trim().is_empty() {
                    rows.extend(
                        feed::wrap_text(content, bubble_width)
                            .into_iter()
                            .map(|l| format!("  {l}")),
                    );
                }
                for (count, name) in [
                    (attachments.photos, i18n::msg_photos()),
                    (attachments.videos, i18n::msg_videos()),
                    (attachments.audio, i18n::msg_audio()),
                ] {
                    if count > 0 {
                        rows.push(format!("  [{count} {name}]"));
                    }
                }
                if let Some(link) = link {
                    rows.push(format!("  {link}"));
                }
                if !reactions.is_empty() {
                    rows.push(format!("  {}", reactions.join("  ")));
                }

                for row in rows {
                    match side {
                        Side::Left => println!("  {row}"),
                        Side::Right => {
                            let pad = SHOW_WIDTH.saturating_sub(row.width());
                            println!("{}{row}", " ".repeat(pad));
                        }
                    }
                }
                println!();
            }
        }
    }
}

/// Show statistics for an archive.
fn cmd_stats(
    config: &Config,
    dir: Option<PathBuf>,
    force: bool,
    verbose: bool,
    json: bool,
) -> anyhow::Result<()> {
    let dir = resolve_archive_dir(dir, config)?;
    let (loaded, elapsed) = load_with_progress(config, &dir, force)?;
    let archive = &loaded.value;
    let stats = archive.stats(&config.identity.identity(), TOP_SENDERS);

    if json {
        print_stats_json(archive, &stats, &loaded.warnings, elapsed)?;
    } else {
        report_warnings(&loaded.warnings, verbose);
        print_stats_table(archive, &stats, elapsed);
    }
    Ok(())
}

fn print_stats_table(archive: &Archive, stats: &ArchiveStats, elapsed: Duration) {
    use humansize::{format_size, BINARY};

    println!();
    println!("  {:<20} {}", i18n::msg_archive(), archive.path().display());
    println!(
        "  {:<20} {}",
        i18n::msg_json_size(),
        format_size(archive.json_size(), BINARY)
    );
    println!("  {:<20} {}", i18n::msg_message_count(), stats.message_count);

    if let Some((min, max)) = stats.date_range {
        println!("  {:<20} {min} \u{2014} {max}", i18n::msg_date_range());
    }

    println!(
        "  {:<20} {} ({:.1}%)",
        i18n::msg_with_text(),
        stats.with_text,
        if stats.message_count == 0 {
            0.0
        } else {
            stats.with_text as f64 / stats.message_count as f64 * 100.0
        }
    );
    println!("  {:<20} {}", i18n::msg_photos(), stats.photos);
    println!("  {:<20} {}", i18n::msg_videos(), stats.videos);
    println!("  {:<20} {}", i18n::msg_audio(), stats.audio);
    println!("  {:<20} {:.2?}", i18n::msg_load_time(), elapsed);

    if !stats.top_senders.is_empty() {
        println!();
        println!("  {}:", i18n::msg_top_senders());
        for (sender, count) in &stats.top_senders {
            println!("    {count:>6}  {sender}");
        }
    }
    println!();
}

/// Print statistics as JSON.
fn print_stats_json(
    archive: &Archive,
    stats: &ArchiveStats,
    warnings: &[Warning],
    elapsed: Duration,
) -> anyhow::Result<()> {
    let date_range = stats.date_range.map(|(min, max)| {
        serde_json::json!({
            "oldest": min,
            "newest": max,
        })
    });

    let top_json: Vec<serde_json::Value> = stats
        .top_senders
        .iter()
        .map(|(sender, count)| {
            serde_json::json!({
                "sender": sender,
                "count": count,
            })
        })
        .collect();

    let output = serde_json::json!({
        "archive": archive.path().to_string_lossy(),
        "json_size": archive.json_size(),
        "message_count": stats.message_count,
        "date_range": date_range,
        "with_text": stats.with_text,
        "photos": stats.photos,
        "videos": stats.videos,
        "audio": stats.audio,
        "load_time_ms": elapsed.as_millis(),
        "top_senders": top_json,
        "warnings": warnings,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// List the media files of one kind that exist on disk.
fn cmd_gallery(
    config: &Config,
    dir: Option<PathBuf>,
    force: bool,
    verbose: bool,
    kind: &str,
    json: bool,
) -> anyhow::Result<()> {
    let Some(kind) = MediaKind::from_name(kind) else {
        anyhow::bail!("{}: {kind}", i18n::err_unknown_media_kind());
    };
    let dir = resolve_archive_dir(dir, config)?;
    let (loaded, _) = load_with_progress(config, &dir, force)?;
    let archive = &loaded.value;

    let gallery = gallery::collect_gallery(archive.messages(), kind, archive.media_dirs());
    let identity = config.identity.identity();

    if json {
        let items: Vec<serde_json::Value> = gallery
            .value
            .iter()
            .map(|item| {
                serde_json::json!({
                    "path": item.path.to_string_lossy(),
                    "file_name": item.file_name,
                    "sender": identity.canonical(&item.sender),
                    "datetime": item.datetime,
                    "size_bytes": item.size_bytes,
                })
            })
            .collect();
        let output = serde_json::json!({
            "kind": kind.name(),
            "items": items,
            "missing": gallery.warnings,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    report_warnings(&loaded.warnings, verbose);
    print_gallery_table(&gallery.value, &identity);
    if !gallery.warnings.is_empty() {
        println!();
        println!("  {} {}", gallery.warnings.len(), i18n::msg_missing());
        if verbose {
            for warning in &gallery.warnings {
                println!("    - {warning}");
            }
        }
    }
    Ok(())
}

fn print_gallery_table(items: &[GalleryItem], identity: &chatshell::model::identity::Identity) {
    if items.is_empty() {
        println!("  {}", i18n::msg_no_media());
        return;
    }
    for item in items {
        println!(
            "  {}  {:<20}  {:>10}  {}",
            item.datetime.format("%Y-%m-%d %H:%M"),
            identity.canonical(&item.sender),
            humansize::format_size(item.size_bytes, humansize::BINARY),
            item.path.display()
        );
    }
}
