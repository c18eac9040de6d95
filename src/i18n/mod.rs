//! Internationalization (i18n) module.
//!
//! Provides localized strings for the application UI and CLI output.
//! English is the default language; Spanish is available as an alternative.
//! The architecture supports adding more languages in the future.

use std::sync::OnceLock;

use chrono::{Locale, NaiveDate};

static CURRENT_LANG: OnceLock<Lang> = OnceLock::new();

/// Supported languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    /// English (default)
    En,
    /// Spanish
    Es,
}

impl Lang {
    /// Parse a language code string (e.g. "en", "es", "en_US", "es_ES").
    /// Returns `None` for unrecognized codes.
    pub fn from_code(code: &str) -> Option<Self> {
        let normalized = code.to_lowercase();
        let prefix = normalized.split(['_', '-', '.']).next().unwrap_or("");
        match prefix {
            "en" => Some(Self::En),
            "es" => Some(Self::Es),
            _ => None,
        }
    }

    /// Return the ISO 639-1 code for this language.
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
        }
    }
}

/// Initialize the global language. Call once at startup.
/// If already initialized, this is a no-op.
pub fn set_lang(lang: Lang) {
    let _ = CURRENT_LANG.set(lang);
}

/// Get the currently configured language (defaults to English).
pub fn lang() -> Lang {
    CURRENT_LANG.get().copied().unwrap_or(Lang::En)
}

/// Detect language from the `LANG` / `LC_MESSAGES` environment variables.
pub fn detect_system_lang() -> Lang {
    std::env::var("CHATSHELL_LANG")
        .ok()
        .and_then(|v| Lang::from_code(&v))
        .or_else(|| {
            std::env::var("LC_MESSAGES")
                .ok()
                .and_then(|v| Lang::from_code(&v))
        })
        .or_else(|| std::env::var("LANG").ok().and_then(|v| Lang::from_code(&v)))
        .unwrap_or(Lang::En)
}

/// Long date used for the day separators in the feed.
///
/// English: `Monday, February 5, 2024`.
/// Spanish: `lunes, 5 de febrero de 2024`.
pub fn format_date_label(date: NaiveDate, lang: Lang) -> String {
    match lang {
        Lang::En => date.format("%A, %B %-d, %Y").to_string(),
        Lang::Es => date
            .format_localized("%A, %-d de %B de %Y", Locale::es_ES)
            .to_string(),
    }
}

/// Macro for defining translatable message functions.
/// Each function returns a `&'static str` based on the current language.
macro_rules! msg {
    ($name:ident, $en:expr, $es:expr) => {
        /// Returns a localized string for the current language.
        pub fn $name() -> &'static str {
            match lang() {
                Lang::En => $en,
                Lang::Es => $es,
            }
        }
    };
}

// ── General ──────────────────────────────────────────────────────

msg!(app_name, "chatShell", "chatShell");
msg!(
    app_about,
    "chatShell \u{2014} Terminal viewer for exported chat archives. Browse, filter and page through JSON message logs and their photos, videos and voice notes.",
    "chatShell \u{2014} Visor de terminal para archivos de chat exportados. Navega, filtra y pagina registros JSON de mensajes con sus fotos, v\u{ed}deos y notas de voz."
);
msg!(
    app_long_about,
    "chatShell \u{2014} Terminal viewer for exported chat archives.\nPoint it at the folder holding message_1.json, message_2.json, ...\nand the photos/, videos/ and audio/ folders next to them.",
    "chatShell \u{2014} Visor de terminal para archivos de chat exportados.\nIndica la carpeta que contiene message_1.json, message_2.json, ...\ny las carpetas photos/, videos/ y audio/ junto a ellos."
);
msg!(
    app_after_help,
    "Copyright (c) 2026 David Carrero Fern\u{e1}ndez-Baillo \u{2014} MIT License",
    "Copyright (c) 2026 David Carrero Fern\u{e1}ndez-Baillo \u{2014} Licencia MIT"
);

// ── CLI help strings ─────────────────────────────────────────────

msg!(
    help_cmd_open,
    "Open an archive in the TUI (default if no subcommand given)",
    "Abrir un archivo en la TUI (por defecto si no se da subcomando)"
);
msg!(
    help_cmd_show,
    "Print one page of the conversation",
    "Imprimir una p\u{e1}gina de la conversaci\u{f3}n"
);
msg!(
    help_cmd_stats,
    "Show statistics about an archive",
    "Mostrar estad\u{ed}sticas de un archivo"
);
msg!(
    help_cmd_gallery,
    "List photos, videos or voice notes",
    "Listar fotos, v\u{ed}deos o notas de voz"
);
msg!(
    help_cmd_completions,
    "Generate shell completions",
    "Generar completions para tu shell"
);
msg!(
    help_cmd_manpage,
    "Generate a man page",
    "Generar p\u{e1}gina de manual"
);

// ── Loading / stats output ───────────────────────────────────────

msg!(msg_loading, "Loading", "Cargando");
msg!(msg_archive, "Archive", "Archivo");
msg!(msg_json_size, "JSON size", "Tama\u{f1}o JSON");
msg!(msg_message_count, "Messages", "Mensajes");
msg!(msg_with_text, "With text", "Con texto");
msg!(msg_date_range, "Date range", "Rango de fechas");
msg!(msg_photos, "Photos", "Fotos");
msg!(msg_videos, "Videos", "V\u{ed}deos");
msg!(msg_audio, "Voice notes", "Notas de voz");
msg!(msg_load_time, "Load time", "Tiempo de carga");
msg!(msg_top_senders, "Top senders", "Principales remitentes");
msg!(msg_warnings, "warning(s)", "aviso(s)");
msg!(msg_missing, "missing", "no encontrados");
msg!(msg_page, "Page", "P\u{e1}gina");
msg!(msg_of, "of", "de");
msg!(msg_results, "result(s)", "resultado(s)");
msg!(
    msg_no_results,
    "No messages match the current filters.",
    "Ning\u{fa}n mensaje coincide con los filtros."
);
msg!(
    msg_no_media,
    "No media of this kind in the archive.",
    "No hay archivos de este tipo."
);

// ── Errors ───────────────────────────────────────────────────────

msg!(
    err_dir_not_found,
    "Archive directory not found",
    "Carpeta del archivo no encontrada"
);
msg!(
    err_no_messages,
    "No messages found.",
    "No se encontraron mensajes."
);
msg!(
    err_no_archive_given,
    "No archive folder specified. Usage:\n\n  chatshell <folder>\n\nor set CHATSHELL_ARCHIVE, or 'archive.path' in the config file.\nRun 'chatshell --help' for more options.",
    "No se ha indicado carpeta de archivo. Uso:\n\n  chatshell <carpeta>\n\no define CHATSHELL_ARCHIVE, o 'archive.path' en el fichero de configuraci\u{f3}n.\nEjecuta 'chatshell --help' para ver todas las opciones."
);
msg!(
    err_unknown_media_kind,
    "Unknown media kind. Supported: photos, videos, audio",
    "Tipo de medio desconocido. Soportados: photos, videos, audio"
);
msg!(err_invalid_date, "Invalid date", "Fecha inv\u{e1}lida");

// ── TUI widget titles and labels ────────────────────────────────

msg!(tui_help_title, " Help ", " Ayuda ");
msg!(
    tui_help_description,
    "Terminal viewer for exported chat archives",
    "Visor de terminal para archivos de chat exportados"
);
msg!(tui_chat_title, " Conversation ", " Conversaci\u{f3}n ");
msg!(tui_photos_title, " Photos ", " Fotos ");
msg!(tui_videos_title, " Videos ", " V\u{ed}deos ");
msg!(tui_audio_title, " Voice notes ", " Notas de voz ");
msg!(tui_warnings_title, " Warnings ", " Avisos ");
msg!(tui_date_title, " Date range ", " Rango de fechas ");
msg!(tui_date_from, "From: ", "Desde: ");
msg!(tui_date_to, "To:   ", "Hasta: ");
msg!(
    tui_date_hint,
    "YYYY-MM-DD  Tab:Switch  Enter:Apply  Esc:Cancel",
    "AAAA-MM-DD  Tab:Cambiar  Enter:Aplicar  Esc:Cancelar"
);
msg!(
    tui_gallery_hint,
    "j/k:Navigate  Enter:Show path  Esc:Close",
    "j/k:Navegar  Enter:Ver ruta  Esc:Cerrar"
);
msg!(tui_no_warnings, "No warnings.", "Sin avisos.");
msg!(tui_messages, "messages", "mensajes");
msg!(tui_page, "page", "p\u{e1}gina");
msg!(tui_search, "search", "b\u{fa}squeda");
msg!(tui_goto_page, "Go to page", "Ir a la p\u{e1}gina");
msg!(tui_no_text, "(no text)", "(sin texto)");
msg!(tui_filters_reset, "Filters reset", "Filtros restablecidos");
msg!(tui_theme_changed, "Theme changed", "Tema cambiado");
msg!(tui_first_page, "Already on the first page", "Ya est\u{e1}s en la primera p\u{e1}gina");
msg!(tui_last_page, "Already on the last page", "Ya est\u{e1}s en la \u{fa}ltima p\u{e1}gina");

// ── TUI status bar hints ─────────────────────────────────────────

msg!(tui_hint_scroll, "Scroll", "Desplazar");
msg!(tui_hint_page, "Page", "P\u{e1}gina");
msg!(tui_hint_search, "Search", "Buscar");
msg!(tui_hint_dates, "Dates", "Fechas");
msg!(tui_hint_photos, "Photos", "Fotos");
msg!(tui_hint_videos, "Videos", "V\u{ed}deos");
msg!(tui_hint_audio, "Audio", "Audio");
msg!(tui_hint_warnings, "Warnings", "Avisos");
msg!(tui_hint_reset, "Reset", "Restablecer");
msg!(tui_hint_help, "Help", "Ayuda");
msg!(tui_hint_quit, "Quit", "Salir");
msg!(tui_hint_apply, "Apply", "Aplicar");
msg!(tui_hint_cancel, "Cancel", "Cancelar");

// ── TUI help popup ───────────────────────────────────────────────

msg!(tui_help_section_pages, "Pages", "P\u{e1}ginas");
msg!(tui_help_section_filters, "Filters", "Filtros");
msg!(tui_help_section_media, "Media", "Multimedia");
msg!(tui_help_section_general, "General", "General");
msg!(tui_help_next_page, "Next page", "P\u{e1}gina siguiente");
msg!(tui_help_prev_page, "Previous page", "P\u{e1}gina anterior");
msg!(tui_help_goto, "Jump to a page number", "Ir a un n\u{fa}mero de p\u{e1}gina");
msg!(tui_help_first_last, "First / last page", "Primera / \u{fa}ltima p\u{e1}gina");
msg!(tui_help_scroll, "Scroll the conversation", "Desplazar la conversaci\u{f3}n");
msg!(tui_help_keyword, "Search a whole word", "Buscar una palabra completa");
msg!(tui_help_dates, "Set the date range", "Elegir rango de fechas");
msg!(tui_help_reset, "Clear all filters", "Quitar todos los filtros");
msg!(tui_help_photos, "Photo gallery", "Galer\u{ed}a de fotos");
msg!(tui_help_videos, "Video gallery", "Galer\u{ed}a de v\u{ed}deos");
msg!(tui_help_audio, "Voice notes", "Notas de voz");
msg!(tui_help_warnings, "Load warnings", "Avisos de carga");
msg!(tui_help_theme, "Dark / light theme", "Tema oscuro / claro");
msg!(tui_help_help, "This help", "Esta ayuda");
msg!(tui_help_quit, "Quit", "Salir");
msg!(tui_help_close, "Press Esc or ? to close", "Pulsa Esc o ? para cerrar");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lang_from_code() {
        assert_eq!(Lang::from_code("en"), Some(Lang::En));
        assert_eq!(Lang::from_code("es"), Some(Lang::Es));
        assert_eq!(Lang::from_code("en_US"), Some(Lang::En));
        assert_eq!(Lang::from_code("es_CL.UTF-8"), Some(Lang::Es));
        assert_eq!(Lang::from_code("es-MX"), Some(Lang::Es));
        assert_eq!(Lang::from_code("fr"), None);
    }

    #[test]
    fn test_lang_code_roundtrip() {
        assert_eq!(Lang::En.code(), "en");
        assert_eq!(Lang::Es.code(), "es");
    }

    #[test]
    fn test_english_date_label() {
        let d = NaiveDate::from_ymd_opt(2024, 2, 5).unwrap();
        assert_eq!(format_date_label(d, Lang::En), "Monday, February 5, 2024");
    }

    #[test]
    fn test_spanish_date_label() {
        let d = NaiveDate::from_ymd_opt(2024, 2, 5).unwrap();
        let label = format_date_label(d, Lang::Es);
        assert!(label.contains("5 de"), "got {label}");
        assert!(label.contains("febrero"), "got {label}");
        assert!(label.ends_with("de 2024"), "got {label}");
    }

    #[test]
    fn test_messages_return_strings() {
        // Smoke test: all message functions return non-empty strings
        assert!(!app_name().is_empty());
        assert!(!app_about().is_empty());
        assert!(!msg_loading().is_empty());
        assert!(!err_no_messages().is_empty());
    }
}
