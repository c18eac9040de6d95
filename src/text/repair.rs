//! Repair of double-encoded message text.
//!
//! Some exporters write UTF-8 text as if every byte were a Latin-1
//! character, so `"canción"` arrives as `"canciÃ³n"`. Re-encoding the
//! string with the single-byte code page and decoding the bytes as UTF-8
//! restores the original. Text that was never mangled either fails that
//! round trip (and is kept as-is) or is plain ASCII (and is unchanged).

use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use crate::error::Warning;
use crate::model::message::ChatMessage;

/// Which single-byte code page the exporter used by mistake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepairMode {
    /// ISO-8859-1: every char up to U+00FF maps to the same byte.
    #[default]
    Latin1,
    /// Windows-1252 (differs from Latin-1 in 0x80..=0x9F).
    Windows1252,
    /// Leave text untouched.
    Off,
}

impl RepairMode {
    /// Stable lowercase name, as written in the config file.
    pub fn name(self) -> &'static str {
        match self {
            Self::Latin1 => "latin1",
            Self::Windows1252 => "windows-1252",
            Self::Off => "off",
        }
    }
}

impl FromStr for RepairMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "latin1" | "latin-1" | "iso-8859-1" | "iso8859-1" => Ok(Self::Latin1),
            "windows-1252" | "cp1252" | "windows1252" => Ok(Self::Windows1252),
            "off" | "none" | "false" => Ok(Self::Off),
            other => Err(format!("unknown text repair mode '{other}'")),
        }
    }
}

/// Why a string could not be repaired.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepairError {
    /// A character has no single-byte representation in Latin-1.
    #[error("character {0:?} is outside Latin-1")]
    Unmappable(char),

    /// Some character has no representation in the code page.
    #[error("text contains characters outside {0}")]
    OutsideCodePage(&'static str),

    /// The re-encoded bytes are not valid UTF-8.
    #[error("reinterpreted bytes are not valid UTF-8: {0}")]
    InvalidUtf8(String),
}

/// Re-encode `text` with the code page of `mode` and decode it as UTF-8.
pub fn repair(text: &str, mode: RepairMode) -> Result<String, RepairError> {
    if mode == RepairMode::Off || text.is_ascii() {
        return Ok(text.to_string());
    }

    let bytes = match mode {
        RepairMode::Latin1 => encode_latin1(text)?,
        RepairMode::Windows1252 => {
            let (bytes, _, had_unmappable) = encoding_rs::WINDOWS_1252.encode(text);
            if had_unmappable {
                return Err(RepairError::OutsideCodePage(encoding_rs::WINDOWS_1252.name()));
            }
            bytes.into_owned()
        }
        RepairMode::Off => unreachable!("handled above"),
    };

    String::from_utf8(bytes).map_err(|e| RepairError::InvalidUtf8(e.utf8_error().to_string()))
}

/// Map every char to its Latin-1 byte, failing on the first char above U+00FF.
fn encode_latin1(text: &str) -> Result<Vec<u8>, RepairError> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).map_err(|_| RepairError::Unmappable(c)))
        .collect()
}

/// Repair the `content` of every message in place.
///
/// Failures keep the original text and are returned as warnings.
pub fn normalize_messages(messages: &mut [ChatMessage], mode: RepairMode) -> Vec<Warning> {
    if mode == RepairMode::Off {
        return Vec::new();
    }

    let mut warnings = Vec::new();
    for message in messages.iter_mut() {
        let Some(content) = message.content.as_mut() else {
            continue;
        };
        match repair(content, mode) {
            Ok(fixed) => *content = fixed,
            Err(e) => {
                debug!(
                    timestamp_ms = message.timestamp_ms,
                    error = %e,
                    "Keeping message text as-is"
                );
                warnings.push(Warning::EncodingRepair {
                    timestamp_ms: message.timestamp_ms,
                    reason: e.to_string(),
                });
            }
        }
    }
    warnings
}
