//! `chatShell` — a terminal viewer for exported chat archives.
//!
//! This crate provides the core library for loading JSON message exports,
//! repairing their text, ordering and filtering messages, paging through
//! them and resolving their photo, video and audio attachments.

pub mod archive;
pub mod config;
pub mod error;
pub mod feed;
pub mod gallery;
pub mod i18n;
pub mod model;
pub mod search;
pub mod text;
pub mod tui;
