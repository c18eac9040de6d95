//! Core data model types for chat messages, attachments, and identities.

pub mod attachment;
pub mod identity;
pub mod message;
