//! Bridge workflows composed from the provider clients

pub mod export;
pub mod translation;

pub use export::{export_mappings, ExportError, ExportSummary};
pub use translation::{translate_playlist, BracketTitleCleaner, TitleCleaner};
