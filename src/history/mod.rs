//! History reconciliation
//!
//! Pure builders that turn the backend's flat, unordered list of
//! question/answer records into per-session transcripts and a
//! most-recent-first session catalog. Nothing here holds state; the same
//! input always produces the same output.

pub mod catalog;
pub mod render;
pub mod transcript;
pub mod types;

pub use catalog::{build_catalog, find_session, sort_catalog};
pub use render::render;
pub use transcript::{build_transcript, derive_title, truncate_title};
pub use types::{HistoryRecord, Message, Sender, SessionSummary, Transcript, DEFAULT_TITLE};
