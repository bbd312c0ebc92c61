//! Data models for API entities and tool inputs.
//!
//! All API models use `#[serde(default)]` for optional fields and
//! `#[serde(rename_all = "camelCase")]` to match API naming.

mod author;
mod enums;
mod inputs;
mod paper;

pub use author::AuthorRef;
pub use enums::{ExportFormat, ResponseFormat};
pub use inputs::*;
pub use paper::{Journal, Paper, PaperRef, S2Field, SearchResult};
