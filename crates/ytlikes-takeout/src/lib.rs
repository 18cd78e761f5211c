//! Reader for the Google Takeout YouTube comment export.
//!
//! Locates `comments.csv`, turns each row into a pending
//! [`ytlikes_core::CommentRecord`], and reports how many rows were skipped or
//! folded into a later duplicate.

pub mod discover;
pub mod error;
pub mod normalize;
pub mod parse;

pub use discover::{discover_export, EXPORT_FILE_NAME};
pub use error::TakeoutError;
pub use normalize::{clean_comment_text, extract_video_id, parse_timestamp};
pub use parse::{parse_export, parse_export_reader, ParsedExport};
