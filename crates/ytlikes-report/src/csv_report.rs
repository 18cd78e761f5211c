//! Spreadsheet-friendly export of the ranked records.

use std::io;
use std::path::Path;

use chrono::SecondsFormat;
use serde::Serialize;
use ytlikes_core::CommentRecord;

use crate::error::ReportError;

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Rank")]
    rank: usize,
    #[serde(rename = "Like Count")]
    like_count: u64,
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "Comment ID")]
    comment_id: &'a str,
    #[serde(rename = "Video ID")]
    video_id: &'a str,
    #[serde(rename = "Video Title")]
    video_title: &'a str,
    #[serde(rename = "Video URL")]
    video_url: String,
    /// RFC 3339, empty when the export had no usable timestamp.
    #[serde(rename = "Published At")]
    published_at: String,
    #[serde(rename = "Comment Text")]
    comment_text: &'a str,
}

impl<'a> CsvRow<'a> {
    fn new(rank: usize, record: &'a CommentRecord) -> Self {
        Self {
            rank,
            like_count: record.likes(),
            status: record.fetch_status.to_string(),
            comment_id: &record.comment_id,
            video_id: &record.video_id,
            video_title: record.title_or_fallback(),
            video_url: record.video_url(),
            published_at: record
                .timestamp
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
                .unwrap_or_default(),
            comment_text: &record.comment_text,
        }
    }
}

/// Serializes `ranked` as CSV, one row per record in the given order, ranks
/// starting at 1.
///
/// # Errors
///
/// Returns [`csv::Error`] if a row cannot be written.
pub fn write_csv_to<W: io::Write>(writer: W, ranked: &[CommentRecord]) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for (i, record) in ranked.iter().enumerate() {
        wtr.serialize(CsvRow::new(i + 1, record))?;
    }
    if ranked.is_empty() {
        // `serialize` only emits headers alongside the first row.
        wtr.write_record([
            "Rank",
            "Like Count",
            "Status",
            "Comment ID",
            "Video ID",
            "Video Title",
            "Video URL",
            "Published At",
            "Comment Text",
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes the CSV report to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`ReportError::Io`] if the file cannot be created and
/// [`ReportError::Csv`] if a row cannot be written.
pub fn write_csv(path: &Path, ranked: &[CommentRecord]) -> Result<(), ReportError> {
    let file = std::fs::File::create(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv_to(io::BufWriter::new(file), ranked).map_err(|source| ReportError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), rows = ranked.len(), "wrote CSV report");
    Ok(())
}
