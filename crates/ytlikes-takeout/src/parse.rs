//! Row-level parsing of the comment export into [`CommentRecord`]s.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use ytlikes_core::{CommentRecord, RunSummary};

use crate::error::TakeoutError;
use crate::normalize::{clean_comment_text, extract_video_id, parse_timestamp};

const COMMENT_ID_HEADERS: &[&str] = &["comment id"];
const VIDEO_HEADERS: &[&str] = &["video id", "video url", "video"];
const TEXT_HEADERS: &[&str] = &["comment text", "text"];
const TIMESTAMP_HEADERS: &[&str] = &[
    "comment create timestamp",
    "published at",
    "timestamp",
    "created at",
];

/// Output of the parse stage.
#[derive(Debug, Clone, Default)]
pub struct ParsedExport {
    /// One pending record per distinct comment id, in source order.
    pub records: Vec<CommentRecord>,
    /// Non-empty data rows read, including skipped and duplicate rows.
    pub total_rows: usize,
    /// Rows dropped because a required field was missing or unusable.
    pub skipped: usize,
    /// Rows that replaced an earlier row with the same comment id.
    pub duplicates: usize,
}

impl ParsedExport {
    /// Summary seeded with the parse counters; fetch counters start at zero.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            total_rows: self.total_rows,
            parsed: self.records.len(),
            skipped: self.skipped,
            duplicates: self.duplicates,
            ..RunSummary::default()
        }
    }
}

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Copy)]
struct Columns {
    comment_id: usize,
    video: usize,
    text: Option<usize>,
    timestamp: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self, TakeoutError> {
        let normalized: Vec<String> = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_ascii_lowercase())
            .collect();
        let find = |candidates: &[&str]| {
            candidates
                .iter()
                .find_map(|c| normalized.iter().position(|h| h == c))
        };

        Ok(Self {
            comment_id: find(COMMENT_ID_HEADERS).ok_or(TakeoutError::MissingColumn("Comment ID"))?,
            video: find(VIDEO_HEADERS).ok_or(TakeoutError::MissingColumn("Video ID"))?,
            text: find(TEXT_HEADERS),
            timestamp: find(TIMESTAMP_HEADERS),
        })
    }
}

/// Reads and parses the export at `path`.
///
/// # Errors
///
/// Returns [`TakeoutError::Io`] if the file cannot be opened, and the errors
/// of [`parse_export_reader`] otherwise.
pub fn parse_export(path: &Path) -> Result<ParsedExport, TakeoutError> {
    let file = std::fs::File::open(path).map_err(|source| TakeoutError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "reading export");
    parse_export_reader(file)
}

/// Parses comment rows from any CSV source with a header row.
///
/// Rows missing a comment id or a recognizable video reference, and rows the
/// CSV reader cannot decode, are skipped and counted. Blank rows are not
/// counted at all. When a comment id repeats, the later row's data replaces
/// the earlier record, which keeps its original position.
///
/// # Errors
///
/// Returns [`TakeoutError::Csv`] if the header row cannot be read, or
/// [`TakeoutError::MissingColumn`] if no comment id or video column exists.
pub fn parse_export_reader<R: Read>(reader: R) -> Result<ParsedExport, TakeoutError> {
    let mut csv_reader = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let columns = Columns::from_headers(csv_reader.headers()?)?;

    let mut out = ParsedExport::default();
    let mut index_by_id: HashMap<String, usize> = HashMap::new();

    for (row_idx, result) in csv_reader.records().enumerate() {
        // Header is line 1.
        let line = row_idx + 2;
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                out.total_rows += 1;
                out.skipped += 1;
                tracing::warn!(line, error = %e, "skipping unreadable row");
                continue;
            }
        };
        if row.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        out.total_rows += 1;

        let Some(record) = record_from_row(&row, columns, line) else {
            out.skipped += 1;
            continue;
        };

        if let Some(&existing) = index_by_id.get(&record.comment_id) {
            tracing::debug!(line, comment_id = %record.comment_id, "duplicate comment id; later row wins");
            out.records[existing] = record;
            out.duplicates += 1;
        } else {
            index_by_id.insert(record.comment_id.clone(), out.records.len());
            out.records.push(record);
        }
    }

    tracing::info!(
        rows = out.total_rows,
        records = out.records.len(),
        skipped = out.skipped,
        duplicates = out.duplicates,
        "parsed export"
    );
    Ok(out)
}

fn record_from_row(row: &StringRecord, columns: Columns, line: usize) -> Option<CommentRecord> {
    let field = |idx: usize| row.get(idx).map(str::trim).unwrap_or_default();

    let comment_id = field(columns.comment_id);
    if comment_id.is_empty() {
        tracing::warn!(line, "skipping row without a comment id");
        return None;
    }

    let video_ref = field(columns.video);
    let Some(video_id) = extract_video_id(video_ref) else {
        tracing::warn!(line, comment_id, video_ref, "skipping row with unrecognized video reference");
        return None;
    };

    let comment_text = columns
        .text
        .map(|idx| clean_comment_text(row.get(idx).unwrap_or_default()))
        .unwrap_or_default();

    let timestamp = columns.timestamp.and_then(|idx| {
        let raw = field(idx);
        let parsed = parse_timestamp(raw);
        if parsed.is_none() && !raw.is_empty() {
            tracing::debug!(line, raw, "unparseable timestamp; leaving it empty");
        }
        parsed
    });

    Some(CommentRecord::new(comment_id, video_id, comment_text, timestamp))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(csv: &str) -> ParsedExport {
        parse_export_reader(csv.as_bytes()).expect("export should parse")
    }

    const HEADER: &str =
        "Comment ID,Channel ID,Comment Create Timestamp,Price,Parent Comment ID,Post ID,Video ID,Comment Text\n";

    #[test]
    fn parses_takeout_rows_in_source_order() {
        let csv = format!(
            "{HEADER}\
             A,UC1,2023-01-01T10:00:00+00:00,,,,dQw4w9WgXcQ,\"{{\"\"text\"\":\"\"first\"\"}}\"\n\
             B,UC1,2023-01-02T10:00:00+00:00,,,,9bZkp7q19f0,plain\n"
        );
        let parsed = parse(&csv);
        assert_eq!(parsed.total_rows, 2);
        assert_eq!(parsed.skipped, 0);
        let ids: Vec<&str> = parsed.records.iter().map(|r| r.comment_id.as_str()).collect();
        assert_eq!(ids, ["A", "B"]);
        assert_eq!(parsed.records[0].comment_text, "first");
        assert_eq!(parsed.records[0].video_id, "dQw4w9WgXcQ");
        assert!(parsed.records[0].timestamp.is_some());
        assert!(parsed.records.iter().all(CommentRecord::is_pending));
    }

    #[test]
    fn rows_missing_required_fields_are_skipped_and_counted() {
        let csv = format!(
            "{HEADER}\
             ,UC1,,,,,dQw4w9WgXcQ,no id\n\
             B,UC1,,,,,,no video\n\
             C,UC1,,,,,https://vimeo.com/1234,wrong host\n\
             D,UC1,,,,,dQw4w9WgXcQ,kept\n"
        );
        let parsed = parse(&csv);
        assert_eq!(parsed.total_rows, 4);
        assert_eq!(parsed.skipped, 3);
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].comment_id, "D");
        assert_eq!(
            parsed.records.len(),
            parsed.total_rows - parsed.skipped - parsed.duplicates
        );
    }

    #[test]
    fn malformed_timestamp_keeps_row() {
        let csv = format!("{HEADER}A,UC1,sometime,,,,dQw4w9WgXcQ,hi\n");
        let parsed = parse(&csv);
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].timestamp, None);
        assert_eq!(parsed.skipped, 0);
    }

    #[test]
    fn duplicate_ids_keep_later_row_data() {
        let csv = format!(
            "{HEADER}\
             A,UC1,,,,,dQw4w9WgXcQ,old text\n\
             B,UC1,,,,,dQw4w9WgXcQ,other\n\
             A,UC1,,,,,9bZkp7q19f0,new text\n"
        );
        let parsed = parse(&csv);
        assert_eq!(parsed.total_rows, 3);
        assert_eq!(parsed.duplicates, 1);
        assert_eq!(parsed.records.len(), 2);
        let a = parsed.records.iter().find(|r| r.comment_id == "A").unwrap();
        assert_eq!(a.comment_text, "new text");
        assert_eq!(a.video_id, "9bZkp7q19f0");
    }

    #[test]
    fn blank_rows_are_not_counted() {
        let csv = format!("{HEADER},,,,,,,\nA,UC1,,,,,dQw4w9WgXcQ,hi\n");
        let parsed = parse(&csv);
        assert_eq!(parsed.total_rows, 1);
        assert_eq!(parsed.skipped, 0);
    }

    #[test]
    fn short_rows_are_skipped_not_fatal() {
        let csv = format!("{HEADER}A,UC1\nB,UC1,,,,,dQw4w9WgXcQ,ok\n");
        let parsed = parse(&csv);
        assert_eq!(parsed.total_rows, 2);
        assert_eq!(parsed.skipped, 1);
        assert_eq!(parsed.records.len(), 1);
    }

    #[test]
    fn accepts_video_url_column_and_bom_header() {
        let csv = "\u{feff}Comment ID,Video URL,Text,Published At\n\
                   A,https://youtu.be/dQw4w9WgXcQ,hello,2022-05-05 10:00:00 UTC\n";
        let parsed = parse(csv);
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].video_id, "dQw4w9WgXcQ");
        assert_eq!(parsed.records[0].comment_text, "hello");
        assert!(parsed.records[0].timestamp.is_some());
    }

    #[test]
    fn missing_comment_id_column_is_fatal() {
        let err = parse_export_reader("Video ID,Comment Text\nx,y\n".as_bytes()).unwrap_err();
        assert!(matches!(err, TakeoutError::MissingColumn("Comment ID")));
    }

    #[test]
    fn missing_video_column_is_fatal() {
        let err = parse_export_reader("Comment ID,Comment Text\nx,y\n".as_bytes()).unwrap_err();
        assert!(matches!(err, TakeoutError::MissingColumn("Video ID")));
    }

    #[test]
    fn summary_carries_parse_counters() {
        let csv = format!(
            "{HEADER}A,UC1,,,,,dQw4w9WgXcQ,x\nA,UC1,,,,,dQw4w9WgXcQ,y\n,UC1,,,,,dQw4w9WgXcQ,z\n"
        );
        let summary = parse(&csv).summary();
        assert_eq!(summary.total_rows, 3);
        assert_eq!(summary.parsed, 1);
        assert_eq!(summary.duplicates, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.fetch_ok, 0);
    }
}
