//! Standalone HTML page of the ranked records.

use std::fmt::Write as _;
use std::path::Path;

use ytlikes_core::{CommentRecord, RunSummary};

use crate::error::ReportError;

const BOOTSTRAP_CSS: &str =
    "https://cdn.jsdelivr.net/npm/bootstrap@5.2.3/dist/css/bootstrap.min.css";

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn html_attr_escape(s: &str) -> String {
    html_escape(s).replace('"', "&quot;").replace('\'', "&#39;")
}

/// Renders the full report page. Every piece of exported or fetched text is
/// escaped.
#[must_use]
pub fn render_html(ranked: &[CommentRecord], summary: &RunSummary) -> String {
    let mut rows = String::new();
    for (i, record) in ranked.iter().enumerate() {
        let published = record
            .timestamp
            .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_default();
        // Writing to a String cannot fail.
        let _ = write!(
            rows,
            r#"
          <tr>
            <td>{rank}</td>
            <td>{likes}</td>
            <td>{status}</td>
            <td>{text}</td>
            <td>{title}</td>
            <td><a href="{url}" target="_blank" rel="noopener">Watch Video</a></td>
            <td>{published}</td>
          </tr>"#,
            rank = i + 1,
            likes = record.likes(),
            status = record.fetch_status,
            text = html_escape(&record.comment_text),
            title = html_escape(record.title_or_fallback()),
            url = html_attr_escape(&record.video_url()),
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <title>YouTube Comment Analysis</title>
    <link rel="stylesheet" href="{BOOTSTRAP_CSS}">
  </head>
  <body class="container mt-5">
    <h1>My Top YouTube Comments</h1>
    <p>Sorted by Likes</p>
    <p class="text-muted">{summary}</p>
    <div class="table-responsive">
      <table class="table table-striped table-hover">
        <thead>
          <tr>
            <th>Rank</th>
            <th>Like Count</th>
            <th>Status</th>
            <th>Comment</th>
            <th>Video Title</th>
            <th>Video URL</th>
            <th>Published At</th>
          </tr>
        </thead>
        <tbody>{rows}
        </tbody>
      </table>
    </div>
  </body>
</html>
"#,
        summary = html_escape(&summary.to_string()),
    )
}

/// Writes the HTML report to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`ReportError::Io`] if the file cannot be written.
pub fn write_html(
    path: &Path,
    ranked: &[CommentRecord],
    summary: &RunSummary,
) -> Result<(), ReportError> {
    std::fs::write(path, render_html(ranked, summary)).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), rows = ranked.len(), "wrote HTML report");
    Ok(())
}
