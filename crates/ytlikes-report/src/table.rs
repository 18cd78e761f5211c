//! Plain-text preview of the most liked comments for the terminal.

use std::fmt::Write as _;

use ytlikes_core::CommentRecord;

pub const DEFAULT_TOP_N: usize = 10;
/// Characters of comment text shown per row before truncation.
pub const DEFAULT_TEXT_WIDTH: usize = 75;

/// Renders the first `n` records as a fixed-width table.
///
/// Comment text is flattened to one line and cut to `width` characters, with
/// `...` appended when anything was cut.
#[must_use]
pub fn render_top_table(ranked: &[CommentRecord], n: usize, width: usize) -> String {
    let shown = &ranked[..n.min(ranked.len())];
    let rule = "=".repeat(60);
    let mut out = String::new();

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "TOP {} MOST LIKED COMMENTS", shown.len());
    let _ = writeln!(out, "{rule}");
    if shown.is_empty() {
        let _ = writeln!(out, "no comments to show");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<6}{:<8}{:<11}{:<22}COMMENT",
        "RANK", "LIKES", "STATUS", "PUBLISHED"
    );
    for (i, record) in shown.iter().enumerate() {
        let published = record
            .timestamp
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "\u{2014}".to_owned());
        let _ = writeln!(
            out,
            "{:<6}{:<8}{:<11}{:<22}{}",
            i + 1,
            record.likes(),
            record.fetch_status.to_string(),
            published,
            truncate(&record.comment_text, width)
        );
        let _ = writeln!(out, "{:<47}{}", "", record.video_url());
    }
    out
}

fn truncate(text: &str, width: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > width {
        format!("{}...", flat.chars().take(width).collect::<String>())
    } else {
        flat
    }
}
