//! Field-level normalization for Takeout rows: comment text, video
//! references, and timestamps.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use url::Url;

static VIDEO_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("valid video id regex"));

/// Path prefixes on `youtube.com` whose next segment is the video id.
const ID_PATH_PREFIXES: &[&str] = &["shorts", "embed", "live", "v"];

/// Flattens Takeout's rich-text comment form into plain text.
///
/// Takeout writes comment bodies as a comma-separated run of JSON objects,
/// e.g. `{"text":"Great "},{"text":"video"}`. Runs with a `text` field are
/// concatenated in order; other runs are ignored. Input that is not in that
/// form is returned trimmed and otherwise unchanged.
#[must_use]
pub fn clean_comment_text(raw: &str) -> String {
    let trimmed = raw.trim();
    if !trimmed.starts_with('{') {
        return trimmed.to_owned();
    }

    let wrapped = format!("[{trimmed}]");
    match serde_json::from_str::<Vec<serde_json::Value>>(&wrapped) {
        Ok(runs) => runs
            .iter()
            .filter_map(|run| run.get("text").and_then(serde_json::Value::as_str))
            .collect::<String>(),
        Err(e) => {
            tracing::debug!(error = %e, "comment text is not in rich-text form; keeping raw text");
            trimmed.to_owned()
        }
    }
}

/// Extracts an 11-character video id from a bare id or a YouTube URL.
///
/// Accepted shapes: bare ids, `youtube.com/watch?v=ID` (any of the `www.`,
/// `m.`, `music.` hosts), `youtu.be/ID`, and `youtube.com/{shorts,embed,live,v}/ID`.
/// The scheme is optional. Anything else returns `None`.
#[must_use]
pub fn extract_video_id(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if VIDEO_ID_RE.is_match(raw) {
        return Some(raw.to_owned());
    }

    let url = if raw.contains("://") {
        Url::parse(raw).ok()?
    } else {
        Url::parse(&format!("https://{raw}")).ok()?
    };

    let host = url.host_str()?.to_ascii_lowercase();
    let host = host
        .strip_prefix("www.")
        .or_else(|| host.strip_prefix("m."))
        .or_else(|| host.strip_prefix("music."))
        .unwrap_or(&host);

    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());
    let candidate = match host {
        "youtu.be" => segments.next().map(str::to_owned),
        "youtube.com" | "youtube-nocookie.com" => match segments.next() {
            Some("watch") => url
                .query_pairs()
                .find(|(k, _)| k == "v")
                .map(|(_, v)| v.into_owned()),
            Some(prefix) if ID_PATH_PREFIXES.contains(&prefix) => {
                segments.next().map(str::to_owned)
            }
            _ => None,
        },
        _ => None,
    }?;

    VIDEO_ID_RE.is_match(&candidate).then_some(candidate)
}

/// Parses the export's creation timestamp.
///
/// Accepts RFC 3339 (`2023-04-01T12:30:00.123+00:00`), and the
/// `2023-04-01 12:30:00[.fff] UTC` and naive `2023-04-01 12:30:00` forms,
/// both read as UTC. Returns `None` for anything else.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    let naive = raw.strip_suffix(" UTC").unwrap_or(raw);
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(naive, fmt).ok())
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
