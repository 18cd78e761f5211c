//! CSV, HTML, and terminal renderings of ranked comments.

pub mod csv_report;
pub mod error;
pub mod html;
pub mod table;

use std::path::{Path, PathBuf};

use ytlikes_core::{CommentRecord, RunSummary};

pub use csv_report::write_csv;
pub use error::ReportError;
pub use html::{render_html, write_html};
pub use table::{render_top_table, DEFAULT_TOP_N, DEFAULT_TEXT_WIDTH};

pub const DEFAULT_CSV_NAME: &str = "my_comments_with_likes.csv";
pub const DEFAULT_HTML_NAME: &str = "my_comments_with_likes.html";

/// Which report files to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportFormats {
    pub csv: bool,
    pub html: bool,
}

impl Default for ReportFormats {
    fn default() -> Self {
        Self {
            csv: true,
            html: true,
        }
    }
}

/// Writes the selected reports into `output_dir` under their default names,
/// creating the directory if needed. Returns the paths written.
///
/// # Errors
///
/// Returns [`ReportError`] if the directory cannot be created or a report
/// cannot be written.
pub fn write_reports(
    output_dir: &Path,
    ranked: &[CommentRecord],
    summary: &RunSummary,
    formats: ReportFormats,
) -> Result<Vec<PathBuf>, ReportError> {
    if !formats.csv && !formats.html {
        return Ok(Vec::new());
    }
    std::fs::create_dir_all(output_dir).map_err(|source| ReportError::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::new();
    if formats.csv {
        let path = output_dir.join(DEFAULT_CSV_NAME);
        write_csv(&path, ranked)?;
        written.push(path);
    }
    if formats.html {
        let path = output_dir.join(DEFAULT_HTML_NAME);
        write_html(&path, ranked, summary)?;
        written.push(path);
    }
    Ok(written)
}
