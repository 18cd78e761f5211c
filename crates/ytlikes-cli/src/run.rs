use std::path::{Path, PathBuf};

use anyhow::Context;
use ytlikes_core::AppConfig;
use ytlikes_enrich::{run_enrichment, BatchFetcher, CancellationToken, FetchConfig};
use ytlikes_report::{render_top_table, write_reports, ReportFormats, DEFAULT_TEXT_WIDTH};
use ytlikes_youtube::YoutubeClient;

use crate::Cli;

/// Parse, enrich, rank, and report one Takeout export.
///
/// Configuration and input problems abort before any request is sent.
/// Lookup failures never abort: they show up as `ERROR` rows and in the
/// summary.
///
/// # Errors
///
/// Returns an error if the export cannot be found or read, the API client
/// cannot be built, or a report cannot be written.
pub(crate) async fn run_analyze(cli: &Cli, config: AppConfig) -> anyhow::Result<()> {
    let csv_path = resolve_export_path(cli.csv_path.as_deref())?;
    println!("Reading: {}", csv_path.display());

    let parsed = ytlikes_takeout::parse_export(&csv_path)
        .with_context(|| format!("failed to read {}", csv_path.display()))?;
    let summary = parsed.summary();
    println!(
        "Parsed {} comments ({} skipped, {} duplicates).",
        parsed.records.len(),
        parsed.skipped,
        parsed.duplicates
    );
    if parsed.records.is_empty() {
        println!("No comments found to process.");
        return Ok(());
    }

    let client = YoutubeClient::from_config(&config).context("failed to build YouTube client")?;
    let mut fetcher = BatchFetcher::new(client, FetchConfig::from_app_config(&config));

    let cancel = CancellationToken::new();
    let _ctrl_c = tokio::spawn(cancel_on_ctrl_c(cancel.clone()));

    let report = run_enrichment(&mut fetcher, parsed.records, summary, &cancel).await;
    if cancel.is_cancelled() {
        println!("Interrupted: unfinished lookups are reported as ERROR.");
    }

    println!();
    print!(
        "{}",
        render_top_table(&report.ranked, cli.top, DEFAULT_TEXT_WIDTH)
    );
    println!();
    println!("{}", report.summary);

    let output_dir = cli.output_dir.as_ref().unwrap_or(&config.output_dir);
    let formats = ReportFormats {
        csv: !cli.no_csv,
        html: !cli.no_html,
    };
    let written = write_reports(output_dir, &report.ranked, &report.summary, formats)
        .with_context(|| format!("failed to write reports to {}", output_dir.display()))?;

    if !written.is_empty() {
        println!("Reports generated:");
        for path in &written {
            println!(" -> {}", path.display());
        }
    }
    Ok(())
}

/// The explicit path wins; otherwise the first `comments.csv` under the
/// current directory.
fn resolve_export_path(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(path) = explicit {
        anyhow::ensure!(path.is_file(), "{} not found", path.display());
        return Ok(path.to_path_buf());
    }

    let cwd = std::env::current_dir().context("failed to read current directory")?;
    println!(
        "Searching for '{}' under {}...",
        ytlikes_takeout::EXPORT_FILE_NAME,
        cwd.display()
    );
    ytlikes_takeout::discover_export(&cwd)
        .context("provide the path to comments.csv or run inside the Takeout directory")
}

async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::warn!("received ctrl-c; no new batches will be sent");
            cancel.cancel();
        }
        Err(e) => tracing::error!(error = %e, "failed to listen for ctrl-c"),
    }
}
