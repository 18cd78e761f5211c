mod run;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "ytlikes")]
#[command(about = "Rank your YouTube comment history from a Google Takeout export by likes")]
struct Cli {
    /// Path to the Takeout `comments.csv`. Searched for under the current
    /// directory when omitted.
    csv_path: Option<PathBuf>,

    /// Directory for the CSV and HTML reports (overrides `YTLIKES_OUTPUT_DIR`).
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Number of comments to print in the terminal preview.
    #[arg(long, default_value_t = ytlikes_report::DEFAULT_TOP_N)]
    top: usize,

    /// Skip the HTML report.
    #[arg(long)]
    no_html: bool,

    /// Skip the CSV report.
    #[arg(long)]
    no_csv: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Also loads `.env`.
    let config = ytlikes_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    run::run_analyze(&cli, config).await
}

#[cfg(test)]
mod tests;
