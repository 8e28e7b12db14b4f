use clap::{Args, Parser, Subcommand};
use gj_core::{Error, Result};
use gj_scrapers::logging::init_logging;
use gj_scrapers::{get_extractors, handle_run, list_extractors, HttpFetcher, JobAggregator, ScraperArgs};
use gj_storage::{create_sink, SheetsConfig, SinkKind, SinkOptions};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(flatten)]
    run: RunArgs,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scrape every source once and write the combined feed (the default)
    Run(RunArgs),
    /// List available sources
    List,
}

#[derive(Args, Debug, Clone)]
struct RunArgs {
    #[command(flatten)]
    scrape: ScraperArgs,
    /// Where the batch is written
    #[arg(long, value_enum, default_value_t = SinkKind::Json)]
    sink: SinkKind,
    /// JSON output file
    #[arg(long, default_value = "jobs.json")]
    output: PathBuf,
    /// CSV written when the spreadsheet cannot be updated
    #[arg(long, default_value = "jobs_backup.csv")]
    backup: PathBuf,
    /// Service account key (JSON) for the sheets sink
    #[arg(long, env = "GOOGLE_CREDENTIALS", hide_env_values = true)]
    credentials: Option<String>,
    /// Target spreadsheet for the sheets sink
    #[arg(long, env = "SPREADSHEET_ID")]
    spreadsheet_id: Option<String>,
}

impl RunArgs {
    /// Validates sink configuration up front so a bad setup fails before
    /// any page is fetched.
    fn sink_options(&self) -> Result<SinkOptions> {
        let sheets = match self.sink {
            SinkKind::Sheets => Some(SheetsConfig::new(
                self.credentials.as_deref(),
                self.spreadsheet_id.as_deref(),
            )?),
            SinkKind::Json => None,
        };
        Ok(SinkOptions {
            kind: self.sink,
            output: self.output.clone(),
            backup: self.backup.clone(),
            sheets,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Run(cli.run)) {
        Commands::List => list_extractors(&get_extractors()),
        Commands::Run(args) => {
            args.scrape.sources()?;
            let sink = create_sink(&args.sink_options()?)?;

            let fetcher = Arc::new(HttpFetcher::new()?);
            let mut aggregator = JobAggregator::with_all_sources(fetcher);

            let names: Vec<&str> = aggregator.extractors().iter().map(|e| e.source().label()).collect();
            info!("🦗 Extractors initialized successfully: {}", names.join(", "));

            match handle_run(&args.scrape, &mut aggregator, sink.as_ref()).await {
                Ok(report) => {
                    let failed = report.failed_sources();
                    if !failed.is_empty() {
                        info!("Finished with {} failed source(s)", failed.len());
                    }
                }
                Err(e @ Error::Config(_)) => return Err(e),
                Err(e) => error!("❌ Run finished with errors: {}", e),
            }
        }
    }

    Ok(())
}
