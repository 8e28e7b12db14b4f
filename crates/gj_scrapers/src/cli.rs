use clap::Args;
use gj_core::{Error, JobSink, JobSource, Result};
use crate::manager::{JobAggregator, RunReport};
use crate::scrapers::BoxedExtractor;

#[derive(Args, Debug, Clone, Default)]
pub struct ScraperArgs {
    /// Only run these sources (careerpower, allgovtjobs, allgovtjobs-filtered, sarkariresult).
    /// Repeat the flag or separate names with commas. Defaults to all of them.
    #[arg(long = "only", value_name = "SOURCE", value_delimiter = ',')]
    pub only: Vec<String>,
}

impl ScraperArgs {
    pub fn sources(&self) -> Result<Vec<JobSource>> {
        self.only
            .iter()
            .map(|name| {
                JobSource::from_cli_name(name)
                    .ok_or_else(|| Error::Config(format!("Unknown source: {}", name)))
            })
            .collect()
    }
}

/// Applies the source selection and runs the aggregator into `sink`.
pub async fn handle_run(
    args: &ScraperArgs,
    aggregator: &mut JobAggregator,
    sink: &dyn JobSink,
) -> Result<RunReport> {
    let sources = args.sources()?;
    if !sources.is_empty() {
        aggregator.retain_sources(&sources);
    }
    aggregator.run_into(sink).await
}

/// Prints the sources. Needs no fetcher, so `list` never touches the network.
pub fn list_extractors(extractors: &[BoxedExtractor]) {
    println!("Available sources:");
    for extractor in extractors {
        let meta = extractor.source_metadata();
        println!(
            "  {} {:<22} {} ({})",
            meta.emoji,
            extractor.source().cli_name(),
            meta.name,
            meta.host
        );
    }
}
