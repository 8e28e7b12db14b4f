use async_trait::async_trait;
use gj_core::{ExtractionOutcome, JobRecord, JobSource, PageFetcher, Result};
use crate::logging::Logger;

pub mod india;
use india::{AllGovtJobsScraper, CareerPowerScraper, SarkariResultScraper};

pub type BoxedExtractor = Box<dyn Extractor + Send + Sync>;

#[derive(Debug, Clone, Copy)]
pub struct SourceMetadata {
    pub name: &'static str,
    pub emoji: &'static str,
    pub host: &'static str,
}

#[async_trait]
pub trait Extractor: Send + Sync {
    /// Which label the produced records carry
    fn source(&self) -> JobSource;

    fn source_metadata(&self) -> SourceMetadata;

    /// Fetches and parses every page this source exposes
    async fn extract(&self, fetcher: &dyn PageFetcher) -> Result<Vec<JobRecord>>;

    fn logger(&self) -> Logger {
        let meta = self.source_metadata();
        Logger::new().with_prefix(format!("{} {}", meta.emoji, self.source().label()))
    }

    /// Runs [`Extractor::extract`] and turns any error into a failed outcome,
    /// so one broken site never stops the others.
    async fn collect(&self, fetcher: &dyn PageFetcher) -> ExtractionOutcome {
        let logger = self.logger();
        logger.info(&format!("🦗 Scraping {}", self.source_metadata().host));
        match self.extract(fetcher).await {
            Ok(records) => {
                logger.info(&format!("✅ Found {} jobs", records.len()));
                ExtractionOutcome::succeeded(self.source(), records)
            }
            Err(e) => {
                logger.error(&format!("❌ Error scraping: {}", e));
                ExtractionOutcome::failed(self.source(), e.to_string())
            }
        }
    }
}

/// Every extractor in run order
pub fn get_extractors() -> Vec<BoxedExtractor> {
    vec![
        Box::new(CareerPowerScraper::new()),
        Box::new(AllGovtJobsScraper::all()),
        Box::new(AllGovtJobsScraper::filtered()),
        Box::new(SarkariResultScraper::new()),
    ]
}

/// Common utilities for scrapers
pub(crate) mod utils {
    use gj_core::Result;
    use scraper::ElementRef;
    use url::Url;

    pub fn parse_url(url: &str) -> Result<Url> {
        Ok(Url::parse(url)?)
    }

    /// Trims every text node and glues them together without a separator.
    pub fn stripped_text(element: &ElementRef) -> String {
        element
            .text()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Whole text content with only the outer whitespace removed.
    pub fn trimmed_text(element: &ElementRef) -> String {
        element.text().collect::<String>().trim().to_string()
    }

    /// Makes relative links absolute; anything unparsable is kept verbatim.
    pub fn resolve_link(base: &str, href: &str) -> String {
        let href = href.trim();
        if href.is_empty() || Url::parse(href).is_ok() {
            return href.to_string();
        }
        parse_url(base)
            .and_then(|base| Ok(base.join(href)?))
            .map(|url| url.to_string())
            .unwrap_or_else(|_| href.to_string())
    }
}
