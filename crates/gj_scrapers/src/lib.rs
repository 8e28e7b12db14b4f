pub mod scrapers;
pub mod cli;
pub mod fetch;
pub mod logging;
pub mod manager;

pub use fetch::HttpFetcher;
pub use manager::{JobAggregator, RunReport};
pub use cli::{ScraperArgs, handle_run, list_extractors};
pub use scrapers::{Extractor, SourceMetadata, get_extractors};
