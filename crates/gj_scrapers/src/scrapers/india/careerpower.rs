use async_trait::async_trait;
use gj_core::{JobRecord, JobSource, PageFetcher, Result, NOT_AVAILABLE};
use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};
use crate::scrapers::{utils, Extractor, SourceMetadata};

lazy_static! {
    static ref TABLE: Selector = Selector::parse("table").unwrap();
    static ref ROW: Selector = Selector::parse("tr").unwrap();
    static ref CELL: Selector = Selector::parse("td").unwrap();
    static ref LINK: Selector = Selector::parse("a").unwrap();
}

/// Recruitment name, vacancies, last date
const MIN_COLUMNS: usize = 3;

/// Single page listing: the first table on the page, one recruitment per row.
#[derive(Debug, Clone, Default)]
pub struct CareerPowerScraper;

impl CareerPowerScraper {
    pub fn new() -> Self {
        Self
    }

    pub const URL: &'static str = "https://www.careerpower.in/government-jobs.html";
}

/// Splits "SSC CGL Recruitment for 17727 Posts" at the first " for ".
pub fn split_recruitment_name(name: &str) -> (String, String) {
    match name.split_once(" for ") {
        Some((title, posts)) => (title.to_string(), posts.to_string()),
        None => (name.to_string(), NOT_AVAILABLE.to_string()),
    }
}

fn parse_row(row: ElementRef) -> Option<JobRecord> {
    let cols: Vec<ElementRef> = row.select(&CELL).collect();
    if cols.len() < MIN_COLUMNS {
        return None;
    }

    let recruitment_name = utils::stripped_text(&cols[0]);
    let last_date = utils::stripped_text(&cols[2]);
    let link = cols[0]
        .select(&LINK)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(|href| utils::resolve_link(CareerPowerScraper::URL, href))
        .unwrap_or_default();

    let (title, posts) = split_recruitment_name(&recruitment_name);
    Some(JobRecord::new(
        JobSource::CareerPower,
        title,
        posts,
        NOT_AVAILABLE,
        last_date,
        link,
    ))
}

/// Parses the listing page. The first row of the table is its header.
pub fn parse_listing(html: &str) -> Vec<JobRecord> {
    let document = Html::parse_document(html);
    let Some(table) = document.select(&TABLE).next() else {
        return Vec::new();
    };
    table.select(&ROW).skip(1).filter_map(parse_row).collect()
}

#[async_trait]
impl Extractor for CareerPowerScraper {
    fn source(&self) -> JobSource {
        JobSource::CareerPower
    }

    fn source_metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: "Career Power",
            emoji: "🏛️",
            host: "careerpower.in",
        }
    }

    async fn extract(&self, fetcher: &dyn PageFetcher) -> Result<Vec<JobRecord>> {
        let html = fetcher.fetch(Self::URL).await?;
        Ok(parse_listing(&html))
    }
}
