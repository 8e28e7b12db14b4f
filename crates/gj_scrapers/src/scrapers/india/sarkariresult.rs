use async_trait::async_trait;
use chrono::{Duration, Local, NaiveDate};
use gj_core::{JobRecord, JobSource, PageFetcher, Result, NOT_AVAILABLE};
use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};
use crate::logging::Logger;
use crate::scrapers::{utils, Extractor, SourceMetadata};

lazy_static! {
    static ref ITEM: Selector = Selector::parse("ul.su-posts li.su-post").unwrap();
    static ref LINK: Selector = Selector::parse("a").unwrap();
    static ref DETAILS: Selector = Selector::parse("span").unwrap();
}

/// The first two list items are pinned notices, not postings.
const SKIP_ITEMS: usize = 2;

const DATE_FORMAT: &str = "%d %B %Y";

/// "Latest jobs" list. Postings whose last date is already more than a day
/// gone are left out.
#[derive(Debug, Clone, Default)]
pub struct SarkariResultScraper {
    today: Option<NaiveDate>,
}

impl SarkariResultScraper {
    pub fn new() -> Self {
        Self { today: None }
    }

    /// Pins the date expiry is measured against instead of the local clock.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub const URL: &'static str = "https://www.sarkariresult.app/latest-jobs/";

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

/// "Clerk Recruitment 200 Posts" -> ("Clerk Recruitment", "200 Posts").
/// Titles of one or two words are left whole.
pub fn split_title(text: &str) -> (String, String) {
    let parts: Vec<&str> = text.rsplitn(3, ' ').collect();
    match parts.as_slice() {
        [last, second, rest] => (rest.to_string(), format!("{} {}", second, last)),
        _ => (text.to_string(), NOT_AVAILABLE.to_string()),
    }
}

/// "Last Date: (31 October 2026)" -> "31 October 2026"
pub fn clean_last_date(details: &str) -> String {
    details
        .replace("Last Date:", "")
        .replace(['(', ')'], "")
        .trim()
        .to_string()
}

/// "31 October 2026". Abbreviated months such as "Oct" do not count as a
/// date, even though chrono's `%B` would accept them.
pub fn parse_last_date(text: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(text, DATE_FORMAT).ok()?;
    let month = text.split_whitespace().nth(1)?;
    date.format("%B")
        .to_string()
        .eq_ignore_ascii_case(month)
        .then_some(date)
}

/// Yesterday counts as still open.
pub fn is_open(last_date: NaiveDate, today: NaiveDate) -> bool {
    last_date >= today - Duration::days(1)
}

fn parse_item(item: ElementRef, today: NaiveDate) -> std::result::Result<Option<JobRecord>, String> {
    let anchor = item
        .select(&LINK)
        .next()
        .ok_or_else(|| "missing job link".to_string())?;
    let href = anchor
        .value()
        .attr("href")
        .ok_or_else(|| "job link has no href".to_string())?;

    let job_title = utils::stripped_text(&anchor);
    let job_details = item
        .select(&DETAILS)
        .next()
        .map(|span| utils::stripped_text(&span))
        .unwrap_or_default();

    let (title, posts) = split_title(&job_title);
    let last_date = clean_last_date(&job_details);

    if let Some(date) = parse_last_date(&last_date) {
        if !is_open(date, today) {
            return Ok(None);
        }
    }

    Ok(Some(JobRecord::new(
        JobSource::SarkariResult,
        title,
        posts,
        NOT_AVAILABLE,
        last_date,
        utils::resolve_link(SarkariResultScraper::URL, href),
    )))
}

/// Parses the list. A malformed item is logged and skipped; unparsable
/// dates keep the posting.
pub fn parse_listing(html: &str, today: NaiveDate, logger: &Logger) -> Vec<JobRecord> {
    let document = Html::parse_document(html);
    let mut jobs = Vec::new();

    for item in document.select(&ITEM).skip(SKIP_ITEMS) {
        match parse_item(item, today) {
            Ok(Some(job)) => jobs.push(job),
            Ok(None) => {}
            Err(e) => logger.warn(&format!("⚠️ Error parsing job: {}", e)),
        }
    }

    jobs
}

#[async_trait]
impl Extractor for SarkariResultScraper {
    fn source(&self) -> JobSource {
        JobSource::SarkariResult
    }

    fn source_metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: "Sarkari Result",
            emoji: "📰",
            host: "sarkariresult.app",
        }
    }

    async fn extract(&self, fetcher: &dyn PageFetcher) -> Result<Vec<JobRecord>> {
        let html = fetcher.fetch(Self::URL).await?;
        Ok(parse_listing(&html, self.today(), &self.logger()))
    }
}
