use async_trait::async_trait;
use gj_core::{JobRecord, JobSource, PageFetcher, Result};
use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};
use crate::scrapers::{utils, Extractor, SourceMetadata};

lazy_static! {
    static ref ROW: Selector = Selector::parse(".table-bordered tbody tr").unwrap();
    static ref CELL: Selector = Selector::parse("td").unwrap();
}

/// Organization, job details, education, last date
const MIN_COLUMNS: usize = 4;

pub const PAGE_COUNT: usize = 25;

/// Education keywords accepted by the filtered listing, in priority order.
/// The first one contained in the education cell becomes the qualification.
pub const QUALIFICATION_KEYWORDS: &[&str] = &[
    "B.E/ B.Tech",
    "Any Degree",
    "Electronics and Communication Engineering",
    "10th",
    "12th",
    "Intermediate (10+2)",
];

/// Paginated table listing. The same pages back two sources: every row
/// (`AllGovtJobs`) and only rows matching [`QUALIFICATION_KEYWORDS`]
/// (`AllGovtJobs-Filtered`).
#[derive(Debug, Clone)]
pub struct AllGovtJobsScraper {
    source: JobSource,
    keywords: Option<&'static [&'static str]>,
    pages: usize,
}

impl AllGovtJobsScraper {
    pub const BASE_URL: &'static str = "https://allgovernmentjobs.in/latest-government-jobs";

    pub fn all() -> Self {
        Self {
            source: JobSource::AllGovtJobs,
            keywords: None,
            pages: PAGE_COUNT,
        }
    }

    pub fn filtered() -> Self {
        Self {
            source: JobSource::AllGovtJobsFiltered,
            keywords: Some(QUALIFICATION_KEYWORDS),
            pages: PAGE_COUNT,
        }
    }

    pub fn with_pages(mut self, pages: usize) -> Self {
        self.pages = pages;
        self
    }

    /// Page 1 is the bare listing URL, later pages live under `/page/<n>`.
    pub fn page_url(page: usize) -> String {
        if page > 1 {
            format!("{}/page/{}", Self::BASE_URL, page)
        } else {
            Self::BASE_URL.to_string()
        }
    }

    pub fn parse_page(&self, html: &str) -> Vec<JobRecord> {
        let document = Html::parse_document(html);
        document
            .select(&ROW)
            .filter_map(|row| self.parse_row(row))
            .collect()
    }

    fn parse_row(&self, row: ElementRef) -> Option<JobRecord> {
        let cols: Vec<ElementRef> = row.select(&CELL).collect();
        if cols.len() < MIN_COLUMNS {
            return None;
        }

        let org = utils::trimmed_text(&cols[0]);
        let job_details = utils::trimmed_text(&cols[1]);
        let education = utils::trimmed_text(&cols[2]);
        let last_date = utils::trimmed_text(&cols[3]);

        let qualification = match self.keywords {
            Some(keywords) => match_qualification(&education, keywords)?.to_string(),
            None => education,
        };

        Some(JobRecord::new(
            self.source,
            org,
            posts_from_details(&job_details),
            qualification,
            last_date,
            "",
        ))
    }
}

/// "ABC Corp - Assistant - 12 vacancies" -> "12 vacancies"
pub fn posts_from_details(details: &str) -> String {
    match details.rsplit_once('-') {
        Some((_, posts)) => posts.trim().to_string(),
        None => details.to_string(),
    }
}

/// First keyword, in list order, contained in `education` (case-sensitive).
pub fn match_qualification(education: &str, keywords: &[&'static str]) -> Option<&'static str> {
    keywords.iter().copied().find(|keyword| education.contains(keyword))
}

#[async_trait]
impl Extractor for AllGovtJobsScraper {
    fn source(&self) -> JobSource {
        self.source
    }

    fn source_metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: "All Government Jobs",
            emoji: if self.keywords.is_some() { "🎓" } else { "📋" },
            host: "allgovernmentjobs.in",
        }
    }

    async fn extract(&self, fetcher: &dyn PageFetcher) -> Result<Vec<JobRecord>> {
        let logger = self.logger();
        let mut records = Vec::new();

        for page in 1..=self.pages {
            let url = Self::page_url(page);
            logger.debug(&format!("Fetching {}", url));
            let html = fetcher.fetch(&url).await?;
            records.extend(self.parse_page(&html));
            logger.info(&format!("Scraped page {}/{}", page, self.pages));
        }

        Ok(records)
    }
}
