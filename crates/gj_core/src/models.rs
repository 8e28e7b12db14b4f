use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder written into text fields a source does not provide
pub const NOT_AVAILABLE: &str = "N/A";

/// Format of `lastUpdated` and `scrapedAt`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Origin of a job record. Serialized with the labels downstream consumers
/// (the spreadsheet viewer) key their colours on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobSource {
    #[serde(rename = "CareerPower")]
    CareerPower,
    #[serde(rename = "AllGovtJobs")]
    AllGovtJobs,
    #[serde(rename = "AllGovtJobs-Filtered")]
    AllGovtJobsFiltered,
    #[serde(rename = "SarkariResult")]
    SarkariResult,
}

impl JobSource {
    /// All sources in run order
    pub const ALL: [JobSource; 4] = [
        JobSource::CareerPower,
        JobSource::AllGovtJobs,
        JobSource::AllGovtJobsFiltered,
        JobSource::SarkariResult,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            JobSource::CareerPower => "CareerPower",
            JobSource::AllGovtJobs => "AllGovtJobs",
            JobSource::AllGovtJobsFiltered => "AllGovtJobs-Filtered",
            JobSource::SarkariResult => "SarkariResult",
        }
    }

    /// Name accepted on the command line
    pub fn cli_name(&self) -> &'static str {
        match self {
            JobSource::CareerPower => "careerpower",
            JobSource::AllGovtJobs => "allgovtjobs",
            JobSource::AllGovtJobsFiltered => "allgovtjobs-filtered",
            JobSource::SarkariResult => "sarkariresult",
        }
    }

    pub fn from_cli_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        Self::ALL.into_iter().find(|s| s.cli_name() == name)
    }
}

impl fmt::Display for JobSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single normalized job posting.
///
/// Text fields hold whatever the source printed; nothing is parsed into
/// richer types. Missing values use [`NOT_AVAILABLE`] (or an empty `link`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub source: JobSource,
    pub title: String,
    pub posts: String,
    pub qualification: String,
    pub last_date: String,
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scraped_at: Option<String>,
}

impl JobRecord {
    /// Column order used by the spreadsheet and CSV outputs
    pub const HEADERS: [&'static str; 7] = [
        "source",
        "title",
        "posts",
        "qualification",
        "lastDate",
        "link",
        "scrapedAt",
    ];

    pub fn new(
        source: JobSource,
        title: impl Into<String>,
        posts: impl Into<String>,
        qualification: impl Into<String>,
        last_date: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            source,
            title: title.into(),
            posts: posts.into(),
            qualification: qualification.into(),
            last_date: last_date.into(),
            link: link.into(),
            scraped_at: None,
        }
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.source.label().to_string(),
            self.title.clone(),
            self.posts.clone(),
            self.qualification.clone(),
            self.last_date.clone(),
            self.link.clone(),
            self.scraped_at.clone().unwrap_or_default(),
        ]
    }
}

/// Everything collected in one run, as handed to a sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobBatch {
    pub last_updated: String,
    pub total_jobs: usize,
    pub jobs: Vec<JobRecord>,
}

impl JobBatch {
    /// Stamps every record with the same collection time.
    pub fn stamp<Tz>(mut jobs: Vec<JobRecord>, at: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let scraped_at = at.format(TIMESTAMP_FORMAT).to_string();
        for job in &mut jobs {
            job.scraped_at = Some(scraped_at.clone());
        }
        Self {
            last_updated: scraped_at,
            total_jobs: jobs.len(),
            jobs,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        self.jobs.iter().map(JobRecord::to_row)
    }
}

/// Result of running one extractor. A failed extractor carries no records.
#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    pub source: JobSource,
    pub records: Vec<JobRecord>,
    pub failed: bool,
    pub message: Option<String>,
}

impl ExtractionOutcome {
    pub fn succeeded(source: JobSource, records: Vec<JobRecord>) -> Self {
        Self {
            source,
            records,
            failed: false,
            message: None,
        }
    }

    pub fn failed(source: JobSource, message: impl Into<String>) -> Self {
        Self {
            source,
            records: Vec::new(),
            failed: true,
            message: Some(message.into()),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, Utc};

    fn record(source: JobSource, title: &str) -> JobRecord {
        JobRecord::new(source, title, "10 Posts", NOT_AVAILABLE, "31 October 2026", "")
    }

    #[test]
    fn test_stamp_applies_one_timestamp() {
        let at = Utc.with_ymd_and_hms(2026, 10, 18, 9, 5, 3).unwrap();
        let batch = JobBatch::stamp(
            vec![record(JobSource::CareerPower, "A"), record(JobSource::SarkariResult, "B")],
            &at,
        );
        assert_eq!(batch.total_jobs, 2);
        assert_eq!(batch.last_updated, "2026-10-18 09:05:03");
        assert!(batch
            .jobs
            .iter()
            .all(|j| j.scraped_at.as_deref() == Some("2026-10-18 09:05:03")));
    }

    #[test]
    fn test_batch_json_shape() {
        let batch = JobBatch::stamp(vec![record(JobSource::AllGovtJobsFiltered, "Board")], &Local::now());
        let value = serde_json::to_value(&batch).unwrap();
        assert_eq!(value["totalJobs"], 1);
        let job = &value["jobs"][0];
        assert_eq!(job["source"], "AllGovtJobs-Filtered");
        assert_eq!(job["lastDate"], "31 October 2026");
        assert_eq!(job["scrapedAt"], value["lastUpdated"]);
    }

    #[test]
    fn test_row_follows_header_order() {
        let mut job = record(JobSource::AllGovtJobs, "Railway");
        job.scraped_at = Some("2026-10-18 00:00:00".to_string());
        let row = job.to_row();
        assert_eq!(row.len(), JobRecord::HEADERS.len());
        assert_eq!(row[0], "AllGovtJobs");
        assert_eq!(row[1], "Railway");
        assert_eq!(row[6], "2026-10-18 00:00:00");
    }

    #[test]
    fn test_cli_names() {
        assert_eq!(JobSource::from_cli_name("SarkariResult"), Some(JobSource::SarkariResult));
        assert_eq!(JobSource::from_cli_name("allgovtjobs-filtered"), Some(JobSource::AllGovtJobsFiltered));
        assert_eq!(JobSource::from_cli_name("unknown"), None);
    }

    #[test]
    fn test_failed_outcome_is_empty() {
        let outcome = ExtractionOutcome::failed(JobSource::CareerPower, "timed out");
        assert!(outcome.failed);
        assert!(outcome.is_empty());
        assert_eq!(outcome.message.as_deref(), Some("timed out"));
    }
}
