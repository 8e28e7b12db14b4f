use chrono::Local;
use gj_core::{ExtractionOutcome, JobBatch, JobSink, JobSource, PageFetcher, Result};
use std::sync::Arc;
use tracing::{error, info, warn};
use crate::scrapers::{get_extractors, BoxedExtractor};

/// What one run produced: an outcome per extractor, and the stamped batch
/// unless nothing was found.
#[derive(Debug)]
pub struct RunReport {
    pub outcomes: Vec<ExtractionOutcome>,
    pub batch: Option<JobBatch>,
}

impl RunReport {
    pub fn total_jobs(&self) -> usize {
        self.outcomes.iter().map(ExtractionOutcome::len).sum()
    }

    pub fn failed_sources(&self) -> Vec<JobSource> {
        self.outcomes.iter().filter(|o| o.failed).map(|o| o.source).collect()
    }

    pub fn log_summary(&self) {
        for outcome in &self.outcomes {
            match &outcome.message {
                Some(message) if outcome.failed => {
                    warn!("  ❌ {}: failed ({})", outcome.source, message)
                }
                _ => info!("  ✅ {}: {} jobs", outcome.source, outcome.len()),
            }
        }
        info!("Total jobs scraped: {}", self.total_jobs());
    }
}

/// Runs extractors one after another and merges their records in order.
pub struct JobAggregator {
    fetcher: Arc<dyn PageFetcher>,
    extractors: Vec<BoxedExtractor>,
}

impl JobAggregator {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            fetcher,
            extractors: Vec::new(),
        }
    }

    /// Aggregator over every known source, in run order.
    pub fn with_all_sources(fetcher: Arc<dyn PageFetcher>) -> Self {
        let mut aggregator = Self::new(fetcher);
        for extractor in get_extractors() {
            aggregator.add_extractor(extractor);
        }
        aggregator
    }

    pub fn add_extractor(&mut self, extractor: BoxedExtractor) {
        self.extractors.push(extractor);
    }

    pub fn extractors(&self) -> &[BoxedExtractor] {
        &self.extractors
    }

    /// Drops every extractor whose source is not listed. Run order is kept.
    pub fn retain_sources(&mut self, sources: &[JobSource]) {
        self.extractors.retain(|e| sources.contains(&e.source()));
    }

    pub async fn collect(&self) -> Vec<ExtractionOutcome> {
        let mut outcomes = Vec::with_capacity(self.extractors.len());
        for extractor in &self.extractors {
            outcomes.push(extractor.collect(self.fetcher.as_ref()).await);
        }
        outcomes
    }

    /// Collects from every extractor and stamps the combined records with
    /// one shared timestamp.
    pub async fn run(&self) -> RunReport {
        info!("Starting job scraper at {}", Local::now().format(gj_core::TIMESTAMP_FORMAT));
        let outcomes = self.collect().await;

        let jobs: Vec<_> = outcomes.iter().flat_map(|o| o.records.iter().cloned()).collect();
        let batch = if jobs.is_empty() {
            None
        } else {
            Some(JobBatch::stamp(jobs, &Local::now()))
        };

        RunReport { outcomes, batch }
    }

    /// Full run ending in `sink`. An empty run never touches the sink.
    pub async fn run_into(&self, sink: &dyn JobSink) -> Result<RunReport> {
        let report = self.run().await;
        report.log_summary();

        let Some(batch) = &report.batch else {
            info!("No jobs found. Exiting.");
            return Ok(report);
        };

        info!("💾 Writing {} jobs to {}...", batch.total_jobs, sink.name());
        match sink.write_batch(batch).await {
            Ok(()) => {
                info!("✅ Successfully saved to {}!", sink.name());
                Ok(report)
            }
            Err(e) => {
                error!("❌ Error saving to {}: {}", sink.name(), e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::fixtures::{allgovtjobs_page, StaticFetcher};
    use crate::scrapers::india::{
        AllGovtJobsScraper, CareerPowerScraper, SarkariResultScraper,
    };
    use crate::scrapers::Extractor;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use gj_core::{Error, JobRecord, NOT_AVAILABLE};
    use std::sync::Mutex;

    struct FixedExtractor {
        source: JobSource,
        count: usize,
        fail: bool,
    }

    #[async_trait]
    impl Extractor for FixedExtractor {
        fn source(&self) -> JobSource {
            self.source
        }

        fn source_metadata(&self) -> crate::scrapers::SourceMetadata {
            crate::scrapers::SourceMetadata {
                name: "fixed",
                emoji: "🧪",
                host: "localhost",
            }
        }

        async fn extract(&self, _fetcher: &dyn PageFetcher) -> Result<Vec<JobRecord>> {
            if self.fail {
                return Err(Error::Scraping("boom".to_string()));
            }
            Ok((0..self.count)
                .map(|i| {
                    JobRecord::new(self.source, format!("{} {}", self.source, i), "1 Post", NOT_AVAILABLE, "", "")
                })
                .collect())
        }
    }

    #[derive(Default)]
    struct MockSink {
        batches: Mutex<Vec<JobBatch>>,
        fail: bool,
    }

    #[async_trait]
    impl JobSink for MockSink {
        fn name(&self) -> &str {
            "mock"
        }

        async fn write_batch(&self, batch: &JobBatch) -> Result<()> {
            if self.fail {
                return Err(Error::Sink("disk full".to_string()));
            }
            self.batches.lock().unwrap().push(batch.clone());
            Ok(())
        }
    }

    fn aggregator(fixed: &[(JobSource, usize, bool)]) -> JobAggregator {
        let mut aggregator = JobAggregator::new(Arc::new(StaticFetcher::new()));
        for &(source, count, fail) in fixed {
            aggregator.add_extractor(Box::new(FixedExtractor { source, count, fail }));
        }
        aggregator
    }

    #[tokio::test]
    async fn test_run_concatenates_in_order() {
        let aggregator = aggregator(&[
            (JobSource::CareerPower, 2, false),
            (JobSource::AllGovtJobs, 3, false),
            (JobSource::AllGovtJobsFiltered, 1, false),
            (JobSource::SarkariResult, 4, false),
        ]);
        let sink = MockSink::default();
        let report = aggregator.run_into(&sink).await.unwrap();

        let batches = sink.batches.lock().unwrap();
        assert_eq!(batches.len(), 1);
        let batch = &batches[0];
        assert_eq!(batch.total_jobs, 10);
        assert_eq!(report.total_jobs(), 10);

        let sources: Vec<JobSource> = batch.jobs.iter().map(|j| j.source).collect();
        let mut expected = vec![JobSource::CareerPower; 2];
        expected.extend(vec![JobSource::AllGovtJobs; 3]);
        expected.push(JobSource::AllGovtJobsFiltered);
        expected.extend(vec![JobSource::SarkariResult; 4]);
        assert_eq!(sources, expected);

        let stamp = batch.jobs[0].scraped_at.clone();
        assert!(stamp.is_some());
        assert!(batch.jobs.iter().all(|j| j.scraped_at == stamp));
        assert_eq!(stamp.as_deref(), Some(batch.last_updated.as_str()));
    }

    #[tokio::test]
    async fn test_empty_run_skips_sink() {
        let aggregator = aggregator(&[
            (JobSource::CareerPower, 0, false),
            (JobSource::AllGovtJobs, 0, false),
            (JobSource::AllGovtJobsFiltered, 0, false),
            (JobSource::SarkariResult, 0, false),
        ]);
        let sink = MockSink::default();
        let report = aggregator.run_into(&sink).await.unwrap();
        assert!(report.batch.is_none());
        assert!(sink.batches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_extractor_does_not_stop_others() {
        let aggregator = aggregator(&[
            (JobSource::CareerPower, 2, true),
            (JobSource::AllGovtJobs, 0, false),
            (JobSource::SarkariResult, 1, false),
        ]);
        let report = aggregator.run().await;
        assert_eq!(report.failed_sources(), vec![JobSource::CareerPower]);
        assert_eq!(report.outcomes.len(), 3);
        // zero jobs is not a failure
        assert!(!report.outcomes[1].failed);
        assert_eq!(report.batch.unwrap().total_jobs, 1);
    }

    #[tokio::test]
    async fn test_sink_failure_is_returned() {
        let aggregator = aggregator(&[(JobSource::CareerPower, 1, false)]);
        let sink = MockSink {
            fail: true,
            ..Default::default()
        };
        assert!(aggregator.run_into(&sink).await.is_err());
    }

    #[test]
    fn test_retain_sources() {
        let mut aggregator = JobAggregator::with_all_sources(Arc::new(StaticFetcher::new()));
        aggregator.retain_sources(&[JobSource::SarkariResult, JobSource::CareerPower]);
        let sources: Vec<JobSource> = aggregator.extractors().iter().map(|e| e.source()).collect();
        assert_eq!(sources, vec![JobSource::CareerPower, JobSource::SarkariResult]);
    }

    #[tokio::test]
    async fn test_fixture_run_end_to_end() {
        let careerpower = r#"<table>
            <tr><th>Name</th><th>Posts</th><th>Date</th></tr>
            <tr><td><a href="/a.html">XYZ Recruitment for 50 Posts</a></td><td>50</td><td>30 October 2026</td></tr>
        </table>"#;
        let allgovtjobs = allgovtjobs_page(&[
            ["ABC Corp", "ABC Corp - Assistant - 12 vacancies", "B.E/ B.Tech in ECE", "20/10/2026"],
            ["Health Mission", "Staff Nurse - 40", "GNM", "25/10/2026"],
        ]);
        let sarkari = r#"<ul class="su-posts">
            <li class="su-post"><a href="/x/">Pinned</a></li>
            <li class="su-post"><a href="/y/">Pinned</a></li>
            <li class="su-post"><a href="/clerk/">Clerk Recruitment 200 Posts</a><span>Last Date: (17 October 2026)</span></li>
        </ul>"#;
        let fetcher = StaticFetcher::new()
            .with_page(CareerPowerScraper::URL, careerpower)
            .with_page(SarkariResultScraper::URL, sarkari)
            .with_fallback(&allgovtjobs);

        let mut aggregator = JobAggregator::new(Arc::new(fetcher));
        aggregator.add_extractor(Box::new(CareerPowerScraper::new()));
        aggregator.add_extractor(Box::new(AllGovtJobsScraper::all().with_pages(2)));
        aggregator.add_extractor(Box::new(AllGovtJobsScraper::filtered().with_pages(2)));
        aggregator.add_extractor(Box::new(
            SarkariResultScraper::new().with_today(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()),
        ));

        let first = aggregator.run().await;
        let counts: Vec<usize> = first.outcomes.iter().map(ExtractionOutcome::len).collect();
        assert_eq!(counts, vec![1, 4, 2, 1]);

        let batch = first.batch.unwrap();
        assert_eq!(batch.total_jobs, counts.iter().sum::<usize>());

        let strip = |batch: JobBatch| -> Vec<JobRecord> {
            batch
                .jobs
                .into_iter()
                .map(|mut j| {
                    j.scraped_at = None;
                    j
                })
                .collect()
        };
        let second = aggregator.run().await.batch.unwrap();
        assert_eq!(strip(batch), strip(second));
    }
}
