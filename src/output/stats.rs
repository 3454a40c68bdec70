//! Harvest statistics
//!
//! Summarizes a [`HarvestReport`] into outcome counts and prints them.

use crate::harvest::{HarvestReport, PageOutcome};
use crate::CrawlSource;

/// Outcome counts for one harvest session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestStatistics {
    /// URLs returned by the crawl
    pub discovered: usize,

    /// URLs selected into any category
    pub categorized: usize,

    /// Pages whose text was extracted
    pub extracted: usize,

    pub fetch_failed: usize,
    pub extract_failed: usize,

    /// URLs already processed under an earlier category
    pub duplicates: usize,

    pub disallowed: usize,
    pub aborted: usize,

    /// Blocks in the final corpus
    pub blocks: usize,

    /// `(category, URL count)` in configured order
    pub per_category: Vec<(String, usize)>,
}

impl HarvestStatistics {
    pub fn from_report(report: &HarvestReport) -> Self {
        let mut stats = Self {
            discovered: report.discovered,
            categorized: report.categorized(),
            blocks: report.blocks.len(),
            per_category: report
                .categories
                .iter()
                .map(|(name, urls)| (name.clone(), urls.len()))
                .collect(),
            ..Self::default()
        };

        for outcome in &report.outcomes {
            match outcome {
                PageOutcome::Extracted { .. } => stats.extracted += 1,
                PageOutcome::FetchFailed { .. } => stats.fetch_failed += 1,
                PageOutcome::ExtractFailed { .. } => stats.extract_failed += 1,
                PageOutcome::Duplicate { .. } => stats.duplicates += 1,
                PageOutcome::Disallowed { .. } => stats.disallowed += 1,
                PageOutcome::Aborted { .. } => stats.aborted += 1,
            }
        }

        stats
    }

    /// Share of attempted pages that produced text, in percent
    pub fn success_rate(&self) -> f64 {
        let attempted = self.extracted + self.fetch_failed + self.extract_failed;
        if attempted == 0 {
            0.0
        } else {
            (self.extracted as f64 / attempted as f64) * 100.0
        }
    }
}

/// Prints a report's statistics to stdout
pub fn print_statistics(report: &HarvestReport) {
    let stats = HarvestStatistics::from_report(report);

    println!("=== Harvest Statistics ===\n");

    println!("Session:");
    println!("  Seed: {}", report.seed);
    println!("  Started: {}", report.started_at.to_rfc3339());
    println!(
        "  Duration: {:.1}s",
        report.duration().num_milliseconds() as f64 / 1000.0
    );
    let source = match report.source {
        CrawlSource::Sitemap => "sitemap",
        CrawlSource::LinkCrawl => "link crawl",
    };
    println!("  URLs discovered: {} (via {})", stats.discovered, source);
    println!();

    println!("Categories:");
    for (category, count) in &stats.per_category {
        println!("  {}: {}", category, count);
    }
    println!();

    println!("Pages:");
    println!("  Extracted: {}", stats.extracted);
    println!("  Fetch failed: {}", stats.fetch_failed);
    println!("  Extraction failed: {}", stats.extract_failed);
    if stats.duplicates > 0 {
        println!("  Duplicates skipped: {}", stats.duplicates);
    }
    if stats.disallowed > 0 {
        println!("  Blocked by robots.txt: {}", stats.disallowed);
    }
    if stats.aborted > 0 {
        println!("  Aborted: {}", stats.aborted);
    }
    println!();

    println!(
        "Success Rate: {:.1}% ({} text blocks in corpus)",
        stats.success_rate(),
        stats.blocks
    );
}
