//! Human-readable end-of-run reporting
//!
//! The metadata index is the authoritative machine-readable record; this
//! module only renders the per-source counters the operator sees at run end.

use crate::collect::SourceState;

/// Counters for one source's collection pass
#[derive(Debug, Clone)]
pub struct SourceReport {
    pub category: String,
    pub key: String,
    pub state: SourceState,
    pub attempted: u64,
    pub accepted: u64,
    pub duplicates: u64,
    pub errors: u64,
    pub bytes_collected: u64,
}

impl SourceReport {
    pub fn new(category: &str, key: &str) -> Self {
        Self {
            category: category.to_string(),
            key: key.to_string(),
            state: SourceState::Pending,
            attempted: 0,
            accepted: 0,
            duplicates: 0,
            errors: 0,
            bytes_collected: 0,
        }
    }
}

/// Whole-run summary handed back by the collector
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub config_hash: String,
    pub cancelled: bool,
    pub sources: Vec<SourceReport>,
}

impl RunSummary {
    pub fn total_accepted(&self) -> u64 {
        self.sources.iter().map(|s| s.accepted).sum()
    }

    pub fn total_bytes(&self) -> u64 {
        self.sources.iter().map(|s| s.bytes_collected).sum()
    }

    pub fn total_errors(&self) -> u64 {
        self.sources.iter().map(|s| s.errors).sum()
    }
}

/// Formats the summary block printed at run end
pub fn format_run_summary(summary: &RunSummary) -> String {
    let mut out = String::new();

    out.push_str("=== Crawl Summary ===\n");
    out.push_str(&format!("Config hash: {}\n", summary.config_hash));
    if summary.cancelled {
        out.push_str("Run cancelled before completion\n");
    }
    out.push('\n');

    for source in &summary.sources {
        out.push_str(&format!(
            "{}/{} [{}]: attempted {}, accepted {}, duplicate {}, error {}, {} bytes\n",
            source.category,
            source.key,
            source.state,
            source.attempted,
            source.accepted,
            source.duplicates,
            source.errors,
            source.bytes_collected,
        ));
    }

    out.push('\n');
    out.push_str(&format!(
        "Total: {} documents, {} bytes, {} errors across {} sources\n",
        summary.total_accepted(),
        summary.total_bytes(),
        summary.total_errors(),
        summary.sources.len(),
    ));

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_summary() -> RunSummary {
        let mut first = SourceReport::new("news", "alpha");
        first.state = SourceState::Completed;
        first.attempted = 10;
        first.accepted = 7;
        first.duplicates = 2;
        first.errors = 1;
        first.bytes_collected = 43_000;

        let mut second = SourceReport::new("policy", "beta");
        second.state = SourceState::BudgetExhausted;
        second.attempted = 4;
        second.accepted = 3;
        second.bytes_collected = 20_000;

        RunSummary {
            config_hash: "cafe1234".to_string(),
            cancelled: false,
            sources: vec![first, second],
        }
    }

    #[test]
    fn test_totals() {
        let summary = sample_summary();
        assert_eq!(summary.total_accepted(), 10);
        assert_eq!(summary.total_bytes(), 63_000);
        assert_eq!(summary.total_errors(), 1);
    }

    #[test]
    fn test_format_contains_per_source_lines() {
        let text = format_run_summary(&sample_summary());

        assert!(text.contains("news/alpha [completed]"));
        assert!(text.contains("policy/beta [budget_exhausted]"));
        assert!(text.contains("accepted 7"));
        assert!(text.contains("Total: 10 documents"));
        assert!(text.contains("cafe1234"));
    }

    #[test]
    fn test_format_marks_cancelled_run() {
        let mut summary = sample_summary();
        summary.cancelled = true;
        assert!(format_run_summary(&summary).contains("cancelled"));
    }
}
