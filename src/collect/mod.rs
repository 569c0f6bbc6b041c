//! Crawl orchestration: drives Frontier -> Fetcher -> Extractor -> Dedup ->
//! Persistence per source, under a shared or per-source budget
//!
//! Every per-URL failure is absorbed here and recorded in the metadata
//! index; only configuration-level failures surface out of [`run_crawl`].

mod budget;
mod source_state;

pub use budget::{BudgetDecision, RunBudget};
pub use source_state::SourceState;

use crate::config::{select_sources, BudgetScope, Config, SelectedSource};
use crate::dedup::{fingerprint, DedupIndex};
use crate::extract::Extractor;
use crate::fetch::{Fetcher, HttpTransport, Transport};
use crate::frontier::{self, Candidate};
use crate::report::{RunSummary, SourceReport};
use crate::store::{load_seen_fingerprints, CorpusStore, MetaIndex, MetadataRecord};
use crate::Result;
use futures::stream::{self, StreamExt};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Run-wide flags resolved from the CLI
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Category filter; empty means all
    pub categories: Vec<String>,

    /// Source key filter; empty means all
    pub sources: Vec<String>,

    /// Persist and fingerprint a lowercase token stream instead of prose
    pub word_only: bool,

    /// Widen pagination beyond `max_pages` (still hard-capped)
    pub exhaust_pagination: bool,

    /// Config file hash recorded in the summary
    pub config_hash: String,
}

/// Shared per-run collaborators handed to each source's pull loop
struct RunContext<T: Transport> {
    fetcher: Fetcher<T>,
    extractor: Extractor,
    dedup: DedupIndex,
    corpus: CorpusStore,
    meta: MetaIndex,
    shutdown: Arc<AtomicBool>,
    exhaust_pagination: bool,
}

/// Runs a full crawl over the selected sources
///
/// Installs a Ctrl-C handler for cooperative cancellation: the flag is
/// checked between candidates, in-flight work finishes, and no record is
/// emitted for an item that never completed processing.
pub async fn run_crawl(config: &Config, options: &RunOptions) -> Result<RunSummary> {
    let fetcher = Fetcher::<HttpTransport>::from_settings(&config.crawler)?;

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = Arc::clone(&shutdown);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Interrupt received, finishing in-flight items");
                shutdown.store(true, Ordering::SeqCst);
            }
        });
    }

    run_with_fetcher(config, options, fetcher, shutdown).await
}

/// Crawl entry point with an injected fetcher and shutdown flag
pub async fn run_with_fetcher<T: Transport>(
    config: &Config,
    options: &RunOptions,
    fetcher: Fetcher<T>,
    shutdown: Arc<AtomicBool>,
) -> Result<RunSummary> {
    let index_path = Path::new(&config.output.index_path);
    let seed = load_seen_fingerprints(index_path)?;
    if !seed.is_empty() {
        tracing::info!("Seeded dedup index with {} prior fingerprints", seed.len());
    }

    let ctx = RunContext {
        fetcher,
        extractor: Extractor::new(config.crawler.rich_extraction, options.word_only),
        dedup: DedupIndex::with_seed(seed),
        corpus: CorpusStore::new(&config.output.corpus_dir),
        meta: MetaIndex::open(index_path)?,
        shutdown: Arc::clone(&shutdown),
        exhaust_pagination: options.exhaust_pagination,
    };

    let selections = select_sources(config, &options.categories, &options.sources);
    tracing::info!("Collecting from {} sources", selections.len());

    let shared_budget = match config.budget.scope {
        BudgetScope::Global => Some(Arc::new(RunBudget::new(&config.budget))),
        BudgetScope::PerSource => None,
    };

    let concurrency = config.crawler.max_concurrent_sources.max(1) as usize;
    let reports: Vec<SourceReport> = stream::iter(selections.iter().map(|selected| {
        let budget = shared_budget
            .clone()
            .unwrap_or_else(|| Arc::new(RunBudget::new(&config.budget)));
        collect_source(&ctx, selected, budget)
    }))
    .buffered(concurrency)
    .collect()
    .await;

    Ok(RunSummary {
        config_hash: options.config_hash.clone(),
        cancelled: shutdown.load(Ordering::SeqCst),
        sources: reports,
    })
}

/// What happened to one candidate, as seen by the pull loop
enum CandidateFate {
    Accepted(u64),
    Duplicate,
    Error,
    BudgetStop,
}

/// Collects one source: resolve the frontier, then pull candidates until it
/// is exhausted, the budget runs out, or shutdown is requested
async fn collect_source<T: Transport>(
    ctx: &RunContext<T>,
    selected: &SelectedSource,
    budget: Arc<RunBudget>,
) -> SourceReport {
    let source = &selected.source;
    let mut report = SourceReport::new(&selected.category, &source.key);

    if ctx.shutdown.load(Ordering::SeqCst) {
        report.state = SourceState::Cancelled;
        return report;
    }

    tracing::info!("[source] {}/{}", selected.category, source.key);
    report.state = SourceState::Running;

    let candidates = match frontier::resolve(&ctx.fetcher, source, ctx.exhaust_pagination).await {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::error!("Aborting source {}: {}", source.key, e);
            report.state = SourceState::ErrorAborted;
            return report;
        }
    };
    tracing::info!("{} candidates for source {}", candidates.len(), source.key);

    for candidate in candidates {
        if ctx.shutdown.load(Ordering::SeqCst) {
            tracing::info!("Stopping source {} on shutdown request", source.key);
            report.state = SourceState::Cancelled;
            break;
        }
        if budget.exhausted() {
            report.state = SourceState::BudgetExhausted;
            break;
        }

        report.attempted += 1;
        match process_candidate(ctx, selected, &candidate, &budget).await {
            CandidateFate::Accepted(bytes) => {
                report.accepted += 1;
                report.bytes_collected += bytes;
            }
            CandidateFate::Duplicate => report.duplicates += 1,
            CandidateFate::Error => report.errors += 1,
            CandidateFate::BudgetStop => {
                report.attempted -= 1;
                report.state = SourceState::BudgetExhausted;
                break;
            }
        }
    }

    if report.state == SourceState::Running {
        report.state = SourceState::Completed;
    }

    tracing::info!(
        "[source] {}/{} done: {} (accepted {}, duplicate {}, error {}, {} bytes)",
        selected.category,
        source.key,
        report.state,
        report.accepted,
        report.duplicates,
        report.errors,
        report.bytes_collected
    );

    report
}

/// Fetch -> extract -> dedup -> budget -> persist for a single candidate
async fn process_candidate<T: Transport>(
    ctx: &RunContext<T>,
    selected: &SelectedSource,
    candidate: &Candidate,
    budget: &RunBudget,
) -> CandidateFate {
    let category = selected.category.as_str();
    let key = selected.source.key.as_str();
    let url = candidate.url.as_str();

    let outcome = ctx.fetcher.fetch(url).await;
    if outcome.blocked {
        let reason = if outcome.status_code == 0 {
            "transport-failure".to_string()
        } else {
            format!("http-{}", outcome.status_code)
        };
        append_record(ctx, MetadataRecord::error(category, key, url, &reason));
        return CandidateFate::Error;
    }

    let doc = match ctx.extractor.extract(&outcome, category, key) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::debug!("Extraction failed for {}: {}", url, e);
            append_record(ctx, MetadataRecord::error(category, key, url, &e.to_string()));
            return CandidateFate::Error;
        }
    };

    let fp = fingerprint(&doc.text);
    if ctx.dedup.check_and_register(&fp) {
        append_record(
            ctx,
            MetadataRecord::duplicate(category, key, url, fp).with_page_index(candidate.page_index),
        );
        return CandidateFate::Duplicate;
    }

    let bytes = doc.text.len() as u64;
    if budget.try_accept(bytes) == BudgetDecision::WouldExceed {
        tracing::info!(
            "Budget exhausted; discarding {} ({} bytes) and stopping source {}",
            url,
            bytes,
            key
        );
        // The discarded document was never accepted; its content must stay
        // acceptable elsewhere
        ctx.dedup.forget(&fp);
        return CandidateFate::BudgetStop;
    }

    match ctx.corpus.write(&doc, &fp) {
        Ok(path) => {
            tracing::debug!("Wrote {} -> {}", url, path.display());
            append_record(
                ctx,
                MetadataRecord::accepted(category, key, url, fp, bytes, doc.extraction_method)
                    .with_title(candidate.title.clone())
                    .with_page_index(candidate.page_index),
            );
            CandidateFate::Accepted(bytes)
        }
        Err(e) => {
            // The document is treated as not accepted; give back its budget
            // reservation and its dedup registration
            budget.release(bytes);
            ctx.dedup.forget(&fp);
            tracing::error!("Failed to persist {}: {}", url, e);
            append_record(
                ctx,
                MetadataRecord::error(category, key, url, &format!("write-failed: {}", e)),
            );
            CandidateFate::Error
        }
    }
}

/// Appends one metadata record, absorbing index I/O failures with a warning
fn append_record<T: Transport>(ctx: &RunContext<T>, record: MetadataRecord) {
    if let Err(e) = ctx.meta.append(&record) {
        tracing::warn!("Failed to append metadata record for {}: {}", record.url, e);
    }
}
