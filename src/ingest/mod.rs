/// Directory ingestion
///
/// Downloads the remote directory page by page into an accumulator and writes
/// full snapshots of it to the dataset store at checkpoint intervals. The last
/// page always triggers a final snapshot.
pub mod client;

pub use client::{parse_directory_response, DirectoryClient, DirectoryPage, PageSource};

use crate::{
    config::IngestionConfig,
    dataset_store::DatasetStore,
    error::DirectoryResult,
    metrics,
};
use serde_json::Value;
use tracing::info;

/// Page size, stop point and checkpoint interval for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestPlan {
    pub page_size: usize,
    pub total: usize,
    pub checkpoint_every: usize,
}

impl From<&IngestionConfig> for IngestPlan {
    fn from(config: &IngestionConfig) -> Self {
        Self {
            page_size: config.page_size,
            total: config.total,
            checkpoint_every: config.checkpoint_every,
        }
    }
}

/// Records gathered so far in a run
#[derive(Debug, Default)]
pub struct Accumulator {
    records: Vec<Value>,
    since_checkpoint: usize,
}

impl Accumulator {
    pub fn push_page(&mut self, values: Vec<Value>) {
        self.since_checkpoint += values.len();
        self.records.extend(values);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Value] {
        &self.records
    }

    pub fn due_for_checkpoint(&self, every: usize) -> bool {
        self.since_checkpoint >= every
    }

    /// Write everything accumulated so far as the new dataset
    pub async fn checkpoint(&mut self, store: &DatasetStore) -> DirectoryResult<()> {
        store.write_snapshot(&self.records).await?;
        self.since_checkpoint = 0;
        metrics::record_ingest_checkpoint();
        info!("Saved {} records to {}", self.records.len(), store.path().display());
        Ok(())
    }
}

/// Outcome of a completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    pub records: usize,
    pub pages: usize,
    pub checkpoints: usize,
}

/// Download the directory into `store`
///
/// Stops once `plan.total` records have been requested, when the API returns an
/// empty page, or when the API reports a total below the next offset. Any
/// upstream failure aborts the run; snapshots already written stay in place.
pub async fn run<S>(source: &S, store: &DatasetStore, plan: IngestPlan) -> DirectoryResult<IngestSummary>
where
    S: PageSource + ?Sized,
{
    let mut acc = Accumulator::default();
    let mut summary = IngestSummary {
        records: 0,
        pages: 0,
        checkpoints: 0,
    };

    info!("Starting directory download ({} records, {} per page)", plan.total, plan.page_size);

    let mut offset = 0;
    while offset < plan.total {
        info!("Downloading records {} to {}", offset, offset + plan.page_size);
        let page = source.fetch_page(offset, plan.page_size).await?;
        metrics::record_ingest_page();
        summary.pages += 1;

        let fetched = page.values.len();
        let reported_total = page.total;
        acc.push_page(page.values);
        offset += plan.page_size;

        let finished = fetched == 0
            || offset >= plan.total
            || reported_total.is_some_and(|total| offset >= total);

        if finished || acc.due_for_checkpoint(plan.checkpoint_every) {
            acc.checkpoint(store).await?;
            summary.checkpoints += 1;
        }

        if finished {
            break;
        }
    }

    summary.records = acc.len();
    info!(
        "Directory download complete: {} records in {} pages",
        summary.records, summary.pages
    );

    Ok(summary)
}
