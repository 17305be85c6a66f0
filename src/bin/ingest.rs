/// Downloads the remote profile directory into the local dataset file
use anyhow::Context;
use profile_directory::{
    config::ServerConfig,
    dataset_store::DatasetStore,
    ingest::{self, DirectoryClient, IngestPlan},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env().context("loading configuration")?;
    profile_directory::init_tracing(&config.logging.level);
    config.validate().context("validating configuration")?;

    let client = DirectoryClient::new(&config.ingestion)?;
    let store = DatasetStore::new(config.storage.dataset_path.clone());
    let plan = IngestPlan::from(&config.ingestion);

    let summary = ingest::run(&client, &store, plan)
        .await
        .with_context(|| format!("downloading directory from {}", client.page_url()))?;

    tracing::info!(
        records = summary.records,
        pages = summary.pages,
        checkpoints = summary.checkpoints,
        "Dataset written to {}",
        store.path().display()
    );

    Ok(())
}
