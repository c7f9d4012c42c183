//! Harvest orchestration
//!
//! A harvest runs in a fixed order:
//! 1. Fetch the full catalog (any failure ends the run, nothing is written)
//! 2. Write the catalog dataset
//! 3. Extract service identifiers from the catalog rows
//! 4. Fetch IO parameters service by service and tag each row
//! 5. Write the IO-parameter dataset
//!
//! Steps 3 to 5 only run when the plan asks for IO parameters.

use crate::api::CatalogQuery;
use crate::config::{validate, HarvestConfig};
use crate::fetch::{self, tag_service_id, HttpTransport, Transport};
use crate::ids::{extract_service_ids, ServiceId};
use crate::output::{default_sinks, HarvestSummary};
use crate::{HarvestError, Record, Result};
use chrono::Utc;
use std::path::PathBuf;

/// Services between two progress lines
const PROGRESS_EVERY: usize = 50;

/// What a single run should do
#[derive(Debug, Clone, Default)]
pub struct HarvestPlan {
    /// Filters applied to the catalog listing
    pub query: CatalogQuery,

    /// Also fetch IO parameters for every service found
    pub with_io: bool,

    /// Only fetch IO parameters for the first N services (0 = all)
    pub io_sample_n: usize,

    /// Treat a service whose IO fetch exhausts its retries as having no rows
    /// instead of ending the run
    pub skip_failed_io: bool,
}

/// Outcome of an IO-parameter sweep
#[derive(Debug, Clone, Default)]
pub struct IoSweep {
    /// Tagged rows of every service, in service order
    pub rows: Vec<Record>,

    /// Services that contributed at least one row
    pub services_with_io: usize,
}

/// Drives one harvest against an upstream
pub struct Harvester<T = HttpTransport> {
    config: HarvestConfig,
    transport: T,
    key: String,
}

impl Harvester<HttpTransport> {
    /// Creates a harvester talking HTTP to the configured endpoint
    ///
    /// # Returns
    ///
    /// * `Ok(Harvester)` - Config is valid and the HTTP client was built
    /// * `Err(HarvestError)` - Invalid config, empty key, or client failure
    pub fn new(config: HarvestConfig, key: &str) -> Result<Self> {
        let key = checked_key(key)?;
        // The retry policy turns config seconds into durations
        validate(&config)?;
        let transport = HttpTransport::new(&config.http)?;

        Ok(Self {
            config,
            transport,
            key,
        })
    }
}

impl<T: Transport> Harvester<T> {
    /// Creates a harvester over any transport
    pub fn with_transport(config: HarvestConfig, key: &str, transport: T) -> Result<Self> {
        let key = checked_key(key)?;
        validate(&config)?;

        Ok(Self {
            config,
            transport,
            key,
        })
    }

    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    /// Fetches the full catalog
    pub async fn fetch_catalog(&self, query: &CatalogQuery) -> Result<Vec<Record>> {
        tracing::info!("Fetching full catalog (SearchCatalogService) ...");
        fetch::fetch_full_catalog(&self.transport, &self.config, &self.key, query).await
    }

    /// Fetches and tags the IO parameters of each service in order
    ///
    /// A service answering with a non-success code contributes no rows. A
    /// transport failure ends the sweep unless `skip_failed` is set. The
    /// paging delay applies between pages of one service only.
    pub async fn fetch_io_params(&self, ids: &[ServiceId], skip_failed: bool) -> Result<IoSweep> {
        tracing::info!(
            "Fetching IO params for {} services (SearchOpenAPIIOValueService) ...",
            ids.len()
        );

        let mut sweep = IoSweep::default();

        for (done, id) in ids.iter().enumerate().map(|(i, id)| (i + 1, id)) {
            let mut rows =
                match fetch::fetch_io_params(&self.transport, &self.config, &self.key, id).await {
                    Ok(rows) => rows,
                    Err(e @ HarvestError::Transport { .. }) if skip_failed => {
                        tracing::warn!("Skipping {}: {}", id, e);
                        Vec::new()
                    }
                    Err(e) => return Err(e),
                };

            if rows.is_empty() {
                tracing::debug!("{}: no IO params", id);
            } else {
                sweep.services_with_io += 1;
                tag_service_id(&mut rows, id);
                sweep.rows.extend(rows);
            }

            if done % PROGRESS_EVERY == 0 {
                tracing::info!("  ... {}/{} done", done, ids.len());
            }
        }

        tracing::info!("IO param rows: {}", sweep.rows.len());
        Ok(sweep)
    }

    /// Runs a complete harvest and writes every dataset
    pub async fn run(&self, plan: &HarvestPlan) -> Result<HarvestSummary> {
        let mut summary = HarvestSummary::new(Utc::now());
        let output = &self.config.output;

        std::fs::create_dir_all(&output.dir)?;

        let catalog = self.fetch_catalog(&plan.query).await?;
        summary.catalog_rows = catalog.len();
        write_dataset(&catalog, |ext| output.catalog_path(ext), &mut summary.files)?;

        if plan.with_io {
            let mut ids = extract_service_ids(&catalog);
            summary.service_ids_found = ids.len();
            tracing::info!("Service ids found: {}", ids.len());

            if plan.io_sample_n > 0 {
                ids.truncate(plan.io_sample_n);
            }

            let sweep = self.fetch_io_params(&ids, plan.skip_failed_io).await?;
            summary.services_queried = ids.len();
            summary.services_with_io = sweep.services_with_io;
            summary.io_rows = sweep.rows.len();
            write_dataset(&sweep.rows, |ext| output.io_path(ext), &mut summary.files)?;
        }

        summary.finished_at = Utc::now();
        tracing::info!("Done.");
        Ok(summary)
    }
}

fn checked_key(key: &str) -> Result<String> {
    let key = key.trim();
    if key.is_empty() {
        return Err(HarvestError::MissingApiKey);
    }
    Ok(key.to_string())
}

/// Writes one dataset through every sink
fn write_dataset<F>(records: &[Record], path_for: F, written: &mut Vec<PathBuf>) -> Result<()>
where
    F: Fn(&str) -> PathBuf,
{
    for sink in default_sinks() {
        let path = path_for(sink.extension());
        sink.write(&path, records)?;
        tracing::info!("Saved: {}", path.display());
        written.push(path);
    }
    Ok(())
}
