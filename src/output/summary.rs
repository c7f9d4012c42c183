//! End-of-run summary

use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// What a harvest fetched and wrote
#[derive(Debug, Clone)]
pub struct HarvestSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Rows in the catalog dataset
    pub catalog_rows: usize,

    /// Distinct service identifiers found in the catalog
    pub service_ids_found: usize,

    /// Services whose IO parameters were requested
    pub services_queried: usize,

    /// Services that returned at least one IO-parameter row
    pub services_with_io: usize,

    /// Rows in the IO-parameter dataset
    pub io_rows: usize,

    /// Every file written, in write order
    pub files: Vec<PathBuf>,
}

impl HarvestSummary {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            finished_at: started_at,
            catalog_rows: 0,
            service_ids_found: 0,
            services_queried: 0,
            services_with_io: 0,
            io_rows: 0,
            files: Vec::new(),
        }
    }

    pub fn duration_seconds(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }

    /// Services queried that contributed no rows
    pub fn services_without_io(&self) -> usize {
        self.services_queried - self.services_with_io
    }
}

/// Prints a summary to stdout
pub fn print_summary(summary: &HarvestSummary) {
    println!("=== Harvest Summary ===\n");
    println!("Started:  {}", summary.started_at.to_rfc3339());
    println!(
        "Finished: {} ({:.1}s)",
        summary.finished_at.to_rfc3339(),
        summary.duration_seconds()
    );

    println!("\nCatalog:");
    println!("  Rows: {}", summary.catalog_rows);
    println!("  Service ids: {}", summary.service_ids_found);

    if summary.services_queried > 0 {
        println!("\nIO parameters:");
        println!("  Services queried: {}", summary.services_queried);
        println!("  With data: {}", summary.services_with_io);
        println!("  Without data: {}", summary.services_without_io());
        println!("  Rows: {}", summary.io_rows);
    }

    println!("\nFiles:");
    for file in &summary.files {
        println!("  {}", file.display());
    }
}
