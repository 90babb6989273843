pub mod acquisition;
pub mod archive;
pub mod config;
pub mod error;
pub mod extraction;
pub mod outcome;
pub mod storage;
pub mod transform;

use acquisition::fetch::Fetcher;
use acquisition::AcquireReport;
use config::PipelineConfig;
use error::RolError;
use extraction::TableExtractor;
use outcome::{Outcome, ACQUIRED_MESSAGE, PROCESSED_MESSAGE};
use storage::{Storage, Stores};
use transform::ProcessReport;

/// Main API entry point for the acquisition stage.
///
/// Modeled failures (page unreachable, no annex links, a failed download)
/// come back as an error outcome; storage and archive faults as `Err`.
pub fn run_acquisition(
    config: &PipelineConfig,
    fetcher: &dyn Fetcher,
    downloads: &dyn Storage,
) -> Result<Outcome<AcquireReport>, RolError> {
    Outcome::from_result(
        acquisition::acquire(config, fetcher, downloads),
        ACQUIRED_MESSAGE,
    )
}

/// Main API entry point for the processing stage: extract the annex table,
/// expand coverage codes, and package the CSV.
pub fn run_processing(
    config: &PipelineConfig,
    stores: Stores<'_>,
    extractor: &dyn TableExtractor,
) -> Result<Outcome<ProcessReport>, RolError> {
    Outcome::from_result(
        transform::process(config, stores, extractor),
        PROCESSED_MESSAGE,
    )
}
