use rol_core::config::PipelineConfig;
use rol_core::extraction::pdftotext::PdftotextExtractor;
use rol_core::storage::{FsStorage, Stores};

use crate::output;

/// Returns whether the run succeeded.
pub fn run(config: &PipelineConfig, output_format: &str) -> anyhow::Result<bool> {
    let extractor = PdftotextExtractor::new();
    let downloads = FsStorage::new(&config.download_root);
    let work = FsStorage::new(&config.work_root);
    let stores = Stores {
        downloads: &downloads,
        work: &work,
    };

    let outcome = rol_core::run_processing(config, stores, &extractor)?;

    match output_format {
        "text" => output::text::print_processed(&outcome),
        _ => output::json::print(&outcome)?,
    }

    Ok(outcome.is_success())
}
