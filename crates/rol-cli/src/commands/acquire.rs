use rol_core::acquisition::fetch::HttpFetcher;
use rol_core::config::PipelineConfig;
use rol_core::storage::FsStorage;

use crate::output;

/// Returns whether the run succeeded.
pub fn run(config: &PipelineConfig, output_format: &str) -> anyhow::Result<bool> {
    let fetcher = HttpFetcher::new(config.user_agent.clone());
    let downloads = FsStorage::new(&config.download_root);

    let outcome = rol_core::run_acquisition(config, &fetcher, &downloads)?;

    match output_format {
        "text" => output::text::print_acquired(&outcome),
        _ => output::json::print(&outcome)?,
    }

    Ok(outcome.is_success())
}
