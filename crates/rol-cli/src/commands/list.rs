use rol_core::config::PipelineConfig;
use rol_core::storage::{FsStorage, Storage};

use crate::output;

pub fn run(config: &PipelineConfig, output_format: &str) -> anyhow::Result<bool> {
    let downloads = FsStorage::new(&config.download_root);
    let files = downloads.list("")?;

    match output_format {
        "text" => output::text::print_files(&files),
        _ => output::json::print(&serde_json::json!({ "files": files }))?,
    }

    Ok(true)
}
