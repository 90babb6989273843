pub mod dataset;
pub mod normalize;

use crate::archive;
use crate::config::PipelineConfig;
use crate::error::RolError;
use crate::extraction::TableExtractor;
use crate::storage::{join_key, Storage, Stores};
use dataset::TabularDataset;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Result of locating the annex and writing its rows to the CSV.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableReport {
    /// Archive picked from the download root.
    pub archive: String,
    /// Annex picked from the extracted directory.
    pub document: String,
    pub pages: usize,
    pub rows: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepackageReport {
    pub zip_path: String,
}

/// Result of the whole processing stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessReport {
    pub zip_path: String,
    pub rows: usize,
    pub substitutions: usize,
}

/// Find the source archive, extract it, pick the annex and write every
/// non-blank table row to the CSV in the work store.
///
/// Archives and annexes are matched by case-insensitive marker and picked in
/// lexicographic order. Nothing is written to the work store unless at least
/// one row was found.
pub fn locate_and_extract_table(
    config: &PipelineConfig,
    stores: Stores<'_>,
    extractor: &dyn TableExtractor,
) -> Result<TableReport, RolError> {
    let archive_marker = config.archive_marker.to_lowercase();
    let archive_name = stores
        .downloads
        .find_first("", &|name: &str| {
            name.to_lowercase().contains(&archive_marker) && name.ends_with(".zip")
        })?
        .ok_or_else(|| RolError::ArchiveNotFound {
            marker: config.archive_marker.clone(),
        })?;
    info!(archive = %archive_name, "found source archive");

    let archive_bytes = stores.downloads.get(&archive_name)?;
    archive::extract_into(&archive_bytes, stores.downloads, &config.extracted_dir)?;

    let document_marker = config.document_marker.to_lowercase();
    let document_name = stores
        .downloads
        .find_first(&config.extracted_dir, &|name: &str| {
            name.to_lowercase().contains(&document_marker)
                && name.ends_with(&config.document_extension)
        })?
        .ok_or_else(|| RolError::DocumentNotFound {
            marker: config.document_marker.clone(),
        })?;

    let pdf_bytes = stores
        .downloads
        .get(&join_key(&config.extracted_dir, &document_name))?;
    info!(
        document = %document_name,
        backend = extractor.backend_name(),
        "extracting annex tables"
    );

    let pages = extractor.extract_tables(&pdf_bytes)?;
    for page in &pages {
        debug!(page = page.page_number, tables = page.tables.len(), "page scanned");
    }

    let dataset = TabularDataset::from_pages(&pages);
    if dataset.is_empty() {
        return Err(RolError::EmptyDataset);
    }

    stores.work.put(&config.tabular_file, &dataset.to_csv()?)?;
    info!(rows = dataset.len(), file = %config.tabular_file, "table rows written");

    Ok(TableReport {
        archive: archive_name,
        document: document_name,
        pages: pages.len(),
        rows: dataset.len(),
    })
}

/// Expand coverage codes in the CSV in place. Returns the number of cells
/// replaced.
pub fn normalize_codes(config: &PipelineConfig, work: &dyn Storage) -> Result<usize, RolError> {
    let bytes = work.get(&config.tabular_file)?;
    let mut dataset = TabularDataset::from_csv(&bytes)?;
    let replaced = normalize::substitute_codes(&mut dataset);
    work.put(&config.tabular_file, &dataset.to_csv()?)?;
    info!(replaced, "coverage codes expanded");
    Ok(replaced)
}

/// Move the CSV into the output archive.
///
/// The archive is staged under a temporary name, the CSV removed, and the
/// staged archive renamed into place. On failure the CSV is put back and the
/// staged archive dropped, so storage ends either before or after the step.
pub fn repackage(config: &PipelineConfig, stores: Stores<'_>) -> Result<RepackageReport, RolError> {
    let csv = stores.work.get(&config.tabular_file)?;
    let archive_bytes = archive::bundle(&[(config.tabular_file.as_str(), csv.as_slice())])?;

    let staged = format!("{}.partial", config.output_archive);
    stores.downloads.put(&staged, &archive_bytes)?;

    if let Err(e) = stores.work.remove(&config.tabular_file) {
        discard(stores.downloads, &staged);
        return Err(e);
    }

    if let Err(e) = stores.downloads.rename(&staged, &config.output_archive) {
        if let Err(restore) = stores.work.put(&config.tabular_file, &csv) {
            warn!(error = %restore, file = %config.tabular_file, "could not restore CSV");
        }
        discard(stores.downloads, &staged);
        return Err(e);
    }

    let zip_path = stores.downloads.location(&config.output_archive);
    info!(zip_path = %zip_path, "CSV packaged");
    Ok(RepackageReport { zip_path })
}

fn discard(storage: &dyn Storage, key: &str) {
    if storage.exists(key) {
        if let Err(e) = storage.remove(key) {
            warn!(error = %e, key, "could not remove staged archive");
        }
    }
}

/// Run the processing stage: extract, normalize, repackage.
///
/// Extraction failures are returned before anything else runs. A failed
/// normalization is logged and the unnormalized CSV is packaged.
pub fn process(
    config: &PipelineConfig,
    stores: Stores<'_>,
    extractor: &dyn TableExtractor,
) -> Result<ProcessReport, RolError> {
    let table = locate_and_extract_table(config, stores, extractor)?;

    let substitutions = match normalize_codes(config, stores.work) {
        Ok(n) => n,
        Err(e) => {
            warn!(error = %e, "code normalization failed; packaging CSV as extracted");
            0
        }
    };

    let packaged = repackage(config, stores)?;

    Ok(ProcessReport {
        zip_path: packaged.zip_path,
        rows: table.rows,
        substitutions,
    })
}
