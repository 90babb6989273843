pub mod fetch;
pub mod links;

use crate::archive;
use crate::config::PipelineConfig;
use crate::error::RolError;
use crate::storage::Storage;
use fetch::Fetcher;
use links::{find_candidate_links, resolve_link, CandidateLink};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// What an acquisition run left on storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquireReport {
    /// Storage key of the source archive.
    pub archive_key: String,
    /// Display location of the source archive.
    pub zip_file_path: String,
    /// Display location of the extracted directory.
    pub extracted_files_path: String,
    /// Downloaded document keys, in link order.
    pub documents: Vec<String>,
}

/// Download every qualifying annex and bundle them into the source archive.
///
/// The first failing download aborts the run: documents already written stay
/// on storage and no archive is written.
pub fn acquire(
    config: &PipelineConfig,
    fetcher: &dyn Fetcher,
    downloads: &dyn Storage,
) -> Result<AcquireReport, RolError> {
    info!(url = %config.source_url, backend = fetcher.backend_name(), "fetching annex listing");

    let page = fetcher
        .get(&config.source_url, config.page_timeout())
        .map_err(|e| {
            warn!(error = %e, "listing page request failed");
            RolError::PageFetch {
                url: config.source_url.to_string(),
                status: None,
            }
        })?;
    if !page.is_success() {
        warn!(status = page.status, "listing page returned non-success status");
        return Err(RolError::PageFetch {
            url: config.source_url.to_string(),
            status: Some(page.status),
        });
    }

    let html = String::from_utf8_lossy(&page.body);
    let links = find_candidate_links(&html, &config.link_markers, &config.document_extension);
    if links.is_empty() {
        return Err(RolError::NoCandidates {
            markers: config.markers_display(),
        });
    }
    info!(count = links.len(), "found annex links");

    let mut documents = Vec::with_capacity(links.len());
    for (i, link) in links.iter().enumerate() {
        let index = i + 1;
        let bytes = download(config, fetcher, index, link)?;
        let name = config.document_name(index);
        downloads.put(&name, &bytes)?;
        debug!(index, key = %name, size = bytes.len(), "stored annex");
        documents.push((name, bytes));
    }

    let archive_bytes = archive::bundle(&documents)?;
    downloads.put(&config.source_archive, &archive_bytes)?;
    archive::extract_into(&archive_bytes, downloads, &config.extracted_dir)?;

    info!(
        archive = %config.source_archive,
        documents = documents.len(),
        "annexes downloaded and archived"
    );

    Ok(AcquireReport {
        archive_key: config.source_archive.clone(),
        zip_file_path: downloads.location(&config.source_archive),
        extracted_files_path: downloads.location(&config.extracted_dir),
        documents: documents.into_iter().map(|(name, _)| name).collect(),
    })
}

fn download(
    config: &PipelineConfig,
    fetcher: &dyn Fetcher,
    index: usize,
    link: &CandidateLink,
) -> Result<Vec<u8>, RolError> {
    let url = resolve_link(&config.site_origin, &link.href).map_err(|e| {
        warn!(index, href = %link.href, error = %e, "could not resolve annex link");
        RolError::Download {
            index,
            url: link.href.clone(),
        }
    })?;

    debug!(index, url = %url, "downloading annex");
    let failed = || RolError::Download {
        index,
        url: url.to_string(),
    };

    let response = fetcher
        .get(&url, config.download_timeout())
        .map_err(|e| {
            warn!(index, url = %url, error = %e, "annex request failed");
            failed()
        })?;
    if !response.is_success() {
        warn!(index, url = %url, status = response.status, "annex returned non-success status");
        return Err(failed());
    }

    Ok(response.body)
}
