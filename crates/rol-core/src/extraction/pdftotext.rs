use crate::error::RolError;
use crate::extraction::table::detect_tables;
use crate::extraction::{PageTables, TableExtractor};
use std::io::Write;
use std::process::Command;

/// Table extraction backend using pdftotext (from poppler-utils).
///
/// Uses `pdftotext -layout` so table columns stay aligned, then segments each
/// page with [`detect_tables`].
pub struct PdftotextExtractor;

impl PdftotextExtractor {
    pub fn new() -> Self {
        PdftotextExtractor
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available() -> bool {
        Command::new("pdftotext")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TableExtractor for PdftotextExtractor {
    fn extract_tables(&self, pdf_bytes: &[u8]) -> Result<Vec<PageTables>, RolError> {
        let mut tmpfile =
            tempfile::NamedTempFile::new().map_err(|e| RolError::Extraction(e.to_string()))?;
        tmpfile
            .write_all(pdf_bytes)
            .map_err(|e| RolError::Extraction(e.to_string()))?;

        let output = Command::new("pdftotext")
            .arg("-layout")
            .arg("-enc")
            .arg("UTF-8")
            .arg(tmpfile.path())
            .arg("-") // output to stdout
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    RolError::PdftotextNotFound
                } else {
                    RolError::Extraction(format!("pdftotext failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(RolError::PdftotextFailed { code, stderr });
        }

        let text = String::from_utf8_lossy(&output.stdout);
        Ok(split_layout_pages(&text))
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

/// Split `pdftotext -layout` output into pages (form feed separated) and
/// detect the tables of each.
pub fn split_layout_pages(text: &str) -> Vec<PageTables> {
    let body = text.strip_suffix('\x0c').unwrap_or(text);
    body.split('\x0c')
        .enumerate()
        .map(|(i, page_text)| {
            let lines: Vec<&str> = page_text.lines().collect();
            PageTables {
                page_number: i + 1,
                tables: detect_tables(&lines),
            }
        })
        .collect()
}
